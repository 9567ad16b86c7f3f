//! Helpers for `IntOrString` fields that may hold a percentage
//! (e.g. `maxSurge: 25%` or `maxUnavailable: 1`).

use std::num::{IntErrorKind, ParseIntError};

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use thiserror::Error;

use crate::conformance::{Conformance, Rfc1123};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntOrPercentError {
    #[error("invalid percent value {0:?}: must be a numeric string followed by '%'")]
    InvalidPercent(String),
    #[error("scaled value of {value:?} against total {total} does not fit in i32")]
    Overflow { value: String, total: i32 },
}

/// Percent number of a valid `<digits>%` string, `None` for integers and
/// malformed strings. Digits too large for `i64` read as 0.
pub fn percent_value(v: &IntOrString) -> Option<i64> {
    percent_value_with(&Rfc1123, v)
}

pub fn percent_value_with<C: Conformance>(conformance: &C, v: &IntOrString) -> Option<i64> {
    let s = match v {
        IntOrString::String(s) => s,
        IntOrString::Int(_) => return None,
    };
    if !conformance.valid_percent(s).is_empty() {
        return None;
    }
    let digits = s.strip_suffix('%').unwrap_or(s);
    Some(digits.parse::<i64>().unwrap_or(0))
}

/// Percent number if `v` is a percentage, otherwise its integer value.
/// Non-numeric strings read as 0.
pub fn int_or_percent_value(v: &IntOrString) -> i64 {
    int_or_percent_value_with(&Rfc1123, v)
}

pub fn int_or_percent_value_with<C: Conformance>(conformance: &C, v: &IntOrString) -> i64 {
    if let Some(p) = percent_value_with(conformance, v) {
        return p;
    }
    match v {
        IntOrString::Int(n) => i64::from(*n),
        IntOrString::String(s) => s.parse::<i64>().unwrap_or(0),
    }
}

/// Resolve `v` against `total`: integers are returned as-is, percentages
/// become `p * total / 100`, rounded up or down.
pub fn scaled_value(v: &IntOrString, total: i32, round_up: bool) -> Result<i32, IntOrPercentError> {
    scaled_value_with(&Rfc1123, v, total, round_up)
}

pub fn scaled_value_with<C: Conformance>(
    conformance: &C,
    v: &IntOrString,
    total: i32,
    round_up: bool,
) -> Result<i32, IntOrPercentError> {
    let s = match v {
        IntOrString::Int(n) => return Ok(*n),
        IntOrString::String(s) => s,
    };
    if !conformance.valid_percent(s).is_empty() {
        return Err(IntOrPercentError::InvalidPercent(s.clone()));
    }
    let overflow = || IntOrPercentError::Overflow { value: s.clone(), total };
    let p: i64 = s.trim_end_matches('%').parse().map_err(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => overflow(),
        _ => IntOrPercentError::InvalidPercent(s.clone()),
    })?;
    let product = p.checked_mul(i64::from(total)).ok_or_else(overflow)?;
    let mut scaled = product.div_euclid(100);
    if round_up && product.rem_euclid(100) != 0 {
        scaled += 1;
    }
    i32::try_from(scaled).map_err(|_| overflow())
}
