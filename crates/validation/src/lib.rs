//! fieldcheck validation: name syntax checks, int-or-percent helpers and
//! the append-only policy for list fields.
//!
//! - [`conformance`] - DNS-1123 / percent predicates behind the [`Conformance`] trait
//! - [`syntax`] - field validators returning [`ErrorList`]s
//! - [`percent`] - reading and scaling `IntOrString` values
//! - [`immutability`] - deciding whether a list update is a pure trailing append

#![forbid(unsafe_code)]

pub mod conformance;
pub mod immutability;
pub mod percent;
pub mod syntax;

pub use conformance::{Conformance, Rfc1123};
pub use fieldcheck_core::{ErrorList, ErrorType, FieldError, FieldPath};
pub use immutability::{should_enforce_immutability, validate_append_only, validate_immutable_field};
pub use percent::{
    int_or_percent_value, int_or_percent_value_with, percent_value, percent_value_with, scaled_value, scaled_value_with,
    IntOrPercentError,
};
pub use syntax::{
    validate_dns1123_label, validate_dns1123_subdomain, validate_name, validate_no_consecutive_hyphens,
    validate_secret_reference, FieldValidator,
};
