//! Syntax predicates for Kubernetes-style names.
//!
//! Each predicate returns the list of rules the value breaks; an empty list
//! means the value conforms. Validators take the predicates through the
//! [`Conformance`] trait so tests can swap in fakes.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DNS1123_LABEL_MAX_LENGTH: usize = 63;
pub const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;

const DNS1123_LABEL_FMT: &str = "[a-z0-9]([-a-z0-9]*[a-z0-9])?";
const DNS1123_SUBDOMAIN_FMT: &str = "[a-z0-9]([-a-z0-9]*[a-z0-9])?(\\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*";
const PERCENT_FMT: &str = "[0-9]+%";

const DNS1123_LABEL_ERR: &str = "a lowercase RFC 1123 label must consist of lower case alphanumeric characters or '-', and must start and end with an alphanumeric character";
const DNS1123_SUBDOMAIN_ERR: &str = "a lowercase RFC 1123 subdomain must consist of lower case alphanumeric characters, '-' or '.', and must start and end with an alphanumeric character";
const PERCENT_ERR: &str = "a valid percent string must be a numeric string followed by an ending '%'";

static DNS1123_LABEL_RE: Lazy<Regex> = Lazy::new(|| anchored(DNS1123_LABEL_FMT));
static DNS1123_SUBDOMAIN_RE: Lazy<Regex> = Lazy::new(|| anchored(DNS1123_SUBDOMAIN_FMT));
static PERCENT_RE: Lazy<Regex> = Lazy::new(|| anchored(PERCENT_FMT));

fn anchored(fmt: &str) -> Regex {
    Regex::new(&format!("^{}$", fmt)).unwrap()
}

/// Rule set consulted by the field validators.
pub trait Conformance {
    /// Violations of the RFC 1123 subdomain rules (dot-separated labels).
    fn dns1123_subdomain(&self, value: &str) -> Vec<String>;

    /// Violations of the RFC 1123 single-label rules.
    fn dns1123_label(&self, value: &str) -> Vec<String>;

    /// Violations of the `<digits>%` syntax.
    fn valid_percent(&self, value: &str) -> Vec<String>;

    /// Object-name check. With `prefix` set, `name` is a generateName-style
    /// prefix that will get a random suffix, so a trailing `-` is allowed.
    fn name_is_dns_subdomain(&self, name: &str, prefix: bool) -> Vec<String> {
        if prefix {
            self.dns1123_subdomain(&mask_trailing_dash(name))
        } else {
            self.dns1123_subdomain(name)
        }
    }
}

/// Stock RFC 1123 rules as enforced by the Kubernetes API server.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc1123;

impl Conformance for Rfc1123 {
    fn dns1123_subdomain(&self, value: &str) -> Vec<String> {
        let mut errs = Vec::new();
        if value.len() > DNS1123_SUBDOMAIN_MAX_LENGTH {
            errs.push(max_len_error(DNS1123_SUBDOMAIN_MAX_LENGTH));
        }
        if !DNS1123_SUBDOMAIN_RE.is_match(value) {
            errs.push(regex_error(DNS1123_SUBDOMAIN_ERR, DNS1123_SUBDOMAIN_FMT, &["example.com"]));
        }
        errs
    }

    fn dns1123_label(&self, value: &str) -> Vec<String> {
        let mut errs = Vec::new();
        if value.len() > DNS1123_LABEL_MAX_LENGTH {
            errs.push(max_len_error(DNS1123_LABEL_MAX_LENGTH));
        }
        if !DNS1123_LABEL_RE.is_match(value) {
            errs.push(regex_error(DNS1123_LABEL_ERR, DNS1123_LABEL_FMT, &["my-name", "123-abc"]));
        }
        errs
    }

    fn valid_percent(&self, value: &str) -> Vec<String> {
        if PERCENT_RE.is_match(value) {
            return Vec::new();
        }
        vec![regex_error(PERCENT_ERR, PERCENT_FMT, &["1%", "93%"])]
    }
}

/// Replace the last two characters of a dash-terminated prefix with `a`,
/// leaving room for the generated suffix.
fn mask_trailing_dash(name: &str) -> String {
    if name.len() > 1 && name.ends_with('-') {
        if let Some(head) = name.get(..name.len() - 2) {
            return format!("{}a", head);
        }
    }
    name.to_string()
}

pub fn max_len_error(length: usize) -> String {
    format!("must be no more than {} characters", length)
}

/// Message for a value that does not match `fmt`, with optional examples.
pub fn regex_error(msg: &str, fmt: &str, examples: &[&str]) -> String {
    if examples.is_empty() {
        return format!("{} (regex used for validation is '{}')", msg, fmt);
    }
    let mut out = format!("{} (e.g. ", msg);
    for (i, ex) in examples.iter().enumerate() {
        if i > 0 { out.push_str(" or "); }
        out.push('\'');
        out.push_str(ex);
        out.push_str("', ");
    }
    out.push_str("regex used for validation is '");
    out.push_str(fmt);
    out.push_str("')");
    out
}
