//! Field-level syntax validators.
//!
//! None of these fail: an empty [`ErrorList`] means the field is fine.

use fieldcheck_core::{ErrorList, FieldError, FieldPath};
use k8s_openapi::api::core::v1::SecretReference;
use tracing::trace;

use crate::conformance::{Conformance, Rfc1123};

/// Validators bound to a [`Conformance`] rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValidator<C = Rfc1123> {
    conformance: C,
}

impl<C: Conformance> FieldValidator<C> {
    pub fn new(conformance: C) -> Self {
        Self { conformance }
    }

    /// Raw messages from the object-name rule, unwrapped.
    pub fn validate_name(&self, name: &str, prefix: bool) -> Vec<String> {
        self.conformance.name_is_dns_subdomain(name, prefix)
    }

    pub fn validate_secret_reference(&self, secret_ref: &SecretReference, path: &FieldPath) -> ErrorList {
        let mut errs = ErrorList::new();
        if is_empty(secret_ref.name.as_deref()) {
            errs.push(FieldError::required(path.child("name"), "must provide a name"));
        }
        if is_empty(secret_ref.namespace.as_deref()) {
            errs.push(FieldError::required(path.child("namespace"), "must provide a namespace"));
        }
        errs
    }

    pub fn validate_no_consecutive_hyphens(&self, name: &str, path: &FieldPath) -> ErrorList {
        let mut errs = ErrorList::new();
        if name.contains("--") {
            errs.push(FieldError::invalid(path.clone(), name, "name may not contain two consecutive hyphens"));
        }
        errs
    }

    pub fn validate_dns1123_subdomain(&self, value: &str, path: &FieldPath) -> ErrorList {
        let errs = wrap_invalid(self.conformance.dns1123_subdomain(value), value, path);
        trace!(path = %path, violations = errs.len(), "dns1123 subdomain checked");
        errs
    }

    pub fn validate_dns1123_label(&self, value: &str, path: &FieldPath) -> ErrorList {
        let errs = wrap_invalid(self.conformance.dns1123_label(value), value, path);
        trace!(path = %path, violations = errs.len(), "dns1123 label checked");
        errs
    }
}

fn is_empty(v: Option<&str>) -> bool {
    v.map(str::is_empty).unwrap_or(true)
}

fn wrap_invalid(msgs: Vec<String>, value: &str, path: &FieldPath) -> ErrorList {
    msgs.into_iter().map(|msg| FieldError::invalid(path.clone(), value, msg)).collect()
}

/// Object-name check with the stock rules.
pub fn validate_name(name: &str, prefix: bool) -> Vec<String> {
    FieldValidator::<Rfc1123>::default().validate_name(name, prefix)
}

pub fn validate_secret_reference(secret_ref: &SecretReference, path: &FieldPath) -> ErrorList {
    FieldValidator::<Rfc1123>::default().validate_secret_reference(secret_ref, path)
}

pub fn validate_no_consecutive_hyphens(name: &str, path: &FieldPath) -> ErrorList {
    FieldValidator::<Rfc1123>::default().validate_no_consecutive_hyphens(name, path)
}

pub fn validate_dns1123_subdomain(value: &str, path: &FieldPath) -> ErrorList {
    FieldValidator::<Rfc1123>::default().validate_dns1123_subdomain(value, path)
}

pub fn validate_dns1123_label(value: &str, path: &FieldPath) -> ErrorList {
    FieldValidator::<Rfc1123>::default().validate_dns1123_label(value, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcheck_core::{BadValue, ErrorType};

    /// Reports a fixed set of messages for every value and records nothing else.
    struct Fake(Vec<&'static str>);

    impl Conformance for Fake {
        fn dns1123_subdomain(&self, _value: &str) -> Vec<String> { self.0.iter().map(|s| s.to_string()).collect() }
        fn dns1123_label(&self, _value: &str) -> Vec<String> { vec!["label".into()] }
        fn valid_percent(&self, _value: &str) -> Vec<String> { Vec::new() }
    }

    fn secret(name: Option<&str>, namespace: Option<&str>) -> SecretReference {
        SecretReference { name: name.map(String::from), namespace: namespace.map(String::from) }
    }

    #[test]
    fn secret_reference_missing_both_yields_two_errors() {
        let path = FieldPath::new("spec").child("secretRef");
        let errs = validate_secret_reference(&secret(Some(""), Some("")), &path);
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.error_type == ErrorType::Required));
        assert_eq!(errs.as_slice()[0].path.to_string(), "spec.secretRef.name");
        assert_eq!(errs.as_slice()[1].path.to_string(), "spec.secretRef.namespace");
        assert_eq!(errs.as_slice()[0].bad_value, BadValue::Omitted);
    }

    #[test]
    fn secret_reference_unset_counts_as_empty() {
        let path = FieldPath::new("ref");
        assert_eq!(validate_secret_reference(&secret(None, None), &path).len(), 2);
        let only_ns = validate_secret_reference(&secret(Some("s"), None), &path);
        assert_eq!(only_ns.len(), 1);
        assert_eq!(only_ns.as_slice()[0].detail, "must provide a namespace");
        assert!(validate_secret_reference(&secret(Some("s"), Some("garden")), &path).is_empty());
    }

    #[test]
    fn consecutive_hyphens() {
        let path = FieldPath::new("metadata").child("name");
        let errs = validate_no_consecutive_hyphens("foo--bar", &path);
        assert_eq!(errs.len(), 1);
        let e = &errs.as_slice()[0];
        assert_eq!(e.error_type, ErrorType::Invalid);
        assert_eq!(e.path, path);
        assert_eq!(e.bad_value, BadValue::Value("\"foo--bar\"".into()));
        assert!(validate_no_consecutive_hyphens("foo-bar", &path).is_empty());
        assert_eq!(validate_no_consecutive_hyphens("a---b", &path).len(), 1);
    }

    #[test]
    fn dns_checks_wrap_each_message() {
        let path = FieldPath::new("spec").child("domain");
        let v = FieldValidator::new(Fake(vec!["one", "two", "three"]));
        let errs = v.validate_dns1123_subdomain("whatever", &path);
        let details: Vec<_> = errs.iter().map(|e| e.detail.as_str()).collect();
        assert_eq!(details, vec!["one", "two", "three"]);
        assert!(errs.iter().all(|e| e.error_type == ErrorType::Invalid && e.path == path));

        let v = FieldValidator::new(Fake(vec![]));
        assert!(v.validate_dns1123_subdomain("whatever", &path).is_empty());
        assert_eq!(v.validate_dns1123_label("x", &path).len(), 1);
    }

    #[test]
    fn name_is_a_pass_through() {
        let v = FieldValidator::new(Fake(vec!["nope"]));
        assert_eq!(v.validate_name("anything", false), vec!["nope".to_string()]);
        assert!(validate_name("garden-dev", false).is_empty());
        assert!(validate_name("garden-", true).is_empty());
        assert_eq!(validate_name("garden-", false).len(), 1);
    }

    #[test]
    fn stock_dns_rules() {
        let path = FieldPath::new("spec").child("dns").child("domain");
        assert!(validate_dns1123_subdomain("shoot.example.com", &path).is_empty());
        assert_eq!(validate_dns1123_subdomain("Shoot.example.com", &path).len(), 1);
        assert!(validate_dns1123_label("worker-1", &path).is_empty());
        assert_eq!(validate_dns1123_label("worker.1", &path).len(), 1);
        assert_eq!(validate_dns1123_label(&"x".repeat(70), &path).len(), 1);
    }
}
