//! Append-only policy for list fields.
//!
//! A list field that must not be rewritten may still grow at the end. The
//! predicate here tells the caller whether an update is such a trailing
//! append, and the `validate_*` helpers turn the answer into field errors.

use std::fmt::Debug;

use fieldcheck_core::{ErrorList, FieldError, FieldPath};
use tracing::trace;

pub const FIELD_IS_IMMUTABLE: &str = "field is immutable";

/// Returns `false` only when `new` is `old` with extra elements appended at
/// the end. Shrinking, reordering, replacing or inserting anywhere but the
/// tail returns `true`.
///
/// Equal lengths always return `true`, identical lists included; callers
/// that must accept no-op updates compare the values themselves (see
/// [`validate_append_only`]).
pub fn should_enforce_immutability<T: PartialEq>(new: &[T], old: &[T]) -> bool {
    let mut cur = new;
    loop {
        if cur.len() <= old.len() {
            trace!(new_len = new.len(), old_len = old.len(), "not a trailing append; enforcing");
            return true;
        }
        // peel the surplus off the tail and compare what remains
        let head = &cur[..old.len()];
        if head == old {
            trace!(appended = new.len() - old.len(), "trailing append");
            return false;
        }
        cur = head;
    }
}

/// One `Invalid` error at `path` when `new` differs from `old`.
pub fn validate_immutable_field<T: PartialEq + Debug + ?Sized>(new: &T, old: &T, path: &FieldPath) -> ErrorList {
    let mut errs = ErrorList::new();
    if new != old {
        errs.push(FieldError::invalid(path.clone(), new, FIELD_IS_IMMUTABLE));
    }
    errs
}

/// Immutability check for a list that may only grow at the end.
pub fn validate_append_only<T: PartialEq + Debug>(new: &[T], old: &[T], path: &FieldPath) -> ErrorList {
    if !should_enforce_immutability(new, old) {
        return ErrorList::new();
    }
    validate_immutable_field(new, old, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_append_is_allowed() {
        assert!(!should_enforce_immutability(&["a", "b", "c"], &["a", "b"]));
        assert!(!should_enforce_immutability(&["a", "b", "c", "d"], &["a", "b"]));
        assert!(!should_enforce_immutability(&["a"], &[]));
    }

    #[test]
    fn reorder_and_middle_insert_are_enforced() {
        assert!(should_enforce_immutability(&["b", "a"], &["a", "b"]));
        assert!(should_enforce_immutability(&["a", "x", "b"], &["a", "b"]));
        assert!(should_enforce_immutability(&["x", "a", "b"], &["a", "b"]));
        assert!(should_enforce_immutability(&["a", "c", "d"], &["a", "b"]));
    }

    #[test]
    fn shrinking_is_enforced() {
        assert!(should_enforce_immutability(&["a"], &["a", "b"]));
        assert!(should_enforce_immutability::<&str>(&[], &["a"]));
    }

    // Identical lists are not exempted; the predicate only recognises growth.
    #[test]
    fn identical_lists_are_enforced() {
        assert!(should_enforce_immutability(&["a", "b"], &["a", "b"]));
        assert!(should_enforce_immutability::<&str>(&[], &[]));
    }

    #[test]
    fn works_for_any_comparable_element() {
        assert!(!should_enforce_immutability(&[1, 2, 3], &[1, 2]));
        assert!(should_enforce_immutability(&[2, 1, 3], &[1, 2]));
    }

    #[test]
    fn append_only_reports_changes_but_not_no_ops() {
        let path = FieldPath::new("spec").child("dnsNames");
        let old = ["a", "b"];
        assert!(validate_append_only(&old, &old, &path).is_empty());
        assert!(validate_append_only(&["a", "b", "c"], &old, &path).is_empty());

        let errs = validate_append_only(&["b", "a"], &old, &path);
        assert_eq!(errs.len(), 1);
        let e = &errs.as_slice()[0];
        assert_eq!(e.detail, FIELD_IS_IMMUTABLE);
        assert_eq!(e.path, path);
        assert_eq!(e.to_string(), "spec.dnsNames: Invalid value: [\"b\", \"a\"]: field is immutable");

        assert_eq!(validate_append_only(&["a"], &old, &path).len(), 1);
    }

    #[test]
    fn immutable_scalar_field() {
        let path = FieldPath::new("spec").child("region");
        assert!(validate_immutable_field("eu-1", "eu-1", &path).is_empty());
        assert_eq!(validate_immutable_field("eu-2", "eu-1", &path).len(), 1);
    }
}
