//! Partial-update merge engine.
//!
//! Policy, applied per field: a patch value that is present and non-empty
//! replaces the stored value; anything else keeps the stored value.
//!
//! A patch field is modelled as `Option<T>`. `None` covers both "absent" and
//! "explicit null". A present value equal to the zero value of its type (empty
//! string, zero id) counts as not provided, so this API cannot clear a field.

use crate::id::{DepartmentId, UserId};

/// Whether a value is the "not provided" sentinel of its type.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for i64 {
    fn is_blank(&self) -> bool {
        *self == 0
    }
}

impl Blank for DepartmentId {
    fn is_blank(&self) -> bool {
        self.get() == 0
    }
}

impl Blank for UserId {
    fn is_blank(&self) -> bool {
        self.get() == 0
    }
}

impl<T: Blank + ?Sized> Blank for &T {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

impl<T: Blank> Blank for Option<T> {
    fn is_blank(&self) -> bool {
        self.as_ref().is_none_or(Blank::is_blank)
    }
}

/// The patch value when it would replace the stored one, `None` otherwise.
pub fn present<T: Blank>(patch: Option<&T>) -> Option<&T> {
    patch.filter(|v| !v.is_blank())
}

/// Merge a required field.
pub fn merge_field<T: Blank + Clone>(existing: &T, patch: Option<&T>) -> T {
    present(patch).unwrap_or(existing).clone()
}

/// Merge a nullable field. A null or blank patch never erases the stored value.
pub fn merge_optional<T: Blank + Clone>(existing: Option<&T>, patch: Option<&T>) -> Option<T> {
    present(patch).or(existing).cloned()
}

/// Types that can absorb a patch of type `P` under the merge policy.
pub trait Merge<P> {
    fn merge(&self, patch: &P) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn present_value_replaces() {
        let merged = merge_field(&"old".to_string(), Some(&"new".to_string()));
        assert_eq!(merged, "new");
    }

    #[test]
    fn absent_or_empty_value_keeps_existing() {
        let existing = "old".to_string();
        assert_eq!(merge_field(&existing, None), "old");
        assert_eq!(merge_field(&existing, Some(&String::new())), "old");
    }

    #[test]
    fn zero_id_counts_as_not_provided() {
        let existing = DepartmentId::new(3);
        assert_eq!(merge_field(&existing, Some(&DepartmentId::new(0))), existing);
        assert_eq!(
            merge_field(&existing, Some(&DepartmentId::new(8))),
            DepartmentId::new(8)
        );
    }

    #[test]
    fn optional_fields_never_erase() {
        let existing = Some("acme".to_string());
        assert_eq!(merge_optional(existing.as_ref(), None), existing);
        assert_eq!(merge_optional(existing.as_ref(), Some(&String::new())), existing);
        assert_eq!(merge_optional::<String>(None, None), None);
        assert_eq!(
            merge_optional(None, Some(&"globex".to_string())),
            Some("globex".to_string())
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Applying the same patch twice ends in the same state as applying it once.
        #[test]
        fn merge_is_idempotent(existing in ".{0,12}", patch in proptest::option::of(".{0,12}")) {
            let once = merge_field(&existing, patch.as_ref());
            let twice = merge_field(&once, patch.as_ref());
            prop_assert_eq!(once, twice);
        }

        /// The result is always either the stored value or the present patch value.
        #[test]
        fn merge_picks_patch_only_when_non_empty(existing in ".{0,12}", patch in proptest::option::of(".{0,12}")) {
            let merged = merge_field(&existing, patch.as_ref());
            match patch {
                Some(p) if !p.is_empty() => prop_assert_eq!(merged, p),
                _ => prop_assert_eq!(merged, existing),
            }
        }
    }
}
