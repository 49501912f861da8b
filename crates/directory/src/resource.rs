//! Resource kinds and the hooks the generic invariant protocol needs.
//!
//! Department and Employee are the only owner-scoped resources. Each plugs
//! its key, referential field and filter into [`Resource`]; the protocol
//! itself lives in [`crate::service::ResourceService`].

use core::fmt::{Debug, Display};

use workforce_core::{DepartmentId, Merge};

/// Closed set of resources managed by the directory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Department,
    Employee,
}

impl ResourceKind {
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Department => "department",
            ResourceKind::Employee => "employee",
        }
    }

    /// Cause for a key that is missing from the caller's scope.
    pub fn not_found(self) -> &'static str {
        match self {
            ResourceKind::Department => "department not found",
            ResourceKind::Employee => "employee not found",
        }
    }

    /// Cause for a duplicate key within the caller's scope.
    pub fn duplicate(self) -> &'static str {
        match self {
            ResourceKind::Department => "department already exists",
            ResourceKind::Employee => "identity number already exists",
        }
    }

    /// Cause for a referenced department that is missing from the caller's scope.
    pub fn reference_missing(self) -> &'static str {
        "department id for this user not found"
    }

    /// Cause for deleting a row that other rows still reference.
    pub fn still_referenced(self) -> &'static str {
        match self {
            ResourceKind::Department => "still containing employee",
            ResourceKind::Employee => "employee is still referenced",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Entity-specific hooks for the shared create/update/delete/list protocol.
pub trait Resource: Send + Sync + 'static {
    const KIND: ResourceKind;

    /// Owner-scoped key used in paths and uniqueness checks.
    type Key: Clone + PartialEq + Debug + Display + Send + Sync;
    type Record: Merge<Self::Patch> + Clone + Debug + Send + Sync;
    type Draft: Debug + Send + Sync;
    type Patch: Debug + Send + Sync;
    type Filter: Default + Debug + Send + Sync;

    fn key(record: &Self::Record) -> Self::Key;

    /// Caller-chosen key of a draft. `None` when the store assigns it.
    fn draft_key(draft: &Self::Draft) -> Option<&Self::Key>;

    fn draft_reference(draft: &Self::Draft) -> Option<DepartmentId>;

    /// New key carried by a patch, if it changes one.
    fn patch_key(patch: &Self::Patch) -> Option<&Self::Key>;

    fn patch_reference(patch: &Self::Patch) -> Option<DepartmentId>;

    /// A filter that can match nothing short-circuits the listing.
    fn filter_is_unsatisfiable(filter: &Self::Filter) -> bool;
}
