use serde::{Deserialize, Serialize};

use workforce_core::{AppResult, DepartmentId, Merge, UserId, merge_field};

use crate::resource::{Resource, ResourceKind};
use crate::validate;

pub const NAME_MIN: usize = 4;
pub const NAME_MAX: usize = 33;

/// A department owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub owner: UserId,
}

/// Validated create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDepartment {
    pub name: String,
}

impl NewDepartment {
    pub fn try_new(name: &str) -> AppResult<Self> {
        Ok(Self {
            name: validate::required_len("name", name, NAME_MIN, NAME_MAX)?,
        })
    }
}

/// Validated patch payload. Only the name is mutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentPatch {
    pub name: Option<String>,
}

impl DepartmentPatch {
    pub fn try_new(name: Option<&str>) -> AppResult<Self> {
        Ok(Self {
            name: validate::optional_len("name", name, NAME_MIN, NAME_MAX)?,
        })
    }
}

impl Merge<DepartmentPatch> for Department {
    fn merge(&self, patch: &DepartmentPatch) -> Self {
        Self {
            id: self.id,
            name: merge_field(&self.name, patch.name.as_ref()),
            owner: self.owner,
        }
    }
}

/// Case-insensitive substring match on the name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentFilter {
    pub name: Option<String>,
}

impl DepartmentFilter {
    pub fn matches(&self, department: &Department) -> bool {
        self.name
            .as_deref()
            .is_none_or(|needle| department.name.to_lowercase().contains(&needle.to_lowercase()))
    }
}

impl Resource for Department {
    const KIND: ResourceKind = ResourceKind::Department;

    type Key = DepartmentId;
    type Record = Department;
    type Draft = NewDepartment;
    type Patch = DepartmentPatch;
    type Filter = DepartmentFilter;

    fn key(record: &Department) -> DepartmentId {
        record.id
    }

    fn draft_key(_: &NewDepartment) -> Option<&DepartmentId> {
        None
    }

    fn draft_reference(_: &NewDepartment) -> Option<DepartmentId> {
        None
    }

    fn patch_key(_: &DepartmentPatch) -> Option<&DepartmentId> {
        None
    }

    fn patch_reference(_: &DepartmentPatch) -> Option<DepartmentId> {
        None
    }

    fn filter_is_unsatisfiable(_: &DepartmentFilter) -> bool {
        false
    }
}
