use core::str::FromStr;

use serde::{Deserialize, Serialize};

use workforce_core::{
    AppError, AppResult, Blank, DepartmentId, Filter, Merge, UserId, merge_field, parse_filter,
    parse_text_filter, validate_uri,
};

use crate::resource::{Resource, ResourceKind};
use crate::validate;

pub const IDENTITY_NUMBER_MIN: usize = 5;
pub const IDENTITY_NUMBER_MAX: usize = 33;
pub const NAME_MIN: usize = 4;
pub const NAME_MAX: usize = 33;

/// Identity number, unique within one owner's employees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityNumber(String);

impl IdentityNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for IdentityNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Blank for IdentityNumber {
    fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(AppError::bad_request("gender must be male or female")),
        }
    }
}

impl Blank for Gender {
    fn is_blank(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub identity_number: IdentityNumber,
    pub name: String,
    pub gender: Gender,
    pub department_id: DepartmentId,
    pub image_uri: String,
    pub owner: UserId,
}

/// Validated create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub identity_number: IdentityNumber,
    pub name: String,
    pub gender: Gender,
    pub department_id: DepartmentId,
    pub image_uri: String,
}

impl NewEmployee {
    pub fn try_new(
        identity_number: &str,
        name: &str,
        gender: &str,
        department_id: &str,
        image_uri: &str,
    ) -> AppResult<Self> {
        let identity_number = validate::required_len(
            "identityNumber",
            identity_number,
            IDENTITY_NUMBER_MIN,
            IDENTITY_NUMBER_MAX,
        )?;
        let name = validate::required_len("name", name, NAME_MIN, NAME_MAX)?;
        let gender = gender.parse::<Gender>()?;
        let department_id = department_id
            .parse::<DepartmentId>()
            .map_err(|_| AppError::bad_request("departmentId must be a positive integer"))?;
        if image_uri.is_empty() {
            return Err(AppError::bad_request("employeeImageUri is required"));
        }
        let image_uri = validate_uri(image_uri, "image uri")?;

        Ok(Self {
            identity_number: IdentityNumber::new(identity_number),
            name,
            gender,
            department_id,
            image_uri,
        })
    }
}

/// Validated patch payload. Absent and empty fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub identity_number: Option<IdentityNumber>,
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub department_id: Option<DepartmentId>,
    pub image_uri: Option<String>,
}

impl EmployeePatch {
    pub fn try_new(
        identity_number: Option<&str>,
        name: Option<&str>,
        gender: Option<&str>,
        department_id: Option<&str>,
        image_uri: Option<&str>,
    ) -> AppResult<Self> {
        let identity_number = validate::optional_len(
            "identityNumber",
            non_empty(identity_number),
            IDENTITY_NUMBER_MIN,
            IDENTITY_NUMBER_MAX,
        )?
        .map(IdentityNumber::new);
        let name = validate::optional_len("name", non_empty(name), NAME_MIN, NAME_MAX)?;
        let gender = non_empty(gender).map(str::parse::<Gender>).transpose()?;
        let department_id = non_empty(department_id)
            .map(str::parse::<DepartmentId>)
            .transpose()
            .map_err(|_| AppError::bad_request("departmentId must be a positive integer"))?;
        let image_uri = non_empty(image_uri)
            .map(|uri| validate_uri(uri, "image uri"))
            .transpose()?;

        Ok(Self {
            identity_number,
            name,
            gender,
            department_id,
            image_uri,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

impl Merge<EmployeePatch> for Employee {
    fn merge(&self, patch: &EmployeePatch) -> Self {
        Self {
            identity_number: merge_field(&self.identity_number, patch.identity_number.as_ref()),
            name: merge_field(&self.name, patch.name.as_ref()),
            gender: merge_field(&self.gender, patch.gender.as_ref()),
            department_id: merge_field(&self.department_id, patch.department_id.as_ref()),
            image_uri: merge_field(&self.image_uri, patch.image_uri.as_ref()),
            owner: self.owner,
        }
    }
}

/// Listing filter. All present criteria are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub identity_number_prefix: Option<String>,
    pub name: Option<String>,
    pub gender: Filter<Gender>,
    pub department_id: Filter<DepartmentId>,
}

impl EmployeeFilter {
    pub fn from_query(
        identity_number: Option<&str>,
        name: Option<&str>,
        gender: Option<&str>,
        department_id: Option<&str>,
    ) -> Self {
        Self {
            identity_number_prefix: parse_text_filter(identity_number),
            name: parse_text_filter(name),
            gender: parse_filter(gender),
            department_id: parse_filter(department_id),
        }
    }

    pub fn is_unsatisfiable(&self) -> bool {
        self.gender.is_unsatisfiable() || self.department_id.is_unsatisfiable()
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        let prefix_ok = self.identity_number_prefix.as_deref().is_none_or(|p| {
            employee
                .identity_number
                .as_str()
                .to_lowercase()
                .starts_with(&p.to_lowercase())
        });
        let name_ok = self
            .name
            .as_deref()
            .is_none_or(|n| employee.name.to_lowercase().contains(&n.to_lowercase()));

        prefix_ok
            && name_ok
            && self.gender.matches(&employee.gender)
            && self.department_id.matches(&employee.department_id)
    }
}

impl Resource for Employee {
    const KIND: ResourceKind = ResourceKind::Employee;

    type Key = IdentityNumber;
    type Record = Employee;
    type Draft = NewEmployee;
    type Patch = EmployeePatch;
    type Filter = EmployeeFilter;

    fn key(record: &Employee) -> IdentityNumber {
        record.identity_number.clone()
    }

    fn draft_key(draft: &NewEmployee) -> Option<&IdentityNumber> {
        Some(&draft.identity_number)
    }

    fn draft_reference(draft: &NewEmployee) -> Option<DepartmentId> {
        Some(draft.department_id)
    }

    fn patch_key(patch: &EmployeePatch) -> Option<&IdentityNumber> {
        patch.identity_number.as_ref()
    }

    fn patch_reference(patch: &EmployeePatch) -> Option<DepartmentId> {
        patch.department_id
    }

    fn filter_is_unsatisfiable(filter: &EmployeeFilter) -> bool {
        filter.is_unsatisfiable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Employee {
        Employee {
            identity_number: IdentityNumber::new("ID-12345"),
            name: "Alice Doe".to_string(),
            gender: Gender::Female,
            department_id: DepartmentId::new(1),
            image_uri: "https://cdn.example.com/alice.png".to_string(),
            owner: UserId::new(3),
        }
    }

    #[test]
    fn create_payload_is_validated() {
        let ok = NewEmployee::try_new("ID-12345", "Alice Doe", "female", "1", "https://cdn.example.com/a.png");
        assert!(ok.is_ok());

        let cases = [
            ("ID-1", "Alice Doe", "female", "1", "https://cdn.example.com/a.png"),
            ("ID-12345", "Al", "female", "1", "https://cdn.example.com/a.png"),
            ("ID-12345", "Alice Doe", "other", "1", "https://cdn.example.com/a.png"),
            ("ID-12345", "Alice Doe", "female", "0", "https://cdn.example.com/a.png"),
            ("ID-12345", "Alice Doe", "female", "abc", "https://cdn.example.com/a.png"),
            ("ID-12345", "Alice Doe", "female", "1", ""),
            ("ID-12345", "Alice Doe", "female", "1", "http://intranet/a.png"),
        ];
        for (id, name, gender, dept, uri) in cases {
            let err = NewEmployee::try_new(id, name, gender, dept, uri).unwrap_err();
            assert_eq!(err.kind(), workforce_core::ErrorKind::BadRequest, "{id} {name} {gender} {dept} {uri}");
        }
    }

    #[test]
    fn invalid_image_uri_names_the_field() {
        let err = NewEmployee::try_new("ID-12345", "Alice Doe", "male", "2", "nope").unwrap_err();
        assert_eq!(err.message(), "invalid image uri");
    }

    #[test]
    fn patch_ignores_empty_fields() {
        let patch = EmployeePatch::try_new(Some(""), None, Some(""), Some(""), Some("")).unwrap();
        assert_eq!(patch, EmployeePatch::default());
        assert_eq!(alice().merge(&patch), alice());
    }

    #[test]
    fn patch_validates_present_fields() {
        assert!(EmployeePatch::try_new(None, None, Some("x"), None, None).is_err());
        assert!(EmployeePatch::try_new(None, None, None, Some("-3"), None).is_err());
        assert!(EmployeePatch::try_new(Some("1234"), None, None, None, None).is_err());
    }

    #[test]
    fn merge_touches_only_present_fields() {
        let patch = EmployeePatch::try_new(None, Some("Alice Roe"), None, Some("4"), None).unwrap();
        let merged = alice().merge(&patch);

        assert_eq!(merged.name, "Alice Roe");
        assert_eq!(merged.department_id, DepartmentId::new(4));
        assert_eq!(merged.identity_number, alice().identity_number);
        assert_eq!(merged.gender, Gender::Female);
        assert_eq!(merged.image_uri, alice().image_uri);
        assert_eq!(merged.merge(&patch), merged);
    }

    #[test]
    fn filters_are_anded() {
        let filter = EmployeeFilter::from_query(Some("id-"), Some("doe"), Some("female"), Some("1"));
        assert!(filter.matches(&alice()));

        let filter = EmployeeFilter::from_query(None, None, Some("male"), None);
        assert!(!filter.matches(&alice()));

        let filter = EmployeeFilter::from_query(Some("12345"), None, None, None);
        assert!(!filter.matches(&alice()));
    }

    #[test]
    fn invalid_enum_filters_are_unsatisfiable() {
        assert!(EmployeeFilter::from_query(None, None, Some("robot"), None).is_unsatisfiable());
        assert!(EmployeeFilter::from_query(None, None, None, Some("0")).is_unsatisfiable());
        assert!(!EmployeeFilter::from_query(None, None, Some(""), Some("")).is_unsatisfiable());
    }
}
