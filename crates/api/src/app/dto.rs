use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use serde::{Deserialize, Serialize};

use workforce_directory::{Department, Employee, User};

use crate::app::errors::ApiError;

/// `Json` whose rejections render as `BadRequest` error bodies.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Raw query pairs in request order. Repeated keys resolve to their first value.
#[derive(Debug, Default, Deserialize, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
#[serde(transparent)]
pub struct QueryPairs(pub Vec<(String, String)>);

impl QueryPairs {
    pub fn first(&self, key: &str) -> Option<String> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }
}

/// `Multipart` whose rejections render as `BadRequest` error bodies.
pub struct MultipartBody(pub Multipart);

#[async_trait]
impl<S> FromRequest<S> for MultipartBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Multipart::from_request(req, state).await?))
    }
}

// -------------------------
// Request DTOs
// -------------------------

/// Missing fields deserialize as empty and fail validation downstream.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
    pub action: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub user_image_uri: Option<String>,
    pub company_name: Option<String>,
    pub company_image_uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateDepartmentRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
}

#[derive(Debug, Default)]
pub struct ListDepartmentsQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub name: Option<String>,
}

impl From<QueryPairs> for ListDepartmentsQuery {
    fn from(pairs: QueryPairs) -> Self {
        Self {
            limit: pairs.first("limit"),
            offset: pairs.first("offset"),
            name: pairs.first("name"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub identity_number: String,
    pub name: String,
    pub gender: String,
    pub department_id: String,
    pub employee_image_uri: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub identity_number: Option<String>,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub department_id: Option<String>,
    pub employee_image_uri: Option<String>,
}

#[derive(Debug, Default)]
pub struct ListEmployeesQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub identity_number: Option<String>,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub department_id: Option<String>,
}

impl From<QueryPairs> for ListEmployeesQuery {
    fn from(pairs: QueryPairs) -> Self {
        Self {
            limit: pairs.first("limit"),
            offset: pairs.first("offset"),
            identity_number: pairs.first("identityNumber"),
            name: pairs.first("name"),
            gender: pairs.first("gender"),
            department_id: pairs.first("departmentId"),
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub email: String,
    pub name: String,
    pub user_image_uri: String,
    pub company_name: String,
    pub company_image_uri: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name.unwrap_or_default(),
            user_image_uri: user.image_uri.unwrap_or_default(),
            company_name: user.company_name.unwrap_or_default(),
            company_image_uri: user.company_image_uri.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub department_id: String,
    pub name: String,
}

impl From<Department> for DepartmentResponse {
    fn from(department: Department) -> Self {
        Self {
            department_id: department.id.to_string(),
            name: department.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub identity_number: String,
    pub name: String,
    pub gender: &'static str,
    pub department_id: String,
    pub employee_image_uri: String,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            identity_number: employee.identity_number.to_string(),
            name: employee.name,
            gender: employee.gender.as_str(),
            department_id: employee.department_id.to_string(),
            employee_image_uri: employee.image_uri,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use workforce_core::{DepartmentId, UserId};
    use workforce_directory::{Gender, IdentityNumber};

    #[test]
    fn unset_profile_fields_render_empty() {
        let body = serde_json::to_value(ProfileResponse::from(User::new(UserId::new(1), "a@x.com", "d"))).unwrap();
        assert_eq!(
            body,
            json!({"email": "a@x.com", "name": "", "userImageUri": "", "companyName": "", "companyImageUri": ""})
        );
    }

    #[test]
    fn employee_projection_uses_string_department_id() {
        let employee = Employee {
            identity_number: IdentityNumber::new("ID-12345"),
            name: "Alice Doe".into(),
            gender: Gender::Female,
            department_id: DepartmentId::new(7),
            image_uri: "https://cdn.example.com/a.png".into(),
            owner: UserId::new(1),
        };
        let body = serde_json::to_value(EmployeeResponse::from(employee)).unwrap();
        assert_eq!(body["departmentId"], "7");
        assert_eq!(body["gender"], "female");
        assert!(body.get("owner").is_none());
    }

    #[test]
    fn repeated_query_keys_take_the_first_value() {
        let pairs = QueryPairs(vec![
            ("limit".into(), "1".into()),
            ("limit".into(), "2".into()),
            ("departmentId".into(), "3".into()),
        ]);
        let query = ListEmployeesQuery::from(pairs);
        assert_eq!(query.limit.as_deref(), Some("1"));
        assert_eq!(query.department_id.as_deref(), Some("3"));
        assert!(query.offset.is_none());
    }

    #[test]
    fn missing_request_fields_default_to_empty() {
        let req: AuthRequest = serde_json::from_value(json!({"email": "a@x.com"})).unwrap();
        assert_eq!(req.password, "");
        let patch: UpdateEmployeeRequest = serde_json::from_value(json!({"name": null})).unwrap();
        assert!(patch.name.is_none());
    }
}
