use core::str::FromStr;

use workforce_core::{AppError, AppResult, Merge, UserId, merge_field, merge_optional, validate_uri};

use crate::validate;

pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 32;
pub const PROFILE_NAME_MIN: usize = 4;
pub const PROFILE_NAME_MAX: usize = 52;

/// A user account. Optional profile fields are `None` until first set.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_digest: String,
    pub name: Option<String>,
    pub image_uri: Option<String>,
    pub company_name: Option<String>,
    pub company_image_uri: Option<String>,
}

impl User {
    pub fn new(id: UserId, email: impl Into<String>, password_digest: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            password_digest: password_digest.into(),
            name: None,
            image_uri: None,
            company_name: None,
            company_image_uri: None,
        }
    }
}

impl core::fmt::Debug for User {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("company_name", &self.company_name)
            .finish_non_exhaustive()
    }
}

/// The two branches of the authentication action.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthAction {
    Create,
    Login,
}

impl FromStr for AuthAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(AuthAction::Create),
            "login" => Ok(AuthAction::Login),
            _ => Err(AppError::bad_request("action must be create or login")),
        }
    }
}

/// Validated authentication request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub action: AuthAction,
}

impl Credentials {
    pub fn try_new(email: &str, password: &str, action: &str) -> AppResult<Self> {
        Ok(Self {
            email: validate::email("email", email)?,
            password: validate::required_len("password", password, PASSWORD_MIN, PASSWORD_MAX)?,
            action: action.parse()?,
        })
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// Validated profile patch. `None` means absent, null or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub image_uri: Option<String>,
    pub company_name: Option<String>,
    pub company_image_uri: Option<String>,
}

impl UserPatch {
    pub fn try_new(
        email: Option<&str>,
        name: Option<&str>,
        image_uri: Option<&str>,
        company_name: Option<&str>,
        company_image_uri: Option<&str>,
    ) -> AppResult<Self> {
        let present = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_owned);

        let email = present(email).map(|e| validate::email("email", &e)).transpose()?;
        let name = validate::optional_len("name", present(name).as_deref(), PROFILE_NAME_MIN, PROFILE_NAME_MAX)?;
        let company_name = validate::optional_len(
            "companyName",
            present(company_name).as_deref(),
            PROFILE_NAME_MIN,
            PROFILE_NAME_MAX,
        )?;
        let image_uri = present(image_uri)
            .map(|uri| validate_uri(&uri, "image uri"))
            .transpose()?;
        let company_image_uri = present(company_image_uri)
            .map(|uri| validate_uri(&uri, "company image uri"))
            .transpose()?;

        Ok(Self {
            email,
            name,
            image_uri,
            company_name,
            company_image_uri,
        })
    }
}

impl Merge<UserPatch> for User {
    fn merge(&self, patch: &UserPatch) -> Self {
        Self {
            id: self.id,
            email: merge_field(&self.email, patch.email.as_ref()),
            password_digest: self.password_digest.clone(),
            name: merge_optional(self.name.as_ref(), patch.name.as_ref()),
            image_uri: merge_optional(self.image_uri.as_ref(), patch.image_uri.as_ref()),
            company_name: merge_optional(self.company_name.as_ref(), patch.company_name.as_ref()),
            company_image_uri: merge_optional(
                self.company_image_uri.as_ref(),
                patch.company_image_uri.as_ref(),
            ),
        }
    }
}
