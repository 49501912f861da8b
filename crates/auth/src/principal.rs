use serde::{Deserialize, Serialize};

use workforce_core::UserId;

/// Authenticated identity derived from a verified token.
///
/// Lives for one request and is never persisted. Every department and employee
/// operation is scoped to `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
}

impl Principal {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    /// Owner scope for department and employee rows.
    pub fn owner(&self) -> UserId {
        self.user_id
    }
}
