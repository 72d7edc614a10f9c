//! User profile types
//!
//! Profile of the account the access token was issued for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user's private profile (`GET /v3/users/me`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateUserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
