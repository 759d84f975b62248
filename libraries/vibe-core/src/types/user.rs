/// User domain type
use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Login email, stored lowercased
    pub email: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}
