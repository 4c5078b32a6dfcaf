use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::Id;
use crate::lenient;

/// An authenticated user as returned by `/login`, `/register` and `/user`.
///
/// Decoding goes through [`UserRecord`] so a record without an email is
/// rejected instead of cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserRecord")]
pub struct User {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Organization the user belongs to, if any.
    pub organisation_id: Option<Id>,
    pub first_time_login: bool,
    pub refresh_token: Option<String>,
}

impl User {
    /// Up to two uppercase letters for an avatar badge.
    ///
    /// First letter of each of the first two words of the name, or the first
    /// letter of the email when the name is blank.
    #[must_use]
    pub fn initials(&self) -> String {
        let from_name: String = self
            .name
            .split_whitespace()
            .take(2)
            .filter_map(first_upper)
            .collect();
        if !from_name.is_empty() {
            return from_name;
        }
        first_upper(&self.email).map(String::from).unwrap_or_default()
    }

    #[must_use]
    pub const fn is_email_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

fn first_upper(word: &str) -> Option<char> {
    word.chars().next().and_then(|c| c.to_uppercase().next())
}

#[derive(Deserialize)]
struct UserRecord {
    id: Id,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, alias = "emailVerifiedAt", deserialize_with = "lenient::timestamp")]
    email_verified_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient::timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt", deserialize_with = "lenient::timestamp")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "organisationId",
        alias = "organization_id",
        alias = "organizationId"
    )]
    organisation_id: Option<Id>,
    #[serde(default, alias = "firstTimeLogin", deserialize_with = "lenient::flag")]
    first_time_login: bool,
    #[serde(default, alias = "refreshToken", deserialize_with = "lenient::non_blank")]
    refresh_token: Option<String>,
}

impl TryFrom<UserRecord> for User {
    type Error = CoreError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let email = record
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| CoreError::validation(format!("user {} has no email", record.id)))?;

        Ok(Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
            email,
            email_verified_at: record.email_verified_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
            organisation_id: record.organisation_id,
            first_time_login: record.first_time_login,
            refresh_token: record.refresh_token,
        })
    }
}
