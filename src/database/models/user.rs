use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Closed set of platform roles carried in the identity claim and on the
/// user record. Stored as text in the `account_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Student,
    Instructor,
    Admin,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown account type: {0}")]
pub struct UnknownAccountType(String);

impl TryFrom<String> for AccountType {
    type Error = UnknownAccountType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Student" => Ok(AccountType::Student),
            "Instructor" => Ok(AccountType::Instructor),
            "Admin" => Ok(AccountType::Admin),
            _ => Err(UnknownAccountType(value)),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AccountType::Student => "Student",
            AccountType::Instructor => "Instructor",
            AccountType::Admin => "Admin",
        };
        write!(f, "{}", s)
    }
}

/// User record from the `users` table.
///
/// `courses` holds authored courses for instructors and enrollments for
/// students (the bidirectional half owned by the user).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub account_type: AccountType,
    pub image: Option<String>,
    pub courses: Vec<Uuid>,
    pub additional_details: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Extended profile record from the `profiles` table, expanded inline when
/// an instructor is resolved on a course detail read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub about: Option<String>,
    pub contact_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_round_trips_through_text() {
        for (text, role) in [
            ("Student", AccountType::Student),
            ("Instructor", AccountType::Instructor),
            ("Admin", AccountType::Admin),
        ] {
            assert_eq!(AccountType::try_from(text.to_string()).unwrap(), role);
            assert_eq!(role.to_string(), text);
        }
    }

    #[test]
    fn account_type_rejects_unknown_text() {
        assert!(AccountType::try_from("Superuser".to_string()).is_err());
    }
}
