//! User accounts and their permission grants.
//!
//! # Responsibility
//! - Define the canonical `User` shape and its permission set.
//! - Provide the raw `StoredUser` shape that legacy payloads decode into.
//!
//! # Invariants
//! - `password_hash` is an Argon2 PHC string, or empty when no password
//!   could be recovered for a legacy record (such users cannot log in).
//! - `AllowedCompanies` keeps first-seen order and never holds duplicates.
//! - The wildcard token is only meaningful as stored data, never as a
//!   company name being checked.

use super::null_as_default;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Stored token that grants access to every company.
pub const COMPANY_WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// Companies a non-admin user may view and operate on.
///
/// Persisted as a JSON array; `["*"]` is the wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedCompanies {
    All,
    Only(Vec<String>),
}

impl AllowedCompanies {
    /// No company access.
    pub fn none() -> Self {
        Self::Only(Vec::new())
    }

    /// Builds a grant from company names, deduplicated in first-seen order.
    ///
    /// A wildcard entry anywhere in the input yields `All`.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut companies: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if name == COMPANY_WILDCARD {
                return Self::All;
            }
            if !companies.contains(&name) {
                companies.push(name);
            }
        }
        Self::Only(companies)
    }

    /// Exact, case-sensitive membership test.
    pub fn permits(&self, company: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(companies) => companies.iter().any(|allowed| allowed == company),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Explicitly listed companies; empty for the wildcard.
    pub fn companies(&self) -> &[String] {
        match self {
            Self::All => &[],
            Self::Only(companies) => companies,
        }
    }
}

impl Default for AllowedCompanies {
    fn default() -> Self {
        Self::none()
    }
}

impl Serialize for AllowedCompanies {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => [COMPANY_WILDCARD].serialize(serializer),
            Self::Only(companies) => companies.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for AllowedCompanies {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::from_names(names))
    }
}

/// Stored permission fields; ignored for admins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Permissions {
    pub can_edit: bool,
    pub allowed_companies: AllowedCompanies,
}

impl Permissions {
    /// Edit rights over every company.
    pub fn full() -> Self {
        Self {
            can_edit: true,
            allowed_companies: AllowedCompanies::All,
        }
    }

    pub fn read_only(allowed_companies: AllowedCompanies) -> Self {
        Self {
            can_edit: false,
            allowed_companies,
        }
    }
}

/// Canonical user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
    pub permissions: Permissions,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Create/update request for a user.
///
/// `password` is plaintext input. `None` (or empty) on update keeps the
/// stored hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    /// `None` creates a new user with a generated id.
    pub id: Option<String>,
    pub username: String,
    pub password: Option<String>,
    pub display_name: String,
    pub role: Role,
    pub permissions: Permissions,
}

impl UserDraft {
    /// Draft for a new user.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        permissions: Permissions,
    ) -> Self {
        Self {
            id: None,
            username: username.into(),
            password: Some(password.into()),
            display_name: display_name.into(),
            role,
            permissions,
        }
    }

    /// Draft that edits `user` in place without touching its password.
    pub fn editing(user: &User) -> Self {
        Self {
            id: Some(user.id.clone()),
            username: user.username.clone(),
            password: None,
            display_name: user.display_name.clone(),
            role: user.role,
            permissions: user.permissions.clone(),
        }
    }

    /// Plaintext password, treating an empty string as absent.
    pub fn supplied_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|value| !value.is_empty())
    }
}

/// Raw persisted user shape, including legacy fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub password_hash: Option<String>,
    /// Plaintext password written by older versions.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: Role,
    #[serde(default)]
    pub permissions: Option<Permissions>,
}
