use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// Serialized names match what the browser client has always written.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "Loan Seeker")]
    LoanSeeker,
    Admin,
    #[serde(rename = "User (Work Provider)")]
    WorkProvider,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::LoanSeeker => "Loan Seeker",
            Role::Admin => "Admin",
            Role::WorkProvider => "User (Work Provider)",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password_hash: String, // bcrypt
    // Plaintext written by older clients. Kept as stored until the first
    // successful login replaces it with a hash.
    #[serde(default, rename = "password", skip_serializing_if = "Option::is_none")]
    pub legacy_password: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// True when the user lists at least one of `skills`.
    pub fn shares_skill_with(&self, skills: &BTreeSet<String>) -> bool {
        !self.skills.is_disjoint(skills)
    }
}

/// What leaves the service about a user: everything except the password hash.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            avatar_url: user.avatar_url.clone(),
            skills: user.skills.clone(),
            bio: user.bio.clone(),
        }
    }
}
