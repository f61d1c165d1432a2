//! Error types for the access crate.

use std::fmt;

/// Rejections produced by the authorization policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No username was supplied.
    EmptyUsername,
    /// The username contains whitespace.
    InvalidUsername { username: String },
    /// An admin tried to add themselves.
    SelfTarget,
    /// The super-admin cannot be added to or removed from the admin list.
    SuperAdminTarget,
    /// The username is already in the admin list.
    AlreadyAdmin { username: String },
    /// The username is not in the admin list.
    NotAdmin { username: String },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => {
                write!(f, "username is empty")
            }
            Self::InvalidUsername { username } => {
                write!(f, "'{username}' is not a valid username")
            }
            Self::SelfTarget => {
                write!(f, "admins cannot target themselves")
            }
            Self::SuperAdminTarget => {
                write!(f, "the super-admin cannot be targeted")
            }
            Self::AlreadyAdmin { username } => {
                write!(f, "'{username}' is already an admin")
            }
            Self::NotAdmin { username } => {
                write!(f, "'{username}' is not an admin")
            }
        }
    }
}

impl std::error::Error for AccessError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_user() {
        let err = AccessError::AlreadyAdmin {
            username: "newop".to_string(),
        };
        assert_eq!(err.to_string(), "'newop' is already an admin");
    }
}
