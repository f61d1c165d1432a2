//! Privilege levels and the admin-list policy.

use crate::error::AccessError;
use hero_guide_content::AdminRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Privilege level of a sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    /// Can browse and receive media.
    Member,
    /// Listed in the repository's admin map.
    Admin,
    /// The configured owner. Never stored as an admin record.
    SuperAdmin,
}

impl Privilege {
    /// Returns true if this privilege allows privileged actions.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

/// Strips surrounding whitespace and a single leading '@'.
#[must_use]
pub fn normalize_username(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed.strip_prefix('@').unwrap_or(trimmed)
}

/// Decides who may perform privileged actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    super_admin: String,
}

impl AccessPolicy {
    /// Creates a policy for the given super-admin username.
    #[must_use]
    pub fn new(super_admin: &str) -> Self {
        Self {
            super_admin: normalize_username(super_admin).to_string(),
        }
    }

    /// The super-admin username.
    #[must_use]
    pub fn super_admin(&self) -> &str {
        &self.super_admin
    }

    /// Returns true if `username` is the super-admin.
    #[must_use]
    pub fn is_super_admin(&self, username: &str) -> bool {
        !username.is_empty() && username == self.super_admin
    }

    /// Privilege of a sender against the current admin list.
    ///
    /// Senders without a username are always members.
    #[must_use]
    pub fn privilege(&self, username: &str, admins: &BTreeMap<String, AdminRecord>) -> Privilege {
        if username.is_empty() {
            return Privilege::Member;
        }
        if self.is_super_admin(username) {
            Privilege::SuperAdmin
        } else if admins.contains_key(username) {
            Privilege::Admin
        } else {
            Privilege::Member
        }
    }

    /// Returns true if the sender may perform privileged actions.
    #[must_use]
    pub fn is_authorized(&self, username: &str, admins: &BTreeMap<String, AdminRecord>) -> bool {
        self.privilege(username, admins).is_admin()
    }

    /// Validates adding `target` on behalf of `actor`.
    ///
    /// Returns the normalized username to store.
    pub fn check_addition<'a>(
        &self,
        actor: &str,
        target: &'a str,
        admins: &BTreeMap<String, AdminRecord>,
    ) -> Result<&'a str, AccessError> {
        let target = normalize_username(target);
        if target.is_empty() {
            return Err(AccessError::EmptyUsername);
        }
        if target.contains(char::is_whitespace) {
            return Err(AccessError::InvalidUsername {
                username: target.to_string(),
            });
        }
        if target == actor {
            return Err(AccessError::SelfTarget);
        }
        if self.is_super_admin(target) {
            return Err(AccessError::SuperAdminTarget);
        }
        if admins.contains_key(target) {
            return Err(AccessError::AlreadyAdmin {
                username: target.to_string(),
            });
        }
        debug!(actor, target, "admin addition allowed");
        Ok(target)
    }

    /// Validates removing `target` from the admin list.
    pub fn check_removal<'a>(
        &self,
        target: &'a str,
        admins: &BTreeMap<String, AdminRecord>,
    ) -> Result<&'a str, AccessError> {
        let target = normalize_username(target);
        if self.is_super_admin(target) {
            return Err(AccessError::SuperAdminTarget);
        }
        if !admins.contains_key(target) {
            return Err(AccessError::NotAdmin {
                username: target.to_string(),
            });
        }
        Ok(target)
    }
}
