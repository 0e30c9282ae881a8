//! Caller identity.
//!
//! clipstream does not issue or validate tokens; an upstream gateway
//! authenticates the caller and forwards `(caller_id, role)`. Services take a
//! `CallerContext` wherever an authorization decision is made.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CallerRole {
    User,
    Creator,
    Admin,
}

impl CallerRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, CallerRole::Admin)
    }

    /// Whether this role may upload videos.
    pub fn can_upload(&self) -> bool {
        matches!(self, CallerRole::Creator | CallerRole::Admin)
    }
}

impl Display for CallerRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CallerRole::User => write!(f, "user"),
            CallerRole::Creator => write!(f, "creator"),
            CallerRole::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for CallerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(CallerRole::User),
            "creator" => Ok(CallerRole::Creator),
            "admin" => Ok(CallerRole::Admin),
            other => Err(format!("unknown caller role: {}", other)),
        }
    }
}

/// Identity of the authenticated caller for update/delete/admin operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    pub caller_id: Uuid,
    pub role: CallerRole,
}

impl CallerContext {
    pub fn new(caller_id: Uuid, role: CallerRole) -> Self {
        CallerContext { caller_id, role }
    }

    /// Owner-or-admin check used by update and soft-delete flows.
    pub fn may_modify(&self, owner_id: Uuid) -> bool {
        self.role.is_admin() || self.caller_id == owner_id
    }
}
