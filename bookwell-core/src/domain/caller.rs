use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer identity of a user (customer, translator or staff member).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Admins and super-admins see every job.
    pub fn is_administrative(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

/// Maps the stored numeric `user_type` column onto a [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMapping {
    pub admin_user_type: i32,
    pub superadmin_user_type: i32,
}

impl Default for RoleMapping {
    fn default() -> Self {
        Self {
            admin_user_type: 2,
            superadmin_user_type: 3,
        }
    }
}

impl RoleMapping {
    pub fn role_for(&self, user_type: i32) -> Role {
        if user_type == self.superadmin_user_type {
            Role::SuperAdmin
        } else if user_type == self.admin_user_type {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// Raw identity row returned by a [`crate::ports::CallerDirectory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerRecord {
    pub user_id: UserId,
    pub user_type: i32,
}

impl CallerRecord {
    pub fn into_caller(self, mapping: &RoleMapping) -> Caller {
        Caller {
            id: self.user_id,
            role: mapping.role_for(self.user_type),
        }
    }
}

/// The authenticated identity issuing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub role: Role,
}

impl Caller {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}
