use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::AuthError;

/// Capability roles recognized by the examination platform.
///
/// A role is an opaque possession token bound to an identity. Holding a role
/// gates the corresponding operations:
///
/// - `Administrator`: may grant and revoke roles.
/// - `Examiner`: may publish exams.
/// - `Validator`: may score submissions after an exam window closes.
///
/// # Serialization
///
/// When serialized to JSON (e.g., via API), each variant is converted to
/// lowercase: `Examiner` → `"examiner"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May grant and revoke roles for other identities.
    Administrator,

    /// May publish exams and own their lifecycle parameters.
    Examiner,

    /// May append scores to submissions once validation opens.
    Validator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Administrator => "Administrator",
            Role::Examiner => "Examiner",
            Role::Validator => "Validator",
        };
        write!(f, "{}", label)
    }
}

/// In-memory registry of capability grants, indexed by identity.
///
/// The registry is seeded with a single root administrator at construction;
/// every further grant or revocation must be performed by an identity that
/// currently holds [`Role::Administrator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRegistry {
    grants: HashMap<String, HashSet<Role>>,
}

impl RoleRegistry {
    /// Creates a registry seeded with `root_admin` as the first administrator.
    pub fn new(root_admin: &str) -> Self {
        let mut grants: HashMap<String, HashSet<Role>> = HashMap::new();
        grants
            .entry(root_admin.to_string())
            .or_default()
            .insert(Role::Administrator);
        Self { grants }
    }

    /// Checks whether `identity` currently holds `role`.
    pub fn has_role(&self, identity: &str, role: Role) -> bool {
        self.grants
            .get(identity)
            .map(|roles| roles.contains(&role))
            .unwrap_or(false)
    }

    /// Grants `role` to `identity`.
    ///
    /// Granting an already-held role is a no-op, not an error.
    ///
    /// # Errors
    /// Returns [`AuthError::NotAuthorized`] if `caller` is not an administrator.
    pub fn grant(&mut self, caller: &str, identity: &str, role: Role) -> Result<(), AuthError> {
        if !self.has_role(caller, Role::Administrator) {
            return Err(AuthError::NotAuthorized(
                caller.to_string(),
                Role::Administrator,
            ));
        }

        self.grants
            .entry(identity.to_string())
            .or_default()
            .insert(role);
        Ok(())
    }

    /// Revokes `role` from `identity`.
    ///
    /// # Errors
    /// - [`AuthError::NotAuthorized`] if `caller` is not an administrator.
    /// - [`AuthError::GrantNotFound`] if the identity does not hold the role.
    pub fn revoke(&mut self, caller: &str, identity: &str, role: Role) -> Result<(), AuthError> {
        if !self.has_role(caller, Role::Administrator) {
            return Err(AuthError::NotAuthorized(
                caller.to_string(),
                Role::Administrator,
            ));
        }

        let removed = self
            .grants
            .get_mut(identity)
            .map(|roles| roles.remove(&role))
            .unwrap_or(false);

        if !removed {
            return Err(AuthError::GrantNotFound(identity.to_string(), role));
        }

        if self.grants.get(identity).is_some_and(|roles| roles.is_empty()) {
            self.grants.remove(identity);
        }
        Ok(())
    }

    /// Lists the roles currently held by `identity`.
    pub fn roles_of(&self, identity: &str) -> Vec<Role> {
        self.grants
            .get(identity)
            .map(|roles| roles.iter().copied().collect())
            .unwrap_or_default()
    }
}
