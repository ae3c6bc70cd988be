use thiserror::Error;

use super::roles::Role;

/// Defines errors related to role grants and capability checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The caller does not hold the role required for the operation.
    #[error("Identity '{0}' does not hold the {1} role.")]
    NotAuthorized(String, Role),

    /// The identity has no grant for the role being revoked.
    #[error("Identity '{0}' has no {1} grant to revoke.")]
    GrantNotFound(String, Role),
}
