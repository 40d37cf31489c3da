//! Authorization gate
//!
//! Decides whether a caller may touch a resource owned by some user. The
//! resolver never calls into this module; use cases check access first and
//! then resolve within the resource owner's scope.

use shortpress_domain::{User, UserId};
use tracing::warn;

use crate::error::{ApplicationError, ApplicationResult};

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// The caller's user id.
    pub user_id: UserId,
    /// Whether the caller bypasses ownership checks.
    pub is_admin: bool,
}

/// How access to a resource was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The caller owns the resource.
    OwnerMatch,
    /// The caller is an admin acting on someone else's resource.
    AdminOverride,
}

impl Principal {
    /// A regular user.
    #[must_use]
    pub const fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    /// An admin.
    #[must_use]
    pub const fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }

    /// Builds the principal for a stored user.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` if the user is inactive.
    pub fn from_user(user: &User) -> ApplicationResult<Self> {
        if !user.is_active {
            warn!(user_id = %user.id, "inactive user refused");
            return Err(ApplicationError::Forbidden("inactive user".to_string()));
        }
        Ok(Self {
            user_id: user.id,
            is_admin: user.is_admin,
        })
    }

    /// Checks access to a resource owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` if the caller neither owns the resource nor is an admin.
    pub fn authorize(&self, owner_id: UserId, resource: &str) -> ApplicationResult<Access> {
        if self.user_id == owner_id {
            Ok(Access::OwnerMatch)
        } else if self.is_admin {
            Ok(Access::AdminOverride)
        } else {
            warn!(
                user_id = %self.user_id,
                owner_id = %owner_id,
                resource,
                "access denied"
            );
            Err(ApplicationError::Forbidden(format!(
                "not authorized to access this {resource}"
            )))
        }
    }

    /// Checks that the caller is an admin.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins.
    pub fn require_admin(&self) -> ApplicationResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            warn!(user_id = %self.user_id, "admin access required");
            Err(ApplicationError::Forbidden(
                "admin access required".to_string(),
            ))
        }
    }

    /// The owner filter for listings: admins see everything, others only
    /// their own records.
    #[must_use]
    pub const fn visible_owner(&self) -> Option<UserId> {
        if self.is_admin {
            None
        } else {
            Some(self.user_id)
        }
    }

    /// Picks the owner scope for an operation that may target another
    /// owner, checking access to it.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` if a non-admin names someone else.
    pub fn scope(&self, requested: Option<UserId>) -> ApplicationResult<UserId> {
        let owner_id = requested.unwrap_or(self.user_id);
        self.authorize(owner_id, "scope")?;
        Ok(owner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_match() {
        let principal = Principal::user(UserId(1));
        assert_eq!(principal.authorize(UserId(1), "variable").ok(), Some(Access::OwnerMatch));
    }

    #[test]
    fn test_admin_override() {
        let principal = Principal::admin(UserId(1));
        assert_eq!(
            principal.authorize(UserId(2), "variable").ok(),
            Some(Access::AdminOverride)
        );
        assert_eq!(principal.authorize(UserId(1), "variable").ok(), Some(Access::OwnerMatch));
    }

    #[test]
    fn test_foreign_owner_forbidden() {
        let result = Principal::user(UserId(1)).authorize(UserId(2), "category");
        assert!(matches!(
            result,
            Err(ApplicationError::Forbidden(msg)) if msg.contains("category")
        ));
    }

    #[test]
    fn test_require_admin() {
        assert!(Principal::admin(UserId(1)).require_admin().is_ok());
        assert!(Principal::user(UserId(1)).require_admin().is_err());
    }

    #[test]
    fn test_inactive_user_refused() {
        let mut user = User::new(UserId(1), "alice");
        user.is_active = false;
        assert!(matches!(
            Principal::from_user(&user),
            Err(ApplicationError::Forbidden(_))
        ));
    }

    #[test]
    fn test_visible_owner_and_scope() {
        assert_eq!(Principal::admin(UserId(1)).visible_owner(), None);
        assert_eq!(Principal::user(UserId(3)).visible_owner(), Some(UserId(3)));
        assert_eq!(Principal::user(UserId(3)).scope(None).ok(), Some(UserId(3)));
        assert!(Principal::user(UserId(3)).scope(Some(UserId(4))).is_err());
        assert_eq!(Principal::admin(UserId(1)).scope(Some(UserId(4))).ok(), Some(UserId(4)));
    }
}
