//! User use cases

use serde::Deserialize;
use shortpress_domain::user::validate_username;
use shortpress_domain::{User, UserId};
use tracing::info;

use crate::authorization::Principal;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{NewUser, RepositoryError, UserRepository};

/// Input for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    /// Unique login name.
    pub username: String,
    /// Only admins may create other admins.
    #[serde(default)]
    pub is_admin: bool,
}

/// Registers a new user.
pub struct CreateUser<'a, U> {
    users: &'a U,
}

impl<'a, U: UserRepository> CreateUser<'a, U> {
    /// Creates a new `CreateUser` use case.
    pub const fn new(users: &'a U) -> Self {
        Self { users }
    }

    /// Executes the use case. `caller` is `None` for anonymous sign-up.
    ///
    /// # Errors
    /// Returns `Forbidden` if a non-admin asks for an admin account, or
    /// `Conflict` if the username is taken.
    pub async fn execute(
        &self,
        caller: Option<&Principal>,
        input: CreateUserInput,
    ) -> ApplicationResult<User> {
        validate_username(&input.username)?;
        if input.is_admin {
            caller
                .ok_or_else(|| ApplicationError::Forbidden("admin access required".into()))?
                .require_admin()?;
        }

        let user = self
            .users
            .create(NewUser {
                username: input.username,
                is_admin: input.is_admin,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    ApplicationError::Conflict("username already registered".into())
                }
                other => other.into(),
            })?;

        info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }
}

/// Turns an externally authenticated user id into a principal.
pub struct AuthenticateUser<'a, U> {
    users: &'a U,
}

impl<'a, U: UserRepository> AuthenticateUser<'a, U> {
    /// Creates a new `AuthenticateUser` use case.
    pub const fn new(users: &'a U) -> Self {
        Self { users }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `Unauthorized` for unknown ids and `Forbidden` for inactive users.
    pub async fn execute(&self, user_id: UserId) -> ApplicationResult<(User, Principal)> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| ApplicationError::Unauthorized("unknown user".into()))?;
        let principal = Principal::from_user(&user)?;
        Ok((user, principal))
    }
}

/// Creates the first admin account when none exists.
pub struct BootstrapAdmin<'a, U> {
    users: &'a U,
}

impl<'a, U: UserRepository> BootstrapAdmin<'a, U> {
    /// Creates a new `BootstrapAdmin` use case.
    pub const fn new(users: &'a U) -> Self {
        Self { users }
    }

    /// Executes the use case. Returns the created admin, or `None` if an
    /// admin already exists.
    ///
    /// # Errors
    /// Returns `Conflict` if `username` already belongs to a regular user.
    pub async fn execute(&self, username: &str) -> ApplicationResult<Option<User>> {
        if self.users.has_admin().await? {
            return Ok(None);
        }
        if self.users.find_by_username(username).await?.is_some() {
            return Err(ApplicationError::Conflict(format!(
                "bootstrap admin '{username}' already exists as a regular user"
            )));
        }

        validate_username(username)?;
        let admin = self
            .users
            .create(NewUser {
                username: username.to_string(),
                is_admin: true,
            })
            .await?;

        info!(user_id = %admin.id, username, "bootstrap admin created");
        Ok(Some(admin))
    }
}
