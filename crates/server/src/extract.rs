//! Request extractors for the calling user.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shortpress_application::use_cases::AuthenticateUser;
use shortpress_application::{ApplicationError, Principal};
use shortpress_domain::{User, UserId};

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the id of the user authenticated upstream.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The calling user, required.
///
/// Rejects with 401 when the header is missing, malformed, or names an
/// unknown user, and with 403 when the user is inactive.
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// The stored user.
    pub user: User,
    /// Access rights derived from the user.
    pub principal: Principal,
}

/// The calling user, if a header was sent.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<Authenticated>);

fn header_user_id(parts: &Parts) -> Result<Option<UserId>, ApiError> {
    let Some(value) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .map(|id| Some(UserId(id)))
        .ok_or_else(|| {
            ApplicationError::Unauthorized(format!("malformed {USER_ID_HEADER} header")).into()
        })
}

async fn authenticate(state: &AppState, user_id: UserId) -> Result<Authenticated, ApiError> {
    let (user, principal) = AuthenticateUser::new(state.store.as_ref())
        .execute(user_id)
        .await?;
    Ok(Authenticated { user, principal })
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = header_user_id(parts)?.ok_or_else(|| {
            ApiError(ApplicationError::Unauthorized(format!(
                "missing {USER_ID_HEADER} header"
            )))
        })?;
        authenticate(state, user_id).await
    }
}

impl FromRequestParts<AppState> for MaybeAuthenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match header_user_id(parts)? {
            Some(user_id) => Ok(Self(Some(authenticate(state, user_id).await?))),
            None => Ok(Self(None)),
        }
    }
}
