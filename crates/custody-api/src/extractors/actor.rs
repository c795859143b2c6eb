//! `Actor` extractor — resolves the acting user into an [`ActorContext`].
//!
//! Authentication itself happens upstream (gateway or session layer);
//! this service trusts the `X-Actor-Id` header carrying the
//! authenticated user's ID and resolves it against the user store so
//! every handler receives an explicit actor context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use custody_core::error::AppError;
use custody_service::context::ActorContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the authenticated user's ID.
const ACTOR_HEADER: &str = "x-actor-id";

/// Extracted actor context available in handlers.
#[derive(Debug, Clone)]
pub struct Actor(pub ActorContext);

impl std::ops::Deref for Actor {
    type Target = ActorContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authorization("Missing X-Actor-Id header"))?;

        let actor_id: Uuid = header
            .parse()
            .map_err(|_| AppError::validation("X-Actor-Id is not a valid UUID"))?;

        let user = state
            .users
            .find_by_id(actor_id)
            .await?
            .ok_or_else(|| AppError::authorization("Unknown actor"))?;
        if !user.is_active() {
            return Err(ApiError(AppError::authorization("Actor account is inactive")));
        }

        Ok(Actor(ActorContext::from_user(&user)))
    }
}
