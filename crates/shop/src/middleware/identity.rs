//! Requester identity extractor.
//!
//! Every shop request runs as some identity: an authenticated member when the
//! identity-provider callback has written `member_id` into the session, or an
//! anonymous session otherwise. Anonymous ids are minted lazily on first use
//! so that guest carts survive across requests.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use uuid::Uuid;

use guildhall_core::{MemberId, Requester};

/// Session keys used by the shop.
pub mod session_keys {
    /// Authenticated member id, written by the identity-provider callback.
    pub const MEMBER_ID: &str = "member_id";
    /// Anonymous requester id, minted on first anonymous request.
    pub const ANONYMOUS_ID: &str = "anonymous_id";
}

/// Extractor resolving the current requester from the session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     CurrentRequester(requester): CurrentRequester,
/// ) -> impl IntoResponse {
///     format!("ownership: {:?}", requester.ownership())
/// }
/// ```
pub struct CurrentRequester(pub Requester);

/// Error returned when the session layer is missing or unusable.
pub struct IdentityRejection;

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "session unavailable").into_response()
    }
}

impl<S> FromRequestParts<S> for CurrentRequester
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(IdentityRejection)?;

        if let Some(member_id) = session
            .get::<i32>(session_keys::MEMBER_ID)
            .await
            .map_err(|_| IdentityRejection)?
        {
            return Ok(Self(Requester::Member {
                id: MemberId::new(member_id),
            }));
        }

        if let Some(anonymous_id) = session
            .get::<Uuid>(session_keys::ANONYMOUS_ID)
            .await
            .map_err(|_| IdentityRejection)?
        {
            return Ok(Self(Requester::Anonymous { id: anonymous_id }));
        }

        let anonymous_id = Uuid::new_v4();
        session
            .insert(session_keys::ANONYMOUS_ID, anonymous_id)
            .await
            .map_err(|_| IdentityRejection)?;

        Ok(Self(Requester::Anonymous { id: anonymous_id }))
    }
}

/// Helper to set the authenticated member in the session.
///
/// Called by the identity-provider callback after successful authentication.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_member(
    session: &Session,
    member_id: MemberId,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::MEMBER_ID, member_id.as_i32())
        .await
}

/// Helper to clear the authenticated member from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_member(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<i32>(session_keys::MEMBER_ID).await?;
    Ok(())
}
