//! Session extractors
//!
//! Resolve the bearer token on a request to the session it was issued for and
//! enforce the role a handler needs.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::session::{has_role, Role, Session, SessionError, SessionStore};

/// A request made under an issued session
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    /// Bearer token the client presented
    pub token: String,
    pub session: Session,
    /// Credential to forward to the gateway for this user
    pub gateway_token: Option<String>,
}

impl AuthenticatedSession {
    /// Id of the signed-in user. Stored sessions are never anonymous.
    pub fn user_id(&self) -> Result<&str, ApiError> {
        self.session
            .user_id()
            .ok_or_else(|| ApiError::Unauthorized("Session has no user".to_string()))
    }

    pub fn bearer(&self) -> Option<&str> {
        self.gateway_token.as_deref()
    }
}

/// Extractor for any signed-in session
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(auth: AuthenticatedSession) -> impl IntoResponse {
///     format!("Hello, {:?}", auth.session.user_id())
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedSession
where
    Arc<SessionStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| SessionError::MissingToken)?;

        let store = Arc::<SessionStore>::from_ref(state);
        let stored = store.resolve(bearer.token()).await?;

        Ok(AuthenticatedSession {
            token: bearer.token().to_string(),
            session: stored.session,
            gateway_token: stored.gateway_token,
        })
    }
}

/// Session if one was presented, anonymous otherwise
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<AuthenticatedSession>);

impl OptionalSession {
    pub fn bearer(&self) -> Option<&str> {
        self.0.as_ref().and_then(AuthenticatedSession::bearer)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalSession
where
    Arc<SessionStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthenticatedSession::from_request_parts(parts, state).await {
            Ok(session) => Ok(OptionalSession(Some(session))),
            Err(_) => Ok(OptionalSession(None)),
        }
    }
}

async fn require_role<S>(
    parts: &mut Parts,
    state: &S,
    role: Role,
) -> Result<AuthenticatedSession, ApiError>
where
    Arc<SessionStore>: FromRef<S>,
    S: Send + Sync,
{
    let auth = AuthenticatedSession::from_request_parts(parts, state).await?;
    if !has_role(&auth.session, role) {
        return Err(ApiError::Forbidden(format!(
            "{} access required",
            role.as_str()
        )));
    }
    Ok(auth)
}

/// Require an admin session
pub struct AdminSession(pub AuthenticatedSession);

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    Arc<SessionStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Admin).await.map(AdminSession)
    }
}

/// Require an organization session (admins pass too)
pub struct OrganizationSession(pub AuthenticatedSession);

#[async_trait]
impl<S> FromRequestParts<S> for OrganizationSession
where
    Arc<SessionStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Organization)
            .await
            .map(OrganizationSession)
    }
}

/// Require an investor session (admins pass too)
pub struct InvestorSession(pub AuthenticatedSession);

#[async_trait]
impl<S> FromRequestParts<S> for InvestorSession
where
    Arc<SessionStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Investor)
            .await
            .map(InvestorSession)
    }
}
