//! Session identity
//!
//! A session is exactly one of anonymous, admin, organization or investor.
//! The gateway decides who someone is at login; this module only records the
//! answer and scopes later requests by it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gateway::LoginOutcome;
use crate::models::{Portal, User};

mod store;

pub use store::{SessionStore, StoredSession};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Authorization header with Bearer token required")]
    MissingToken,

    #[error("Session not found or revoked")]
    InvalidToken,

    #[error("Session has expired")]
    Expired,

    #[error("Organization login did not identify an organization")]
    MissingOrganization,

    #[error("A {role} account cannot sign in to the {portal} portal")]
    PortalMismatch { portal: &'static str, role: &'static str },

    #[error("Session storage failed: {0}")]
    Persistence(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Organization,
    Investor,
}

impl Role {
    /// Parse a role label from the gateway
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace(&['_', ' '][..], "-").as_str() {
            "admin" | "super-admin" | "superadmin" | "administrator" => Some(Role::Admin),
            "organization" | "organisation" | "org" | "org-admin" | "partner" => {
                Some(Role::Organization)
            }
            "investor" | "user" | "customer" => Some(Role::Investor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Organization => "organization",
            Role::Investor => "investor",
        }
    }
}

impl From<Portal> for Role {
    fn from(portal: Portal) -> Self {
        match portal {
            Portal::Admin => Role::Admin,
            Portal::Organization => Role::Organization,
            Portal::Investor => Role::Investor,
        }
    }
}

/// The identity a request acts as
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Session {
    #[default]
    Anonymous,
    Admin {
        user: User,
    },
    Organization {
        user: User,
        organization_id: String,
    },
    Investor {
        user: User,
    },
}

impl Session {
    /// Build the session for a successful login. The gateway's role wins over
    /// the portal the user picked, but a mismatch is refused rather than
    /// silently switching portals.
    pub fn from_login(outcome: LoginOutcome, portal: Portal) -> Result<Self, SessionError> {
        let role = outcome
            .role
            .as_deref()
            .and_then(Role::from_label)
            .unwrap_or_else(|| portal.into());

        if role != Role::from(portal) {
            return Err(SessionError::PortalMismatch {
                portal: portal.as_str(),
                role: role.as_str(),
            });
        }

        match role {
            Role::Admin => Ok(Session::Admin { user: outcome.user }),
            Role::Investor => Ok(Session::Investor { user: outcome.user }),
            Role::Organization => {
                let organization_id = outcome
                    .organization_id
                    .filter(|id| !id.trim().is_empty())
                    .ok_or(SessionError::MissingOrganization)?;
                Ok(Session::Organization {
                    user: outcome.user,
                    organization_id,
                })
            }
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Session::Anonymous => None,
            Session::Admin { .. } => Some(Role::Admin),
            Session::Organization { .. } => Some(Role::Organization),
            Session::Investor { .. } => Some(Role::Investor),
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Anonymous => None,
            Session::Admin { user }
            | Session::Organization { user, .. }
            | Session::Investor { user } => Some(user),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user().map(|u| u.id.as_str())
    }

    pub fn organization_id(&self) -> Option<&str> {
        match self {
            Session::Organization {
                organization_id, ..
            } => Some(organization_id),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Session::Anonymous)
    }
}

/// Whether `session` may act as `role`. Admin passes every check.
pub fn has_role(session: &Session, role: Role) -> bool {
    match session.role() {
        Some(Role::Admin) => true,
        Some(actual) => actual == role,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KycStatus;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: None,
            kyc_status: KycStatus::Verified,
            is_active: true,
        }
    }

    fn outcome(role: Option<&str>, organization_id: Option<&str>) -> LoginOutcome {
        LoginOutcome {
            token: Some("gw-token".to_string()),
            user: user("u-1"),
            role: role.map(str::to_string),
            organization_id: organization_id.map(str::to_string),
        }
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::from_label("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_label("org_admin"), Some(Role::Organization));
        assert_eq!(Role::from_label("user"), Some(Role::Investor));
        assert_eq!(Role::from_label("oracle"), None);
    }

    #[test]
    fn test_login_defaults_role_to_portal() {
        let session = Session::from_login(outcome(None, None), Portal::Investor).unwrap();
        assert_eq!(session.role(), Some(Role::Investor));
        assert_eq!(session.user_id(), Some("u-1"));
    }

    #[test]
    fn test_organization_login_requires_organization() {
        assert_eq!(
            Session::from_login(outcome(Some("organization"), None), Portal::Organization),
            Err(SessionError::MissingOrganization)
        );
        let session =
            Session::from_login(outcome(Some("organization"), Some("ORG-1")), Portal::Organization)
                .unwrap();
        assert_eq!(session.organization_id(), Some("ORG-1"));
    }

    #[test]
    fn test_portal_mismatch_is_refused() {
        let err = Session::from_login(outcome(Some("investor"), None), Portal::Admin).unwrap_err();
        assert!(matches!(err, SessionError::PortalMismatch { .. }));
    }

    #[test]
    fn test_has_role() {
        let admin = Session::Admin { user: user("a") };
        let investor = Session::Investor { user: user("i") };
        assert!(has_role(&admin, Role::Organization));
        assert!(has_role(&investor, Role::Investor));
        assert!(!has_role(&investor, Role::Admin));
        assert!(!has_role(&Session::Anonymous, Role::Investor));
    }

    #[test]
    fn test_session_is_tagged() {
        let json = serde_json::to_value(Session::Investor { user: user("i") }).unwrap();
        assert_eq!(json["kind"], "investor");
        assert_eq!(json["user"]["id"], "i");
        let anon = serde_json::to_value(Session::Anonymous).unwrap();
        assert_eq!(anon, serde_json::json!({ "kind": "anonymous" }));
    }
}
