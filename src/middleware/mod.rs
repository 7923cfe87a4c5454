//! Middleware for the PropVault API
//!
//! Request tracing and session extraction.

pub mod auth;
mod tracing;

pub use auth::{
    AdminSession, AuthenticatedSession, InvestorSession, OptionalSession, OrganizationSession,
};
pub use tracing::request_tracing;
