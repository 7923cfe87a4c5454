//! Backend gateway access
//!
//! The gateway is the system of record for every entity this server shows.
//! [`GatewayClient`] speaks its REST API and hands back normalized models.

mod client;
mod envelope;
mod error;

pub use client::{login_outcome_from_raw, GatewayClient, LoginOutcome};
pub use envelope::{classify, extract_list, extract_messages, extract_record, unwrap_envelope};
pub use error::GatewayError;
