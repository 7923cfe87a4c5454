//! API handlers for PropVault

pub mod auth;
pub mod calculator;
pub mod health;
pub mod investment;
pub mod organization;
pub mod property;
pub mod user;
pub mod wallet;

pub use health::health_check;
