//! Route definitions for the PropVault API

mod auth;
mod calculator;
mod investment;
mod organization;
mod property;
mod user;
mod wallet;

pub use auth::auth_routes;
pub use calculator::calculator_routes;
pub use investment::investment_routes;
pub use organization::organization_routes;
pub use property::property_routes;
pub use user::user_routes;
pub use wallet::wallet_routes;
