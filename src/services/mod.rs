//! Business logic services for PropVault

pub mod dashboard;
pub mod organization;
pub mod portfolio;
pub mod valuation;

pub use dashboard::{Dashboard, DashboardService, PortfolioView, Section};
pub use portfolio::{PortfolioSummary, WalletFigures};
pub use valuation::{PropertyValuation, ValuationError};
