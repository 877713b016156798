//! Configuration module for NodeBudget
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - CLI session state

pub mod paths;
pub mod session;
pub mod settings;

pub use paths::BudgetPaths;
pub use session::Session;
pub use settings::Settings;
