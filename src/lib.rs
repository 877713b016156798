//! NodeBudget - hierarchical budget allocation from the terminal
//!
//! This library splits a fixed budget total across named categories (nodes),
//! each defined by a percentage share, and tracks expenses against them. It
//! keeps every node's allocated amount consistent with the total, swaps node
//! sets atomically, and derives spent/remaining figures from the expense
//! ledger on every read.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution, user settings and CLI session state
//! - `error`: Custom error types
//! - `models`: Core data models (budget, nodes, expenses, money, percentages)
//! - `storage`: The `BudgetStore` interface and its JSON file implementation
//! - `services`: Allocation, node set edits and the expense ledger
//! - `view`: Selection state controller and the allocation graph
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `nodebudget` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use nodebudget::config::BudgetPaths;
//! use nodebudget::models::{DefaultNode, Money};
//! use nodebudget::storage::Storage;
//! use nodebudget::view::Controller;
//!
//! let mut storage = Storage::new(BudgetPaths::new()?)?;
//! storage.load_all()?;
//!
//! let mut controller = Controller::new(&storage, "₹");
//! controller.initialize(Money::from_units(10_000), &DefaultNode::partition())?;
//! let summary = controller.summary()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod view;

pub use error::{NodeBudgetError, NodeBudgetResult};
