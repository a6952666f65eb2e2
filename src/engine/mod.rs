//! Reporting engine for prismactl
//!
//! The reconciliation itself lives in the declarative crate. This module
//! renders what it decided and did:
//! 1. Plans - what apply would change, grouped by kind
//! 2. Summaries - counts after an apply
//! 3. Outcomes - the `{changed, data}` result of single operations

pub mod display;

pub use display::{display_outcome, display_plan, print_summary};
