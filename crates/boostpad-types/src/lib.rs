//! Boostpad Types - Canonical domain types for the engagement-task marketplace
//!
//! This crate contains all foundational types for Boostpad with zero dependencies
//! on other boostpad crates. It defines:
//!
//! - Plan tiers and the discount/quota tables attached to them
//! - Task status, action, deletion-reason and report-reason enums
//! - The pricing engine (cost, refund, bonus-action arithmetic)
//! - URL canonicalization and the duplicate-task comparison key
//! - The social-network registry with per-network URL validation
//!
//! # Architectural Invariants
//!
//! 1. A profile's balance is never negative after a committed operation
//! 2. Pricing tables are immutable after process start - loaded once into
//!    [`PricingConfig`] and passed by reference, never mutated at runtime
//! 3. Duplicate detection is keyed on `(normalized_url, action, network)`

pub mod network;
pub mod plan;
pub mod pricing;
pub mod task;
pub mod urlkey;

pub use network::*;
pub use plan::*;
pub use pricing::*;
pub use task::*;
pub use urlkey::*;

/// Version of the Boostpad types schema
pub const TYPES_VERSION: &str = "0.1.0";
