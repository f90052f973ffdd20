//! # Billing Core
//!
//! GST-aware line item and invoice calculation for pharmacy purchase entry,
//! over-the-counter sales and prescription sales.
//!
//! ## Features
//!
//! - **Three pricing regimes**: tax-inclusive, tax-exclusive and non-GST invoices
//! - **Tax profiles**: CGST/SGST splits, IGST and any other named component
//! - **Penny-exact rounding**: components reconciled with the rounded tax total
//! - **Overall discount**: percentage or fixed, re-deriving tax on the aggregate
//! - **Never throws mid-edit**: incomplete rows are zeroed, bad discounts clamped and flagged
//!
//! ## Quick Start
//!
//! ```rust
//! use billing_core::{
//!     aggregate_invoice, calculate_line_item, resolve_tax_rates, DiscountSpec, GstMode,
//!     LineItemInput, MissingProfilePolicy, TaxProfileCatalog,
//! };
//! use bigdecimal::BigDecimal;
//!
//! let catalog = TaxProfileCatalog::standard_slabs();
//! let rates = resolve_tax_rates(Some("GST12"), &catalog, MissingProfilePolicy::ZeroRate).unwrap();
//!
//! let input = LineItemInput::new(10, BigDecimal::from(100), BigDecimal::from(10));
//! let line = calculate_line_item(&input, &rates, GstMode::Exclusive);
//! assert_eq!(line.total, BigDecimal::from(1008));
//!
//! let totals = aggregate_invoice(&[line], &DiscountSpec::none(), GstMode::Exclusive);
//! assert_eq!(totals.net_total, BigDecimal::from(1008));
//! ```

pub mod billing;
pub mod config;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use billing::*;
pub use config::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
pub use utils::rounding::round2;
