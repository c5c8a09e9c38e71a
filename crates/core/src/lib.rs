//! Maison Verlaine Core - Shared domain types.
//!
//! This crate provides common types used across all Maison Verlaine components:
//! - `storefront` - Public-facing bilingual e-commerce site
//! - `admin` - Internal editor console for collections, drops, promotions and journal
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, locales, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
