//! Core types for Maison Verlaine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod locale;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use locale::{Locale, LocalizedText};
pub use money::{CurrencyCode, Price};
pub use status::{DropPhase, OrderStatus};
