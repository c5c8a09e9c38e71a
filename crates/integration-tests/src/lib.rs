//! Cross-crate tests for Maison Verlaine.
//!
//! Tests live in `tests/` and exercise behavior that spans crates:
//! webhook signature verification against the signing helper, promotion
//! arithmetic through core money types, and payment event parsing.
//!
//! Tests that need a live server or database are out of scope here; the
//! per-crate `#[cfg(test)]` modules cover repository queries, and manual
//! testing covers end-to-end flows.
