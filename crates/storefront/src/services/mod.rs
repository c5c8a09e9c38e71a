//! Service layer for side effects outside the database.

pub mod email;

pub use email::{EmailError, EmailService};
