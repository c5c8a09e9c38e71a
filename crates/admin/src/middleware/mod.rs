//! Request middleware for the editor console.

pub mod auth;

pub use auth::RequireEditor;
