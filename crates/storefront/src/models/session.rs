//! Session-related types.
//!
//! Types stored in the session: the shopper's identity (once they have
//! given us an email), their cart and wishlist tokens, and the promotion
//! code applied at checkout.

use serde::{Deserialize, Serialize};

use verlaine_core::{Email, UserId};

/// Session-stored shopper identity.
///
/// Minimal data stored in the session to identify the shopper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// Key for storing the identified shopper.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the cart token.
    pub const CART_TOKEN: &str = "cart_token";

    /// Key for the wishlist token.
    pub const WISHLIST_TOKEN: &str = "wishlist_token";

    /// Key for the promotion code applied to the session's cart.
    pub const PROMOTION_CODE: &str = "promotion_code";
}
