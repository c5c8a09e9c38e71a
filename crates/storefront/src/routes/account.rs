//! Account route handlers.
//!
//! There are no passwords: a shopper identifies themselves with an email
//! address, which is when their anonymous cart and wishlist merge into the
//! ones belonging to that address. Logging out just forgets the session.

use axum::{
    Form,
    extract::State,
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use verlaine_core::Email;

use crate::db::carts::CartRepository;
use crate::db::users::UserRepository;
use crate::db::wishlists::WishlistRepository;
use crate::error::{AppError, Result};
use crate::models::session::{CurrentUser, keys};
use crate::routes::{cart, wishlist};
use crate::state::AppState;

/// Identification form data.
#[derive(Debug, Deserialize)]
pub struct IdentifyForm {
    pub email: String,
}

/// Get the identified shopper from the session, if any.
pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get::<CurrentUser>(keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Identify the shopper by email and merge their anonymous cart and
/// wishlist into the ones owned by that address.
#[instrument(skip(state, session, form))]
pub async fn identify(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<IdentifyForm>,
) -> Result<Redirect> {
    let email = Email::parse(form.email.trim())
        .map_err(|e| AppError::BadRequest(format!("email: {e}")))?;

    let user = UserRepository::new(state.pool()).get_or_create(&email).await?;

    // Session fixation defense: new session ID once the shopper has a name.
    session.cycle_id().await?;

    if let Some(anonymous) = cart::get_cart_token(&session).await {
        let merged = CartRepository::new(state.pool())
            .merge_into_user(anonymous, user.id)
            .await?;
        session.insert(keys::CART_TOKEN, merged).await?;
    }

    if let Some(anonymous) = wishlist::get_wishlist_token(&session).await {
        let merged = WishlistRepository::new(state.pool())
            .merge_into_user(anonymous, user.id)
            .await?;
        session.insert(keys::WISHLIST_TOKEN, merged).await?;
    }

    session
        .insert(
            keys::CURRENT_USER,
            CurrentUser {
                id: user.id,
                email: user.email,
            },
        )
        .await?;

    Ok(Redirect::to("/cart"))
}

/// Forget the identification and everything session-scoped with it.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }
    Redirect::to("/")
}
