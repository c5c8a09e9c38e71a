//! Email service for transactional storefront mail.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. The only
//! mail the storefront sends today is the order confirmation, rendered in
//! the locale the shopper checked out in.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use verlaine_core::Locale;

use crate::config::SmtpConfig;
use crate::db::orders::OrderSummary;

/// A rendered order line for the confirmation templates.
struct ConfirmationLine {
    name: String,
    quantity: u32,
    line_total: String,
}

/// HTML template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    french: bool,
    reference: &'a str,
    lines: &'a [ConfirmationLine],
    total: String,
    shipping_name: Option<&'a str>,
}

/// Plain text template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    french: bool,
    reference: &'a str,
    lines: &'a [ConfirmationLine],
    total: String,
    shipping_name: Option<&'a str>,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send an order confirmation in the order's locale.
    ///
    /// Called after the order transaction has committed; a failure here is
    /// logged by the caller but never unwinds the order.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_order_confirmation(
        &self,
        to: &str,
        order: &OrderSummary,
    ) -> Result<(), EmailError> {
        let french = order.locale == Locale::Fr;
        let lines: Vec<ConfirmationLine> = order
            .lines
            .iter()
            .map(|line| ConfirmationLine {
                name: line.product_name.clone(),
                quantity: line.quantity,
                line_total: line.line_total.display(),
            })
            .collect();
        let total = order.total.display();
        let shipping_name = order.shipping.as_ref().map(|s| s.name.as_str());

        let html = OrderConfirmationHtml {
            french,
            reference: &order.reference,
            lines: &lines,
            total: total.clone(),
            shipping_name,
        }
        .render()?;
        let text = OrderConfirmationText {
            french,
            reference: &order.reference,
            lines: &lines,
            total,
            shipping_name,
        }
        .render()?;

        let subject = if french {
            format!("Votre commande {} — Maison Verlaine", order.reference)
        } else {
            format!("Your order {} — Maison Verlaine", order.reference)
        };

        self.send_multipart_email(to, &subject, &text, &html).await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}
