//! Checkout redirect configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Base used for redirect URLs when no site URL is configured.
pub const PLACEHOLDER_SITE_URL: &str = "https://your-domain.com";

/// Where the hosted checkout page sends the payer afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutConfig {
    /// Public site root, e.g. `https://programamilenio.com`
    pub site_url: Option<String>,
}

impl CheckoutConfig {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: Some(site_url.into()),
        }
    }

    /// Configured site root without a trailing slash, or the placeholder.
    pub fn base_url(&self) -> &str {
        self.site_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_SITE_URL)
    }

    /// Success redirect; Stripe substitutes the session id template.
    pub fn success_url(&self) -> String {
        format!("{}/success?session_id={{CHECKOUT_SESSION_ID}}", self.base_url())
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/cancel", self.base_url())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.site_url {
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                Err(ValidationError::InvalidSiteUrl)
            }
            _ => Ok(()),
        }
    }
}
