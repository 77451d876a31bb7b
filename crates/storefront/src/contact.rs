//! Prefilled messaging links for placing orders.
//!
//! Checkout does not talk to a payment backend; it opens a chat with the shop
//! with the order message already typed in. The link is push-only: nothing
//! comes back.

use std::fmt;

use thiserror::Error;
use url::Url;

const WHATSAPP_BASE: &str = "https://wa.me/";
const MIN_PHONE_DIGITS: usize = 8;
const MAX_PHONE_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("phone number must be 8-15 digits with country code, got '{0}'")]
    InvalidPhone(String),

    #[error("failed to build contact link: {0}")]
    Url(#[from] url::ParseError),
}

/// International phone number in the digits-only form chat links expect
/// (country code first, no `+`, spaces or dashes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// # Errors
    ///
    /// Returns `ContactError::InvalidPhone` for anything but 8-15 ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, ContactError> {
        let digits = raw.trim();
        let valid = (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len())
            && digits.chars().all(|c| c.is_ascii_digit());
        if !valid {
            return Err(ContactError::InvalidPhone(raw.to_string()));
        }
        Ok(Self(digits.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build `https://wa.me/<phone>?text=<message>` with the message
/// percent-encoded (newlines become `%0A`).
///
/// # Errors
///
/// Returns `ContactError::Url` if the resulting URL does not parse.
pub fn whatsapp_link(phone: &PhoneNumber, message: &str) -> Result<Url, ContactError> {
    let mut url = Url::parse(WHATSAPP_BASE)?.join(phone.as_str())?;
    url.set_query(Some(&format!("text={}", urlencoding::encode(message))));
    Ok(url)
}
