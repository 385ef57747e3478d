//! Password encoding and comparison.
//!
//! Passwords are stored and compared as plain text. Every write and every
//! comparison goes through this module so a salted hash can replace the
//! scheme later without touching stores or services.

/// Encode a raw password for storage.
#[must_use]
pub fn encode_password(raw: &str) -> String {
    raw.to_owned()
}

/// Compare a stored password against a login attempt.
#[must_use]
pub fn password_matches(stored: &str, supplied: &str) -> bool {
    stored == encode_password(supplied)
}
