//! Client domain model.
//!
//! # Responsibility
//! - Define the single persisted customer profile record.
//! - Own field-level validation applied before insert.
//!
//! # Invariants
//! - `id` is assigned by storage on insert and never changes afterwards.
//! - `fio`, `login`, `birthday`, `email` are required and non-blank.
//! - `birthday` is exactly 8 ASCII digits (`YYYYMMDD`).
//! - `email` is free text; only presence is required.
//!
//! # See also
//! - crates/clientdb_core/src/db/migrations/0001_clients.sql

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

// Why: `\d` matches any Unicode digit; `[0-9]` keeps the check ASCII-only.
static BIRTHDAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{8}$").expect("valid birthday regex"));

/// Storage-assigned client identifier.
///
/// `0` marks an unsaved or zero-valued record; SQLite never hands it out.
pub type ClientId = i64;

/// Validation failure for client field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    /// Required field is empty or whitespace-only.
    EmptyField(&'static str),
    /// Birthday is not 8 ASCII digits.
    InvalidBirthday(String),
}

impl Display for ClientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "client field `{field}` must not be empty"),
            Self::InvalidBirthday(value) => {
                write!(f, "invalid birthday `{value}`; expected YYYYMMDD")
            }
        }
    }
}

impl Error for ClientValidationError {}

/// Customer profile record stored in the `clients` table.
///
/// `Client::default()` is the zero-valued record returned to callers that
/// collapse a not-found lookup with `unwrap_or_default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Storage-assigned id; ignored on insert.
    pub id: ClientId,
    /// Full name.
    pub fio: String,
    pub login: String,
    /// `YYYYMMDD`.
    pub birthday: String,
    pub email: String,
}

impl Client {
    /// Creates an unsaved client (`id == 0`).
    ///
    /// Does not validate; write paths call [`Client::validate`].
    pub fn new(
        fio: impl Into<String>,
        login: impl Into<String>,
        birthday: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            fio: fio.into(),
            login: login.into(),
            birthday: birthday.into(),
            email: email.into(),
        }
    }

    /// Returns whether storage has assigned an id to this record.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Checks that a record may be inserted.
    ///
    /// # Errors
    /// - `EmptyField` for the first blank field in declaration order.
    /// - `InvalidBirthday` when `birthday` is not 8 ASCII digits.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        for (name, value) in [
            ("fio", &self.fio),
            ("login", &self.login),
            ("birthday", &self.birthday),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(ClientValidationError::EmptyField(name));
            }
        }

        if !BIRTHDAY_RE.is_match(&self.birthday) {
            return Err(ClientValidationError::InvalidBirthday(self.birthday.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Client, ClientValidationError};

    fn with_birthday(birthday: &str) -> Client {
        Client::new("Test", "Test", birthday, "mail@mail.com")
    }

    #[test]
    fn birthday_accepts_any_eight_ascii_digits() {
        assert!(with_birthday("19700101").validate().is_ok());
        assert!(with_birthday("20000229").validate().is_ok());
        assert!(with_birthday("19701332").validate().is_ok());
    }

    #[test]
    fn birthday_rejects_wrong_length_or_non_digits() {
        for value in ["1970-01-01", "1970011", "197001011", "1970O101", "١٩٧٠٠١٠١"] {
            assert_eq!(
                with_birthday(value).validate().unwrap_err(),
                ClientValidationError::InvalidBirthday(value.to_string()),
                "birthday `{value}` should be rejected"
            );
        }
    }

    #[test]
    fn validate_reports_first_blank_field() {
        let client = Client::new("Test", "  ", "", "mail@mail.com");
        assert_eq!(
            client.validate().unwrap_err(),
            ClientValidationError::EmptyField("login")
        );
    }
}
