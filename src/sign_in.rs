// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret as _, SecretString};

use crate::{navigation::Route, session::Session};

const EMAIL_REQUIRED: &str = "Email is required";
const EMAIL_INVALID: &str = "Please enter a valid email address";
const PASSWORD_REQUIRED: &str = "Password is required";
const CREDENTIALS_REJECTED: &str = "Invalid email or password";
const UNEXPECTED_FAILURE: &str = "An error occurred. Please try again.";

// LINT: The pattern is a literal and always compiles.
#[allow(clippy::expect_used)]
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Per-field messages for a rejected sign-in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FieldErrors {
    pub(crate) email: Option<String>,
    pub(crate) password: Option<String>,
}

impl FieldErrors {
    fn email(message: &str) -> Self {
        Self {
            email: Some(message.to_owned()),
            password: None,
        }
    }

    fn password(message: &str) -> Self {
        Self {
            email: None,
            password: Some(message.to_owned()),
        }
    }

    fn both(message: &str) -> Self {
        Self {
            email: Some(message.to_owned()),
            password: Some(message.to_owned()),
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = Vec::with_capacity(2);
        if let Some(message) = &self.email {
            fields.push(format!("Username: {message}"));
        }
        if let Some(message) = &self.password {
            fields.push(format!("Password: {message}"));
        }
        write!(f, "{}", fields.join("\n"))
    }
}

/// Checks the form fields in order and reports the first problem found.
pub(crate) fn validate(email: &str, password: &str) -> Result<(), FieldErrors> {
    if email.trim().is_empty() {
        return Err(FieldErrors::email(EMAIL_REQUIRED));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(FieldErrors::email(EMAIL_INVALID));
    }
    if password.trim().is_empty() {
        return Err(FieldErrors::password(PASSWORD_REQUIRED));
    }
    Ok(())
}

/// Validates the form and signs in. On success the caller should continue to
/// the returned route.
pub(crate) async fn submit(
    session: &mut Session,
    email: &str,
    password: &SecretString,
) -> Result<Route, FieldErrors> {
    validate(email, password.expose_secret())?;

    match session.login(email, password.expose_secret()).await {
        Ok(true) => {
            info!("Signed in as {}", email);
            Ok(Route::Photos)
        }
        Ok(false) => Err(FieldErrors::both(CREDENTIALS_REJECTED)),
        Err(e) => {
            error!("Sign-in failed: {}", e);
            Err(FieldErrors::both(UNEXPECTED_FAILURE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{self, testing::Failing, Memory};

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.to_owned())
    }

    #[test]
    fn validation_order() {
        assert_eq!(
            validate("  ", ""),
            Err(FieldErrors::email("Email is required"))
        );
        assert_eq!(
            validate("not-an-email", ""),
            Err(FieldErrors::email("Please enter a valid email address"))
        );
        assert_eq!(
            validate("ada@example", "pw"),
            Err(FieldErrors::email("Please enter a valid email address"))
        );
        assert_eq!(
            validate("ada@example.com", "   "),
            Err(FieldErrors::password("Password is required"))
        );
        assert_eq!(validate("ada@example.com", "pw"), Ok(()));
    }

    #[tokio::test]
    async fn submit_signs_in_and_goes_to_photos() {
        let mut session = Session::new(storage::shared(Memory::new()));
        assert_eq!(
            submit(&mut session, "ada@example.com", &secret("pw")).await,
            Ok(Route::Photos)
        );
        assert_eq!(session.identity().map(|i| i.display_name()), Some("ada"));
    }

    #[tokio::test]
    async fn submit_keeps_invalid_form_signed_out() {
        let mut session = Session::new(storage::shared(Memory::new()));
        let errors = submit(&mut session, "ada", &secret("pw")).await.unwrap_err();
        assert_eq!(errors.email.as_deref(), Some(EMAIL_INVALID));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn storage_failure_is_reported_on_both_fields() {
        let mut session = Session::new(storage::shared(Failing));
        assert_eq!(
            submit(&mut session, "ada@example.com", &secret("pw")).await,
            Err(FieldErrors::both("An error occurred. Please try again."))
        );
    }

    #[test]
    fn field_errors_render_per_line() {
        assert_eq!(
            FieldErrors::both("Invalid email or password").to_string(),
            "Username: Invalid email or password\nPassword: Invalid email or password"
        );
    }
}
