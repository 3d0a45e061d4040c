//! Credential validation for signup and login forms.
//!
//! Two passes: a presence check that short-circuits with
//! [`DomainError::MissingFields`], then structural rules where only the
//! first violation (in field order) is reported.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::DomainError;

const FIELD_ORDER: [&str; 3] = ["name", "email", "password"];

const EMAIL_MESSAGE: &str = "\"email\" must be a valid email";

/// Within a field the derive reports rules in its own order; these codes
/// go first, matching the order the rules are declared in.
const LEADING_RULES: [&str; 1] = ["alphanum"];

/// Raw signup form. Fields are optional because the caller is untrusted.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        custom(function = "validate_alphanumeric"),
        length(min = 2, max = 30, message = "\"name\" length must be between 2 and 30 characters long")
    )]
    pub name: Option<String>,

    #[validate(
        email(message = "\"email\" must be a valid email"),
        custom(function = "validate_email_domain")
    )]
    pub email: Option<String>,

    #[validate(length(min = 5, max = 50, message = "\"password\" length must be between 5 and 50 characters long"))]
    pub password: Option<String>,
}

/// Raw login form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        email(message = "\"email\" must be a valid email"),
        custom(function = "validate_email_domain")
    )]
    pub email: Option<String>,

    #[validate(length(min = 5, max = 50, message = "\"password\" length must be between 5 and 50 characters long"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignupCredentials<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginCredentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl SignupRequest {
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    pub fn credentials(&self) -> Result<SignupCredentials<'_>, DomainError> {
        let (Some(name), Some(email), Some(password)) = (
            present(&self.name),
            present(&self.email),
            present(&self.password),
        ) else {
            return Err(DomainError::MissingFields);
        };

        self.validate().map_err(first_violation)?;
        Ok(SignupCredentials { name, email, password })
    }
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    pub fn credentials(&self) -> Result<LoginCredentials<'_>, DomainError> {
        let (Some(email), Some(password)) = (present(&self.email), present(&self.password)) else {
            return Err(DomainError::MissingFields);
        };

        self.validate().map_err(first_violation)?;
        Ok(LoginCredentials { email, password })
    }
}

/// Absent and empty are the same thing to a form.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Ok(());
    }
    Err(ValidationError::new("alphanum")
        .with_message(Cow::Borrowed("\"name\" must only contain alpha-numeric characters")))
}

/// Mail domains need at least two labels and an alphabetic top-level domain,
/// which the plain email rule doesn't demand (`a@localhost` passes it).
fn validate_email_domain(value: &str) -> Result<(), ValidationError> {
    let domain = value.rsplit_once('@').map(|(_, domain)| domain).unwrap_or_default();
    let well_formed = match domain.rsplit_once('.') {
        Some((rest, tld)) => {
            !rest.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    };
    if well_formed {
        return Ok(());
    }
    Err(ValidationError::new("email_domain").with_message(Cow::Borrowed(EMAIL_MESSAGE)))
}

fn rule_rank(error: &ValidationError) -> usize {
    LEADING_RULES
        .iter()
        .position(|code| error.code == *code)
        .unwrap_or(LEADING_RULES.len())
}

fn first_violation(errors: ValidationErrors) -> DomainError {
    let field_errors = errors.field_errors();
    let message = FIELD_ORDER
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .filter_map(|errors| errors.iter().min_by_key(|error| rule_rank(error)))
        .map(|error| match &error.message {
            Some(message) => message.to_string(),
            None => error.code.to_string(),
        })
        .next()
        .unwrap_or_else(|| errors.to_string());
    DomainError::ValidationError(message)
}
