use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::types::User;

pub const NATIONAL_ID_MIN_LEN: usize = 7;
pub const NATIONAL_ID_MAX_LEN: usize = 8;
pub const PIN_LEN: usize = 4;

/// a kenyan national id number: 7 or 8 digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let id = input.trim();
        let digits_only = !id.is_empty() && id.chars().all(|c| c.is_ascii_digit());
        if !digits_only || id.len() < NATIONAL_ID_MIN_LEN || id.len() > NATIONAL_ID_MAX_LEN {
            return Err(ValidationError::InvalidNationalId {
                min: NATIONAL_ID_MIN_LEN,
                max: NATIONAL_ID_MAX_LEN,
            });
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// a 4-digit login pin; never printed
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Pin(String);

impl Pin {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.len() != PIN_LEN || !input.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidPin { length: PIN_LEN });
        }
        Ok(Self(input.to_string()))
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// body for `/auth/login`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest<'a> {
    pub national_id: &'a str,
    pub pin: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// the signed-in user and their bearer token
///
/// Owned by the app and passed to whatever needs it; nothing in the
/// crate reads credentials from ambient storage.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// a session restored from a previously saved token and profile
    pub fn restore(token: impl Into<String>, user: Option<User>) -> Self {
        Self {
            token: Some(token.into()),
            user,
        }
    }

    pub fn sign_in(&mut self, response: LoginResponse) {
        self.token = Some(response.token);
        self.user = Some(response.user);
    }

    /// cache a profile fetched before login (the national-id lookup)
    pub fn remember_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("user", &self.user.as_ref().map(|u| u.id.as_str()))
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::types::User;

    pub fn user() -> User {
        User {
            id: "u-42".to_string(),
            first_name: "Amina".to_string(),
            last_name: "Otieno".to_string(),
            email: "amina@example.com".to_string(),
            phone_number: "254712345678".to_string(),
            national_id: "12345678".to_string(),
            employee_id: "EMP-042".to_string(),
            department: "Finance".to_string(),
            position: "Analyst".to_string(),
            status: "active".to_string(),
            employment_type: "permanent".to_string(),
        }
    }
}
