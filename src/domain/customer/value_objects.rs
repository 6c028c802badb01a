use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::CustomerError;

// ============================================================================
// Customer Value Objects
// ============================================================================

/// Profile fields a user may set from chat with `update <field>: <value>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileField {
    Email,
    Nickname,
    Social,
    Consent,
}

impl ProfileField {
    pub const ALL: [ProfileField; 4] = [
        ProfileField::Email,
        ProfileField::Nickname,
        ProfileField::Social,
        ProfileField::Consent,
    ];

    /// Column key used by stores.
    pub fn column(&self) -> &'static str {
        match self {
            ProfileField::Email => "email",
            ProfileField::Nickname => "nickname",
            ProfileField::Social => "social",
            ProfileField::Consent => "consent",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for ProfileField {
    type Err = CustomerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        ProfileField::ALL
            .into_iter()
            .find(|field| field.column() == key)
            .ok_or(CustomerError::UnknownField(key))
    }
}

/// A chat user, identified by cell number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub cell_number: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub social: Option<String>,
    pub consent: Option<String>,
}

impl UserInfo {
    pub fn new(cell_number: impl Into<String>) -> Self {
        Self {
            cell_number: cell_number.into(),
            ..Default::default()
        }
    }

    pub fn field(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::Email => self.email.as_deref(),
            ProfileField::Nickname => self.nickname.as_deref(),
            ProfileField::Social => self.social.as_deref(),
            ProfileField::Consent => self.consent.as_deref(),
        }
    }

    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = Some(value.into());
        match field {
            ProfileField::Email => self.email = value,
            ProfileField::Nickname => self.nickname = value,
            ProfileField::Social => self.social = value,
            ProfileField::Consent => self.consent = value,
        }
    }

    /// Profile as shown in reply to `userinfo?`.
    pub fn render_profile(&self) -> String {
        let mut lines = vec![
            "Your user info:".to_string(),
            format!("cell number: {}", self.cell_number),
        ];
        for field in ProfileField::ALL {
            lines.push(format!("{}: {}", field, self.field(field).unwrap_or("not set")));
        }
        lines.join("\n")
    }
}
