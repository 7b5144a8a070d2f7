use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::{generate_id, now_millis};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    Male,
    Female,
    Other,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
            Sex::Other => write!(f, "Other"),
        }
    }
}

/// An in-progress, unconfirmed record. Carries every user-entered field but
/// no id and no timestamp, those only exist once the person confirms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub full_name: String,
    pub birth_date: String,
    pub nationality: String,
    #[serde(default)]
    pub sex: Sex,
    pub primary_phone: String,
    #[serde(default)]
    pub alternate_phone: String,
    pub email: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in your full name")]
    MissingFullName,

    #[error("Please fill in your birth date")]
    MissingBirthDate,

    #[error("Please fill in your nationality")]
    MissingNationality,

    #[error("Please fill in your primary phone")]
    MissingPrimaryPhone,

    #[error("Please provide a valid e-mail address")]
    InvalidEmail,
}

impl Draft {
    /// Field checks run in a fixed order, the first failing one wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::MissingFullName);
        }
        if self.birth_date.trim().is_empty() {
            return Err(ValidationError::MissingBirthDate);
        }
        if self.nationality.trim().is_empty() {
            return Err(ValidationError::MissingNationality);
        }
        if self.primary_phone.trim().is_empty() {
            return Err(ValidationError::MissingPrimaryPhone);
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(())
    }
}

/// One completed, confirmed intake record. Written exactly once, never
/// updated or deleted here. `timestamp` is optional so records appended
/// before the field existed still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    #[serde(flatten)]
    pub draft: Draft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Submission {
    /// Attaches the generated share id and the current epoch-millis
    /// timestamp to a confirmed draft.
    pub fn finalize(draft: Draft) -> Self {
        Self {
            id: generate_id(),
            draft,
            timestamp: Some(now_millis()),
        }
    }
}
