use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two applicant categories the registry accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantType {
    Intern,
    Volunteer,
}

impl ApplicantType {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicantType::Intern => "intern",
            ApplicantType::Volunteer => "volunteer",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "intern" => Some(Self::Intern),
            "volunteer" => Some(Self::Volunteer),
            _ => None,
        }
    }
}

/// A stored application, immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub applicant_type: ApplicantType,
    pub skills: String,
    pub experience: String,
    pub motivation: String,
    pub applied_at: DateTime<Utc>,
}

/// Raw caller-supplied submission, before any validation.
///
/// Every field is optional at the wire level so that a missing field is a
/// validation outcome with a usable message, not a deserialization reject.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "type")]
    pub applicant_type: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub motivation: Option<String>,
}

/// A draft that passed field validation: trimmed, email lowercased,
/// `type` resolved to the enum. Still lacks an id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub applicant_type: ApplicantType,
    pub skills: String,
    pub experience: String,
    pub motivation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("type must be either \"intern\" or \"volunteer\"")]
    UnknownType,
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    let trimmed = value.as_deref().unwrap_or("").trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

impl ApplicantDraft {
    /// Enforce the field-level rules: required fields non-empty after
    /// trimming, `type` a recognized value, email normalized to lowercase,
    /// absent experience defaulting to the empty string.
    pub fn validate(self) -> Result<ValidatedDraft, ValidationError> {
        let name = required("name", self.name)?;
        let email = required("email", self.email)?.to_lowercase();
        let phone = required("phone", self.phone)?;
        let raw_type = required("type", self.applicant_type)?;
        let applicant_type =
            ApplicantType::parse(&raw_type).ok_or(ValidationError::UnknownType)?;
        let skills = required("skills", self.skills)?;
        let experience = self
            .experience
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        let motivation = required("motivation", self.motivation)?;

        Ok(ValidatedDraft {
            name,
            email,
            phone,
            applicant_type,
            skills,
            experience,
            motivation,
        })
    }
}
