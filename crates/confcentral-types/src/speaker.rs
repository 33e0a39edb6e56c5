use serde::{Deserialize, Serialize};

/// A person who may present any number of sessions.
///
/// Keyed by `email`, stored normalized (trimmed, lower-cased), so one
/// speaker record can be referenced from sessions in any conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub email: String,
    pub name: String,
    pub biography: Option<String>,
    pub company: Option<String>,
}

/// Request to create a speaker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSpeakerRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub biography: Option<String>,
    pub company: Option<String>,
}

/// Normalize an email address into a speaker key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check that a normalized email looks like `local@domain`.
pub fn validate_email(email: &str) -> Result<(), String> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(format!("invalid email address: '{email}'")),
    }
}
