use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::conference::ConferenceId;
use crate::session::SessionId;

/// Per-user profile holding registrations and the session wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Stable user id (the caller's normalized email).
    pub user_id: String,
    pub display_name: String,
    pub main_email: String,
    pub tee_shirt_size: TeeShirtSize,
    pub conference_keys_to_attend: Vec<ConferenceId>,
    pub session_wishlist: Vec<SessionId>,
}

impl Profile {
    /// A fresh profile for a user seen for the first time.
    pub fn new(user_id: &str, display_name: &str, main_email: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            main_email: main_email.to_string(),
            tee_shirt_size: TeeShirtSize::NotSpecified,
            conference_keys_to_attend: Vec::new(),
            session_wishlist: Vec::new(),
        }
    }
}

/// The caller on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub email: String,
    pub nickname: String,
}

/// Tee-shirt size, with men's (`_M`) and women's (`_W`) cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeeShirtSize {
    #[default]
    NotSpecified,
    XsM,
    XsW,
    SM,
    SW,
    MM,
    MW,
    LM,
    LW,
    XlM,
    XlW,
    XxlM,
    XxlW,
    XxxlM,
    XxxlW,
}

impl TeeShirtSize {
    const ALL: [(TeeShirtSize, &'static str); 15] = [
        (TeeShirtSize::NotSpecified, "NOT_SPECIFIED"),
        (TeeShirtSize::XsM, "XS_M"),
        (TeeShirtSize::XsW, "XS_W"),
        (TeeShirtSize::SM, "S_M"),
        (TeeShirtSize::SW, "S_W"),
        (TeeShirtSize::MM, "M_M"),
        (TeeShirtSize::MW, "M_W"),
        (TeeShirtSize::LM, "L_M"),
        (TeeShirtSize::LW, "L_W"),
        (TeeShirtSize::XlM, "XL_M"),
        (TeeShirtSize::XlW, "XL_W"),
        (TeeShirtSize::XxlM, "XXL_M"),
        (TeeShirtSize::XxlW, "XXL_W"),
        (TeeShirtSize::XxxlM, "XXXL_M"),
        (TeeShirtSize::XxxlW, "XXXL_W"),
    ];

    pub fn as_str(&self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(size, _)| size == self)
            .map(|(_, name)| *name)
            .unwrap_or("NOT_SPECIFIED")
    }
}

impl fmt::Display for TeeShirtSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeeShirtSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .find(|(_, name)| *name == wanted)
            .map(|(size, _)| *size)
            .ok_or_else(|| format!("invalid tee-shirt size: '{s}'"))
    }
}

/// User-modifiable profile fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub tee_shirt_size: Option<TeeShirtSize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_shirt_size_roundtrip() {
        for (size, name) in TeeShirtSize::ALL {
            assert_eq!(size.to_string(), name);
            assert_eq!(name.parse::<TeeShirtSize>().unwrap(), size);
        }
    }

    #[test]
    fn test_tee_shirt_size_serde_matches_display() {
        let json = serde_json::to_string(&TeeShirtSize::XxxlW).unwrap();
        assert_eq!(json, "\"XXXL_W\"");
        let json = serde_json::to_string(&TeeShirtSize::SM).unwrap();
        assert_eq!(json, "\"S_M\"");
    }

    #[test]
    fn test_new_profile_defaults() {
        let profile = Profile::new("ann@example.com", "ann", "ann@example.com");
        assert_eq!(profile.tee_shirt_size, TeeShirtSize::NotSpecified);
        assert!(profile.conference_keys_to_attend.is_empty());
        assert!(profile.session_wishlist.is_empty());
    }
}
