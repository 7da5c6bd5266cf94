use serde::{Deserialize, Serialize};

pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Identity of the signed-in user for one request
///
/// The identity provider lives outside this service; all we consume is the
/// user id and a display name, handed to every component that needs them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, display_name: Option<String>) -> Self {
        let display_name = display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());

        Self {
            user_id: user_id.into(),
            display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_display_name_falls_back() {
        let session = Session::new("u1", Some("   ".to_string()));
        assert_eq!(session.display_name, "User");
    }

    #[test]
    fn test_display_name_is_trimmed() {
        let session = Session::new("u1", Some(" Ada ".to_string()));
        assert_eq!(session.display_name, "Ada");
        assert_eq!(session.user_id, "u1");
    }
}
