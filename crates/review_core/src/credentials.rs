use std::fmt;

pub const API_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const MESSENGER_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
}

/// Secrets needed to poll the status API and report to the chat.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_token: String,
    messenger_token: String,
    chat_id: String,
}

impl Credentials {
    /// Build credentials from a variable lookup, rejecting absent or blank values.
    ///
    /// Variables are checked in a fixed order and the first missing one is reported.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut require = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            api_token: require(API_TOKEN_VAR)?,
            messenger_token: require(MESSENGER_TOKEN_VAR)?,
            chat_id: require(CHAT_ID_VAR)?,
        })
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn messenger_token(&self) -> &str {
        &self.messenger_token
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .field("messenger_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}
