use super::Config;
use crate::error::ConfigError;

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.links.max_body_chars == 0 {
            return Err(invalid("links.max_body_chars must be greater than 0"));
        }
        if self.links.timeout_secs == 0 {
            return Err(invalid("links.timeout_secs must be greater than 0"));
        }

        let nickname = self.irc.nickname.trim();
        if nickname.is_empty() || nickname.contains(char::is_whitespace) {
            return Err(invalid(format!(
                "irc.nickname {:?} must be a single non-empty word",
                self.irc.nickname
            )));
        }
        if let Some(bad) = self
            .irc
            .channels
            .iter()
            .find(|chan| !(chan.starts_with('#') || chan.starts_with('&')) || chan.contains(' '))
        {
            return Err(invalid(format!(
                "irc channel {bad:?} must start with '#' or '&'"
            )));
        }

        if let Some(webhook) = &self.telegram.webhook
            && let Some(raw) = &webhook.url
        {
            let parsed = url::Url::parse(raw)
                .map_err(|e| invalid(format!("telegram.webhook.url {raw:?}: {e}")))?;
            if parsed.scheme() != "https" {
                return Err(invalid(format!(
                    "telegram.webhook.url {raw:?} must use https"
                )));
            }
        }

        Ok(())
    }
}
