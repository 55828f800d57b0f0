mod env_overrides;
mod loader;
#[cfg(test)]
mod test_env;
mod types;
mod validate;

pub use env_overrides::ACCESS_TOKEN_ENV;
pub use types::{Config, IrcConfig, TelegramConfig, WebhookConfig};
