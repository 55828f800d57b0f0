use super::Config;

pub const ACCESS_TOKEN_ENV: &str = "LAURA_ACCESS_TOKEN";

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV)
            && !token.trim().is_empty()
        {
            self.telegram.access_token = Some(token.trim().to_string());
        }

        if let Ok(server) = std::env::var("LAURA_IRC_SERVER")
            && !server.is_empty()
        {
            self.irc.server = server;
        }

        if let Ok(nickname) = std::env::var("LAURA_IRC_NICKNAME")
            && !nickname.is_empty()
        {
            self.irc.nickname = nickname;
        }
    }
}
