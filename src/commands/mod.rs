pub mod parser;

pub use parser::parse_command;

/// Chat commands understood by channels that enable them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
}

impl Command {
    /// Reply text for `sender`, addressed the way Telegram users expect.
    pub fn reply(self, sender: &str) -> String {
        match self {
            Command::Ping => format!("@{sender} pong"),
        }
    }
}
