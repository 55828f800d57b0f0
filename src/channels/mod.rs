mod health;
#[cfg(feature = "irc")]
pub mod irc;
pub mod message_handler;
mod runtime;
pub mod startup;
#[cfg(feature = "telegram")]
pub mod telegram;
pub mod traits;

#[cfg(feature = "irc")]
pub use irc::IrcChannel;
pub use message_handler::{ChannelRuntime, handle_channel_message};
pub use startup::{doctor_channels, start_channels};
#[cfg(feature = "telegram")]
pub use telegram::{TelegramChannel, TelegramMode};
pub use traits::{Channel, ChannelMessage};
