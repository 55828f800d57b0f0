pub mod channel;
mod message;
mod parse;
mod session;

pub use channel::IrcChannel;
