pub mod client;
pub mod events;

pub use client::BroadcastSocket;
pub use events::{parse_broadcast, Broadcast, ClickEvent};
