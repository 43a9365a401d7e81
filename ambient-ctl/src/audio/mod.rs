//! Audio channel abstraction and the in-memory channel implementation

mod channel;
mod virtual_channel;

pub use channel::{clip_name, AudioChannel, ChannelState};
pub use virtual_channel::VirtualChannel;
