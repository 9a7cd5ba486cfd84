pub mod connection;
pub mod handler;
pub mod types;

pub use connection::{HandlerId, RealtimeChannel};
pub use handler::ws_handler;
pub use types::{ChannelEvent, RECEIVE_NOTIFY};
