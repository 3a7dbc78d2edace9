#![doc = include_str!("../README.md")]

mod bytes;
mod error;

pub mod frame;
pub mod net;
pub mod packet;
pub mod payload;

pub use bytes::Cursor;
pub use error::{Error, Result};
pub use frame::FrameHeader;
pub use packet::Packet;
pub use payload::Payload;
