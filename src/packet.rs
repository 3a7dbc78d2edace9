use std::fmt::{self, Display};

use serde::Serialize;
use tracing::trace;

use crate::bytes::Cursor;
use crate::frame::FrameHeader;
use crate::net::Encapsulation;
use crate::payload::Payload;
use crate::Result;

/// One decoded CODIF packet: optional link-layer encapsulation, the 8-word
/// frame header, and the sample payload.
///
/// A decode either completes or fails; no partial packet is ever produced.
/// Packets are immutable after construction and share no state, so separate
/// buffers may be decoded concurrently with no coordination.
///
/// # Example
/// ```
/// use codif::Packet;
///
/// let buf = vec![0u8; Packet::LEN];
/// let packet = Packet::decode(&buf).unwrap();
/// assert_eq!(packet.header.word0.frame_number, 0);
/// ```
#[derive(Serialize, Debug, Clone)]
pub struct Packet {
    pub encapsulation: Option<Encapsulation>,
    pub header: FrameHeader,
    pub payload: Payload,
}

impl Packet {
    /// Bare packet length: frame header plus payload
    pub const LEN: usize = FrameHeader::LEN + Payload::LEN;
    /// Encapsulated packet length: Ethernet/IPv4/UDP headers, then the bare
    /// packet
    pub const ENCAPSULATED_LEN: usize = Encapsulation::LEN + Self::LEN;

    /// Decode a packet whose encapsulation headers have already been
    /// stripped.
    ///
    /// # Errors
    /// ``Error::Truncated`` if the buffer is short of ``Packet::LEN`` bytes.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(buf);
        let header = FrameHeader::decode(&mut cursor)?;
        let payload = Payload::decode(&mut cursor)?;

        trace!(
            frame_number = header.word0.frame_number,
            bytes = cursor.position(),
            "decoded packet"
        );

        Ok(Packet {
            encapsulation: None,
            header,
            payload,
        })
    }

    /// Decode a packet captured off a live link: Ethernet, IPv4, and UDP
    /// headers first, then the frame header and payload.
    ///
    /// The caller selects this path when it knows the capture retained its
    /// link-layer headers, e.g. from the total buffer size.
    ///
    /// # Errors
    /// ``Error::Truncated`` if the buffer is short of
    /// ``Packet::ENCAPSULATED_LEN`` bytes.
    pub fn decode_encapsulated(buf: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(buf);
        let encapsulation = Encapsulation::decode(&mut cursor)?;
        let header = FrameHeader::decode(&mut cursor)?;
        let payload = Payload::decode(&mut cursor)?;

        trace!(
            frame_number = header.word0.frame_number,
            src_port = encapsulation.udp.src_port,
            bytes = cursor.position(),
            "decoded encapsulated packet"
        );

        Ok(Packet {
            encapsulation: Some(encapsulation),
            header,
            payload,
        })
    }

    /// Indented JSON of the decoded structure, for diagnostic display.
    ///
    /// # Errors
    /// Any ``serde_json::Error`` serializing.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Packet{{header: {}, encapsulated: {}}}",
            self.header,
            self.encapsulation.is_some()
        )
    }
}
