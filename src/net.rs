//! Ethernet/IPv4/UDP encapsulation headers.
//!
//! Present when the packet was captured off a live link rather than read
//! from a pre-stripped stream. The caller decides whether these headers are
//! present; the frame decode does not depend on them. No checksum
//! verification is performed.

use std::fmt::{self, Display};
use std::net::Ipv4Addr;

use serde::Serialize;

use crate::bytes::Cursor;
use crate::Result;

/// A MAC address, displayed as colon-separated hex octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddr(pub [u8; 6]);

impl Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

impl Serialize for MacAddr {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EthernetHeader {
    pub dest_mac_addr: MacAddr,
    pub src_mac_addr: MacAddr,
    pub frame_length: u16,
}

impl EthernetHeader {
    /// Ethernet header length in bytes
    pub const LEN: usize = 14;

    /// Decode from the next 14 bytes.
    ///
    /// # Errors
    /// ``Error::Truncated`` on a short buffer.
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let mut dest = [0u8; 6];
        dest.copy_from_slice(cursor.read(6)?);
        let mut src = [0u8; 6];
        src.copy_from_slice(cursor.read(6)?);
        Ok(EthernetHeader {
            dest_mac_addr: MacAddr(dest),
            src_mac_addr: MacAddr(src),
            frame_length: cursor.read_u16()?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Ipv4Header {
    pub version: u8,
    pub ihl: u8,
    pub tos: u8,
    pub total_length: u16,
    pub identification: u16,
    pub flags: u8,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub src_addr: Ipv4Addr,
    pub dest_addr: Ipv4Addr,
}

impl Ipv4Header {
    /// IPv4 header length in bytes; options are not supported
    pub const LEN: usize = 20;

    /// Decode from the next 20 bytes. The checksum is extracted but not
    /// verified.
    ///
    /// # Errors
    /// ``Error::Truncated`` on a short buffer.
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let b = cursor.read_u8()?;
        let version = (b >> 4) & 0xf;
        let ihl = b & 0xf;
        let tos = cursor.read_u8()?;
        let total_length = cursor.read_u16()?;
        let identification = cursor.read_u16()?;
        // flags are the top 3 bits, fragment offset the low 13
        let frag = cursor.read_u16()?;
        let flags = ((frag >> 13) & 0x7) as u8;
        let fragment_offset = frag & 0x1fff;
        let ttl = cursor.read_u8()?;
        let protocol = cursor.read_u8()?;
        let checksum = cursor.read_u16()?;
        let s = cursor.read(4)?;
        let src_addr = Ipv4Addr::new(s[0], s[1], s[2], s[3]);
        let d = cursor.read(4)?;
        let dest_addr = Ipv4Addr::new(d[0], d[1], d[2], d[3]);

        Ok(Ipv4Header {
            version,
            ihl,
            tos,
            total_length,
            identification,
            flags,
            fragment_offset,
            ttl,
            protocol,
            checksum,
            src_addr,
            dest_addr,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UdpHeader {
    pub src_port: u16,
    pub dest_port: u16,
    pub length: u16,
    pub checksum: u16,
}

impl UdpHeader {
    /// UDP header length in bytes
    pub const LEN: usize = 8;

    /// Decode from the next 8 bytes.
    ///
    /// # Errors
    /// ``Error::Truncated`` on a short buffer.
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        Ok(UdpHeader {
            src_port: cursor.read_u16()?,
            dest_port: cursor.read_u16()?,
            length: cursor.read_u16()?,
            checksum: cursor.read_u16()?,
        })
    }
}

/// The link-layer headers preceding a frame captured off a live link.
#[derive(Debug, Clone, Serialize)]
pub struct Encapsulation {
    pub eth: EthernetHeader,
    pub ipv4: Ipv4Header,
    pub udp: UdpHeader,
}

impl Encapsulation {
    /// Total encapsulation length in bytes
    pub const LEN: usize = EthernetHeader::LEN + Ipv4Header::LEN + UdpHeader::LEN;

    /// Decode Ethernet, IPv4, then UDP headers, strictly in that order.
    ///
    /// # Errors
    /// ``Error::Truncated`` on a short buffer.
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        Ok(Encapsulation {
            eth: EthernetHeader::decode(cursor)?,
            ipv4: Ipv4Header::decode(cursor)?,
            udp: UdpHeader::decode(cursor)?,
        })
    }
}
