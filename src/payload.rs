//! Sample payload decoding.

use ndarray::Array3;
use num_complex::Complex;
use serde::Serialize;

use crate::bytes::Cursor;
use crate::Result;

/// Blocks in one packet's payload
pub const BLOCKS_PER_PACKET: usize = 128;
/// Channels in one block
pub const CHANNELS_PER_BLOCK: usize = 8;
/// Polarizations per channel
pub const POLARIZATIONS: usize = 2;

/// One complex sample: two consecutive big-endian u16s, real then imaginary.
pub type Sample = Complex<u16>;

/// The decoded sample payload, indexed by (block, channel, polarization).
///
/// The geometry is fixed by the data format; the array always has extents
/// (``BLOCKS_PER_PACKET``, ``CHANNELS_PER_BLOCK``, ``POLARIZATIONS``) and
/// access is bounds checked.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Payload {
    samples: Array3<Sample>,
}

impl Payload {
    /// Payload length in bytes
    pub const LEN: usize = BLOCKS_PER_PACKET * CHANNELS_PER_BLOCK * POLARIZATIONS * 4;

    /// Decode samples in block-major, channel-next, polarization-innermost
    /// order.
    ///
    /// # Errors
    /// ``Error::Truncated`` if the buffer ends before the full geometry is
    /// filled. No partial payload is exposed.
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let mut samples = Array3::zeros((BLOCKS_PER_PACKET, CHANNELS_PER_BLOCK, POLARIZATIONS));
        for block in 0..BLOCKS_PER_PACKET {
            for channel in 0..CHANNELS_PER_BLOCK {
                for pol in 0..POLARIZATIONS {
                    let re = cursor.read_u16()?;
                    let im = cursor.read_u16()?;
                    samples[[block, channel, pol]] = Complex::new(re, im);
                }
            }
        }
        Ok(Payload { samples })
    }

    /// Sample at (block, channel, polarization), or `None` if any index is
    /// out of range.
    #[must_use]
    pub fn get(&self, block: usize, channel: usize, pol: usize) -> Option<Sample> {
        self.samples.get([block, channel, pol]).copied()
    }

    /// The full (block, channel, polarization) sample array.
    #[must_use]
    pub fn samples(&self) -> &Array3<Sample> {
        &self.samples
    }
}
