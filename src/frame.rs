//! CODIF frame header decoding.
//!
//! A frame header is 8 consecutive big-endian 64-bit words. Every field is
//! extracted shift-then-mask, even where a shift alone would isolate the
//! bits, so neighboring flag bits never leak into a field's value.

use std::fmt::{self, Display};

use serde::Serialize;
use tracing::trace;

use crate::bytes::Cursor;
use crate::{Error, Result};

/// Word 0: validity flags, epoch seconds, and frame number.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Word0 {
    pub invalid: bool,
    pub complex: bool,
    /// Seconds from the reference epoch to the start of the current period,
    /// bits 61..32 (30 bits; the two flag bits above are masked out).
    pub epoch_start_sec: u32,
    pub frame_number: u32,
}

/// Word 1: format version and sample layout.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Word1 {
    pub version: u8,
    pub bits_per_sample: u8,
    pub array_length: u32,
    pub ref_epoch_period: u8,
    pub sample_representation: u8,
    pub unassigned: u8,
    pub station_id: u16,
}

/// Word 2: channel and beam addressing.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Word2 {
    pub block_length: u16,
    pub channels_per_thread: u16,
    pub freq_group: u16,
    pub beam_id: u16,
}

/// Word 3: period length; the rest is reserved.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Word3 {
    pub reserved16: u16,
    pub period: u16,
    pub reserved32: u32,
}

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Word4 {
    pub intervals_per_period: u64,
}

/// Word 5: synchronization sequence; the rest is reserved.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Word5 {
    #[serde(serialize_with = "hex_u32")]
    pub sync_seq: u32,
    pub reserved32: u32,
}

impl Word5 {
    /// The sync sequence as hexadecimal text, e.g. `"0x0"` for zero.
    #[must_use]
    pub fn sync_seq_hex(&self) -> String {
        format!("{:#x}", self.sync_seq)
    }
}

/// Word 6: extended user data with its version tag.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Word6 {
    pub ext_data_version: u8,
    /// Bits 55..0 of word 6; distinct from ``Word7::ext_user_data``.
    pub ext_user_data: u64,
}

/// Word 7: a further 64 bits of extended user data.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Word7 {
    pub ext_user_data: u64,
}

fn hex_u32<S>(v: &u32, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&format_args!("{v:#x}"))
}

/// CODIF frame header: 8 big-endian 64-bit words.
///
/// Same-named fields on different words (`reserved32` on words 3 and 5,
/// `ext_user_data` on words 6 and 7) are distinct values; address them
/// through their word, e.g. `header.word3.reserved32`.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub word0: Word0,
    pub word1: Word1,
    pub word2: Word2,
    pub word3: Word3,
    pub word4: Word4,
    pub word5: Word5,
    pub word6: Word6,
    pub word7: Word7,
}

impl FrameHeader {
    /// Frame header length in bytes
    pub const LEN: usize = 64;
    /// Highest defined CODIF format version
    pub const MAX_VERSION: u8 = 3;
    /// Highest defined sample representation encoding
    pub const MAX_SAMPLE_REPRESENTATION: u8 = 10;

    /// Decode the 8-word frame header from the next 64 bytes.
    ///
    /// No range validation is performed; any bit pattern decodes. See
    /// [`FrameHeader::validate`].
    ///
    /// # Errors
    /// ``Error::Truncated`` if fewer than 64 bytes remain.
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let mut words = [0u64; 8];
        for word in &mut words {
            *word = cursor.read_u64()?;
        }

        let header = FrameHeader {
            word0: Word0 {
                invalid: (words[0] >> 63) & 0x1 == 1,
                complex: (words[0] >> 62) & 0x1 == 1,
                epoch_start_sec: ((words[0] >> 32) & 0x3fff_ffff) as u32,
                frame_number: (words[0] & 0xffff_ffff) as u32,
            },
            word1: Word1 {
                version: ((words[1] >> 61) & 0x7) as u8,
                bits_per_sample: ((words[1] >> 56) & 0x1f) as u8,
                array_length: ((words[1] >> 32) & 0xff_ffff) as u32,
                ref_epoch_period: ((words[1] >> 26) & 0x3f) as u8,
                sample_representation: ((words[1] >> 22) & 0xf) as u8,
                unassigned: ((words[1] >> 16) & 0x3f) as u8,
                station_id: (words[1] & 0xffff) as u16,
            },
            word2: Word2 {
                block_length: ((words[2] >> 48) & 0xffff) as u16,
                channels_per_thread: ((words[2] >> 32) & 0xffff) as u16,
                freq_group: ((words[2] >> 16) & 0xffff) as u16,
                beam_id: (words[2] & 0xffff) as u16,
            },
            word3: Word3 {
                reserved16: ((words[3] >> 48) & 0xffff) as u16,
                period: ((words[3] >> 32) & 0xffff) as u16,
                reserved32: (words[3] & 0xffff_ffff) as u32,
            },
            word4: Word4 {
                intervals_per_period: words[4],
            },
            word5: Word5 {
                sync_seq: ((words[5] >> 32) & 0xffff_ffff) as u32,
                reserved32: (words[5] & 0xffff_ffff) as u32,
            },
            word6: Word6 {
                ext_data_version: ((words[6] >> 56) & 0xff) as u8,
                ext_user_data: words[6] & 0x00ff_ffff_ffff_ffff,
            },
            word7: Word7 {
                ext_user_data: words[7],
            },
        };

        trace!(
            frame_number = header.word0.frame_number,
            station_id = header.word1.station_id,
            "decoded frame header"
        );

        Ok(header)
    }

    /// Pack every field back into its bit position.
    ///
    /// For any decoded header this reproduces the original 8 words
    /// bit-for-bit.
    #[must_use]
    pub fn encode(&self) -> [u64; 8] {
        [
            (u64::from(self.word0.invalid) << 63)
                | (u64::from(self.word0.complex) << 62)
                | (u64::from(self.word0.epoch_start_sec & 0x3fff_ffff) << 32)
                | u64::from(self.word0.frame_number),
            (u64::from(self.word1.version & 0x7) << 61)
                | (u64::from(self.word1.bits_per_sample & 0x1f) << 56)
                | (u64::from(self.word1.array_length & 0xff_ffff) << 32)
                | (u64::from(self.word1.ref_epoch_period & 0x3f) << 26)
                | (u64::from(self.word1.sample_representation & 0xf) << 22)
                | (u64::from(self.word1.unassigned & 0x3f) << 16)
                | u64::from(self.word1.station_id),
            (u64::from(self.word2.block_length) << 48)
                | (u64::from(self.word2.channels_per_thread) << 32)
                | (u64::from(self.word2.freq_group) << 16)
                | u64::from(self.word2.beam_id),
            (u64::from(self.word3.reserved16) << 48)
                | (u64::from(self.word3.period) << 32)
                | u64::from(self.word3.reserved32),
            self.word4.intervals_per_period,
            (u64::from(self.word5.sync_seq) << 32) | u64::from(self.word5.reserved32),
            (u64::from(self.word6.ext_data_version) << 56)
                | (self.word6.ext_user_data & 0x00ff_ffff_ffff_ffff),
            self.word7.ext_user_data,
        ]
    }

    /// Check enumerated fields against their defined ranges.
    ///
    /// ``decode`` accepts any bit pattern; callers hardening their pipeline
    /// can reject frames whose version or sample representation is outside
    /// the defined set.
    ///
    /// # Errors
    /// ``Error::MalformedField`` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.word1.version > Self::MAX_VERSION {
            return Err(Error::MalformedField {
                word: 1,
                field: "version",
                value: self.word1.version.into(),
            });
        }
        if self.word1.sample_representation > Self::MAX_SAMPLE_REPRESENTATION {
            return Err(Error::MalformedField {
                word: 1,
                field: "sample_representation",
                value: self.word1.sample_representation.into(),
            });
        }
        Ok(())
    }
}

impl Display for FrameHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FrameHeader{{frame_number: {}, epoch_start_sec: {}, station_id: {}, beam_id: {}, sync_seq: {}}}",
            self.word0.frame_number,
            self.word0.epoch_start_sec,
            self.word1.station_id,
            self.word2.beam_id,
            self.word5.sync_seq_hex(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words_to_bytes(words: &[u64; 8]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    fn decode_words(words: &[u64; 8]) -> FrameHeader {
        let dat = words_to_bytes(words);
        let mut cursor = Cursor::new(&dat);
        FrameHeader::decode(&mut cursor).unwrap()
    }

    #[test]
    fn decode_all_zero() {
        let header = decode_words(&[0; 8]);

        assert_eq!(header, FrameHeader::default());
        assert_eq!(header.word5.sync_seq_hex(), "0x0");
    }

    #[test]
    fn decode_all_ones_word0() {
        let header = decode_words(&[u64::MAX, 0, 0, 0, 0, 0, 0, 0]);

        assert!(header.word0.invalid);
        assert!(header.word0.complex);
        // the two flag bits must not contaminate the seconds field
        assert_eq!(header.word0.epoch_start_sec, 0x3fff_ffff);
        assert_eq!(header.word0.frame_number, 0xffff_ffff);
    }

    #[test]
    fn fields_never_exceed_declared_width() {
        let header = decode_words(&[u64::MAX; 8]);

        assert_eq!(header.word1.version, 0x7);
        assert_eq!(header.word1.bits_per_sample, 0x1f);
        assert_eq!(header.word1.array_length, 0xff_ffff);
        assert_eq!(header.word1.ref_epoch_period, 0x3f);
        assert_eq!(header.word1.sample_representation, 0xf);
        assert_eq!(header.word1.unassigned, 0x3f);
        assert_eq!(header.word6.ext_data_version, 0xff);
        assert_eq!(header.word6.ext_user_data, 0x00ff_ffff_ffff_ffff);
    }

    #[test]
    fn decode_known_fields() {
        let word0 = (1u64 << 62) | (123_456u64 << 32) | 789;
        let word1 = (2u64 << 61) | (16u64 << 56) | (1024u64 << 32) | (27u64 << 26) | 0x1234;
        let word2 = (8192u64 << 48) | (8u64 << 32) | (3u64 << 16) | 21;
        let word5 = 0xadeadbee_u64 << 32;
        let header = decode_words(&[word0, word1, word2, 0, 5000, word5, 0, 0]);

        assert!(!header.word0.invalid);
        assert!(header.word0.complex);
        assert_eq!(header.word0.epoch_start_sec, 123_456);
        assert_eq!(header.word0.frame_number, 789);
        assert_eq!(header.word1.version, 2);
        assert_eq!(header.word1.bits_per_sample, 16);
        assert_eq!(header.word1.array_length, 1024);
        assert_eq!(header.word1.ref_epoch_period, 27);
        assert_eq!(header.word1.station_id, 0x1234);
        assert_eq!(header.word2.block_length, 8192);
        assert_eq!(header.word2.channels_per_thread, 8);
        assert_eq!(header.word2.freq_group, 3);
        assert_eq!(header.word2.beam_id, 21);
        assert_eq!(header.word4.intervals_per_period, 5000);
        assert_eq!(header.word5.sync_seq_hex(), "0xadeadbee");
    }

    #[test]
    fn encode_round_trip() {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let mut words = [0u64; 8];
            for word in &mut words {
                *word = rng.gen();
            }
            let header = decode_words(&words);
            assert_eq!(header.encode(), words);
        }
    }

    #[test]
    fn decode_hex_dump() {
        // word0: complex set, epoch second 12345, frame number 4
        let mut dat = hex::decode("4000003039000004").unwrap();
        dat.resize(FrameHeader::LEN, 0);
        let mut cursor = Cursor::new(&dat);

        let header = FrameHeader::decode(&mut cursor).unwrap();
        assert!(!header.word0.invalid);
        assert!(header.word0.complex);
        assert_eq!(header.word0.epoch_start_sec, 12345);
        assert_eq!(header.word0.frame_number, 4);
    }

    #[test]
    fn truncated_header() {
        let dat = [0u8; FrameHeader::LEN - 1];
        let mut cursor = Cursor::new(&dat);

        assert!(matches!(
            FrameHeader::decode(&mut cursor),
            Err(crate::Error::Truncated { .. })
        ));
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let mut header = FrameHeader::default();
        assert!(header.validate().is_ok());

        header.word1.version = 7;
        assert!(matches!(
            header.validate(),
            Err(crate::Error::MalformedField {
                word: 1,
                field: "version",
                ..
            })
        ));

        header.word1.version = 1;
        header.word1.sample_representation = 0xf;
        assert!(matches!(
            header.validate(),
            Err(crate::Error::MalformedField {
                word: 1,
                field: "sample_representation",
                ..
            })
        ));
    }
}
