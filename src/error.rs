#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The buffer ended before a required field or region was fully read.
    #[error("buffer truncated at offset {offset}: wanted {wanted} bytes, {remaining} remain")]
    Truncated {
        /// Read offset at the failing read
        offset: usize,
        /// Number of bytes the read required
        wanted: usize,
        /// Number of bytes left in the buffer
        remaining: usize,
    },

    /// An enumerated header field holds a value outside its defined range.
    ///
    /// Only produced by opt-in validation; decoding itself accepts any bit
    /// pattern.
    #[error("malformed field {field} in word {word}: value {value}")]
    MalformedField {
        word: u8,
        field: &'static str,
        value: u64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
