// Boundary between UTF-8 text and the dictionary's narrow byte encoding

/// Errors converting caller text into the dictionary encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("character {0:?} cannot be represented in the dictionary encoding")]
    Unrepresentable(char),
}

/// Converts between UTF-8 strings and the single-byte encoding a hash file
/// was built with.
///
/// Multi-byte string characters are handled above this layer by
/// [`CharTables`](crate::charset::CharTables); an encoding only maps
/// characters to bytes.
pub trait NarrowEncoding: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<u8>, EncodingError>;
    fn decode(&self, bytes: &[u8]) -> String;
}

/// ISO-8859-1: code points U+0000..U+00FF map to the identical byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latin1;

impl NarrowEncoding for Latin1 {
    fn encode(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        text.chars()
            .map(|c| u8::try_from(c as u32).map_err(|_| EncodingError::Unrepresentable(c)))
            .collect()
    }

    fn decode(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|&b| b as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_roundtrip() {
        let bytes = Latin1.encode("caf\u{00E9}").unwrap();
        assert_eq!(bytes, vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(Latin1.decode(&bytes), "caf\u{00E9}");
    }

    #[test]
    fn latin1_rejects_wide_chars() {
        assert_eq!(
            Latin1.encode("na\u{0161}"),
            Err(EncodingError::Unrepresentable('\u{0161}'))
        );
    }
}
