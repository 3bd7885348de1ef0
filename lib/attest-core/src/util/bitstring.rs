use std::io::prelude::*;

use bit_vec::BitVec;
use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use flate2::Compression;
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BitstringError {
    #[error("Bitstring encoding error: `{0}`")]
    Base64Encoding(ct_codecs::Error),
    #[error("Bitstring decoding error: `{0}`")]
    Base64Decoding(ct_codecs::Error),
    #[error("Index `{index}` out of bounds for bitstring of size `{size}`")]
    IndexOutOfBounds { index: usize, size: usize },
    #[error("Bitstring compression error: `{0}`")]
    Compression(std::io::Error),
    #[error("Bitstring decompression error: `{0}`")]
    Decompression(std::io::Error),
}

/// Minimum bitstring size of 16kB as required by the status list specifications.
const MINIMUM_INPUT_SIZE: usize = 131072;

/// Builds the compressed base64url status bitstring for the given set of
/// revoked indices. The list is sized to the minimum herd-privacy size and
/// grown in minimum-size multiples when an index does not fit.
pub fn generate_bitstring(revoked_indices: &[usize]) -> Result<String, BitstringError> {
    let required = revoked_indices.iter().max().map_or(0, |max| max + 1);
    let size = calculate_bitstring_size(required);

    let mut bits = BitVec::from_elem(size, false);
    for &index in revoked_indices {
        bits.set(index, true);
    }

    let compressed = gzip_compress(bits.to_bytes())?;
    Base64UrlSafeNoPadding::encode_to_string(compressed).map_err(BitstringError::Base64Encoding)
}

/// Decodes a status bitstring back into the ascending list of set indices.
pub fn expand_bitstring(input: &str) -> Result<Vec<usize>, BitstringError> {
    let compressed =
        Base64UrlSafeNoPadding::decode_to_vec(input, None).map_err(BitstringError::Base64Decoding)?;

    let mut bytes = vec![];
    GzDecoder::new(&compressed[..])
        .read_to_end(&mut bytes)
        .map_err(BitstringError::Decompression)?;

    let bits = BitVec::from_bytes(&bytes);
    Ok(bits
        .iter()
        .enumerate()
        .filter_map(|(index, bit)| bit.then_some(index))
        .collect())
}

/// Reads a single bit out of a status bitstring, decompressing only as far
/// as needed to reach it.
pub fn extract_bitstring_index(input: &str, index: usize) -> Result<bool, BitstringError> {
    let compressed =
        Base64UrlSafeNoPadding::decode_to_vec(input, None).map_err(BitstringError::Base64Decoding)?;

    let bytes_to_read = index / 8 + 1;
    let mut bytes = vec![0; bytes_to_read];

    let mut decoder = GzDecoder::new(&compressed[..]);
    decoder
        .read_exact(&mut bytes)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => BitstringError::IndexOutOfBounds {
                index,
                size: bytes.len() * 8,
            },
            _ => BitstringError::Decompression(e),
        })?;

    let bits = BitVec::from_bytes(&bytes);
    bits.get(index)
        .ok_or(BitstringError::IndexOutOfBounds {
            index,
            size: bits.len(),
        })
}

fn gzip_compress(input: Vec<u8>) -> Result<Vec<u8>, BitstringError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&input).map_err(BitstringError::Compression)?;
    encoder.finish().map_err(BitstringError::Compression)
}

fn calculate_bitstring_size(input_size: usize) -> usize {
    MINIMUM_INPUT_SIZE * input_size.div_ceil(MINIMUM_INPUT_SIZE).max(1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_generate_bitstring_empty_input() {
        let encoded = generate_bitstring(&[]).unwrap();
        assert_eq!(expand_bitstring(&encoded).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_generate_and_expand_roundtrip() {
        let indices = [0, 7, 42, 131071];
        let encoded = generate_bitstring(&indices).unwrap();
        assert_eq!(expand_bitstring(&encoded).unwrap(), indices);
    }

    #[test]
    fn test_generate_bitstring_is_deterministic() {
        let first = generate_bitstring(&[3, 1024]).unwrap();
        let second = generate_bitstring(&[3, 1024]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_bitstring_grows_beyond_minimum_size() {
        let encoded = generate_bitstring(&[131072]).unwrap();
        assert_eq!(expand_bitstring(&encoded).unwrap(), vec![131072]);
    }

    #[test]
    fn test_extract_bitstring_index() {
        let encoded = generate_bitstring(&[1, 42]).unwrap();

        assert!(extract_bitstring_index(&encoded, 1).unwrap());
        assert!(extract_bitstring_index(&encoded, 42).unwrap());
        assert!(!extract_bitstring_index(&encoded, 2).unwrap());
    }

    #[test]
    fn test_extract_bitstring_index_out_of_bounds() {
        let encoded = generate_bitstring(&[1]).unwrap();

        let result = extract_bitstring_index(&encoded, 9_000_000);
        assert!(matches!(result, Err(BitstringError::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_expand_bitstring_rejects_invalid_base64() {
        let result = expand_bitstring("not base64!");
        assert!(matches!(result, Err(BitstringError::Base64Decoding(_))));
    }
}
