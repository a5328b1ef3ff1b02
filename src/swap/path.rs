//! Packed swap path encoding
//!
//! The router's multi-hop calls take the route as a packed byte string:
//! 20-byte token addresses separated by 3-byte big-endian fee values
//! (`token0 ++ fee01 ++ token1 ++ fee12 ++ token2 ...`). The encoding must be
//! byte-exact: any deviation reverts on-chain rather than failing here.

use crate::error::{Error, Result};
use alloy::primitives::{Address, Bytes};

/// Bytes per fee value in the packed format
const FEE_BYTES: usize = 3;

/// Encode a token/fee hop sequence into the router's packed path format
///
/// Requires `fees.len() == tokens.len() - 1`. For an exact-output trade both
/// sequences are reversed before encoding, as the router walks the path
/// backwards.
pub fn encode_path(tokens: &[Address], fees: &[u32], exact_output: bool) -> Result<Bytes> {
    if tokens.len() < 2 || fees.len() != tokens.len() - 1 {
        return Err(Error::PathLength {
            tokens: tokens.len(),
            fees: fees.len(),
        });
    }

    let mut tokens: Vec<Address> = tokens.to_vec();
    let mut fees: Vec<u32> = fees.to_vec();
    if exact_output {
        tokens.reverse();
        fees.reverse();
    }

    let mut encoded =
        Vec::with_capacity(tokens.len() * Address::len_bytes() + fees.len() * FEE_BYTES);
    for (index, token) in tokens.iter().enumerate() {
        encoded.extend_from_slice(token.as_slice());
        if let Some(fee) = fees.get(index) {
            encoded.extend_from_slice(&fee.to_be_bytes()[1..]);
        }
    }

    Ok(Bytes::from(encoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_two_hop_layout() {
        let tokens = [addr(0xaa), addr(0xbb), addr(0xcc)];
        let fees = [10_000, 500];

        let path = encode_path(&tokens, &fees, false).unwrap();
        assert_eq!(path.len(), 20 * 3 + 3 * 2);

        // token A ++ fee1 ++ WBNB ++ fee2 ++ token B
        assert_eq!(&path[0..20], addr(0xaa).as_slice());
        assert_eq!(&path[20..23], &[0x00, 0x27, 0x10]); // 10000
        assert_eq!(&path[23..43], addr(0xbb).as_slice());
        assert_eq!(&path[43..46], &[0x00, 0x01, 0xf4]); // 500
        assert_eq!(&path[46..66], addr(0xcc).as_slice());
    }

    #[test]
    fn test_single_hop() {
        let path = encode_path(&[addr(0x01), addr(0x02)], &[2_500], false).unwrap();
        assert_eq!(path.len(), 43);
        assert_eq!(&path[20..23], &[0x00, 0x09, 0xc4]);
    }

    #[test]
    fn test_exact_output_reverses() {
        let tokens = [addr(0xaa), addr(0xbb), addr(0xcc)];
        let fees = [10_000, 500];

        let forward = encode_path(&tokens, &fees, false).unwrap();
        let reversed = encode_path(&tokens, &fees, true).unwrap();

        assert_eq!(&reversed[0..20], addr(0xcc).as_slice());
        assert_eq!(&reversed[20..23], &[0x00, 0x01, 0xf4]);
        assert_eq!(&reversed[43..46], &[0x00, 0x27, 0x10]);
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let tokens = [addr(0x01), addr(0x02), addr(0x03)];

        for fees in [&[10_000][..], &[10_000, 500, 100][..], &[][..]] {
            let result = encode_path(&tokens, fees, false);
            assert!(matches!(result, Err(Error::PathLength { tokens: 3, .. })));
        }
    }

    #[test]
    fn test_degenerate_paths_rejected() {
        assert!(encode_path(&[addr(0x01)], &[], false).is_err());
        assert!(encode_path(&[], &[], false).is_err());
    }
}
