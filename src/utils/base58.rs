//! Base58 rendering of 64-bit values.
//!
//! The short code pipeline base58-encodes the *decimal rendering* of a
//! number, read as a base-10 numeral rather than as ASCII bytes. A `u64`
//! rendering has no leading zeros except for `0` itself, so this is the
//! number's value written in base 58, most significant digit first, with
//! `0` written as the zero digit `'1'`. Codes written before this crate
//! existed were produced that way, so the behaviour is fixed.

/// Bitcoin base58 alphabet. Excludes `0`, `O`, `I` and `l`.
pub const ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Encodes the value of `number` in base58.
///
/// # Examples
///
/// ```
/// use url_map::utils::base58::encode_u64;
///
/// assert_eq!(encode_u64(57), "z");
/// assert_eq!(encode_u64(58), "21");
/// assert_eq!(encode_u64(0), "1");
/// ```
pub fn encode_u64(number: u64) -> String {
    if number == 0 {
        return "1".to_string();
    }

    let bytes = number.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());

    // Leading zero bytes are trimmed so bs58 emits no extra '1's.
    bs58::encode(&bytes[first..]).into_string()
}
