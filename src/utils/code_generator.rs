//! Deterministic short code generation.
//!
//! A short code is derived from the URL alone, so shortening the same URL
//! twice always yields the same code:
//!
//! 1. SHA-256 of the URL bytes
//! 2. keep the low-order 64 bits of the digest (big-endian)
//! 3. base58-encode the value of its decimal numeral ([`base58::encode_u64`])
//! 4. keep the first [`CODE_LENGTH`] characters
//!
//! Only 64 of the 256 digest bits survive step 2 and step 4 drops the tail of
//! the base58 string, so unrelated URLs can and do collide. Uniqueness of
//! stored records is the persistence layer's concern.

use sha2::{Digest, Sha256};

use crate::utils::base58::{self, ALPHABET};

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 8;

/// Base58 zero digit, used to left-pad short renderings.
const PAD: char = '1';

/// Generates the short code for `url`.
///
/// Pure and total: any string, including the empty one, maps to exactly
/// [`CODE_LENGTH`] base58 characters. Rejecting empty input is left to
/// callers.
///
/// # Examples
///
/// ```
/// use url_map::utils::code_generator::generate_code;
///
/// assert_eq!(generate_code("https://example.com/a"), "hBreFgHC");
/// ```
pub fn generate_code(url: &str) -> String {
    let number = digest_to_u64(&Sha256::digest(url.as_bytes()));
    truncate_or_pad(&base58::encode_u64(number))
}

/// Returns `true` if `code` looks like a generated short code.
pub fn validate_code(code: &str) -> bool {
    code.chars().count() == CODE_LENGTH && code.chars().all(|c| ALPHABET.contains(c))
}

/// Reduces a digest to its low-order 64 bits, read big-endian.
fn digest_to_u64(digest: &[u8]) -> u64 {
    let mut low = [0u8; 8];
    let tail = &digest[digest.len().saturating_sub(8)..];
    low[8 - tail.len()..].copy_from_slice(tail);
    u64::from_be_bytes(low)
}

/// Values below 58^7 render in fewer than eight digits; pad with the zero digit.
fn truncate_or_pad(encoded: &str) -> String {
    let mut code: String = encoded.chars().take(CODE_LENGTH).collect();
    let missing = CODE_LENGTH - code.chars().count();
    if missing > 0 {
        code.insert_str(0, &PAD.to_string().repeat(missing));
    }
    code
}
