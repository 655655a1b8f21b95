//! Lan Manager password hash
//!
//! The password is ASCII-uppercased, truncated or zero-padded to 14 bytes and
//! split into two independent 7-byte halves; each half keys a single DES-ECB
//! encryption of a fixed magic block. The two halves never mix, which is the
//! classic LM weakness: equal halves produce equal hash halves.

use des::cipher::{Block, BlockEncrypt, KeyInit};
use des::Des;
use zeroize::Zeroizing;

use crate::error::{AdPolicyError, Result};

/// The magic block encrypted under the password-derived keys: `KGS!@#$%`
pub const MAGIC: [u8; 8] = [0x4B, 0x47, 0x53, 0x21, 0x40, 0x23, 0x24, 0x25];

/// Spread 56 key bits over 8 bytes of 7 significant bits, then shift each
/// byte left by one so the DES parity bit position is freed (the underlying
/// cipher ignores parity bits, matching the historical key expansion).
fn des_key(half: &[u8]) -> [u8; 8] {
    debug_assert!(half.len() >= 7);

    let mut key = [
        half[0] >> 1,
        ((half[0] & 0x01) << 6) | (half[1] >> 2),
        ((half[1] & 0x03) << 5) | (half[2] >> 3),
        ((half[2] & 0x07) << 4) | (half[3] >> 4),
        ((half[3] & 0x0F) << 3) | (half[4] >> 5),
        ((half[4] & 0x1F) << 2) | (half[5] >> 6),
        ((half[5] & 0x3F) << 1) | (half[6] >> 7),
        half[6] & 0x7F,
    ];
    for byte in &mut key {
        *byte <<= 1;
    }
    key
}

/// Compute the 16-byte LM hash of a password.
///
/// Only ASCII passwords are accepted: the LM format has no encoding for
/// other characters, and silently hashing their low bytes would produce a
/// verifier for a different password. Characters beyond the 14th are
/// ignored, per the format.
pub fn lm_hash(password: &str) -> Result<[u8; 16]> {
    if !password.is_ascii() {
        return Err(AdPolicyError::InvalidPassword(
            "LM hash input must be ASCII",
        ));
    }

    let mut lm_pw = Zeroizing::new([0u8; 14]);
    for (dst, src) in lm_pw.iter_mut().zip(password.bytes()) {
        *dst = src.to_ascii_uppercase();
    }

    let mut hash = [0u8; 16];
    for (out, half) in hash.chunks_exact_mut(8).zip(lm_pw.chunks_exact(7)) {
        let key = Zeroizing::new(des_key(half));
        let cipher = Des::new_from_slice(key.as_ref())
            .map_err(|_| AdPolicyError::HashPrimitive("DES key setup"))?;
        let mut block = Block::<Des>::from(MAGIC);
        cipher.encrypt_block(&mut block);
        out.copy_from_slice(&block);
    }
    Ok(hash)
}

/// LM hash as a lower-case hex string, two digits per byte, no separators.
pub fn lm_hash_hex_lower(password: &str) -> Result<String> {
    Ok(hex::encode(lm_hash(password)?))
}

/// LM hash as an upper-case hex string.
pub fn lm_hash_hex_upper(password: &str) -> Result<String> {
    Ok(hex::encode_upper(lm_hash(password)?))
}
