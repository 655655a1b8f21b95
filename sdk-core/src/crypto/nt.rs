//! NT password hash: MD4 over the UTF-16LE password
//!
//! The 14-code-unit cap is historical; MD4 itself has no length limit but
//! the original verifier only ever consumed the first 14 units.

use md4::{Digest, Md4};
use zeroize::Zeroizing;

use crate::error::Result;

/// Maximum number of UTF-16 code units hashed.
const MAX_UNITS: usize = 14;

/// Compute the 16-byte NT hash of a password.
///
/// Code units beyond the 14th are ignored. The empty password hashes to the
/// MD4 digest of the empty byte sequence.
pub fn nt_hash(password: &str) -> Result<[u8; 16]> {
    let mut nt_pw = Zeroizing::new(Vec::with_capacity(2 * MAX_UNITS));
    for unit in password.encode_utf16().take(MAX_UNITS) {
        nt_pw.extend_from_slice(&unit.to_le_bytes());
    }
    Ok(Md4::digest(nt_pw.as_slice()).into())
}

/// NT hash as a lower-case hex string, two digits per byte, no separators.
pub fn nt_hash_hex_lower(password: &str) -> Result<String> {
    Ok(hex::encode(nt_hash(password)?))
}

/// NT hash as an upper-case hex string.
pub fn nt_hash_hex_upper(password: &str) -> Result<String> {
    Ok(hex::encode_upper(nt_hash(password)?))
}
