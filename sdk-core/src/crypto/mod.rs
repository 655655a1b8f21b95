//! Legacy password verifier hashes
//!
//! Both digests are cryptographically broken and kept only for
//! interoperability with historical authentication protocols. They are pure
//! functions of the cleartext password: stateless, thread-safe, reentrant.

pub mod lm;
pub mod nt;

pub use lm::{lm_hash, lm_hash_hex_lower, lm_hash_hex_upper};
pub use nt::{nt_hash, nt_hash_hex_lower, nt_hash_hex_upper};
