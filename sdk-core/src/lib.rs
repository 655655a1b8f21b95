//! Adpolicy SDK Core Library
//!
//! Resolves effective Active Directory password-policy parameters, merging
//! the domain default policy with fine-grained Password Settings Objects,
//! and computes the legacy LM and NT password verifier hashes.

pub mod adtime;
pub mod crypto;
pub mod directory;
pub mod error;
pub mod policy;
pub mod resolver;
pub mod source;

// Re-exports
pub use crypto::{
    lm_hash, lm_hash_hex_lower, lm_hash_hex_upper, nt_hash, nt_hash_hex_lower, nt_hash_hex_upper,
};
pub use error::{AdPolicyError, Result};
pub use policy::{PasswordMetaData, PasswordSettings};
pub use resolver::{CachingResolver, DEFAULT_POLICY_KEY};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
