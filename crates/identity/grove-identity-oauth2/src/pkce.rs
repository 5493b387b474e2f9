//! PKCE verifier/challenge generation (RFC 7636, S256 only).

use crate::error::{FlowError, FlowResult};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// PKCE code verifier and challenge pair for one authorization attempt.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    pub code_verifier: String,
    pub code_challenge: String,
    pub code_challenge_method: String,
}

impl PkceChallenge {
    /// Generate a new pair from 256 bits of OS entropy.
    ///
    /// The verifier is the base64url encoding of the raw bytes (43 chars,
    /// within the RFC range of 43-128); the challenge is the base64url
    /// encoding of the SHA-256 digest of the verifier's ASCII bytes.
    /// Fails with `CryptoUnavailable` if the OS entropy source does -
    /// there is no weaker fallback.
    pub fn generate() -> FlowResult<Self> {
        let mut bytes = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|_| FlowError::CryptoUnavailable)?;

        let code_verifier = URL_SAFE_NO_PAD.encode(bytes);
        let code_challenge = Self::challenge_for(&code_verifier);

        Ok(Self {
            code_verifier,
            code_challenge,
            code_challenge_method: "S256".to_string(),
        })
    }

    fn challenge_for(verifier: &str) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn challenge_is_sha256_of_verifier() {
        let pkce = PkceChallenge::generate().unwrap();

        let expected = URL_SAFE_NO_PAD.encode(Sha256::digest(pkce.code_verifier.as_bytes()));
        assert_eq!(pkce.code_challenge, expected);
        assert_eq!(pkce.code_challenge_method, "S256");
    }

    #[test]
    fn verifier_length_is_in_rfc_range() {
        let pkce = PkceChallenge::generate().unwrap();
        assert!(pkce.code_verifier.len() >= 43);
        assert!(pkce.code_verifier.len() <= 128);
    }

    #[test]
    fn verifier_and_challenge_are_url_safe() {
        let is_url_safe =
            |s: &str| s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        let pkce = PkceChallenge::generate().unwrap();
        assert!(is_url_safe(&pkce.code_verifier));
        assert!(is_url_safe(&pkce.code_challenge));
    }

    #[test]
    fn verifiers_are_unique_over_many_trials() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let pkce = PkceChallenge::generate().unwrap();
            assert!(seen.insert(pkce.code_verifier), "duplicate verifier");
        }
    }
}
