//! Short code generation and custom alias validation.
//!
//! Generated codes are public identifiers, so they come from the OS CSPRNG
//! rather than a seeded PRNG: knowing one code must not help guess the next.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// URL-safe alphabet for generated codes. 64 symbols, so a random byte
/// masked to 6 bits maps onto it uniformly.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Length of generated (non-custom) short codes.
pub const GENERATED_CODE_LENGTH: usize = 7;

/// Custom alias rules: 3-30 characters, letters/digits/hyphen/underscore.
const CUSTOM_CODE_MIN_LEN: usize = 3;
const CUSTOM_CODE_MAX_LEN: usize = 30;

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex literal"));

/// Route words that cannot be claimed as aliases.
const RESERVED_CODES: &[&str] = &["api", "health", "stats", "links", "admin"];

/// Produces fixed-length random short codes.
///
/// Trait-based so the allocation service can be exercised with a
/// deterministic generator in tests (e.g. one that always returns a taken
/// code to drive the retry loop to exhaustion).
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Returns a string of exactly `length` characters drawn from the
    /// URL-safe alphabet.
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero.
    fn generate(&self, length: usize) -> String;
}

/// Production generator backed by the OS random number generator.
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> String {
        assert!(length > 0, "code length must be positive");

        let mut buffer = vec![0u8; length];
        getrandom::fill(&mut buffer).expect("OS random number generator failed");

        buffer
            .iter()
            .map(|b| ALPHABET[(b & 0x3f) as usize] as char)
            .collect()
    }
}

/// Validates a caller-supplied custom alias.
///
/// # Errors
///
/// Returns [`AppError::InvalidAlias`] when the alias is outside the 3-30
/// character range, contains characters other than `[A-Za-z0-9_-]`, or
/// shadows a reserved route word.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < CUSTOM_CODE_MIN_LEN || code.len() > CUSTOM_CODE_MAX_LEN {
        return Err(AppError::invalid_alias(
            "Custom alias must be 3-30 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::invalid_alias(
            "Custom alias can only contain letters, digits, hyphens, and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::invalid_alias(
            "This alias is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_has_requested_length() {
        let generator = RandomCodeGenerator;
        assert_eq!(generator.generate(7).len(), 7);
        assert_eq!(generator.generate(1).len(), 1);
        assert_eq!(generator.generate(30).len(), 30);
    }

    #[test]
    fn test_generate_url_safe_characters() {
        let generator = RandomCodeGenerator;
        let code = generator.generate(64);
        assert!(
            code.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generate_produces_unique_codes() {
        let generator = RandomCodeGenerator;
        let mut codes = HashSet::new();

        for _ in 0..1000 {
            codes.insert(generator.generate(GENERATED_CODE_LENGTH));
        }

        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_generate_covers_full_alphabet() {
        // With 64 symbols and 10k draws, a missing symbol means a biased map.
        let generator = RandomCodeGenerator;
        let seen: HashSet<char> = (0..100)
            .flat_map(|_| generator.generate(100).chars().collect::<Vec<_>>())
            .collect();
        assert_eq!(seen.len(), 64);
    }

    #[test]
    #[should_panic(expected = "code length must be positive")]
    fn test_generate_rejects_zero_length() {
        RandomCodeGenerator.generate(0);
    }

    #[test]
    fn test_validate_accepts_valid_aliases() {
        assert!(validate_custom_code("abc").is_ok());
        assert!(validate_custom_code("valid-alias_1").is_ok());
        assert!(validate_custom_code("MixedCase09").is_ok());
        assert!(validate_custom_code(&"a".repeat(30)).is_ok());
    }

    #[test]
    fn test_validate_too_short() {
        let result = validate_custom_code("ab");
        assert!(matches!(
            result.unwrap_err(),
            AppError::InvalidAlias { .. }
        ));
    }

    #[test]
    fn test_validate_too_long() {
        let result = validate_custom_code(&"a".repeat(31));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_bad_characters() {
        for alias in ["a!b", "has space", "caf\u{e9}", "semi;colon", "slash/x"] {
            let result = validate_custom_code(alias);
            assert!(
                matches!(result.unwrap_err(), AppError::InvalidAlias { .. }),
                "alias {alias:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_empty_string() {
        assert!(validate_custom_code("").is_err());
    }

    #[test]
    fn test_validate_reserved_codes() {
        for &reserved in RESERVED_CODES {
            assert!(
                validate_custom_code(reserved).is_err(),
                "reserved alias {reserved:?} should be rejected"
            );
        }
    }
}
