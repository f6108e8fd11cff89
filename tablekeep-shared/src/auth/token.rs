/// Bearer token utilities
///
/// This module provides utilities for generating and validating the opaque
/// bearer tokens issued at login. These work in conjunction with the
/// `models::token` module for database operations.
///
/// # Security
///
/// - **Format**: `tbk_{40_chars}` (prefix + 40 random alphanumeric chars)
/// - **Storage**: Tokens are hashed with SHA-256 before storage; the
///   plaintext is shown to the client exactly once, at creation
/// - **Validation**: Constant-time comparison to prevent timing attacks
///
/// # Token Format
///
/// Tokens follow the pattern: `tbk_abcd1234efgh5678...` (44 chars total)
/// - Prefix: "tbk_" (4 chars)
/// - Random part: 40 alphanumeric chars (base62: [A-Za-z0-9])
///
/// # Example
///
/// ```
/// use tablekeep_shared::auth::token::{generate_token, hash_token, validate_token_format};
///
/// // Generate a new token
/// let (plaintext, hash) = generate_token();
/// assert!(plaintext.starts_with("tbk_"));
/// assert_eq!(plaintext.len(), 44);
///
/// // Validate format
/// assert!(validate_token_format(&plaintext));
///
/// // Hash matches
/// assert_eq!(hash, hash_token(&plaintext));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of a token (characters)
const TOKEN_RANDOM_LENGTH: usize = 40;

/// Bearer token prefix
const TOKEN_PREFIX: &str = "tbk_";

/// Total length of a token (prefix + random)
pub const TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new bearer token
///
/// Creates a cryptographically random token with the format `tbk_{40_chars}`.
/// Also returns the SHA-256 hash for database storage.
///
/// # Returns
///
/// Tuple of (plaintext_token, sha256_hash)
pub fn generate_token() -> (String, String) {
    let random_part = generate_random_string(TOKEN_RANDOM_LENGTH);
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_token(&token);

    (token, hash)
}

/// Generates a random alphanumeric string
///
/// Uses base62 encoding (A-Z, a-z, 0-9) for URL-safe tokens.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a bearer token using SHA-256
///
/// Returns the hex-encoded SHA-256 digest (64 characters).
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Validates bearer token format
///
/// Checks that the token:
/// - Starts with "tbk_"
/// - Has correct length (44 chars)
/// - Contains only alphanumeric characters after the prefix
///
/// Used by the authentication middleware to reject malformed credentials
/// before any database lookup.
pub fn validate_token_format(token: &str) -> bool {
    if token.len() != TOKEN_LENGTH {
        return false;
    }

    if !token.starts_with(TOKEN_PREFIX) {
        return false;
    }

    let random_part = &token[TOKEN_PREFIX.len()..];
    random_part.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Validates a token against a stored hash
///
/// Uses constant-time comparison to prevent timing attacks.
pub fn verify_token(token: &str, stored_hash: &str) -> bool {
    let computed_hash = hash_token(token);
    constant_time_compare(&computed_hash, stored_hash)
}

/// Constant-time string comparison
///
/// Always compares the full length of both strings, accumulating
/// differences with bitwise OR so the comparison does not short-circuit.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut result = 0u8;
    for i in 0..a_bytes.len() {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}
