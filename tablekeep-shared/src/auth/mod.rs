/// Authentication and authorization utilities
///
/// This module provides the secure primitives for Tablekeep:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Opaque bearer token generation and validation utilities
/// - [`middleware`]: Request authentication and the `AuthContext` identity
/// - [`access`]: The row-level ownership access decision function
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Bearer Tokens**: Secure random generation with SHA-256 hashing;
///   plaintext is returned to the client exactly once
/// - **Constant-time Comparison**: All secret verification uses
///   constant-time operations
///
/// # Example
///
/// ```no_run
/// use tablekeep_shared::auth::password::{hash_password, verify_password};
/// use tablekeep_shared::auth::token::generate_token;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Bearer token generation
/// let (plaintext, token_hash) = generate_token();
/// assert!(plaintext.starts_with("tbk_"));
/// assert_eq!(token_hash.len(), 64);
/// # Ok(())
/// # }
/// ```

pub mod access;
pub mod middleware;
pub mod password;
pub mod token;
