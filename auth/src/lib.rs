//! Credential primitives library
//!
//! Provides the two cryptographic building blocks of the sign-on service:
//! - Password hashing (Argon2id, tunable cost)
//! - Access token issuance (HS256 JWT)
//!
//! Token verification is deliberately absent. A relying party that needs to
//! validate a token does so with the same secret and the [`Claims`] layout.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use std::time::Duration;
//!
//! use auth::TokenIssuer;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let token = issuer
//!     .issue(1, "a@example.com", Duration::from_secs(3600))
//!     .unwrap();
//! assert_eq!(token.split('.').count(), 3);
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenIssuer;
pub use password::PasswordError;
pub use password::PasswordHasher;
