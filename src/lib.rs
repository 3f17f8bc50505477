//! Client-side bridge to NIP-55 external signer applications.
//!
//! Instead of holding private key material itself, an application delegates
//! key retrieval, event signing and payload encryption/decryption to an
//! independently installed signer app. This crate is the communication
//! protocol layer for that delegation:
//!
//! - `bridge`    : the typed boundary to the platform signer capability
//! - `directory` : discovery of installed signer applications
//! - `selection` : the active signer target and its installed-state check
//! - `client`    : the request/response contract for delegated operations
//! - `types`     : descriptors, replies and the encryption-mode switch
//!
//! The signer application, its cryptography and the OS-level invocation
//! mechanism are external collaborators; this crate only issues correlated
//! requests and parses typed replies.

pub mod bridge;
pub mod client;
pub mod directory;
pub mod selection;
pub mod types;

pub use bridge::{BridgeError, BridgeGateway, SignerBridge};
pub use client::SignerClient;
pub use directory::SignerDirectory;
pub use selection::ActiveSigner;
pub use types::{EncryptionMode, SignedEvent, SignerAppInfo};

/// Error types for delegated signer operations.
///
/// Precondition failures (`NoSigner`, `MissingPublicKey`, `MissingField`) are
/// detected locally before any bridge round trip. `Bridge` wraps a failure
/// reported by the platform bridge itself.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// No active signer application selected.
    #[error("No signer selected")]
    NoSigner,

    /// The identity key has not been retrieved from the signer yet.
    #[error("Public key not loaded, retrieve it first")]
    MissingPublicKey,

    /// A required request field was empty.
    #[error("Missing {0}")]
    MissingField(&'static str),

    /// The signer replied with a payload this crate could not decode.
    #[error("Malformed signer response: {0}")]
    MalformedResponse(String),

    /// The bridge call itself failed (signer unreachable, user declined, ...).
    #[error("{0}")]
    Bridge(#[from] BridgeError),
}

/// Result type for signer operations.
pub type SignerResult<T> = Result<T, SignerError>;
