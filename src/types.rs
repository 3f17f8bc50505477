use serde::Deserialize;

/// Display metadata for one installed signer application.
///
/// Produced by [`crate::SignerDirectory`]; immutable once returned. The
/// `package_name` is the stable identity of the app and the value handed to
/// [`crate::ActiveSigner::select`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerAppInfo {
    pub name: String,
    pub package_name: String,
    /// Inline icon bitmap (base64), when the platform provides one.
    #[serde(default)]
    pub icon_data: Option<String>,
    /// Loadable icon locator, when the platform provides one.
    #[serde(default)]
    pub icon_url: Option<String>,
}

/// Reply to the `getPublicKey` boundary operation.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicKeyReply {
    /// Opaque npub-encoded public key handle. Never parsed here, reused
    /// verbatim as an argument to subsequent operations.
    pub npub: String,
    /// Package the key came from, echoed back by some signers.
    #[serde(default)]
    pub package: Option<String>,
}

/// A signed event as returned by the signer application.
///
/// The signature is only meaningful together with the exact content/id/key
/// triple that was submitted for signing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignedEvent {
    pub signature: String,
    pub id: String,
    pub event: String,
}

/// Generic `{ result }` envelope used by the encrypt/decrypt/relay replies.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResultReply {
    pub result: String,
}

/// Reply to the `isExternalSignerInstalled` boundary operation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InstalledReply {
    pub installed: bool,
}

/// Which encrypted-payload scheme the signer is asked to use.
///
/// NIP-04 is the legacy scheme, NIP-44 the modern one. The two are mutually
/// exclusive; the mode only routes calls to the matching encrypt/decrypt
/// operation pair, the schemes themselves live in the signer app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionMode {
    #[default]
    Nip04,
    Nip44,
}
