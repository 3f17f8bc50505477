use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::types::{InstalledReply, PublicKeyReply, ResultReply, SignedEvent, SignerAppInfo};
use crate::{SignerError, SignerResult};

/// Fallback shown when the bridge rejects a call without attaching a reason.
const GENERIC_FAILURE: &str = "Signer operation failed";

/// Opaque failure reported by the platform bridge.
///
/// The bridge does not expose structured error codes to this layer; callers
/// get the human-readable message verbatim. Remote state (keys, prior
/// results) is never touched by a failed call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct BridgeError(String);

impl BridgeError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            BridgeError(GENERIC_FAILURE.to_string())
        } else {
            BridgeError(message)
        }
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// The single primitive the platform exposes for reaching the external
/// signer: invoke a named operation with string arguments and get back one
/// structured reply or one failure. No partial results, no implicit retries.
///
/// Implementations adapt whatever inter-process mechanism the platform uses
/// (intents, native modules, test doubles); this crate never sees it.
#[async_trait]
pub trait SignerBridge: Send + Sync {
    async fn invoke(&self, operation: &str, args: Vec<String>) -> Result<Value, BridgeError>;
}

/// Typed projections over the [`SignerBridge`] primitive.
///
/// One method per boundary operation, argument order fixed by the signer
/// protocol. Replies are decoded into the structs in [`crate::types`]; a
/// reply that does not decode surfaces as `MalformedResponse`.
pub struct BridgeGateway {
    bridge: Arc<dyn SignerBridge>,
}

impl BridgeGateway {
    pub fn new(bridge: Arc<dyn SignerBridge>) -> Self {
        Self { bridge }
    }

    pub async fn get_installed_signer_apps(&self) -> SignerResult<Vec<SignerAppInfo>> {
        let reply = self.bridge.invoke("getInstalledSignerApps", vec![]).await?;
        decode(reply)
    }

    pub async fn set_package_name(&self, package_name: &str) -> SignerResult<()> {
        self.bridge
            .invoke("setPackageName", vec![package_name.to_string()])
            .await?;
        Ok(())
    }

    pub async fn is_external_signer_installed(&self, package_name: &str) -> SignerResult<bool> {
        let reply = self
            .bridge
            .invoke("isExternalSignerInstalled", vec![package_name.to_string()])
            .await?;
        let reply: InstalledReply = decode(reply)?;
        debug!(
            "Installed check for {}: {}",
            package_name, reply.installed
        );
        Ok(reply.installed)
    }

    pub async fn get_public_key(&self, package_name: &str) -> SignerResult<PublicKeyReply> {
        let reply = self
            .bridge
            .invoke("getPublicKey", vec![package_name.to_string()])
            .await?;
        decode(reply)
    }

    pub async fn sign_event(
        &self,
        package_name: &str,
        event_json: &str,
        event_id: &str,
        npub: &str,
    ) -> SignerResult<SignedEvent> {
        let reply = self
            .bridge
            .invoke(
                "signEvent",
                vec![
                    package_name.to_string(),
                    event_json.to_string(),
                    event_id.to_string(),
                    npub.to_string(),
                ],
            )
            .await?;
        decode(reply)
    }

    pub async fn nip04_encrypt(
        &self,
        package_name: &str,
        plain_text: &str,
        id: &str,
        recipient_pubkey: &str,
        npub: &str,
    ) -> SignerResult<String> {
        self.result_call(
            "nip04Encrypt",
            package_name,
            plain_text,
            id,
            recipient_pubkey,
            npub,
        )
        .await
    }

    pub async fn nip04_decrypt(
        &self,
        package_name: &str,
        encrypted_text: &str,
        id: &str,
        recipient_pubkey: &str,
        npub: &str,
    ) -> SignerResult<String> {
        self.result_call(
            "nip04Decrypt",
            package_name,
            encrypted_text,
            id,
            recipient_pubkey,
            npub,
        )
        .await
    }

    pub async fn nip44_encrypt(
        &self,
        package_name: &str,
        plain_text: &str,
        id: &str,
        recipient_pubkey: &str,
        npub: &str,
    ) -> SignerResult<String> {
        self.result_call(
            "nip44Encrypt",
            package_name,
            plain_text,
            id,
            recipient_pubkey,
            npub,
        )
        .await
    }

    pub async fn nip44_decrypt(
        &self,
        package_name: &str,
        encrypted_text: &str,
        id: &str,
        recipient_pubkey: &str,
        npub: &str,
    ) -> SignerResult<String> {
        self.result_call(
            "nip44Decrypt",
            package_name,
            encrypted_text,
            id,
            recipient_pubkey,
            npub,
        )
        .await
    }

    pub async fn decrypt_zap_event(
        &self,
        package_name: &str,
        event_json: &str,
        event_id: &str,
        npub: &str,
    ) -> SignerResult<String> {
        let reply = self
            .bridge
            .invoke(
                "decryptZapEvent",
                vec![
                    package_name.to_string(),
                    event_json.to_string(),
                    event_id.to_string(),
                    npub.to_string(),
                ],
            )
            .await?;
        let reply: ResultReply = decode(reply)?;
        Ok(reply.result)
    }

    pub async fn get_relays(
        &self,
        package_name: &str,
        id: &str,
        npub: &str,
    ) -> SignerResult<String> {
        let reply = self
            .bridge
            .invoke(
                "getRelays",
                vec![
                    package_name.to_string(),
                    id.to_string(),
                    npub.to_string(),
                ],
            )
            .await?;
        let reply: ResultReply = decode(reply)?;
        Ok(reply.result)
    }

    /// Shared shape of the four encrypt/decrypt operations:
    /// (package, payload, id, counterparty pubkey, npub) -> { result }.
    async fn result_call(
        &self,
        operation: &str,
        package_name: &str,
        payload: &str,
        id: &str,
        recipient_pubkey: &str,
        npub: &str,
    ) -> SignerResult<String> {
        let reply = self
            .bridge
            .invoke(
                operation,
                vec![
                    package_name.to_string(),
                    payload.to_string(),
                    id.to_string(),
                    recipient_pubkey.to_string(),
                    npub.to_string(),
                ],
            )
            .await?;
        let reply: ResultReply = decode(reply)?;
        Ok(reply.result)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> SignerResult<T> {
    serde_json::from_value(value).map_err(|e| SignerError::MalformedResponse(e.to_string()))
}
