use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use crate::bridge::BridgeGateway;
use crate::selection::ActiveSigner;
use crate::types::{EncryptionMode, SignedEvent};
use crate::{SignerError, SignerResult};

/// Request/response facade for the delegated identity operations.
///
/// Every operation is one correlated call through the bridge, scoped to the
/// [`ActiveSigner`]'s current target. Preconditions are validated
/// synchronously before the bridge is touched, so a "you forgot a step"
/// failure never costs a round trip. Nothing is retried automatically, and a
/// failed call never clears previously obtained state.
pub struct SignerClient {
    gateway: Arc<BridgeGateway>,
    signer: Arc<ActiveSigner>,
    mode: Mutex<EncryptionMode>,
    npub: Mutex<Option<String>>,
    id_counter: AtomicU64,
}

impl SignerClient {
    pub fn new(gateway: Arc<BridgeGateway>, signer: Arc<ActiveSigner>) -> Self {
        Self {
            gateway,
            signer,
            mode: Mutex::new(EncryptionMode::default()),
            npub: Mutex::new(None),
            id_counter: AtomicU64::new(unix_time_ms() as u64),
        }
    }

    /// The selection this client is scoped to.
    pub fn signer(&self) -> &ActiveSigner {
        &self.signer
    }

    /// The scheme encrypt/decrypt will route to.
    pub fn encryption_mode(&self) -> EncryptionMode {
        *self.mode.lock().unwrap()
    }

    /// Switches the encryption scheme. Only routing changes; a call already
    /// dispatched keeps the mode it was read with.
    pub fn set_encryption_mode(&self, mode: EncryptionMode) {
        *self.mode.lock().unwrap() = mode;
        info!("Encryption mode set to {:?}", mode);
    }

    /// Identity key retrieved by the last successful `get_public_key`, if any.
    pub fn public_key(&self) -> Option<String> {
        self.npub.lock().unwrap().clone()
    }

    /// Asks the active signer for its public key and stores the returned
    /// npub for use in subsequent operations.
    pub async fn get_public_key(&self) -> SignerResult<String> {
        let package_name = self.signer.require_current()?;
        let reply = self.gateway.get_public_key(&package_name).await?;
        *self.npub.lock().unwrap() = Some(reply.npub.clone());
        debug!("Retrieved public key: {}", reply.npub);
        Ok(reply.npub)
    }

    /// Signs `event_content` under the previously retrieved identity key.
    ///
    /// The event is submitted as a JSON object with a `content` field, per
    /// the signer protocol. Repeat calls with an identical triple are sent
    /// again in full; whether the signature comes back identical is up to
    /// the signer.
    pub async fn sign_event(&self, event_content: &str, event_id: &str) -> SignerResult<SignedEvent> {
        let package_name = self.signer.require_current()?;
        let npub = self.require_npub()?;

        let event_json = serde_json::json!({ "content": event_content }).to_string();
        let signed = self
            .gateway
            .sign_event(&package_name, &event_json, event_id, &npub)
            .await?;
        debug!("Signed event {}", signed.id);
        Ok(signed)
    }

    /// Encrypts `plain_text` for `recipient_pubkey` using the current mode.
    pub async fn encrypt(&self, plain_text: &str, recipient_pubkey: &str) -> SignerResult<String> {
        let package_name = self.signer.require_current()?;
        let npub = self.require_npub()?;
        require_field("recipient public key", recipient_pubkey)?;
        require_field("message to encrypt", plain_text)?;

        let id = self.next_id("encrypt");
        // Mode is read once, before dispatch; toggling it afterwards does
        // not affect this call.
        match self.encryption_mode() {
            EncryptionMode::Nip04 => {
                self.gateway
                    .nip04_encrypt(&package_name, plain_text, &id, recipient_pubkey, &npub)
                    .await
            }
            EncryptionMode::Nip44 => {
                self.gateway
                    .nip44_encrypt(&package_name, plain_text, &id, recipient_pubkey, &npub)
                    .await
            }
        }
    }

    /// Decrypts `encrypted_text` from `recipient_pubkey` using the current mode.
    pub async fn decrypt(&self, encrypted_text: &str, recipient_pubkey: &str) -> SignerResult<String> {
        let package_name = self.signer.require_current()?;
        let npub = self.require_npub()?;
        require_field("recipient public key", recipient_pubkey)?;
        require_field("message to decrypt", encrypted_text)?;

        let id = self.next_id("decrypt");
        match self.encryption_mode() {
            EncryptionMode::Nip04 => {
                self.gateway
                    .nip04_decrypt(&package_name, encrypted_text, &id, recipient_pubkey, &npub)
                    .await
            }
            EncryptionMode::Nip44 => {
                self.gateway
                    .nip44_decrypt(&package_name, encrypted_text, &id, recipient_pubkey, &npub)
                    .await
            }
        }
    }

    /// Asks the signer to decrypt the content of a zap (payment
    /// notification) event. `event_json` must carry at least a `content`
    /// field; the identity key is passed along when one was retrieved.
    pub async fn decrypt_zap_event(&self, event_json: &str, event_id: &str) -> SignerResult<String> {
        let package_name = self.signer.require_current()?;
        let npub = self.public_key().unwrap_or_default();
        self.gateway
            .decrypt_zap_event(&package_name, event_json, event_id, &npub)
            .await
    }

    /// Fetches the relay list the signer holds for this identity.
    pub async fn get_relays(&self) -> SignerResult<String> {
        let package_name = self.signer.require_current()?;
        let npub = self.public_key().unwrap_or_default();
        let id = self.next_id("relay");
        self.gateway.get_relays(&package_name, &id, &npub).await
    }

    fn require_npub(&self) -> SignerResult<String> {
        self.public_key().ok_or(SignerError::MissingPublicKey)
    }

    /// Fresh correlation identifier for one in-flight call. The signer may
    /// tolerate reuse, but identifiers are generated fresh regardless.
    fn next_id(&self, label: &str) -> String {
        let seq = self.id_counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}-{}", label, seq, unix_time_ms())
    }
}

fn require_field(name: &'static str, value: &str) -> SignerResult<()> {
    if value.is_empty() {
        return Err(SignerError::MissingField(name));
    }
    Ok(())
}

fn unix_time_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
