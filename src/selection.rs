use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::bridge::BridgeGateway;
use crate::{SignerError, SignerResult};

/// Holds the signer application chosen for this session.
///
/// The installed state of the target can change outside this process at any
/// time, so `is_installed` always goes back to the bridge instead of caching
/// the answer across selection changes. The selection itself is never
/// expired automatically.
pub struct ActiveSigner {
    gateway: Arc<BridgeGateway>,
    current: Mutex<Option<String>>,
}

impl ActiveSigner {
    pub fn new(gateway: Arc<BridgeGateway>) -> Self {
        Self {
            gateway,
            current: Mutex::new(None),
        }
    }

    /// Selects `package_name` as the delegation target, registers it with
    /// the bridge and re-checks that the app is still installed.
    ///
    /// An empty package name clears the selection and resolves to `false`
    /// without a bridge call. If the bridge rejects the registration the
    /// previous selection is left untouched.
    pub async fn select(&self, package_name: &str) -> SignerResult<bool> {
        if package_name.is_empty() {
            *self.current.lock().unwrap() = None;
            debug!("Cleared active signer selection");
            return Ok(false);
        }

        self.gateway.set_package_name(package_name).await?;
        *self.current.lock().unwrap() = Some(package_name.to_string());
        info!("Active signer set to {}", package_name);

        self.gateway.is_external_signer_installed(package_name).await
    }

    /// Currently selected signer package, if any.
    pub fn current(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }

    /// Re-checks whether the selected signer app is still installed.
    /// Resolves `false` without a bridge call when nothing is selected.
    pub async fn is_installed(&self) -> SignerResult<bool> {
        let Some(package_name) = self.current() else {
            return Ok(false);
        };
        self.gateway.is_external_signer_installed(&package_name).await
    }

    pub(crate) fn require_current(&self) -> SignerResult<String> {
        self.current().ok_or(SignerError::NoSigner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::testing::MockBridge;
    use serde_json::{json, Value};

    fn signer(bridge: &Arc<MockBridge>) -> ActiveSigner {
        ActiveSigner::new(Arc::new(BridgeGateway::new(bridge.clone())))
    }

    #[tokio::test]
    async fn test_select_registers_and_rechecks() {
        let bridge = MockBridge::new();
        bridge.reply("setPackageName", Value::Null);
        bridge.reply("isExternalSignerInstalled", json!({ "installed": true }));
        let signer = signer(&bridge);

        let installed = signer.select("com.example.signer").await.unwrap();

        assert!(installed);
        assert_eq!(signer.current().as_deref(), Some("com.example.signer"));
        assert_eq!(bridge.calls_for("setPackageName").len(), 1);
        assert_eq!(bridge.calls_for("isExternalSignerInstalled").len(), 1);
    }

    #[tokio::test]
    async fn test_select_empty_clears_without_bridge_call() {
        let bridge = MockBridge::new();
        let signer = signer(&bridge);

        let installed = signer.select("").await.unwrap();

        assert!(!installed);
        assert!(signer.current().is_none());
        assert_eq!(bridge.call_count(), 0);
    }

    #[tokio::test]
    async fn test_is_installed_false_without_selection_and_without_bridge_call() {
        let bridge = MockBridge::new();
        let signer = signer(&bridge);

        assert!(!signer.is_installed().await.unwrap());
        assert_eq!(bridge.call_count(), 0);
    }

    #[tokio::test]
    async fn test_is_installed_requeries_every_time() {
        let bridge = MockBridge::new();
        bridge.reply("setPackageName", Value::Null);
        bridge.reply("isExternalSignerInstalled", json!({ "installed": true }));
        let signer = signer(&bridge);

        signer.select("com.example.signer").await.unwrap();
        signer.is_installed().await.unwrap();
        signer.is_installed().await.unwrap();

        // one check from select, one per explicit is_installed
        assert_eq!(bridge.calls_for("isExternalSignerInstalled").len(), 3);
    }

    #[tokio::test]
    async fn test_failed_registration_keeps_previous_selection() {
        let bridge = MockBridge::new();
        bridge.reply("setPackageName", Value::Null);
        bridge.reply("isExternalSignerInstalled", json!({ "installed": true }));
        let signer = signer(&bridge);
        signer.select("com.example.signer").await.unwrap();

        bridge.fail("setPackageName", "registration refused");
        let err = signer.select("com.other.signer").await.unwrap_err();

        assert_eq!(err.to_string(), "registration refused");
        assert_eq!(signer.current().as_deref(), Some("com.example.signer"));
    }
}
