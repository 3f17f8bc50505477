use std::sync::Arc;
use tracing::debug;

use crate::bridge::BridgeGateway;
use crate::types::SignerAppInfo;
use crate::SignerResult;

/// Discovers signer applications installed on the device.
///
/// Each call produces a fresh snapshot; the list is not watched or cached
/// here. An empty list is a valid result meaning no signer app was found.
/// On a bridge failure the caller keeps whatever list it already had.
pub struct SignerDirectory {
    gateway: Arc<BridgeGateway>,
}

impl SignerDirectory {
    pub fn new(gateway: Arc<BridgeGateway>) -> Self {
        Self { gateway }
    }

    pub async fn installed_signer_apps(&self) -> SignerResult<Vec<SignerAppInfo>> {
        let apps = self.gateway.get_installed_signer_apps().await?;
        debug!("Found {} installed signer app(s)", apps.len());
        Ok(apps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::testing::MockBridge;
    use serde_json::json;

    fn directory(bridge: &Arc<MockBridge>) -> SignerDirectory {
        SignerDirectory::new(Arc::new(BridgeGateway::new(bridge.clone())))
    }

    #[tokio::test]
    async fn test_empty_list_is_not_an_error() {
        let bridge = MockBridge::new();
        bridge.reply("getInstalledSignerApps", json!([]));

        let apps = directory(&bridge).installed_signer_apps().await.unwrap();
        assert!(apps.is_empty());
    }

    #[tokio::test]
    async fn test_list_is_decoded_with_optional_icons() {
        let bridge = MockBridge::new();
        bridge.reply(
            "getInstalledSignerApps",
            json!([
                {
                    "name": "Amber",
                    "packageName": "com.greenart7c3.nostrsigner",
                    "iconUrl": "content://icons/amber"
                },
                {
                    "name": "Other Signer",
                    "packageName": "com.example.signer"
                }
            ]),
        );

        let apps = directory(&bridge).installed_signer_apps().await.unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].package_name, "com.greenart7c3.nostrsigner");
        assert_eq!(apps[0].icon_url.as_deref(), Some("content://icons/amber"));
        assert!(apps[1].icon_url.is_none());
    }

    #[tokio::test]
    async fn test_each_fetch_requeries_the_bridge() {
        let bridge = MockBridge::new();
        bridge.reply("getInstalledSignerApps", json!([]));
        let directory = directory(&bridge);

        directory.installed_signer_apps().await.unwrap();
        directory.installed_signer_apps().await.unwrap();

        assert_eq!(bridge.calls_for("getInstalledSignerApps").len(), 2);
    }

    #[tokio::test]
    async fn test_bridge_failure_surfaces_as_fetch_failure() {
        let bridge = MockBridge::new();
        bridge.fail("getInstalledSignerApps", "query failed");

        let err = directory(&bridge).installed_signer_apps().await.unwrap_err();
        assert_eq!(err.to_string(), "query failed");
    }
}
