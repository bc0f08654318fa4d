//! HubSpot connection health.

use super::{id_string, ConnectionStatus, Integration, Provider};
use crate::polling::StatusMapper;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct HubSpotHealthRaw {
    pub status: ConnectionStatus,
    #[serde(default, deserialize_with = "id_string")]
    pub integration_id: Option<String>,
    #[serde(default, deserialize_with = "id_string")]
    pub portal_id: Option<String>,
    #[serde(default)]
    pub hub_domain: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub last_sync_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubSpotStatus {
    pub status: Option<ConnectionStatus>,
    pub integration_id: Option<String>,
    pub portal_id: Option<String>,
    pub hub_domain: Option<String>,
    pub account_name: Option<String>,
    pub scopes: Vec<String>,
    pub last_sync_at: Option<String>,
    pub error_message: Option<String>,
}

impl HubSpotStatus {
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status.unwrap_or(ConnectionStatus::Disconnected)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HubSpot;

impl StatusMapper for HubSpot {
    type Raw = HubSpotHealthRaw;
    type View = HubSpotStatus;

    fn map(&self, raw: HubSpotHealthRaw) -> HubSpotStatus {
        HubSpotStatus {
            status: Some(raw.status),
            integration_id: raw.integration_id,
            portal_id: raw.portal_id,
            hub_domain: raw.hub_domain,
            account_name: raw.account_name,
            scopes: raw.scopes,
            last_sync_at: raw.last_sync_at,
            error_message: raw.error_message,
        }
    }

    fn is_pending(&self, view: &HubSpotStatus) -> bool {
        view.status() == ConnectionStatus::Pending
    }

    fn not_configured(&self) -> HubSpotStatus {
        HubSpotStatus {
            status: Some(ConnectionStatus::Disconnected),
            ..HubSpotStatus::default()
        }
    }
}

impl Integration for HubSpot {
    const PROVIDER: Provider = Provider::HubSpot;
}
