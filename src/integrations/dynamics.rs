//! Dynamics 365 connection health.

use super::{id_string, ConnectionStatus, Integration, Provider};
use crate::polling::StatusMapper;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DynamicsHealthRaw {
    pub status: ConnectionStatus,
    #[serde(default, deserialize_with = "id_string")]
    pub integration_id: Option<String>,
    #[serde(default)]
    pub environment_url: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub last_sync_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicsStatus {
    pub status: Option<ConnectionStatus>,
    pub integration_id: Option<String>,
    pub environment_url: Option<String>,
    pub tenant_id: Option<String>,
    pub organization_name: Option<String>,
    pub last_sync_at: Option<String>,
    pub error_message: Option<String>,
}

impl DynamicsStatus {
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status.unwrap_or(ConnectionStatus::Disconnected)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Dynamics;

impl StatusMapper for Dynamics {
    type Raw = DynamicsHealthRaw;
    type View = DynamicsStatus;

    fn map(&self, raw: DynamicsHealthRaw) -> DynamicsStatus {
        DynamicsStatus {
            status: Some(raw.status),
            integration_id: raw.integration_id,
            environment_url: raw.environment_url,
            tenant_id: raw.tenant_id,
            organization_name: raw.organization_name,
            last_sync_at: raw.last_sync_at,
            error_message: raw.error_message,
        }
    }

    fn is_pending(&self, view: &DynamicsStatus) -> bool {
        view.status() == ConnectionStatus::Pending
    }

    fn not_configured(&self) -> DynamicsStatus {
        DynamicsStatus {
            status: Some(ConnectionStatus::Disconnected),
            ..DynamicsStatus::default()
        }
    }
}

impl Integration for Dynamics {
    const PROVIDER: Provider = Provider::Dynamics;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_environment_fields() {
        let raw: DynamicsHealthRaw = serde_json::from_value(json!({
            "status": "connected",
            "integration_id": 17,
            "environment_url": "https://acme.crm.dynamics.com",
            "organization_name": "Acme"
        }))
        .unwrap();
        let view = Dynamics.map(raw);
        assert_eq!(view.integration_id.as_deref(), Some("17"));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["environmentUrl"], "https://acme.crm.dynamics.com");
        assert_eq!(json["organizationName"], "Acme");
        assert_eq!(json["status"], "connected");
    }
}
