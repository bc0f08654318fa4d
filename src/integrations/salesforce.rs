//! Salesforce connection health.

use super::{id_string, ConnectionStatus, Integration, Provider};
use crate::polling::StatusMapper;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SalesforceHealthRaw {
    pub status: ConnectionStatus,
    #[serde(default, deserialize_with = "id_string")]
    pub integration_id: Option<String>,
    #[serde(default)]
    pub instance_url: Option<String>,
    #[serde(default, deserialize_with = "id_string")]
    pub org_id: Option<String>,
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub last_sync_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesforceStatus {
    pub status: Option<ConnectionStatus>,
    pub integration_id: Option<String>,
    pub instance_url: Option<String>,
    pub org_id: Option<String>,
    pub org_name: Option<String>,
    pub user_email: Option<String>,
    pub api_version: Option<String>,
    pub last_sync_at: Option<String>,
    pub error_message: Option<String>,
}

impl SalesforceStatus {
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status.unwrap_or(ConnectionStatus::Disconnected)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Salesforce;

impl StatusMapper for Salesforce {
    type Raw = SalesforceHealthRaw;
    type View = SalesforceStatus;

    fn map(&self, raw: SalesforceHealthRaw) -> SalesforceStatus {
        SalesforceStatus {
            status: Some(raw.status),
            integration_id: raw.integration_id,
            instance_url: raw.instance_url,
            org_id: raw.org_id,
            org_name: raw.org_name,
            user_email: raw.user_email,
            api_version: raw.api_version,
            last_sync_at: raw.last_sync_at,
            error_message: raw.error_message,
        }
    }

    fn is_pending(&self, view: &SalesforceStatus) -> bool {
        view.status() == ConnectionStatus::Pending
    }

    fn not_configured(&self) -> SalesforceStatus {
        SalesforceStatus {
            status: Some(ConnectionStatus::Disconnected),
            ..SalesforceStatus::default()
        }
    }
}

impl Integration for Salesforce {
    const PROVIDER: Provider = Provider::Salesforce;
}
