//! LinkedIn connection through a live remote-browser session.
//!
//! Unlike the CRM integrations, LinkedIn is connected by having the user log
//! in inside an embedded live browser session. The status resource therefore
//! also reports whether the login inside that session is complete.

pub mod client;
pub mod connect;

use super::{id_string, ConnectionStatus, Integration, Provider};
use crate::polling::StatusMapper;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LinkedInStatusRaw {
    pub status: ConnectionStatus,
    #[serde(default, deserialize_with = "id_string")]
    pub integration_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub profile_name: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub last_sync_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Fallback for `error_message`.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInStatus {
    pub status: Option<ConnectionStatus>,
    pub integration_id: Option<String>,
    pub session_id: Option<String>,
    pub is_complete: bool,
    pub profile_name: Option<String>,
    pub profile_url: Option<String>,
    pub last_sync_at: Option<String>,
    pub error_message: Option<String>,
}

impl LinkedInStatus {
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status.unwrap_or(ConnectionStatus::Disconnected)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LinkedIn;

impl StatusMapper for LinkedIn {
    type Raw = LinkedInStatusRaw;
    type View = LinkedInStatus;

    fn map(&self, raw: LinkedInStatusRaw) -> LinkedInStatus {
        LinkedInStatus {
            status: Some(raw.status),
            integration_id: raw.integration_id,
            session_id: raw.session_id,
            is_complete: raw.is_complete,
            profile_name: raw.profile_name,
            profile_url: raw.profile_url,
            last_sync_at: raw.last_sync_at,
            error_message: raw.error_message.or(raw.message),
        }
    }

    fn is_pending(&self, view: &LinkedInStatus) -> bool {
        view.status() == ConnectionStatus::Pending
    }

    fn not_configured(&self) -> LinkedInStatus {
        LinkedInStatus {
            status: Some(ConnectionStatus::Disconnected),
            ..LinkedInStatus::default()
        }
    }
}

impl Integration for LinkedIn {
    const PROVIDER: Provider = Provider::LinkedIn;
}
