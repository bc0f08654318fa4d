//! Connection status for the CRM and LinkedIn integrations.
//!
//! Each provider module declares its wire shape (snake_case, as the gateway
//! sends it), a camelCase view model, and a [`StatusMapper`] that converts one
//! into the other. [`watch`] plugs any of them into the shared poller.

pub mod crm;
pub mod dynamics;
pub mod hubspot;
pub mod linkedin;
pub mod salesforce;

use crate::polling::{
    Credentials, HttpStatusSource, PollOptions, PollerHandle, StatusMapper, StatusPoller,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Pending,
    Disconnected,
    Error,
}

impl ConnectionStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Pending => "pending",
            Self::Disconnected => "disconnected",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    LinkedIn,
    HubSpot,
    Salesforce,
    Dynamics,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::LinkedIn,
        Provider::HubSpot,
        Provider::Salesforce,
        Provider::Dynamics,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LinkedIn => "linkedin",
            Self::HubSpot => "hubspot",
            Self::Salesforce => "salesforce",
            Self::Dynamics => "dynamics",
        }
    }

    /// Connection-health resource polled for this provider.
    #[must_use]
    pub fn health_path(self) -> &'static str {
        match self {
            Self::LinkedIn => "/v1/linkedin-connection/status",
            Self::HubSpot => "/v1/crm/config/platforms/hubspot/health",
            Self::Salesforce => "/v1/crm/config/platforms/salesforce/health",
            Self::Dynamics => "/v1/crm/config/platforms/dynamics/health",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linkedin" => Ok(Self::LinkedIn),
            "hubspot" => Ok(Self::HubSpot),
            "salesforce" => Ok(Self::Salesforce),
            "dynamics" | "dynamics365" | "dynamics-365" => Ok(Self::Dynamics),
            other => Err(format!("unknown integration: {other}")),
        }
    }
}

/// A provider whose health resource can be watched.
pub trait Integration: StatusMapper + Default {
    const PROVIDER: Provider;
}

/// Starts polling a provider's health resource.
pub fn watch<I: Integration>(
    http: reqwest::Client,
    base_url: &str,
    credentials: Credentials,
    options: PollOptions,
) -> PollerHandle<I::View> {
    let source = HttpStatusSource::new(http, base_url, I::PROVIDER.health_path());
    StatusPoller::spawn(source, I::default(), credentials, options)
}

/// Accepts identifiers sent either as strings or as numbers.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(text)) if !text.trim().is_empty() => Some(text),
        Some(Id::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}
