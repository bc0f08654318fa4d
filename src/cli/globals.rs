use crate::api::{ApiClient, ClientOptions};
use crate::config::PortalConfig;
use crate::polling::Credentials;
use secrecy::{ExposeSecret, SecretString};

/// Connection settings shared by every action.
#[derive(Clone)]
pub struct GlobalArgs {
    pub config: PortalConfig,
    pub token: Option<SecretString>,
    pub org_id: Option<String>,
    pub dev_login_key: Option<SecretString>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(config: PortalConfig) -> Self {
        Self {
            config,
            token: None,
            org_id: None,
            dev_login_key: None,
        }
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            token: self.token.clone(),
            org_id: self.org_id.clone(),
            dev_login_key: self.dev_login_key.clone(),
            custom_headers: Vec::new(),
        }
    }

    /// Client for the API gateway.
    #[must_use]
    pub fn gateway_client(&self) -> ApiClient {
        ApiClient::new(&self.config.api_base_url, self.client_options())
    }

    /// Client for routes served by the portal itself.
    #[must_use]
    pub fn portal_client(&self) -> ApiClient {
        ApiClient::new(&self.config.portal_base_url, self.client_options())
    }

    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.token.as_ref().map(ExposeSecret::expose_secret),
            self.org_id.as_deref(),
        )
        .with_dev_login_key(self.dev_login_key.clone())
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("config", &self.config)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("org_id", &self.org_id)
            .field("dev_login_key", &self.dev_login_key.as_ref().map(|_| "***"))
            .finish()
    }
}
