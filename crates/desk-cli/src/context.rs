use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use desk_auth::AuthService;
use desk_config::{DeskConfig, StorageBackend};
use desk_http::ApiClient;
use desk_org::OrganizationService;
use desk_session::{
    FallbackStorage, FileStorage, KeyringStorage, MemoryStorage, SessionStorage, TokenStore,
};

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: DeskConfig,
    pub session: TokenStore,
    pub auth: AuthService,
    pub orgs: OrganizationService,
}

impl AppContext {
    /// Build the session store and API services from configuration.
    pub fn init(mut config: DeskConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        if let Some(url) = &flags.api_url {
            config.api.base_url.clone_from(url);
            config.api.validate().context("invalid --api-url")?;
        }

        let session = TokenStore::from_shared(build_storage(&config)?);
        tracing::debug!(
            backend = session.backend_name(),
            base_url = %config.api.base_url,
            "session store ready"
        );

        let api = ApiClient::new(&config.api.base_url, config.api.timeout(), session.clone())
            .context("failed to build HTTP client")?;

        Ok(Self {
            auth: AuthService::new(api.clone()),
            orgs: OrganizationService::new(api),
            session,
            config,
        })
    }

    #[must_use]
    pub const fn banner_ttl(&self) -> Duration {
        self.config.panel.banner_ttl()
    }
}

fn build_storage(config: &DeskConfig) -> anyhow::Result<Arc<dyn SessionStorage>> {
    let session = &config.session;
    let file_path = || {
        session
            .file_path()
            .context("cannot locate a home directory for the session file; set session.path")
    };

    Ok(match session.backend {
        StorageBackend::Keyring => Arc::new(FallbackStorage::new(
            KeyringStorage::new(session.keyring_service.clone()),
            FileStorage::new(file_path()?),
        )),
        StorageBackend::File => Arc::new(FileStorage::new(file_path()?)),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    })
}
