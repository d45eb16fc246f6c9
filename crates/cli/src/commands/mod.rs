//! CLI command implementations.

pub mod auth;
pub mod cart;
pub mod products;

use std::sync::Arc;

use thiserror::Error;

use seamline_client::api::cart::HttpCartGateway;
use seamline_client::api::{ApiClient, ApiError};
use seamline_client::cart::CartService;
use seamline_client::catalog::FilterError;
use seamline_client::catalog::filters::ParseSortKeyError;
use seamline_client::config::{ClientConfig, ConfigError};
use seamline_client::session::Session;
use seamline_client::store::{FileScope, KeyValueScope, StoreError};
use seamline_core::EmailError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid price filter: {0}")]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Sort(#[from] ParseSortKeyError),
}

/// Shared wiring for all commands: config, persisted scope, session, and
/// the API client, in that construction order.
pub struct AppContext {
    pub session: Session,
    pub api: ApiClient,
    scope: Arc<dyn KeyValueScope>,
}

impl AppContext {
    /// Load the environment and open the persisted scope.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or the data directory
    /// cannot be opened.
    pub fn load() -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        let scope: Arc<dyn KeyValueScope> = Arc::new(FileScope::open(&config.data_dir)?);
        let session = Session::new(Arc::clone(&scope));
        let api = ApiClient::new(&config, session.clone())?;

        Ok(Self {
            session,
            api,
            scope,
        })
    }

    /// A cart service over the HTTP gateway and the persisted scope.
    #[must_use]
    pub fn cart_service(&self) -> CartService<HttpCartGateway> {
        CartService::new(
            HttpCartGateway::new(self.api.clone()),
            self.session.clone(),
            Arc::clone(&self.scope),
        )
    }
}
