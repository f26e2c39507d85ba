//! REST transport for rcad
//!
//! Implements [`rcad_core::CadService`] over blocking HTTP, and provides
//! the configuration, credential and logging setup a program needs to
//! open a session.

pub mod api;
pub mod config;
pub mod logging;
pub mod models;

pub use api::RestApi;
pub use config::{ClientConfig, ConfigError, Credentials};
pub use models::{DocumentModel, ElementModel, WorkspaceModel};

use std::sync::Arc;

use tracing::info;

use rcad_core::{CadResult, Client};

/// Open a session against the service described by `config`
///
/// The credentials are checked with one document listing, so bad keys
/// fail here with an auth error rather than on the first feature.
pub fn connect(config: &ClientConfig, credentials: &Credentials) -> CadResult<Client> {
    let api = RestApi::new(config, credentials)?;
    let documents = api.list_documents()?;
    info!(
        "Connected to {} ({} documents visible)",
        config.base_url,
        documents.len()
    );
    Ok(Client::new(Arc::new(api), config.units))
}

/// Like [`connect`], resolving credentials from the environment or the
/// default credentials file
pub fn connect_default(config: &ClientConfig) -> CadResult<Client> {
    connect(config, &Credentials::resolve()?)
}
