//! Lazy, credential-keyed access to the Liongard client.
//!
//! The accessor defers client construction until first use and memoizes one
//! handle per credential pair. In gateway mode each tenant's credentials map
//! to their own cache entry, so swapping credentials never mutates a handle
//! another request may still be using.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::api::LiongardApi;
use super::error::{ClientError, ClientResult};
use super::http::LiongardClient;
use crate::core::config::CredentialsConfig;

/// A Liongard credential pair: API key and instance subdomain.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credentials {
    pub api_key: String,
    pub instance: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            instance: instance.into(),
        }
    }

    /// Resolve credentials from the process configuration.
    ///
    /// Fails with [`ClientError::MissingCredentials`] when either value is
    /// absent or empty.
    pub fn from_config(config: &CredentialsConfig) -> ClientResult<Self> {
        match (&config.api_key, &config.instance) {
            (Some(api_key), Some(instance)) if !api_key.is_empty() && !instance.is_empty() => {
                Ok(Self::new(api_key, instance))
            }
            _ => Err(ClientError::MissingCredentials),
        }
    }
}

/// Custom Debug implementation to redact the API key from logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("instance", &self.instance)
            .finish()
    }
}

type ClientBuilder = dyn Fn(&Credentials) -> ClientResult<Arc<dyn LiongardApi>> + Send + Sync;

type ClientCache = HashMap<Credentials, Arc<dyn LiongardApi>>;

/// Credential-keyed cache of Liongard client handles.
pub struct ClientAccessor {
    defaults: CredentialsConfig,
    builder: Box<ClientBuilder>,
    cache: RwLock<ClientCache>,
}

impl ClientAccessor {
    /// Create an accessor that constructs real HTTP clients.
    pub fn new(defaults: CredentialsConfig) -> Self {
        Self::with_builder(defaults, |credentials| {
            let client = LiongardClient::new(&credentials.api_key, &credentials.instance)?;
            Ok(Arc::new(client) as Arc<dyn LiongardApi>)
        })
    }

    /// Create an accessor with a custom client builder.
    pub fn with_builder<F>(defaults: CredentialsConfig, builder: F) -> Self
    where
        F: Fn(&Credentials) -> ClientResult<Arc<dyn LiongardApi>> + Send + Sync + 'static,
    {
        Self {
            defaults,
            builder: Box::new(builder),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create the client for the process-level credentials.
    pub fn acquire(&self) -> ClientResult<Arc<dyn LiongardApi>> {
        let credentials = Credentials::from_config(&self.defaults)?;
        self.acquire_with(&credentials)
    }

    /// Get or create the client for an explicit credential pair.
    pub fn acquire_with(&self, credentials: &Credentials) -> ClientResult<Arc<dyn LiongardApi>> {
        if let Some(client) = self.read_cache().get(credentials) {
            return Ok(client.clone());
        }

        debug!(instance = %credentials.instance, "Constructing Liongard client");
        let client = (self.builder)(credentials)?;

        // On a lost construction race the first cached instance wins.
        let mut cache = self.write_cache();
        Ok(cache.entry(credentials.clone()).or_insert(client).clone())
    }

    /// Drop every cached client. Idempotent.
    pub fn invalidate(&self) {
        self.write_cache().clear();
    }

    /// Drop the cached client for one credential pair, if present.
    pub fn evict(&self, credentials: &Credentials) {
        self.write_cache().remove(credentials);
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, ClientCache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, ClientCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}
