// Path registry of webservices
//
// Owns the directory resource and keeps its entry set in step with the
// registered paths: every register/unregister pushes the new entry set while
// the registry's write lock is held, so directory updates happen in the same
// order as registry changes.

use std::net::SocketAddr;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use statuscache_core::{ClockSource, DirectoryConfig, SystemClock};
use statuscache_error::{RegistryError, RegistryResult};
use tracing::{debug, info};

use crate::directory::{DirectoryEntries, DirectoryResource, WELL_KNOWN_CORE_PATH};
use crate::dispatch::dispatch;
use crate::message::{Request, Response, ResponseCode};
use crate::webservice::{path_key, Webservice};

type ServiceMap = IndexMap<String, Arc<dyn Webservice>>;

/// Registry mapping paths to webservices, in registration order
pub struct WebserviceRegistry {
    services: RwLock<ServiceMap>,
    directory: Arc<DirectoryResource>,
}

impl WebserviceRegistry {
    /// Registry whose directory is timed by the system clock and never fresh
    pub fn new() -> Self {
        Self::with_config(&DirectoryConfig::default(), Arc::new(SystemClock::new()))
    }

    pub fn with_config(config: &DirectoryConfig, clock: Arc<dyn ClockSource>) -> Self {
        let directory = Arc::new(DirectoryResource::with_config(DirectoryEntries::new(), config, clock));

        let mut services = ServiceMap::new();
        services.insert(WELL_KNOWN_CORE_PATH.to_string(), directory.clone() as Arc<dyn Webservice>);
        directory.update(services.values().collect());

        Self {
            services: RwLock::new(services),
            directory,
        }
    }

    /// Registers a webservice under its path
    pub fn register(&self, service: Arc<dyn Webservice>) -> RegistryResult<()> {
        let path = path_key(service.as_ref()).to_string();
        validate_path(&path)?;

        let mut services = self.services.write();
        if services.contains_key(&path) {
            return Err(RegistryError::AlreadyRegistered(path));
        }
        services.insert(path.clone(), service);
        self.refresh_directory(&services);

        info!(path = %path, "Webservice registered");
        Ok(())
    }

    /// Removes and shuts down the webservice at `path`
    ///
    /// The directory itself cannot be removed.
    pub fn unregister(&self, path: &str) -> RegistryResult<Arc<dyn Webservice>> {
        if path == WELL_KNOWN_CORE_PATH {
            return Err(RegistryError::InvalidPath(path.to_string()));
        }

        let service = {
            let mut services = self.services.write();
            let service = services
                .shift_remove(path)
                .ok_or_else(|| RegistryError::NotFound(path.to_string()))?;
            self.refresh_directory(&services);
            service
        };

        service.shutdown();
        info!(path = %path, "Webservice removed");
        Ok(service)
    }

    pub fn lookup(&self, path: &str) -> Option<Arc<dyn Webservice>> {
        self.services.read().get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.services.read().contains_key(path)
    }

    /// Registered paths in registration order, directory first
    pub fn paths(&self) -> Vec<String> {
        self.services.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }

    pub fn directory(&self) -> &Arc<DirectoryResource> {
        &self.directory
    }

    /// Route a request to the webservice at `path`
    pub fn handle(&self, path: &str, request: &Request, remote: SocketAddr) -> Response {
        // the lookup lock is released before the resource runs
        match self.lookup(path) {
            Some(service) => dispatch(service.as_ref(), request, remote),
            None => {
                debug!(path = %path, %remote, "No webservice at path");
                Response::with_message(ResponseCode::NotFound, format!("Resource not found: {}", path))
            }
        }
    }

    /// Shut down and remove every webservice except the directory
    pub fn shutdown(&self) {
        let removed: Vec<Arc<dyn Webservice>> = {
            let mut services = self.services.write();
            let removed = services
                .drain(..)
                .filter(|(path, _)| path != WELL_KNOWN_CORE_PATH)
                .map(|(_, service)| service)
                .collect();
            services.insert(WELL_KNOWN_CORE_PATH.to_string(), self.directory.clone() as Arc<dyn Webservice>);
            self.refresh_directory(&services);
            removed
        };

        for service in &removed {
            service.shutdown();
        }
        self.directory.shutdown();
        info!(count = removed.len(), "Webservices shut down");
    }

    fn refresh_directory(&self, services: &ServiceMap) {
        self.directory.update(services.values().collect());
    }
}

impl Default for WebserviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_path(path: &str) -> RegistryResult<()> {
    let valid = path.starts_with('/')
        && !path.chars().any(|c| c.is_whitespace() || c == '<' || c == '>' || c == ',');
    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidPath(path.to_string()))
    }
}
