// Client Directory - display names keyed by client identifier
//
// Services that only hold a ClientId ask a resolver for the human-readable
// name. ClientDirectory is the in-memory resolver: a shared registry that
// any number of threads can read while one registers.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::client::ClientId;

/// Looks up the display name of a client.
pub trait ClientNameResolver {
    fn resolve_name(&self, client_id: &ClientId) -> Option<String>;

    fn resolve_name_or_default(&self, client_id: &ClientId, default_name: &str) -> String {
        self.resolve_name(client_id)
            .unwrap_or_else(|| default_name.to_string())
    }
}

/// Registry of client names
///
/// Keys are full identifiers, so an indirect client only resolves when it was
/// registered itself; it does not inherit the wrapped client's name.
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct ClientDirectory {
    names: Arc<RwLock<HashMap<ClientId, String>>>,
}

impl ClientDirectory {
    /// Create new empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a client's name, returning the previous one
    pub fn register(&self, client_id: ClientId, name: impl Into<String>) -> Option<String> {
        let name = name.into();
        tracing::trace!(client = %client_id, name = %name, "registering client name");
        self.names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(client_id, name)
    }

    pub fn remove(&self, client_id: &ClientId) -> Option<String> {
        self.names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(client_id)
    }

    /// Find clients whose name matches (exact match, case-insensitive)
    pub fn find_by_name(&self, name: &str) -> Vec<ClientId> {
        let names = self.names.read().unwrap_or_else(PoisonError::into_inner);
        let mut found: Vec<ClientId> = names
            .iter()
            .filter(|(_, registered)| registered.to_lowercase() == name.to_lowercase())
            .map(|(client_id, _)| client_id.clone())
            .collect();
        found.sort_by_key(ClientId::urn);
        found
    }

    pub fn len(&self) -> usize {
        self.names.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ClientNameResolver for ClientDirectory {
    fn resolve_name(&self, client_id: &ClientId) -> Option<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(client_id)
            .cloned()
    }
}
