use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::backend::InferenceBackend;
use crate::error::Result;

/// Builds a backend for a model identifier.
pub type BackendFactory = Box<dyn Fn(&str) -> Result<Arc<dyn InferenceBackend>> + Send + Sync>;

/// Maps model identifiers to reusable backends. The default backend is built
/// up front; alternates are built on first use and kept for later calls, so
/// a request for another model never touches the default handle.
pub struct ModelRegistry {
    default: Arc<dyn InferenceBackend>,
    alternates: DashMap<String, Arc<dyn InferenceBackend>>,
    factory: BackendFactory,
}

impl ModelRegistry {
    pub fn new(default: Arc<dyn InferenceBackend>, factory: BackendFactory) -> Self {
        Self {
            default,
            alternates: DashMap::new(),
            factory,
        }
    }

    pub fn default_model(&self) -> &str {
        self.default.model()
    }

    pub fn get(&self, model: Option<&str>) -> Result<Arc<dyn InferenceBackend>> {
        let model = match model.map(str::trim) {
            None | Some("") => return Ok(Arc::clone(&self.default)),
            Some(m) if m == self.default.model() => return Ok(Arc::clone(&self.default)),
            Some(m) => m,
        };

        // The entry guard holds the shard lock, so concurrent first requests
        // for the same model build it once.
        match self.alternates.entry(model.to_string()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                tracing::info!(model, "Building inference backend");
                let backend = (self.factory)(model)?;
                entry.insert(Arc::clone(&backend));
                Ok(backend)
            }
        }
    }

    pub fn loaded_alternates(&self) -> usize {
        self.alternates.len()
    }
}
