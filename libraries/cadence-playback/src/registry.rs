//! URI scheme to backend registry

use cadence_core::{BackendRegistry, PlaybackBackend};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Backend registry keyed by lowercase URI scheme
#[derive(Clone, Default)]
pub struct SchemeRegistry {
    backends: HashMap<String, Arc<dyn PlaybackBackend>>,
}

impl fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut schemes: Vec<&str> = self.backends.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        f.debug_struct("SchemeRegistry")
            .field("schemes", &schemes)
            .finish()
    }
}

impl SchemeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend for one or more schemes
    ///
    /// A scheme registered twice keeps the later backend.
    pub fn register<I, S>(&mut self, schemes: I, backend: Arc<dyn PlaybackBackend>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for scheme in schemes {
            let scheme = scheme.as_ref().to_ascii_lowercase();
            debug!("Registering backend for scheme {:?}", scheme);
            if self
                .backends
                .insert(scheme.clone(), Arc::clone(&backend))
                .is_some()
            {
                warn!("Backend for scheme {:?} replaced", scheme);
            }
        }
    }

    /// Builder-style [`register`](Self::register)
    #[must_use]
    pub fn with_backend<I, S>(mut self, schemes: I, backend: Arc<dyn PlaybackBackend>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.register(schemes, backend);
        self
    }

    /// Registered schemes, sorted
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.backends.keys().cloned().collect();
        schemes.sort();
        schemes
    }
}

impl BackendRegistry for SchemeRegistry {
    fn resolve(&self, uri_scheme: &str) -> Option<Arc<dyn PlaybackBackend>> {
        self.backends
            .get(&uri_scheme.to_ascii_lowercase())
            .map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::DummyBackend;

    #[test]
    fn resolves_registered_schemes() {
        let backend = Arc::new(DummyBackend::new());
        let registry = SchemeRegistry::new().with_backend(["dummy", "Local"], backend);

        assert!(registry.resolve("dummy").is_some());
        assert!(registry.resolve("local").is_some());
        assert!(registry.resolve("LOCAL").is_some());
        assert!(registry.resolve("spotify").is_none());
        assert_eq!(registry.schemes(), vec!["dummy".to_string(), "local".to_string()]);
    }

    #[test]
    fn later_registration_wins() {
        let first = Arc::new(DummyBackend::new());
        let second = Arc::new(DummyBackend::new());
        let mut registry = SchemeRegistry::new();
        registry.register(["dummy"], first);
        registry.register(["dummy"], second.clone());

        let resolved = registry.resolve("dummy").unwrap();
        assert_eq!(
            Arc::as_ptr(&resolved).cast::<()>(),
            Arc::as_ptr(&second).cast::<()>()
        );
    }
}
