//! A cloneable engine handle that allows registration while other threads render.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::Serialize;
use tera::Context;

use crate::capability::Capability;
use crate::catalog::ExtensionCatalog;
use crate::engine::Engine;
use crate::error::EngineResult;
use crate::extension::Extension;

/// Shared engine guarded by a read-write lock.
///
/// Renders hold the read lock, so any number run at once. Registration and
/// template changes hold the write lock and wait for in-flight renders.
#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    inner: Arc<RwLock<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn render(&self, name: &str, context: &Context) -> EngineResult<String> {
        self.inner.read().render(name, context)
    }

    pub fn render_serialize<T: Serialize>(&self, name: &str, value: &T) -> EngineResult<String> {
        self.inner.read().render_serialize(name, value)
    }

    pub fn render_str(&self, source: &str, context: &Context) -> EngineResult<String> {
        self.inner.read().render_str(source, context)
    }

    pub fn register_extension<E: Extension + ?Sized>(&self, extension: &E) -> EngineResult<()> {
        self.inner.write().register_extension(extension)
    }

    pub fn attach_named<S: AsRef<str>>(
        &self,
        catalog: &ExtensionCatalog,
        names: &[S],
    ) -> EngineResult<()> {
        self.inner.write().attach_named(catalog, names)
    }

    pub fn register_function<F: tera::Function + 'static>(&self, name: &str, function: F) {
        self.inner.write().register_function(name, function);
    }

    pub fn register_filter<F: tera::Filter + 'static>(&self, name: &str, filter: F) {
        self.inner.write().register_filter(name, filter);
    }

    pub fn register_test<T: tera::Test + 'static>(&self, name: &str, test: T) {
        self.inner.write().register_test(name, test);
    }

    pub fn register_capability(&self, name: &str, capability: Capability) {
        self.inner.write().register_capability(name, capability);
    }

    pub fn add_template(&self, name: impl Into<String>, source: impl Into<String>) {
        self.inner.write().add_template(name, source);
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.inner.read().has_capability(name)
    }

    /// Hold the read lock for several queries at once.
    pub fn read(&self) -> RwLockReadGuard<'_, Engine> {
        self.inner.read()
    }

    /// Hold the write lock for a batch of changes.
    pub fn write(&self) -> RwLockWriteGuard<'_, Engine> {
        self.inner.write()
    }
}

impl From<Engine> for SharedEngine {
    fn from(engine: Engine) -> Self {
        Self::new(engine)
    }
}
