//! Lookup of extensions by name, for config files and template metadata.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::capability::{CapabilityKind, CapabilityRegistry};
use crate::error::{EngineError, EngineResult};
use crate::extension::{Extension, Registrar};
use crate::extensions::{CaseExtension, DateExtension, StringExtension};

type Factory = Arc<dyn Fn() -> Box<dyn Extension> + Send + Sync>;

/// Named factories producing fresh extension values.
#[derive(Clone, Default)]
pub struct ExtensionCatalog {
    factories: BTreeMap<String, Factory>,
}

impl ExtensionCatalog {
    /// A catalog with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in extensions: `strings`, `case` and `date`.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(StringExtension::NAME, || Box::new(StringExtension));
        catalog.insert(CaseExtension::NAME, || Box::new(CaseExtension));
        catalog.insert(DateExtension::NAME, || Box::new(DateExtension::default()));
        catalog
    }

    /// Add or replace a factory.
    pub fn insert<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Extension> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Instantiate the extension registered under `name`.
    pub fn create(&self, name: &str) -> EngineResult<Box<dyn Extension>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| EngineError::UnknownExtension {
                name: name.to_string(),
            })
    }

    /// Capabilities an extension would register, found by running it against a scratch registry.
    ///
    /// Extensions that depend on other extensions or capabilities may fail here.
    pub fn describe(&self, name: &str) -> EngineResult<Vec<(String, CapabilityKind)>> {
        let extension = self.create(name)?;
        let mut scratch = CapabilityRegistry::new();
        let attached = BTreeSet::new();
        let mut registrar = Registrar::new(extension.name(), &mut scratch, &attached);
        extension
            .register(&mut registrar)
            .map_err(EngineError::Registration)?;

        Ok(scratch
            .iter()
            .map(|(name, cap)| (name.to_string(), cap.kind()))
            .collect())
    }
}

impl fmt::Debug for ExtensionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}
