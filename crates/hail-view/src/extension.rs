//! The extension contract: a bundle of capabilities attached to an engine as a unit.
//!
//! Extensions never hold a reference to an [`Engine`](crate::Engine). During
//! [`Engine::register_extension`](crate::Engine::register_extension) they
//! receive a [`Registrar`], a short-lived handle that can only add
//! capabilities and ask whether a prerequisite is already present. The same
//! extension value can therefore be attached to any number of engines.

use std::collections::BTreeSet;
use std::fmt::Debug;

use crate::capability::{Capability, CapabilityRegistry};
use crate::error::RegistrationError;

/// A reusable set of template capabilities.
///
/// ```ignore
/// #[derive(Debug)]
/// struct Shout;
///
/// impl Extension for Shout {
///     fn name(&self) -> &str {
///         "shout"
///     }
///
///     fn register(&self, registrar: &mut Registrar<'_>) -> Result<(), RegistrationError> {
///         registrar.register_filter("shout", shout_filter);
///         Ok(())
///     }
/// }
/// ```
pub trait Extension: Send + Sync + Debug {
    /// Identity used for duplicate detection and diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Add this extension's capabilities through the registrar.
    fn register(&self, registrar: &mut Registrar<'_>) -> Result<(), RegistrationError>;
}

impl<E: Extension + ?Sized> Extension for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn register(&self, registrar: &mut Registrar<'_>) -> Result<(), RegistrationError> {
        (**self).register(registrar)
    }
}

/// Mutable capability-registration handle lent to one extension for one call.
#[derive(Debug)]
pub struct Registrar<'a> {
    extension: &'a str,
    registry: &'a mut CapabilityRegistry,
    attached: &'a BTreeSet<String>,
}

impl<'a> Registrar<'a> {
    pub(crate) fn new(
        extension: &'a str,
        registry: &'a mut CapabilityRegistry,
        attached: &'a BTreeSet<String>,
    ) -> Self {
        Self {
            extension,
            registry,
            attached,
        }
    }

    /// Name of the extension currently registering.
    pub fn extension(&self) -> &str {
        self.extension
    }

    pub fn register_function<F: tera::Function + 'static>(
        &mut self,
        name: &str,
        function: F,
    ) -> &mut Self {
        self.add(name, Capability::function(function))
    }

    pub fn register_filter<F: tera::Filter + 'static>(
        &mut self,
        name: &str,
        filter: F,
    ) -> &mut Self {
        self.add(name, Capability::filter(filter))
    }

    pub fn register_test<T: tera::Test + 'static>(&mut self, name: &str, test: T) -> &mut Self {
        self.add(name, Capability::test(test))
    }

    /// Add an already-built capability; an existing entry with this name is replaced.
    pub fn add(&mut self, name: &str, capability: Capability) -> &mut Self {
        tracing::trace!(extension = %self.extension, %name, "Extension adding capability");
        self.registry.insert(name, capability);
        self
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.attached.contains(name)
    }

    /// Fail with [`RegistrationError::MissingCapability`] unless `name` is registered.
    pub fn require_capability(&self, name: &str) -> Result<(), RegistrationError> {
        if self.has_capability(name) {
            Ok(())
        } else {
            Err(RegistrationError::MissingCapability {
                extension: self.extension.to_string(),
                capability: name.to_string(),
            })
        }
    }

    /// Fail with [`RegistrationError::MissingDependency`] unless `name` is already attached.
    pub fn require_extension(&self, name: &str) -> Result<(), RegistrationError> {
        if self.has_extension(name) {
            Ok(())
        } else {
            Err(RegistrationError::MissingDependency {
                extension: self.extension.to_string(),
                dependency: name.to_string(),
            })
        }
    }

    /// Build a [`RegistrationError::Failed`] attributed to the registering extension.
    pub fn failed(&self, reason: impl Into<String>) -> RegistrationError {
        RegistrationError::Failed {
            extension: self.extension.to_string(),
            reason: reason.into(),
        }
    }
}
