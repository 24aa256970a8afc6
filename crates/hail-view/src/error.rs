//! Error types for engine setup, extension registration, and rendering.

use std::path::PathBuf;

use crate::capability::CapabilityKind;
use crate::config::ConfigError;

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by [`Engine`](crate::Engine) operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An extension with this name is already attached and the engine rejects duplicates.
    #[error("extension '{name}' is already registered")]
    DuplicateExtension { name: String },

    /// A catalog lookup named an extension nobody provides.
    #[error("unknown extension '{name}'")]
    UnknownExtension { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Raised by an extension's registration hook, passed through unchanged.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A template referenced a capability that was never registered.
    #[error("template '{template}' uses unknown {kind} '{name}'")]
    UnknownCapability {
        kind: CapabilityKind,
        name: String,
        template: String,
    },

    #[error("template '{name}' not found")]
    TemplateNotFound { name: String },

    /// A template failed to parse or its inheritance chain is broken.
    #[error("failed to compile template '{template}': {source}")]
    Template {
        template: String,
        source: tera::Error,
    },

    #[error("render error for '{template}': {source}")]
    Render {
        template: String,
        source: tera::Error,
    },

    /// A serializable value could not be turned into a render context.
    #[error("invalid render context: {0}")]
    Context(tera::Error),

    #[error("failed to load templates from {dir}: {source}")]
    Load {
        dir: PathBuf,
        source: std::io::Error,
    },
}

impl EngineError {
    /// Whether this error stems from invalid engine setup rather than a template or extension.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateExtension { .. } | Self::UnknownExtension { .. } | Self::Config(_)
        )
    }
}

/// Errors an [`Extension`](crate::Extension) raises when it cannot finish registering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The extension builds on a capability that is not registered yet.
    #[error("extension '{extension}' requires capability '{capability}'")]
    MissingCapability {
        extension: String,
        capability: String,
    },

    /// The extension needs another extension attached first.
    #[error("extension '{extension}' requires extension '{dependency}'")]
    MissingDependency {
        extension: String,
        dependency: String,
    },

    #[error("extension '{extension}' failed to register: {reason}")]
    Failed { extension: String, reason: String },
}

/// Find the capability lookup that failed somewhere in a Tera error chain.
pub(crate) fn missing_capability(err: &tera::Error) -> Option<(CapabilityKind, String)> {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(tera_err) = e.downcast_ref::<tera::Error>() {
            match &tera_err.kind {
                tera::ErrorKind::FunctionNotFound(name) => {
                    return Some((CapabilityKind::Function, name.clone()))
                }
                tera::ErrorKind::FilterNotFound(name) => {
                    return Some((CapabilityKind::Filter, name.clone()))
                }
                tera::ErrorKind::TestNotFound(name) => {
                    return Some((CapabilityKind::Test, name.clone()))
                }
                _ => {}
            }
        }
        current = e.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_failure(source: &str) -> tera::Error {
        let mut tera = tera::Tera::default();
        tera.add_raw_template("page.html", source).unwrap();
        let mut ctx = tera::Context::new();
        ctx.insert("x", "y");
        tera.render("page.html", &ctx).unwrap_err()
    }

    #[test]
    fn test_missing_filter_in_render_chain() {
        let err = render_failure(r#"{{ "hi" | shout }}"#);
        assert_eq!(
            missing_capability(&err),
            Some((CapabilityKind::Filter, "shout".to_string()))
        );
    }

    #[test]
    fn test_missing_function_in_render_chain() {
        let err = render_failure("{{ greet() }}");
        assert_eq!(
            missing_capability(&err),
            Some((CapabilityKind::Function, "greet".to_string()))
        );
    }

    #[test]
    fn test_missing_test_in_render_chain() {
        let err = render_failure("{% if x is shiny %}y{% endif %}");
        assert_eq!(
            missing_capability(&err),
            Some((CapabilityKind::Test, "shiny".to_string()))
        );
    }

    #[test]
    fn test_missing_capability_unrelated() {
        let err = tera::Error::msg("Variable `name` not found");
        assert!(missing_capability(&err).is_none());
    }

    #[test]
    fn test_configuration_classification() {
        let dup = EngineError::DuplicateExtension {
            name: "case".to_string(),
        };
        assert!(dup.is_configuration());

        let reg = EngineError::from(RegistrationError::Failed {
            extension: "date".to_string(),
            reason: "clock unavailable".to_string(),
        });
        assert!(!reg.is_configuration());
    }

    #[test]
    fn test_registration_error_passes_through_unchanged() {
        let original = RegistrationError::MissingCapability {
            extension: "markdown".to_string(),
            capability: "escape".to_string(),
        };
        let wrapped = EngineError::from(original.clone());
        assert_eq!(wrapped.to_string(), original.to_string());
        match wrapped {
            EngineError::Registration(inner) => assert_eq!(inner, original),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
