//! Tera-backed template engine with an extension-driven capability registry.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tera::{Context, Tera};

use crate::capability::{Capability, CapabilityRegistry};
use crate::catalog::ExtensionCatalog;
use crate::config::{DuplicateExtensions, EngineConfig};
use crate::error::{missing_capability, EngineError, EngineResult};
use crate::extension::{Extension, Registrar};
use crate::loader::read_template_dir;

const INLINE_TEMPLATE: &str = "__inline__";

/// Owns template sources and the capabilities templates may call.
///
/// Registration takes `&mut self`; rendering takes `&self`. Once setup is
/// finished an `Engine` can be shared by reference across threads and
/// rendered concurrently. The compiled Tera instance is built on first render
/// and discarded whenever a template or capability changes.
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    capabilities: CapabilityRegistry,
    extensions: BTreeSet<String>,
    sources: BTreeMap<String, String>,
    compiled: OnceCell<Tera>,
}

impl Engine {
    /// An empty engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty engine with the given configuration.
    ///
    /// Extensions and template directories named in the config are not
    /// applied; use [`Engine::from_config`] for that.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Build an engine and apply the config's extensions and template directories.
    pub fn from_config(config: EngineConfig, catalog: &ExtensionCatalog) -> EngineResult<Self> {
        let extensions = config.extensions.clone();
        let dirs = config.resolved_template_dirs();

        let mut engine = Self::with_config(config);
        engine.attach_named(catalog, &extensions)?;
        for dir in &dirs {
            engine.add_templates_from_dir(dir)?;
        }
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run an extension's registration hook against this engine.
    ///
    /// Capabilities the hook registers before failing are kept; a failed
    /// extension is not recorded as attached.
    pub fn register_extension<E: Extension + ?Sized>(&mut self, extension: &E) -> EngineResult<()> {
        let name = extension.name().to_string();
        if self.extensions.contains(&name) {
            match self.config.duplicate_extensions {
                DuplicateExtensions::Reject => {
                    return Err(EngineError::DuplicateExtension { name });
                }
                DuplicateExtensions::Allow => {
                    tracing::debug!(extension = %name, "Re-registering extension");
                }
            }
        }

        self.invalidate();
        let before = self.capabilities.len();
        let mut registrar = Registrar::new(&name, &mut self.capabilities, &self.extensions);
        let result = extension.register(&mut registrar);

        match result {
            Ok(()) => {
                tracing::debug!(
                    extension = %name,
                    added = self.capabilities.len().saturating_sub(before),
                    "Registered extension"
                );
                self.extensions.insert(name);
                Ok(())
            }
            Err(e) => {
                tracing::debug!(extension = %name, error = %e, "Extension registration failed");
                Err(EngineError::Registration(e))
            }
        }
    }

    /// Attach extensions by catalog name, in order.
    pub fn attach_named<S: AsRef<str>>(
        &mut self,
        catalog: &ExtensionCatalog,
        names: &[S],
    ) -> EngineResult<()> {
        for name in names {
            let extension = catalog.create(name.as_ref())?;
            self.register_extension(&extension)?;
        }
        Ok(())
    }

    /// Add or replace a named function.
    pub fn register_function<F: tera::Function + 'static>(&mut self, name: &str, function: F) {
        self.register_capability(name, Capability::function(function));
    }

    /// Add or replace a named filter.
    pub fn register_filter<F: tera::Filter + 'static>(&mut self, name: &str, filter: F) {
        self.register_capability(name, Capability::filter(filter));
    }

    /// Add or replace a named test.
    pub fn register_test<T: tera::Test + 'static>(&mut self, name: &str, test: T) {
        self.register_capability(name, Capability::test(test));
    }

    pub fn register_capability(&mut self, name: &str, capability: Capability) {
        self.invalidate();
        self.capabilities.insert(name, capability);
    }

    pub fn capability(&self, name: &str) -> Option<&Capability> {
        self.capabilities.get(name)
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.contains(name)
    }

    /// Registered capability names, sorted.
    pub fn capability_names(&self) -> Vec<&str> {
        self.capabilities.names().collect()
    }

    pub fn capability_count(&self) -> usize {
        self.capabilities.len()
    }

    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    /// Names of successfully attached extensions, sorted.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains(name)
    }

    /// Add or replace a template source. Syntax errors surface on [`check`](Self::check) or render.
    pub fn add_template(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.invalidate();
        self.sources.insert(name.into(), source.into());
    }

    /// Load every `*.tera` file in `dir`, named by file name.
    pub fn add_templates_from_dir(&mut self, dir: &Path) -> EngineResult<usize> {
        let templates = read_template_dir(dir)?;
        let count = templates.len();
        for (name, source) in templates {
            self.add_template(name, source);
        }
        Ok(count)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Compile every template now, reporting the first syntax or inheritance error.
    pub fn check(&self) -> EngineResult<()> {
        self.compiled().map(|_| ())
    }

    /// Render a named template.
    pub fn render(&self, name: &str, context: &Context) -> EngineResult<String> {
        if !self.has_template(name) {
            return Err(EngineError::TemplateNotFound {
                name: name.to_string(),
            });
        }
        let tera = self.compiled()?;
        tera.render(name, context).map_err(|e| render_error(name, e))
    }

    /// Render a named template with a context built from any serializable value.
    pub fn render_serialize<T: Serialize>(&self, name: &str, value: &T) -> EngineResult<String> {
        let context = Context::from_serialize(value).map_err(EngineError::Context)?;
        self.render(name, &context)
    }

    /// Render an inline template with access to every registered template and capability.
    pub fn render_str(&self, source: &str, context: &Context) -> EngineResult<String> {
        let mut inline = self.compiled()?.clone();
        inline
            .add_raw_template(INLINE_TEMPLATE, source)
            .map_err(|e| EngineError::Template {
                template: INLINE_TEMPLATE.to_string(),
                source: e,
            })?;
        inline
            .render(INLINE_TEMPLATE, context)
            .map_err(|e| render_error(INLINE_TEMPLATE, e))
    }

    fn compiled(&self) -> EngineResult<&Tera> {
        self.compiled.get_or_try_init(|| self.compile())
    }

    fn compile(&self) -> EngineResult<Tera> {
        let mut tera = Tera::default();
        if !self.config.autoescape {
            tera.autoescape_on(Vec::new());
        }
        tera.add_raw_templates(self.sources.iter().map(|(n, s)| (n.as_str(), s.as_str())))
            .map_err(|e| EngineError::Template {
                template: failing_template(&e).unwrap_or_else(|| "<templates>".to_string()),
                source: e,
            })?;
        self.capabilities.install(&mut tera);

        tracing::debug!(
            templates = self.sources.len(),
            capabilities = self.capabilities.len(),
            "Compiled template engine"
        );
        Ok(tera)
    }

    fn invalidate(&mut self) {
        self.compiled.take();
    }
}

fn render_error(template: &str, source: tera::Error) -> EngineError {
    match missing_capability(&source) {
        Some((kind, name)) => EngineError::UnknownCapability {
            kind,
            name,
            template: template.to_string(),
        },
        None => EngineError::Render {
            template: template.to_string(),
            source,
        },
    }
}

/// Tera reports parse failures as "Failed to parse '<name>'".
fn failing_template(err: &tera::Error) -> Option<String> {
    let message = err.to_string();
    let rest = message.split_once('\'')?.1;
    Some(rest.split_once('\'')?.0.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    use tera::Value;

    use crate::capability::CapabilityKind;
    use crate::error::RegistrationError;

    fn shout(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
        let s = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("shout filter expects a string"))?;
        Ok(Value::String(format!("{}!", s.to_uppercase())))
    }

    fn whisper(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
        let s = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("whisper filter expects a string"))?;
        Ok(Value::String(s.to_lowercase()))
    }

    #[derive(Debug)]
    struct Loud;

    impl Extension for Loud {
        fn name(&self) -> &str {
            "loud"
        }

        fn register(&self, registrar: &mut Registrar<'_>) -> Result<(), RegistrationError> {
            registrar.register_filter("shout", shout);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl Extension for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn register(&self, registrar: &mut Registrar<'_>) -> Result<(), RegistrationError> {
            registrar.register_filter("half_done", whisper);
            Err(registrar.failed("missing locale data"))
        }
    }

    #[test]
    fn test_render_with_registered_filter() {
        let mut engine = Engine::new();
        engine.register_filter("shout", shout);
        engine.add_template("hello.txt", "{{ name | shout }}");

        let mut ctx = Context::new();
        ctx.insert("name", "world");
        assert_eq!(engine.render("hello.txt", &ctx).unwrap(), "WORLD!");
    }

    #[test]
    fn test_registration_after_render_is_visible() {
        let mut engine = Engine::new();
        engine.add_template("t", r#"{{ "a" | shout }}"#);
        assert!(engine.render("t", &Context::new()).is_err());

        engine.register_filter("shout", shout);
        assert_eq!(engine.render("t", &Context::new()).unwrap(), "A!");
    }

    #[test]
    fn test_overwrite_is_silent_and_last_wins() {
        let mut engine = Engine::new();
        engine.register_filter("voice", shout);
        engine.register_filter("voice", whisper);
        engine.add_template("t", r#"{{ "Hey" | voice }}"#);

        assert_eq!(engine.capability_count(), 1);
        assert_eq!(engine.render("t", &Context::new()).unwrap(), "hey");
    }

    #[test]
    fn test_unknown_filter_is_reported() {
        let mut engine = Engine::new();
        engine.add_template("t", r#"{{ "a" | sparkle }}"#);

        match engine.render("t", &Context::new()) {
            Err(EngineError::UnknownCapability {
                kind,
                name,
                template,
            }) => {
                assert_eq!(kind, CapabilityKind::Filter);
                assert_eq!(name, "sparkle");
                assert_eq!(template, "t");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_function_is_reported() {
        let mut engine = Engine::new();
        engine.add_template("t", "{{ sparkle() }}");
        assert!(matches!(
            engine.render("t", &Context::new()),
            Err(EngineError::UnknownCapability {
                kind: CapabilityKind::Function,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_template() {
        let engine = Engine::new();
        assert!(matches!(
            engine.render("nope.html", &Context::new()),
            Err(EngineError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn test_syntax_error_surfaces_on_check() {
        let mut engine = Engine::new();
        engine.add_template("bad.html", "{{ unclosed ");
        match engine.check() {
            Err(EngineError::Template { template, .. }) => assert_eq!(template, "bad.html"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_extension_registration() {
        let mut engine = Engine::new();
        engine.register_extension(&Loud).unwrap();

        assert!(engine.has_extension("loud"));
        assert!(engine.has_capability("shout"));
        assert_eq!(engine.extensions().collect::<Vec<_>>(), vec!["loud"]);
    }

    #[test]
    fn test_duplicate_extension_rejected_by_default() {
        let mut engine = Engine::new();
        engine.register_extension(&Loud).unwrap();
        let err = engine.register_extension(&Loud).unwrap_err();

        assert!(matches!(err, EngineError::DuplicateExtension { ref name } if name == "loud"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_duplicate_extension_allowed_by_config() {
        let mut engine = Engine::with_config(EngineConfig {
            duplicate_extensions: DuplicateExtensions::Allow,
            ..EngineConfig::default()
        });
        engine.register_extension(&Loud).unwrap();
        engine.register_extension(&Loud).unwrap();
        assert_eq!(engine.capability_count(), 1);
    }

    #[test]
    fn test_failed_extension_keeps_partial_registrations() {
        let mut engine = Engine::new();
        engine.register_extension(&Loud).unwrap();

        let err = engine.register_extension(&Broken).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Registration(RegistrationError::Failed { .. })
        ));

        assert!(engine.has_capability("shout"));
        assert!(engine.has_capability("half_done"));
        assert!(!engine.has_extension("broken"));
    }

    #[test]
    fn test_render_str_sees_capabilities_and_templates() {
        let mut engine = Engine::new();
        engine.register_filter("shout", shout);
        engine.add_template("greeting.tera", "hello");

        let out = engine
            .render_str(
                r#"{% include "greeting.tera" %} {{ "x" | shout }}"#,
                &Context::new(),
            )
            .unwrap();
        assert_eq!(out, "hello X!");
    }

    #[test]
    fn test_render_serialize() {
        #[derive(Serialize)]
        struct Page {
            title: String,
        }

        let mut engine = Engine::new();
        engine.add_template("page.txt", "# {{ title }}");
        let out = engine
            .render_serialize(
                "page.txt",
                &Page {
                    title: "Index".to_string(),
                },
            )
            .unwrap();
        assert_eq!(out, "# Index");
    }

    #[test]
    fn test_autoescape_follows_config() {
        let mut ctx = Context::new();
        ctx.insert("body", "<b>");

        let mut escaped = Engine::new();
        escaped.add_template("page.html", "{{ body }}");
        assert_eq!(escaped.render("page.html", &ctx).unwrap(), "&lt;b&gt;");

        let mut raw = Engine::with_config(EngineConfig {
            autoescape: false,
            ..EngineConfig::default()
        });
        raw.add_template("page.html", "{{ body }}");
        assert_eq!(raw.render("page.html", &ctx).unwrap(), "<b>");
    }

    #[test]
    fn test_templates_from_dir_with_inheritance() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("base.html.tera"),
            "<main>{% block body %}{% endblock body %}</main>",
        )
        .unwrap();
        fs::write(
            dir.path().join("page.html.tera"),
            concat!(
                r#"{% extends "base.html.tera" %}"#,
                "{% block body %}{{ title | shout }}{% endblock body %}",
            ),
        )
        .unwrap();

        let mut engine = Engine::new();
        engine.register_filter("shout", shout);
        assert_eq!(engine.add_templates_from_dir(dir.path()).unwrap(), 2);

        let mut ctx = Context::new();
        ctx.insert("title", "home");
        assert_eq!(
            engine.render("page.html.tera", &ctx).unwrap(),
            "<main>HOME!</main>"
        );
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
