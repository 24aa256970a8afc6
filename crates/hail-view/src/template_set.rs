//! A directory of templates described by `template.toml`, rendered as a unit.

use std::collections::HashMap;
use std::path::Path;

use tera::Context;

use crate::catalog::ExtensionCatalog;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::metadata::{MetadataError, TemplateMetadata};

/// Engine plus metadata for one template directory.
#[derive(Debug)]
pub struct TemplateSet {
    engine: Engine,
    metadata: TemplateMetadata,
}

/// A rendered output file ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Path relative to the output directory.
    pub path: String,
    pub content: String,
}

impl TemplateSet {
    /// Load metadata and templates from `template_dir`, attaching the extensions it lists.
    pub fn load(
        template_dir: &Path,
        catalog: &ExtensionCatalog,
        config: &EngineConfig,
    ) -> Result<Self, TemplateSetError> {
        let metadata = TemplateMetadata::load(template_dir)?;

        let mut engine = Engine::with_config(config.clone());
        engine.attach_named(catalog, &metadata.extensions)?;
        engine.add_templates_from_dir(template_dir)?;

        tracing::debug!(
            name = %metadata.name,
            dir = ?template_dir,
            outputs = metadata.outputs.len(),
            "Loaded template set"
        );
        Ok(Self { engine, metadata })
    }

    pub fn metadata(&self) -> &TemplateMetadata {
        &self.metadata
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Render every output, filling in defaults for omitted parameters.
    pub fn render(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<Vec<RenderedFile>, TemplateSetError> {
        let context = self.context(params);

        let mut rendered = Vec::with_capacity(self.metadata.outputs.len());
        for output in &self.metadata.outputs {
            let content = self.engine.render(&output.template, &context)?;
            let filename = self.engine.render_str(&output.filename, &context)?;
            let path = match &output.subdir {
                Some(subdir) => {
                    let subdir = self.engine.render_str(subdir, &context)?;
                    format!("{subdir}/{filename}")
                }
                None => filename,
            };
            rendered.push(RenderedFile { path, content });
        }

        Ok(rendered)
    }

    fn context(&self, params: &HashMap<String, String>) -> Context {
        let mut context = Context::new();
        for (key, value) in params {
            context.insert(key, value);
        }
        for p in &self.metadata.parameters {
            if !params.contains_key(&p.name) {
                if let Some(default) = &p.default {
                    context.insert(&p.name, default);
                }
            }
        }
        context
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateSetError {
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup_template_dir(extensions: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();

        let metadata = format!(
            r#"
name = "controller"
description = "Generate a controller and its view"
extensions = {extensions}

[[parameters]]
name = "name"
description = "Controller name"
required = true

[[parameters]]
name = "layout"
description = "Layout to extend"
default = "main"

[[outputs]]
template = "controller.php.tera"
filename = "{{{{ name | pascal_case }}}}Controller.php"

[[outputs]]
template = "view.html.tera"
filename = "index.html"
subdir = "views/{{{{ name | kebab_case }}}}"
"#
        );
        fs::write(dir.path().join("template.toml"), metadata).unwrap();

        fs::write(
            dir.path().join("controller.php.tera"),
            r#"<?php

class {{ name | pascal_case }}Controller
{
    protected $layout = '{{ layout }}';
}
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("view.html.tera"),
            "<h1>{{ name | upper }}</h1>\n",
        )
        .unwrap();

        dir
    }

    fn load(dir: &Path) -> Result<TemplateSet, TemplateSetError> {
        TemplateSet::load(dir, &ExtensionCatalog::builtin(), &EngineConfig::default())
    }

    #[test]
    fn test_load_attaches_extensions() {
        let dir = setup_template_dir(r#"["case", "strings"]"#);
        let set = load(dir.path()).unwrap();
        assert_eq!(set.metadata().name, "controller");
        assert!(set.engine().has_extension("case"));
        assert!(set.engine().has_capability("upper"));
    }

    #[test]
    fn test_render_outputs() {
        let dir = setup_template_dir(r#"["case", "strings"]"#);
        let set = load(dir.path()).unwrap();

        let mut params = HashMap::new();
        params.insert("name".to_string(), "blog_post".to_string());
        let rendered = set.render(&params).unwrap();

        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].path, "BlogPostController.php");
        assert!(rendered[0].content.contains("class BlogPostController"));
        assert!(rendered[0].content.contains("$layout = 'main'"));
        assert_eq!(rendered[1].path, "views/blog-post/index.html");
        assert_eq!(rendered[1].content, "<h1>BLOG_POST</h1>\n");
    }

    #[test]
    fn test_explicit_param_beats_default() {
        let dir = setup_template_dir(r#"["case", "strings"]"#);
        let set = load(dir.path()).unwrap();

        let mut params = HashMap::new();
        params.insert("name".to_string(), "Blog".to_string());
        params.insert("layout".to_string(), "admin".to_string());
        let rendered = set.render(&params).unwrap();
        assert!(rendered[0].content.contains("$layout = 'admin'"));
    }

    #[test]
    fn test_missing_extension_surfaces_at_render() {
        let dir = setup_template_dir(r#"["strings"]"#);
        let set = load(dir.path()).unwrap();

        let mut params = HashMap::new();
        params.insert("name".to_string(), "Blog".to_string());
        let err = set.render(&params).unwrap_err();
        assert!(matches!(
            err,
            TemplateSetError::Engine(EngineError::UnknownCapability { ref name, .. })
                if name == "pascal_case"
        ));
    }

    #[test]
    fn test_unknown_extension_fails_load() {
        let dir = setup_template_dir(r#"["markdown"]"#);
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            TemplateSetError::Engine(EngineError::UnknownExtension { .. })
        ));
    }

    #[test]
    fn test_missing_template_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("template.toml"),
            r#"
name = "broken"
description = "Missing template file"
[[outputs]]
template = "nonexistent.tera"
filename = "out.txt"
"#,
        )
        .unwrap();

        let set = load(dir.path()).unwrap();
        assert!(matches!(
            set.render(&HashMap::new()),
            Err(TemplateSetError::Engine(EngineError::TemplateNotFound { .. }))
        ));
    }
}
