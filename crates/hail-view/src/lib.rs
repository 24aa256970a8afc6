//! # hail-view
//!
//! A view engine built on [Tera](https://keats.github.io/tera/) whose template
//! capabilities (functions, filters and tests) are contributed by
//! [`Extension`]s.
//!
//! An [`Engine`] starts empty. Attaching an extension runs its registration
//! hook, which adds named capabilities through a [`Registrar`]. Later
//! registrations under an existing name replace the earlier one. Templates
//! call capabilities by name at render time.
//!
//! ```ignore
//! use hail_view::{Context, Engine, ExtensionCatalog};
//!
//! let mut engine = Engine::new();
//! engine.attach_named(&ExtensionCatalog::builtin(), &["strings", "case"])?;
//! engine.add_template("greeting", "Hello {{ name | pascal_case }}!");
//!
//! let mut ctx = Context::new();
//! ctx.insert("name", "ada_lovelace");
//! assert_eq!(engine.render("greeting", &ctx)?, "Hello AdaLovelace!");
//! ```
//!
//! [`SharedEngine`] wraps an engine for use across threads, and
//! [`TemplateSet`] renders a directory of templates described by a
//! `template.toml` file.

mod capability;
mod catalog;
mod config;
mod engine;
mod error;
mod extension;
pub mod extensions;
mod loader;
mod metadata;
mod shared;
mod template_set;

pub use capability::{Capability, CapabilityKind, CapabilityRegistry};
pub use catalog::ExtensionCatalog;
pub use config::{expand_path, home_dir, ConfigError, DuplicateExtensions, EngineConfig};
pub use engine::Engine;
pub use error::{EngineError, EngineResult, RegistrationError};
pub use extension::{Extension, Registrar};
pub use metadata::{MetadataError, OutputFile, ParameterDef, TemplateMetadata};
pub use shared::SharedEngine;
pub use template_set::{RenderedFile, TemplateSet, TemplateSetError};

pub use tera::{Context, Value};
