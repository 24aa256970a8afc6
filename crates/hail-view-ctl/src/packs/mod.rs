//! Template pack discovery and registry.
//!
//! A pack is a directory with a `hail-pack.toml` manifest naming one or more
//! template sets. The registry scans the configured pack paths.

mod discovery;
mod manifest;
mod registry;

pub(crate) use manifest::PackManifest;
pub(crate) use registry::PackRegistry;
