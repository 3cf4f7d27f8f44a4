//! Configuration for the generation pipeline.
//!
//! Settings are layered: built-in defaults, then an optional JSON config file,
//! then environment overrides. The result is validated once, before any
//! network I/O, and passed by reference to every pipeline component.

mod builder;
mod constants;
mod defaults;
pub(crate) mod environment;
mod loader;
mod types;
mod validation;

pub use types::{
    Config, ContentEncoding, NoChangePolicy, OutputSettings, PublishSettings, SchemaMode,
    ServiceSettings,
};

#[cfg(test)]
pub(crate) use constants::{DEFAULT_ADDONS_ROOT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};

#[cfg(test)]
pub(crate) mod tests;
