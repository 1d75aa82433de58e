pub mod algo;
pub mod config;
pub mod error;
pub mod ops;
pub mod session;

#[cfg(feature = "fetch")]
pub mod fetch;

#[cfg(feature = "plugin")]
pub mod commands;

pub use error::{ArchiveError, Result};

#[cfg(feature = "plugin")]
use nu_plugin::{Plugin, PluginCommand};

#[cfg(feature = "plugin")]
pub struct ArchivePlugin;

#[cfg(feature = "plugin")]
impl Plugin for ArchivePlugin {
    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").into()
    }

    fn commands(&self) -> Vec<Box<dyn PluginCommand<Plugin = Self>>> {
        vec![
            Box::new(commands::Ingest),
            Box::new(commands::Filter),
            Box::new(commands::Facets),
            Box::new(commands::CaseId),
            Box::new(commands::Export),
        ]
    }
}
