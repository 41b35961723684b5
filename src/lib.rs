pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod page;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::HttpDirectoryApi, storage::LocalStorage};
pub use config::toml_config::TomlConfig;
pub use core::directory::{Directory, DispatchOutcome, RefreshSummary, SelectionSummary};
pub use page::{Document, Event, EventKind, Listener, NodeId};
pub use utils::error::{DirectoryError, Result};
