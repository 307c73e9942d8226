//! # querymix
//!
//! Host for [`querymix_engine`]: TOML configuration, the application error
//! type, and batch rendering for the `querymix` binary.

pub mod config;
pub mod error;
pub mod output;

pub use config::{AppConfig, OutputConfig, OutputFormat};
pub use error::{AppError, Result};
pub use querymix_engine::{EngineConfig, FetchReport, QueryEngine, SourceKind};
