//! # CDR Server
//!
//! Call-detail-record ingestion server with a REST API.
//!
//! This crate wraps [`cdr_core`] with everything the codec leaves to its
//! callers:
//! - Splitting uploaded files into lines and collecting a per-line report
//! - Storing decoded records (in memory or as a JSON snapshot)
//! - Listing uploaded files and searching stored records over HTTP
//! - Command line tools to parse and encode files offline
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    cdr-server                           │
//! │  ┌─────────────┐              ┌──────────────────────┐  │
//! │  │ REST API    │              │ CLI (parse / encode) │  │
//! │  │ (axum)      │              │                      │  │
//! │  └──────┬──────┘              └──────────┬───────────┘  │
//! │         │                                │              │
//! │         ▼                                ▼              │
//! │  ┌─────────────────────────┐  ┌──────────────────────┐  │
//! │  │ SharedStorage           │  │ cdr_core             │  │
//! │  │ (Arc<RwLock<dyn ...>>)  │  │ decode / encode      │  │
//! │  └─────────────────────────┘  └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## REST API
//!
//! | Endpoint | Description |
//! |----------|-------------|
//! | `POST /api/cdr/upload` | Parse and store a file `{fileName, content}` |
//! | `GET /api/cdr/files` | List uploaded files |
//! | `GET /api/cdr/files/{id}` | Get one file with its record count |
//! | `GET /api/cdr/records` | Search stored records |
//!
//! ## Command-Line Interface
//!
//! See [`Cli`] for all available options. Key options:
//!
//! - `-p, --port` - HTTP server port (default: 3000)
//! - `-v` - Increase verbosity (use multiple times)
//! - `--storage json` - Persist records to a JSON snapshot
//! - `parse <FILE>` - Print the parse report of a file as JSON
//! - `encode <FILE>` - Encode a JSON array of records to wire lines

use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

pub mod config;
pub mod file;
pub mod storage;
pub mod web;

use config::{StorageConfig, StorageKind};
use storage::{create_shared_storage, SharedStorage, StorageError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Clone, Debug)]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    /// Port for webserver
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// Address for webserver
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: IpAddr,

    /// Where decoded records are kept
    #[arg(short, long, default_value_t, value_enum)]
    pub storage: StorageKind,

    /// Directory for the JSON storage snapshot (default: platform data dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the REST API (default)
    Serve,
    /// Decode a CDR file and print the parse report as JSON
    Parse {
        file: PathBuf,
    },
    /// Encode a JSON array of records into CDR lines on stdout
    Encode {
        file: PathBuf,
    },
}

/// Application state shared by all request handlers
#[derive(Clone)]
pub struct Session {
    pub args: Cli,
    pub storage: SharedStorage,
}

impl Session {
    pub fn new(args: Cli) -> Result<Self, StorageError> {
        let config = StorageConfig::from_cli(&args)?;
        let storage = create_shared_storage(&config)?;
        Ok(Session { args, storage })
    }

    /// Session over an existing storage (for tests and embedding)
    pub fn with_storage(args: Cli, storage: SharedStorage) -> Self {
        Session { args, storage }
    }

    pub fn args(&self) -> &Cli {
        &self.args
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Session {{ }}")
    }
}
