//! Turn recorded HTTP archives (.har) into mock request handlers.
//!
//! ```no_run
//! use harmock_core::{set_request_handlers_by_webarchive, Archive, InMemoryServer, ProviderOptions};
//!
//! let archive = Archive::from_path("session.har".as_ref())?;
//! let server = InMemoryServer::new();
//! let registered = set_request_handlers_by_webarchive(&server, &archive, &ProviderOptions::default());
//! println!("{registered} routes");
//! # Ok::<(), harmock_core::har::ArchiveError>(())
//! ```

pub mod config;
pub mod cookie;
pub mod diagnostics;
pub mod har;
pub mod logging;
pub mod mapper;
pub mod mock;
pub mod options;
pub mod provider;
pub mod serve;

pub use har::Archive;
pub use mapper::create_request_handler;
pub use mock::InMemoryServer;
pub use options::ProviderOptions;
pub use provider::set_request_handlers_by_webarchive;
