//! # groupsync-directory
//!
//! Directory (LDAP) client and remote-group normalizer.
//!
//! One blocking-style call per invocation: connect with a bounded
//! timeout, bind with domain-qualified credentials, run a single group
//! search limited to the `cn` attribute, and return typed entries.
//! Failures are typed and never retried here; the caller decides what a
//! failed lookup means.
//!
//! ## Example
//!
//! ```ignore
//! use groupsync_directory::{DirectoryClient, DirectorySettings, normalize};
//!
//! let client = DirectoryClient::new(settings)?;
//! let entries = client.fetch_groups().await?;
//! let groups = normalize(&entries);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;

pub use client::{DirectoryClient, RawEntry};
pub use config::{DirectorySettings, RemoteGroupsConfig};
pub use error::DirectoryError;
pub use normalize::{normalize, RemoteGroup};
