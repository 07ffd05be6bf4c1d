//! CardDAV address book discovery and management for mail accounts.
//!
//! The host mail client supplies the heavy machinery — CardDAV discovery,
//! HTTP, directory persistence — behind the [`host::Discovery`] and
//! [`host::DirectoryStore`] traits. This crate matches what discovery finds
//! against the requesting account, shapes everything into uniform
//! [`BookRecord`]s, and drives create/rename/delete of the local mirror
//! directories.
//!
//! Soft failures (unknown token, half-initialized directory, wrong directory
//! kind) come back as `Ok` records carrying an `error` field; only exhausted
//! discovery retries and host-service failures are `Err`. Callers inspect the
//! record shape, not just the `Result`.

pub mod config;
pub mod core;
pub mod host;
pub mod resolver;

pub use crate::config::Config;
pub use crate::core::models::{
    BookRecord, ConnectionDetail, ListingDetail, RecordDetail, RecordKind,
};
pub use crate::host::{
    DirectoryHandle, DirectoryKind, DirectoryStore, Discovery, NewDirectory, RemoteBook,
};
pub use crate::resolver::Resolver;
