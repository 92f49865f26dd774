//! Hestia Storage Library
//!
//! Media storage behind the [`Storage`] trait, with a hosted blob backend and a local
//! filesystem backend.
//!
//! # Storage key format
//!
//! Keys are `{folder}/{filename}`, e.g. `uploads/images/front.jpg`. Keys must not contain
//! `..` or a leading `/`. The blob backend appends a random suffix server-side and uses the
//! returned object URL as its key.

pub mod blob;
pub mod factory;
pub(crate) mod keys;
pub mod local;
pub mod traits;

pub use blob::BlobStorage;
pub use factory::create_storage;
pub use hestia_core::StorageBackend;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
