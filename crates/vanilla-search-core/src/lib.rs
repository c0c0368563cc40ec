//! # Vanilla Search Core
//!
//! Dependency-light logic shared by the `vsearch` CLI and HTTP API:
//! search record-type descriptors, GUID decoding, the record-type
//! registry, the document fetch hook, and the site header's state
//! machine, layout, and style variables.
//!
//! This crate contains no tokio, HTTP, or filesystem I/O.

pub mod documents;
pub mod error;
pub mod header;
pub mod record_type;
pub mod registry;

pub use error::{ConfigurationError, RegistryError, StyleError};
pub use record_type::{InfrastructureCapabilities, RecordType, RecordTypeSpec};
pub use registry::RecordTypeRegistry;
