//! Typed errors for the core crate.

use thiserror::Error;

/// A record-type definition that cannot be turned into a descriptor.
///
/// Fatal to the descriptor: the definition has to be fixed at its source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("search record type requires attribute `{0}`")]
    MissingAttribute(&'static str),
    #[error("search record type `{0}` has a zero GUID multiplier")]
    ZeroMultiplier(String),
}

/// Conflicts detected while registering descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("record type `{0}` is already registered")]
    DuplicateKey(String),
    /// Some GUID would decode to a non-negative record ID under both types.
    #[error("record types `{existing}` and `{incoming}` have overlapping GUID encodings (both decode GUID {guid})")]
    OverlappingEncoding {
        existing: String,
        incoming: String,
        guid: i128,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("invalid color `{0}`")]
    InvalidColor(String),
    #[error("lightness adjustment must be between 0 and 100 inclusive, got {0}")]
    PercentageOutOfRange(f64),
}
