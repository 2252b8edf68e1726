//! Store API version selection.
//!
//! The exporter pins an API version at startup, mirroring the store client
//! library's version handshake. A version outside the supported window is a
//! fatal configuration error, never a per-tick one.

use crate::error::{StoreError, StoreResult};

/// Lowest store API version this crate understands.
pub const MIN_API_VERSION: u32 = 510;

/// Highest store API version this crate understands.
pub const MAX_API_VERSION: u32 = 730;

/// API version assumed when none is configured.
pub const DEFAULT_API_VERSION: u32 = 620;

/// A validated store API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion(u32);

impl ApiVersion {
    /// Validate and select an API version.
    pub fn select(version: u32) -> StoreResult<Self> {
        if (MIN_API_VERSION..=MAX_API_VERSION).contains(&version) {
            Ok(Self(version))
        } else {
            Err(StoreError::UnsupportedApiVersion(version))
        }
    }

    /// The numeric version.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self(DEFAULT_API_VERSION)
    }
}
