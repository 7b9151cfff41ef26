//! Error types for setup and configuration.
//!
//! Per-frame operations never fail; everything here surfaces before the first tick.

use thiserror::Error;

/// Failures of the two-region arena allocator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// The backing region could not be acquired.
    #[error("failed to provision {region} region of {bytes} bytes")]
    Provision {
        /// Region label.
        region: &'static str,
        /// Requested size.
        bytes: usize,
    },

    /// A carve request does not fit in what is left of the region.
    #[error("{region} region out of space: requested {requested} bytes, {remaining} remaining")]
    OutOfSpace {
        /// Region label.
        region: &'static str,
        /// Bytes the request needs (including alignment padding).
        requested: usize,
        /// Bytes left before the request.
        remaining: usize,
    },

    /// The record type needs a stricter alignment than the region guarantees.
    #[error("alignment {align} exceeds region alignment {max}")]
    Alignment {
        /// Alignment of the requested type.
        align: usize,
        /// Alignment of the region base.
        max: usize,
    },
}

/// Errors that can occur while building a simulation.
#[derive(Error, Debug)]
pub enum SimError {
    /// Memory region setup or carving failed.
    #[error(transparent)]
    Arena(#[from] ArenaError),

    /// Enemy kind tag outside the supported kinds.
    #[error("invalid enemy kind tag: {0}")]
    InvalidEnemyKind(u32),

    /// Enemy slot index past the end of the wave's enemy array.
    #[error("enemy index {index} out of range for wave of {count}")]
    EnemyIndex {
        /// Requested slot.
        index: usize,
        /// Enemies in the wave.
        count: usize,
    },

    /// Configuration file could not be read.
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
