//! Error types for Project Strata.

use thiserror::Error;

/// Top-level error type for Strata operations.
#[derive(Debug, Error)]
pub enum StrataError {
    /// Invalid world configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors detected before any world allocation.
///
/// These are fatal for the generation request and are never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Width or height is zero
    #[error("World dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// World too short to give every layer at least one row
    #[error("World height {height} is too small for {layers} layers")]
    TooShort {
        /// Requested height
        height: usize,
        /// Number of layers in the table
        layers: usize,
    },

    /// World has more tiles than a grid may hold
    #[error("World of {width}x{height} exceeds the limit of {max} tiles")]
    TooLarge {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Largest allowed tile count
        max: usize,
    },

    /// Tile size is zero
    #[error("Tile size must be positive")]
    ZeroTileSize,

    /// Layer table does not partition [0, 1]
    #[error("Invalid layer table: {0}")]
    InvalidLayers(String),

    /// Biome table is empty or does not cover a layer
    #[error("Invalid biome table: {0}")]
    InvalidBiomes(String),

    /// An ore rule has an out-of-range rarity or depth range
    #[error("Invalid ore rule for {tile}: {reason}")]
    InvalidOreRule {
        /// Ore tile name
        tile: String,
        /// What is wrong
        reason: String,
    },

    /// Cave walk parameters are inconsistent
    #[error("Invalid cave parameters: {0}")]
    InvalidCaves(String),

    /// Climate thresholds are not finite
    #[error("Invalid climate parameters: {0}")]
    InvalidClimate(String),

    /// A feature count is larger than the world
    #[error("{name} count {count} exceeds the world's {max} tiles")]
    TooMany {
        /// Which count
        name: &'static str,
        /// Requested count
        count: usize,
        /// World area in tiles
        max: usize,
    },
}

/// Result type alias for Strata operations.
pub type StrataResult<T> = Result<T, StrataError>;

/// Result type alias for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;
