//! Error types for tile encoding, decoding, and coverage search.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TileError {
    /// A tile id contained a character outside its scheme's alphabet.
    #[error("Invalid {scheme} tile id {tile:?}: unexpected character {character:?}")]
    InvalidTileId {
        scheme: &'static str,
        tile: String,
        character: char,
    },

    #[error("Resolution {resolution} out of range [1, {max}]")]
    InvalidResolution { resolution: usize, max: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The geometry library could not evaluate an operation.
    #[error("Geometry operation failed: {0}")]
    Geometry(String),
}

pub type Result<T> = std::result::Result<T, TileError>;
