// Error types shared by the foraging engine and the run driver.

use thiserror::Error;

/// Conditions that abort a creature's turn or a whole run.
///
/// Everything else (no visible food, nothing claimable, no competitors) is a
/// normal outcome and never surfaces as an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForageError {
    /// A time-to-food computation hit a creature with speed <= 0.
    #[error("creature #{id} has non-positive speed {speed}")]
    NonPositiveSpeed { id: u32, speed: i32 },

    /// Every perimeter cell is occupied, so nothing can be placed on the border.
    #[error("no free perimeter cell on a {width}x{height} grid")]
    PerimeterFull { width: i32, height: i32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ForageError>;
