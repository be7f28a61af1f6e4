use thiserror::Error;

/// Errors raised while building terraced geometry or its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TerraceError {
    #[error("corner index {index} is out of range (expected 0..=3)")]
    CornerIndexOutOfRange { index: usize },
    #[error("a square needs 4 corners, got {found}")]
    NotEnoughCorners { found: usize },
    #[error("riser interval must be finite and > 0, got {0}")]
    InvalidRiserInterval(f32),
    #[error("height field must be at least 2x2 samples, got {width}x{depth}")]
    InvalidDimensions { width: usize, depth: usize },
    #[error("height field expects {expected} samples, got {found}")]
    HeightCountMismatch { expected: usize, found: usize },
    #[error("cell size must be finite and > 0, got {0}")]
    InvalidCellSize(f32),
    #[error("chunk must span at least one cell")]
    InvalidChunkSize,
    #[error("could not start a worker pool with {threads} threads")]
    WorkerPoolBuild { threads: usize },
    #[error("{missing} of {expected} chunks never came back from the workers")]
    MissingChunks { missing: usize, expected: usize },
    #[error("weld epsilon must be finite and > 0, got {0}")]
    InvalidWeldEpsilon(f32),
    #[error("height sample {index} is not finite ({value})")]
    NonFiniteHeight { index: usize, value: f32 },
    #[error("cell ({x}, {z}) is outside the {cells_x}x{cells_z} cell grid")]
    CellOutOfBounds {
        x: usize,
        z: usize,
        cells_x: usize,
        cells_z: usize,
    },
}

pub type TerraceResult<T> = Result<T, TerraceError>;
