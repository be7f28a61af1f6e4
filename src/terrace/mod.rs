// Terraced marching squares: per-slice classification, interpolation and emission.
pub mod cases;
pub mod cell_context;
pub mod interpolate;
pub mod primitives;
pub mod shape;
pub mod slices;
pub mod table;
pub mod types;
pub mod validator;

pub use cases::*;
pub use cell_context::*;
pub use interpolate::*;
pub use shape::*;
pub use slices::*;
pub use table::*;
pub use types::*;
