pub mod debug_log;
pub mod error;
pub mod height_field;
pub mod mesh_builder;
pub mod mesh_extraction;
pub mod mesh_postprocess;
pub mod mesh_worker;
pub mod noise_field;
pub mod shared_params;
pub mod terrace;

pub use error::{TerraceError, TerraceResult};
pub use height_field::HeightField;
pub use mesh_builder::TerraceMesh;
pub use shared_params::TerraceParams;
pub use terrace::{build_tile, Square, TerraceShape};
