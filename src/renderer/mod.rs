//! WebGPU rendering module
//!
//! The scene is rebuilt from the game state every frame as plain colored
//! triangles in game pixels; the pipeline maps them to NDC on upload.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
