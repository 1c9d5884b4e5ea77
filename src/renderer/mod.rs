//! WebGPU rendering module
//!
//! The simulation hands over a `Scene`; `scene` tessellates it into flat
//! colored triangles and `pipeline` draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_vertices;
pub use vertex::Vertex;
