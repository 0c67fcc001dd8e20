mod buffers;
mod camera;
mod context;
mod render;

pub use buffers::{tick_positions, to_world, SurfaceBuffers, SurfaceSample};
pub use camera::OrbitCamera;
pub use context::GpuContext;
pub use render::SurfaceRenderer;
