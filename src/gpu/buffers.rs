use wgpu::util::DeviceExt;
use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::config::{BOX_HALF_HEIGHT, TICK_SPACING_M, Z_LIMIT_MM};
use crate::simulation::PondGrid;

/// Static grid position, normalised to [-1, 1] on both axes
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GridVertex {
    pub xy: [f32; 2],
}

/// Per-vertex data rewritten on every time change (16 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceSample {
    pub height_mm: f32,
    /// Linear-light RGB
    pub color: [f32; 3],
}

/// Axis frame line vertex in world space
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Uniforms shared by both pipelines (96 bytes, aligned to 16)
/// Note: the WGSL struct ends at mm_to_world; the trailing padding is implicit there
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = direction towards the light, w unused
    pub light_dir: [f32; 4],
    pub mm_to_world: f32,
    pub _padding: [f32; 3],
}

/// World units per millimetre of surface height
pub fn mm_to_world() -> f32 {
    BOX_HALF_HEIGHT / Z_LIMIT_MM
}

/// Map normalised plot coordinates and a height in mm to world space (y up)
pub fn to_world(x: f32, y: f32, z_mm: f32) -> [f32; 3] {
    [x, z_mm * mm_to_world(), -y]
}

/// Normalised positions of the grid samples, in field iteration order
pub fn grid_vertices(grid: &PondGrid) -> Vec<GridVertex> {
    let radius = grid.radius;
    grid.xx
        .iter()
        .zip(grid.yy.iter())
        .map(|(&x, &y)| GridVertex {
            xy: [(x / radius) as f32, (y / radius) as f32],
        })
        .collect()
}

/// Two triangles per grid cell over an `n` x `n` row-major vertex array
pub fn grid_indices(n: usize) -> Vec<u32> {
    if n < 2 {
        return Vec::new();
    }
    let mut indices = Vec::with_capacity((n - 1) * (n - 1) * 6);
    for j in 0..n - 1 {
        for i in 0..n - 1 {
            let a = (j * n + i) as u32;
            let b = (j * n + i + 1) as u32;
            let c = ((j + 1) * n + i) as u32;
            let d = ((j + 1) * n + i + 1) as u32;
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    indices
}

/// Normalised tick positions along the x/y axes
pub fn tick_positions(radius: f64) -> Vec<f32> {
    let count = (radius / TICK_SPACING_M).floor() as i32;
    (-count..=count)
        .map(|k| (k as f64 * TICK_SPACING_M / radius) as f32)
        .collect()
}

/// Floor grid at the lower z limit plus the four vertical box edges
pub fn frame_vertices(radius: f64) -> Vec<FrameVertex> {
    let grid_color = [0.25, 0.25, 0.28];
    let edge_color = [0.45, 0.45, 0.5];
    let mut lines = Vec::new();
    let mut push = |a: [f32; 3], b: [f32; 3], color: [f32; 3]| {
        lines.push(FrameVertex { position: a, color });
        lines.push(FrameVertex { position: b, color });
    };

    let floor = -Z_LIMIT_MM;
    for t in tick_positions(radius) {
        push(to_world(-1.0, t, floor), to_world(1.0, t, floor), grid_color);
        push(to_world(t, -1.0, floor), to_world(t, 1.0, floor), grid_color);
    }
    for (x, y) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        push(to_world(x, y, -Z_LIMIT_MM), to_world(x, y, Z_LIMIT_MM), edge_color);
    }
    lines
}

/// GPU-side buffers for the pond surface and its axis frame
pub struct SurfaceBuffers {
    /// Static normalised xy per grid sample
    pub grid_buffer: Buffer,
    /// Height and colour per grid sample, rewritten on time change
    pub sample_buffer: Buffer,
    pub index_buffer: Buffer,
    pub index_count: u32,
    pub frame_buffer: Buffer,
    pub frame_vertex_count: u32,
    /// Uniform buffer for camera and lighting
    pub globals_buffer: Buffer,
    vertex_count: usize,
}

impl SurfaceBuffers {
    /// Create buffers for the given grid; samples start flat
    pub fn new(device: &Device, grid: &PondGrid) -> Self {
        let vertices = grid_vertices(grid);
        let indices = grid_indices(grid.points());
        let frame = frame_vertices(grid.radius);

        let grid_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid-vertex-buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::VERTEX,
        });

        let sample_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("surface-sample-buffer"),
            size: (vertices.len() * std::mem::size_of::<SurfaceSample>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid-index-buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: BufferUsages::INDEX,
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame-vertex-buffer"),
            contents: bytemuck::cast_slice(&frame),
            usage: BufferUsages::VERTEX,
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals-buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            grid_buffer,
            sample_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            frame_buffer,
            frame_vertex_count: frame.len() as u32,
            globals_buffer,
            vertex_count: vertices.len(),
        }
    }

    /// Upload a full set of surface samples
    pub fn upload_samples(&self, queue: &Queue, samples: &[SurfaceSample]) {
        if samples.len() != self.vertex_count {
            log::error!(
                "Sample count mismatch: got {}, expected {}",
                samples.len(),
                self.vertex_count
            );
            return;
        }
        queue.write_buffer(&self.sample_buffer, 0, bytemuck::cast_slice(samples));
    }

    /// Update camera and lighting uniforms
    pub fn update_globals(&self, queue: &Queue, view_proj: [[f32; 4]; 4], light_dir: [f32; 3]) {
        let globals = Globals {
            view_proj,
            light_dir: [light_dir[0], light_dir[1], light_dir[2], 0.0],
            mm_to_world: mm_to_world(),
            _padding: [0.0, 0.0, 0.0],
        };
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
    }
}
