use wgpu::{
    BindGroup, BindGroupLayout, Device, RenderPipeline as WgpuRenderPipeline, TextureFormat,
    TextureView,
};

use crate::gpu::buffers::{FrameVertex, GridVertex, SurfaceBuffers, SurfaceSample};
use crate::gpu::context::DEPTH_FORMAT;

/// Render pipelines for the pond surface and its axis frame
pub struct SurfaceRenderer {
    surface_pipeline: WgpuRenderPipeline,
    frame_pipeline: WgpuRenderPipeline,
    bind_group_layout: BindGroupLayout,
}

const GRID_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const SAMPLE_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![1 => Float32, 2 => Float32x3];
const FRAME_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

impl SurfaceRenderer {
    /// Create the pipelines for the given surface format
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("surface-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/surface.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals-bind-group-layout"),
            entries: &[
                // Camera and lighting (uniform)
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("surface-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let surface_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<GridVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &GRID_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<SurfaceSample>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &SAMPLE_ATTRIBUTES,
            },
        ];

        let frame_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FrameVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &FRAME_ATTRIBUTES,
        }];

        let surface_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            format,
            PipelineKind {
                label: "surface-pipeline",
                vs_entry: "vs_surface",
                fs_entry: "fs_surface",
                buffers: &surface_buffers,
                topology: wgpu::PrimitiveTopology::TriangleList,
            },
        );

        let frame_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            format,
            PipelineKind {
                label: "frame-pipeline",
                vs_entry: "vs_frame",
                fs_entry: "fs_frame",
                buffers: &frame_buffers,
                topology: wgpu::PrimitiveTopology::LineList,
            },
        );

        Self {
            surface_pipeline,
            frame_pipeline,
            bind_group_layout,
        }
    }

    /// Create a bind group for the globals uniform
    pub fn create_bind_group(&self, device: &Device, buffers: &SurfaceBuffers) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals-bind-group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffers.globals_buffer.as_entire_binding(),
            }],
        })
    }

    /// Clear the target and draw the frame and surface with depth testing
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &TextureView,
        depth_view: &TextureView,
        bind_group: &BindGroup,
        buffers: &SurfaceBuffers,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("surface-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.02, // Near black
                        g: 0.02,
                        b: 0.03,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_bind_group(0, bind_group, &[]);

        pass.set_pipeline(&self.frame_pipeline);
        pass.set_vertex_buffer(0, buffers.frame_buffer.slice(..));
        pass.draw(0..buffers.frame_vertex_count, 0..1);

        pass.set_pipeline(&self.surface_pipeline);
        pass.set_vertex_buffer(0, buffers.grid_buffer.slice(..));
        pass.set_vertex_buffer(1, buffers.sample_buffer.slice(..));
        pass.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..buffers.index_count, 0, 0..1);
    }
}

struct PipelineKind<'a> {
    label: &'a str,
    vs_entry: &'a str,
    fs_entry: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
}

fn create_pipeline(
    device: &Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: TextureFormat,
    kind: PipelineKind<'_>,
) -> WgpuRenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(kind.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(kind.vs_entry),
            buffers: kind.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(kind.fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: kind.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
