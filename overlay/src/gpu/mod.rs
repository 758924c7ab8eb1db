use tracing::info;
use wgpu::util::DeviceExt;

use crate::batch::{OverlayVertex, QuadBatch};
use crate::channel::ShaderUniforms;
use crate::surface::{FrameGeometry, MAP_BACKGROUND, OverlaySurface};

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ScreenUniform {
    resolution: [f32; 2],
    _pad: [f32; 2],
}

/// Vertex or index buffer that grows to the next power of two.
struct GrowableBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
    usage: wgpu::BufferUsages,
    label: &'static str,
}

impl GrowableBuffer {
    fn new(device: &wgpu::Device, label: &'static str, usage: wgpu::BufferUsages) -> Self {
        let capacity = 4096;
        Self {
            buffer: create_buffer(device, label, capacity, usage),
            capacity,
            usage,
            label,
        }
    }

    /// Write `bytes` at offset 0, reallocating first if they do not fit.
    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let needed = bytes.len() as u64;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.buffer = create_buffer(device, self.label, self.capacity, self.usage);
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }
}

fn create_buffer(
    device: &wgpu::Device,
    label: &'static str,
    size: u64,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// One uploaded quad batch: vertices, indices, index count.
struct MeshBuffers {
    vertices: GrowableBuffer,
    indices: GrowableBuffer,
    index_count: u32,
}

impl MeshBuffers {
    fn new(device: &wgpu::Device, vertex_label: &'static str, index_label: &'static str) -> Self {
        Self {
            vertices: GrowableBuffer::new(device, vertex_label, wgpu::BufferUsages::VERTEX),
            indices: GrowableBuffer::new(device, index_label, wgpu::BufferUsages::INDEX),
            index_count: 0,
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, batch: &QuadBatch) {
        self.vertices
            .upload(device, queue, bytemuck::cast_slice(&batch.vertices));
        self.indices
            .upload(device, queue, bytemuck::cast_slice(&batch.indices));
        self.index_count = batch.indices.len() as u32;
    }
}

/// wgpu implementation of [`OverlaySurface`], rendering into an offscreen
/// `Rgba8Unorm` target owned by this struct. The owner composites or reads
/// back [`GpuOverlay::target`].
pub struct GpuOverlay {
    device: wgpu::Device,
    queue: wgpu::Queue,

    target: wgpu::Texture,
    target_view: wgpu::TextureView,
    width: u32,
    height: u32,

    effects_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    white_bind_group: wgpu::BindGroup,

    territory_pipeline: wgpu::RenderPipeline,
    route_pipeline: wgpu::RenderPipeline,
    territories: MeshBuffers,
    routes: MeshBuffers,

    // Revision of the geometry currently in the GPU buffers.
    uploaded_revision: Option<u64>,
}

impl GpuOverlay {
    /// Create a device with no presentation surface and build on it.
    pub async fn headless(width: u32, height: u32) -> Result<Self, String> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                ..Default::default()
            })
            .await
            .ok_or_else(|| "wgpu init: no suitable GPU adapter found".to_string())?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("overlay-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| format!("wgpu init request_device: {e}"))?;

        info!("wgpu overlay: adapter={:?}", adapter.get_info().name);
        Ok(Self::new(device, queue, width, height))
    }

    pub fn new(device: wgpu::Device, queue: wgpu::Queue, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let (target, target_view) = create_target(&device, width, height);

        // --- Uniforms ---
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("overlay-uniform-bgl"),
                entries: &[
                    uniform_entry(0, wgpu::ShaderStages::VERTEX),
                    uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
                ],
            });

        let screen_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("overlay-screen-ubo"),
            contents: bytemuck::cast_slice(&[screen_uniform(width, height)]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let effects_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("overlay-effects-ubo"),
            contents: bytemuck::cast_slice(&[ShaderUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("overlay-uniform-bg"),
            layout: &uniform_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: screen_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: effects_buffer.as_entire_binding(),
                },
            ],
        });

        // --- 1x1 white texel ---
        let white_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("overlay-white-bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let white_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("overlay-white-tex"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &white_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[255, 255, 255, 255],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        let white_view = white_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let white_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("overlay-white-sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });
        let white_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("overlay-white-bg"),
            layout: &white_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&white_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&white_sampler),
                },
            ],
        });

        // --- Pipelines ---
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("overlay-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("overlay.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("overlay-pl"),
            bind_group_layouts: &[&uniform_bind_group_layout, &white_bind_group_layout],
            push_constant_ranges: &[],
        });

        let territory_pipeline =
            create_pipeline(&device, &pipeline_layout, &shader, "fs_territory", "territory");
        let route_pipeline =
            create_pipeline(&device, &pipeline_layout, &shader, "fs_route", "route");

        let territories = MeshBuffers::new(&device, "territory-verts", "territory-indices");
        let routes = MeshBuffers::new(&device, "route-verts", "route-indices");

        Self {
            device,
            queue,
            target,
            target_view,
            width,
            height,
            effects_buffer,
            uniform_bind_group,
            white_bind_group,
            territory_pipeline,
            route_pipeline,
            territories,
            routes,
            uploaded_revision: None,
        }
    }

    pub fn target(&self) -> &wgpu::Texture {
        &self.target
    }

    fn upload_geometry(&mut self, frame: &FrameGeometry) {
        if self.uploaded_revision == Some(frame.revision) {
            return;
        }
        self.territories
            .upload(&self.device, &self.queue, &frame.territories);
        self.routes
            .upload(&self.device, &self.queue, &frame.routes.tessellate());
        self.uploaded_revision = Some(frame.revision);
    }
}

impl OverlaySurface for GpuOverlay {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw(&mut self, frame: &FrameGeometry, uniforms: &ShaderUniforms) -> u32 {
        self.upload_geometry(frame);
        self.queue
            .write_buffer(&self.effects_buffer, 0, bytemuck::cast_slice(&[*uniforms]));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay-encoder"),
            });

        let mut calls = 0;
        {
            let [r, g, b, a] = MAP_BACKGROUND.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_bind_group(1, &self.white_bind_group, &[]);

            for (pipeline, mesh) in [
                (&self.territory_pipeline, &self.territories),
                (&self.route_pipeline, &self.routes),
            ] {
                if mesh.index_count == 0 {
                    continue;
                }
                pass.set_pipeline(pipeline);
                pass.set_vertex_buffer(0, mesh.vertices.buffer.slice(..));
                pass.set_index_buffer(mesh.indices.buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                calls += 1;
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        calls
    }
}

fn create_target(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("overlay-target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn screen_uniform(width: u32, height: u32) -> ScreenUniform {
    ScreenUniform {
        resolution: [width as f32, height as f32],
        _pad: [0.0, 0.0],
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &'static str,
    label: &'static str,
) -> wgpu::RenderPipeline {
    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<OverlayVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2, // position
            },
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2, // uv
            },
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4, // color
            },
        ],
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: TARGET_FORMAT,
                // Straight alpha over the map; destination alpha is kept.
                blend: Some(wgpu::BlendState {
                    color: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::SrcAlpha,
                        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                        operation: wgpu::BlendOperation::Add,
                    },
                    alpha: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::Zero,
                        dst_factor: wgpu::BlendFactor::One,
                        operation: wgpu::BlendOperation::Add,
                    },
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
