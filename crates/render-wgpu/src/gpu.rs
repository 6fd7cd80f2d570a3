use crate::error::RenderError;
use crate::geometry::{MeshVertex, jellyfish_mesh};
use crate::shaders;
use crate::texture::GpuTexture;
use crate::uniforms::{
    CameraUniform, LightsUniform, MaterialUniform, PostUniform, SpriteInstance, SpriteUniform,
};
use bytemuck::Pod;
use jellyscape_assets::{BUBBLES_TEXTURE, PARTICLES_TEXTURE, TextureStore};
use jellyscape_kernel::{Particle, RenderTarget, Scene};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertices emitted per sprite instance.
const SPRITE_VERTICES: u32 = 6;

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Layout shared by sprite materials and the post pass:
/// uniform, 2D texture, filtering sampler.
fn textured_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            uniform_entry(0),
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

fn textured_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    uniform: &wgpu::Buffer,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn uniform_buffer<T: Pod>(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(value),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// How a pipeline writes into the offscreen target.
struct PipelineDesc<'a> {
    label: &'a str,
    source: String,
    layout: &'a wgpu::PipelineLayout,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
    depth_write: Option<bool>,
}

fn create_pipeline(device: &wgpu::Device, desc: PipelineDesc<'_>) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(desc.label),
        source: wgpu::ShaderSource::Wgsl(desc.source.into()),
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: desc.buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: Some(desc.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            // Bell interior and ribbons are seen from both sides.
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: desc.depth_write.map(|write| wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: write,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// One instanced draw of camera-facing sprites.
struct SpriteBatch {
    pipeline: wgpu::RenderPipeline,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instances: wgpu::Buffer,
    count: u32,
}

impl SpriteBatch {
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.instances.slice(..));
        pass.draw(0..SPRITE_VERTICES, 0..self.count);
    }
}

/// Everything sized to the render target. Rebuilt on resize.
struct Offscreen {
    color: GpuTexture,
    depth: GpuTexture,
    post_bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

/// Draws a [`Scene`]: creature and sprites into an offscreen target, then
/// the post pass onto the surface view.
pub struct SceneRenderer {
    camera_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    creature_pipeline: wgpu::RenderPipeline,
    material_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    mesh_vertex_buffer: wgpu::Buffer,
    mesh_index_buffer: wgpu::Buffer,
    mesh_index_count: u32,

    motes: SpriteBatch,
    bubbles: SpriteBatch,

    post_pipeline: wgpu::RenderPipeline,
    post_layout: wgpu::BindGroupLayout,
    post_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    offscreen: Offscreen,
    format: wgpu::TextureFormat,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        scene: &Scene,
        textures: &TextureStore,
    ) -> Result<Self, RenderError> {
        let world = scene.world();

        // Frame bindings (group 0)
        let camera_buffer = uniform_buffer(
            device,
            "camera_uniform",
            &CameraUniform::from_camera(scene.camera()),
        );
        let lights_buffer = uniform_buffer(
            device,
            "lights_uniform",
            &LightsUniform::from(&world.lights),
        );
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        // Creature
        let material_buffer = uniform_buffer(
            device,
            "material_uniform",
            &MaterialUniform::from(&world.creature),
        );
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[uniform_entry(0)],
        });
        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bind_group"),
            layout: &material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: material_buffer.as_entire_binding(),
            }],
        });
        let creature_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("creature_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &material_layout],
            push_constant_ranges: &[],
        });
        let creature_pipeline = create_pipeline(
            device,
            PipelineDesc {
                label: "creature_pipeline",
                source: shaders::creature_shader()?,
                layout: &creature_layout,
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                }],
                format,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: Some(true),
            },
        );

        let creature = &world.creature;
        let mesh = jellyfish_mesh(
            creature.bell_radius,
            creature.tentacle_count,
            creature.tentacle_length,
        );
        let mesh_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertex_buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let mesh_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_index_buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let mesh_index_count = mesh.indices.len() as u32;

        // Sprites
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let sprite_layout = textured_layout(device, "sprite_bind_group_layout");
        let sprite_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("sprite_pipeline_layout"),
                bind_group_layouts: &[&frame_layout, &sprite_layout],
                push_constant_ranges: &[],
            });
        let instance_layout = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x3,
                1 => Float32,
                2 => Float32,
                3 => Float32,
            ],
        }];

        let sprite_batch = |label: &str,
                            source: String,
                            uniform: SpriteUniform,
                            texture: &GpuTexture,
                            particles: &[Particle]|
         -> SpriteBatch {
            let pipeline = create_pipeline(
                device,
                PipelineDesc {
                    label,
                    source,
                    layout: &sprite_pipeline_layout,
                    buffers: &instance_layout,
                    format,
                    blend: ADDITIVE,
                    depth_write: Some(false),
                },
            );
            let uniform = uniform_buffer(device, label, &uniform);
            let bind_group = textured_bind_group(
                device,
                label,
                &sprite_layout,
                &uniform,
                &texture.view,
                &sampler,
            );
            let data: Vec<SpriteInstance> = particles.iter().map(SpriteInstance::from).collect();
            let instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&data),
                usage: wgpu::BufferUsages::VERTEX,
            });
            SpriteBatch {
                pipeline,
                uniform,
                bind_group,
                instances,
                count: data.len() as u32,
            }
        };

        let particles_tex = GpuTexture::from_image(device, queue, textures.get(PARTICLES_TEXTURE)?);
        let bubbles_tex = GpuTexture::from_image(device, queue, textures.get(BUBBLES_TEXTURE)?);
        let field = &world.particles;
        let motes = sprite_batch(
            "motes",
            shaders::mote_shader()?,
            SpriteUniform::motes(field),
            &particles_tex,
            &field.motes,
        );
        let bubbles = sprite_batch(
            "bubbles",
            shaders::bubble_shader()?,
            SpriteUniform::bubbles(field),
            &bubbles_tex,
            &field.bubbles,
        );

        // Post
        let post_buffer = uniform_buffer(device, "post_uniform", &PostUniform::from(scene.post()));
        let post_layout = textured_layout(device, "post_bind_group_layout");
        let post_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("post_pipeline_layout"),
            bind_group_layouts: &[&post_layout],
            push_constant_ranges: &[],
        });
        let post_pipeline = create_pipeline(
            device,
            PipelineDesc {
                label: "post_pipeline",
                source: shaders::post_shader()?,
                layout: &post_pipeline_layout,
                buffers: &[],
                format,
                blend: wgpu::BlendState::REPLACE,
                depth_write: None,
            },
        );

        let offscreen = Self::create_offscreen(
            device,
            format,
            scene.target(),
            &post_layout,
            &post_buffer,
            &sampler,
        );

        tracing::debug!(
            mesh_indices = mesh_index_count,
            motes = motes.count,
            bubbles = bubbles.count,
            ?format,
            "scene renderer created"
        );

        Ok(Self {
            camera_buffer,
            lights_buffer,
            frame_bind_group,
            creature_pipeline,
            material_buffer,
            material_bind_group,
            mesh_vertex_buffer,
            mesh_index_buffer,
            mesh_index_count,
            motes,
            bubbles,
            post_pipeline,
            post_layout,
            post_buffer,
            sampler,
            offscreen,
            format,
        })
    }

    /// Match the offscreen target to the scene's render target. No-op when
    /// the buffer size is unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, target: &RenderTarget) {
        if self.offscreen.size == (target.buffer_width, target.buffer_height) {
            return;
        }
        self.offscreen = Self::create_offscreen(
            device,
            self.format,
            target,
            &self.post_layout,
            &self.post_buffer,
            &self.sampler,
        );
    }

    /// Render one frame of `scene` into `view`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
    ) {
        let world = scene.world();
        let field = &world.particles;
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::from_camera(scene.camera())),
        );
        queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::bytes_of(&LightsUniform::from(&world.lights)),
        );
        queue.write_buffer(
            &self.material_buffer,
            0,
            bytemuck::bytes_of(&MaterialUniform::from(&world.creature)),
        );
        queue.write_buffer(
            &self.motes.uniform,
            0,
            bytemuck::bytes_of(&SpriteUniform::motes(field)),
        );
        queue.write_buffer(
            &self.bubbles.uniform,
            0,
            bytemuck::bytes_of(&SpriteUniform::bubbles(field)),
        );
        queue.write_buffer(
            &self.post_buffer,
            0,
            bytemuck::bytes_of(&PostUniform::from(scene.post())),
        );

        let [r, g, b, a] = scene.target().clear_color.map(f64::from);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.offscreen.color.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.offscreen.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            pass.set_pipeline(&self.creature_pipeline);
            pass.set_bind_group(1, &self.material_bind_group, &[]);
            pass.set_vertex_buffer(0, self.mesh_vertex_buffer.slice(..));
            pass.set_index_buffer(self.mesh_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..self.mesh_index_count, 0, 0..1);

            self.bubbles.draw(&mut pass);
            self.motes.draw(&mut pass);
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("post_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            pass.set_pipeline(&self.post_pipeline);
            pass.set_bind_group(0, &self.offscreen.post_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_offscreen(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        target: &RenderTarget,
        post_layout: &wgpu::BindGroupLayout,
        post_buffer: &wgpu::Buffer,
        sampler: &wgpu::Sampler,
    ) -> Offscreen {
        let (w, h) = (target.buffer_width, target.buffer_height);
        let color = GpuTexture::render_target(device, format, w, h);
        let depth = GpuTexture::depth(device, w, h);
        let post_bind_group = textured_bind_group(
            device,
            "post_bind_group",
            post_layout,
            post_buffer,
            &color.view,
            sampler,
        );
        tracing::debug!(width = w, height = h, "offscreen target created");
        Offscreen {
            color,
            depth,
            post_bind_group,
            size: (w, h),
        }
    }
}
