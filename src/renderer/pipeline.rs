//! WebGPU render pipeline setup

use super::vertex::Vertex;

/// Vertices the scene buffer holds before it first has to grow
const INITIAL_VERTEX_CAPACITY: usize = 4096;

/// Map playfield pixels (origin top-left, y down) to NDC
pub fn playfield_to_ndc(x: f32, y: f32, logical_size: (f32, f32)) -> (f32, f32) {
    let (w, h) = logical_size;
    (x / w * 2.0 - 1.0, 1.0 - y / h * 2.0)
}

/// Project a playfield-space vertex list for upload
pub fn project_vertices(vertices: &[Vertex], logical_size: (f32, f32)) -> Vec<Vertex> {
    vertices
        .iter()
        .map(|v| {
            let (x, y) = playfield_to_ndc(v.position[0], v.position[1], logical_size);
            Vertex::new(x, y, v.color)
        })
        .collect()
}

/// Buffer capacity (in vertices) needed for `count`, doubling from `current`
fn grown_capacity(current: usize, count: usize) -> usize {
    let mut capacity = current.max(1);
    while capacity < count {
        capacity *= 2;
    }
    capacity
}

fn scene_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("bounce-scene-vertices"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn scene_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("bounce-scene-shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("bounce-scene-layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("bounce-scene-pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Shape builders don't keep a consistent winding
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    /// Vertices `vertex_buffer` can hold
    pub vertex_capacity: usize,
    pub vertex_count: u32,
    /// Surface size in device pixels
    pub size: (u32, u32),
    /// Playfield size the scene is expressed in
    pub logical_size: (f32, f32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        logical_size: (f32, f32),
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("infinity-bounce-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        // Colours are authored in sRGB, so prefer an sRGB target
        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = scene_pipeline(&device, format);
        let vertex_buffer = scene_buffer(&device, INITIAL_VERTEX_CAPACITY);
        log::info!(
            "Renderer ready: {:?} surface at {}x{}",
            format,
            config.width,
            config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            vertex_count: 0,
            size: (width, height),
            logical_size,
        })
    }

    /// Reconfigure the surface for a new canvas and playfield size
    pub fn resize(&mut self, new_width: u32, new_height: u32, logical_size: (f32, f32)) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
        if logical_size.0 > 0.0 && logical_size.1 > 0.0 {
            self.logical_size = logical_size;
        }
    }

    /// Reconfigure after the surface was lost or went stale
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn upload(&mut self, vertices: &[Vertex]) {
        let projected = project_vertices(vertices, self.logical_size);
        if projected.len() > self.vertex_capacity {
            self.vertex_capacity = grown_capacity(self.vertex_capacity, projected.len());
            self.vertex_buffer = scene_buffer(&self.device, self.vertex_capacity);
            log::debug!("Scene buffer grown to {} vertices", self.vertex_capacity);
        }
        if !projected.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&projected));
        }
        self.vertex_count = projected.len() as u32;
    }

    /// Draw one frame of playfield-space vertices
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        self.upload(vertices);

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("bounce-frame-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("bounce-scene-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit([encoder.finish()]);
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playfield_corners_map_to_ndc() {
        let size = (720.0, 960.0);
        assert_eq!(playfield_to_ndc(0.0, 0.0, size), (-1.0, 1.0));
        assert_eq!(playfield_to_ndc(720.0, 960.0, size), (1.0, -1.0));
        assert_eq!(playfield_to_ndc(360.0, 480.0, size), (0.0, 0.0));
    }

    #[test]
    fn test_project_keeps_colors() {
        let color = [0.1, 0.2, 0.3, 0.4];
        let projected = project_vertices(&[Vertex::new(180.0, 720.0, color)], (720.0, 960.0));
        assert_eq!(projected, vec![Vertex::new(-0.5, -0.5, color)]);
    }

    #[test]
    fn test_buffer_growth_doubles() {
        assert_eq!(grown_capacity(4096, 100), 4096);
        assert_eq!(grown_capacity(4096, 4097), 8192);
        assert_eq!(grown_capacity(4096, 20_000), 32_768);
        assert_eq!(grown_capacity(0, 3), 4);
    }
}
