//! GPU and window context.
//!
//! [`Context`] owns everything a frame needs: surface, device, queue, the depth
//! texture, camera, light, the model pipeline and the clear colour. Flows get a
//! shared reference every frame and may change it through
//! [`crate::flow::Out::Configure`].

use std::sync::Arc;

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, CameraUniform, Projection},
    data_structures::texture,
    pipelines::{
        basic::mk_basic_pipeline,
        light::{LightResources, LightUniform},
    },
};

/// Size of the visible area in logical (CSS) pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Logical size of the window. In the browser this is the size of the
    /// browser window, which is known even before the canvas got its first size.
    pub fn of(window: &Window) -> Self {
        #[cfg(target_arch = "wasm32")]
        if let Some(viewport) = Self::of_browser() {
            return viewport;
        }
        let size = window.inner_size().to_logical::<f64>(window.scale_factor());
        Self::new(size.width, size.height)
    }

    #[cfg(target_arch = "wasm32")]
    fn of_browser() -> Option<Self> {
        let window = web_sys::window()?;
        let width = window.inner_width().ok()?.as_f64()?;
        let height = window.inner_height().ok()?.as_f64()?;
        Some(Self::new(width, height))
    }
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipeline: wgpu::RenderPipeline,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::debug!("wgpu setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable graphics adapter")?;
        log::debug!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("cannot open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shader works in linear space and relies on an sRGB surface for the output conversion.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface reports no texture formats")?;
        // Prefer a surface that can show the page behind the canvas
        let alpha_mode = surface_caps
            .alpha_modes
            .iter()
            .copied()
            .find(|mode| *mode == wgpu::CompositeAlphaMode::PreMultiplied)
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = Camera::new((0.0, 0.0, 50.0), (0.0, 0.0, 90.0));
        let projection = Projection::new(config.width, config.height, cgmath::Deg(75.0), 0.1, 1000.0);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let camera = CameraResources {
            camera,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let light = LightResources::new(
            LightUniform {
                position: [0.0, 50.0, 50.0],
                intensity: 0.0,
                color: [1.0, 1.0, 1.0],
                ambient: 1.0,
            },
            &device,
        );

        let pipeline = mk_basic_pipeline(
            &device,
            &config,
            &light.bind_group_layout,
            &camera.bind_group_layout,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            pipeline,
            window,
            depth_texture,
            clear_colour: wgpu::Color::TRANSPARENT,
        })
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::of(&self.window)
    }

    /// Adapt the surface, the depth texture and the camera to a new size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        self.projection.resize(width, height);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            texture::Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
        self.write_camera();
    }

    /// Push the camera (and the current projection) to the GPU.
    pub fn write_camera(&mut self) {
        self.camera
            .uniform
            .update_view_proj(&self.camera.camera, &self.projection);
        self.queue.write_buffer(
            &self.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.camera.uniform]),
        );
    }

    pub fn set_light(&mut self, uniform: LightUniform) {
        self.light.uniform = uniform;
        self.light.write_to_buffer(&self.queue);
    }

    pub fn set_window_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// The part of the [`Context`] flow constructors get while assets are loaded.
///
/// `wgpu::Device` and `wgpu::Queue` are reference counted internally, cloning
/// them only clones the handle.
#[derive(Clone, Debug)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub viewport: Viewport,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            viewport: ctx.viewport(),
        }
    }
}
