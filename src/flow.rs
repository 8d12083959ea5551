//! Flow control and application event loop.
//!
//! A "flow" is a self-contained piece of the application that reacts to window
//! events, updates its state every frame and says what should be drawn. The
//! event loop owns the GPU [`Context`] and drives every active flow.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow`] is the trait flows implement
//! - [`Out`] lets a flow change the [`Context`] after a lifecycle hook
//! - [`FlowConstructor`] builds a flow asynchronously once the GPU is ready
//!
//! # Lifecycle Flow
//!
//! The event loop follows this pattern each frame:
//! 1. Collect window events and pass them to `on_window_events` of every flow
//! 2. Call `on_render` on every flow and draw the collected objects
//! 3. Present the frame and request the next one
//! 4. Call `on_update` on every flow

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::{Duration, Instant};

#[cfg(feature = "integration-tests")]
use tokio::runtime::Runtime;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::{Context, InitContext},
    data_structures::model::DrawModel,
    render::Instanced,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Id of the canvas the application renders into when running in the browser.
#[cfg(target_arch = "wasm32")]
pub const CANVAS_ID: &str = "bg";

///
/// This is the Output Type for every lifecycle hook.
///
/// `Out::Configure` can be used to modify the Context during runtime, for
/// instance to change the clear colour or the window title.
///
/// `Empty` is the default output used when nothing has to change.
///
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    Empty,
}

impl Default for Out {
    fn default() -> Self {
        Self::Empty
    }
}

#[cfg(feature = "integration-tests")]
pub enum ImageTestResult {
    Passed,
    Waiting,
    Failed,
}

/// Trait for implementing a renderable scene.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once when the flow is created; configure the context (camera, clear colour, etc.)
/// 2. `on_window_events()` is called for each winit window event
/// 3. `on_update()` is called every frame
/// 4. `on_render()` is called each frame and specifies how to render `self`
///
pub trait GraphicsFlow {
    /// Initialize the flow and configure the context.
    ///
    /// This is the place to set up the camera, the light or the default
    /// background colour.
    fn on_init(&mut self, ctx: &mut Context) -> Out;

    /// Update state every frame.
    ///
    /// Called every frame with the elapsed time `dt`.
    fn on_update(&mut self, ctx: &Context, dt: Duration) -> Out;

    /// Handle window events (mouse wheel, resizing, etc.).
    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent) -> Out;

    /// Return renderable objects for this flow.
    fn on_render(&self) -> crate::render::Render<'_>;

    /// Inspect the frame that was just rendered. Flows without assertions pass
    /// right away.
    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _ctx: &Context,
        _texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        Ok(ImageTestResult::Passed)
    }
}

// Dummy impl to make wasm work
impl Debug for dyn GraphicsFlow + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// Type alias for a flow constructor (factory function).
///
/// A flow constructor takes an `InitContext` and asynchronously returns a
/// boxed `GraphicsFlow`. This is where flows load their assets.
pub type FlowConstructor =
    Box<dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = Box<dyn GraphicsFlow>>>>>;

/// Application state bundle: GPU context and surface status.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        Ok(Self {
            ctx,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.is_surface_configured = true;
            self.ctx.resize(width, height);
        }
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_texture(&self, extent3d: wgpu::Extent3d) -> wgpu::Texture {
        self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Golden Image Test Output Texture"),
            size: extent3d,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.ctx.config.format,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_depth_texture(&self, extent3d: wgpu::Extent3d) -> wgpu::Texture {
        self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Golden Image Test Depth Texture"),
            size: extent3d,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    #[cfg(feature = "integration-tests")]
    fn get_with_height(&self) -> (u32, u32) {
        // Rows of a texture copy have to be aligned to 256 bytes
        let align = |v: u32| v.div_ceil(64) * 64;
        (align(self.ctx.config.width), align(self.ctx.config.height))
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_3d_extent(&self) -> wgpu::Extent3d {
        let (width, height) = self.get_with_height();
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        }
    }

    fn render(
        &mut self,
        graphics_flows: &[Box<dyn GraphicsFlow>],
        #[cfg(feature = "integration-tests")] async_runtime: &Runtime,
        #[cfg(feature = "integration-tests")] event_loop: &winit::event_loop::EventLoopProxy<
            FlowEvent,
        >,
    ) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        #[cfg(not(feature = "integration-tests"))]
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        #[cfg(feature = "integration-tests")]
        let (tex, depth) = {
            let extent3d = self.get_test_3d_extent();
            let tex = self.get_test_texture(extent3d);
            let depth = self.get_test_depth_texture(extent3d);
            (tex, depth)
        };

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass: wgpu::RenderPass<'_> =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        #[cfg(feature = "integration-tests")]
                        view: &tex.create_view(&wgpu::TextureViewDescriptor::default()),
                        #[cfg(not(feature = "integration-tests"))]
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        #[cfg(feature = "integration-tests")]
                        view: &depth.create_view(&wgpu::TextureViewDescriptor::default()),
                        #[cfg(not(feature = "integration-tests"))]
                        view: &self.ctx.depth_texture.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });

            let mut basics: Vec<Instanced> = Vec::new();
            graphics_flows
                .iter()
                .for_each(|flow| flow.on_render().collect_into(&mut basics));

            render_pass.set_pipeline(&self.ctx.pipeline);
            for instanced in basics {
                if instanced.amount == 0 || instanced.instance.size() == 0 {
                    log::warn!("you attemted to render something with zero instances");
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_model_instanced(
                    instanced.model,
                    0..instanced.amount as u32,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }
        }

        #[cfg(feature = "integration-tests")]
        let output_buffer = {
            let u32_size = std::mem::size_of::<u32>() as u32;
            let (width, height) = self.get_with_height();
            let output_buffer_size = (u32_size * width * height) as wgpu::BufferAddress;
            let output_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
                size: output_buffer_size,
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                label: Some("Golden Image Test Read-back Buffer"),
                mapped_at_creation: false,
            });
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &tex,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &output_buffer,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(u32_size * width),
                        rows_per_image: Some(height),
                    },
                },
                self.get_test_3d_extent(),
            );
            output_buffer
        };

        self.ctx.queue.submit(iter::once(encoder.finish()));

        #[cfg(feature = "integration-tests")]
        {
            use std::convert::identity;

            let fut_img = async {
                let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
                let buffer_slice = output_buffer.slice(..);
                buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
                    tx.send(result).ok();
                });
                self.ctx.device.poll(wgpu::PollType::Wait)?;
                rx.receive()
                    .await
                    .ok_or_else(|| anyhow::anyhow!("the read-back buffer was never mapped"))??;
                let data = buffer_slice.get_mapped_range();
                let (width, height) = self.get_with_height();
                image::ImageBuffer::<image::Rgba<u8>, _>::from_raw(width, height, data)
                    .ok_or_else(|| anyhow::anyhow!("the read-back buffer is too small"))
            };
            let mut img = match async_runtime.block_on(fut_img) {
                Ok(img) => img,
                Err(e) => panic!("Cannot read back the rendered frame: {e:#}"),
            };
            let all_passed = graphics_flows
                .iter()
                .map(|flow| flow.render_to_texture(&self.ctx, &mut img))
                .map(|res| match res {
                    Err(e) => panic!("{}", e),
                    Ok(ImageTestResult::Passed) => true,
                    Ok(ImageTestResult::Failed) => panic!("Assertion failed"),
                    Ok(ImageTestResult::Waiting) => false,
                })
                .all(identity);
            if all_passed {
                event_loop
                    .send_event(FlowEvent::Exit)
                    .expect("All assertions passed but the winit event-loop could not safely exit")
            }
        }

        output.present();
        Ok(())
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    state: Option<AppState>,
    // This will hold the fully initialized flows once they are ready.
    graphics_flows: Vec<Box<dyn GraphicsFlow>>,
    // We use Option to `take()` the constructors once the window exists.
    constructors: Option<Vec<FlowConstructor>>,
    // Set when the window or the GPU could not be set up; returned by `run`.
    failure: Option<anyhow::Error>,
    last_time: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, constructors: Vec<FlowConstructor>) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            failure: None,
            last_time: Instant::now(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.failure = Some(error);
        event_loop.exit();
    }

    /// Hand the initialised flows their context, then start rendering.
    fn start(&mut self, mut app_state: AppState, flows: Vec<Box<dyn GraphicsFlow>>) {
        self.graphics_flows = flows;
        let size = app_state.ctx.window.inner_size();
        app_state.resize(size.width, size.height);
        self.graphics_flows.iter_mut().for_each(|flow| {
            let out = flow.on_init(&mut app_state.ctx);
            handle_flow_output(&mut app_state.ctx, out);
        });
        app_state.ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(app_state);
    }
}

pub enum FlowEvent {
    #[allow(dead_code)]
    Initialized {
        state: AppState,
        flows: Vec<Box<dyn GraphicsFlow>>,
    },
    #[allow(dead_code)]
    Failed(anyhow::Error),
    #[allow(dead_code)]
    Exit,
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { state: _, flows } => {
                f.debug_struct("Initialized").field("flows", flows).finish()
            }
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Resumed fires again on some platforms, the flows only start once
        let Some(constructors) = self.constructors.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Fruit carousel");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            // The page behind the canvas scrolls, so wheel and touch events have to reach it
            window_attributes = window_attributes
                .with_canvas(Some(html_canvas_element))
                .with_prevent_default(false);
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, anyhow::Error::new(e).context("cannot open a window")),
        };

        let init_future = async move {
            let app_state = AppState::new(window).await?;

            let flow_futures: Vec<_> = constructors
                .into_iter()
                // The clone in into() leverages the internal Arcs of Device and Queue and thus only clones the ref
                .map(|constructor| constructor((&app_state.ctx).into()))
                .collect();
            let flows: Vec<_> = futures::future::join_all(flow_futures).await;
            anyhow::Ok((app_state, flows))
        };

        #[cfg(not(target_arch = "wasm32"))]
        match self.async_runtime.block_on(init_future) {
            Ok((app_state, flows)) => self.start(app_state, flows),
            Err(e) => self.fail(event_loop, e),
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok((state, flows)) => FlowEvent::Initialized { state, flows },
                    Err(e) => FlowEvent::Failed(e),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("the event loop closed before the flows were initialised");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            // This is the message from our wasm `spawn_local`
            FlowEvent::Initialized { state, flows } => self.start(state, flows),
            FlowEvent::Failed(e) => self.fail(event_loop, e),
            FlowEvent::Exit => event_loop.exit(),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render(
                    &self.graphics_flows,
                    #[cfg(feature = "integration-tests")]
                    &self.async_runtime,
                    #[cfg(feature = "integration-tests")]
                    &self.proxy,
                ) {
                    Ok(_) => {
                        self.graphics_flows.iter_mut().for_each(|f| {
                            let out = f.on_update(&state.ctx, dt);
                            handle_flow_output(&mut state.ctx, out);
                        });
                    }
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }

        // Flows see a resize after the context was adapted to it
        self.graphics_flows.iter_mut().for_each(|f| {
            let out = f.on_window_events(&state.ctx, &event);
            handle_flow_output(&mut state.ctx, out);
        });
    }
}

fn handle_flow_output(ctx: &mut Context, out: Out) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Empty => (),
    }
}

pub fn run(constructors: Vec<FlowConstructor>) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {e}").into());
        }
    }

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<FlowEvent> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<FlowEvent> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()?
    };

    #[cfg(not(feature = "integration-tests"))]
    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, constructors)?;

    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
