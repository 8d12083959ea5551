//! The fruit carousel showcase.
//!
//! Five fruit models sit on a ring in front of the camera. Scrolling the page
//! scrubs a timeline that turns the ring to the next fruit while the background
//! colour, the fruit name and the scroll hint follow. Every fruit also spins
//! around its own axes once per frame, independent of the scroll position.
//!
//! - `fruit`, `colour`, `config` describe what is shown
//! - `loader` and `carousel` get the models onto the ring
//! - `timeline`, `ease` and `scroll` turn the scroll offset into a state
//! - `page` mirrors that state onto the document around the canvas

pub mod carousel;
pub mod colour;
pub mod config;
pub mod ease;
pub mod fruit;
pub mod loader;
pub mod page;
pub mod scroll;
pub mod timeline;

use instant::Duration;
use winit::event::WindowEvent;

use crate::{
    context::{Context, InitContext, Viewport},
    flow::{self, FlowConstructor, GraphicsFlow, Out},
    render::Render,
    showcase::{
        carousel::Carousel,
        config::ShowcaseConfig,
        loader::load_fruits,
        page::Page,
        scroll::{ScrollTrigger, VirtualScroll},
        timeline::{Timeline, TimelineState},
    },
};

pub struct ShowcaseFlow {
    config: ShowcaseConfig,
    timeline: Timeline,
    carousel: Carousel,
    trigger: ScrollTrigger,
    scroll: VirtualScroll,
    page: Page,
    state: TimelineState,
}

impl ShowcaseFlow {
    /// Load the fruit models and assemble the carousel.
    ///
    /// A failed load is logged and leaves the carousel empty; the page and the
    /// scroll binding keep working without models.
    pub async fn new(ctx: InitContext, config: ShowcaseConfig, timeline: Timeline) -> Self {
        let scale = config.model_scale(ctx.viewport);
        let carousel = match load_fruits(&ctx, &config.fruits).await.and_then(|loaded| {
            Carousel::assemble(loaded, config.fruits.len(), config.radius, scale)
        }) {
            Ok(carousel) => {
                log::info!("carousel ready with {} fruits", carousel.len());
                carousel
            }
            Err(e) => {
                log::error!("showing the page without models: {e:#}");
                Carousel::empty()
            }
        };
        Self::with_carousel(ctx.viewport, config, timeline, carousel)
    }

    /// Build the flow around an already assembled carousel.
    pub fn with_carousel(
        viewport: Viewport,
        config: ShowcaseConfig,
        timeline: Timeline,
        carousel: Carousel,
    ) -> Self {
        let trigger = ScrollTrigger::new(config.page_height(viewport), viewport.height);
        let state = timeline.initial().clone();
        Self {
            config,
            timeline,
            carousel,
            trigger,
            scroll: VirtualScroll::default(),
            page: Page::new(),
            state,
        }
    }

    /// A constructor for [`flow::run`].
    pub fn constructor(config: ShowcaseConfig, timeline: Timeline) -> FlowConstructor {
        Box::new(move |ctx: InitContext| {
            Box::pin(async move {
                let flow: Box<dyn GraphicsFlow> =
                    Box::new(ShowcaseFlow::new(ctx, config, timeline).await);
                flow
            })
        })
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    /// The timeline state shown in the last frame.
    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    fn scroll_y(&self) -> f64 {
        self.page.scroll_y().unwrap_or(self.scroll.offset())
    }

    fn layout_page(&mut self, viewport: Viewport) {
        self.trigger = ScrollTrigger::new(self.config.page_height(viewport), viewport.height);
        self.scroll.clamp_to(self.trigger.max_scroll());
        self.page.set_container_height(self.trigger.container_height);
        self.page.fit_name(viewport, self.config.text_padding(viewport));
    }
}

impl GraphicsFlow for ShowcaseFlow {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        ctx.camera.camera = self.config.camera();
        ctx.projection = self.config.projection(ctx.config.width, ctx.config.height);
        ctx.write_camera();
        ctx.set_light(self.config.light);

        self.page.show(&self.state);
        self.layout_page(ctx.viewport());
        ctx.clear_colour = self.state.background.to_wgpu();
        ctx.set_window_title(&self.state.name);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _dt: Duration) -> Out {
        let progress = self.trigger.progress(self.scroll_y());
        self.state = self.timeline.sample(progress);

        self.carousel.set_rotation_y(self.state.rotation_y);
        self.carousel.spin(self.config.spin);
        self.carousel.update_world_transforms();
        self.carousel.write_to_buffers(&ctx.queue);

        let update = self.page.show(&self.state);
        if update.name {
            let viewport = ctx.viewport();
            self.page.fit_name(viewport, self.config.text_padding(viewport));
        }
        if !update.background && !update.name {
            return Out::Empty;
        }
        let clear_colour = self.state.background.to_wgpu();
        let title = update.name.then(|| self.state.name.clone());
        Out::Configure(Box::new(move |ctx: &mut Context| {
            ctx.clear_colour = clear_colour;
            if let Some(title) = title {
                ctx.set_window_title(&title);
            }
        }))
    }

    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent) -> Out {
        match event {
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll.apply(*delta, self.trigger.max_scroll());
            }
            WindowEvent::Resized(_) => {
                self.layout_page(ctx.viewport());
            }
            _ => (),
        }
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        self.carousel.render()
    }
}

/// Build the default showcase and run it until the window closes.
pub fn run() -> anyhow::Result<()> {
    let config = ShowcaseConfig::new()?;
    let timeline = Timeline::for_fruits(&config.fruits)?;
    flow::run(vec![ShowcaseFlow::constructor(config, timeline)])
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    run().map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{e:#}")))
}
