#[cfg(feature = "integration-tests")]
use fruit_carousel::{
    context::Context,
    flow::{GraphicsFlow, ImageTestResult, Out},
    render::Render,
};

#[cfg(feature = "integration-tests")]
type Validation = Box<
    dyn Fn(
        &Context,
        u32,
        &image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error>,
>;

/// Wraps a flow and checks every frame it renders.
///
/// `frames` counts the updates the wrapped flow has seen, so a validation can
/// wait until the flow had a chance to apply its state.
#[cfg(feature = "integration-tests")]
pub(crate) struct Validated<F> {
    flow: F,
    frames: u32,
    validate: Validation,
}

#[cfg(feature = "integration-tests")]
impl<F: GraphicsFlow> Validated<F> {
    pub(crate) fn new(
        flow: F,
        validate: impl Fn(
            &Context,
            u32,
            &image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
        ) -> Result<ImageTestResult, anyhow::Error>
        + 'static,
    ) -> Self {
        Self {
            flow,
            frames: 0,
            validate: Box::new(validate),
        }
    }
}

#[cfg(feature = "integration-tests")]
impl<F: GraphicsFlow> GraphicsFlow for Validated<F> {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        self.flow.on_init(ctx)
    }

    fn on_update(&mut self, ctx: &Context, dt: std::time::Duration) -> Out {
        self.frames += 1;
        self.flow.on_update(ctx, dt)
    }

    fn on_window_events(&mut self, ctx: &Context, event: &fruit_carousel::WindowEvent) -> Out {
        self.flow.on_window_events(ctx, event)
    }

    fn on_render(&self) -> Render<'_> {
        self.flow.on_render()
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        (self.validate)(ctx, self.frames, texture)
    }
}

/// The pixel an sRGB colour ends up as in the read-back buffer, which has the
/// channel order of the surface.
#[cfg(feature = "integration-tests")]
pub(crate) fn expected_pixel(ctx: &Context, [r, g, b]: [u8; 3]) -> image::Rgba<u8> {
    match ctx.config.format {
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => {
            image::Rgba([b, g, r, 255])
        }
        _ => image::Rgba([r, g, b, 255]),
    }
}

/// Every pixel matches `expected` up to one step of rounding per channel.
#[cfg(feature = "integration-tests")]
pub(crate) fn assert_all_pixels(
    texture: &image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    expected: image::Rgba<u8>,
) {
    for pixel in texture.pixels() {
        for (got, want) in pixel.0.iter().zip(expected.0) {
            assert!(
                got.abs_diff(want) <= 1,
                "pixel {:?} differs from {:?}",
                pixel,
                expected
            );
        }
    }
}

#[macro_export]
macro_rules! golden_image_test {
    ($graphics_elem:expr) => {{
        let constructor: fruit_carousel::flow::FlowConstructor =
            Box::new(|ctx: fruit_carousel::context::InitContext| {
                Box::pin(async move {
                    let g_flow: Box<dyn fruit_carousel::flow::GraphicsFlow> =
                        Box::new(($graphics_elem)(ctx).await);
                    g_flow
                })
            });

        fruit_carousel::flow::run(vec![constructor])
            .expect("Failed to run flow for integration test.");
    }};
}
