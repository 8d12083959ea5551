// winit allows one event loop per process, so every golden test lives in its own file.
#[cfg(feature = "integration-tests")]
#[macro_use]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_rewrite_the_camera_on_resize() {
    use crate::common::test_utils::Validated;
    use fruit_carousel::{
        camera::CameraUniform,
        context::{Context, InitContext},
        flow::{GraphicsFlow, ImageTestResult, Out},
        render::Render,
        showcase::config::ShowcaseConfig,
    };

    /// Halves the surface width after its first update.
    struct Squeeze {
        squeezed: bool,
    }

    impl GraphicsFlow for Squeeze {
        fn on_init(&mut self, ctx: &mut Context) -> Out {
            let config = ShowcaseConfig::new().unwrap();
            ctx.camera.camera = config.camera();
            ctx.write_camera();
            Out::Empty
        }

        fn on_update(&mut self, _: &Context, _: std::time::Duration) -> Out {
            if self.squeezed {
                return Out::Empty;
            }
            self.squeezed = true;
            Out::Configure(Box::new(|ctx: &mut Context| {
                let (width, height) = (ctx.config.width, ctx.config.height);
                ctx.resize((width / 2).max(1), height);
            }))
        }

        fn on_window_events(&mut self, _: &Context, _: &fruit_carousel::WindowEvent) -> Out {
            Out::Empty
        }

        fn on_render(&self) -> Render<'_> {
            Render::None
        }
    }

    golden_image_test!(async move |_: InitContext| {
        Validated::new(Squeeze { squeezed: false }, |ctx, frames, _| {
            if frames < 2 {
                return Ok(ImageTestResult::Waiting);
            }
            let mut expected = CameraUniform::new();
            expected.update_view_proj(&ctx.camera.camera, &ctx.projection);
            assert_eq!(ctx.camera.uniform.view_proj(), expected.view_proj());
            Ok(ImageTestResult::Passed)
        })
    });
}
