// winit allows one event loop per process, so every golden test lives in its own file.
#[cfg(feature = "integration-tests")]
#[macro_use]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_show_the_page_without_models_when_a_load_fails() {
    use crate::common::test_utils::{Validated, assert_all_pixels, expected_pixel};
    use fruit_carousel::{
        context::InitContext,
        flow::ImageTestResult,
        showcase::{ShowcaseFlow, config::ShowcaseConfig, timeline::Timeline},
    };

    golden_image_test!(async move |ctx: InitContext| {
        let mut config = ShowcaseConfig::new().unwrap();
        // one missing model fails the whole batch
        config.fruits[2].path = "missing/pear.glb";
        let timeline = Timeline::for_fruits(&config.fruits).unwrap();
        let expected = config.fruits[0].colour.to_rgb8();

        let flow = ShowcaseFlow::new(ctx, config, timeline).await;
        assert!(flow.carousel().is_empty());
        assert_eq!(flow.state().name, "bananas");

        Validated::new(flow, move |ctx, frames, texture| {
            if frames < 2 {
                return Ok(ImageTestResult::Waiting);
            }
            assert_all_pixels(texture, expected_pixel(ctx, expected));
            Ok(ImageTestResult::Passed)
        })
    });
}
