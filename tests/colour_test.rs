use fruit_carousel::showcase::{colour::Colour, ease::Ease, fruit};

#[test]
fn should_parse_long_hex_colours() {
    let colour = Colour::from_hex("#fac919").unwrap();
    assert_eq!(colour.to_rgb8(), [250, 201, 25]);

    let upper = Colour::from_hex("#FF6347").unwrap();
    assert_eq!(upper.to_rgb8(), [255, 99, 71]);
}

#[test]
fn should_expand_short_hex_colours() {
    let colour = Colour::from_hex("#abc").unwrap();
    assert_eq!(colour.to_rgb8(), [0xaa, 0xbb, 0xcc]);
}

#[test]
fn should_reject_malformed_colours() {
    for bad in ["fac919", "#12", "#1234567", "#gg0000", "#ééé", "#+f+f+f", "#+ff", "#-1-1-1", ""] {
        assert!(Colour::from_hex(bad).is_err(), "{bad} should not parse");
    }
}

#[test]
fn should_format_colours_for_the_page() {
    let colour = Colour::from_hex("#f5795d").unwrap();
    assert_eq!(colour.to_string(), "#f5795d");
    assert_eq!(colour.to_css(), "rgb(245, 121, 93)");
}

#[test]
fn should_linearise_for_the_surface() {
    let white = Colour::from_rgb8(255, 255, 255).to_wgpu();
    assert!((white.r - 1.0).abs() < 1e-6);
    assert!((white.a - 1.0).abs() < 1e-6);

    let black = Colour::from_rgb8(0, 0, 0).to_wgpu();
    assert_eq!(black.g, 0.0);

    // sRGB 0.5 is roughly 21.4% linear light
    let grey = Colour::new(0.5, 0.5, 0.5).to_wgpu();
    assert!((grey.b - 0.214).abs() < 1e-3);
}

#[test]
fn should_blend_in_srgb_space() {
    let a = Colour::from_rgb8(0, 0, 0);
    let b = Colour::from_rgb8(255, 255, 255);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5).to_rgb8(), [128, 128, 128]);
}

#[test]
fn should_keep_catalogue_colours_and_order() {
    let fruits = fruit::catalogue().unwrap();
    let names: Vec<_> = fruits.iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        ["bananas", "strawberries", "pears", "oranges", "apples"]
    );
    let colours: Vec<_> = fruits.iter().map(|f| f.colour.to_string()).collect();
    assert_eq!(
        colours,
        ["#fac919", "#ff6347", "#afc744", "#ffa500", "#f5795d"]
    );
    for (index, fruit) in fruits.iter().enumerate() {
        assert_eq!(fruit.index, index);
        assert!(fruit.path.ends_with(".glb"));
    }
}

#[test]
fn should_ease_between_fixed_end_points() {
    for ease in [Ease::Linear, Ease::Power2InOut] {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
        assert_eq!(ease.apply(-3.0), 0.0);
        assert_eq!(ease.apply(7.0), 1.0);
    }
    assert_eq!(Ease::Power2InOut.apply(0.5), 0.5);
}

#[test]
fn should_ease_in_out_symmetrically() {
    for step in 0..=20 {
        let t = step as f32 / 20.0;
        let sum = Ease::Power2InOut.apply(t) + Ease::Power2InOut.apply(1.0 - t);
        assert!((sum - 1.0).abs() < 1e-5, "asymmetric at {t}");
    }
    // slow start, fast middle
    assert!(Ease::Power2InOut.apply(0.1) < 0.1);
    assert!(Ease::Power2InOut.apply(0.9) > 0.9);
}
