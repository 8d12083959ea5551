use fruit_carousel::{
    context::Viewport,
    showcase::{
        config::ShowcaseConfig,
        fruit,
        page::{Page, PageUpdate, fit_font_size},
        timeline::Timeline,
    },
};

#[test]
fn should_stop_at_the_first_size_that_fills_the_width() {
    let mut measured = Vec::new();
    let size = fit_font_size(300.0, |size| {
        measured.push(size);
        size as f64 * 10.0
    });
    assert_eq!(size, 30);
    assert_eq!(measured.first(), Some(&16));
    assert_eq!(measured.last(), Some(&30));
}

#[test]
fn should_keep_the_start_size_when_it_already_fills() {
    assert_eq!(fit_font_size(100.0, |_| 500.0), 16);
}

#[test]
fn should_give_up_on_text_that_never_fills() {
    let size = fit_font_size(100.0, |_| 0.0);
    assert!(size > 16);
    assert_eq!(size, fit_font_size(1e12, |_| 0.0));
}

#[test]
fn should_only_report_what_changed() {
    let timeline = Timeline::for_fruits(&fruit::catalogue().unwrap()).unwrap();
    let mut page = Page::new();
    assert!(page.shown().is_none());

    let first = page.show(timeline.initial());
    assert_eq!(
        first,
        PageUpdate {
            background: true,
            name: true,
            scroll_hint: true
        }
    );
    assert_eq!(page.show(timeline.initial()), PageUpdate::default());

    // mid rotation: colour moves, texts stay
    let rotating = timeline.sample_at(0.25);
    let update = page.show(&rotating);
    assert!(update.background);
    assert!(!update.name);
    assert!(!update.scroll_hint);

    let swapped = timeline.sample_at(0.5);
    let update = page.show(&swapped);
    assert!(update.name);
    assert!(update.scroll_hint);
    assert_eq!(page.shown(), Some(&swapped));

    // scrubbing back swaps the name back as well
    let update = page.show(&rotating);
    assert!(update.name);
}

#[test]
fn should_fit_the_name_to_the_viewport() {
    let config = ShowcaseConfig::new().unwrap();
    let timeline = Timeline::for_fruits(&config.fruits).unwrap();
    let mut page = Page::new();
    page.show(timeline.initial());

    let wide = Viewport::new(1200.0, 800.0);
    let narrow = Viewport::new(400.0, 800.0);
    let wide_size = page.fit_name(wide, config.text_padding(wide));
    let narrow_size = page.fit_name(narrow, config.text_padding(narrow));
    assert!(wide_size > narrow_size);
    assert!(narrow_size >= 16);
}
