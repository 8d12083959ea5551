use std::f32::consts::TAU;

use fruit_carousel::showcase::{
    colour::Colour,
    ease::Ease,
    fruit::{self, Fruit},
    timeline::{Position, Property, Timeline, TimelineState, Value},
};

const SEGMENT: f32 = 1.5;

fn fruits() -> Vec<Fruit> {
    fruit::catalogue().unwrap()
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn should_have_one_segment_per_fruit() {
    let fruits = fruits();
    let timeline = Timeline::for_fruits(&fruits).unwrap();
    assert_eq!(timeline.segments(), fruits.len());
    assert!(close(timeline.duration(), SEGMENT * fruits.len() as f32));
}

#[test]
fn should_refuse_an_empty_catalogue() {
    assert!(Timeline::for_fruits(&[]).is_err());
}

#[test]
fn should_start_on_the_first_fruit() {
    let fruits = fruits();
    let timeline = Timeline::for_fruits(&fruits).unwrap();
    let state = timeline.sample(0.0);
    assert_eq!(&state, timeline.initial());
    assert_eq!(state.rotation_y, 0.0);
    assert_eq!(state.background, fruits[0].colour);
    assert_eq!(state.name, "bananas");
    assert_eq!(state.name_offset, 0.0);
    assert_eq!(state.scroll_hint, "Scroll for more fruits (1/5)");
}

#[test]
fn should_rest_on_each_fruit_between_segments() {
    let fruits = fruits();
    let n = fruits.len();
    let timeline = Timeline::for_fruits(&fruits).unwrap();
    for k in 1..n {
        // the hold at the end of segment k - 1
        let state = timeline.sample_at(SEGMENT * k as f32 - 0.25);
        assert!(close(state.rotation_y, TAU / n as f32 * k as f32), "rotation at {k}");
        assert_eq!(state.background, fruits[k].colour);
        assert_eq!(state.name, fruits[k].name);
        assert_eq!(state.name_offset, 0.0);
        assert_eq!(
            state.scroll_hint,
            format!("Scroll for more fruits ({}/{})", k + 1, n)
        );
    }
}

#[test]
fn should_follow_the_catalogue_colour_order() {
    let fruits = fruits();
    let timeline = Timeline::for_fruits(&fruits).unwrap();
    let colours: Vec<Colour> = (0..fruits.len())
        .map(|k| timeline.sample_at(SEGMENT * k as f32).background)
        .collect();
    let expected: Vec<Colour> = fruits.iter().map(|f| f.colour).collect();
    assert_eq!(colours, expected);
}

#[test]
fn should_wrap_back_to_the_first_fruit_at_the_end() {
    let fruits = fruits();
    let timeline = Timeline::for_fruits(&fruits).unwrap();
    let state = timeline.sample(1.0);
    assert!(close(state.rotation_y, TAU));
    assert_eq!(state.background, fruits[0].colour);
    assert_eq!(state.name, fruits[0].name);
    assert_eq!(state.scroll_hint, "Scroll for more fruits (1/5)");
}

#[test]
fn should_swap_the_name_halfway_through_a_segment() {
    let fruits = fruits();
    let timeline = Timeline::for_fruits(&fruits).unwrap();

    let before = timeline.sample_at(0.25);
    assert_eq!(before.name, "bananas");
    // halfway through the 0.5 long slide out
    assert!(close(before.name_offset, 75.0));

    let at_swap = timeline.sample_at(0.5);
    assert_eq!(at_swap.name, "strawberries");
    assert_eq!(at_swap.scroll_hint, "Scroll for more fruits (2/5)");
    assert!(close(at_swap.name_offset, 150.0));

    let sliding_in = timeline.sample_at(0.75);
    assert!(close(sliding_in.name_offset, 75.0));
}

#[test]
fn should_ease_rotation_and_colour_together() {
    let fruits = fruits();
    let n = fruits.len() as f32;
    let timeline = Timeline::for_fruits(&fruits).unwrap();
    let state = timeline.sample_at(0.5);
    assert!(close(state.rotation_y, TAU / n * 0.5));
    assert_eq!(state.background, fruits[0].colour.lerp(fruits[1].colour, 0.5));

    let early = timeline.sample_at(0.2);
    let eased = Ease::Power2InOut.apply(0.2);
    assert!(close(early.rotation_y, TAU / n * eased));
}

#[test]
fn should_restore_earlier_states_when_scrubbing_back() {
    let timeline = Timeline::for_fruits(&fruits()).unwrap();
    let steps: Vec<f32> = (0..=100).map(|i| i as f32 / 100.0).collect();
    let forward: Vec<TimelineState> = steps.iter().map(|p| timeline.sample(*p)).collect();
    let backward: Vec<TimelineState> = steps.iter().rev().map(|p| timeline.sample(*p)).collect();
    for (a, b) in forward.iter().zip(backward.iter().rev()) {
        assert_eq!(a, b);
    }
}

#[test]
fn should_turn_monotonically_with_scroll() {
    let timeline = Timeline::for_fruits(&fruits()).unwrap();
    let mut last = f32::NEG_INFINITY;
    for i in 0..=200 {
        let rotation = timeline.sample(i as f32 / 200.0).rotation_y;
        assert!(rotation >= last - 1e-6);
        last = rotation;
    }
}

#[test]
fn should_place_tweens_relative_to_each_other() {
    let initial = TimelineState {
        rotation_y: 0.0,
        background: Colour::from_rgb8(0, 0, 0),
        name_offset: 0.0,
        name: "a".to_string(),
        scroll_hint: String::new(),
    };
    let mut builder = Timeline::builder(initial);
    builder
        .to(Property::GroupRotationY, Value::Scalar(1.0), 2.0, Ease::Linear, Position::End)
        .unwrap()
        .to(Property::NameOffset, Value::Scalar(10.0), 1.0, Ease::Linear, Position::WithPrevious)
        .unwrap()
        .set(Property::NameText, Value::Text("b".to_string()), Position::BeforeEnd(0.5))
        .unwrap()
        .hold(1.0);
    builder
        .to(Property::GroupRotationY, Value::Scalar(3.0), 1.0, Ease::Linear, Position::At(2.0))
        .unwrap();
    let timeline = builder.build();

    let starts: Vec<f32> = timeline.tweens().iter().map(|t| t.start).collect();
    assert_eq!(starts, [0.0, 0.0, 1.5, 2.0, 2.0]);
    assert!(close(timeline.duration(), 3.0));

    assert!(close(timeline.sample_at(1.0).rotation_y, 0.5));
    assert_eq!(timeline.sample_at(1.4).name, "a");
    assert_eq!(timeline.sample_at(1.5).name, "b");
    // the second rotation starts where the first one ended
    assert!(close(timeline.sample_at(2.5).rotation_y, 2.0));
}

#[test]
fn should_reject_mismatched_values() {
    let mut builder = Timeline::builder(Timeline::for_fruits(&fruits()).unwrap().initial().clone());
    assert!(
        builder
            .to(Property::Background, Value::Scalar(1.0), 1.0, Ease::Linear, Position::End)
            .is_err()
    );
    assert!(
        builder
            .to(Property::GroupRotationY, Value::Scalar(1.0), -1.0, Ease::Linear, Position::End)
            .is_err()
    );
}
