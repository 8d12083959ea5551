//! Scroll-scrubbed timeline.
//!
//! A [`Timeline`] is an immutable list of tweens placed on a shared time axis.
//! It has no clock of its own: the playhead is set from scroll progress, so the
//! same sample is produced whether the user scrolls forward or backward.
//!
//! Tweens are placed with a [`Position`] relative to what was added before, the
//! way one would sequence them by hand:
//!
//! - [`Position::End`] appends after everything added so far
//! - [`Position::WithPrevious`] starts together with the previously added tween
//! - [`Position::BeforeEnd`] starts the given amount before the current end
//! - [`Position::At`] uses an absolute time
//!
//! The start value of every tween is resolved while building by sampling the
//! timeline built so far at the tween's start time. Sampling is therefore a pure
//! function of the playhead.

use std::f32::consts::TAU;

use anyhow::{bail, ensure};

use crate::showcase::{colour::Colour, ease::Ease, fruit::Fruit};

/// Animated properties of the showcase page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Y rotation of the carousel group in radians.
    GroupRotationY,
    /// Page background colour.
    Background,
    /// Vertical offset of the fruit name in percent of its own height.
    NameOffset,
    NameText,
    ScrollHint,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(f32),
    Colour(Colour),
    Text(String),
}

impl Value {
    fn interpolate(&self, to: &Value, t: f32) -> Value {
        match (self, to) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(a + (b - a) * t),
            (Value::Colour(a), Value::Colour(b)) => Value::Colour(a.lerp(*b, t)),
            // Text can't be blended, it flips once the tween is done
            _ if t >= 1.0 => to.clone(),
            _ => self.clone(),
        }
    }
}

impl Property {
    fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Property::GroupRotationY | Property::NameOffset, Value::Scalar(_))
                | (Property::Background, Value::Colour(_))
                | (Property::NameText | Property::ScrollHint, Value::Text(_))
        )
    }
}

/// Where a tween is placed on the time axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    End,
    WithPrevious,
    BeforeEnd(f32),
    At(f32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Change {
    pub property: Property,
    pub from: Value,
    pub to: Value,
}

/// One interpolation step. A tween without a change is an empty hold that
/// only takes up time; a tween with zero duration is a set.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub start: f32,
    pub duration: f32,
    pub ease: Ease,
    pub change: Option<Change>,
}

impl Tween {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }
}

/// Everything the timeline drives, sampled at one playhead position.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineState {
    pub rotation_y: f32,
    pub background: Colour,
    pub name_offset: f32,
    pub name: String,
    pub scroll_hint: String,
}

impl TimelineState {
    pub fn get(&self, property: Property) -> Value {
        match property {
            Property::GroupRotationY => Value::Scalar(self.rotation_y),
            Property::Background => Value::Colour(self.background),
            Property::NameOffset => Value::Scalar(self.name_offset),
            Property::NameText => Value::Text(self.name.clone()),
            Property::ScrollHint => Value::Text(self.scroll_hint.clone()),
        }
    }

    fn set(&mut self, property: Property, value: Value) {
        match (property, value) {
            (Property::GroupRotationY, Value::Scalar(v)) => self.rotation_y = v,
            (Property::Background, Value::Colour(c)) => self.background = c,
            (Property::NameOffset, Value::Scalar(v)) => self.name_offset = v,
            (Property::NameText, Value::Text(s)) => self.name = s,
            (Property::ScrollHint, Value::Text(s)) => self.scroll_hint = s,
            (property, value) => {
                log::warn!("ignoring {:?} for property {:?}", value, property)
            }
        }
    }
}

const PROPERTIES: [Property; 5] = [
    Property::GroupRotationY,
    Property::Background,
    Property::NameOffset,
    Property::NameText,
    Property::ScrollHint,
];

#[derive(Clone, Debug)]
pub struct Timeline {
    tweens: Vec<Tween>,
    initial: TimelineState,
    duration: f32,
    segments: usize,
}

impl Timeline {
    pub fn builder(initial: TimelineState) -> TimelineBuilder {
        TimelineBuilder {
            tweens: Vec::new(),
            initial,
            duration: 0.0,
            last_start: 0.0,
            segments: 0,
        }
    }

    /// Sequence the carousel: one segment per fruit, each turning the group to
    /// the next fruit while the background and the texts follow.
    ///
    /// The last segment wraps around to the first fruit so that the carousel ends
    /// where it started. The timeline therefore lasts `1.5 * n` and the end of the
    /// page shows the first fruit again with hint `(1/n)`, rather than stopping on
    /// the last fruit with `(n/n)` after `1.5 * (n - 1)`.
    pub fn for_fruits(fruits: &[Fruit]) -> anyhow::Result<Self> {
        let Some(first) = fruits.first() else {
            bail!("a timeline needs at least one fruit");
        };
        let n = fruits.len();
        let mut tl = Timeline::builder(TimelineState {
            rotation_y: 0.0,
            background: first.colour,
            name_offset: 0.0,
            name: first.name.to_string(),
            scroll_hint: scroll_hint(0, n),
        });
        let ease = Ease::Power2InOut;
        for i in 0..n {
            let next = (i + 1) % n;
            let step = TAU / n as f32 * (i + 1) as f32;
            tl.begin_segment();
            tl.to(Property::GroupRotationY, Value::Scalar(step), 1.0, ease, Position::End)?;
            tl.to(
                Property::Background,
                Value::Colour(fruits[next].colour),
                1.0,
                ease,
                Position::WithPrevious,
            )?;
            tl.to(Property::NameOffset, Value::Scalar(150.0), 0.5, ease, Position::WithPrevious)?;
            tl.set(
                Property::NameText,
                Value::Text(fruits[next].name.to_string()),
                Position::BeforeEnd(0.5),
            )?;
            tl.set(
                Property::ScrollHint,
                Value::Text(scroll_hint(next, n)),
                Position::BeforeEnd(0.5),
            )?;
            tl.to(Property::NameOffset, Value::Scalar(0.0), 0.5, ease, Position::BeforeEnd(0.5))?;
            tl.hold(0.5);
        }
        Ok(tl.build())
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn initial(&self) -> &TimelineState {
        &self.initial
    }

    /// Sample at normalised progress `0..=1` (scrub).
    pub fn sample(&self, progress: f32) -> TimelineState {
        self.sample_at(progress.clamp(0.0, 1.0) * self.duration)
    }

    /// Sample at an absolute playhead time.
    pub fn sample_at(&self, time: f32) -> TimelineState {
        let mut state = self.initial.clone();
        for property in PROPERTIES {
            if let Some(value) = value_at(&self.tweens, property, time) {
                state.set(property, value);
            }
        }
        state
    }
}

fn scroll_hint(current: usize, total: usize) -> String {
    format!("Scroll for more fruits ({}/{})", current + 1, total)
}

/// Value of `property` at `time` according to `tweens`, or `None` when no tween
/// for it has started yet.
fn value_at(tweens: &[Tween], property: Property, time: f32) -> Option<Value> {
    // the latest started tween wins, ties go to the one added last
    let (tween, change) = tweens
        .iter()
        .filter_map(|tween| match &tween.change {
            Some(change) if change.property == property && tween.start <= time => {
                Some((tween, change))
            }
            _ => None,
        })
        .fold(None, |acc: Option<(&Tween, &Change)>, cur| match acc {
            Some(prev) if prev.0.start > cur.0.start => Some(prev),
            _ => Some(cur),
        })?;
    if tween.duration <= 0.0 || time >= tween.end() {
        return Some(change.to.clone());
    }
    let t = tween.ease.apply((time - tween.start) / tween.duration);
    Some(change.from.interpolate(&change.to, t))
}

pub struct TimelineBuilder {
    tweens: Vec<Tween>,
    initial: TimelineState,
    duration: f32,
    last_start: f32,
    segments: usize,
}

impl TimelineBuilder {
    fn resolve(&self, position: Position) -> f32 {
        match position {
            Position::End => self.duration,
            Position::WithPrevious => self.last_start,
            Position::BeforeEnd(offset) => (self.duration - offset).max(0.0),
            Position::At(time) => time.max(0.0),
        }
    }

    fn push(&mut self, start: f32, duration: f32, ease: Ease, change: Option<Change>) {
        let tween = Tween {
            start,
            duration,
            ease,
            change,
        };
        self.duration = self.duration.max(tween.end());
        self.last_start = start;
        self.tweens.push(tween);
    }

    /// Tween `property` to `to` over `duration`.
    pub fn to(
        &mut self,
        property: Property,
        to: Value,
        duration: f32,
        ease: Ease,
        position: Position,
    ) -> anyhow::Result<&mut Self> {
        ensure!(
            property.accepts(&to),
            "{:?} can't be animated to {:?}",
            property,
            to
        );
        ensure!(duration >= 0.0, "negative duration {duration} for {property:?}");
        let start = self.resolve(position);
        let from = value_at(&self.tweens, property, start)
            .unwrap_or_else(|| self.initial.get(property));
        self.push(start, duration, ease, Some(Change { property, from, to }));
        Ok(self)
    }

    /// Jump `property` to `to` without interpolation.
    pub fn set(
        &mut self,
        property: Property,
        to: Value,
        position: Position,
    ) -> anyhow::Result<&mut Self> {
        self.to(property, to, 0.0, Ease::Linear, position)
    }

    /// Append an empty tween that only takes up time.
    pub fn hold(&mut self, duration: f32) -> &mut Self {
        let start = self.duration;
        self.push(start, duration.max(0.0), Ease::Linear, None);
        self
    }

    /// Mark the start of a new segment. Segments are only counted.
    pub fn begin_segment(&mut self) -> &mut Self {
        self.segments += 1;
        self
    }

    pub fn build(self) -> Timeline {
        Timeline {
            tweens: self.tweens,
            initial: self.initial,
            duration: self.duration,
            segments: self.segments,
        }
    }
}
