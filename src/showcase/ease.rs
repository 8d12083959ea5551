/// Easing curves used by the timeline.
///
/// `Power2InOut` is the cubic in-out curve (the "power2" family counts the
/// exponent from zero).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    #[default]
    Linear,
    Power2InOut,
}

impl Ease {
    /// Map linear progress `t` (clamped to `0..=1`) onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}
