use glam::Vec2;
use rand::Rng;

/// Rectangular playing field anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Uniform random point at least `margin` away from every edge.
    pub fn random_point_inset<R: Rng + ?Sized>(&self, margin: f32, rng: &mut R) -> Vec2 {
        Vec2::new(
            sample_span(rng, margin, self.width - margin),
            sample_span(rng, margin, self.height - margin),
        )
    }

    /// Clamps the top-left corner of a square of side `extent` so the square stays inside.
    pub fn clamp_box(&self, corner: Vec2, extent: f32) -> Vec2 {
        Vec2::new(
            corner.x.min(self.width - extent).max(0.0),
            corner.y.min(self.height - extent).max(0.0),
        )
    }
}

/// Uniform sample from `[low, high]`, collapsing to `low` for an empty span.
pub(crate) fn sample_span<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn inset_points_respect_margin() {
        let bounds = WorldBounds::new(400.0, 300.0);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..500 {
            let p = bounds.random_point_inset(50.0, &mut rng);
            assert!((50.0..=350.0).contains(&p.x));
            assert!((50.0..=250.0).contains(&p.y));
        }
    }

    #[test]
    fn clamp_box_keeps_square_inside() {
        let bounds = WorldBounds::new(100.0, 80.0);
        assert_eq!(bounds.clamp_box(Vec2::new(-4.0, 75.0), 20.0), Vec2::new(0.0, 60.0));
        assert_eq!(bounds.clamp_box(Vec2::new(30.0, 30.0), 20.0), Vec2::new(30.0, 30.0));
    }

    #[test]
    fn degenerate_span_returns_low() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(sample_span(&mut rng, 10.0, 10.0), 10.0);
        assert_eq!(sample_span(&mut rng, 10.0, 2.0), 10.0);
    }
}
