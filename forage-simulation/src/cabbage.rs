//! Stationary, depletable food source.

use glam::Vec2;
use rand::Rng;

use crate::bounds::{sample_span, WorldBounds};

/// Nutrition carried per unit of initial size.
pub const NUTRITION_PER_SIZE: f32 = 2.0;

/// A cabbage only ever shrinks through [`crate::goat::Goat`] bites, and only while
/// reserved by the goat eating it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cabbage {
    position: Vec2,
    size: f32,
    nutrition: f32,
    reserved: bool,
}

impl Cabbage {
    pub fn new(position: Vec2, size: f32) -> Self {
        Self {
            position,
            size,
            nutrition: size * NUTRITION_PER_SIZE,
            reserved: false,
        }
    }

    /// Random placement inside the inset area with a size drawn from `size_range`.
    pub fn random<R: Rng + ?Sized>(
        bounds: WorldBounds,
        margin: f32,
        size_range: (f32, f32),
        rng: &mut R,
    ) -> Self {
        let position = bounds.random_point_inset(margin, rng);
        let size = sample_span(rng, size_range.0, size_range.1);
        Self::new(position, size)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn nutrition(&self) -> f32 {
        self.nutrition
    }

    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    pub fn is_depleted(&self) -> bool {
        self.size <= 0.0
    }

    /// Whether a goat may pick this cabbage as a target.
    pub fn is_available(&self) -> bool {
        !self.reserved && !self.is_depleted()
    }

    /// Centre of the cabbage's bounding square.
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.size / 2.0)
    }

    /// Radius test around the centre, used for hover and inspection.
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.center().distance(point) <= self.size / 2.0
    }

    pub(crate) fn reserve(&mut self) {
        self.reserved = true;
    }

    pub(crate) fn release(&mut self) {
        self.reserved = false;
    }

    pub(crate) fn shrink(&mut self, amount: f32) {
        self.size -= amount;
    }

    /// Replaces the size and re-derives nutrition from it.
    pub(crate) fn resize(&mut self, size: f32) {
        self.size = size;
        self.nutrition = size * NUTRITION_PER_SIZE;
    }
}
