//! Mobile consumer: movement primitives, consumption accounting and the
//! per-tick behavior state machine.

use std::ops::RangeInclusive;

use forage_core::Arena;
use glam::Vec2;
use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bounds::{sample_span, WorldBounds};
use crate::cabbage::Cabbage;
use crate::error::WorldError;
use crate::selector::find_nearest_unreserved;
use crate::CabbageId;

/// A goat at or below this size is dead and gets removed at cleanup.
pub const DEATH_THRESHOLD: f32 = 5.0;
pub const MAX_STAMINA: f32 = 100.0;
/// Stamina lost per tick by a goat of `REFERENCE_SIZE`; scales linearly with size.
pub const STAMINA_DECAY_RATE: f32 = 0.5;
pub const REFERENCE_SIZE: f32 = 20.0;
/// Size lost per tick while stamina is exhausted.
pub const STARVATION_LOSS: f32 = 0.01;
/// Size gained per bite, multiplied by fertility.
pub const GROWTH_PER_BITE: f32 = 0.2;
/// Ticks spent walking in one direction before turning.
pub const WANDER_STEPS: RangeInclusive<u32> = 30..=60;

const DEFAULT_SIZE: f32 = 20.0;
const SPEED_RANGE: (f32, f32) = (1.0, 3.0);
const CONSUMPTION_RANGE: (f32, f32) = (1.0, 3.0);
const FERTILITY_RANGE: (f32, f32) = (0.1, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoatState {
    #[default]
    Wandering,
    Approaching,
    Eating,
}

/// Externally settable goat attributes, used when adding or editing a goat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoatAttributes {
    pub size: f32,
    pub speed: f32,
    pub fertility: f32,
    pub stamina: f32,
    pub consumption_rate: f32,
}

impl GoatAttributes {
    /// Rejects values that would let a bite grow a cabbage or drain stamina.
    /// Stamina itself is clamped on assignment.
    pub fn validate(&self) -> Result<(), WorldError> {
        let checks = [
            ("size", self.size, self.size > 0.0),
            ("speed", self.speed, self.speed > 0.0),
            ("consumption_rate", self.consumption_rate, self.consumption_rate > 0.0),
            ("fertility", self.fertility, self.fertility >= 0.0),
            ("stamina", self.stamina, true),
        ];
        match checks.into_iter().find(|&(_, value, ok)| !ok || !value.is_finite()) {
            Some((field, value, _)) => Err(WorldError::InvalidAttribute { field, value }),
            None => Ok(()),
        }
    }
}

impl Default for GoatAttributes {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            speed: 1.0,
            fertility: 1.0,
            stamina: MAX_STAMINA,
            consumption_rate: 1.0,
        }
    }
}

/// What a goat did during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Too small to act; only passive decay applied.
    Idle,
    Wandered,
    Approached(CabbageId),
    /// Started eating the cabbage.
    Claimed(CabbageId),
    Ate(CabbageId),
    /// Took the last bite; the cabbage is depleted and released.
    Finished(CabbageId),
}

/// Result of a single bite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bite {
    Eating,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Goat {
    pub position: Vec2,
    pub size: f32,
    pub speed: f32,
    pub consumption_rate: f32,
    pub fertility: f32,
    stamina: f32,
    state: GoatState,
    target: Option<CabbageId>,
    wander_direction: Vec2,
    steps_in_direction: u32,
    steps_until_turn: u32,
}

impl Goat {
    pub fn new<R: Rng + ?Sized>(position: Vec2, attributes: GoatAttributes, rng: &mut R) -> Self {
        let mut goat = Self {
            position,
            size: attributes.size,
            speed: attributes.speed,
            consumption_rate: attributes.consumption_rate,
            fertility: attributes.fertility,
            stamina: 0.0,
            state: GoatState::Wandering,
            target: None,
            wander_direction: random_direction(rng),
            steps_in_direction: 0,
            steps_until_turn: rng.gen_range(WANDER_STEPS),
        };
        goat.set_stamina(attributes.stamina);
        goat
    }

    /// Goat with the default random attribute distributions, placed inside the inset area.
    pub fn random<R: Rng + ?Sized>(bounds: WorldBounds, margin: f32, rng: &mut R) -> Self {
        let position = bounds.random_point_inset(margin, rng);
        let attributes = GoatAttributes {
            size: DEFAULT_SIZE,
            speed: sample_span(rng, SPEED_RANGE.0, SPEED_RANGE.1),
            consumption_rate: sample_span(rng, CONSUMPTION_RANGE.0, CONSUMPTION_RANGE.1),
            fertility: sample_span(rng, FERTILITY_RANGE.0, FERTILITY_RANGE.1),
            stamina: MAX_STAMINA,
        };
        Self::new(position, attributes, rng)
    }

    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    pub fn set_stamina(&mut self, stamina: f32) {
        self.stamina = stamina.clamp(0.0, MAX_STAMINA);
    }

    pub fn state(&self) -> GoatState {
        self.state
    }

    pub fn target(&self) -> Option<CabbageId> {
        self.target
    }

    /// Overwrites the settable attributes, leaving behavior state untouched.
    pub fn apply_attributes(&mut self, attributes: GoatAttributes) {
        self.size = attributes.size;
        self.speed = attributes.speed;
        self.fertility = attributes.fertility;
        self.consumption_rate = attributes.consumption_rate;
        self.set_stamina(attributes.stamina);
    }

    pub fn is_alive(&self) -> bool {
        self.size > DEATH_THRESHOLD
    }

    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.size / 2.0)
    }

    /// Radius test around the centre, used for hover and inspection.
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.center().distance(point) <= self.size / 2.0
    }

    /// Drops the current target and returns to wandering.
    pub fn release_target(&mut self) {
        self.target = None;
        self.state = GoatState::Wandering;
    }

    /// Passive stamina loss scaled by size; an exhausted goat starves.
    pub fn decay_stamina(&mut self) {
        let loss = STAMINA_DECAY_RATE * (self.size / REFERENCE_SIZE);
        self.stamina = (self.stamina - loss).max(0.0);
        if self.stamina <= 0.0 {
            self.size -= STARVATION_LOSS;
        }
    }

    /// Steps straight toward `target` at full speed. Zero distance means no movement.
    pub fn move_towards(&mut self, target: Vec2) {
        let offset = target - self.position;
        let distance = offset.length();
        if distance > 0.0 {
            self.position += offset / distance * self.speed;
        }
    }

    /// Random walk that turns every few dozen ticks and stays inside `bounds`.
    pub fn wander<R: Rng + ?Sized>(&mut self, bounds: WorldBounds, rng: &mut R) {
        if self.steps_in_direction >= self.steps_until_turn {
            self.wander_direction = random_direction(rng);
            self.steps_in_direction = 0;
            self.steps_until_turn = rng.gen_range(WANDER_STEPS);
        }

        self.position += self.wander_direction * self.speed;
        self.position = bounds.clamp_box(self.position, self.size);
        self.steps_in_direction += 1;
    }

    /// Axis-aligned overlap between the goat's and the cabbage's bounding squares.
    /// Touching edges count as overlap.
    pub fn overlaps(&self, cabbage: &Cabbage) -> bool {
        let goat_min = self.position;
        let goat_max = self.position + Vec2::splat(self.size);
        let cabbage_min = cabbage.position();
        let cabbage_max = cabbage.position() + Vec2::splat(cabbage.size());

        let horizontal = goat_max.x >= cabbage_min.x && goat_min.x <= cabbage_max.x;
        let vertical = goat_max.y >= cabbage_min.y && goat_min.y <= cabbage_max.y;
        horizontal && vertical
    }

    /// One tick of consumption.
    ///
    /// Stamina gain uses the cabbage size before this tick's bite, so the divisor
    /// is always positive.
    pub fn bite(&mut self, cabbage: &mut Cabbage) -> Bite {
        if cabbage.is_depleted() {
            cabbage.release();
            self.release_target();
            return Bite::Finished;
        }

        let gain = (cabbage.nutrition() * self.consumption_rate / cabbage.size())
            .min(MAX_STAMINA - self.stamina);
        self.stamina = (self.stamina + gain).min(MAX_STAMINA);
        self.size += GROWTH_PER_BITE * self.fertility;

        cabbage.shrink(self.consumption_rate);
        if cabbage.is_depleted() {
            cabbage.release();
            self.release_target();
            Bite::Finished
        } else {
            Bite::Eating
        }
    }

    /// Advances this goat by one tick against the current cabbage set.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        cabbages: &mut Arena<Cabbage>,
        bounds: WorldBounds,
        rng: &mut R,
    ) -> Action {
        self.decay_stamina();
        if !self.is_alive() {
            return Action::Idle;
        }

        if self.state == GoatState::Eating {
            if let Some(id) = self.target {
                if let Some(cabbage) = cabbages.get_mut(id) {
                    return match self.bite(cabbage) {
                        Bite::Eating => Action::Ate(id),
                        Bite::Finished => {
                            trace!("cabbage {} eaten to the stalk", id);
                            Action::Finished(id)
                        }
                    };
                }
            }
            // Target vanished under us; look for a new one this tick
            self.release_target();
        }

        let Some(id) = find_nearest_unreserved(self, cabbages) else {
            self.state = GoatState::Wandering;
            self.wander(bounds, rng);
            return Action::Wandered;
        };

        let Some(cabbage) = cabbages.get_mut(id) else {
            return Action::Idle;
        };

        if self.overlaps(cabbage) {
            cabbage.reserve();
            self.state = GoatState::Eating;
            self.target = Some(id);
            trace!("goat claimed cabbage {}", id);
            Action::Claimed(id)
        } else {
            self.state = GoatState::Approaching;
            self.move_towards(cabbage.position());
            Action::Approached(id)
        }
    }
}

/// Diagonal unit step with each axis independently ±1.
fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let mut axis = || if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let x = axis();
    let y = axis();
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn goat_at(x: f32, y: f32, attributes: GoatAttributes) -> Goat {
        Goat::new(Vec2::new(x, y), attributes, &mut rng())
    }

    #[test]
    fn stamina_is_clamped_on_creation() {
        let goat = goat_at(0.0, 0.0, GoatAttributes { stamina: 150.0, ..Default::default() });
        assert_eq!(goat.stamina(), MAX_STAMINA);
        let goat = goat_at(0.0, 0.0, GoatAttributes { stamina: -3.0, ..Default::default() });
        assert_eq!(goat.stamina(), 0.0);
    }

    #[test]
    fn stamina_decay_scales_with_size() {
        let mut small = goat_at(0.0, 0.0, GoatAttributes { size: 20.0, ..Default::default() });
        let mut large = goat_at(0.0, 0.0, GoatAttributes { size: 40.0, ..Default::default() });
        small.decay_stamina();
        large.decay_stamina();
        assert!((small.stamina() - 99.5).abs() < 1e-5);
        assert!((large.stamina() - 99.0).abs() < 1e-5);
    }

    #[test]
    fn exhausted_goat_starves() {
        let mut goat = goat_at(0.0, 0.0, GoatAttributes { stamina: 0.2, ..Default::default() });
        goat.decay_stamina();
        assert_eq!(goat.stamina(), 0.0);
        assert!((goat.size - (20.0 - STARVATION_LOSS)).abs() < 1e-6);
    }

    #[test]
    fn move_towards_steps_at_speed() {
        let mut goat = goat_at(0.0, 0.0, GoatAttributes { speed: 2.0, ..Default::default() });
        goat.move_towards(Vec2::new(30.0, 40.0));
        assert!((goat.position - Vec2::new(1.2, 1.6)).length() < 1e-5);
    }

    #[test]
    fn move_towards_same_point_is_a_no_op() {
        let mut goat = goat_at(7.0, 7.0, GoatAttributes::default());
        goat.move_towards(Vec2::new(7.0, 7.0));
        assert_eq!(goat.position, Vec2::new(7.0, 7.0));
        assert!(goat.position.is_finite());
    }

    #[test]
    fn overlap_is_axis_aligned_and_inclusive() {
        let goat = goat_at(0.0, 0.0, GoatAttributes::default());
        assert!(goat.overlaps(&Cabbage::new(Vec2::new(20.0, 20.0), 10.0)));
        assert!(goat.overlaps(&Cabbage::new(Vec2::new(5.0, 15.0), 10.0)));
        assert!(!goat.overlaps(&Cabbage::new(Vec2::new(20.5, 0.0), 10.0)));
        assert!(!goat.overlaps(&Cabbage::new(Vec2::new(0.0, 21.0), 10.0)));
    }

    #[test]
    fn bite_uses_size_before_the_bite() {
        let mut goat = goat_at(
            0.0,
            0.0,
            GoatAttributes { stamina: 90.0, consumption_rate: 2.0, fertility: 0.5, ..Default::default() },
        );
        let mut cabbage = Cabbage::new(Vec2::ZERO, 10.0);
        cabbage.reserve();

        assert_eq!(goat.bite(&mut cabbage), Bite::Eating);
        assert_eq!(cabbage.size(), 8.0);
        assert!((goat.stamina() - 94.0).abs() < 1e-5);
        assert!((goat.size - 20.1).abs() < 1e-5);
        assert!(cabbage.is_reserved());
    }

    #[test]
    fn stamina_gain_is_capped_at_max() {
        let mut goat = goat_at(0.0, 0.0, GoatAttributes { stamina: 99.0, consumption_rate: 3.0, ..Default::default() });
        let mut cabbage = Cabbage::new(Vec2::ZERO, 30.0);
        goat.bite(&mut cabbage);
        assert_eq!(goat.stamina(), MAX_STAMINA);
    }

    #[test]
    fn last_bite_releases_everything() {
        let mut goat = goat_at(0.0, 0.0, GoatAttributes { consumption_rate: 3.0, ..Default::default() });
        let mut cabbages = Arena::new();
        let id = cabbages.insert(Cabbage::new(Vec2::new(5.0, 5.0), 3.0));
        let mut rng = rng();

        assert_eq!(goat.update(&mut cabbages, WorldBounds::new(100.0, 100.0), &mut rng), Action::Claimed(id));
        assert_eq!(goat.state(), GoatState::Eating);
        assert!(cabbages.get(id).unwrap().is_reserved());

        assert_eq!(goat.update(&mut cabbages, WorldBounds::new(100.0, 100.0), &mut rng), Action::Finished(id));
        let cabbage = cabbages.get(id).unwrap();
        assert!(cabbage.is_depleted());
        assert!(!cabbage.is_reserved());
        assert_eq!(goat.target(), None);
        assert_eq!(goat.state(), GoatState::Wandering);
    }

    #[test]
    fn approaches_distant_cabbage() {
        let mut goat = goat_at(0.0, 0.0, GoatAttributes { speed: 3.0, ..Default::default() });
        let mut cabbages = Arena::new();
        let id = cabbages.insert(Cabbage::new(Vec2::new(90.0, 0.0), 10.0));

        let action = goat.update(&mut cabbages, WorldBounds::new(200.0, 200.0), &mut rng());
        assert_eq!(action, Action::Approached(id));
        assert_eq!(goat.state(), GoatState::Approaching);
        assert_eq!(goat.target(), None);
        assert!((goat.position - Vec2::new(3.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn vanished_target_falls_back_to_seeking() {
        let mut goat = goat_at(0.0, 0.0, GoatAttributes::default());
        let mut cabbages = Arena::new();
        let first = cabbages.insert(Cabbage::new(Vec2::new(5.0, 5.0), 20.0));
        let bounds = WorldBounds::new(100.0, 100.0);
        let mut rng = rng();

        assert_eq!(goat.update(&mut cabbages, bounds, &mut rng), Action::Claimed(first));
        cabbages.remove(first);

        assert_eq!(goat.update(&mut cabbages, bounds, &mut rng), Action::Wandered);
        assert_eq!(goat.state(), GoatState::Wandering);
        assert_eq!(goat.target(), None);
    }

    #[test]
    fn dying_goat_does_not_act() {
        let mut goat = goat_at(0.0, 0.0, GoatAttributes { size: DEATH_THRESHOLD, ..Default::default() });
        let mut cabbages = Arena::new();
        cabbages.insert(Cabbage::new(Vec2::new(1.0, 1.0), 10.0));

        let action = goat.update(&mut cabbages, WorldBounds::new(100.0, 100.0), &mut rng());
        assert_eq!(action, Action::Idle);
        assert!(cabbages.values().all(|c| !c.is_reserved()));
    }

    #[test]
    fn wandering_stays_inside_bounds() {
        let bounds = WorldBounds::new(120.0, 90.0);
        let mut rng = rng();
        let mut goat = Goat::new(Vec2::new(60.0, 45.0), GoatAttributes { speed: 3.0, ..Default::default() }, &mut rng);

        for _ in 0..2_000 {
            goat.wander(bounds, &mut rng);
            assert!(goat.position.x >= 0.0 && goat.position.x <= bounds.width - goat.size);
            assert!(goat.position.y >= 0.0 && goat.position.y <= bounds.height - goat.size);
        }
    }

    #[test]
    fn wander_direction_is_diagonal() {
        let mut rng = rng();
        for _ in 0..50 {
            let direction = random_direction(&mut rng);
            assert_eq!(direction.x.abs(), 1.0);
            assert_eq!(direction.y.abs(), 1.0);
        }
    }
}
