use forage_core::Arena;
use glam::Vec2;
use log::{debug, info, trace};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::bounds::WorldBounds;
use crate::cabbage::Cabbage;
use crate::config::SimulationConfig;
use crate::error::WorldError;
use crate::goat::{Action, Goat, GoatAttributes, GoatState};
use crate::population::{self, CullReport, SpawnSettings};
use crate::{CabbageId, GoatId};

/// Counts of what happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub claimed: usize,
    pub bites: usize,
    pub finished: usize,
    pub culled: CullReport,
}

/// Population summary for logging and inspection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldStats {
    pub tick: u64,
    pub goats: usize,
    pub wandering: usize,
    pub approaching: usize,
    pub eating: usize,
    pub cabbages: usize,
    pub reserved_cabbages: usize,
    pub cabbage_mass: f32,
}

/// Owns every goat and cabbage and advances them one tick at a time.
pub struct World {
    bounds: WorldBounds,
    spawn: SpawnSettings,
    goats: Arena<Goat>,
    cabbages: Arena<Cabbage>,
    rng: SmallRng,
    paused: bool,
    tick: u64,
}

impl World {
    /// Builds a world and its initial random population.
    pub fn new(config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: &SimulationConfig, rng: SmallRng) -> Self {
        let mut world = Self {
            bounds: config.bounds(),
            spawn: SpawnSettings {
                choices: config.spawn_choices.clone(),
                margin: config.spawn_margin,
                size_range: config.cabbage_size_range,
            },
            goats: Arena::with_capacity(config.initial_goats),
            cabbages: Arena::with_capacity(config.initial_cabbages),
            rng,
            paused: false,
            tick: 0,
        };

        for _ in 0..config.initial_cabbages {
            let cabbage = Cabbage::random(
                world.bounds,
                world.spawn.margin,
                world.spawn.size_range,
                &mut world.rng,
            );
            world.cabbages.insert(cabbage);
        }
        for _ in 0..config.initial_goats {
            let goat = Goat::random(world.bounds, world.spawn.margin, &mut world.rng);
            world.goats.insert(goat);
        }

        info!(
            "World {}x{} initialised with {} goats and {} cabbages",
            world.bounds.width,
            world.bounds.height,
            world.goats.len(),
            world.cabbages.len()
        );
        world
    }

    /// Runs one simulation step. Returns `None` while paused.
    ///
    /// Every goat acts against the same cabbage set; removals happen only in
    /// the cleanup pass after all goats have acted.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.paused {
            return None;
        }
        self.tick += 1;

        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        for (id, goat) in self.goats.iter_mut() {
            match goat.update(&mut self.cabbages, self.bounds, &mut self.rng) {
                Action::Claimed(cabbage) => {
                    trace!("goat {} started eating cabbage {}", id, cabbage);
                    report.claimed += 1;
                }
                Action::Ate(_) => report.bites += 1,
                Action::Finished(_) => {
                    report.bites += 1;
                    report.finished += 1;
                }
                Action::Idle | Action::Wandered | Action::Approached(_) => {}
            }
        }

        report.culled = population::cull(&mut self.goats, &mut self.cabbages);
        if !report.culled.is_empty() {
            debug!(
                "tick {}: removed {} goats and {} cabbages",
                self.tick,
                report.culled.goats.len(),
                report.culled.cabbages.len()
            );
        }
        Some(report)
    }

    /// Adds a random batch of cabbages unless paused. Returns how many were added.
    pub fn spawn_if_active(&mut self) -> usize {
        if self.paused {
            return 0;
        }
        let spawned =
            population::spawn_cabbages(&mut self.cabbages, self.bounds, &self.spawn, &mut self.rng);
        debug!("spawned {} cabbages", spawned.len());
        spawned.len()
    }

    pub fn pause(&mut self) {
        self.set_paused(true);
    }

    pub fn resume(&mut self) {
        self.set_paused(false);
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            debug!("simulation {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    /// Flips the pause flag and returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Places a cabbage. Sizes that are not positive are refused.
    pub fn add_cabbage(&mut self, position: Vec2, size: f32) -> Result<CabbageId, WorldError> {
        check_cabbage_size(size)?;
        let id = self.cabbages.insert(Cabbage::new(position, size));
        debug!("added cabbage {} at ({:.1}, {:.1}) size {:.1}", id, position.x, position.y, size);
        Ok(id)
    }

    pub fn add_goat(&mut self, position: Vec2, attributes: GoatAttributes) -> Result<GoatId, WorldError> {
        attributes.validate()?;
        let goat = Goat::new(position, attributes, &mut self.rng);
        let id = self.goats.insert(goat);
        debug!("added goat {} at ({:.1}, {:.1})", id, position.x, position.y);
        Ok(id)
    }

    pub fn modify_goat(&mut self, id: GoatId, attributes: GoatAttributes) -> Result<(), WorldError> {
        let goat = self.goats.get_mut(id).ok_or(WorldError::UnknownGoat(id))?;
        attributes.validate()?;
        goat.apply_attributes(attributes);
        debug!("modified goat {}: {:?}", id, attributes);
        Ok(())
    }

    /// Resizes a cabbage and re-derives its nutrition. Refused while it is being eaten.
    pub fn modify_cabbage(&mut self, id: CabbageId, size: f32) -> Result<(), WorldError> {
        let cabbage = self.cabbages.get_mut(id).ok_or(WorldError::UnknownCabbage(id))?;
        if cabbage.is_reserved() {
            return Err(WorldError::CabbageReserved(id));
        }
        check_cabbage_size(size)?;
        cabbage.resize(size);
        debug!("modified cabbage {}: size {:.1}", id, size);
        Ok(())
    }

    /// Deletes a goat, releasing the cabbage it was eating.
    pub fn remove_goat(&mut self, id: GoatId) -> Result<Goat, WorldError> {
        let goat = self.goats.remove(id).ok_or(WorldError::UnknownGoat(id))?;
        if let Some(cabbage) = goat.target().and_then(|target| self.cabbages.get_mut(target)) {
            cabbage.release();
        }
        debug!("removed goat {}", id);
        Ok(goat)
    }

    /// Deletes a cabbage, sending its eater back to wandering.
    pub fn remove_cabbage(&mut self, id: CabbageId) -> Result<Cabbage, WorldError> {
        let cabbage = self.cabbages.remove(id).ok_or(WorldError::UnknownCabbage(id))?;
        population::forget_targets(&mut self.goats, &[id]);
        debug!("removed cabbage {}", id);
        Ok(cabbage)
    }

    pub fn goats(&self) -> impl Iterator<Item = (GoatId, &Goat)> {
        self.goats.iter()
    }

    pub fn cabbages(&self) -> impl Iterator<Item = (CabbageId, &Cabbage)> {
        self.cabbages.iter()
    }

    pub fn goat(&self, id: GoatId) -> Option<&Goat> {
        self.goats.get(id)
    }

    pub fn cabbage(&self, id: CabbageId) -> Option<&Cabbage> {
        self.cabbages.get(id)
    }

    pub fn goat_count(&self) -> usize {
        self.goats.len()
    }

    pub fn cabbage_count(&self) -> usize {
        self.cabbages.len()
    }

    /// First cabbage whose circle contains `point`.
    pub fn cabbage_at(&self, point: Vec2) -> Option<CabbageId> {
        self.cabbages
            .iter()
            .find(|(_, cabbage)| cabbage.contains_point(point))
            .map(|(id, _)| id)
    }

    /// First goat whose circle contains `point`.
    pub fn goat_at(&self, point: Vec2) -> Option<GoatId> {
        self.goats
            .iter()
            .find(|(_, goat)| goat.contains_point(point))
            .map(|(id, _)| id)
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn stats(&self) -> WorldStats {
        let mut stats = WorldStats {
            tick: self.tick,
            goats: self.goats.len(),
            cabbages: self.cabbages.len(),
            ..WorldStats::default()
        };
        for goat in self.goats.values() {
            match goat.state() {
                GoatState::Wandering => stats.wandering += 1,
                GoatState::Approaching => stats.approaching += 1,
                GoatState::Eating => stats.eating += 1,
            }
        }
        for cabbage in self.cabbages.values() {
            if cabbage.is_reserved() {
                stats.reserved_cabbages += 1;
            }
            stats.cabbage_mass += cabbage.size().max(0.0);
        }
        stats
    }
}

fn check_cabbage_size(size: f32) -> Result<(), WorldError> {
    if size > 0.0 && size.is_finite() {
        Ok(())
    } else {
        Err(WorldError::InvalidCabbageSize(size))
    }
}
