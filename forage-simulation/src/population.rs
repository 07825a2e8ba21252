//! Population management: periodic cabbage regrowth and end-of-tick removal
//! of dead goats and depleted cabbages.

use forage_core::Arena;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

use crate::bounds::WorldBounds;
use crate::cabbage::Cabbage;
use crate::goat::Goat;
use crate::{CabbageId, GoatId};

/// Where and how large freshly spawned cabbages are.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSettings {
    pub choices: Vec<u32>,
    pub margin: f32,
    pub size_range: (f32, f32),
}

/// What one cleanup pass removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullReport {
    pub goats: Vec<GoatId>,
    pub cabbages: Vec<CabbageId>,
}

impl CullReport {
    pub fn is_empty(&self) -> bool {
        self.goats.is_empty() && self.cabbages.is_empty()
    }
}

/// Draws a batch size from `settings.choices` and inserts that many random cabbages.
pub fn spawn_cabbages<R: Rng + ?Sized>(
    cabbages: &mut Arena<Cabbage>,
    bounds: WorldBounds,
    settings: &SpawnSettings,
    rng: &mut R,
) -> Vec<CabbageId> {
    let count = settings.choices.choose(rng).copied().unwrap_or(0);
    (0..count)
        .map(|_| {
            let cabbage = Cabbage::random(bounds, settings.margin, settings.size_range, rng);
            cabbages.insert(cabbage)
        })
        .collect()
}

/// Removes dead goats and depleted cabbages, keeping the survivors consistent.
///
/// A removed goat gives up its reservation; a goat whose target was removed is
/// sent back to wandering.
pub fn cull(goats: &mut Arena<Goat>, cabbages: &mut Arena<Cabbage>) -> CullReport {
    let dead = goats.remove_where(|_, goat| !goat.is_alive());
    for (id, goat) in &dead {
        if let Some(cabbage) = goat.target().and_then(|target| cabbages.get_mut(target)) {
            cabbage.release();
        }
        debug!("goat {} died at size {:.2}", id, goat.size);
    }

    let depleted: SmallVec<[CabbageId; 8]> = cabbages
        .remove_where(|_, cabbage| cabbage.is_depleted())
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    if !depleted.is_empty() {
        forget_targets(goats, &depleted);
    }

    CullReport {
        goats: dead.into_iter().map(|(id, _)| id).collect(),
        cabbages: depleted.into_vec(),
    }
}

/// Resets every goat aiming at one of `removed`.
pub(crate) fn forget_targets(goats: &mut Arena<Goat>, removed: &[CabbageId]) {
    for (_, goat) in goats.iter_mut() {
        if goat.target().is_some_and(|target| removed.contains(&target)) {
            goat.release_target();
        }
    }
}
