use forage_core::Handle;
use forage_simulation::{Cabbage, Goat, GoatState, World, WorldStats};
use serde::{Deserialize, Serialize};

/// Exported view of one cabbage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CabbageRecord {
    pub id: Handle,
    pub x: f32, // Use separate fields instead of array
    pub y: f32,
    pub size: f32,
    pub nutrition: f32,
    pub reserved: bool,
}

impl CabbageRecord {
    pub fn new(id: Handle, cabbage: &Cabbage) -> Self {
        Self {
            id,
            x: cabbage.position().x,
            y: cabbage.position().y,
            size: cabbage.size(),
            nutrition: cabbage.nutrition(),
            reserved: cabbage.is_reserved(),
        }
    }
}

/// Exported view of one goat.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GoatRecord {
    pub id: Handle,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub stamina: f32,
    pub speed: f32,
    pub fertility: f32,
    pub consumption_rate: f32,
    pub state: GoatState,
    pub target: Option<Handle>,
}

impl GoatRecord {
    pub fn new(id: Handle, goat: &Goat) -> Self {
        Self {
            id,
            x: goat.position.x,
            y: goat.position.y,
            size: goat.size,
            stamina: goat.stamina(),
            speed: goat.speed,
            fertility: goat.fertility,
            consumption_rate: goat.consumption_rate,
            state: goat.state(),
            target: goat.target(),
        }
    }
}

/// Complete simulation state for serialization
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub paused: bool,
    pub stats: WorldStats,
    pub goats: Vec<GoatRecord>,
    pub cabbages: Vec<CabbageRecord>,
}

impl WorldSnapshot {
    pub fn capture(world: &World) -> Self {
        Self {
            tick: world.tick_count(),
            paused: world.is_paused(),
            stats: world.stats(),
            goats: world.goats().map(|(id, goat)| GoatRecord::new(id, goat)).collect(),
            cabbages: world
                .cabbages()
                .map(|(id, cabbage)| CabbageRecord::new(id, cabbage))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forage_simulation::{GoatAttributes, SimulationConfig};
    use glam::Vec2;

    #[test]
    fn capture_reflects_world() {
        let mut world = World::new(&SimulationConfig::empty(200.0, 200.0, 3));
        let cabbage = world.add_cabbage(Vec2::new(40.0, 40.0), 12.0).unwrap();
        let goat = world.add_goat(Vec2::new(40.0, 40.0), GoatAttributes::default()).unwrap();
        world.tick();

        let snapshot = WorldSnapshot::capture(&world);
        assert_eq!(snapshot.tick, 1);
        assert!(!snapshot.paused);
        assert_eq!(snapshot.cabbages.len(), 1);
        assert_eq!(snapshot.goats.len(), 1);

        let record = &snapshot.goats[0];
        assert_eq!(record.id, goat);
        assert_eq!(record.state, GoatState::Eating);
        assert_eq!(record.target, Some(cabbage));
        assert!(snapshot.cabbages[0].reserved);
        assert_eq!(snapshot.cabbages[0].nutrition, 24.0);
    }
}
