//! Externally triggered world mutations, applied between ticks.

use glam::Vec2;
use log::debug;

use crate::error::WorldError;
use crate::goat::GoatAttributes;
use crate::world::World;
use crate::{CabbageId, GoatId};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddCabbage { position: Vec2, size: f32 },
    AddGoat { position: Vec2, attributes: GoatAttributes },
    ModifyGoat { id: GoatId, attributes: GoatAttributes },
    ModifyCabbage { id: CabbageId, size: f32 },
    RemoveGoat { id: GoatId },
    RemoveCabbage { id: CabbageId },
    SetPaused { paused: bool },
    TogglePause,
}

/// What a successfully applied command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    CabbageAdded(CabbageId),
    GoatAdded(GoatId),
    Updated,
    Removed,
    Paused(bool),
}

impl World {
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome, WorldError> {
        debug!("applying command {:?}", command);
        let outcome = match command {
            Command::AddCabbage { position, size } => {
                CommandOutcome::CabbageAdded(self.add_cabbage(position, size)?)
            }
            Command::AddGoat { position, attributes } => {
                CommandOutcome::GoatAdded(self.add_goat(position, attributes)?)
            }
            Command::ModifyGoat { id, attributes } => {
                self.modify_goat(id, attributes)?;
                CommandOutcome::Updated
            }
            Command::ModifyCabbage { id, size } => {
                self.modify_cabbage(id, size)?;
                CommandOutcome::Updated
            }
            Command::RemoveGoat { id } => {
                self.remove_goat(id)?;
                CommandOutcome::Removed
            }
            Command::RemoveCabbage { id } => {
                self.remove_cabbage(id)?;
                CommandOutcome::Removed
            }
            Command::SetPaused { paused } => {
                self.set_paused(paused);
                CommandOutcome::Paused(paused)
            }
            Command::TogglePause => CommandOutcome::Paused(self.toggle_pause()),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;

    #[test]
    fn commands_round_through_the_world() {
        let mut world = World::new(&SimulationConfig::empty(300.0, 300.0, 8));

        let CommandOutcome::CabbageAdded(cabbage) = world
            .apply(Command::AddCabbage { position: Vec2::new(10.0, 10.0), size: 15.0 })
            .unwrap()
        else {
            panic!("expected a new cabbage");
        };
        assert_eq!(world.cabbage(cabbage).unwrap().size(), 15.0);

        assert_eq!(
            world.apply(Command::ModifyCabbage { id: cabbage, size: 4.0 }),
            Ok(CommandOutcome::Updated)
        );
        assert_eq!(world.apply(Command::RemoveCabbage { id: cabbage }), Ok(CommandOutcome::Removed));
        assert_eq!(
            world.apply(Command::RemoveCabbage { id: cabbage }),
            Err(WorldError::UnknownCabbage(cabbage))
        );
    }

    #[test]
    fn pause_commands_report_new_state() {
        let mut world = World::new(&SimulationConfig::empty(300.0, 300.0, 8));
        assert_eq!(world.apply(Command::TogglePause), Ok(CommandOutcome::Paused(true)));
        assert_eq!(world.apply(Command::SetPaused { paused: false }), Ok(CommandOutcome::Paused(false)));
        assert!(!world.is_paused());
    }

    #[test]
    fn stale_goat_handle_is_rejected() {
        let mut world = World::new(&SimulationConfig::empty(300.0, 300.0, 8));
        let goat = world.add_goat(Vec2::new(20.0, 20.0), GoatAttributes::default()).unwrap();
        world.remove_goat(goat).unwrap();
        // The slot is recycled with a new generation
        let replacement = world.add_goat(Vec2::new(20.0, 20.0), GoatAttributes::default()).unwrap();
        assert_eq!(replacement.index(), goat.index());

        let result = world.apply(Command::ModifyGoat { id: goat, attributes: GoatAttributes::default() });
        assert_eq!(result, Err(WorldError::UnknownGoat(goat)));
    }

    #[test]
    fn rejected_add_leaves_world_unchanged() {
        let mut world = World::new(&SimulationConfig::empty(300.0, 300.0, 8));
        let result = world.apply(Command::AddGoat {
            position: Vec2::new(20.0, 20.0),
            attributes: GoatAttributes { size: -1.0, ..Default::default() },
        });
        assert_eq!(result, Err(WorldError::InvalidAttribute { field: "size", value: -1.0 }));

        let result = world.apply(Command::AddCabbage { position: Vec2::new(5.0, 5.0), size: 0.0 });
        assert_eq!(result, Err(WorldError::InvalidCabbageSize(0.0)));
        assert_eq!(world.goat_count() + world.cabbage_count(), 0);
    }
}
