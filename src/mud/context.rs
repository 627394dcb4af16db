//! Startup-built context handed to the dispatcher and every command.

use std::sync::Arc;

use crate::config::Config;
use crate::mud::behaviors;
use crate::mud::events::BehaviorRegistry;
use crate::mud::storage::PlayerSaver;
use crate::mud::world::World;

/// Tunables the commands read at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub start_room: String,
    /// `get` refuses once a player carries this many items.
    pub max_inventory: usize,
    /// Names per line in the `commands` listing.
    pub listing_columns: usize,
    /// Raw input is cut to this many characters before parsing.
    pub max_input_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_room: "square".to_string(),
            max_inventory: 20,
            listing_columns: 5,
            max_input_len: 256,
        }
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            start_room: config.world.start_room.clone(),
            max_inventory: config.limits.max_inventory,
            listing_columns: config.commands.columns,
            max_input_len: config.limits.max_input_len,
        }
    }
}

pub struct GameContext {
    pub world: Arc<World>,
    pub behaviors: BehaviorRegistry,
    pub saver: Option<Arc<dyn PlayerSaver>>,
    pub settings: Settings,
}

impl GameContext {
    /// Context with the stock behaviors registered and no persistence.
    pub fn new(world: Arc<World>) -> Self {
        let mut registry = BehaviorRegistry::new();
        behaviors::register_builtin(&mut registry);
        Self {
            world,
            behaviors: registry,
            saver: None,
            settings: Settings::default(),
        }
    }

    pub fn with_saver(mut self, saver: Arc<dyn PlayerSaver>) -> Self {
        self.saver = Some(saver);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_behaviors(mut self, behaviors: BehaviorRegistry) -> Self {
        self.behaviors = behaviors;
        self
    }
}
