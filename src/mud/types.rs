use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PLAYER_SCHEMA_VERSION: u8 = 1;

/// Equipment slot used by `wield`.
pub const WIELD_SLOT: &str = "wield";

/// Directional link from one room to another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exit {
    pub direction: String,
    /// Destination room id.
    pub location: String,
    /// Shown to the occupants left behind instead of the default departure line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_message: Option<String>,
}

impl Exit {
    pub fn new(direction: &str, location: &str) -> Self {
        Self {
            direction: direction.to_string(),
            location: location.to_string(),
            leave_message: None,
        }
    }

    pub fn with_leave_message(mut self, message: &str) -> Self {
        self.leave_message = Some(message.to_string());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub exits: Vec<Exit>,
    /// Item instance ids in placement order.
    #[serde(default)]
    pub items: Vec<String>,
    /// NPC ids in placement order.
    #[serde(default)]
    pub npcs: Vec<String>,
    /// Name of the room script in the behavior registry.
    #[serde(default)]
    pub behavior: Option<String>,
}

impl RoomRecord {
    pub fn new(id: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            area: String::new(),
            exits: Vec::new(),
            items: Vec::new(),
            npcs: Vec::new(),
            behavior: None,
        }
    }

    pub fn with_area(mut self, area: &str) -> Self {
        self.area = area.to_string();
        self
    }

    pub fn with_exit(mut self, exit: Exit) -> Self {
        self.exits.push(exit);
        self
    }

    pub fn with_behavior(mut self, behavior: &str) -> Self {
        self.behavior = Some(behavior.to_string());
        self
    }

    pub fn add_item(&mut self, item_id: &str) {
        self.items.push(item_id.to_string());
    }

    pub fn remove_item(&mut self, item_id: &str) {
        self.items.retain(|id| id != item_id);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRecord {
    /// Instance id, unique per copy of an item.
    pub id: String,
    /// Template number shared by every copy; used to stack the inventory listing.
    pub vnum: String,
    pub short_desc: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub room: Option<String>,
    /// Username of the carrying player.
    #[serde(default)]
    pub inventory: Option<String>,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub behavior: Option<String>,
}

impl ItemRecord {
    pub fn new(id: &str, vnum: &str, short_desc: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            vnum: vnum.to_string(),
            short_desc: short_desc.to_string(),
            description: description.to_string(),
            keywords: Vec::new(),
            room: None,
            inventory: None,
            equipped: false,
            behavior: None,
        }
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_behavior(mut self, behavior: &str) -> Self {
        self.behavior = Some(behavior.to_string());
        self
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        keyword_matches(&self.keywords, keyword)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NpcRecord {
    pub id: String,
    pub short_desc: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub behavior: Option<String>,
}

fn default_level() -> u32 {
    1
}

impl NpcRecord {
    pub fn new(id: &str, short_desc: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            short_desc: short_desc.to_string(),
            description: description.to_string(),
            keywords: Vec::new(),
            level: default_level(),
            behavior: None,
        }
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_behavior(mut self, behavior: &str) -> Self {
        self.behavior = Some(behavior.to_string());
        self
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        keyword_matches(&self.keywords, keyword)
    }
}

fn keyword_matches(keywords: &[String], keyword: &str) -> bool {
    !keyword.is_empty() && keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerStats {
    pub hp: u32,
    pub max_hp: u32,
    pub level: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            hp: 20,
            max_hp: 20,
            level: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRecord {
    pub username: String,
    pub location: String,
    /// Combat lock: blocks movement and a handful of commands.
    #[serde(default)]
    pub in_combat: bool,
    /// Item instance ids in pickup order.
    #[serde(default)]
    pub inventory: Vec<String>,
    /// Slot name -> item instance id.
    #[serde(default)]
    pub equipment: BTreeMap<String, String>,
    #[serde(default)]
    pub stats: PlayerStats,
    pub schema_version: u8,
}

impl PlayerRecord {
    pub fn new(username: &str, location: &str) -> Self {
        Self {
            username: username.to_string(),
            location: location.to_string(),
            in_combat: false,
            inventory: Vec::new(),
            equipment: BTreeMap::new(),
            stats: PlayerStats::default(),
            schema_version: PLAYER_SCHEMA_VERSION,
        }
    }

    pub fn equipped(&self, slot: &str) -> Option<&str> {
        self.equipment.get(slot).map(String::as_str)
    }

    /// Status line redrawn after room events.
    pub fn prompt(&self) -> String {
        format!("[{}/{}hp] ", self.stats.hp, self.stats.max_hp)
    }
}
