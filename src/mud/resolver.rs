//! Object Target Resolution
//!
//! Resolves the "dot notation" players use to point at things: `sword`
//! picks the first sword, `2.sword` picks the second one. Resolution is a
//! pure function over an ordered candidate list, so the same helper serves
//! room items, inventory items and room NPCs.
//!
//! ## Rules
//! - **First token only**: `look 2.sword carefully` resolves `2.sword`.
//! - **Ordinal is filtered**: `2.sword` counts swords, not everything in the room.
//! - **Permissive ordinal**: `0.sword` or `9.sword` with two swords picks the first.
//!
//! ## Examples
//! ```
//! use mudcore::mud::resolver::resolve;
//!
//! let things = ["apple", "sword", "shield", "sword"];
//! let picked = resolve("2.sword", &things, |c, kw| *c == kw);
//! assert_eq!(picked, Some(&"sword"));
//! assert!(std::ptr::eq(picked.unwrap(), &things[3]));
//! ```

use crate::mud::types::{ItemRecord, NpcRecord, PlayerRecord, RoomRecord};
use crate::mud::world::World;

/// Parsed `ordinal.keyword` phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetQuery<'a> {
    pub keyword: &'a str,
    /// 1-based position among the keyword matches.
    pub ordinal: Option<usize>,
}

impl<'a> TargetQuery<'a> {
    /// Parse the first whitespace-delimited token of `arg`.
    pub fn parse(arg: &'a str) -> Self {
        let token = arg.split_whitespace().next().unwrap_or("");

        let digits = token.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && token.as_bytes().get(digits) == Some(&b'.') {
            let rest = &token[digits + 1..];
            let keyword = rest.split('.').next().unwrap_or("");
            // Overflowing ordinals degrade to "first match" like any other bad ordinal.
            let ordinal = token[..digits].parse::<usize>().ok().filter(|n| *n > 0);
            return Self { keyword, ordinal };
        }

        Self {
            keyword: token,
            ordinal: None,
        }
    }

    /// Pick from an already filtered match list.
    fn select<T>(&self, found: Vec<T>) -> Option<T> {
        let index = match self.ordinal {
            Some(n) if n <= found.len() => n - 1,
            _ => 0,
        };
        found.into_iter().nth(index)
    }
}

/// Resolve `query_text` against `candidates` using `keyword_test`.
///
/// Returns `None` only when no candidate matches the keyword.
pub fn resolve<'c, T, F>(query_text: &str, candidates: &'c [T], keyword_test: F) -> Option<&'c T>
where
    F: Fn(&T, &str) -> bool,
{
    let query = TargetQuery::parse(query_text);
    let found: Vec<&T> = candidates
        .iter()
        .filter(|candidate| keyword_test(candidate, query.keyword))
        .collect();
    query.select(found)
}

/// Find an item lying in `room`.
pub fn find_item_in_room(world: &World, room: &RoomRecord, query: &str) -> Option<ItemRecord> {
    let items: Vec<ItemRecord> = room.items.iter().filter_map(|id| world.item(id)).collect();
    resolve(query, &items, |item, keyword| item.has_keyword(keyword)).cloned()
}

/// Find an item carried by `player`, equipped or not.
pub fn find_item_in_inventory(world: &World, player: &PlayerRecord, query: &str) -> Option<ItemRecord> {
    let items: Vec<ItemRecord> = player
        .inventory
        .iter()
        .filter_map(|id| world.item(id))
        .collect();
    resolve(query, &items, |item, keyword| item.has_keyword(keyword)).cloned()
}

/// Find an NPC standing in `room`.
pub fn find_npc_in_room(world: &World, room: &RoomRecord, query: &str) -> Option<NpcRecord> {
    let npcs: Vec<NpcRecord> = room.npcs.iter().filter_map(|id| world.npc(id)).collect();
    resolve(query, &npcs, |npc, keyword| npc.has_keyword(keyword)).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_prefix(candidate: &&str, keyword: &str) -> bool {
        candidate.starts_with(keyword) && !keyword.is_empty()
    }

    #[test]
    fn test_parse_bare_keyword() {
        let q = TargetQuery::parse("sword");
        assert_eq!(q.keyword, "sword");
        assert_eq!(q.ordinal, None);
    }

    #[test]
    fn test_parse_ordinal_and_trailing_words() {
        let q = TargetQuery::parse("3.potion of healing");
        assert_eq!(q.keyword, "potion");
        assert_eq!(q.ordinal, Some(3));
    }

    #[test]
    fn test_parse_zero_and_huge_ordinals() {
        assert_eq!(TargetQuery::parse("0.key").ordinal, None);
        let huge = TargetQuery::parse("99999999999999999999999.key");
        assert_eq!(huge.ordinal, None);
        assert_eq!(huge.keyword, "key");
    }

    #[test]
    fn test_parse_extra_dots_keep_second_segment() {
        let q = TargetQuery::parse("2.red.potion");
        assert_eq!(q.keyword, "red");
        assert_eq!(q.ordinal, Some(2));
    }

    #[test]
    fn test_parse_digits_without_dot_is_keyword() {
        let q = TargetQuery::parse("42");
        assert_eq!(q.keyword, "42");
        assert_eq!(q.ordinal, None);
    }

    #[test]
    fn test_resolve_nth_among_filtered() {
        let things = ["sword#1", "apple", "sword#2", "sword#3"];
        assert_eq!(resolve("2.sword", &things, by_prefix), Some(&"sword#2"));
        assert_eq!(resolve("3.sword", &things, by_prefix), Some(&"sword#3"));
        assert_eq!(resolve("sword", &things, by_prefix), Some(&"sword#1"));
    }

    #[test]
    fn test_resolve_out_of_range_falls_back_to_first() {
        let things = ["sword#1", "sword#2"];
        assert_eq!(resolve("5.sword", &things, by_prefix), Some(&"sword#1"));
        assert_eq!(resolve("0.sword", &things, by_prefix), Some(&"sword#1"));
    }

    #[test]
    fn test_resolve_not_found() {
        let things = ["apple", "pear"];
        assert_eq!(resolve("sword", &things, by_prefix), None);
        assert_eq!(resolve("2.sword", &things, by_prefix), None);
        assert_eq!(resolve("", &things, by_prefix), None);

        let empty: [&str; 0] = [];
        assert_eq!(resolve("apple", &empty, by_prefix), None);
    }
}
