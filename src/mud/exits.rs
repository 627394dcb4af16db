//! Prefix matching of typed directions against a room's exits.

use crate::mud::types::Exit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitMatch<'a> {
    None,
    Unambiguous(&'a Exit),
    /// Every exit the prefix could mean, in room order.
    Ambiguous(Vec<&'a Exit>),
}

/// Match `partial` against the exit directions of a room.
///
/// An exact direction name always wins, so `north` is not ambiguous next to
/// `northeast`. Otherwise the match is an anchored, case-sensitive prefix.
pub fn match_exit<'a>(partial: &str, exits: &'a [Exit]) -> ExitMatch<'a> {
    if partial.is_empty() {
        return ExitMatch::None;
    }

    if let Some(exact) = exits.iter().find(|e| e.direction == partial) {
        return ExitMatch::Unambiguous(exact);
    }

    let mut found: Vec<&Exit> = exits
        .iter()
        .filter(|e| e.direction.starts_with(partial))
        .collect();

    match found.len() {
        0 => ExitMatch::None,
        1 => ExitMatch::Unambiguous(found.remove(0)),
        _ => ExitMatch::Ambiguous(found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exits(dirs: &[&str]) -> Vec<Exit> {
        dirs.iter().map(|d| Exit::new(d, &format!("{}_room", d))).collect()
    }

    #[test]
    fn test_prefix_shared_by_two_exits_is_ambiguous() {
        let exits = exits(&["north", "northeast"]);
        match match_exit("n", &exits) {
            ExitMatch::Ambiguous(all) => {
                let dirs: Vec<&str> = all.iter().map(|e| e.direction.as_str()).collect();
                assert_eq!(dirs, vec!["north", "northeast"]);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_direction_wins() {
        let exits = exits(&["north", "northeast"]);
        assert_eq!(match_exit("north", &exits), ExitMatch::Unambiguous(&exits[0]));
        assert_eq!(match_exit("northe", &exits), ExitMatch::Unambiguous(&exits[1]));
    }

    #[test]
    fn test_no_match() {
        let exits = exits(&["north"]);
        assert_eq!(match_exit("s", &exits), ExitMatch::None);
        assert_eq!(match_exit("", &exits), ExitMatch::None);
        assert_eq!(match_exit("north2", &exits), ExitMatch::None);
    }

    #[test]
    fn test_match_is_case_sensitive_and_anchored() {
        let exits = exits(&["north", "up"]);
        assert_eq!(match_exit("N", &exits), ExitMatch::None);
        assert_eq!(match_exit("orth", &exits), ExitMatch::None);
        assert_eq!(match_exit("u", &exits), ExitMatch::Unambiguous(&exits[1]));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let exits = exits(&["north"]);
        assert_eq!(match_exit(".*", &exits), ExitMatch::None);
    }
}
