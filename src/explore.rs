//! Heuristic views of the game world for hosts exploring a game
//!
//! Nothing here changes machine state.  Room and player detection follow conventions common to
//! Infocom and Inform games and can be wrong for games that don't follow them.
use std::collections::BTreeMap;

use regex::Regex;

use crate::{
    dictionary,
    error::RuntimeError,
    object::{self, attribute, property},
    text,
    zmachine::ZMachine,
};

/// Highest object number considered when scanning the object tree
const MAX_SCAN_OBJECT: usize = 255;
/// Highest object number considered when looking for the player
const MAX_PLAYER_OBJECT: usize = 30;
/// Highest plausible room number held in global 0
const MAX_ROOM_GLOBAL: u16 = 1000;
/// Attribute marking objects that can be picked up
const ATTRIBUTE_TAKEABLE: u8 = 17;
/// Rooms carry at least this many properties, typically exits
const ROOM_PROPERTY_COUNT: usize = 3;

const DIRECTIONS: &[&str] = &[
    "n", "s", "e", "w", "north", "south", "east", "west", "ne", "nw", "se", "sw", "northeast",
    "northwest", "southeast", "southwest", "up", "down", "u", "d", "in", "out", "enter", "exit",
    "northe", "northw", "southe", "southw",
];

const VERBS: &[&str] = &[
    "take", "get", "drop", "put", "give", "throw", "open", "close", "shut", "read", "examine",
    "look", "x", "l", "push", "pull", "turn", "move", "lift", "light", "unlock", "lock", "eat",
    "drink", "wear", "remove", "attack", "kill", "hit", "tie", "untie", "pour", "fill", "empty",
    "climb", "break", "cut", "dig", "wait", "z", "jump", "sleep", "wake", "save", "restore",
    "quit", "inventory", "i", "score", "ask", "tell", "say", "shout", "yell", "whisper", "sing",
    "swim", "wave", "point", "rub", "touch", "feel", "smell", "listen", "taste", "search", "find",
    "follow", "buy", "sell", "count",
];

const PREPOSITIONS: &[&str] = &[
    "to", "at", "in", "on", "with", "from", "into", "onto", "under", "behind", "through", "about",
    "for", "around", "across", "over", "off", "out", "up", "down", "away", "toward", "towards",
];

const ARTICLES: &[&str] = &["a", "an", "the", "some", "any", "all", "my", "your"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Dictionary words grouped by part of speech
pub struct WordTypes {
    pub verbs: Vec<String>,
    pub nouns: Vec<String>,
    pub adjectives: Vec<String>,
    pub directions: Vec<String>,
    pub prepositions: Vec<String>,
    pub other: Vec<String>,
}

fn object_count(zmachine: &ZMachine) -> usize {
    object::object_count(zmachine).unwrap_or(0)
}

fn last_object(zmachine: &ZMachine) -> usize {
    object_count(zmachine).min(MAX_SCAN_OBJECT)
}

fn parent(zmachine: &ZMachine, object: usize) -> usize {
    object::parent(zmachine, object).unwrap_or(0)
}

/// Object short name, or an empty string if it can't be decoded or the object doesn't exist
fn name(zmachine: &ZMachine, object: usize) -> String {
    if object == 0 || object > object_count(zmachine) {
        String::new()
    } else {
        property::short_name(zmachine, object).unwrap_or_default()
    }
}

/// Objects with a name whose parent is `parent`, skipping any in `exclude`
fn children(zmachine: &ZMachine, of: usize, exclude: &[usize]) -> Vec<(usize, String)> {
    (1..=last_object(zmachine))
        .filter(|o| !exclude.contains(o) && parent(zmachine, *o) == of)
        .map(|o| (o, name(zmachine, o)))
        .filter(|(_, n)| !n.is_empty())
        .collect()
}

/// Find the object that holds the rooms
///
/// Rooms are the objects with at least 3 properties; the container is the parent of the most of
/// them.  Ties go to the lowest object number.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
///
/// # Returns
/// [Option] with the container object number or [None]
pub fn rooms_container(zmachine: &ZMachine) -> Option<usize> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for o in 1..=last_object(zmachine) {
        let p = parent(zmachine, o);
        if p > 0
            && property::properties(zmachine, o)
                .map(|p| p.len())
                .unwrap_or(0)
                >= ROOM_PROPERTY_COUNT
        {
            *counts.entry(p).or_default() += 1;
        }
    }

    let mut container = None;
    let mut most = 0;
    for (p, count) in counts {
        if count > most {
            container = Some(p);
            most = count;
        }
    }

    container
}

pub fn is_room(zmachine: &ZMachine, object: usize) -> bool {
    object > 0
        && match rooms_container(zmachine) {
            Some(c) => parent(zmachine, object) == c,
            None => false,
        }
}

/// Find the player object
///
/// The player is one of the first objects in a room; one with a player-like name is preferred.
/// The result is cached until the machine restarts.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
///
/// # Returns
/// [Option] with the player object number or [None]
pub fn player_object(zmachine: &ZMachine) -> Option<usize> {
    if let Some(player) = zmachine.cached_player() {
        return Some(player);
    }

    let container = rooms_container(zmachine)?;
    let last = usize::min(last_object(zmachine), MAX_PLAYER_OBJECT);
    let candidates: Vec<usize> = (1..=last)
        .filter(|o| {
            let p = parent(zmachine, *o);
            p > 0 && parent(zmachine, p) == container
        })
        .collect();

    let named = match Regex::new(r"(?i)player|adventurer|you|cretin|protagonist") {
        Ok(r) => candidates
            .iter()
            .find(|o| r.is_match(&name(zmachine, **o)))
            .copied(),
        Err(e) => {
            error!(target: "app::trace", "Internal error with player name regex: {}", e);
            None
        }
    };

    let player = named.or_else(|| candidates.first().copied())?;
    debug!(target: "app::trace", "Player object is {} ({})", player, name(zmachine, player));
    zmachine.cache_player(player);
    Some(player)
}

/// Best guess at the room the player is in
///
/// Global 0 is used when it holds a plausible object number with a name, otherwise the player's
/// parent.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
///
/// # Returns
/// [Option] with the room object number or [None]
pub fn current_room(zmachine: &ZMachine) -> Option<usize> {
    let room = zmachine.global(0).unwrap_or(0);
    if room > 0 && room < MAX_ROOM_GLOBAL && !name(zmachine, room as usize).is_empty() {
        return Some(room as usize);
    }

    if let Some(player) = player_object(zmachine) {
        let p = parent(zmachine, player);
        if p > 0 && p < MAX_ROOM_GLOBAL as usize && !name(zmachine, p).is_empty() {
            return Some(p);
        }
    }

    if room > 0 && !name(zmachine, room as usize).is_empty() {
        Some(room as usize)
    } else {
        None
    }
}

pub fn current_room_name(zmachine: &ZMachine) -> Option<String> {
    current_room(zmachine).map(|r| name(zmachine, r))
}

/// Every room with a name
pub fn all_rooms(zmachine: &ZMachine) -> Vec<(usize, String)> {
    match rooms_container(zmachine) {
        Some(c) => children(zmachine, c, &[]),
        None => Vec::new(),
    }
}

/// Objects in a room, not counting rooms
pub fn objects_in_room(zmachine: &ZMachine, room: usize) -> Vec<(usize, String)> {
    let rooms: Vec<usize> = all_rooms(zmachine).into_iter().map(|(r, _)| r).collect();
    children(zmachine, room, &rooms)
}

pub fn takeable_objects_in_room(zmachine: &ZMachine, room: usize) -> Vec<(usize, String)> {
    objects_in_room(zmachine, room)
        .into_iter()
        .filter(|(o, _)| attribute::value(zmachine, *o, ATTRIBUTE_TAKEABLE).unwrap_or(false))
        .collect()
}

/// Objects carried by the player
pub fn inventory(zmachine: &ZMachine) -> Vec<(usize, String)> {
    match player_object(zmachine) {
        Some(p) => children(zmachine, p, &[]),
        None => Vec::new(),
    }
}

fn known(list: &[&str], word: &str) -> bool {
    list.contains(&word)
}

/// Classify a word from fixed word lists
///
/// Dictionary words may be truncated, so a verb matches when the word is a full-width prefix of a
/// known verb.
fn classify(types: &mut WordTypes, word: String, width: usize) {
    let lower = word.to_lowercase();
    let prefix: String = lower.chars().take(6).collect();
    if known(DIRECTIONS, &lower) {
        types.directions.push(word);
    } else if known(VERBS, &lower)
        || known(VERBS, &prefix)
        || (lower.len() == width && VERBS.iter().any(|v| v.starts_with(&lower)))
    {
        types.verbs.push(word);
    } else if known(PREPOSITIONS, &lower) {
        types.prepositions.push(word);
    } else if known(ARTICLES, &lower) {
        types.other.push(word);
    } else {
        types.nouns.push(word);
    }
}

/// Group dictionary words by part of speech
///
/// Infocom dictionaries record a part of speech in the byte following the encoded word.  When no
/// entry has a recognised type byte, words are classified from fixed word lists instead.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
///
/// # Returns
/// [Result] with the grouped words or a [RuntimeError]
pub fn dictionary_words_by_type(zmachine: &ZMachine) -> Result<WordTypes, RuntimeError> {
    let dictionary = zmachine.header().dictionary();
    let separators = zmachine.read_byte(dictionary)? as usize;
    let entry_size = zmachine.read_byte(dictionary + separators + 1)? as usize;
    let word_bytes = if zmachine.version() < 4 { 4 } else { 6 };

    let mut words = Vec::new();
    let mut typed = false;
    for (address, word) in dictionary::entries(zmachine, dictionary)? {
        let word_type = if entry_size > word_bytes {
            zmachine.read_byte(address + word_bytes)?
        } else {
            0
        };
        if matches!(word_type, 0x41 | 0x80 | 0x22 | 0x13 | 0x18 | 0x33 | 0x08) {
            typed = true;
        }
        words.push((word.trim().to_string(), word_type));
    }

    let mut types = WordTypes::default();
    let width = text::dictionary_words(zmachine.version()) * 3;
    for (word, word_type) in words {
        if typed {
            match word_type {
                0x41 => types.verbs.push(word),
                0x80 => types.nouns.push(word),
                0x22 => types.adjectives.push(word),
                0x13 | 0x18 | 0x33 => types.directions.push(word),
                0x08 => types.prepositions.push(word),
                _ => types.other.push(word),
            }
        } else {
            classify(&mut types, word, width);
        }
    }

    Ok(types)
}

#[cfg(test)]
mod tests {
    use crate::{assert_ok, assert_some_eq, test_util::*};

    use super::*;

    fn encoded(word: &str) -> Vec<u16> {
        text::encode_text(3, word)
    }

    fn world() -> Vec<u8> {
        let mut map = test_map(3);
        mock_object(&mut map, 1, encoded("rooms"), (0, 0, 2));
        mock_object(&mut map, 2, encoded("attic"), (1, 3, 4));
        mock_properties(&mut map, 2, &[(30, &vec![3]), (29, &vec![0]), (28, &vec![0])]);
        mock_object(&mut map, 3, encoded("hall"), (1, 0, 0));
        mock_properties(&mut map, 3, &[(30, &vec![0]), (29, &vec![2]), (28, &vec![0])]);
        mock_object(&mut map, 4, encoded("lamp"), (2, 5, 0));
        mock_attributes(&mut map, 4, &[0, 0, 0x40, 0]);
        mock_object(&mut map, 5, encoded("you"), (2, 0, 6));
        mock_object(&mut map, 6, encoded("key"), (5, 0, 0));
        map
    }

    #[test]
    fn test_rooms() {
        let zmachine = mock_zmachine(world());
        assert_some_eq!(rooms_container(&zmachine), 1);
        assert!(is_room(&zmachine, 2));
        assert!(is_room(&zmachine, 3));
        assert!(!is_room(&zmachine, 4));
        assert!(!is_room(&zmachine, 1));
        assert_eq!(
            all_rooms(&zmachine),
            vec![(2, "attic".to_string()), (3, "hall".to_string())]
        );
    }

    #[test]
    fn test_rooms_container_tie() {
        let mut map = world();
        // One room in each of two containers
        mock_object(&mut map, 3, encoded("hall"), (6, 0, 0));
        let zmachine = mock_zmachine(map);
        assert_some_eq!(rooms_container(&zmachine), 1);
    }

    #[test]
    fn test_no_rooms() {
        let mut map = test_map(3);
        mock_object(&mut map, 1, encoded("thing"), (0, 0, 0));
        let zmachine = mock_zmachine(map);
        assert!(rooms_container(&zmachine).is_none());
        assert!(player_object(&zmachine).is_none());
        assert!(all_rooms(&zmachine).is_empty());
        assert!(inventory(&zmachine).is_empty());
    }

    #[test]
    fn test_player_by_name() {
        let zmachine = mock_zmachine(world());
        assert_some_eq!(player_object(&zmachine), 5);
    }

    #[test]
    fn test_player_fallback() {
        let mut map = world();
        mock_object(&mut map, 5, encoded("me"), (2, 0, 6));
        let zmachine = mock_zmachine(map);
        assert_some_eq!(player_object(&zmachine), 4);
    }

    #[test]
    fn test_player_cached_until_restart() {
        let mut zmachine = mock_zmachine(world());
        assert_some_eq!(player_object(&zmachine), 5);
        assert_ok!(object::remove(&mut zmachine, 5));
        assert_some_eq!(player_object(&zmachine), 5);
        assert_ok!(zmachine.restart());
        assert_ok!(object::remove(&mut zmachine, 5));
        assert_some_eq!(player_object(&zmachine), 4);
    }

    #[test]
    fn test_current_room_global() {
        let mut map = world();
        set_variable(&mut map, 0x10, 3);
        let zmachine = mock_zmachine(map);
        assert_some_eq!(current_room(&zmachine), 3);
        assert_some_eq!(current_room_name(&zmachine), "hall");
        assert_some_eq!(zmachine.current_room(), 3);
    }

    #[test]
    fn test_current_room_player_parent() {
        for global in [0, 1500, 9] {
            let mut map = world();
            set_variable(&mut map, 0x10, global);
            let zmachine = mock_zmachine(map);
            assert_some_eq!(current_room(&zmachine), 2);
        }
    }

    #[test]
    fn test_current_room_none() {
        let mut map = test_map(3);
        mock_object(&mut map, 1, vec![], (0, 0, 0));
        let zmachine = mock_zmachine(map);
        assert!(current_room(&zmachine).is_none());
        assert!(current_room_name(&zmachine).is_none());
    }

    #[test]
    fn test_objects_in_room() {
        let zmachine = mock_zmachine(world());
        assert_eq!(
            objects_in_room(&zmachine, 2),
            vec![(4, "lamp".to_string()), (5, "you".to_string())]
        );
        assert_eq!(
            takeable_objects_in_room(&zmachine, 2),
            vec![(4, "lamp".to_string())]
        );
        assert!(objects_in_room(&zmachine, 1).is_empty());
        assert_eq!(inventory(&zmachine), vec![(6, "key".to_string())]);
    }

    #[test]
    fn test_words_by_type_bytes() {
        let mut map = test_map(3);
        mock_dictionary(&mut map);
        let zmachine = mock_zmachine(map);
        let types = assert_ok!(dictionary_words_by_type(&zmachine));
        assert_eq!(types.verbs, vec!["invent", "look"]);
        assert_eq!(types.nouns, vec!["hello", "sailor"]);
        assert!(types.directions.is_empty());
    }

    #[test]
    fn test_words_by_word_list() {
        for version in [3, 5] {
            let mut map = test_map(version);
            mock_dictionary(&mut map);
            let offset = if version < 4 { 4 } else { 6 };
            for entry in [0x607, 0x610, 0x619, 0x622] {
                map[entry + offset] = 0;
            }
            let zmachine = mock_zmachine(map);
            let types = assert_ok!(dictionary_words_by_type(&zmachine));
            assert_eq!(types.verbs.len(), 2);
            assert_eq!(types.verbs[1], "look");
            assert_eq!(types.nouns, vec!["hello", "sailor"]);
        }
    }

    #[test]
    fn test_classify() {
        let mut types = WordTypes::default();
        for word in ["north", "take", "with", "the", "brass", "northw", "examin"] {
            classify(&mut types, word.to_string(), 6);
        }
        assert_eq!(types.directions, vec!["north", "northw"]);
        assert_eq!(types.verbs, vec!["take", "examin"]);
        assert_eq!(types.prepositions, vec!["with"]);
        assert_eq!(types.other, vec!["the"]);
        assert_eq!(types.nouns, vec!["brass"]);
    }
}
