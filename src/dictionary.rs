//! [Dictionary](https://inform-fiction.org/zmachine/standards/z1point1/sect13.html) lookup and lexical analysis
use std::cmp::Ordering;

use crate::{error::*, text, zmachine::ZMachine};

/// Dictionary table layout
struct Layout {
    separators: Vec<char>,
    entry_size: usize,
    /// Negative counts mark an unsorted dictionary
    entry_count: i16,
    entries: usize,
}

fn layout(zmachine: &ZMachine, dictionary: usize) -> Result<Layout, RuntimeError> {
    let separator_count = zmachine.read_byte(dictionary)? as usize;
    let mut separators = Vec::new();
    for i in 1..=separator_count {
        separators.push(zmachine.read_byte(dictionary + i)? as char);
    }

    let entry_size = zmachine.read_byte(dictionary + separator_count + 1)? as usize;
    let entry_count = zmachine.read_word(dictionary + separator_count + 2)? as i16;
    Ok(Layout {
        separators,
        entry_size,
        entry_count,
        entries: dictionary + separator_count + 4,
    })
}

/// Reads the encoded word of a dictionary entry
fn entry_words(zmachine: &ZMachine, address: usize) -> Result<Vec<u16>, RuntimeError> {
    let mut words = Vec::new();
    for i in 0..text::dictionary_words(zmachine.version()) {
        words.push(zmachine.read_word(address + (i * 2))?);
    }

    Ok(words)
}

/// Binary search of a sorted dictionary
///
/// # Returns
/// [Result] containing the address of the matching dictionary entry or 0 if not found or a [RuntimeError]
fn search_entry(zmachine: &ZMachine, layout: &Layout, word: &[u16]) -> Result<usize, RuntimeError> {
    let mut min = 0;
    let mut max = layout.entry_count as usize;
    while min < max {
        let pivot = min + ((max - min) / 2);
        let address = layout.entries + (pivot * layout.entry_size);
        match entry_words(zmachine, address)?.as_slice().cmp(word) {
            Ordering::Equal => return Ok(address),
            Ordering::Less => min = pivot + 1,
            Ordering::Greater => max = pivot,
        }
    }

    Ok(0)
}

/// Linear scan of an unsorted dictionary
fn scan_entry(zmachine: &ZMachine, layout: &Layout, word: &[u16]) -> Result<usize, RuntimeError> {
    for i in 0..layout.entry_count.unsigned_abs() as usize {
        let address = layout.entries + (i * layout.entry_size);
        if entry_words(zmachine, address)? == word {
            return Ok(address);
        }
    }

    Ok(0)
}

/// Finds a word in a dictionary
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `dictionary` - Byte address of the dictionary
/// * `word` - Word to look up, which is truncated to the dictionary resolution
///
/// # Returns
/// [Result] with the address of the dictionary entry, 0 if the word isn't present, or a [RuntimeError]
pub fn lookup(zmachine: &ZMachine, dictionary: usize, word: &str) -> Result<usize, RuntimeError> {
    let layout = layout(zmachine, dictionary)?;
    let encoded = text::encode_text(zmachine.version(), word);
    let entry = if layout.entry_count > 0 {
        search_entry(zmachine, &layout, &encoded)?
    } else {
        scan_entry(zmachine, &layout, &encoded)?
    };
    debug!(target: "app::input", "LEXICAL ANALYSIS: {:?} {:04x?} => ${:04x}", word, encoded, entry);
    Ok(entry)
}

/// Decodes every entry in a dictionary
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `dictionary` - Byte address of the dictionary
///
/// # Returns
/// [Result] with a vector of (entry address, word) tuples in table order or a [RuntimeError]
pub fn entries(
    zmachine: &ZMachine,
    dictionary: usize,
) -> Result<Vec<(usize, String)>, RuntimeError> {
    let layout = layout(zmachine, dictionary)?;
    let mut result = Vec::new();
    for i in 0..layout.entry_count.unsigned_abs() as usize {
        let address = layout.entries + (i * layout.entry_size);
        let words = entry_words(zmachine, address)?;
        result.push((address, text::from_vec(zmachine, &words, false)?));
    }

    Ok(result)
}

/// Splits input into (token, start index) pairs
///
/// Spaces separate tokens and are discarded; dictionary separators separate tokens and are tokens themselves.
/// Input bytes are ZSCII, so each byte is one character of the token.
fn tokens(data: &[u8], separators: &[char]) -> Vec<(String, usize)> {
    let mut result = Vec::new();
    let mut word = String::new();
    let mut word_start = 0;
    for (i, b) in data.iter().enumerate() {
        let c = text::zscii_char(*b as u16)
            .unwrap_or('?')
            .to_ascii_lowercase();
        if c == ' ' || separators.contains(&c) {
            if !word.is_empty() {
                result.push((word.clone(), word_start));
                word.clear();
            }
            if c != ' ' {
                result.push((c.to_string(), i));
            }
            word_start = i + 1;
        } else {
            word.push(c);
        }
    }

    if !word.is_empty() {
        result.push((word, word_start));
    }

    result
}

/// Reads the text from a text buffer
///
/// V1-4 buffers are zero-terminated from `text_buffer + 1`; V5+ buffers carry the length at `text_buffer + 1`.
fn buffer_text(zmachine: &ZMachine, text_buffer: usize) -> Result<Vec<u8>, RuntimeError> {
    let mut data = Vec::new();
    if zmachine.version() < 5 {
        let max = zmachine.read_byte(text_buffer)? as usize;
        for i in 1..=max {
            let b = zmachine.read_byte(text_buffer + i)?;
            if b == 0 {
                break;
            }
            data.push(b);
        }
    } else {
        let n = zmachine.read_byte(text_buffer + 1)? as usize;
        for i in 0..n {
            data.push(zmachine.read_byte(text_buffer + 2 + i)?);
        }
    }

    Ok(data)
}

/// Parse a text buffer into a parse buffer.
///
/// Each parsed token fills a 4-byte block: the dictionary entry address (or 0), the token length,
/// and the position of the token in the text buffer.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `text_buffer` - Text buffer address
/// * `parse_buffer` - Parse buffer address
/// * `dictionary` - Dictionary address
/// * `flag` - if `true`, blocks for tokens not in the dictionary are left unchanged
///
/// # Returns
/// Empty [Result] or a [RuntimeError]
pub fn parse_text(
    zmachine: &mut ZMachine,
    text_buffer: usize,
    parse_buffer: usize,
    dictionary: usize,
    flag: bool,
) -> Result<(), RuntimeError> {
    debug!(target: "app::input", "LEXICAL ANALYSIS: text @ {:04x}, parse @ {:04x}, dictionary @ {:04x}, skip {}", text_buffer, parse_buffer, dictionary, flag);
    let separators = layout(zmachine, dictionary)?.separators;
    let data = buffer_text(zmachine, text_buffer)?;
    let offset = if zmachine.version() < 5 { 1 } else { 2 };
    let max_words = zmachine.read_byte(parse_buffer)? as usize;

    let tokens = tokens(&data, &separators);
    let count = usize::min(tokens.len(), max_words);
    for (i, (token, start)) in tokens.iter().take(count).enumerate() {
        let entry = lookup(zmachine, dictionary, token)?;
        if entry == 0 && flag {
            continue;
        }

        let block = parse_buffer + 2 + (i * 4);
        zmachine.write_word(block, entry as u16)?;
        zmachine.write_byte(block + 2, token.chars().count() as u8)?;
        zmachine.write_byte(block + 3, (start + offset) as u8)?;
    }

    zmachine.write_byte(parse_buffer + 1, count as u8)
}

#[cfg(test)]
mod tests {
    use crate::{assert_ok, assert_ok_eq, test_util::*};

    use super::*;

    fn store_text(map: &mut [u8], text: &str) {
        if map[0] < 5 {
            for (i, b) in text.bytes().enumerate() {
                map[0x381 + i] = b;
            }
        } else {
            map[0x381] = text.len() as u8;
            for (i, b) in text.bytes().enumerate() {
                map[0x382 + i] = b;
            }
        }
    }

    #[test]
    fn test_tokens() {
        let separators = vec!['.', ','];
        assert_eq!(
            tokens(b"take lamp, then  go.", &separators),
            vec![
                ("take".to_string(), 0),
                ("lamp".to_string(), 5),
                (",".to_string(), 9),
                ("then".to_string(), 11),
                ("go".to_string(), 17),
                (".".to_string(), 19),
            ]
        );
        assert!(tokens(b"   ", &separators).is_empty());
    }

    #[test]
    fn test_lookup_v3() {
        let mut map = test_map(3);
        mock_dictionary(&mut map);
        let zmachine = mock_zmachine(map);
        assert_ok_eq!(lookup(&zmachine, 0x600, "hello"), 0x607);
        assert_ok_eq!(lookup(&zmachine, 0x600, "inventory"), 0x610);
        assert_ok_eq!(lookup(&zmachine, 0x600, "look"), 0x619);
        assert_ok_eq!(lookup(&zmachine, 0x600, "sailor"), 0x622);
        assert_ok_eq!(lookup(&zmachine, 0x600, "xyzzy"), 0);
        assert_ok_eq!(lookup(&zmachine, 0x600, "aaa"), 0);
        assert_ok_eq!(lookup(&zmachine, 0x600, "zzz"), 0);
    }

    #[test]
    fn test_lookup_v5() {
        let mut map = test_map(5);
        mock_dictionary(&mut map);
        let zmachine = mock_zmachine(map);
        assert_ok_eq!(lookup(&zmachine, 0x600, "hello"), 0x607);
        assert_ok_eq!(lookup(&zmachine, 0x600, "inventory"), 0x610);
        assert_ok_eq!(lookup(&zmachine, 0x600, "look"), 0x619);
        assert_ok_eq!(lookup(&zmachine, 0x600, "sailor"), 0x622);
        assert_ok_eq!(lookup(&zmachine, 0x600, "inventor"), 0);
    }

    #[test]
    fn test_lookup_unsorted() {
        let mut map = test_map(5);
        mock_custom_dictionary(&mut map, 0x700);
        let zmachine = mock_zmachine(map);
        assert_ok_eq!(lookup(&zmachine, 0x700, "xyzzy"), 0x707);
        assert_ok_eq!(lookup(&zmachine, 0x700, "plover"), 0x710);
        assert_ok_eq!(lookup(&zmachine, 0x700, "moon"), 0x719);
        assert_ok_eq!(lookup(&zmachine, 0x700, "hello"), 0);
    }

    #[test]
    fn test_entries() {
        let mut map = test_map(3);
        mock_dictionary(&mut map);
        let zmachine = mock_zmachine(map);
        let entries = assert_ok!(entries(&zmachine, 0x600));
        assert_eq!(
            entries,
            vec![
                (0x607, "hello".to_string()),
                (0x610, "invent".to_string()),
                (0x619, "look".to_string()),
                (0x622, "sailor".to_string()),
            ]
        );
    }

    #[test]
    fn test_entries_round_trip() {
        for version in [3, 5] {
            let mut map = test_map(version);
            mock_dictionary(&mut map);
            let zmachine = mock_zmachine(map);
            for (address, word) in assert_ok!(entries(&zmachine, 0x600)) {
                assert_ok_eq!(lookup(&zmachine, 0x600, &word), address);
            }
        }
    }

    #[test]
    fn test_parse_text_v3() {
        let mut map = test_map(3);
        mock_dictionary(&mut map);
        map[0x3A0] = 4;
        store_text(&mut map, "look, sailor");
        let mut zmachine = mock_zmachine(map);
        assert_ok!(parse_text(&mut zmachine, 0x380, 0x3A0, 0x600, false));
        assert_ok_eq!(zmachine.read_byte(0x3A1), 3);
        assert_ok_eq!(zmachine.read_word(0x3A2), 0x619);
        assert_ok_eq!(zmachine.read_byte(0x3A4), 4);
        assert_ok_eq!(zmachine.read_byte(0x3A5), 1);
        // ',' is not in the dictionary
        assert_ok_eq!(zmachine.read_word(0x3A6), 0);
        assert_ok_eq!(zmachine.read_byte(0x3A8), 1);
        assert_ok_eq!(zmachine.read_byte(0x3A9), 5);
        assert_ok_eq!(zmachine.read_word(0x3AA), 0x622);
        assert_ok_eq!(zmachine.read_byte(0x3AC), 6);
        assert_ok_eq!(zmachine.read_byte(0x3AD), 7);
    }

    #[test]
    fn test_parse_text_v5_max_words() {
        let mut map = test_map(5);
        mock_dictionary(&mut map);
        map[0x3A0] = 2;
        store_text(&mut map, "hello sailor look");
        let mut zmachine = mock_zmachine(map);
        assert_ok!(parse_text(&mut zmachine, 0x380, 0x3A0, 0x600, false));
        assert_ok_eq!(zmachine.read_byte(0x3A1), 2);
        assert_ok_eq!(zmachine.read_word(0x3A2), 0x607);
        assert_ok_eq!(zmachine.read_byte(0x3A4), 5);
        assert_ok_eq!(zmachine.read_byte(0x3A5), 2);
        assert_ok_eq!(zmachine.read_word(0x3A6), 0x622);
        assert_ok_eq!(zmachine.read_byte(0x3A9), 8);
        assert_ok_eq!(zmachine.read_word(0x3AA), 0);
    }

    #[test]
    fn test_parse_text_accented() {
        let mut map = test_map(5);
        mock_dictionary(&mut map);
        map[0x3A0] = 4;
        // "café look", with 'é' as ZSCII 170
        map[0x381] = 9;
        for (i, b) in [b'c', b'a', b'f', 170, b' ', b'l', b'o', b'o', b'k']
            .iter()
            .enumerate()
        {
            map[0x382 + i] = *b;
        }
        let mut zmachine = mock_zmachine(map);
        assert_ok!(parse_text(&mut zmachine, 0x380, 0x3A0, 0x600, false));
        assert_ok_eq!(zmachine.read_byte(0x3A1), 2);
        assert_ok_eq!(zmachine.read_word(0x3A2), 0);
        assert_ok_eq!(zmachine.read_byte(0x3A4), 4);
        assert_ok_eq!(zmachine.read_byte(0x3A5), 2);
        assert_ok_eq!(zmachine.read_word(0x3A6), 0x619);
        assert_ok_eq!(zmachine.read_byte(0x3A8), 4);
        assert_ok_eq!(zmachine.read_byte(0x3A9), 7);
    }

    #[test]
    fn test_tokens_zscii() {
        assert_eq!(
            tokens(&[b'C', b'a', b'f', 170], &[]),
            vec![("café".to_string(), 0)]
        );
    }

    #[test]
    fn test_parse_text_flag() {
        let mut map = test_map(5);
        mock_dictionary(&mut map);
        map[0x3A0] = 4;
        // A previous pass left an entry for the second word
        map[0x3A6] = 0x12;
        map[0x3A7] = 0x34;
        store_text(&mut map, "look plugh");
        let mut zmachine = mock_zmachine(map);
        assert_ok!(parse_text(&mut zmachine, 0x380, 0x3A0, 0x600, true));
        assert_ok_eq!(zmachine.read_word(0x3A2), 0x619);
        assert_ok_eq!(zmachine.read_word(0x3A6), 0x1234);
        assert_ok_eq!(zmachine.read_byte(0x3A1), 2);
    }
}
