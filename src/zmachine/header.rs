//! Game file [header](https://inform-fiction.org/zmachine/standards/z1point1/sect11.html)
use crate::{error::*, fatal_error};

use super::memory::word_value;

/// Size of the header record
pub const HEADER_SIZE: usize = 0x40;

pub enum HeaderField {
    Version = 0x00,
    Flags1 = 0x01,
    Release = 0x02,
    HighMark = 0x04,
    InitialPC = 0x06,
    Dictionary = 0x08,
    ObjectTable = 0x0A,
    GlobalTable = 0x0C,
    StaticMark = 0x0E,
    Flags2 = 0x10,
    Serial = 0x12,
    AbbreviationsTable = 0x18,
    FileLength = 0x1A,
    Checksum = 0x1C,
    InterpreterNumber = 0x1E,
    InterpreterVersion = 0x1F,
    ScreenLines = 0x20,
    ScreenColumns = 0x21,
    RoutinesOffset = 0x28,
    StringsOffset = 0x2A,
    Revision = 0x32,
}

fn field_byte(map: &[u8], field: HeaderField) -> u8 {
    map[field as usize]
}

fn field_word(map: &[u8], field: HeaderField) -> u16 {
    let a = field as usize;
    word_value(map[a], map[a + 1])
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Parsed header fields
pub struct Header {
    version: u8,
    flags1: u8,
    release: u16,
    high_mark: usize,
    initial_pc: usize,
    dictionary: usize,
    object_table: usize,
    global_table: usize,
    static_mark: usize,
    flags2: u16,
    serial: String,
    abbreviations_table: usize,
    /// File length in bytes, already scaled for the version
    file_length: usize,
    checksum: u16,
    routines_offset: usize,
    strings_offset: usize,
}

/// Scale factor for the header file length
///
/// # Arguments
/// * `version` - Z-machine version
///
/// # Returns
/// Multiplier that converts the stored length to bytes
pub fn file_length_scale(version: u8) -> usize {
    match version {
        1..=3 => 2,
        4 | 5 => 4,
        _ => 8,
    }
}

impl TryFrom<&[u8]> for Header {
    type Error = RuntimeError;

    fn try_from(map: &[u8]) -> Result<Self, Self::Error> {
        if map.len() < HEADER_SIZE {
            return fatal_error!(
                ErrorCode::InvalidHeader,
                "Game file is {} bytes, too short for a header",
                map.len()
            );
        }

        let version = field_byte(map, HeaderField::Version);
        if !(1..=8).contains(&version) {
            return fatal_error!(
                ErrorCode::UnsupportedVersion,
                "Unsupported version: {}",
                version
            );
        }

        let static_mark = field_word(map, HeaderField::StaticMark) as usize;
        if static_mark < HEADER_SIZE || static_mark > map.len() {
            return fatal_error!(
                ErrorCode::InvalidHeader,
                "Static memory mark {:#06x} outside of game file ({:#06x} bytes)",
                static_mark,
                map.len()
            );
        }

        let mut serial = String::new();
        for b in &map[HeaderField::Serial as usize..HeaderField::Serial as usize + 6] {
            serial.push(*b as char);
        }

        let header = Header {
            version,
            flags1: field_byte(map, HeaderField::Flags1),
            release: field_word(map, HeaderField::Release),
            high_mark: field_word(map, HeaderField::HighMark) as usize,
            initial_pc: field_word(map, HeaderField::InitialPC) as usize,
            dictionary: field_word(map, HeaderField::Dictionary) as usize,
            object_table: field_word(map, HeaderField::ObjectTable) as usize,
            global_table: field_word(map, HeaderField::GlobalTable) as usize,
            static_mark,
            flags2: field_word(map, HeaderField::Flags2),
            serial,
            abbreviations_table: field_word(map, HeaderField::AbbreviationsTable) as usize,
            file_length: field_word(map, HeaderField::FileLength) as usize
                * file_length_scale(version),
            checksum: field_word(map, HeaderField::Checksum),
            routines_offset: field_word(map, HeaderField::RoutinesOffset) as usize,
            strings_offset: field_word(map, HeaderField::StringsOffset) as usize,
        };

        for (name, address) in [
            ("Initial PC", header.initial_pc),
            ("Dictionary", header.dictionary),
            ("Object table", header.object_table),
            ("Global variable table", header.global_table),
        ] {
            if address >= map.len() {
                return fatal_error!(
                    ErrorCode::InvalidHeader,
                    "{} address {:#06x} outside of game file ({:#06x} bytes)",
                    name,
                    address,
                    map.len()
                );
            }
        }

        Ok(header)
    }
}

impl Header {
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn flags1(&self) -> u8 {
        self.flags1
    }

    pub fn release(&self) -> u16 {
        self.release
    }

    pub fn high_mark(&self) -> usize {
        self.high_mark
    }

    pub fn initial_pc(&self) -> usize {
        self.initial_pc
    }

    pub fn dictionary(&self) -> usize {
        self.dictionary
    }

    pub fn object_table(&self) -> usize {
        self.object_table
    }

    pub fn global_table(&self) -> usize {
        self.global_table
    }

    pub fn static_mark(&self) -> usize {
        self.static_mark
    }

    pub fn flags2(&self) -> u16 {
        self.flags2
    }

    /// Serial number, usually the compile date as `YYMMDD`
    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn abbreviations_table(&self) -> usize {
        self.abbreviations_table
    }

    /// File length in bytes
    ///
    /// # Returns
    /// The header length scaled by version, or 0 if the header doesn't declare one
    pub fn file_length(&self) -> usize {
        self.file_length
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    /// V6/7 routine offset, used when unpacking routine addresses
    pub fn routines_offset(&self) -> usize {
        self.routines_offset
    }

    /// V6/7 string offset, used when unpacking string addresses
    pub fn strings_offset(&self) -> usize {
        self.strings_offset
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use super::*;
    use crate::test_util::test_map;

    #[test]
    fn test_try_from() {
        let mut map = test_map(3);
        map[0x02] = 0x00;
        map[0x03] = 0x58;
        map[0x12..0x18].copy_from_slice(b"880429");
        map[0x1A] = 0x04;
        map[0x1B] = 0x00;
        map[0x1C] = 0xF4;
        map[0x1D] = 0x20;
        let header = assert_ok!(Header::try_from(&map[..]));
        assert_eq!(header.version(), 3);
        assert_eq!(header.release(), 88);
        assert_eq!(header.serial(), "880429");
        assert_eq!(header.initial_pc(), 0x400);
        assert_eq!(header.object_table(), 0x200);
        assert_eq!(header.global_table(), 0x100);
        assert_eq!(header.static_mark(), 0x400);
        assert_eq!(header.file_length(), 0x800);
        assert_eq!(header.checksum(), 0xF420);
    }

    #[test]
    fn test_file_length_scale() {
        assert_eq!(file_length_scale(1), 2);
        assert_eq!(file_length_scale(3), 2);
        assert_eq!(file_length_scale(4), 4);
        assert_eq!(file_length_scale(5), 4);
        assert_eq!(file_length_scale(6), 8);
        assert_eq!(file_length_scale(8), 8);
    }

    #[test]
    fn test_file_length_v5() {
        let mut map = test_map(5);
        map[0x1A] = 0x02;
        map[0x1B] = 0x00;
        let header = assert_ok!(Header::try_from(&map[..]));
        assert_eq!(header.file_length(), 0x800);
    }

    #[test]
    fn test_too_short() {
        let map = vec![3; 0x20];
        let e = Header::try_from(&map[..]).unwrap_err();
        assert_eq!(e.code(), ErrorCode::InvalidHeader);
    }

    #[test]
    fn test_unsupported_version() {
        for v in [0, 9] {
            let map = test_map(v);
            let e = Header::try_from(&map[..]).unwrap_err();
            assert_eq!(e.code(), ErrorCode::UnsupportedVersion);
        }
    }

    #[test]
    fn test_static_mark_past_end() {
        let mut map = test_map(3);
        map[0x0E] = 0x10;
        let e = Header::try_from(&map[..]).unwrap_err();
        assert_eq!(e.code(), ErrorCode::InvalidHeader);
    }

    #[test]
    fn test_initial_pc_past_end() {
        let mut map = test_map(3);
        map[0x06] = 0x08;
        let e = Header::try_from(&map[..]).unwrap_err();
        assert_eq!(e.code(), ErrorCode::InvalidHeader);
    }
}
