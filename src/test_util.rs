use crate::{
    config::Config,
    instruction::{Branch, Instruction, Opcode, Operand, OperandType, StoreResult},
    zmachine::ZMachine,
};

#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got {:?}", e),
        }
    };
}

#[macro_export]
macro_rules! assert_ok_eq {
    ($result:expr, $value:expr) => {
        assert_eq!($crate::assert_ok!($result), $value)
    };
}

#[macro_export]
macro_rules! assert_some_eq {
    ($option:expr, $value:expr) => {
        match $option {
            Some(v) => assert_eq!(v, $value),
            None => panic!("Expected Some, got None"),
        }
    };
}

pub fn test_map(version: u8) -> Vec<u8> {
    let mut v = vec![0; 0x800];
    v[0] = version;
    // Initial PC at $0400
    v[6] = 0x4;
    // Object table as 0x200
    v[0x0A] = 0x02;
    // Static mark at $0400
    v[0x0E] = 0x04;
    // Global variables at $0100
    v[0x0C] = 0x01;

    v
}

pub fn set_variable(map: &mut [u8], variable: u8, value: u16) {
    let address = 0x100 + ((variable as usize - 16) * 2);
    map[address] = (value >> 8) as u8;
    map[address + 1] = value as u8;
}

pub fn mock_zmachine(map: Vec<u8>) -> ZMachine {
    crate::assert_ok!(ZMachine::new(&map, &Config::default()))
}

pub fn operand(operand_type: OperandType, value: u16) -> Operand {
    Operand::new(operand_type, value)
}

pub fn mock_instruction(
    address: usize,
    operands: Vec<Operand>,
    opcode: Opcode,
    next_address: usize,
) -> Instruction {
    Instruction::new(address, opcode, operands, None, None, next_address)
}

pub fn branch(byte_address: usize, condition: bool, branch_address: usize) -> Branch {
    Branch::new(byte_address, condition, branch_address)
}

pub fn mock_branch_instruction(
    address: usize,
    operands: Vec<Operand>,
    opcode: Opcode,
    next_address: usize,
    branch: Branch,
) -> Instruction {
    Instruction::new(address, opcode, operands, None, Some(branch), next_address)
}

pub fn store(byte_address: usize, variable: u8) -> StoreResult {
    StoreResult::new(byte_address, variable)
}

pub fn mock_store_instruction(
    address: usize,
    operands: Vec<Operand>,
    opcode: Opcode,
    next_address: usize,
    result: StoreResult,
) -> Instruction {
    Instruction::new(address, opcode, operands, Some(result), None, next_address)
}

pub fn mock_branch_store_instruction(
    address: usize,
    operands: Vec<Operand>,
    opcode: Opcode,
    next_address: usize,
    branch: Branch,
    result: StoreResult,
) -> Instruction {
    Instruction::new(
        address,
        opcode,
        operands,
        Some(result),
        Some(branch),
        next_address,
    )
}

pub fn mock_routine(map: &mut [u8], address: usize, local_variables: &[u16]) {
    map[address] = local_variables.len() as u8;
    // Only V1-4 routines carry initial values
    if map[0] < 5 {
        for (i, w) in local_variables.iter().enumerate() {
            map[address + 1 + (i * 2)] = (*w >> 8) as u8;
            map[address + 2 + (i * 2)] = *w as u8;
        }
    }
}

fn write_words(map: &mut [u8], address: usize, words: &[u16]) {
    for (i, w) in words.iter().enumerate() {
        map[address + (i * 2)] = (*w >> 8) as u8;
        map[address + 1 + (i * 2)] = *w as u8;
    }
}

/// Dictionary at $0600 with 4 words:
/// * hello ($0607, noun)
/// * inventory ($0610, verb)
/// * look ($0619, verb)
/// * sailor ($0622, noun)
///
/// Also sets up a text buffer at $0380 for 20 characters and a parse buffer at $03A0 for 4 words.
pub fn mock_dictionary(map: &mut [u8]) {
    map[0x08] = 0x06;
    map[0x09] = 0x00;

    map[0x600] = 3;
    map[0x601] = b'.';
    map[0x602] = b',';
    map[0x603] = b'"';

    // Entry length is 9 bytes
    map[0x604] = 0x9;
    // There are 4 entries
    map[0x605] = 0;
    map[0x606] = 4;

    map[0x380] = 20;
    map[0x3A0] = 4;

    let (words, type_offset): ([&[u16]; 4], usize) = if map[0] < 4 {
        (
            [
                // hello
                //   D     A     11       11    14    5
                // 0 01101 01010 10001  1 10001 10100 00101
                &[0x3551, 0xC685],
                // inventory
                //   E     13    1B       A     13    19
                // 0 01110 10011 11011  1 01010 10011 11001
                &[0x3A7B, 0xAA79],
                // look
                //   11    14    14       10    5     5
                // 0 10001 10100 10100  1 10000 00101 00101
                &[0x4694, 0xC0A5],
                // sailor
                //   18    6     E        11    14    17
                // 0 11000 00110 01110  1 10001 10100 10111
                &[0x60CE, 0xC697],
            ],
            4,
        )
    } else {
        (
            [
                &[0x3551, 0x4685, 0x94A5],
                &[0x3A7B, 0x2A79, 0xD2FE],
                &[0x4694, 0x40A5, 0x94A5],
                &[0x60CE, 0x4697, 0x94A5],
            ],
            6,
        )
    };

    for (i, (word, word_type)) in words.iter().zip([0x80, 0x41, 0x41, 0x80]).enumerate() {
        let entry = 0x607 + (i * 9);
        write_words(map, entry, word);
        map[entry + type_offset] = word_type;
    }
}

/// Unsorted V5 dictionary with 3 words:
/// * xyzzy (`address` + 7)
/// * plover (`address` + 16)
/// * moon (`address` + 25)
pub fn mock_custom_dictionary(map: &mut [u8], address: usize) {
    map[address] = 3;
    map[address + 1] = b'.';
    map[address + 2] = b',';
    map[address + 3] = b'"';

    // Entry length is 9 bytes
    map[address + 4] = 0x9;
    // There are 3 entries, unsorted
    map[address + 5] = 0xFF;
    map[address + 6] = 0xFD;

    // xyzzy
    //   1D    1E    1F       1F    1E    5        5     5     5
    // 0 11101 11110 11111  0 11111 11110 00101  1 00101 00101 00101
    write_words(map, address + 7, &[0x77DF, 0x7FC5, 0x94A5]);
    // plover
    //   15    11    14       1B    A     17       5     5     5
    // 0 10101 10001 10100  0 11011 01010 10111  1 00101 00101 00101
    write_words(map, address + 16, &[0x5634, 0x6D57, 0x94A5]);
    // moon
    //   12    14    14       13    5     5        5     5     5
    // 0 10010 10100 10100  0 10011 00101 00101  1 00101 00101 00101
    write_words(map, address + 25, &[0x4A94, 0x4CA5, 0x94A5]);
}

fn object_address(map: &[u8], object: usize) -> usize {
    let object_table = ((map[0x0a] as usize) << 8) + map[0x0b] as usize;
    if map[0] < 4 {
        object_table + 62 + ((object - 1) * 9)
    } else {
        object_table + 126 + ((object - 1) * 14)
    }
}

fn property_table_address(object: usize) -> usize {
    // Property tables will be placed at 0x300
    0x300 + ((object - 1) * 20)
}

pub fn mock_object(
    map: &mut [u8],
    object: usize,
    short_name: Vec<u16>,
    (parent, sibling, child): (u16, u16, u16),
) {
    let object_address = object_address(map, object);
    let property_table_address = property_table_address(object);

    if map[0] < 4 {
        map[object_address + 4] = parent as u8;
        map[object_address + 5] = sibling as u8;
        map[object_address + 6] = child as u8;
        map[object_address + 7] = (property_table_address >> 8) as u8;
        map[object_address + 8] = property_table_address as u8;
    } else {
        write_words(
            map,
            object_address + 6,
            &[parent, sibling, child, property_table_address as u16],
        );
    }

    map[property_table_address] = short_name.len() as u8;
    write_words(map, property_table_address + 1, &short_name);
}

pub fn mock_attributes(map: &mut [u8], object: usize, attributes: &[u8]) {
    let object_address = object_address(map, object);
    for (i, b) in attributes.iter().enumerate() {
        map[object_address + i] = *b;
    }
}

/// Property `n` defaults to `((n - 1) % 16, n - 1)`
pub fn mock_default_properties(map: &mut [u8]) {
    let words = if map[0] < 4 { 31 } else { 63 };

    let object_table = ((map[0x0a] as usize) << 8) + map[0x0b] as usize;
    for i in 0..words {
        let address = object_table + (i * 2);
        map[address] = (i as u8) % 0x10;
        map[address + 1] = i as u8;
    }
}

/// Properties are written in the order given, after the object's short name is set
pub fn mock_properties(map: &mut [u8], object: usize, properties: &[(u8, &Vec<u8>)]) {
    let property_table_address = property_table_address(object);
    let hl = map[property_table_address] as usize;

    let mut address = property_table_address + 1 + (hl * 2);
    for (number, data) in properties {
        if map[0] < 4 {
            map[address] = ((data.len() - 1) * 32) as u8 + *number;
            map[address + 1..address + 1 + data.len()].copy_from_slice(data);
            address = address + 1 + data.len();
        } else {
            match data.len() {
                1 => {
                    map[address] = *number;
                    map[address + 1] = data[0];
                    address += 2;
                }
                2 => {
                    map[address] = 0x40 | *number;
                    map[address + 1] = data[0];
                    map[address + 2] = data[1];
                    address += 3;
                }
                _ => {
                    map[address] = 0x80 | *number;
                    map[address + 1] = 0x80 | (data.len() as u8 & 0x3F);
                    map[address + 2..address + 2 + data.len()].copy_from_slice(data);
                    address = address + 2 + data.len();
                }
            }
        }
    }
}

/// A tiny V3 game
///
/// Prints "hello", then reads commands forever: "look" prints "yes", anything else "no".
pub fn mock_game() -> Vec<u8> {
    let mut map = test_map(3);
    mock_dictionary(&mut map);

    let code: &[u8] = &[
        // $0400: print "hello"
        0xB2, 0x35, 0x51, 0xC6, 0x85, //
        // $0405: new_line
        0xBB, //
        // $0406: sread $0380 $03A0
        0xE4, 0x0F, 0x03, 0x80, 0x03, 0xA0, //
        // $040C: loadw $03A0 1 -> G00
        0xCF, 0x1F, 0x03, 0xA0, 0x01, 0x10, //
        // $0412: je G00 $0619 ?$041F
        0xC1, 0x8F, 0x10, 0x06, 0x19, 0xC9, //
        // $0418: print "no"
        0xB2, 0xCE, 0x85, //
        // $041B: new_line
        0xBB, //
        // $041C: jump $0406
        0x8C, 0xFF, 0xE9, //
        // $041F: print "yes"
        0xB2, 0xF9, 0x58, //
        // $0422: new_line
        0xBB, //
        // $0423: jump $0406
        0x8C, 0xFF, 0xE2,
    ];
    map[0x400..0x400 + code.len()].copy_from_slice(code);

    map
}
