//! Instruction [decoding](https://inform-fiction.org/zmachine/standards/z1point1/sect04.html)
use crate::error::*;
use crate::fatal_error;
use crate::instruction::*;
use crate::zmachine::{memory, ZMachine};

/// Longest possible instruction, excluding inline text:
/// 0xBE + opcode + 2 type bytes + 8 large operands + store + 2 branch bytes
const MAX_INSTRUCTION_LENGTH: usize = 23;

fn byte(bytes: &[u8], address: usize, offset: usize) -> Result<u8, RuntimeError> {
    match bytes.get(offset) {
        Some(b) => Ok(*b),
        None => fatal_error!(
            ErrorCode::InvalidAddress,
            "Instruction at ${:05x} runs past the end of memory",
            address
        ),
    }
}

fn operand_type(type_byte: u8, operand_index: u8) -> Option<OperandType> {
    // Types are packed in the byte: 00112233
    // To get type n, shift right 6 - (n * 2) bits
    let t = (type_byte >> (6 - (operand_index * 2))) & 3;
    match t {
        0 => Some(OperandType::LargeConstant),
        1 => Some(OperandType::SmallConstant),
        2 => Some(OperandType::Variable),
        _ => None,
    }
}

fn long_operand_type(opcode: u8, index: u8) -> OperandType {
    if opcode >> (6 - index) & 1 == 1 {
        OperandType::Variable
    } else {
        OperandType::SmallConstant
    }
}

fn operand_types(
    address: usize,
    bytes: &[u8],
    opcode: &Opcode,
    mut offset: usize,
) -> Result<(usize, Vec<OperandType>), RuntimeError> {
    let mut types = Vec::new();
    match opcode.form() {
        OpcodeForm::Short => {
            if let Some(t) = operand_type(opcode.opcode(), 1) {
                types.push(t);
            }
        }
        OpcodeForm::Long => {
            types.push(long_operand_type(opcode.opcode(), 0));
            types.push(long_operand_type(opcode.opcode(), 1));
        }
        OpcodeForm::Var | OpcodeForm::Ext => {
            let b = byte(bytes, address, offset)?;
            offset += 1;
            let mut done = false;
            for i in 0..4 {
                match operand_type(b, i) {
                    Some(t) => types.push(t),
                    None => {
                        done = true;
                        break;
                    }
                }
            }
            // call_vs2 and call_vn2 have a second byte of operand types, which is present
            // even when the first one has already ended the list
            if opcode.form() == OpcodeForm::Var
                && (opcode.opcode() == 0xEC || opcode.opcode() == 0xFA)
            {
                let b = byte(bytes, address, offset)?;
                offset += 1;
                if !done {
                    for i in 0..4 {
                        match operand_type(b, i) {
                            Some(t) => types.push(t),
                            None => break,
                        }
                    }
                }
            }
        }
    }

    Ok((offset, types))
}

fn operands(
    address: usize,
    bytes: &[u8],
    operand_types: &[OperandType],
    mut offset: usize,
) -> Result<(usize, Vec<Operand>), RuntimeError> {
    let mut operands = Vec::new();

    for optype in operand_types {
        match optype {
            OperandType::LargeConstant => {
                operands.push(Operand::new(
                    *optype,
                    memory::word_value(
                        byte(bytes, address, offset)?,
                        byte(bytes, address, offset + 1)?,
                    ),
                ));
                offset += 2;
            }
            OperandType::SmallConstant | OperandType::Variable => {
                operands.push(Operand::new(*optype, byte(bytes, address, offset)? as u16));
                offset += 1;
            }
        }
    }

    Ok((offset, operands))
}

fn result_variable(
    address: usize,
    bytes: &[u8],
    offset: usize,
) -> Result<(usize, Option<StoreResult>), RuntimeError> {
    Ok((
        offset + 1,
        Some(StoreResult::new(
            address + offset,
            byte(bytes, address, offset)?,
        )),
    ))
}

fn branch_address(address: usize, offset: i16) -> usize {
    match offset {
        0 => 0,
        1 => 1,
        _ => ((address as isize) + offset as isize) as usize,
    }
}

fn branch_condition(
    address: usize,
    bytes: &[u8],
    offset: usize,
) -> Result<(usize, Option<Branch>), RuntimeError> {
    let b = byte(bytes, address, offset)?;
    let condition = b & 0x80 == 0x80;
    let branch_byte_address = address + offset;
    match b & 0x40 {
        0x40 => {
            // Short form: (address after branch byte) + offset - 2
            let b_offset = b & 0x3f;
            Ok((
                offset + 1,
                Some(Branch::new(
                    branch_byte_address,
                    condition,
                    branch_address(branch_byte_address - 1, b_offset as i16),
                )),
            ))
        }
        _ => {
            // Long form: 14-bit signed offset
            let mut b_offset =
                ((b as u16 & 0x3f) << 8) | (byte(bytes, address, offset + 1)? as u16);
            if b_offset & 0x2000 == 0x2000 {
                b_offset |= 0xC000;
            }
            Ok((
                offset + 2,
                Some(Branch::new(
                    branch_byte_address,
                    condition,
                    branch_address(branch_byte_address, b_offset as i16),
                )),
            ))
        }
    }
}

fn opcode(
    address: usize,
    bytes: &[u8],
    version: u8,
    mut offset: usize,
) -> Result<(usize, Opcode), RuntimeError> {
    let mut opcode = byte(bytes, address, offset)?;
    let extended = opcode == 0xBE && version >= 5;
    offset += 1;
    if extended {
        opcode = byte(bytes, address, offset)?;
        offset += 1;
    }

    let form = if extended {
        OpcodeForm::Ext
    } else {
        match (opcode >> 6) & 0x3 {
            3 => OpcodeForm::Var,
            2 => OpcodeForm::Short,
            _ => OpcodeForm::Long,
        }
    };

    let instruction = match form {
        OpcodeForm::Var | OpcodeForm::Long => opcode & 0x1F,
        OpcodeForm::Short => opcode & 0xF,
        OpcodeForm::Ext => opcode,
    };

    let operand_count = match form {
        OpcodeForm::Short => {
            if opcode & 0x30 == 0x30 {
                OperandCount::_0OP
            } else {
                OperandCount::_1OP
            }
        }
        OpcodeForm::Long => OperandCount::_2OP,
        OpcodeForm::Var => {
            if opcode & 0x20 == 0x20 {
                OperandCount::_VAR
            } else {
                OperandCount::_2OP
            }
        }
        OpcodeForm::Ext => OperandCount::_VAR,
    };

    Ok((
        offset,
        Opcode::new(version, opcode, instruction, form, operand_count),
    ))
}

/// Find the address following an inline string
fn skip_string(zmachine: &ZMachine, mut address: usize) -> Result<usize, RuntimeError> {
    loop {
        let w = zmachine.read_word(address)?;
        address += 2;
        if w & 0x8000 == 0x8000 {
            return Ok(address);
        }
    }
}

/// Decode the instruction at an address
///
/// # Arguments
/// * `zmachine` - Reference to the VM
/// * `address` - Address of the instruction
///
/// # Returns
/// [Result] with the decoded [Instruction] or a [RuntimeError]
pub fn decode_instruction(zmachine: &ZMachine, address: usize) -> Result<Instruction, RuntimeError> {
    let version = zmachine.version();
    let bytes = zmachine.memory_slice(address, MAX_INSTRUCTION_LENGTH);
    let (offset, opcode) = opcode(address, &bytes, version, 0)?;
    let (_, has_store, has_branch) = resolve(
        version,
        opcode.form(),
        opcode.operand_count(),
        opcode.instruction(),
    );

    let (offset, operand_types) = operand_types(address, &bytes, &opcode, offset)?;
    let (offset, operands) = operands(address, &bytes, &operand_types, offset)?;
    let (offset, store) = if has_store {
        result_variable(address, &bytes, offset)?
    } else {
        (offset, None)
    };
    let (offset, branch) = if has_branch {
        branch_condition(address, &bytes, offset)?
    } else {
        (offset, None)
    };

    let next_address = match opcode.operation() {
        Operation::Print | Operation::PrintRet => skip_string(zmachine, address + offset)?,
        _ => address + offset,
    };

    Ok(Instruction::new(
        address,
        opcode,
        operands,
        store,
        branch,
        next_address,
    ))
}
