use super::*;
use crate::{
    dictionary,
    error::RuntimeError,
    object::property,
    text,
    zmachine::ZMachine,
};

/// `call`/`call_vs`, `call_vs2`, `call_vn` and `call_vn2`
pub fn call(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    call_fn(zmachine, instruction, &operands)
}

pub fn storew(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = operands[0].wrapping_add(operands[1].wrapping_mul(2)) as usize;
    zmachine.write_word(address, operands[2])?;
    Ok(instruction.next_address())
}

pub fn storeb(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = operands[0].wrapping_add(operands[1]) as usize;
    zmachine.write_byte(address, operands[2] as u8)?;
    Ok(instruction.next_address())
}

pub fn put_prop(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    property::set_property(
        zmachine,
        operands[0] as usize,
        operands[1] as u8,
        operands[2],
    )?;
    Ok(instruction.next_address())
}

/// `sread` and `aread`
///
/// Suspends execution until input is sent.  Timed input operands are read and ignored.
pub fn read(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let text_buffer = operands[0] as usize;
    let parse_buffer = operands.get(1).copied().unwrap_or(0) as usize;
    zmachine.await_input(text_buffer, parse_buffer, instruction.store().copied());
    Ok(instruction.next_address())
}

pub fn print_char(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    if let Some(c) = text::zscii_char(operands[0]) {
        zmachine.print(&c.to_string());
    }
    Ok(instruction.next_address())
}

pub fn print_num(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    zmachine.print(&format!("{}", operands[0] as i16));
    Ok(instruction.next_address())
}

/// Positive ranges return 1..=range, 0 reseeds from entropy and negative values seed predictably
pub fn random(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let range = operands[0] as i16;
    let value = if range > 0 {
        zmachine.random(range as u16)
    } else {
        zmachine.seed(range.unsigned_abs());
        0
    };

    store_result(zmachine, instruction, value)?;
    Ok(instruction.next_address())
}

pub fn push(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    zmachine.push(operands[0])?;
    Ok(instruction.next_address())
}

pub fn pull(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = zmachine.variable(0)?;
    zmachine.set_variable_indirect(operands[0] as u8, value)?;
    Ok(instruction.next_address())
}

/// Screen, stream and sound opcodes have no effect on the model
pub fn screen(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    operand_values(zmachine, instruction)?;
    Ok(instruction.next_address())
}

pub fn read_char(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    operand_values(zmachine, instruction)?;
    zmachine.await_char(instruction.store().copied());
    Ok(instruction.next_address())
}

pub fn scan_table(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let form = operands.get(3).copied().unwrap_or(0x82);
    let entry_size = (form & 0x7F) as usize;
    let words = form & 0x80 == 0x80;
    let table = operands[1] as usize;

    let mut found = 0;
    for i in 0..operands[2] as usize {
        let address = table + (i * entry_size);
        let value = if words {
            zmachine.read_word(address)?
        } else {
            zmachine.read_byte(address)? as u16
        };
        if value == operands[0] {
            found = address;
            break;
        }
    }

    store_result(zmachine, instruction, found as u16)?;
    branch(zmachine, instruction, found != 0)
}

pub fn tokenise(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let dictionary = match operands.get(2) {
        Some(d) if *d > 0 => *d as usize,
        _ => zmachine.header().dictionary(),
    };
    let flag = operands.get(3).is_some_and(|f| *f != 0);
    dictionary::parse_text(
        zmachine,
        operands[0] as usize,
        operands[1] as usize,
        dictionary,
        flag,
    )?;
    Ok(instruction.next_address())
}

pub fn encode_text(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let start = operands[0] as usize + operands[2] as usize;
    let mut word = String::new();
    for i in 0..operands[1] as usize {
        let c = zmachine.read_byte(start + i)?;
        if let Some(c) = text::zscii_char(c as u16) {
            word.push(c);
        }
    }

    let encoded = text::encode(zmachine.version(), &word);
    for (i, b) in encoded.iter().enumerate() {
        zmachine.write_byte(operands[3] as usize + i, *b)?;
    }
    Ok(instruction.next_address())
}

/// Copies a table, or zero-fills `first` when `second` is 0
///
/// A negative size forces a forward copy, even when the tables overlap.
pub fn copy_table(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let first = operands[0] as usize;
    let second = operands[1] as usize;
    let size = operands[2] as i16;
    let len = size.unsigned_abs() as usize;

    if second == 0 {
        for i in 0..len {
            zmachine.write_byte(first + i, 0)?;
        }
    } else if size < 0 {
        for i in 0..len {
            let b = zmachine.read_byte(first + i)?;
            zmachine.write_byte(second + i, b)?;
        }
    } else {
        let data = zmachine.memory_slice(first, len);
        for (i, b) in data.iter().enumerate() {
            zmachine.write_byte(second + i, *b)?;
        }
    }

    Ok(instruction.next_address())
}

pub fn print_table(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let table = operands[0] as usize;
    let width = operands[1] as usize;
    let height = operands.get(2).copied().unwrap_or(1) as usize;
    let skip = operands.get(3).copied().unwrap_or(0) as usize;

    let mut s = String::new();
    for row in 0..height {
        if row > 0 {
            s.push('\n');
        }
        let address = table + (row * (width + skip));
        for i in 0..width {
            let c = zmachine.read_byte(address + i)?;
            if let Some(c) = text::zscii_char(c as u16) {
                s.push(c);
            }
        }
    }

    zmachine.print(&s);
    Ok(instruction.next_address())
}

pub fn check_arg_count(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let count = zmachine.argument_count()?;
    branch(zmachine, instruction, count as u16 >= operands[0])
}
