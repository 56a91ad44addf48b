use super::*;
use crate::{error::RuntimeError, zmachine::ZMachine};

/// Saving to a file is left to the host, which snapshots state directly, so `save` always succeeds
pub fn save(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    operand_values(zmachine, instruction)?;
    store_result(zmachine, instruction, 1)?;
    branch(zmachine, instruction, true)
}

/// `restore` always fails
pub fn restore(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    operand_values(zmachine, instruction)?;
    store_result(zmachine, instruction, 0)?;
    branch(zmachine, instruction, false)
}

pub fn log_shift(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let places = operands[1] as i16;
    let value = if places < 0 {
        operands[0]
            .checked_shr(places.unsigned_abs() as u32)
            .unwrap_or(0)
    } else {
        operands[0].checked_shl(places as u32).unwrap_or(0)
    };

    store_result(zmachine, instruction, value)?;
    Ok(instruction.next_address())
}

pub fn art_shift(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let number = operands[0] as i16;
    let places = operands[1] as i16;
    let value = if places < 0 {
        let places = u32::min(places.unsigned_abs() as u32, 15);
        number >> places
    } else {
        number.checked_shl(places as u32).unwrap_or(0)
    };

    store_result(zmachine, instruction, value as u16)?;
    Ok(instruction.next_address())
}

pub fn set_font(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    operand_values(zmachine, instruction)?;
    store_result(zmachine, instruction, 1)?;
    Ok(instruction.next_address())
}

pub fn save_undo(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    operand_values(zmachine, instruction)?;
    zmachine.save_undo(instruction.next_address(), instruction.store().copied());
    store_result(zmachine, instruction, 1)?;
    Ok(instruction.next_address())
}

pub fn restore_undo(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    operand_values(zmachine, instruction)?;
    match zmachine.restore_undo()? {
        Some(pc) => Ok(pc),
        None => {
            store_result(zmachine, instruction, 0)?;
            Ok(instruction.next_address())
        }
    }
}

pub fn print_unicode(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    if let Some(c) = char::from_u32(operands[0] as u32) {
        zmachine.print(&c.to_string());
    }
    Ok(instruction.next_address())
}

/// Output and input are Rust strings, so any character can be printed and read
pub fn check_unicode(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    operand_values(zmachine, instruction)?;
    store_result(zmachine, instruction, 3)?;
    Ok(instruction.next_address())
}

pub fn set_true_colour(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    operand_values(zmachine, instruction)?;
    Ok(instruction.next_address())
}
