use super::*;
use crate::{
    error::RuntimeError,
    object::{self, property},
    text,
    zmachine::ZMachine,
};

pub fn jz(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    branch(zmachine, instruction, operands[0] == 0)
}

pub fn get_sibling(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let sibling = match operands[0] {
        0 => 0,
        o => object::sibling(zmachine, o as usize)?,
    };
    store_result(zmachine, instruction, sibling as u16)?;
    branch(zmachine, instruction, sibling != 0)
}

pub fn get_child(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let child = match operands[0] {
        0 => 0,
        o => object::child(zmachine, o as usize)?,
    };
    store_result(zmachine, instruction, child as u16)?;
    branch(zmachine, instruction, child != 0)
}

pub fn get_parent(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let parent = match operands[0] {
        0 => 0,
        o => object::parent(zmachine, o as usize)?,
    };
    store_result(zmachine, instruction, parent as u16)?;
    Ok(instruction.next_address())
}

pub fn get_prop_len(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let len = property::property_length(zmachine, operands[0] as usize)?;
    store_result(zmachine, instruction, len as u16)?;
    Ok(instruction.next_address())
}

pub fn inc(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = zmachine.peek_variable(operands[0] as u8)? as i16;
    zmachine.set_variable_indirect(operands[0] as u8, value.wrapping_add(1) as u16)?;
    Ok(instruction.next_address())
}

pub fn dec(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = zmachine.peek_variable(operands[0] as u8)? as i16;
    zmachine.set_variable_indirect(operands[0] as u8, value.wrapping_sub(1) as u16)?;
    Ok(instruction.next_address())
}

pub fn print_addr(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let (s, _) = text::decode(zmachine, operands[0] as usize)?;
    zmachine.print(&s);
    Ok(instruction.next_address())
}

/// `call_1s` and `call_1n`
pub fn call_1(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    call_fn(zmachine, instruction, &operands)
}

pub fn remove_obj(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    if operands[0] > 0 {
        object::remove(zmachine, operands[0] as usize)?;
    }
    Ok(instruction.next_address())
}

pub fn print_obj(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let name = property::short_name(zmachine, operands[0] as usize)?;
    zmachine.print(&name);
    Ok(instruction.next_address())
}

pub fn ret(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    zmachine.return_routine(operands[0])
}

pub fn jump(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = instruction.next_address() as isize + (operands[0] as i16) as isize - 2;
    Ok(address as usize)
}

pub fn print_paddr(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = zmachine.packed_string_address(operands[0]);
    let (s, _) = text::decode(zmachine, address)?;
    zmachine.print(&s);
    Ok(instruction.next_address())
}

pub fn load(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = zmachine.peek_variable(operands[0] as u8)?;
    store_result(zmachine, instruction, value)?;
    Ok(instruction.next_address())
}

pub fn not(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    store_result(zmachine, instruction, !operands[0])?;
    Ok(instruction.next_address())
}
