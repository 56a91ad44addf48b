use super::*;
use crate::{error::RuntimeError, text, zmachine::ZMachine};

pub fn rtrue(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<usize, RuntimeError> {
    zmachine.return_routine(1)
}

pub fn rfalse(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<usize, RuntimeError> {
    zmachine.return_routine(0)
}

/// Prints the literal string that follows the opcode byte
pub fn print(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let (s, _) = text::decode(zmachine, instruction.address() + 1)?;
    zmachine.print(&s);
    Ok(instruction.next_address())
}

pub fn print_ret(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let (s, _) = text::decode(zmachine, instruction.address() + 1)?;
    zmachine.print(&s);
    zmachine.print("\n");
    zmachine.return_routine(1)
}

pub fn nop(_zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    Ok(instruction.next_address())
}

pub fn restart(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<usize, RuntimeError> {
    zmachine.restart()
}

pub fn ret_popped(zmachine: &mut ZMachine, _instruction: &Instruction) -> Result<usize, RuntimeError> {
    let value = zmachine.variable(0)?;
    zmachine.return_routine(value)
}

pub fn pop(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    zmachine.variable(0)?;
    Ok(instruction.next_address())
}

/// Stores the frame depth for a later `throw`
pub fn catch(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let depth = zmachine.frame_count() as u16;
    store_result(zmachine, instruction, depth)?;
    Ok(instruction.next_address())
}

pub fn quit(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    zmachine.quit();
    Ok(instruction.next_address())
}

pub fn new_line(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    zmachine.print("\n");
    Ok(instruction.next_address())
}

pub fn show_status(_zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    Ok(instruction.next_address())
}

pub fn verify(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    branch(zmachine, instruction, true)
}

pub fn piracy(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    branch(zmachine, instruction, true)
}
