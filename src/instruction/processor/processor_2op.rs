use super::*;
use crate::{
    error::{ErrorCode, RuntimeError},
    fatal_error,
    object::{self, attribute, property},
    recoverable_error,
    zmachine::ZMachine,
};

pub fn je(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let condition = operands[1..].iter().any(|v| *v == operands[0]);
    branch(zmachine, instruction, condition)
}

pub fn jl(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    branch(
        zmachine,
        instruction,
        (operands[0] as i16) < (operands[1] as i16),
    )
}

pub fn jg(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    branch(
        zmachine,
        instruction,
        (operands[0] as i16) > (operands[1] as i16),
    )
}

pub fn dec_chk(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = (zmachine.peek_variable(operands[0] as u8)? as i16).wrapping_sub(1);
    zmachine.set_variable_indirect(operands[0] as u8, value as u16)?;
    branch(zmachine, instruction, value < operands[1] as i16)
}

pub fn inc_chk(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = (zmachine.peek_variable(operands[0] as u8)? as i16).wrapping_add(1);
    zmachine.set_variable_indirect(operands[0] as u8, value as u16)?;
    branch(zmachine, instruction, value > operands[1] as i16)
}

pub fn jin(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let parent = match operands[0] {
        0 => 0,
        o => object::parent(zmachine, o as usize)?,
    };
    branch(zmachine, instruction, parent == operands[1] as usize)
}

pub fn test(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    branch(
        zmachine,
        instruction,
        operands[0] & operands[1] == operands[1],
    )
}

pub fn or(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    store_result(zmachine, instruction, operands[0] | operands[1])?;
    Ok(instruction.next_address())
}

pub fn and(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    store_result(zmachine, instruction, operands[0] & operands[1])?;
    Ok(instruction.next_address())
}

fn attribute_number(value: u16) -> Result<u8, RuntimeError> {
    match u8::try_from(value) {
        Ok(a) => Ok(a),
        Err(_) => recoverable_error!(
            ErrorCode::InvalidObjectAttribute,
            "Invalid attribute {}",
            value
        ),
    }
}

pub fn test_attr(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let condition = attribute::value(zmachine, operands[0] as usize, attribute_number(operands[1])?)?;
    branch(zmachine, instruction, condition)
}

pub fn set_attr(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    attribute::set(zmachine, operands[0] as usize, attribute_number(operands[1])?)?;
    Ok(instruction.next_address())
}

pub fn clear_attr(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    attribute::clear(zmachine, operands[0] as usize, attribute_number(operands[1])?)?;
    Ok(instruction.next_address())
}

pub fn store(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    zmachine.set_variable_indirect(operands[0] as u8, operands[1])?;
    Ok(instruction.next_address())
}

pub fn insert_obj(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    object::insert(zmachine, operands[0] as usize, operands[1] as usize)?;
    Ok(instruction.next_address())
}

pub fn loadw(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = operands[0].wrapping_add(operands[1].wrapping_mul(2)) as usize;
    let value = zmachine.read_word(address)?;
    store_result(zmachine, instruction, value)?;
    Ok(instruction.next_address())
}

pub fn loadb(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address = operands[0].wrapping_add(operands[1]) as usize;
    let value = zmachine.read_byte(address)?;
    store_result(zmachine, instruction, value as u16)?;
    Ok(instruction.next_address())
}

pub fn get_prop(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = property::property(zmachine, operands[0] as usize, operands[1] as u8)?;
    store_result(zmachine, instruction, value)?;
    Ok(instruction.next_address())
}

pub fn get_prop_addr(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let address =
        property::property_data_address(zmachine, operands[0] as usize, operands[1] as u8)?;
    store_result(zmachine, instruction, address as u16)?;
    Ok(instruction.next_address())
}

pub fn get_next_prop(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let next = property::next_property(zmachine, operands[0] as usize, operands[1] as u8)?;
    store_result(zmachine, instruction, next as u16)?;
    Ok(instruction.next_address())
}

pub fn add(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = (operands[0] as i16).wrapping_add(operands[1] as i16);
    store_result(zmachine, instruction, value as u16)?;
    Ok(instruction.next_address())
}

pub fn sub(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = (operands[0] as i16).wrapping_sub(operands[1] as i16);
    store_result(zmachine, instruction, value as u16)?;
    Ok(instruction.next_address())
}

pub fn mul(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    let value = (operands[0] as i16).wrapping_mul(operands[1] as i16);
    store_result(zmachine, instruction, value as u16)?;
    Ok(instruction.next_address())
}

pub fn div(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    if operands[1] == 0 {
        return fatal_error!(ErrorCode::DivisionByZero, "Divide by zero");
    }

    let value = (operands[0] as i16).wrapping_div(operands[1] as i16);
    store_result(zmachine, instruction, value as u16)?;
    Ok(instruction.next_address())
}

pub fn modulus(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    if operands[1] == 0 {
        return fatal_error!(ErrorCode::ModuloByZero, "Modulo by zero");
    }

    let value = (operands[0] as i16).wrapping_rem(operands[1] as i16);
    store_result(zmachine, instruction, value as u16)?;
    Ok(instruction.next_address())
}

/// `call_2s` and `call_2n`
pub fn call_2(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    call_fn(zmachine, instruction, &operands)
}

pub fn set_colour(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    operand_values(zmachine, instruction)?;
    Ok(instruction.next_address())
}

pub fn throw(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operands = operand_values(zmachine, instruction)?;
    zmachine.throw(operands[1], operands[0])
}
