//! Instruction execution
use crate::{
    error::{ErrorCode, RuntimeError},
    fatal_error, recoverable_error,
    zmachine::ZMachine,
};

use super::*;

mod processor_0op;
mod processor_1op;
mod processor_2op;
mod processor_ext;
mod processor_var;

fn operand_value(zmachine: &mut ZMachine, operand: &Operand) -> Result<u16, RuntimeError> {
    match operand.operand_type() {
        OperandType::SmallConstant | OperandType::LargeConstant => Ok(operand.value()),
        OperandType::Variable => zmachine.variable(operand.value() as u8),
    }
}

/// Resolve instruction operands to values, reading (and popping) variables in order
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `instruction` - Instruction
///
/// # Returns
/// [Result] with a vector of operand values or a [RuntimeError]
fn operand_values(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
) -> Result<Vec<u16>, RuntimeError> {
    let mut v = Vec::new();
    let mut l = "Operand values:".to_string();
    for o in instruction.operands() {
        let value = operand_value(zmachine, o)?;
        match o.operand_type() {
            OperandType::SmallConstant => l.push_str(&format!(" #{:02x}", value as u8)),
            _ => l.push_str(&format!(" #{:04x}", value)),
        }
        v.push(value)
    }
    if !v.is_empty() {
        debug!(target: "app::instruction", "{}", l);
    }
    Ok(v)
}

/// Evaluate a branch
///
/// A branch is taken when `condition` matches the branch condition.  Branch addresses 0 and 1
/// return false and true, respectively, from the current routine.
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `instruction` - Instruction
/// * `condition` - Result of the instruction's test
///
/// # Returns
/// [Result] with the address of the next instruction or a [RuntimeError]
fn branch(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
    condition: bool,
) -> Result<usize, RuntimeError> {
    match instruction.branch() {
        Some(b) if condition == b.condition() => match b.branch_address() {
            0 => zmachine.return_routine(0),
            1 => zmachine.return_routine(1),
            _ => Ok(b.branch_address()),
        },
        _ => Ok(instruction.next_address()),
    }
}

fn store_result(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
    value: u16,
) -> Result<(), RuntimeError> {
    match instruction.store() {
        Some(s) => zmachine.set_variable(s.variable(), value),
        None => Ok(()),
    }
}

/// Call the routine at a packed address
fn call_fn(
    zmachine: &mut ZMachine,
    instruction: &Instruction,
    operands: &[u16],
) -> Result<usize, RuntimeError> {
    let (routine, arguments) = match operands.split_first() {
        Some((r, a)) => (*r, a),
        None => (0, &operands[0..0]),
    };
    let address = zmachine.packed_routine_address(routine);
    zmachine.call_routine(
        address,
        arguments,
        instruction.store().copied(),
        instruction.next_address(),
    )
}

/// Execute an instruction
///
/// # Arguments
/// * `zmachine` - Reference to the zmachine
/// * `instruction` - Decoded instruction
///
/// # Returns
/// [Result] with the address of the next instruction or a [RuntimeError]
pub fn dispatch(zmachine: &mut ZMachine, instruction: &Instruction) -> Result<usize, RuntimeError> {
    let operation = instruction.opcode().operation();
    if instruction.operands().len() < operation.minimum_operands() {
        return fatal_error!(
            ErrorCode::InvalidInstruction,
            "{} at ${:06x} has {} operands, needs {}",
            instruction.opcode(),
            instruction.address(),
            instruction.operands().len(),
            operation.minimum_operands()
        );
    }

    match operation {
        // 0OP
        Operation::Rtrue => processor_0op::rtrue(zmachine, instruction),
        Operation::Rfalse => processor_0op::rfalse(zmachine, instruction),
        Operation::Print => processor_0op::print(zmachine, instruction),
        Operation::PrintRet => processor_0op::print_ret(zmachine, instruction),
        Operation::Nop => processor_0op::nop(zmachine, instruction),
        Operation::Restart => processor_0op::restart(zmachine, instruction),
        Operation::RetPopped => processor_0op::ret_popped(zmachine, instruction),
        Operation::Pop => processor_0op::pop(zmachine, instruction),
        Operation::Catch => processor_0op::catch(zmachine, instruction),
        Operation::Quit => processor_0op::quit(zmachine, instruction),
        Operation::NewLine => processor_0op::new_line(zmachine, instruction),
        Operation::ShowStatus => processor_0op::show_status(zmachine, instruction),
        Operation::Verify => processor_0op::verify(zmachine, instruction),
        Operation::Piracy => processor_0op::piracy(zmachine, instruction),
        // 1OP
        Operation::Jz => processor_1op::jz(zmachine, instruction),
        Operation::GetSibling => processor_1op::get_sibling(zmachine, instruction),
        Operation::GetChild => processor_1op::get_child(zmachine, instruction),
        Operation::GetParent => processor_1op::get_parent(zmachine, instruction),
        Operation::GetPropLen => processor_1op::get_prop_len(zmachine, instruction),
        Operation::Inc => processor_1op::inc(zmachine, instruction),
        Operation::Dec => processor_1op::dec(zmachine, instruction),
        Operation::PrintAddr => processor_1op::print_addr(zmachine, instruction),
        Operation::Call1S | Operation::Call1N => processor_1op::call_1(zmachine, instruction),
        Operation::RemoveObj => processor_1op::remove_obj(zmachine, instruction),
        Operation::PrintObj => processor_1op::print_obj(zmachine, instruction),
        Operation::Ret => processor_1op::ret(zmachine, instruction),
        Operation::Jump => processor_1op::jump(zmachine, instruction),
        Operation::PrintPaddr => processor_1op::print_paddr(zmachine, instruction),
        Operation::Load => processor_1op::load(zmachine, instruction),
        Operation::Not => processor_1op::not(zmachine, instruction),
        // 2OP
        Operation::Je => processor_2op::je(zmachine, instruction),
        Operation::Jl => processor_2op::jl(zmachine, instruction),
        Operation::Jg => processor_2op::jg(zmachine, instruction),
        Operation::DecChk => processor_2op::dec_chk(zmachine, instruction),
        Operation::IncChk => processor_2op::inc_chk(zmachine, instruction),
        Operation::Jin => processor_2op::jin(zmachine, instruction),
        Operation::Test => processor_2op::test(zmachine, instruction),
        Operation::Or => processor_2op::or(zmachine, instruction),
        Operation::And => processor_2op::and(zmachine, instruction),
        Operation::TestAttr => processor_2op::test_attr(zmachine, instruction),
        Operation::SetAttr => processor_2op::set_attr(zmachine, instruction),
        Operation::ClearAttr => processor_2op::clear_attr(zmachine, instruction),
        Operation::Store => processor_2op::store(zmachine, instruction),
        Operation::InsertObj => processor_2op::insert_obj(zmachine, instruction),
        Operation::Loadw => processor_2op::loadw(zmachine, instruction),
        Operation::Loadb => processor_2op::loadb(zmachine, instruction),
        Operation::GetProp => processor_2op::get_prop(zmachine, instruction),
        Operation::GetPropAddr => processor_2op::get_prop_addr(zmachine, instruction),
        Operation::GetNextProp => processor_2op::get_next_prop(zmachine, instruction),
        Operation::Add => processor_2op::add(zmachine, instruction),
        Operation::Sub => processor_2op::sub(zmachine, instruction),
        Operation::Mul => processor_2op::mul(zmachine, instruction),
        Operation::Div => processor_2op::div(zmachine, instruction),
        Operation::Mod => processor_2op::modulus(zmachine, instruction),
        Operation::Call2S | Operation::Call2N => processor_2op::call_2(zmachine, instruction),
        Operation::SetColour => processor_2op::set_colour(zmachine, instruction),
        Operation::Throw => processor_2op::throw(zmachine, instruction),
        // VAR
        Operation::Call
        | Operation::CallVs2
        | Operation::CallVn
        | Operation::CallVn2 => processor_var::call(zmachine, instruction),
        Operation::Storew => processor_var::storew(zmachine, instruction),
        Operation::Storeb => processor_var::storeb(zmachine, instruction),
        Operation::PutProp => processor_var::put_prop(zmachine, instruction),
        Operation::Sread | Operation::Aread => processor_var::read(zmachine, instruction),
        Operation::PrintChar => processor_var::print_char(zmachine, instruction),
        Operation::PrintNum => processor_var::print_num(zmachine, instruction),
        Operation::Random => processor_var::random(zmachine, instruction),
        Operation::Push => processor_var::push(zmachine, instruction),
        Operation::Pull => processor_var::pull(zmachine, instruction),
        Operation::SplitWindow
        | Operation::SetWindow
        | Operation::EraseWindow
        | Operation::EraseLine
        | Operation::SetCursor
        | Operation::GetCursor
        | Operation::SetTextStyle
        | Operation::BufferMode
        | Operation::OutputStream
        | Operation::InputStream
        | Operation::SoundEffect => processor_var::screen(zmachine, instruction),
        Operation::ReadChar => processor_var::read_char(zmachine, instruction),
        Operation::ScanTable => processor_var::scan_table(zmachine, instruction),
        Operation::Tokenise => processor_var::tokenise(zmachine, instruction),
        Operation::EncodeText => processor_var::encode_text(zmachine, instruction),
        Operation::CopyTable => processor_var::copy_table(zmachine, instruction),
        Operation::PrintTable => processor_var::print_table(zmachine, instruction),
        Operation::CheckArgCount => processor_var::check_arg_count(zmachine, instruction),
        // Save and restore have a branch in V1-3, store in V4+
        Operation::Save => processor_ext::save(zmachine, instruction),
        Operation::Restore => processor_ext::restore(zmachine, instruction),
        // EXT
        Operation::LogShift => processor_ext::log_shift(zmachine, instruction),
        Operation::ArtShift => processor_ext::art_shift(zmachine, instruction),
        Operation::SetFont => processor_ext::set_font(zmachine, instruction),
        Operation::SaveUndo => processor_ext::save_undo(zmachine, instruction),
        Operation::RestoreUndo => processor_ext::restore_undo(zmachine, instruction),
        Operation::PrintUnicode => processor_ext::print_unicode(zmachine, instruction),
        Operation::CheckUnicode => processor_ext::check_unicode(zmachine, instruction),
        Operation::SetTrueColour => processor_ext::set_true_colour(zmachine, instruction),
        Operation::Unknown => recoverable_error!(
            ErrorCode::UnknownOpcode,
            "Unknown opcode {}",
            instruction.opcode()
        ),
    }
}
