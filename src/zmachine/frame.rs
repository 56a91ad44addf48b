//! ZMachine [stack frame](https://inform-fiction.org/zmachine/standards/z1point1/sect06.html#five)
use crate::instruction::StoreResult;
use crate::{error::*, fatal_error};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Stack frame
pub struct Frame {
    /// Address of the routine this frame is executing
    address: usize,
    /// Local variable storage
    local_variables: Vec<u16>,
    /// Number of arguments to the routine
    argument_count: u8,
    /// Evaluation stack
    stack: Vec<u16>,
    /// [Option] with the [StoreResult] location for this frame or [None]
    result: Option<StoreResult>,
    /// The address to return to when this frame returns
    return_address: usize,
}

impl Frame {
    /// Constructor
    ///
    /// # Arguments
    /// * `address` - address of the routine header this frame will execute
    /// * `local_variables` - local variable storage
    /// * `argument_count` - number of arguments passed to the routine
    /// * `result` - [Option] with [StoreResult] location or [None]
    /// * `return_address` - Address to resume execution at when frame returns
    pub fn new(
        address: usize,
        local_variables: &[u16],
        argument_count: u8,
        result: Option<StoreResult>,
        return_address: usize,
    ) -> Frame {
        Frame {
            address,
            local_variables: local_variables.to_vec(),
            argument_count,
            stack: Vec::new(),
            result,
            return_address,
        }
    }

    pub fn address(&self) -> usize {
        self.address
    }

    /// Get a reference to local variable storage
    ///
    /// # Returns
    /// Reference to local variable storage
    pub fn local_variables(&self) -> &[u16] {
        &self.local_variables
    }

    /// Get the number of arguments passed to the frame's routine
    ///
    /// # Returns
    /// The count of arguments passed to the frame's routine
    pub fn argument_count(&self) -> u8 {
        self.argument_count
    }

    /// Get a reference to the stack
    ///
    /// # Returns
    /// Reference to the stack
    pub fn stack(&self) -> &[u16] {
        &self.stack
    }

    /// Pops the value from the top of the stack
    ///
    /// # Returns
    /// [Result] containing the value from the top of the stack or [RuntimeError]
    pub fn pop(&mut self) -> Result<u16, RuntimeError> {
        if let Some(v) = self.stack.pop() {
            debug!(target: "app::state", "Pop {:04x} [{}]", v, self.stack.len());
            Ok(v)
        } else {
            fatal_error!(ErrorCode::StackUnderflow, "Popped an empty stack")
        }
    }

    /// Peeks at the value on the top of the stack without removing it
    ///
    /// # Returns
    /// [Result] containing the value from the top of the stack or [RuntimeError]
    pub fn peek(&self) -> Result<u16, RuntimeError> {
        if let Some(v) = self.stack.last() {
            Ok(*v)
        } else {
            fatal_error!(ErrorCode::StackUnderflow, "Peeked an empty stack")
        }
    }

    /// Pushes a value onto the stack
    ///
    /// # Arguments
    /// * `value` - Value to push
    pub fn push(&mut self, value: u16) {
        self.stack.push(value);
        debug!(target: "app::state", "Push {:04x} [{}]", value, self.stack.len());
    }

    /// Gets the store location for the routine
    ///
    /// # Returns
    /// [Option] with a reference to the [StoreResult] or [None]
    pub fn result(&self) -> Option<&StoreResult> {
        self.result.as_ref()
    }

    /// Gets the return address for the routine
    ///
    /// # Returns
    /// Address to resume execution at when the routine returns
    pub fn return_address(&self) -> usize {
        self.return_address
    }

    /// Gets the value of a local variable.
    ///
    /// If local variable 0 is read, the value is popped from the stack.
    ///
    /// # Arguments
    /// * `variable` - Local variable number, which should be 0 (stack) or from 1 to the number of local variables
    ///
    /// # Returns
    /// [Result] with the local variable value or a [RuntimeError]
    pub fn local_variable(&mut self, variable: u8) -> Result<u16, RuntimeError> {
        if variable == 0 {
            self.pop()
        } else if variable as usize <= self.local_variables.len() {
            Ok(self.local_variables[variable as usize - 1])
        } else {
            fatal_error!(
                ErrorCode::InvalidLocalVariable,
                "Read from invalid local variable {} out of range: {}",
                variable,
                self.local_variables.len()
            )
        }
    }

    /// Peeks at a local variable without removing any values from the stack.
    ///
    /// If local variable 0 is read, the value is peeked from the stack.
    ///
    /// # Arguments
    /// * `variable` - Local variable number, which should be 0 (stack) or from 1 to the number of local variables
    pub fn peek_local_variable(&self, variable: u8) -> Result<u16, RuntimeError> {
        if variable == 0 {
            self.peek()
        } else if variable as usize <= self.local_variables.len() {
            Ok(self.local_variables[variable as usize - 1])
        } else {
            fatal_error!(
                ErrorCode::InvalidLocalVariable,
                "Peek from local variable {} out of range: {}",
                variable,
                self.local_variables.len()
            )
        }
    }

    /// Set a local variable
    ///
    /// If local variable 0 is set, the value is pushed onto the stack
    ///
    /// # Arguments
    /// * `variable` - Local variable number, which should be 0 (stack) or from 1 to the number of local variables
    /// * `value` - Value to set
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError]
    pub fn set_local_variable(&mut self, variable: u8, value: u16) -> Result<(), RuntimeError> {
        if variable == 0 {
            self.push(value);
            Ok(())
        } else if variable as usize <= self.local_variables.len() {
            debug!(target: "app::state", "Set L{:02x} to {:04x}", variable - 1, value);
            self.local_variables[variable as usize - 1] = value;
            Ok(())
        } else {
            fatal_error!(
                ErrorCode::InvalidLocalVariable,
                "Write to local variable {} out of range: {}",
                variable,
                self.local_variables.len()
            )
        }
    }

    /// Set a local variable indirectly.
    ///
    /// If local variable 0 is set, the value will replace the value currently at the top of the stack.
    ///
    /// # Arguments
    /// * `variable` - Local variable number, which should be 0 (stack) or from 1 to the number of local variables
    /// * `value` - Value to set
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError]
    pub fn set_local_variable_indirect(
        &mut self,
        variable: u8,
        value: u16,
    ) -> Result<(), RuntimeError> {
        if variable == 0 {
            self.pop()?;
            self.push(value);
            Ok(())
        } else {
            self.set_local_variable(variable, value)
        }
    }

    /// Create a new frame for a routine call
    ///
    /// # Arguments
    /// * `address` - Address of the routine header
    /// * `arguments` - Arguments to the routine call
    /// * `local_variables` - Local variable storage pre-loaded with default local variable values
    /// * `result` - [Option] with [StoreResult] location or [None]
    /// * `return_address` - Address to resume execution when the routine returns
    pub fn call_routine(
        address: usize,
        arguments: &[u16],
        local_variables: Vec<u16>,
        result: Option<StoreResult>,
        return_address: usize,
    ) -> Frame {
        let mut lv = local_variables;

        for (i, a) in arguments.iter().enumerate() {
            if lv.len() > i {
                lv[i] = *a
            }
        }

        Frame::new(
            address,
            &lv,
            arguments.len() as u8,
            result,
            return_address,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{assert_ok, assert_ok_eq, assert_some_eq};

    use super::*;

    #[test]
    fn test_new() {
        let frame = Frame::new(
            0x1234,
            &[0x1111, 0x2222],
            1,
            Some(StoreResult::new(0x1233, 0x80)),
            0x5678,
        );
        assert_eq!(frame.address(), 0x1234);
        assert_eq!(frame.local_variables(), &[0x1111, 0x2222]);
        assert_eq!(frame.argument_count(), 1);
        assert!(frame.stack().is_empty());
        assert_some_eq!(frame.result(), &StoreResult::new(0x1233, 0x80));
        assert_eq!(frame.return_address(), 0x5678);
    }

    #[test]
    fn test_stack() {
        let mut frame = Frame::new(0x1234, &[], 0, None, 0);
        assert!(frame.pop().is_err());
        assert!(frame.peek().is_err());
        frame.push(0x1111);
        frame.push(0x2222);
        assert_ok_eq!(frame.peek(), 0x2222);
        assert_ok_eq!(frame.pop(), 0x2222);
        assert_ok_eq!(frame.pop(), 0x1111);
        let e = frame.pop().unwrap_err();
        assert_eq!(e.code(), ErrorCode::StackUnderflow);
    }

    #[test]
    fn test_local_variable() {
        let mut frame = Frame::new(0x1234, &[0x1111, 0x2222, 0x3333], 0, None, 0);
        frame.push(0x9999);
        assert_ok_eq!(frame.local_variable(2), 0x2222);
        assert_ok_eq!(frame.peek_local_variable(3), 0x3333);
        assert_ok_eq!(frame.peek_local_variable(0), 0x9999);
        assert_ok_eq!(frame.local_variable(0), 0x9999);
        assert!(frame.local_variable(0).is_err());
        assert!(frame.local_variable(4).is_err());
        assert!(frame.peek_local_variable(4).is_err());
    }

    #[test]
    fn test_set_local_variable() {
        let mut frame = Frame::new(0x1234, &[0x1111, 0x2222, 0x3333], 0, None, 0);
        assert_ok!(frame.set_local_variable(1, 0x4444));
        assert_eq!(frame.local_variables(), &[0x4444, 0x2222, 0x3333]);
        assert_ok!(frame.set_local_variable(0, 0x5555));
        assert_eq!(frame.stack(), &[0x5555]);
        assert!(frame.set_local_variable(4, 0x6666).is_err());
    }

    #[test]
    fn test_set_local_variable_indirect() {
        let mut frame = Frame::new(0x1234, &[0x1111], 0, None, 0);
        assert!(frame.set_local_variable_indirect(0, 0x1234).is_err());
        frame.push(0x1111);
        frame.push(0x2222);
        assert_ok!(frame.set_local_variable_indirect(0, 0x3333));
        assert_eq!(frame.stack(), &[0x1111, 0x3333]);
        assert_ok!(frame.set_local_variable_indirect(1, 0x4444));
        assert_eq!(frame.local_variables(), &[0x4444]);
    }

    #[test]
    fn test_call_routine() {
        let frame = Frame::call_routine(
            0x1234,
            &[0x1111, 0x2222],
            vec![0, 0, 0x9999],
            None,
            0x5678,
        );
        assert_eq!(frame.local_variables(), &[0x1111, 0x2222, 0x9999]);
        assert_eq!(frame.argument_count(), 2);
        assert!(frame.result().is_none());
    }

    #[test]
    fn test_call_routine_extra_arguments() {
        let frame = Frame::call_routine(0x1234, &[0x1111, 0x2222], vec![0], None, 0x5678);
        assert_eq!(frame.local_variables(), &[0x1111]);
        assert_eq!(frame.argument_count(), 2);
    }
}
