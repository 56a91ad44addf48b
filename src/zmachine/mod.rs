//! The Z-machine: memory, call frames, execution state and the run loop
use std::{cell::Cell, collections::HashSet, fmt};

use crate::{
    config::Config,
    dictionary,
    error::{ErrorCode, RuntimeError},
    explore, fatal_error,
    instruction::{
        decoder, processor, Instruction, StoreResult,
    },
    logging, object, recoverable_error, text,
};

use self::{
    frame::Frame,
    header::{Header, HeaderField},
    memory::Memory,
    rng::{chacha_rng::ChaChaRng, ZRng},
    state::GameState,
};

pub mod frame;
pub mod header;
pub mod memory;
pub mod rng;
pub mod state;

/// Flags 1 bits set for V1-3 games
const FLAGS1_STATUS_LINE_NOT_AVAILABLE: u8 = 0x10;
const FLAGS1_SCREEN_SPLIT_AVAILABLE: u8 = 0x20;
const FLAGS1_VARIABLE_PITCH_DEFAULT: u8 = 0x40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How recoverable errors are handled
pub enum ErrorHandling {
    ContinueWarnAlways,
    ContinueWarnOnce,
    Ignore,
    Abort,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where the machine is in its execution
pub enum ExecutionState {
    /// Executing instructions
    Running,
    /// Suspended by `sread`/`aread` until a line of input is sent
    AwaitingInput {
        text_buffer: usize,
        parse_buffer: usize,
    },
    /// Suspended by `read_char` until input is sent
    AwaitingChar,
    /// The program quit or returned from its outermost routine
    Finished,
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExecutionState::Running => write!(f, "running"),
            ExecutionState::AwaitingInput {
                text_buffer,
                parse_buffer,
            } => write!(
                f,
                "awaiting input (text ${:04x}, parse ${:04x})",
                text_buffer, parse_buffer
            ),
            ExecutionState::AwaitingChar => write!(f, "awaiting a character"),
            ExecutionState::Finished => write!(f, "finished"),
        }
    }
}

pub struct ZMachine {
    version: u8,
    header: Header,
    memory: Memory,
    config: Config,
    rng: ChaChaRng,
    frames: Vec<Frame>,
    pc: usize,
    state: ExecutionState,
    /// Variable receiving the result of a suspended `aread` or `read_char`
    input_store: Option<StoreResult>,
    output: String,
    output_sink: Option<Box<dyn FnMut(&str)>>,
    undo: Option<(GameState, Option<StoreResult>)>,
    warnings: HashSet<String>,
    instruction_count: usize,
    player: Cell<Option<usize>>,
}

impl ZMachine {
    /// Load a game image with the default configuration
    ///
    /// # Arguments
    /// * `zcode` - Game file contents
    ///
    /// # Returns
    /// [Result] with the machine, ready to run, or a [RuntimeError] if the header is invalid
    pub fn load(zcode: &[u8]) -> Result<ZMachine, RuntimeError> {
        ZMachine::new(zcode, &Config::default())
    }

    /// Constructor
    ///
    /// # Arguments
    /// * `zcode` - Game file contents
    /// * `config` - Runtime configuration
    ///
    /// # Returns
    /// [Result] with the machine, ready to run, or a [RuntimeError] if the header is invalid
    pub fn new(zcode: &[u8], config: &Config) -> Result<ZMachine, RuntimeError> {
        if config.logging() {
            logging::init();
        }

        let header = Header::try_from(zcode)?;
        if header.file_length() > 0 && header.file_length() != zcode.len() {
            debug!(target: "app::trace", "Header file length {:#x} differs from image size {:#x}", header.file_length(), zcode.len());
        }

        let rng = match config.random_seed() {
            Some(seed) if seed > 0 => ChaChaRng::seeded(seed),
            _ => ChaChaRng::new(),
        };

        let mut zmachine = ZMachine {
            version: header.version(),
            header,
            memory: Memory::new(zcode.to_vec()),
            config: config.clone(),
            rng,
            frames: Vec::new(),
            pc: 0,
            state: ExecutionState::Running,
            input_store: None,
            output: String::new(),
            output_sink: None,
            undo: None,
            warnings: HashSet::new(),
            instruction_count: 0,
            player: Cell::new(None),
        };

        zmachine.initialize()?;
        info!(target: "app::trace", "Loaded version {} game, release {} serial {}", zmachine.version, zmachine.header.release(), zmachine.header.serial());
        Ok(zmachine)
    }

    /// Set interpreter header fields and create the initial frame
    fn initialize(&mut self) -> Result<(), RuntimeError> {
        if self.version < 4 {
            let flags1 = self.read_byte(HeaderField::Flags1 as usize)?;
            let flags1 = (flags1 | FLAGS1_SCREEN_SPLIT_AVAILABLE)
                & !(FLAGS1_STATUS_LINE_NOT_AVAILABLE | FLAGS1_VARIABLE_PITCH_DEFAULT);
            self.write_byte(HeaderField::Flags1 as usize, flags1)?;
        } else {
            self.write_byte(HeaderField::ScreenLines as usize, 255)?;
            self.write_byte(HeaderField::ScreenColumns as usize, 80)?;
        }

        self.write_byte(HeaderField::InterpreterNumber as usize, 6)?;
        self.write_byte(HeaderField::InterpreterVersion as usize, b'Z')?;
        self.write_word(HeaderField::Revision as usize, 0x0100)?;

        self.frames.clear();
        if self.version == 6 {
            // V6 starts by calling the main routine
            let address = self.packed_routine_address(self.header.initial_pc() as u16);
            let (pc, local_variables) = self.routine_header(address)?;
            self.frames
                .push(Frame::new(address, &local_variables, 0, None, 0));
            self.pc = pc;
        } else {
            let pc = self.header.initial_pc();
            self.frames.push(Frame::new(pc, &[], 0, None, 0));
            self.pc = pc;
        }

        Ok(())
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Address of the next instruction to execute
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn is_awaiting_input(&self) -> bool {
        matches!(
            self.state,
            ExecutionState::AwaitingInput { .. } | ExecutionState::AwaitingChar
        )
    }

    pub fn is_finished(&self) -> bool {
        self.state == ExecutionState::Finished
    }

    /// Number of instructions executed since the machine was loaded
    pub fn instruction_count(&self) -> usize {
        self.instruction_count
    }

    // Memory access
    pub fn read_byte(&self, address: usize) -> Result<u8, RuntimeError> {
        self.memory.read_byte(address)
    }

    pub fn read_word(&self, address: usize) -> Result<u16, RuntimeError> {
        self.memory.read_word(address)
    }

    pub fn write_byte(&mut self, address: usize, value: u8) -> Result<(), RuntimeError> {
        self.memory.write_byte(address, value)
    }

    pub fn write_word(&mut self, address: usize, value: u16) -> Result<(), RuntimeError> {
        self.memory.write_word(address, value)
    }

    pub fn memory_size(&self) -> usize {
        self.memory.size()
    }

    /// Copy of a range of memory, truncated at the end of the memory map
    pub fn memory_slice(&self, address: usize, length: usize) -> Vec<u8> {
        self.memory.slice(address, length)
    }

    // Packed addresses
    pub fn packed_routine_address(&self, address: u16) -> usize {
        match self.version {
            1..=3 => address as usize * 2,
            4 | 5 => address as usize * 4,
            6 | 7 => (address as usize * 4) + (self.header.routines_offset() * 8),
            _ => address as usize * 8,
        }
    }

    pub fn packed_string_address(&self, address: u16) -> usize {
        match self.version {
            1..=3 => address as usize * 2,
            4 | 5 => address as usize * 4,
            6 | 7 => (address as usize * 4) + (self.header.strings_offset() * 8),
            _ => address as usize * 8,
        }
    }

    // Frame stack
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn current_frame(&self) -> Result<&Frame, RuntimeError> {
        match self.frames.last() {
            Some(frame) => Ok(frame),
            None => fatal_error!(ErrorCode::FrameUnderflow, "No runtime frame"),
        }
    }

    fn current_frame_mut(&mut self) -> Result<&mut Frame, RuntimeError> {
        match self.frames.last_mut() {
            Some(frame) => Ok(frame),
            None => fatal_error!(ErrorCode::FrameUnderflow, "No runtime frame"),
        }
    }

    /// Reads a routine header
    ///
    /// # Arguments
    /// * `address` - Byte address of the routine
    ///
    /// # Returns
    /// [Result] with a tuple (address of the first instruction, initial local variable values) or a [RuntimeError]
    fn routine_header(&self, address: usize) -> Result<(usize, Vec<u16>), RuntimeError> {
        if address >= self.memory.size() {
            return fatal_error!(
                ErrorCode::InvalidRoutine,
                "Routine address ${:06x} is beyond the end of memory",
                address
            );
        }

        let variable_count = self.read_byte(address)? as usize;
        if variable_count > 15 {
            return fatal_error!(
                ErrorCode::InvalidRoutine,
                "Routine at ${:06x} declares {} local variables",
                address,
                variable_count
            );
        }

        if self.version < 5 {
            let mut local_variables = Vec::new();
            for i in 0..variable_count {
                local_variables.push(self.read_word(address + 1 + (i * 2))?);
            }
            Ok((address + 1 + (variable_count * 2), local_variables))
        } else {
            Ok((address + 1, vec![0; variable_count]))
        }
    }

    /// Call a routine
    ///
    /// A call to address 0 stores 0 (if a result is expected) and continues at `return_address`.
    ///
    /// # Arguments
    /// * `address` - Byte address of the routine
    /// * `arguments` - Arguments, which overwrite the first local variables
    /// * `result` - [Option] with the [StoreResult] for the return value or [None]
    /// * `return_address` - Address to resume at when the routine returns
    ///
    /// # Returns
    /// [Result] with the address of the next instruction or a [RuntimeError]
    pub fn call_routine(
        &mut self,
        address: usize,
        arguments: &[u16],
        result: Option<StoreResult>,
        return_address: usize,
    ) -> Result<usize, RuntimeError> {
        if address == 0 {
            if let Some(r) = result {
                self.set_variable(r.variable(), 0)?;
            }
            return Ok(return_address);
        }

        let (initial_pc, local_variables) = self.routine_header(address)?;
        debug!(target: "app::frame", "Call ${:06x} with {:04x?}, return to ${:06x}", address, arguments, return_address);
        let frame = Frame::call_routine(
            address,
            arguments,
            local_variables,
            result,
            return_address,
        );
        self.frames.push(frame);
        Ok(initial_pc)
    }

    /// Return from the current routine
    ///
    /// Returning from the outermost routine finishes execution.
    ///
    /// # Arguments
    /// * `value` - Return value
    ///
    /// # Returns
    /// [Result] with the address of the next instruction or a [RuntimeError]
    pub fn return_routine(&mut self, value: u16) -> Result<usize, RuntimeError> {
        if self.frames.len() < 2 {
            info!(target: "app::frame", "Return {:04x} from the outermost routine, execution finished", value);
            self.state = ExecutionState::Finished;
            return Ok(self.pc);
        }

        match self.frames.pop() {
            Some(f) => {
                debug!(target: "app::frame", "Return {:04x} => {:?} to ${:06x}", value, f.result(), f.return_address());
                if let Some(r) = f.result() {
                    self.set_variable(r.variable(), value)?;
                }
                Ok(f.return_address())
            }
            None => fatal_error!(
                ErrorCode::FrameUnderflow,
                "Return from routine with nowhere to return to"
            ),
        }
    }

    pub fn argument_count(&self) -> Result<u8, RuntimeError> {
        Ok(self.current_frame()?.argument_count())
    }

    /// Unwind the frame stack to `depth` frames and return from the routine at that depth
    pub fn throw(&mut self, depth: u16, result: u16) -> Result<usize, RuntimeError> {
        if depth == 0 || depth as usize > self.frames.len() {
            return fatal_error!(
                ErrorCode::FrameUnderflow,
                "Throw to frame {} with {} frames",
                depth,
                self.frames.len()
            );
        }

        self.frames.truncate(depth as usize);
        self.return_routine(result)
    }

    // Variables
    fn global_variable_address(&self, variable: u8) -> usize {
        self.header.global_table() + ((variable as usize - 16) * 2)
    }

    pub fn variable(&mut self, variable: u8) -> Result<u16, RuntimeError> {
        if variable < 16 {
            self.current_frame_mut()?.local_variable(variable)
        } else {
            self.read_word(self.global_variable_address(variable))
        }
    }

    /// Read a variable without popping the stack
    pub fn peek_variable(&self, variable: u8) -> Result<u16, RuntimeError> {
        if variable < 16 {
            self.current_frame()?.peek_local_variable(variable)
        } else {
            self.read_word(self.global_variable_address(variable))
        }
    }

    pub fn set_variable(&mut self, variable: u8, value: u16) -> Result<(), RuntimeError> {
        if variable < 16 {
            self.current_frame_mut()?.set_local_variable(variable, value)
        } else {
            debug!(target: "app::state", "Set G{:02x} to {:04x}", variable - 16, value);
            let address = self.global_variable_address(variable);
            self.write_word(address, value)
        }
    }

    /// Set a variable, replacing the top of the stack rather than pushing for variable 0
    pub fn set_variable_indirect(&mut self, variable: u8, value: u16) -> Result<(), RuntimeError> {
        if variable < 16 {
            self.current_frame_mut()?
                .set_local_variable_indirect(variable, value)
        } else {
            self.set_variable(variable, value)
        }
    }

    pub fn push(&mut self, value: u16) -> Result<(), RuntimeError> {
        self.current_frame_mut()?.push(value);
        Ok(())
    }

    /// Global variable value by global number (variable - 16)
    pub fn global(&self, global: u8) -> Result<u16, RuntimeError> {
        self.read_word(self.header.global_table() + (global as usize * 2))
    }

    // RNG
    pub fn random(&mut self, range: u16) -> u16 {
        self.rng.random(range)
    }

    /// Reseed the RNG, 0 seeds from entropy
    pub fn seed(&mut self, seed: u16) {
        self.rng.seed(seed)
    }

    // Output
    /// Append text to the output buffer and pass it to the output sink, if any
    pub fn print(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        self.output.push_str(text);
        if let Some(sink) = self.output_sink.as_mut() {
            sink(text);
        }
    }

    /// Drain the output buffer
    ///
    /// # Returns
    /// All text printed since the last call
    pub fn get_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Output printed since the last [get_output](ZMachine::get_output), without draining it
    pub fn peek_output(&self) -> &str {
        &self.output
    }

    /// Receive each printed fragment as it's printed
    pub fn set_output_sink(&mut self, sink: Box<dyn FnMut(&str)>) {
        self.output_sink = Some(sink);
    }

    // Input suspension
    pub(crate) fn await_input(
        &mut self,
        text_buffer: usize,
        parse_buffer: usize,
        result: Option<StoreResult>,
    ) {
        debug!(target: "app::input", "Suspend for input: text ${:04x}, parse ${:04x}", text_buffer, parse_buffer);
        self.state = ExecutionState::AwaitingInput {
            text_buffer,
            parse_buffer,
        };
        self.input_store = result;
    }

    pub(crate) fn await_char(&mut self, result: Option<StoreResult>) {
        debug!(target: "app::input", "Suspend for a character");
        self.state = ExecutionState::AwaitingChar;
        self.input_store = result;
    }

    pub(crate) fn quit(&mut self) {
        info!(target: "app::trace", "Quit after {} instructions", self.instruction_count);
        self.state = ExecutionState::Finished;
    }

    /// Write player input into a text buffer
    fn store_input(&mut self, text_buffer: usize, input: &str) -> Result<(), RuntimeError> {
        let max = self.read_byte(text_buffer)? as usize;
        // V1-4 buffers include the terminator in their length
        let max = if self.version < 5 {
            max.saturating_sub(1)
        } else {
            max
        };
        let data: Vec<u8> = input
            .to_lowercase()
            .chars()
            .filter(|c| *c != '\n' && *c != '\r')
            .map(text::char_zscii)
            .take(max)
            .collect();

        if self.version < 5 {
            for (i, b) in data.iter().enumerate() {
                self.write_byte(text_buffer + 1 + i, *b)?;
            }
            self.write_byte(text_buffer + 1 + data.len(), 0)
        } else {
            self.write_byte(text_buffer + 1, data.len() as u8)?;
            for (i, b) in data.iter().enumerate() {
                self.write_byte(text_buffer + 2 + i, *b)?;
            }
            Ok(())
        }
    }

    /// Resume a suspended machine with input
    ///
    /// A line of input is written to the text buffer and tokenised into the parse buffer. A
    /// `read_char` receives the first character of `input`, or a carriage return when it's empty.
    ///
    /// # Arguments
    /// * `input` - Player input
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError] if the machine isn't waiting for input
    pub fn send_input(&mut self, input: &str) -> Result<(), RuntimeError> {
        match self.state.clone() {
            ExecutionState::AwaitingInput {
                text_buffer,
                parse_buffer,
            } => {
                info!(target: "app::input", "Input: {:?}", input);
                self.store_input(text_buffer, input)?;
                if parse_buffer > 0 {
                    let dictionary = self.header.dictionary();
                    dictionary::parse_text(self, text_buffer, parse_buffer, dictionary, false)?;
                }
                if let Some(r) = self.input_store.take() {
                    self.set_variable(r.variable(), 13)?;
                }
                self.state = ExecutionState::Running;
                Ok(())
            }
            ExecutionState::AwaitingChar => {
                let c = match input.chars().next() {
                    Some(c) => text::char_zscii(c) as u16,
                    None => 13,
                };
                info!(target: "app::input", "Input character: {}", c);
                if let Some(r) = self.input_store.take() {
                    self.set_variable(r.variable(), c)?;
                }
                self.state = ExecutionState::Running;
                Ok(())
            }
            state => recoverable_error!(
                ErrorCode::NotAwaitingInput,
                "Input sent while the machine is {}",
                state
            ),
        }
    }

    // State
    /// Capture the mutable machine state
    pub fn save_state(&self) -> GameState {
        GameState::new(
            self.memory.dynamic_state(),
            self.pc,
            self.frames.clone(),
            self.rng.clone(),
            self.state.clone(),
            self.input_store,
        )
    }

    /// Restore a state captured by [save_state](ZMachine::save_state)
    ///
    /// Any current input suspension is replaced by the one in the snapshot.
    ///
    /// # Arguments
    /// * `state` - Snapshot
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError] if the snapshot doesn't fit this game
    pub fn restore_state(&mut self, state: &GameState) -> Result<(), RuntimeError> {
        if state.frames().is_empty() {
            return fatal_error!(ErrorCode::FrameUnderflow, "Snapshot has no frames");
        }

        self.memory.restore(state.dynamic())?;
        self.pc = state.pc();
        self.frames = state.frames().to_vec();
        self.rng = state.rng().clone();
        self.state = state.execution_state().clone();
        self.input_store = state.input_store();
        debug!(target: "app::state", "Restored state: pc ${:06x}, {} frames, {}", self.pc, self.frames.len(), self.state);
        Ok(())
    }

    /// Keep a single undo state that resumes at `pc`, storing to `result`
    pub fn save_undo(&mut self, pc: usize, result: Option<StoreResult>) {
        let state = GameState::new(
            self.memory.dynamic_state(),
            pc,
            self.frames.clone(),
            self.rng.clone(),
            ExecutionState::Running,
            None,
        );
        debug!(target: "app::state", "Storing undo state");
        self.undo = Some((state, result));
    }

    /// Rewind to the undo state
    ///
    /// # Returns
    /// [Result] with the address to resume at, [None] if there is no undo state, or a [RuntimeError]
    pub fn restore_undo(&mut self) -> Result<Option<usize>, RuntimeError> {
        match self.undo.take() {
            Some((state, result)) => {
                debug!(target: "app::state", "Restoring undo state");
                self.restore_state(&state)?;
                if let Some(r) = result {
                    self.set_variable(r.variable(), 2)?;
                }
                Ok(Some(state.pc()))
            }
            None => {
                warn!(target: "app::state", "No saved state for undo");
                Ok(None)
            }
        }
    }

    /// Reset the machine to its initial state
    ///
    /// # Returns
    /// [Result] with the initial program counter or a [RuntimeError]
    pub fn restart(&mut self) -> Result<usize, RuntimeError> {
        info!(target: "app::trace", "Restart");
        self.memory.reset();
        self.rng = match self.config.random_seed() {
            Some(seed) if seed > 0 => ChaChaRng::seeded(seed),
            _ => ChaChaRng::new(),
        };
        self.state = ExecutionState::Running;
        self.input_store = None;
        self.output.clear();
        self.undo = None;
        self.player.set(None);
        self.initialize()?;
        Ok(self.pc)
    }

    // Execution
    /// Apply the configured error handling to a recoverable error
    ///
    /// # Returns
    /// [Result] with the address to continue at, or the error when execution should stop
    fn recover(
        &mut self,
        instruction: &Instruction,
        error: RuntimeError,
    ) -> Result<usize, RuntimeError> {
        if !error.is_recoverable() {
            error!(target: "app::trace", "{}: {}", instruction, error);
            return Err(error);
        }

        match self.config.error_handling() {
            ErrorHandling::Abort => {
                error!(target: "app::trace", "{}: {}", instruction, error);
                Err(error)
            }
            ErrorHandling::Ignore => Ok(instruction.next_address()),
            ErrorHandling::ContinueWarnAlways => {
                warn!(target: "app::trace", "{}: {}", instruction, error);
                Ok(instruction.next_address())
            }
            ErrorHandling::ContinueWarnOnce => {
                if self.warnings.insert(error.message().to_string()) {
                    warn!(target: "app::trace", "{}: {} (further occurrences will not be reported)", instruction, error);
                }
                Ok(instruction.next_address())
            }
        }
    }

    /// Decode and execute the instruction at the program counter
    ///
    /// # Returns
    /// Empty [Result] or a [RuntimeError]
    pub fn step(&mut self) -> Result<(), RuntimeError> {
        let instruction = decoder::decode_instruction(self, self.pc)?;
        self.instruction_count += 1;
        logging::set_instruction_count(self.instruction_count);
        debug!(target: "app::instruction", "{}", instruction);

        self.pc = match processor::dispatch(self, &instruction) {
            Ok(pc) => pc,
            Err(e) => self.recover(&instruction, e)?,
        };
        Ok(())
    }

    /// Run until the machine suspends for input, finishes, or `max_instructions` have executed
    ///
    /// # Arguments
    /// * `max_instructions` - Instruction cap for this call
    ///
    /// # Returns
    /// [Result] with the resulting [ExecutionState] or a [RuntimeError]
    pub fn run(&mut self, max_instructions: usize) -> Result<ExecutionState, RuntimeError> {
        let mut n = 0;
        while self.state == ExecutionState::Running {
            if n >= max_instructions {
                warn!(target: "app::trace", "Stopped after {} instructions at ${:06x}", n, self.pc);
                break;
            }
            self.step()?;
            n += 1;
        }

        Ok(self.state.clone())
    }

    /// Run with the configured instruction cap
    pub fn run_default(&mut self) -> Result<ExecutionState, RuntimeError> {
        self.run(self.config.max_instructions())
    }

    // Introspection
    pub fn object_name(&self, object: usize) -> Result<String, RuntimeError> {
        object::property::short_name(self, object)
    }

    pub fn object_parent(&self, object: usize) -> Result<usize, RuntimeError> {
        object::parent(self, object)
    }

    pub fn object_child(&self, object: usize) -> Result<usize, RuntimeError> {
        object::child(self, object)
    }

    pub fn object_sibling(&self, object: usize) -> Result<usize, RuntimeError> {
        object::sibling(self, object)
    }

    pub fn attribute(&self, object: usize, attribute: u8) -> Result<bool, RuntimeError> {
        object::attribute::value(self, object, attribute)
    }

    pub fn property(&self, object: usize, property: u8) -> Result<u16, RuntimeError> {
        object::property::property(self, object, property)
    }

    /// Every word in the game dictionary, in dictionary order
    pub fn dictionary_words(&self) -> Result<Vec<String>, RuntimeError> {
        Ok(dictionary::entries(self, self.header.dictionary())?
            .into_iter()
            .map(|(_, word)| word.trim().to_string())
            .collect())
    }

    /// Best guess at the room the player is in; see [explore::current_room]
    pub fn current_room(&self) -> Option<usize> {
        explore::current_room(self)
    }

    pub(crate) fn cached_player(&self) -> Option<usize> {
        self.player.get()
    }

    pub(crate) fn cache_player(&self, player: usize) {
        self.player.set(Some(player))
    }
}
