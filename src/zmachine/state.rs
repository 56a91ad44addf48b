//! Snapshot of the mutable machine state
use crate::instruction::StoreResult;

use super::{frame::Frame, rng::chacha_rng::ChaChaRng, ExecutionState};

/// Everything needed to rewind a running game: dynamic memory, the program counter, every call
/// frame with its locals and evaluation stack, the RNG and any pending input suspension.
///
/// A `GameState` owns all of its data, so it can be kept, cloned and restored any number of times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    dynamic: Vec<u8>,
    pc: usize,
    frames: Vec<Frame>,
    rng: ChaChaRng,
    execution_state: ExecutionState,
    input_store: Option<StoreResult>,
}

impl GameState {
    pub(crate) fn new(
        dynamic: Vec<u8>,
        pc: usize,
        frames: Vec<Frame>,
        rng: ChaChaRng,
        execution_state: ExecutionState,
        input_store: Option<StoreResult>,
    ) -> GameState {
        GameState {
            dynamic,
            pc,
            frames,
            rng,
            execution_state,
            input_store,
        }
    }

    /// Dynamic memory contents
    pub fn dynamic(&self) -> &[u8] {
        &self.dynamic
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn rng(&self) -> &ChaChaRng {
        &self.rng
    }

    pub fn execution_state(&self) -> &ExecutionState {
        &self.execution_state
    }

    pub fn input_store(&self) -> Option<StoreResult> {
        self.input_store
    }
}
