//! A Z-machine for exploring games rather than playing them
//!
//! The machine runs until it needs input, hands output back to the host, and can snapshot and
//! restore its whole state so a host can try several commands from the same point.
#![crate_name = "zwalker"]

#[macro_use]
extern crate log;

pub mod config;
pub mod dictionary;
pub mod error;
pub mod explore;
pub mod files;
pub mod instruction;
pub mod logging;
pub mod object;
pub mod text;
pub mod zmachine;

#[cfg(test)]
pub mod test_util;
