// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-instruction execution tracer
//!
//! Writes one deterministic line per committed instruction to a log file:
//! the running instruction count, the fetch address, the raw encoded word,
//! the disassembled text, and the update the instruction committed. Branch
//! lines indicate taken versus not-taken.

use super::instructions::{Effect, StepEvent};
use crate::core::error::Result;
use std::fs::File;
use std::io::Write;

/// Execution trace sink
///
/// # Example
/// ```no_run
/// use rv32sim::core::cpu::Tracer;
///
/// let tracer = Tracer::new("trace.log").unwrap();
/// ```
pub struct Tracer {
    /// Output file handle
    output: File,
}

impl Tracer {
    /// Create a new tracer writing to `path`
    ///
    /// An existing file at `path` is overwritten.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the output trace file
    ///
    /// # Returns
    ///
    /// - `Ok(Tracer)` if the file was created successfully
    /// - `Err(SimulatorError)` if file creation fails
    pub fn new(path: &str) -> Result<Self> {
        let output = File::create(path)?;
        Ok(Self { output })
    }

    /// Record one committed instruction
    ///
    /// # Arguments
    ///
    /// * `count` - Running instruction count (this instruction included)
    /// * `event` - The committed step (fetch address, word, effect)
    /// * `disasm` - Disassembled text of the instruction
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the line was written
    /// - `Err(SimulatorError)` if writing fails (fatal to the run)
    pub fn trace(&mut self, count: u64, event: &StepEvent, disasm: &str) -> Result<()> {
        let effect = Self::render_effect(&event.effect);

        if effect.is_empty() {
            writeln!(
                self.output,
                "{:8}     {:08x} : {:08x}     {}",
                count, event.pc, event.word, disasm
            )?;
        } else {
            writeln!(
                self.output,
                "{:8}     {:08x} : {:08x}     {:<32} {}",
                count, event.pc, event.word, disasm, effect
            )?;
        }

        Ok(())
    }

    /// Record normal guest termination
    pub fn terminated(&mut self, pc: u32) -> Result<()> {
        writeln!(self.output, "Program terminated at {:08x}", pc)?;
        Ok(())
    }

    /// Record an unhandled instruction ending the run
    pub fn unhandled_instruction(&mut self, pc: u32, word: u32) -> Result<()> {
        writeln!(
            self.output,
            "Unhandled instruction {:08x} at {:08x}",
            word, pc
        )?;
        Ok(())
    }

    /// Flush buffered trace data to disk
    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    fn render_effect(effect: &Effect) -> String {
        match effect {
            Effect::None => String::new(),
            Effect::RegWrite { rd, value } => format!("x{} <- {:08x}", rd, value),
            Effect::Store { addr, value, width } => match width {
                1 => format!("[{:08x}] <- {:02x}", addr, value),
                2 => format!("[{:08x}] <- {:04x}", addr, value),
                _ => format!("[{:08x}] <- {:08x}", addr, value),
            },
            Effect::Branch { taken: true, target } => format!("taken -> {:08x}", target),
            Effect::Branch { taken: false, .. } => "not taken".to_string(),
            Effect::Exited => "exit".to_string(),
        }
    }
}
