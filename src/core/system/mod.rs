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

//! System integration module
//!
//! Ties together the simulator components (CPU, memory, tracer, host
//! console) and provides the fetch/execute run loop.

mod console;

pub use console::{BufferedConsole, Console, StdConsole};

use super::cpu::{Cpu, Disassembler, Effect, Stats, Tracer};
use super::error::{Result, SimulatorError};
use super::loader::SymbolTable;
use super::memory::Memory;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The guest terminated normally via an exit `ecall`
    Exited,
    /// Execution hit an instruction with no defined semantics
    DecodeFault {
        /// Address of the faulting instruction
        pc: u32,
        /// The raw encoded word
        word: u32,
    },
    /// A control transfer left the program counter misaligned
    MisalignedPc {
        /// The misaligned fetch address
        pc: u32,
    },
    /// The configured instruction cap was reached
    InsnLimit,
}

/// The result of a run: final statistics plus how it ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Statistics gathered up to the end of the run
    pub stats: Stats,
    /// Why the run ended
    pub status: RunStatus,
}

/// RV32 simulator system
///
/// Owns the CPU, the guest memory, the statistics, the optional execution
/// tracer, and the host console. The memory is populated by the loader
/// before the run starts; the run loop executes instructions until the
/// guest exits, faults, or hits the optional instruction cap.
///
/// # Example
/// ```
/// use rv32sim::core::memory::Memory;
/// use rv32sim::core::system::System;
///
/// let mut mem = Memory::new();
/// mem.write32(0x1000, 0x00300893); // addi x17, x0, 3
/// mem.write32(0x1004, 0x00000073); // ecall (exit)
///
/// let mut system = System::new(mem, 0x1000);
/// let summary = system.run(0).unwrap();
/// assert_eq!(summary.stats.insns, 2);
/// ```
pub struct System {
    /// CPU state, owned by the run
    cpu: Cpu,
    /// Guest memory
    mem: Memory,
    /// Dynamic execution statistics
    stats: Stats,
    /// Host console for `ecall` services
    console: Box<dyn Console>,
    /// Optional per-instruction trace sink
    tracer: Option<Tracer>,
    /// Symbols used to annotate traced disassembly
    symbols: SymbolTable,
}

impl System {
    /// Create a system over a populated memory, starting at `entry`
    ///
    /// The console defaults to the process's stdin/stdout.
    pub fn new(mem: Memory, entry: u32) -> Self {
        Self {
            cpu: Cpu::new(entry),
            mem,
            stats: Stats::default(),
            console: Box::new(StdConsole),
            tracer: None,
            symbols: SymbolTable::new(),
        }
    }

    /// Replace the host console (used by tests and embedders)
    pub fn set_console(&mut self, console: Box<dyn Console>) {
        self.console = console;
    }

    /// Attach a per-instruction trace sink
    pub fn attach_tracer(&mut self, tracer: Tracer) {
        self.tracer = Some(tracer);
    }

    /// Provide symbols for disassembly annotation in the trace
    pub fn set_symbols(&mut self, symbols: SymbolTable) {
        self.symbols = symbols;
    }

    /// CPU state accessor
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Guest memory accessor
    pub fn mem(&self) -> &Memory {
        &self.mem
    }

    /// Statistics gathered so far
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Current program counter
    pub fn pc(&self) -> u32 {
        self.cpu.pc()
    }

    /// Execute one instruction
    ///
    /// Steps the CPU and, when a tracer is attached, writes the trace line
    /// for the committed instruction.
    ///
    /// # Returns
    ///
    /// The committed effect, or an error for a misaligned `pc`, an
    /// unhandled encoding, or a host I/O failure.
    pub fn step(&mut self) -> Result<Effect> {
        let event = self
            .cpu
            .step(&mut self.mem, self.console.as_mut(), &mut self.stats)?;

        if let Some(tracer) = &mut self.tracer {
            let disasm = Disassembler::disassemble(event.pc, event.word, Some(&self.symbols));
            tracer.trace(self.stats.insns, &event, &disasm)?;
            if event.effect == Effect::Exited {
                tracer.terminated(event.pc)?;
            }
        }

        Ok(event.effect)
    }

    /// Run until the guest exits, faults, or hits the instruction cap
    ///
    /// Decode faults and misaligned program counters end the run and are
    /// reported in the summary together with the statistics gathered so
    /// far; they are not `Err` values. Host I/O failures (trace sink,
    /// console) are fatal and propagate as errors.
    ///
    /// # Arguments
    ///
    /// * `max_insns` - Stop after this many instructions; 0 means no cap
    ///
    /// # Returns
    ///
    /// The [`RunSummary`] describing how the run ended.
    pub fn run(&mut self, max_insns: u64) -> Result<RunSummary> {
        loop {
            if max_insns != 0 && self.stats.insns >= max_insns {
                self.flush_tracer()?;
                return Ok(self.summary(RunStatus::InsnLimit));
            }

            match self.step() {
                Ok(Effect::Exited) => {
                    self.flush_tracer()?;
                    return Ok(self.summary(RunStatus::Exited));
                }
                Ok(_) => {}
                Err(SimulatorError::UnhandledInstruction { pc, word }) => {
                    if let Some(tracer) = &mut self.tracer {
                        tracer.unhandled_instruction(pc, word)?;
                    }
                    self.flush_tracer()?;
                    return Ok(self.summary(RunStatus::DecodeFault { pc, word }));
                }
                Err(SimulatorError::MisalignedPc { pc }) => {
                    log::error!("misaligned program counter 0x{:08x}", pc);
                    self.flush_tracer()?;
                    return Ok(self.summary(RunStatus::MisalignedPc { pc }));
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn summary(&self, status: RunStatus) -> RunSummary {
        RunSummary {
            stats: self.stats,
            status,
        }
    }

    fn flush_tracer(&mut self) -> Result<()> {
        if let Some(tracer) = &mut self.tracer {
            tracer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
