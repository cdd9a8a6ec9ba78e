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

pub mod decode;
pub mod disassembler;
mod instructions;
pub mod tracer;

pub use disassembler::Disassembler;
pub use instructions::{Effect, StepEvent};
pub use tracer::Tracer;

use crate::core::error::{Result, SimulatorError};
use crate::core::memory::Memory;
use crate::core::system::Console;

use decode::decode;

/// CPU (RV32IM hart) state
///
/// # Specifications
/// - Architecture: RV32I base integer ISA + M extension
/// - Registers: 32 general-purpose 32-bit registers
/// - One hart; the state is a value owned by the run, not process-wide
///
/// # Example
/// ```
/// use rv32sim::core::cpu::Cpu;
///
/// let cpu = Cpu::new(0x1000);
/// assert_eq!(cpu.reg(0), 0); // x0 is always 0
/// assert_eq!(cpu.pc(), 0x1000);
/// ```
pub struct Cpu {
    /// General purpose registers (x0-x31)
    ///
    /// x0 is hardwired to always return 0
    regs: [u32; 32],

    /// Program counter: byte address of the next instruction to fetch
    pc: u32,

    /// Address the current instruction will fall through to
    ///
    /// Defaults to `pc + 4` each step; control-transfer instructions
    /// overwrite it with their absolute target.
    next_pc: u32,
}

/// Dynamic execution statistics
///
/// `insns` counts every committed instruction, `branches` every executed
/// conditional branch, and `taken_branches` the subset that was taken.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Committed instructions
    pub insns: u64,
    /// Executed conditional branches
    pub branches: u64,
    /// Conditional branches that were taken
    pub taken_branches: u64,
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} instructions, {} branches ({} taken)",
            self.insns, self.branches, self.taken_branches
        )
    }
}

impl Cpu {
    /// Register x10 (a0): first syscall argument / return value
    pub const REG_A0: u8 = 10;
    /// Register x17 (a7): syscall number
    pub const REG_A7: u8 = 17;

    /// Create a new CPU with all registers zeroed and `pc` at `entry`
    pub fn new(entry: u32) -> Self {
        Self {
            regs: [0u32; 32],
            pc: entry,
            next_pc: entry.wrapping_add(4),
        }
    }

    /// Reset all registers and restart execution at `entry`
    pub fn reset(&mut self, entry: u32) {
        self.regs = [0u32; 32];
        self.pc = entry;
        self.next_pc = entry.wrapping_add(4);
    }

    /// Read a general purpose register
    ///
    /// # Arguments
    /// - `index`: Register number (0-31)
    ///
    /// # Returns
    /// Register value. x0 always returns 0.
    #[inline(always)]
    pub fn reg(&self, index: u8) -> u32 {
        if index == 0 {
            0
        } else {
            self.regs[index as usize]
        }
    }

    /// Write a general purpose register
    ///
    /// Writes to x0 are silently discarded.
    ///
    /// # Arguments
    /// - `index`: Register number (0-31)
    /// - `value`: Value to write
    #[inline(always)]
    pub fn set_reg(&mut self, index: u8, value: u32) {
        if index != 0 {
            self.regs[index as usize] = value;
        }
    }

    /// Current program counter
    #[inline(always)]
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Set the program counter (used by embedders to select an entry point)
    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
        self.next_pc = pc.wrapping_add(4);
    }

    /// Fetch, decode, and execute one instruction
    ///
    /// Performs one interpreter step: forces x0 to zero, checks that `pc`
    /// is 4-byte aligned, fetches the word at `pc`, bumps the instruction
    /// counter, executes the decoded operation, and advances `pc` (control
    /// transfers overwrite the fall-through target).
    ///
    /// # Arguments
    ///
    /// * `mem` - Guest memory
    /// * `console` - Host console for `ecall` services
    /// * `stats` - Statistics updated by this step
    ///
    /// # Returns
    ///
    /// The committed [`StepEvent`] (fetch address, raw word, and effect),
    /// or an error for a misaligned `pc` or an unhandled encoding. Errors
    /// leave the statistics as of the failed instruction.
    pub fn step(
        &mut self,
        mem: &mut Memory,
        console: &mut dyn Console,
        stats: &mut Stats,
    ) -> Result<StepEvent> {
        // x0 is architectural zero regardless of any earlier write path
        self.regs[0] = 0;

        if self.pc & 0x3 != 0 {
            return Err(SimulatorError::MisalignedPc { pc: self.pc });
        }

        let pc = self.pc;
        let word = mem.read32(pc);
        stats.insns += 1;

        self.next_pc = pc.wrapping_add(4);
        let effect = self.execute(decode(word), pc, word, mem, console, stats)?;
        self.pc = self.next_pc;

        Ok(StepEvent { pc, word, effect })
    }

    /// Log the full register file, for post-mortem diagnostics
    pub fn dump_registers(&self) {
        for chunk in 0..8 {
            let i = chunk * 4;
            log::info!(
                "x{:<2}={:08x} x{:<2}={:08x} x{:<2}={:08x} x{:<2}={:08x}",
                i,
                self.reg(i as u8),
                i + 1,
                self.reg((i + 1) as u8),
                i + 2,
                self.reg((i + 2) as u8),
                i + 3,
                self.reg((i + 3) as u8),
            );
        }
        log::info!("pc ={:08x}", self.pc);
    }
}

#[cfg(test)]
mod tests;
