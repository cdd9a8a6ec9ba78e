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

//! CPU instruction implementations
//!
//! This module contains all RV32IM instruction implementations, organized
//! by instruction type. Each executed instruction reports the
//! architecturally visible update it committed as an [`Effect`], which the
//! tracer renders into the per-instruction log line.

use super::decode::Instruction;
use super::{Cpu, Stats};
use crate::core::error::{Result, SimulatorError};
use crate::core::memory::Memory;
use crate::core::system::Console;

// Instruction modules organized by type
mod arithmetic;
mod branch;
mod jump;
mod load;
mod multiply;
mod store;
mod system;

/// The architecturally visible update committed by one instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// No visible register or memory update
    None,
    /// A register write (writes to x0 report the discarded value as 0)
    RegWrite {
        /// Destination register
        rd: u8,
        /// Committed value
        value: u32,
    },
    /// A memory store
    Store {
        /// Effective address
        addr: u32,
        /// Stored value, truncated to the access width
        value: u32,
        /// Access width in bytes (1, 2, or 4)
        width: u8,
    },
    /// A conditional branch outcome
    Branch {
        /// Whether the branch was taken
        taken: bool,
        /// The resulting next fetch address
        target: u32,
    },
    /// The guest requested termination via an exit `ecall`
    Exited,
}

/// One committed interpreter step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    /// Address the instruction was fetched from
    pub pc: u32,
    /// The raw encoded word
    pub word: u32,
    /// The update the instruction committed
    pub effect: Effect,
}

impl Cpu {
    /// Execute one decoded instruction
    ///
    /// Dispatches the tagged operation to the appropriate handler. The
    /// fall-through target (`next_pc`) has already been set to `pc + 4`;
    /// control-transfer handlers overwrite it.
    ///
    /// # Arguments
    ///
    /// * `insn` - The decoded instruction
    /// * `pc` - Address the instruction was fetched from
    /// * `word` - The raw encoding, for diagnostics
    /// * `mem` - Guest memory
    /// * `console` - Host console for `ecall` services
    /// * `stats` - Branch statistics updated by branch handlers
    ///
    /// # Returns
    ///
    /// The committed [`Effect`], or `UnhandledInstruction` for encodings
    /// outside RV32IM (stop-and-report policy).
    pub(super) fn execute(
        &mut self,
        insn: Instruction,
        pc: u32,
        word: u32,
        mem: &mut Memory,
        console: &mut dyn Console,
        stats: &mut Stats,
    ) -> Result<Effect> {
        match insn {
            Instruction::Register { op, rd, rs1, rs2 } => self.op_register(op, rd, rs1, rs2),
            Instruction::Mul { op, rd, rs1, rs2 } => self.op_mul(op, rd, rs1, rs2),
            Instruction::Immediate { op, rd, rs1, imm } => self.op_immediate(op, rd, rs1, imm),
            Instruction::Load { op, rd, rs1, imm } => self.op_load(op, rd, rs1, imm, mem),
            Instruction::Store { op, rs1, rs2, imm } => self.op_store(op, rs1, rs2, imm, mem),
            Instruction::Branch {
                cond,
                rs1,
                rs2,
                imm,
            } => self.op_branch(cond, rs1, rs2, imm, pc, stats),
            Instruction::Jal { rd, imm } => self.op_jal(rd, imm, pc),
            Instruction::Jalr { rd, rs1, imm } => self.op_jalr(rd, rs1, imm, pc),
            Instruction::Lui { rd, imm } => self.op_lui(rd, imm),
            Instruction::Auipc { rd, imm } => self.op_auipc(rd, imm, pc),
            Instruction::Ecall => self.op_ecall(pc, console),
            Instruction::UnknownR(_)
            | Instruction::UnknownLoad(_)
            | Instruction::UnknownStore(_)
            | Instruction::UnknownBranch(_)
            | Instruction::UnknownSys(_)
            | Instruction::Unknown(_) => {
                log::warn!("Unhandled instruction 0x{:08x} at PC=0x{:08x}", word, pc);
                Err(SimulatorError::UnhandledInstruction { pc, word })
            }
        }
    }
}
