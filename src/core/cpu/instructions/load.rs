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

use super::super::decode::LoadOp;
use super::super::Cpu;
use super::Effect;
use crate::core::error::Result;
use crate::core::memory::Memory;

impl Cpu {
    // === Load Instructions ===

    /// Memory load
    ///
    /// Loads from `rs1 + imm`. `lb` and `lh` sign-extend the loaded value;
    /// `lbu` and `lhu` zero-extend; `lw` is full width. Misaligned
    /// addresses are legal and handled by the memory.
    ///
    /// Format: lw rd, offset(rs1) (and lb/lh/lbu/lhu)
    /// Operation: rd = extend(memory[rs1 + sign_extend(offset)])
    ///
    /// # Arguments
    ///
    /// * `op` - Load width and extension
    /// * `rd` - Destination register
    /// * `rs1` - Register holding the base address
    /// * `imm` - Sign-extended offset
    /// * `mem` - Guest memory
    pub(crate) fn op_load(
        &mut self,
        op: LoadOp,
        rd: u8,
        rs1: u8,
        imm: i32,
        mem: &Memory,
    ) -> Result<Effect> {
        let addr = self.reg(rs1).wrapping_add(imm as u32);

        let value = match op {
            LoadOp::Lb => mem.read8(addr) as i8 as i32 as u32, // Sign extend
            LoadOp::Lh => mem.read16(addr) as i16 as i32 as u32, // Sign extend
            LoadOp::Lw => mem.read32(addr),
            LoadOp::Lbu => u32::from(mem.read8(addr)), // Zero extend
            LoadOp::Lhu => u32::from(mem.read16(addr)), // Zero extend
        };

        self.set_reg(rd, value);
        Ok(Effect::RegWrite {
            rd,
            value: self.reg(rd),
        })
    }
}
