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

use super::super::Cpu;
use super::Effect;
use crate::core::error::Result;

impl Cpu {
    // === Jump Instructions ===

    /// JAL: Jump And Link
    ///
    /// Saves the return address in rd and transfers control to `pc + imm`.
    ///
    /// Format: jal rd, offset
    /// Operation: rd = pc + 4; pc = pc + sign_extend(offset)
    ///
    /// # Arguments
    ///
    /// * `rd` - Destination register for the return address
    /// * `imm` - Sign-extended jump offset (always even)
    /// * `pc` - Address of the jump instruction
    pub(crate) fn op_jal(&mut self, rd: u8, imm: i32, pc: u32) -> Result<Effect> {
        self.set_reg(rd, pc.wrapping_add(4));
        self.next_pc = pc.wrapping_add(imm as u32);
        Ok(Effect::RegWrite {
            rd,
            value: self.reg(rd),
        })
    }

    /// JALR: Jump And Link Register
    ///
    /// Transfers control to `(rs1 + imm) & !1` and saves the return
    /// address in rd. The target is computed before the link write so that
    /// `rd == rs1` uses the old register value.
    ///
    /// Format: jalr rd, imm(rs1)
    /// Operation: t = (rs1 + sign_extend(imm)) & !1; rd = pc + 4; pc = t
    ///
    /// # Arguments
    ///
    /// * `rd` - Destination register for the return address
    /// * `rs1` - Register holding the jump base
    /// * `imm` - Sign-extended offset
    /// * `pc` - Address of the jump instruction
    pub(crate) fn op_jalr(&mut self, rd: u8, rs1: u8, imm: i32, pc: u32) -> Result<Effect> {
        let target = self.reg(rs1).wrapping_add(imm as u32) & !1;
        self.set_reg(rd, pc.wrapping_add(4));
        self.next_pc = target;
        Ok(Effect::RegWrite {
            rd,
            value: self.reg(rd),
        })
    }
}
