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

use super::super::decode::BranchCond;
use super::super::{Cpu, Stats};
use super::Effect;
use crate::core::error::Result;

impl Cpu {
    // === Branch Instructions ===

    /// Conditional branch
    ///
    /// Evaluates the comparison and, if taken, transfers control to
    /// `pc + imm`. Every executed branch bumps the branch counter; taken
    /// branches additionally bump the taken counter.
    ///
    /// Format: beq rs1, rs2, offset (and bne/blt/bge/bltu/bgeu)
    /// Operation: if (rs1 <cond> rs2) pc = pc + sign_extend(offset)
    ///
    /// # Arguments
    ///
    /// * `cond` - The branch comparison
    /// * `rs1` - First source register
    /// * `rs2` - Second source register
    /// * `imm` - Sign-extended branch offset (always even)
    /// * `pc` - Address of the branch instruction
    /// * `stats` - Statistics receiving the branch counts
    pub(crate) fn op_branch(
        &mut self,
        cond: BranchCond,
        rs1: u8,
        rs2: u8,
        imm: i32,
        pc: u32,
        stats: &mut Stats,
    ) -> Result<Effect> {
        let a = self.reg(rs1);
        let b = self.reg(rs2);

        let taken = match cond {
            BranchCond::Eq => a == b,
            BranchCond::Ne => a != b,
            BranchCond::Lt => (a as i32) < (b as i32),
            BranchCond::Ge => (a as i32) >= (b as i32),
            BranchCond::Ltu => a < b,
            BranchCond::Geu => a >= b,
        };

        stats.branches += 1;
        if taken {
            stats.taken_branches += 1;
            self.next_pc = pc.wrapping_add(imm as u32);
        }

        Ok(Effect::Branch {
            taken,
            target: self.next_pc,
        })
    }
}
