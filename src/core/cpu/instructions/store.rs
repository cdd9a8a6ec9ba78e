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

use super::super::decode::StoreOp;
use super::super::Cpu;
use super::Effect;
use crate::core::error::Result;
use crate::core::memory::Memory;

impl Cpu {
    // === Store Instructions ===

    /// Memory store
    ///
    /// Stores the low 8/16/32 bits of rs2 at `rs1 + imm`. Misaligned
    /// addresses are legal and handled by the memory.
    ///
    /// Format: sw rs2, offset(rs1) (and sb/sh)
    /// Operation: memory[rs1 + sign_extend(offset)] = truncate(rs2)
    ///
    /// # Arguments
    ///
    /// * `op` - Store width
    /// * `rs1` - Register holding the base address
    /// * `rs2` - Register holding the value to store
    /// * `imm` - Sign-extended offset
    /// * `mem` - Guest memory
    pub(crate) fn op_store(
        &mut self,
        op: StoreOp,
        rs1: u8,
        rs2: u8,
        imm: i32,
        mem: &mut Memory,
    ) -> Result<Effect> {
        let addr = self.reg(rs1).wrapping_add(imm as u32);
        let value = self.reg(rs2);

        let (stored, width) = match op {
            StoreOp::Sb => {
                mem.write8(addr, value as u8);
                (u32::from(value as u8), 1)
            }
            StoreOp::Sh => {
                mem.write16(addr, value as u16);
                (u32::from(value as u16), 2)
            }
            StoreOp::Sw => {
                mem.write32(addr, value);
                (value, 4)
            }
        };

        Ok(Effect::Store {
            addr,
            value: stored,
            width,
        })
    }
}
