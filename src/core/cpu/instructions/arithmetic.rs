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

use super::super::decode::AluOp;
use super::super::Cpu;
use super::Effect;
use crate::core::error::Result;

/// Compute one ALU operation on two 32-bit operands
///
/// All arithmetic wraps modulo 2^32; comparisons yield 1 or 0; shift
/// amounts use only the low 5 bits of the second operand.
#[inline(always)]
fn alu(op: AluOp, a: u32, b: u32) -> u32 {
    match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::Sll => a << (b & 0x1F),
        AluOp::Slt => u32::from((a as i32) < (b as i32)),
        AluOp::Sltu => u32::from(a < b),
        AluOp::Xor => a ^ b,
        AluOp::Srl => a >> (b & 0x1F),
        AluOp::Sra => ((a as i32) >> (b & 0x1F)) as u32,
        AluOp::Or => a | b,
        AluOp::And => a & b,
    }
}

impl Cpu {
    // === Arithmetic / Logical Instructions ===

    /// R-type ALU operation
    ///
    /// Format: add rd, rs1, rs2 (and sub/sll/slt/sltu/xor/srl/sra/or/and)
    /// Operation: rd = rs1 <op> rs2
    ///
    /// # Arguments
    ///
    /// * `op` - The ALU operation
    /// * `rd` - Destination register
    /// * `rs1` - First source register
    /// * `rs2` - Second source register
    pub(crate) fn op_register(&mut self, op: AluOp, rd: u8, rs1: u8, rs2: u8) -> Result<Effect> {
        let value = alu(op, self.reg(rs1), self.reg(rs2));
        self.set_reg(rd, value);
        Ok(Effect::RegWrite {
            rd,
            value: self.reg(rd),
        })
    }

    /// I-type ALU operation
    ///
    /// The immediate is the sign-extended 12-bit field; for the shift
    /// forms it is the 5-bit shift amount. `sltiu` compares against the
    /// sign-extended immediate reinterpreted as unsigned.
    ///
    /// Format: addi rd, rs1, imm (and slti/sltiu/xori/ori/andi/slli/srli/srai)
    /// Operation: rd = rs1 <op> imm
    ///
    /// # Arguments
    ///
    /// * `op` - The ALU operation
    /// * `rd` - Destination register
    /// * `rs1` - Source register
    /// * `imm` - Sign-extended immediate (or shift amount)
    pub(crate) fn op_immediate(&mut self, op: AluOp, rd: u8, rs1: u8, imm: i32) -> Result<Effect> {
        let value = alu(op, self.reg(rs1), imm as u32);
        self.set_reg(rd, value);
        Ok(Effect::RegWrite {
            rd,
            value: self.reg(rd),
        })
    }

    /// LUI: Load Upper Immediate
    ///
    /// Format: lui rd, imm
    /// Operation: rd = imm (imm already shifted left 12 by the decoder)
    pub(crate) fn op_lui(&mut self, rd: u8, imm: u32) -> Result<Effect> {
        self.set_reg(rd, imm);
        Ok(Effect::RegWrite {
            rd,
            value: self.reg(rd),
        })
    }

    /// AUIPC: Add Upper Immediate to PC
    ///
    /// Format: auipc rd, imm
    /// Operation: rd = pc + imm
    pub(crate) fn op_auipc(&mut self, rd: u8, imm: u32, pc: u32) -> Result<Effect> {
        self.set_reg(rd, pc.wrapping_add(imm));
        Ok(Effect::RegWrite {
            rd,
            value: self.reg(rd),
        })
    }
}
