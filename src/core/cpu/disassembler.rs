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

//! RV32IM instruction disassembler
//!
//! Converts binary instruction encodings to human-readable assembly text.
//! Disassembly is total and pure: every 32-bit word maps to a non-empty
//! line, with `unknown*` placeholders for encodings outside RV32IM.

use super::decode::{b_imm, decode, s_imm, AluOp, BranchCond, Instruction, LoadOp, MulOp, StoreOp};
use crate::core::bits::{get_bits, sign_extend};
use crate::core::loader::SymbolTable;

/// Instruction disassembler
///
/// Shares the tagged decoder with the interpreter, so the two can never
/// disagree about an encoding.
///
/// # Example
/// ```
/// use rv32sim::core::cpu::Disassembler;
///
/// let text = Disassembler::disassemble(0x1000, 0x003100B3, None);
/// assert_eq!(text, "add x1, x2, x3");
/// ```
pub struct Disassembler;

impl Disassembler {
    /// Disassemble a single instruction to canonical assembly text
    ///
    /// # Arguments
    ///
    /// * `addr` - Address the word was fetched from (branch and jump
    ///   targets are rendered as absolute addresses relative to it)
    /// * `word` - The 32-bit instruction encoding
    /// * `symbols` - Optional symbol resolver; a name resolved at `addr`
    ///   is appended as ` ; <name>`
    ///
    /// # Returns
    ///
    /// The disassembled line. Never fails and never returns an empty
    /// string.
    pub fn disassemble(addr: u32, word: u32, symbols: Option<&SymbolTable>) -> String {
        let text = Self::render(addr, word);

        match symbols.and_then(|syms| syms.lookup(addr)) {
            Some(name) => format!("{} ; {}", text, name),
            None => text,
        }
    }

    fn render(addr: u32, word: u32) -> String {
        match decode(word) {
            Instruction::Register { op, rd, rs1, rs2 } => {
                format!("{} x{}, x{}, x{}", Self::alu_mnemonic(op), rd, rs1, rs2)
            }
            Instruction::Mul { op, rd, rs1, rs2 } => {
                format!("{} x{}, x{}, x{}", Self::mul_mnemonic(op), rd, rs1, rs2)
            }
            Instruction::Immediate { op, rd, rs1, imm } => {
                format!("{} x{}, x{}, {}", Self::alu_imm_mnemonic(op), rd, rs1, imm)
            }
            Instruction::Load { op, rd, rs1, imm } => {
                let mnemonic = match op {
                    LoadOp::Lb => "lb",
                    LoadOp::Lh => "lh",
                    LoadOp::Lw => "lw",
                    LoadOp::Lbu => "lbu",
                    LoadOp::Lhu => "lhu",
                };
                format!("{} x{}, {}(x{})", mnemonic, rd, imm, rs1)
            }
            Instruction::Store { op, rs1, rs2, imm } => {
                let mnemonic = match op {
                    StoreOp::Sb => "sb",
                    StoreOp::Sh => "sh",
                    StoreOp::Sw => "sw",
                };
                format!("{} x{}, {}(x{})", mnemonic, rs2, imm, rs1)
            }
            Instruction::Branch {
                cond,
                rs1,
                rs2,
                imm,
            } => {
                let mnemonic = match cond {
                    BranchCond::Eq => "beq",
                    BranchCond::Ne => "bne",
                    BranchCond::Lt => "blt",
                    BranchCond::Ge => "bge",
                    BranchCond::Ltu => "bltu",
                    BranchCond::Geu => "bgeu",
                };
                format!(
                    "{} x{}, x{}, {:08x}",
                    mnemonic,
                    rs1,
                    rs2,
                    addr.wrapping_add(imm as u32)
                )
            }
            Instruction::Jal { rd, imm } => {
                format!("jal x{}, {:08x}", rd, addr.wrapping_add(imm as u32))
            }
            Instruction::Jalr { rd, rs1, imm } => format!("jalr x{}, {}(x{})", rd, imm, rs1),
            Instruction::Lui { rd, imm } => format!("lui x{}, 0x{:x}", rd, imm >> 12),
            Instruction::Auipc { rd, imm } => format!("auipc x{}, 0x{:x}", rd, imm >> 12),
            // Only the all-zero encoding renders as ecall
            Instruction::Ecall if word == 0x0000_0073 => "ecall".to_string(),
            Instruction::Ecall | Instruction::UnknownSys(_) => "unknown_Sys".to_string(),
            Instruction::UnknownR(_) => format!(
                "unknown_R x{}, x{}, x{}",
                get_bits(word, 7, 5),
                get_bits(word, 15, 5),
                get_bits(word, 20, 5)
            ),
            Instruction::UnknownLoad(_) => format!(
                "unknown_L x{}, {}(x{})",
                get_bits(word, 7, 5),
                sign_extend(get_bits(word, 20, 12), 12),
                get_bits(word, 15, 5)
            ),
            Instruction::UnknownStore(_) => format!(
                "unknown_S x{}, {}(x{})",
                get_bits(word, 20, 5),
                s_imm(word),
                get_bits(word, 15, 5)
            ),
            Instruction::UnknownBranch(_) => format!(
                "unknown_B x{}, x{}, {:08x}",
                get_bits(word, 15, 5),
                get_bits(word, 20, 5),
                addr.wrapping_add(b_imm(word) as u32)
            ),
            Instruction::Unknown(_) => "unknown".to_string(),
        }
    }

    fn alu_mnemonic(op: AluOp) -> &'static str {
        match op {
            AluOp::Add => "add",
            AluOp::Sub => "sub",
            AluOp::Sll => "sll",
            AluOp::Slt => "slt",
            AluOp::Sltu => "sltu",
            AluOp::Xor => "xor",
            AluOp::Srl => "srl",
            AluOp::Sra => "sra",
            AluOp::Or => "or",
            AluOp::And => "and",
        }
    }

    fn alu_imm_mnemonic(op: AluOp) -> &'static str {
        match op {
            AluOp::Add => "addi",
            AluOp::Sll => "slli",
            AluOp::Slt => "slti",
            AluOp::Sltu => "sltiu",
            AluOp::Xor => "xori",
            AluOp::Srl => "srli",
            AluOp::Sra => "srai",
            AluOp::Or => "ori",
            AluOp::And => "andi",
            // No immediate form exists; the decoder never produces this
            AluOp::Sub => "unknown_I",
        }
    }

    fn mul_mnemonic(op: MulOp) -> &'static str {
        match op {
            MulOp::Mul => "mul",
            MulOp::Mulh => "mulh",
            MulOp::Mulhsu => "mulhsu",
            MulOp::Mulhu => "mulhu",
            MulOp::Div => "div",
            MulOp::Divu => "divu",
            MulOp::Rem => "rem",
            MulOp::Remu => "remu",
        }
    }
}
