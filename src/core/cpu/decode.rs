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

//! RV32IM instruction decoding
//!
//! A pure mapping from a 32-bit encoded word to a tagged [`Instruction`].
//! Both the interpreter and the disassembler consume this one decoder, so
//! their views of an encoding can never drift apart.
//!
//! The low 7 bits of a word select the format (R/I/S/B/U/J); `funct3` and
//! `funct7` refine the operation within it. Immediates are reassembled from
//! their format-specific bit ranges and sign-extended unless noted.

use crate::core::bits::{get_bits, sign_extend};

/// ALU operations, shared by the register and immediate forms
///
/// `Sub` has no immediate form; the shift operations carry their 5-bit
/// shift amount in the immediate field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    Sll,
    Slt,
    Sltu,
    Xor,
    Srl,
    Sra,
    Or,
    And,
}

/// M-extension multiply/divide operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulOp {
    Mul,
    Mulh,
    Mulhsu,
    Mulhu,
    Div,
    Divu,
    Rem,
    Remu,
}

/// Load widths and extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOp {
    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,
}

/// Store widths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Sb,
    Sh,
    Sw,
}

/// Conditional branch comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchCond {
    Eq,
    Ne,
    Lt,
    Ge,
    Ltu,
    Geu,
}

/// A decoded instruction
///
/// Register indices are 5-bit values; immediates are fully reassembled and
/// sign-extended where the format prescribes it. Encodings without defined
/// semantics decode to an `Unknown*` variant carrying the raw word, tagged
/// by the format family that claimed the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// R-type ALU operation (opcode 0110011, funct7 0 or 32)
    Register { op: AluOp, rd: u8, rs1: u8, rs2: u8 },
    /// M-extension operation (opcode 0110011, funct7 1)
    Mul { op: MulOp, rd: u8, rs1: u8, rs2: u8 },
    /// I-type ALU operation (opcode 0010011); shifts keep shamt in `imm`
    Immediate { op: AluOp, rd: u8, rs1: u8, imm: i32 },
    /// Memory load (opcode 0000011)
    Load { op: LoadOp, rd: u8, rs1: u8, imm: i32 },
    /// Memory store (opcode 0100011)
    Store { op: StoreOp, rs1: u8, rs2: u8, imm: i32 },
    /// Conditional branch (opcode 1100011); target is `pc + imm`
    Branch {
        cond: BranchCond,
        rs1: u8,
        rs2: u8,
        imm: i32,
    },
    /// Jump and link (opcode 1101111); target is `pc + imm`
    Jal { rd: u8, imm: i32 },
    /// Jump and link register (opcode 1100111)
    Jalr { rd: u8, rs1: u8, imm: i32 },
    /// Load upper immediate (opcode 0110111); `imm` is already shifted
    Lui { rd: u8, imm: u32 },
    /// Add upper immediate to PC (opcode 0010111); `imm` is already shifted
    Auipc { rd: u8, imm: u32 },
    /// Environment call (opcode 1110011, funct3 0)
    Ecall,
    /// Unrecognized encoding within the R-type opcode
    UnknownR(u32),
    /// Unrecognized encoding within the load opcode
    UnknownLoad(u32),
    /// Unrecognized encoding within the store opcode
    UnknownStore(u32),
    /// Unrecognized encoding within the branch opcode
    UnknownBranch(u32),
    /// Unrecognized system instruction (opcode 1110011, funct3 != 0)
    UnknownSys(u32),
    /// Unrecognized opcode
    Unknown(u32),
}

/// Decode the R-type register and function fields
///
/// Format: | funct7 (7) | rs2 (5) | rs1 (5) | funct3 (3) | rd (5) | op (7) |
///
/// # Returns
///
/// Tuple of (rd, rs1, rs2, funct3, funct7)
#[inline(always)]
fn decode_r_type(word: u32) -> (u8, u8, u8, u32, u32) {
    let rd = get_bits(word, 7, 5) as u8;
    let rs1 = get_bits(word, 15, 5) as u8;
    let rs2 = get_bits(word, 20, 5) as u8;
    let funct3 = get_bits(word, 12, 3);
    let funct7 = get_bits(word, 25, 7);
    (rd, rs1, rs2, funct3, funct7)
}

/// Decode the I-type fields with a sign-extended 12-bit immediate
///
/// Format: | imm[11:0] (12) | rs1 (5) | funct3 (3) | rd (5) | op (7) |
///
/// # Returns
///
/// Tuple of (rd, rs1, funct3, imm)
#[inline(always)]
fn decode_i_type(word: u32) -> (u8, u8, u32, i32) {
    let rd = get_bits(word, 7, 5) as u8;
    let rs1 = get_bits(word, 15, 5) as u8;
    let funct3 = get_bits(word, 12, 3);
    let imm = sign_extend(get_bits(word, 20, 12), 12);
    (rd, rs1, funct3, imm)
}

/// Reassemble the S-type immediate: {word[31:25], word[11:7]}, signed
#[inline(always)]
pub(super) fn s_imm(word: u32) -> i32 {
    sign_extend(get_bits(word, 25, 7) << 5 | get_bits(word, 7, 5), 12)
}

/// Reassemble the B-type immediate:
/// {word[31], word[7], word[30:25], word[11:8], 0}, signed, 13 bits
#[inline(always)]
pub(super) fn b_imm(word: u32) -> i32 {
    sign_extend(
        get_bits(word, 31, 1) << 12
            | get_bits(word, 7, 1) << 11
            | get_bits(word, 25, 6) << 5
            | get_bits(word, 8, 4) << 1,
        13,
    )
}

/// Reassemble the J-type immediate:
/// {word[31], word[19:12], word[20], word[30:21], 0}, signed, 21 bits
#[inline(always)]
fn j_imm(word: u32) -> i32 {
    sign_extend(
        get_bits(word, 31, 1) << 20
            | get_bits(word, 12, 8) << 12
            | get_bits(word, 20, 1) << 11
            | get_bits(word, 21, 10) << 1,
        21,
    )
}

/// Reassemble the U-type immediate: {word[31:12], 12'b0}, not sign-extended
#[inline(always)]
fn u_imm(word: u32) -> u32 {
    get_bits(word, 12, 20) << 12
}

/// Decode one 32-bit instruction word
///
/// Total: every word decodes to some [`Instruction`], falling back to the
/// `Unknown*` variants for encodings outside RV32IM.
pub fn decode(word: u32) -> Instruction {
    match word & 0x7F {
        // R-type: ALU register-register and M extension
        0x33 => {
            let (rd, rs1, rs2, funct3, funct7) = decode_r_type(word);
            let register = |op| Instruction::Register { op, rd, rs1, rs2 };
            let mul = |op| Instruction::Mul { op, rd, rs1, rs2 };
            match (funct7, funct3) {
                (0, 0) => register(AluOp::Add),
                (0, 1) => register(AluOp::Sll),
                (0, 2) => register(AluOp::Slt),
                (0, 3) => register(AluOp::Sltu),
                (0, 4) => register(AluOp::Xor),
                (0, 5) => register(AluOp::Srl),
                (0, 6) => register(AluOp::Or),
                (0, 7) => register(AluOp::And),
                (1, 0) => mul(MulOp::Mul),
                (1, 1) => mul(MulOp::Mulh),
                (1, 2) => mul(MulOp::Mulhsu),
                (1, 3) => mul(MulOp::Mulhu),
                (1, 4) => mul(MulOp::Div),
                (1, 5) => mul(MulOp::Divu),
                (1, 6) => mul(MulOp::Rem),
                (1, 7) => mul(MulOp::Remu),
                (32, 0) => register(AluOp::Sub),
                (32, 5) => register(AluOp::Sra),
                _ => Instruction::UnknownR(word),
            }
        }

        // I-type: ALU register-immediate
        0x13 => {
            let (rd, rs1, funct3, imm) = decode_i_type(word);
            let shamt = get_bits(word, 20, 5) as i32;
            let immediate = |op, imm| Instruction::Immediate { op, rd, rs1, imm };
            match funct3 {
                0 => immediate(AluOp::Add, imm),
                1 => immediate(AluOp::Sll, shamt),
                2 => immediate(AluOp::Slt, imm),
                3 => immediate(AluOp::Sltu, imm),
                4 => immediate(AluOp::Xor, imm),
                // Bit 30 distinguishes arithmetic from logical right shift
                5 if get_bits(word, 30, 1) != 0 => immediate(AluOp::Sra, shamt),
                5 => immediate(AluOp::Srl, shamt),
                6 => immediate(AluOp::Or, imm),
                _ => immediate(AluOp::And, imm),
            }
        }

        // Loads
        0x03 => {
            let (rd, rs1, funct3, imm) = decode_i_type(word);
            let load = |op| Instruction::Load { op, rd, rs1, imm };
            match funct3 {
                0 => load(LoadOp::Lb),
                1 => load(LoadOp::Lh),
                2 => load(LoadOp::Lw),
                4 => load(LoadOp::Lbu),
                5 => load(LoadOp::Lhu),
                _ => Instruction::UnknownLoad(word),
            }
        }

        // Stores
        0x23 => {
            let (_, rs1, rs2, funct3, _) = decode_r_type(word);
            let imm = s_imm(word);
            let store = |op| Instruction::Store { op, rs1, rs2, imm };
            match funct3 {
                0 => store(StoreOp::Sb),
                1 => store(StoreOp::Sh),
                2 => store(StoreOp::Sw),
                _ => Instruction::UnknownStore(word),
            }
        }

        // Conditional branches
        0x63 => {
            let (_, rs1, rs2, funct3, _) = decode_r_type(word);
            let imm = b_imm(word);
            let branch = |cond| Instruction::Branch {
                cond,
                rs1,
                rs2,
                imm,
            };
            match funct3 {
                0 => branch(BranchCond::Eq),
                1 => branch(BranchCond::Ne),
                4 => branch(BranchCond::Lt),
                5 => branch(BranchCond::Ge),
                6 => branch(BranchCond::Ltu),
                7 => branch(BranchCond::Geu),
                _ => Instruction::UnknownBranch(word),
            }
        }

        // JAL
        0x6F => Instruction::Jal {
            rd: get_bits(word, 7, 5) as u8,
            imm: j_imm(word),
        },

        // JALR
        0x67 => {
            let (rd, rs1, _, imm) = decode_i_type(word);
            Instruction::Jalr { rd, rs1, imm }
        }

        // LUI
        0x37 => Instruction::Lui {
            rd: get_bits(word, 7, 5) as u8,
            imm: u_imm(word),
        },

        // AUIPC
        0x17 => Instruction::Auipc {
            rd: get_bits(word, 7, 5) as u8,
            imm: u_imm(word),
        },

        // System: any funct3 = 0 word executes as ECALL
        0x73 => {
            if get_bits(word, 12, 3) == 0 {
                Instruction::Ecall
            } else {
                Instruction::UnknownSys(word)
            }
        }

        _ => Instruction::Unknown(word),
    }
}
