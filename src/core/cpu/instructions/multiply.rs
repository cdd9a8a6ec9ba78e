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

use super::super::decode::MulOp;
use super::super::Cpu;
use super::Effect;
use crate::core::error::Result;

impl Cpu {
    // === Multiply/Divide Instructions (M extension) ===

    /// M-extension multiply/divide operation
    ///
    /// The high-half multiplies widen both operands to 64 bits before
    /// multiplying and take bits 63:32 of the product. Division edge cases
    /// follow the architectural results:
    ///
    /// * `div` by zero: all-ones; `i32::MIN / -1`: `i32::MIN`
    /// * `rem` by zero: the dividend; `i32::MIN % -1`: zero
    /// * `divu` by zero: all-ones; `remu` by zero: the dividend
    ///
    /// Format: mul rd, rs1, rs2 (and mulh/mulhsu/mulhu/div/divu/rem/remu)
    ///
    /// # Arguments
    ///
    /// * `op` - The multiply/divide operation
    /// * `rd` - Destination register
    /// * `rs1` - First source register (dividend for div/rem)
    /// * `rs2` - Second source register (divisor for div/rem)
    pub(crate) fn op_mul(&mut self, op: MulOp, rd: u8, rs1: u8, rs2: u8) -> Result<Effect> {
        let a = self.reg(rs1);
        let b = self.reg(rs2);

        let value = match op {
            MulOp::Mul => a.wrapping_mul(b),
            MulOp::Mulh => {
                let product = i64::from(a as i32) * i64::from(b as i32);
                (product >> 32) as u32
            }
            MulOp::Mulhsu => {
                let product = i64::from(a as i32) * i64::from(b);
                (product >> 32) as u32
            }
            MulOp::Mulhu => {
                let product = u64::from(a) * u64::from(b);
                (product >> 32) as u32
            }
            MulOp::Div => {
                let n = a as i32;
                let d = b as i32;
                if d == 0 {
                    u32::MAX
                } else if n == i32::MIN && d == -1 {
                    // Overflow: quotient is the dividend
                    n as u32
                } else {
                    (n / d) as u32
                }
            }
            MulOp::Divu => {
                if b == 0 {
                    u32::MAX
                } else {
                    a / b
                }
            }
            MulOp::Rem => {
                let n = a as i32;
                let d = b as i32;
                if d == 0 {
                    n as u32
                } else if n == i32::MIN && d == -1 {
                    // Overflow: remainder is zero
                    0
                } else {
                    (n % d) as u32
                }
            }
            MulOp::Remu => {
                if b == 0 {
                    a
                } else {
                    a % b
                }
            }
        };

        self.set_reg(rd, value);
        Ok(Effect::RegWrite {
            rd,
            value: self.reg(rd),
        })
    }
}
