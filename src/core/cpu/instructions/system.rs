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
use crate::core::system::Console;

/// Host service numbers dispatched on register a7
mod syscall {
    /// Read one byte from host stdin into a0 (-1 on EOF)
    pub const GETCHAR: u32 = 1;
    /// Write the low byte of a0 to host stdout and flush
    pub const PUTCHAR: u32 = 2;
    /// Terminate the run
    pub const EXIT: u32 = 3;
    /// Terminate the run (Linux exit_group number)
    pub const EXIT_GROUP: u32 = 93;
}

impl Cpu {
    // === Environment Call ===

    /// ECALL: host-service dispatch
    ///
    /// The service number is taken from a7 (x17):
    ///
    /// | a7 | Service  | Effect                                    |
    /// |----|----------|-------------------------------------------|
    /// | 1  | getchar  | a0 = next host stdin byte, or -1 on EOF   |
    /// | 2  | putchar  | write low byte of a0 to host stdout       |
    /// | 3  | exit     | terminate the run                         |
    /// | 93 | exit_group | terminate the run                       |
    ///
    /// Unrecognized service numbers are a warning; the instruction is
    /// otherwise a no-op and execution proceeds.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the `ecall`, retained as the final pc on exit
    /// * `console` - Host console implementing the byte services
    pub(crate) fn op_ecall(&mut self, pc: u32, console: &mut dyn Console) -> Result<Effect> {
        match self.reg(Self::REG_A7) {
            syscall::GETCHAR => {
                let value = match console.getchar()? {
                    Some(byte) => u32::from(byte),
                    None => -1i32 as u32,
                };
                self.set_reg(Self::REG_A0, value);
                Ok(Effect::RegWrite {
                    rd: Self::REG_A0,
                    value,
                })
            }
            syscall::PUTCHAR => {
                console.putchar(self.reg(Self::REG_A0) as u8)?;
                Ok(Effect::None)
            }
            syscall::EXIT | syscall::EXIT_GROUP => {
                // The run ends here; pc stays on the ecall itself
                self.next_pc = pc;
                Ok(Effect::Exited)
            }
            number => {
                log::warn!("Unknown syscall {} at PC=0x{:08x}", number, pc);
                Ok(Effect::None)
            }
        }
    }
}
