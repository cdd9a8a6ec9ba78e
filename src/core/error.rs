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

//! Simulator error types

use thiserror::Error;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Simulator error types
///
/// Errors never unwind through the guest's control flow; they are surfaced
/// at the boundary of a run together with the statistics gathered so far.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// Executable image could not be parsed
    #[error("invalid executable: {0}")]
    InvalidExecutable(String),

    /// Instruction encoding with no defined semantics
    #[error("unhandled instruction 0x{word:08x} at PC=0x{pc:08x}")]
    UnhandledInstruction {
        /// Address the instruction was fetched from
        pc: u32,
        /// The raw encoded word
        word: u32,
    },

    /// Program counter left 4-byte alignment after a control transfer
    #[error("misaligned program counter 0x{pc:08x}")]
    MisalignedPc {
        /// The misaligned fetch address
        pc: u32,
    },

    /// I/O error (trace sink, host console, file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
