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

//! Core simulation components
//!
//! This module contains all simulator components:
//! - Bit utilities (field extraction, sign extension)
//! - Sparse guest memory
//! - CPU (RV32IM interpreter, disassembler, tracer)
//! - ELF32 executable loader
//! - System integration (run loop, host services)

pub mod bits;
pub mod cpu;
pub mod error;
pub mod loader;
pub mod memory;
pub mod system;

// Re-export commonly used types
pub use cpu::{Cpu, Stats};
pub use error::{Result, SimulatorError};
pub use loader::{Executable, SymbolTable};
pub use memory::Memory;
pub use system::System;
