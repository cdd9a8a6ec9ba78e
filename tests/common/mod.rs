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

//! Shared helpers for integration tests

// Each integration test crate compiles this module separately and uses a
// different subset of it
#![allow(dead_code)]

pub mod asm;
pub mod elf;

use rv32sim::core::memory::Memory;
use rv32sim::core::system::System;

/// Place instruction words at `base` and build a system entering there
pub fn system_with(base: u32, words: &[u32]) -> System {
    let mut mem = Memory::new();
    for (i, &word) in words.iter().enumerate() {
        mem.write32(base + (i as u32) * 4, word);
    }
    System::new(mem, base)
}
