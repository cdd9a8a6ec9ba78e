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

//! System-level tests

use crate::core::memory::Memory;


/// Place a sequence of instruction words at `base`
pub(super) fn load_words(base: u32, words: &[u32]) -> Memory {
    let mut mem = Memory::new();
    for (i, &word) in words.iter().enumerate() {
        mem.write32(base + (i as u32) * 4, word);
    }
    mem
}
