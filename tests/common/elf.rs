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

//! Synthetic ELF32 RISC-V image builder for loader round-trip tests

#![allow(dead_code)]

fn put_u16(image: &mut [u8], offset: usize, value: u16) {
    image[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(image: &mut [u8], offset: usize, value: u32) {
    image[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Build a statically linked ELF32 RISC-V executable holding `code` at
/// `vaddr`, with an optional symbol table
pub fn build_executable(entry: u32, vaddr: u32, code: &[u32], symbols: &[(u32, &str)]) -> Vec<u8> {
    let payload: Vec<u8> = code.iter().flat_map(|w| w.to_le_bytes()).collect();

    let ehdr_size = 52;
    let phdr_size = 32;
    let shdr_size = 40;
    let payload_off = ehdr_size + phdr_size;

    // String table: leading NUL, then each name NUL-terminated
    let mut strtab = vec![0u8];
    let mut name_offsets = Vec::new();
    for (_, name) in symbols {
        name_offsets.push(strtab.len() as u32);
        strtab.extend_from_slice(name.as_bytes());
        strtab.push(0);
    }

    let symtab_off = payload_off + payload.len();
    let symtab_size = symbols.len() * 16;
    let strtab_off = symtab_off + symtab_size;
    let shdr_off = strtab_off + strtab.len();
    let total = shdr_off + 3 * shdr_size;

    let mut image = vec![0u8; total];

    // ELF header
    image[0..4].copy_from_slice(&[0x7F, b'E', b'L', b'F']);
    image[4] = 1; // 32-bit
    image[5] = 1; // little-endian
    image[6] = 1; // version
    put_u16(&mut image, 0x10, 2); // ET_EXEC
    put_u16(&mut image, 0x12, 243); // EM_RISCV
    put_u32(&mut image, 0x18, entry);
    put_u32(&mut image, 0x1C, ehdr_size as u32); // e_phoff
    if !symbols.is_empty() {
        put_u32(&mut image, 0x20, shdr_off as u32); // e_shoff
    }
    put_u16(&mut image, 0x2A, phdr_size as u16); // e_phentsize
    put_u16(&mut image, 0x2C, 1); // e_phnum
    put_u16(&mut image, 0x2E, shdr_size as u16); // e_shentsize
    if !symbols.is_empty() {
        put_u16(&mut image, 0x30, 3); // e_shnum
    }

    // Program header: one executable PT_LOAD
    let ph = ehdr_size;
    put_u32(&mut image, ph, 1); // PT_LOAD
    put_u32(&mut image, ph + 0x04, payload_off as u32);
    put_u32(&mut image, ph + 0x08, vaddr);
    put_u32(&mut image, ph + 0x10, payload.len() as u32);
    put_u32(&mut image, ph + 0x14, payload.len() as u32);
    put_u32(&mut image, ph + 0x18, 0x5); // PF_R | PF_X

    image[payload_off..payload_off + payload.len()].copy_from_slice(&payload);

    // Symbol table entries (GLOBAL FUNC)
    for (i, (addr, _)) in symbols.iter().enumerate() {
        let sym = symtab_off + i * 16;
        put_u32(&mut image, sym, name_offsets[i]);
        put_u32(&mut image, sym + 0x04, *addr);
        image[sym + 0x0C] = 0x12; // STB_GLOBAL << 4 | STT_FUNC
        put_u16(&mut image, sym + 0x0E, 1); // st_shndx
    }
    image[strtab_off..strtab_off + strtab.len()].copy_from_slice(&strtab);

    // Section headers: null, symtab (link -> strtab at index 2), strtab
    if !symbols.is_empty() {
        let sh1 = shdr_off + shdr_size;
        put_u32(&mut image, sh1 + 0x04, 2); // SHT_SYMTAB
        put_u32(&mut image, sh1 + 0x10, symtab_off as u32);
        put_u32(&mut image, sh1 + 0x14, symtab_size as u32);
        put_u32(&mut image, sh1 + 0x18, 2); // sh_link
        put_u32(&mut image, sh1 + 0x24, 16); // sh_entsize

        let sh2 = shdr_off + 2 * shdr_size;
        put_u32(&mut image, sh2 + 0x04, 3); // SHT_STRTAB
        put_u32(&mut image, sh2 + 0x10, strtab_off as u32);
        put_u32(&mut image, sh2 + 0x14, strtab.len() as u32);
    }

    image
}
