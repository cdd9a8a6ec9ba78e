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

//! Executable loading for the RV32 simulator
//!
//! Parses statically linked little-endian ELF32 RISC-V executables:
//! loadable segments are copied byte-exact into guest memory, the entry
//! point seeds the program counter, and the symbol table (when present) is
//! extracted for disassembly annotation.
//!
//! # ELF32 layout (the fields this loader reads)
//!
//! ```text
//! 0x00-0x03: 0x7F "ELF" magic
//! 0x04:      class (1 = 32-bit)
//! 0x05:      data encoding (1 = little-endian)
//! 0x10-0x11: object type (2 = executable)
//! 0x12-0x13: machine (243 = RISC-V)
//! 0x18-0x1B: entry point
//! 0x1C-0x1F: program header table offset
//! 0x20-0x23: section header table offset
//! 0x2A-0x2D: program header entry size / count
//! 0x2E-0x31: section header entry size / count
//! ```
//!
//! # Example
//!
//! ```no_run
//! use rv32sim::core::loader::Executable;
//! use rv32sim::core::memory::Memory;
//!
//! let exe = Executable::open("program.elf").unwrap();
//! let mut mem = Memory::new();
//! exe.load_into(&mut mem);
//! ```

use super::error::{Result, SimulatorError};
use super::memory::Memory;
use std::collections::HashMap;

/// ELF identification magic
const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];
/// 32-bit class
const ELFCLASS32: u8 = 1;
/// Little-endian data encoding
const ELFDATA2LSB: u8 = 1;
/// Executable object type
const ET_EXEC: u16 = 2;
/// RISC-V machine number
const EM_RISCV: u16 = 243;
/// Loadable program segment
const PT_LOAD: u32 = 1;
/// Executable segment flag
const PF_X: u32 = 1;
/// Symbol table section type
const SHT_SYMTAB: u32 = 2;
/// Function symbol type (low nibble of st_info)
const STT_FUNC: u8 = 2;

/// Address-to-name symbol resolver
///
/// Used only to annotate disassembly output; the core never mutates it
/// during a run.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    symbols: HashMap<u32, String>,
}

impl SymbolTable {
    /// Create an empty symbol table
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `addr` with `name`
    pub fn insert(&mut self, addr: u32, name: String) {
        self.symbols.insert(addr, name);
    }

    /// Resolve an address to a symbol name
    pub fn lookup(&self, addr: u32) -> Option<&str> {
        self.symbols.get(&addr).map(String::as_str)
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the table has no symbols
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// One loadable segment of an executable
#[derive(Debug, Clone)]
pub struct Segment {
    /// Guest virtual address of the first byte
    pub vaddr: u32,
    /// File-backed contents (the zero-filled tail up to `mem_size` is
    /// implicit in the sparse memory)
    pub data: Vec<u8>,
    /// Total in-memory size, >= data.len()
    pub mem_size: u32,
    /// Whether the segment is mapped executable
    pub executable: bool,
}

/// A parsed RV32 executable image
#[derive(Debug, Clone)]
pub struct Executable {
    /// Entry point (initial program counter)
    pub entry: u32,
    /// Loadable segments in file order
    pub segments: Vec<Segment>,
    /// Symbols extracted from `.symtab`, empty if the image is stripped
    pub symbols: SymbolTable,
}

/// Read a little-endian u16 at `offset`, checking bounds
fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    match data.get(offset..offset + 2) {
        Some(bytes) => Ok(u16::from_le_bytes([bytes[0], bytes[1]])),
        None => Err(SimulatorError::InvalidExecutable(format!(
            "truncated image at offset 0x{:x}",
            offset
        ))),
    }
}

/// Read a little-endian u32 at `offset`, checking bounds
fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    match data.get(offset..offset + 4) {
        Some(bytes) => Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        None => Err(SimulatorError::InvalidExecutable(format!(
            "truncated image at offset 0x{:x}",
            offset
        ))),
    }
}

impl Executable {
    /// Read and parse an executable from a file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the ELF file
    ///
    /// # Returns
    ///
    /// - `Ok(Executable)` if the image parsed successfully
    /// - `Err(SimulatorError)` on I/O failure or malformed image
    pub fn open(path: &str) -> Result<Self> {
        let data = std::fs::read(path)?;
        let exe = Self::parse(&data)?;
        log::info!(
            "Loaded {}: entry=0x{:08x}, {} segment(s), {} symbol(s)",
            path,
            exe.entry,
            exe.segments.len(),
            exe.symbols.len()
        );
        Ok(exe)
    }

    /// Parse an executable image from bytes
    ///
    /// Validates the ELF identification (32-bit, little-endian, RISC-V,
    /// executable), collects the `PT_LOAD` segments, and extracts the
    /// symbol table when one is present.
    ///
    /// # Arguments
    ///
    /// * `data` - The complete file contents
    ///
    /// # Returns
    ///
    /// - `Ok(Executable)` on success
    /// - `Err(SimulatorError::InvalidExecutable)` for malformed images
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 52 {
            return Err(SimulatorError::InvalidExecutable(
                "image shorter than an ELF32 header".to_string(),
            ));
        }
        if data[0..4] != ELF_MAGIC {
            return Err(SimulatorError::InvalidExecutable(
                "bad ELF magic".to_string(),
            ));
        }
        if data[4] != ELFCLASS32 {
            return Err(SimulatorError::InvalidExecutable(
                "not a 32-bit image".to_string(),
            ));
        }
        if data[5] != ELFDATA2LSB {
            return Err(SimulatorError::InvalidExecutable(
                "not little-endian".to_string(),
            ));
        }

        let e_type = read_u16(data, 0x10)?;
        if e_type != ET_EXEC {
            return Err(SimulatorError::InvalidExecutable(format!(
                "not an executable (type {})",
                e_type
            )));
        }
        let e_machine = read_u16(data, 0x12)?;
        if e_machine != EM_RISCV {
            return Err(SimulatorError::InvalidExecutable(format!(
                "not a RISC-V image (machine {})",
                e_machine
            )));
        }

        let entry = read_u32(data, 0x18)?;
        let segments = Self::parse_segments(data)?;
        let symbols = Self::parse_symbols(data)?;

        Ok(Self {
            entry,
            segments,
            symbols,
        })
    }

    /// Collect the PT_LOAD program headers
    fn parse_segments(data: &[u8]) -> Result<Vec<Segment>> {
        let ph_off = read_u32(data, 0x1C)? as usize;
        let ph_entsize = read_u16(data, 0x2A)? as usize;
        let ph_num = read_u16(data, 0x2C)? as usize;

        let mut segments = Vec::new();
        for i in 0..ph_num {
            let ph = ph_off + i * ph_entsize;
            if read_u32(data, ph)? != PT_LOAD {
                continue;
            }

            let offset = read_u32(data, ph + 0x04)? as usize;
            let vaddr = read_u32(data, ph + 0x08)?;
            let file_size = read_u32(data, ph + 0x10)? as usize;
            let mem_size = read_u32(data, ph + 0x14)?;
            let flags = read_u32(data, ph + 0x18)?;

            let contents = data.get(offset..offset + file_size).ok_or_else(|| {
                SimulatorError::InvalidExecutable(format!("segment {} extends past end of file", i))
            })?;

            log::debug!(
                "segment {}: vaddr=0x{:08x} filesz=0x{:x} memsz=0x{:x} flags={:#x}",
                i,
                vaddr,
                file_size,
                mem_size,
                flags
            );

            segments.push(Segment {
                vaddr,
                data: contents.to_vec(),
                mem_size,
                executable: flags & PF_X != 0,
            });
        }

        if segments.is_empty() {
            return Err(SimulatorError::InvalidExecutable(
                "no loadable segments".to_string(),
            ));
        }
        Ok(segments)
    }

    /// Extract `.symtab` entries into a [`SymbolTable`]
    ///
    /// Function symbols win over other symbol kinds at the same address.
    /// A stripped image yields an empty table; that is not an error.
    fn parse_symbols(data: &[u8]) -> Result<SymbolTable> {
        let sh_off = read_u32(data, 0x20)? as usize;
        let sh_entsize = read_u16(data, 0x2E)? as usize;
        let sh_num = read_u16(data, 0x30)? as usize;

        let mut table = SymbolTable::new();
        if sh_off == 0 || sh_num == 0 {
            return Ok(table);
        }

        for i in 0..sh_num {
            let sh = sh_off + i * sh_entsize;
            if read_u32(data, sh + 0x04)? != SHT_SYMTAB {
                continue;
            }

            let sym_off = read_u32(data, sh + 0x10)? as usize;
            let sym_size = read_u32(data, sh + 0x14)? as usize;
            let link = read_u32(data, sh + 0x18)? as usize;

            // The linked section holds the symbol name strings
            let str_sh = sh_off + link * sh_entsize;
            let str_off = read_u32(data, str_sh + 0x10)? as usize;
            let str_size = read_u32(data, str_sh + 0x14)? as usize;
            let strtab = data.get(str_off..str_off + str_size).ok_or_else(|| {
                SimulatorError::InvalidExecutable("string table extends past end".to_string())
            })?;

            let count = sym_size / 16;
            for s in 0..count {
                let sym = sym_off + s * 16;
                let name_off = read_u32(data, sym)? as usize;
                if name_off == 0 {
                    continue;
                }
                let value = read_u32(data, sym + 0x04)?;
                let info = *data.get(sym + 0x0C).ok_or_else(|| {
                    SimulatorError::InvalidExecutable("truncated symbol entry".to_string())
                })?;

                let name = match strtab.get(name_off..) {
                    Some(tail) => match tail.iter().position(|&b| b == 0) {
                        Some(end) => String::from_utf8_lossy(&tail[..end]).into_owned(),
                        None => continue,
                    },
                    None => continue,
                };
                if name.is_empty() {
                    continue;
                }

                if info & 0xF == STT_FUNC {
                    table.insert(value, name);
                } else {
                    table.symbols.entry(value).or_insert(name);
                }
            }
        }

        Ok(table)
    }

    /// Copy every loadable segment into guest memory
    ///
    /// The copy is byte-exact; the BSS tail (`mem_size` beyond the file
    /// data) needs no explicit zeroing because fresh pages read as zero.
    pub fn load_into(&self, mem: &mut Memory) {
        for segment in &self.segments {
            mem.load_segment(segment.vaddr, &segment.data);
        }
    }
}
