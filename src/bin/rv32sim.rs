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

use clap::Parser;
use log::{error, info};
use rv32sim::core::cpu::{Disassembler, Tracer};
use rv32sim::core::error::{Result, SimulatorError};
use rv32sim::core::loader::Executable;
use rv32sim::core::memory::Memory;
use rv32sim::core::system::{RunStatus, System};

/// RV32IM user-mode simulator
#[derive(Parser)]
#[command(name = "rv32sim")]
#[command(about = "RV32IM user-mode simulator and disassembler", long_about = None)]
struct Args {
    /// Path to a statically linked RV32 ELF executable
    program: String,

    /// Print a disassembly listing of the executable segments and exit
    #[arg(short = 'd', long)]
    disassemble: bool,

    /// Write a per-instruction execution trace to this file
    #[arg(short = 'l', long)]
    log_file: Option<String>,

    /// Override the entry point (hex, e.g. 0x1000)
    #[arg(long, value_parser = parse_hex)]
    entry: Option<u32>,

    /// Stop after this many instructions (0 = unlimited)
    #[arg(short = 'n', long, default_value = "0")]
    max_insns: u64,
}

fn parse_hex(s: &str) -> std::result::Result<u32, String> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid address '{}': {}", s, e))
}

/// Print a disassembly listing of every executable segment
fn print_listing(exe: &Executable) {
    for segment in &exe.segments {
        if !segment.executable {
            continue;
        }
        for (offset, chunk) in segment.data.chunks(4).enumerate() {
            let mut bytes = [0u8; 4];
            bytes[..chunk.len()].copy_from_slice(chunk);
            let word = u32::from_le_bytes(bytes);
            let addr = segment.vaddr + (offset as u32) * 4;
            println!(
                "{:08x}:  {:08x}    {}",
                addr,
                word,
                Disassembler::disassemble(addr, word, Some(&exe.symbols))
            );
        }
    }
}

fn main() -> Result<()> {
    // Initialize logger with default level INFO
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    info!("rv32sim v{}", env!("CARGO_PKG_VERSION"));

    let exe = match Executable::open(&args.program) {
        Ok(exe) => exe,
        Err(e) => {
            error!("Failed to load {}: {}", args.program, e);
            return Err(e);
        }
    };

    if args.disassemble {
        print_listing(&exe);
        return Ok(());
    }

    let mut mem = Memory::new();
    exe.load_into(&mut mem);

    let entry = args.entry.unwrap_or(exe.entry);
    info!("Simulation started at address 0x{:08x}", entry);

    let mut system = System::new(mem, entry);
    system.set_symbols(exe.symbols.clone());

    if let Some(path) = &args.log_file {
        info!("Tracing to {}", path);
        system.attach_tracer(Tracer::new(path)?);
    }

    let summary = system.run(args.max_insns)?;
    info!("{}", summary.stats);

    match summary.status {
        RunStatus::Exited => Ok(()),
        RunStatus::InsnLimit => {
            info!(
                "Instruction limit of {} reached at PC=0x{:08x}",
                args.max_insns,
                system.pc()
            );
            Ok(())
        }
        RunStatus::DecodeFault { pc, word } => {
            error!("Unhandled instruction 0x{:08x} at PC=0x{:08x}", word, pc);
            system.cpu().dump_registers();
            Err(SimulatorError::UnhandledInstruction { pc, word })
        }
        RunStatus::MisalignedPc { pc } => {
            error!("Misaligned program counter 0x{:08x}", pc);
            system.cpu().dump_registers();
            Err(SimulatorError::MisalignedPc { pc })
        }
    }
}
