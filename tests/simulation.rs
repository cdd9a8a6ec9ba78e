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

//! End-to-end simulation scenarios

mod common;

use common::asm;
use common::system_with;
use rv32sim::core::cpu::Tracer;
use rv32sim::core::system::{BufferedConsole, RunStatus};

#[test]
fn test_addi_chain_terminates_with_expected_registers() {
    let mut system = system_with(
        0x0FFC,
        &[
            asm::addi(17, 0, 3),
            asm::addi(1, 0, 5),
            asm::addi(2, 1, 3),
            asm::ecall(),
        ],
    );

    let summary = system.run(0).unwrap();
    assert_eq!(summary.status, RunStatus::Exited);
    assert_eq!(system.cpu().reg(1), 5);
    assert_eq!(system.cpu().reg(2), 8);
    assert_eq!(summary.stats.insns, 4);
}

#[test]
fn test_signed_branch_skips_instruction() {
    let mut system = system_with(
        0x2000,
        &[
            asm::addi(1, 0, -1),
            asm::addi(2, 0, 1),
            asm::blt(1, 2, 8),
            asm::addi(3, 0, 99), // skipped
            asm::addi(17, 0, 3),
            asm::ecall(),
        ],
    );

    let summary = system.run(0).unwrap();
    assert_eq!(summary.status, RunStatus::Exited);
    assert_eq!(system.cpu().reg(3), 0);
    assert_eq!(summary.stats.branches, 1);
    assert_eq!(summary.stats.taken_branches, 1);
}

#[test]
fn test_unaligned_word_assembled_from_byte_stores() {
    // Build 0xDEADBEEF at the odd address 0x4001 with four sb, read it
    // back with one lw
    let mut system = system_with(
        0x1000,
        &[
            asm::lui(1, 0x4),       // x1 = 0x4000
            asm::addi(1, 1, 1),     // x1 = 0x4001
            asm::addi(2, 0, 0xEF),  // byte 0
            asm::sb(2, 1, 0),
            asm::addi(2, 0, 0xBE),  // byte 1
            asm::sb(2, 1, 1),
            asm::addi(2, 0, 0xAD),  // byte 2
            asm::sb(2, 1, 2),
            asm::addi(2, 0, 0xDE),  // byte 3
            asm::sb(2, 1, 3),
            asm::lw(5, 1, 0),
            asm::addi(17, 0, 3),
            asm::ecall(),
        ],
    );

    let summary = system.run(0).unwrap();
    assert_eq!(summary.status, RunStatus::Exited);
    assert_eq!(system.cpu().reg(5), 0xDEADBEEF);
}

#[test]
fn test_division_edge_cases() {
    let mut system = system_with(
        0x1000,
        &[
            asm::lui(1, 0x80000),  // x1 = 0x80000000 (i32::MIN)
            asm::addi(2, 0, -1),   // x2 = -1
            asm::div(3, 1, 2),     // overflow: x3 = 0x80000000
            asm::div(4, 1, 0),     // divide by zero: x4 = all-ones
            asm::rem(5, 1, 0),     // divide by zero: x5 = dividend
            asm::addi(17, 0, 3),
            asm::ecall(),
        ],
    );

    let summary = system.run(0).unwrap();
    assert_eq!(summary.status, RunStatus::Exited);
    assert_eq!(system.cpu().reg(3), 0x80000000);
    assert_eq!(system.cpu().reg(4), 0xFFFFFFFF);
    assert_eq!(system.cpu().reg(5), 0x80000000);
}

#[test]
fn test_jalr_masks_low_bit_then_faults_on_fetch() {
    // jalr to 0x1003 masks the low bit, leaving pc = 0x1002; the fault
    // fires at the next fetch
    let mut system = system_with(
        0x3000,
        &[
            asm::lui(2, 0x1),      // x2 = 0x1000
            asm::jalr(1, 2, 3),    // at 0x3004: x1 = 0x3008, pc = 0x1002
        ],
    );

    system.step().unwrap();
    system.step().unwrap();
    assert_eq!(system.cpu().reg(1), 0x3008);
    assert_eq!(system.pc(), 0x1002);

    let summary = system.run(0).unwrap();
    assert_eq!(summary.status, RunStatus::MisalignedPc { pc: 0x1002 });
    assert_eq!(summary.stats.insns, 2);
}

#[test]
fn test_echo_program() {
    // getchar, putchar it back, exit
    let mut system = system_with(
        0x1000,
        &[
            asm::addi(17, 0, 1),
            asm::ecall(), // getchar -> a0
            asm::addi(17, 0, 2),
            asm::ecall(), // putchar a0
            asm::addi(17, 0, 3),
            asm::ecall(), // exit
        ],
    );
    let console = BufferedConsole::with_input(b"x");
    let output = console.output();
    system.set_console(Box::new(console));

    let summary = system.run(0).unwrap();
    assert_eq!(summary.status, RunStatus::Exited);
    assert_eq!(output.borrow().as_slice(), b"x");
}

#[test]
fn test_countdown_loop_statistics() {
    // x1 = 10; loop { x1 -= 1 } while x1 != 0; exit
    let mut system = system_with(
        0x1000,
        &[
            asm::addi(1, 0, 10),
            asm::addi(1, 1, -1),
            asm::bne(1, 0, -4),
            asm::addi(17, 0, 3),
            asm::ecall(),
        ],
    );

    let summary = system.run(0).unwrap();
    assert_eq!(summary.status, RunStatus::Exited);
    assert_eq!(system.cpu().reg(1), 0);
    assert_eq!(summary.stats.insns, 1 + 10 * 2 + 2);
    assert_eq!(summary.stats.branches, 10);
    assert_eq!(summary.stats.taken_branches, 9);
    assert!(summary.stats.taken_branches <= summary.stats.branches);
    assert!(summary.stats.branches <= summary.stats.insns);
}

#[test]
fn test_trace_file_has_one_line_per_instruction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.log");

    let mut system = system_with(
        0x0FFC,
        &[
            asm::addi(17, 0, 3),
            asm::addi(1, 0, 5),
            asm::addi(2, 1, 3),
            asm::ecall(),
        ],
    );
    system.attach_tracer(Tracer::new(path.to_str().unwrap()).unwrap());

    let summary = system.run(0).unwrap();
    assert_eq!(summary.status, RunStatus::Exited);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    // Four instruction lines plus the termination line
    assert_eq!(lines.len(), 5);
    assert!(lines[0].contains("00000ffc : 00300893"));
    assert!(lines[0].contains("addi x17, x0, 3"));
    assert!(lines[1].contains("x1 <- 00000005"));
    assert!(lines[3].contains("ecall"));
    assert_eq!(lines[4], "Program terminated at 00001008");
}

#[test]
fn test_trace_marks_branch_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.log");

    let mut system = system_with(
        0x2000,
        &[
            asm::beq(0, 0, 8),   // taken, skips the next word
            asm::addi(3, 0, 99), // skipped
            asm::bne(0, 0, 8),   // never taken
            asm::addi(17, 0, 3),
            asm::ecall(),
        ],
    );
    system.attach_tracer(Tracer::new(path.to_str().unwrap()).unwrap());

    let summary = system.run(0).unwrap();
    assert_eq!(summary.status, RunStatus::Exited);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("taken -> 00002008"));
    assert!(contents.contains("not taken"));
}

#[test]
fn test_decode_fault_reports_statistics_so_far() {
    let mut system = system_with(
        0x1000,
        &[
            asm::addi(1, 0, 1),
            asm::addi(2, 0, 2),
            0xFFFFFFFF, // unknown opcode
        ],
    );

    let summary = system.run(0).unwrap();
    assert_eq!(
        summary.status,
        RunStatus::DecodeFault {
            pc: 0x1008,
            word: 0xFFFFFFFF
        }
    );
    assert_eq!(summary.stats.insns, 3);
    assert_eq!(system.cpu().reg(1), 1);
    assert_eq!(system.cpu().reg(2), 2);
}
