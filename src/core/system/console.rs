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

//! Host console abstraction
//!
//! The `ecall` byte services (getchar/putchar) go through this trait so the
//! interpreter stays decoupled from the process's real stdin/stdout and can
//! be exercised against a scripted console in tests.

use crate::core::error::Result;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::rc::Rc;

/// Byte-oriented host console used by the `ecall` services
pub trait Console {
    /// Read one byte from the host input
    ///
    /// # Returns
    ///
    /// - `Ok(Some(byte))` for the next input byte
    /// - `Ok(None)` on end of input
    /// - `Err(SimulatorError)` on host I/O failure
    fn getchar(&mut self) -> Result<Option<u8>>;

    /// Write one byte to the host output and flush
    fn putchar(&mut self, byte: u8) -> Result<()>;
}

/// Console backed by the process's stdin and stdout
pub struct StdConsole;

impl Console for StdConsole {
    fn getchar(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match std::io::stdin().lock().read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }

    fn putchar(&mut self, byte: u8) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&[byte])?;
        // Guest output must appear immediately
        stdout.flush()?;
        Ok(())
    }
}

/// Scripted console for tests and embedding
///
/// Input is served from a preloaded byte queue; output is captured in a
/// shared buffer that stays inspectable after the console has been handed
/// to a [`System`](super::System).
///
/// # Example
/// ```
/// use rv32sim::core::system::{BufferedConsole, Console};
///
/// let mut console = BufferedConsole::with_input(b"hi");
/// let output = console.output();
///
/// assert_eq!(console.getchar().unwrap(), Some(b'h'));
/// console.putchar(b'!').unwrap();
/// assert_eq!(output.borrow().as_slice(), b"!");
/// ```
#[derive(Default)]
pub struct BufferedConsole {
    input: VecDeque<u8>,
    output: Rc<RefCell<Vec<u8>>>,
}

impl BufferedConsole {
    /// Create a console with empty input
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a console whose input queue holds `input`
    pub fn with_input(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            output: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Shared handle to the bytes the guest writes
    pub fn output(&self) -> Rc<RefCell<Vec<u8>>> {
        Rc::clone(&self.output)
    }
}

impl Console for BufferedConsole {
    fn getchar(&mut self) -> Result<Option<u8>> {
        Ok(self.input.pop_front())
    }

    fn putchar(&mut self, byte: u8) -> Result<()> {
        self.output.borrow_mut().push(byte);
        Ok(())
    }
}
