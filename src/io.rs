//! Host I/O seam for the virtual machine.
//!
//! The machine never touches the process's streams directly; every character
//! and number crosses a [`HostIo`] implementation. The default methods talk
//! to stdin/stdout, so embedders only override what they redirect.

use std::io::{Read, Write};

use crate::errors::CowError;

/// Callbacks the machine invokes for its four I/O effects.
///
/// All methods have console-backed defaults. Implementations that capture or
/// script I/O override the relevant methods and leave the rest alone.
pub trait HostIo {
    /// Writes a single output byte.
    fn write_char(&mut self, byte: u8) -> Result<(), CowError> {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(&[byte])
            .and_then(|_| stdout.flush())
            .map_err(|error| CowError::OutputFailed {
                reason: error.to_string(),
            })
    }

    /// Writes a cell value in decimal, followed by a newline.
    fn write_number(&mut self, value: i64) -> Result<(), CowError> {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{value}")
            .and_then(|_| stdout.flush())
            .map_err(|error| CowError::OutputFailed {
                reason: error.to_string(),
            })
    }

    /// Reads one input byte, or `None` at end of input.
    fn read_char(&mut self) -> Result<Option<u8>, CowError> {
        let mut buffer = [0u8; 1];
        match std::io::stdin().read(&mut buffer) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buffer[0])),
            Err(error) => Err(CowError::InputFailed {
                reason: error.to_string(),
            }),
        }
    }
}

/// The process console: stdin for reads, stdout for writes.
pub struct Console;

impl HostIo for Console {}

#[cfg(test)]
pub mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Scripted host used across the crate's tests: writes are recorded,
    /// reads are served from a prepared byte queue.
    pub struct ScriptedIo {
        pub chars: Vec<u8>,
        pub numbers: Vec<i64>,
        pub input: VecDeque<u8>,
    }

    impl ScriptedIo {
        pub fn new() -> Self {
            Self {
                chars: Vec::new(),
                numbers: Vec::new(),
                input: VecDeque::new(),
            }
        }

        pub fn with_input(text: &str) -> Self {
            let mut io = Self::new();
            io.input = text.bytes().collect();
            io
        }
    }

    impl HostIo for ScriptedIo {
        fn write_char(&mut self, byte: u8) -> Result<(), CowError> {
            self.chars.push(byte);
            Ok(())
        }

        fn write_number(&mut self, value: i64) -> Result<(), CowError> {
            self.numbers.push(value);
            Ok(())
        }

        fn read_char(&mut self) -> Result<Option<u8>, CowError> {
            Ok(self.input.pop_front())
        }
    }

    /// Host whose writes always fail, for error propagation tests.
    pub struct FailingIo;

    impl HostIo for FailingIo {
        fn write_char(&mut self, _byte: u8) -> Result<(), CowError> {
            Err(CowError::OutputFailed {
                reason: "scripted write failure".into(),
            })
        }

        fn write_number(&mut self, _value: i64) -> Result<(), CowError> {
            Err(CowError::OutputFailed {
                reason: "scripted write failure".into(),
            })
        }

        fn read_char(&mut self) -> Result<Option<u8>, CowError> {
            Err(CowError::InputFailed {
                reason: "scripted read failure".into(),
            })
        }
    }

    #[test]
    fn scripted_io_records_writes() {
        let mut io = ScriptedIo::new();
        io.write_char(b'x').unwrap();
        io.write_number(-3).unwrap();
        assert_eq!(io.chars, vec![b'x']);
        assert_eq!(io.numbers, vec![-3]);
    }

    #[test]
    fn scripted_io_serves_input_then_eof() {
        let mut io = ScriptedIo::with_input("ab");
        assert_eq!(io.read_char().unwrap(), Some(b'a'));
        assert_eq!(io.read_char().unwrap(), Some(b'b'));
        assert_eq!(io.read_char().unwrap(), None);
    }
}
