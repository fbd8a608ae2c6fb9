//! The COW instruction set: twelve three-letter opcodes spelled from the
//! alphabet {m, o, O, M}.
//!
//! The table inside [`for_each_opcode!`] is the single source of truth: the
//! [`Opcode`] enum, the token spellings, ordinal decoding, and display all
//! derive from it.

/// Invokes `$callback` with the full opcode table.
///
/// Each row is `VariantName = ordinal, "token"`. The ordinal is the value the
/// execute-indirect instruction decodes from a cell; the token is the exact
/// three-character source spelling.
#[macro_export]
macro_rules! for_each_opcode {
    ($callback:ident) => {
        $callback! {
            /// Loop end: jump back while the current cell is non-zero.
            LoopEnd = 0, "moo",
            /// Move the memory pointer one cell back.
            MoveBack = 1, "mOo",
            /// Move the memory pointer one cell forward, growing the tape at
            /// the end.
            MoveForward = 2, "moO",
            /// Execute the instruction whose ordinal is the current cell
            /// value; the value 3 halts the machine instead.
            ExecuteCell = 3, "mOO",
            /// Write the current cell as a character when non-zero, else read
            /// one character into it and discard the rest of the line.
            CharIo = 4, "Moo",
            /// Decrease the current cell.
            Decrement = 5, "MOo",
            /// Increase the current cell.
            Increment = 6, "MoO",
            /// Loop start: skip past the matching loop end when the current
            /// cell is zero.
            LoopStart = 7, "MOO",
            /// Set the current cell to zero.
            Zero = 8, "OOO",
            /// Exchange the current cell with the register (two-phase
            /// toggle: store on the first pass, restore on the next).
            Exchange = 9, "MMM",
            /// Write the current cell as a decimal number.
            PrintNumber = 10, "OOM",
            /// Read a decimal number into the current cell.
            ReadNumber = 11, "oom",
        }
    };
}

macro_rules! define_opcodes {
    ( $( $(#[$doc:meta])* $name:ident = $ordinal:expr, $token:literal ),* $(,)? ) => {
        /// One of the twelve COW opcodes.
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
        #[repr(u8)]
        pub enum Opcode {
            $( $(#[$doc])* $name = $ordinal, )*
        }

        impl Opcode {
            /// Every opcode, in ordinal order.
            pub const ALL: &'static [Opcode] = &[ $( Opcode::$name, )* ];

            /// The three-character source spelling.
            pub const fn token(self) -> &'static str {
                match self {
                    $( Opcode::$name => $token, )*
                }
            }

            /// The value execute-indirect decoding associates with this
            /// opcode.
            pub const fn ordinal(self) -> u8 {
                self as u8
            }

            /// Decodes a three-byte source window. `None` when the window is
            /// not one of the twelve tokens.
            pub fn from_window(window: &[u8]) -> Option<Opcode> {
                $( if window == $token.as_bytes() { return Some(Opcode::$name); } )*
                None
            }

            /// Decodes a cell value as an opcode ordinal. Values outside
            /// 0..=11 carry no instruction and yield `None`.
            pub fn from_cell(value: i64) -> Option<Opcode> {
                $( if value == $ordinal { return Some(Opcode::$name); } )*
                None
            }
        }
    };
}

crate::for_each_opcode!(define_opcodes);

/// Cell value that halts the machine when executed indirectly. It is
/// [`Opcode::ExecuteCell`]'s own ordinal: the one instruction indirect
/// execution never dispatches, since doing so could never make progress.
pub const HALT_VALUE: i64 = Opcode::ExecuteCell as i64;

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}
