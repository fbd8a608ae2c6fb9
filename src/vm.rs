//! The virtual machine: a growable tape of integer cells, a memory pointer,
//! a program counter, and a one-slot exchange register.
//!
//! Execution is strictly iterative. [`CowVm::run`] is a loop over
//! [`CowVm::step`], so single-stepping under a debugger observes exactly the
//! states a full run passes through. Resource ceilings are checked before
//! the side effect they guard, which keeps the machine inspectable after a
//! limit fires: the tape, pointer, and register still hold the last valid
//! state.

use crate::errors::CowError;
use crate::io::HostIo;
use crate::isa::{HALT_VALUE, Opcode};
use crate::limits::Limits;
use crate::program::{Instruction, Program};

/// Tape size a machine starts with when the embedder does not choose one.
pub const DEFAULT_TAPE_CELLS: usize = 30_000;

/// Ceiling on how many times one step may re-dispatch through indirect
/// execution before it is treated as a runaway.
const MAX_INDIRECTION: usize = 16;

/// Longest line accepted while reading a number, in bytes.
const NUMBER_INPUT_MAX: usize = 99;

/// Lifecycle of a machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// Loaded (or freshly built) and not yet stepped.
    Ready,
    /// At least one step executed, more remain.
    Running,
    /// Finished, either by running off the program or by the halt value.
    Halted,
}

/// A sandboxed interpreter for one loaded [`Program`].
///
/// The machine owns its tape and counters; all I/O crosses the [`HostIo`]
/// passed into [`step`](CowVm::step) or [`run`](CowVm::run). Loading a
/// program resets every piece of machine state, so one instance can run any
/// number of programs in sequence.
pub struct CowVm {
    program: Program,
    tape: Vec<i64>,
    pointer: usize,
    pc: usize,
    register: i64,
    register_loaded: bool,
    steps: u64,
    output_bytes: u64,
    status: Status,
    limits: Limits,
    tape_cells: usize,
}

impl CowVm {
    /// An unrestricted machine with the default tape size.
    pub fn new() -> Self {
        Self::with_config(Limits::unlimited(), DEFAULT_TAPE_CELLS)
    }

    /// A machine with explicit limits and an initial tape of `tape_cells`
    /// zeroed cells.
    ///
    /// The initial size is clamped to the tape ceiling when one is set, and
    /// raised to a single cell when zero, so the memory pointer always has
    /// somewhere to stand.
    pub fn with_config(limits: Limits, tape_cells: usize) -> Self {
        let mut cells = tape_cells.max(1);
        if limits.max_tape > 0 {
            cells = cells.min(limits.max_tape);
        }
        Self {
            program: Program::default(),
            tape: vec![0; cells],
            pointer: 0,
            pc: 0,
            register: 0,
            register_loaded: false,
            steps: 0,
            output_bytes: 0,
            status: Status::Ready,
            limits,
            tape_cells: cells,
        }
    }

    /// Installs `program` and resets all machine state.
    pub fn load(&mut self, program: Program) {
        self.program = program;
        self.reset();
    }

    /// Returns the machine to its pristine post-load state: zeroed tape at
    /// the configured size, pointer and counter at zero, empty register.
    pub fn reset(&mut self) {
        self.tape.clear();
        self.tape.resize(self.tape_cells, 0);
        self.pointer = 0;
        self.pc = 0;
        self.register = 0;
        self.register_loaded = false;
        self.steps = 0;
        self.output_bytes = 0;
        self.status = Status::Ready;
    }

    /// Executes the instruction under the program counter.
    ///
    /// Stepping a halted machine is a no-op. Stepping past the end of the
    /// program transitions to [`Status::Halted`] without counting a step.
    /// A step that fails leaves the machine [`Status::Running`] with its
    /// state intact, so the failure site can be inspected.
    pub fn step<IO: HostIo>(&mut self, io: &mut IO) -> Result<(), CowError> {
        match self.status {
            Status::Halted => return Ok(()),
            Status::Ready => self.status = Status::Running,
            Status::Running => {}
        }
        let Some(instruction) = self.program.get(self.pc) else {
            self.status = Status::Halted;
            return Ok(());
        };
        if self.limits.max_steps > 0 && self.steps >= self.limits.max_steps {
            return Err(CowError::StepLimit {
                limit: self.limits.max_steps,
            });
        }
        let before = self.pc;
        self.dispatch(instruction, io)?;
        // Only fully executed steps count; a failed dispatch has no effects
        // to account for.
        self.steps += 1;
        if self.status == Status::Running && self.pc == before {
            self.pc += 1;
        }
        Ok(())
    }

    /// Steps until the machine halts or a step fails.
    ///
    /// Behaves exactly like calling [`step`](CowVm::step) in a loop; an
    /// empty program halts without executing anything.
    pub fn run<IO: HostIo>(&mut self, io: &mut IO) -> Result<(), CowError> {
        if self.program.is_empty() {
            self.status = Status::Halted;
            return Ok(());
        }
        while self.status != Status::Halted {
            self.step(io)?;
        }
        Ok(())
    }

    fn dispatch<IO: HostIo>(
        &mut self,
        instruction: Instruction,
        io: &mut IO,
    ) -> Result<(), CowError> {
        let mut opcode = instruction.opcode;
        let mut magnitude = instruction.magnitude;
        let mut target = instruction.target;
        let mut chained = 0usize;
        loop {
            match opcode {
                Opcode::LoopEnd => {
                    if self.read_cell() != 0 {
                        self.pc = target;
                    }
                }
                Opcode::MoveBack => {
                    if self.pointer == 0 {
                        return Err(CowError::TapeUnderflow { pc: self.pc });
                    }
                    self.pointer -= 1;
                }
                Opcode::MoveForward => {
                    if self.pointer + 1 == self.tape.len() {
                        if self.limits.max_tape > 0 && self.tape.len() >= self.limits.max_tape {
                            return Err(CowError::TapeLimit {
                                limit: self.limits.max_tape,
                            });
                        }
                        self.tape.push(0);
                    }
                    self.pointer += 1;
                }
                Opcode::ExecuteCell => {
                    let value = self.read_cell();
                    if value == HALT_VALUE {
                        self.status = Status::Halted;
                    } else if let Some(decoded) = Opcode::from_cell(value) {
                        chained += 1;
                        if chained > MAX_INDIRECTION {
                            return Err(CowError::IndirectionOverflow {
                                pc: self.pc,
                                max: MAX_INDIRECTION,
                            });
                        }
                        // Indirect instructions run with unit magnitude and
                        // no resolved partner. The two loop opcodes are safe
                        // without one: a cell holding their ordinal never
                        // satisfies their jump condition.
                        opcode = decoded;
                        magnitude = 1;
                        target = 0;
                        continue;
                    }
                    // Values outside the opcode range do nothing.
                }
                Opcode::CharIo => self.char_io(io)?,
                Opcode::Decrement => {
                    let value = self.read_cell().wrapping_sub(magnitude);
                    self.write_cell(value);
                }
                Opcode::Increment => {
                    let value = self.read_cell().wrapping_add(magnitude);
                    self.write_cell(value);
                }
                Opcode::LoopStart => {
                    if self.read_cell() == 0 {
                        self.pc = target + 1;
                    }
                }
                Opcode::Zero => self.write_cell(0),
                Opcode::Exchange => {
                    if self.register_loaded {
                        let value = self.register;
                        self.register_loaded = false;
                        self.write_cell(value);
                    } else {
                        self.register = self.read_cell();
                        self.register_loaded = true;
                    }
                }
                Opcode::PrintNumber => self.print_number(io)?,
                Opcode::ReadNumber => self.read_number(io)?,
            }
            return Ok(());
        }
    }

    /// Writes the cell as a byte when it is nonzero, otherwise reads one
    /// byte into the cell and discards the rest of the input line.
    fn char_io<IO: HostIo>(&mut self, io: &mut IO) -> Result<(), CowError> {
        let value = self.read_cell();
        if value != 0 {
            self.charge_output(1)?;
            return io.write_char(value as u8);
        }
        let read = io.read_char()?;
        let byte = read.unwrap_or(0);
        self.write_cell(i64::from(byte));
        if read.is_some() && byte != b'\n' {
            self.drain_line(io)?;
        }
        Ok(())
    }

    fn print_number<IO: HostIo>(&mut self, io: &mut IO) -> Result<(), CowError> {
        let value = self.read_cell();
        let bytes = value.to_string().len() as u64 + 1;
        self.charge_output(bytes)?;
        io.write_number(value)
    }

    /// Reads a line (bounded at [`NUMBER_INPUT_MAX`] bytes) and stores its
    /// leading integer, or zero when the line has none.
    fn read_number<IO: HostIo>(&mut self, io: &mut IO) -> Result<(), CowError> {
        let mut buffer = Vec::new();
        let mut saw_newline = false;
        while buffer.len() < NUMBER_INPUT_MAX {
            match io.read_char()? {
                None => break,
                Some(b'\n') => {
                    saw_newline = true;
                    break;
                }
                Some(byte) => buffer.push(byte),
            }
        }
        if !saw_newline && buffer.len() == NUMBER_INPUT_MAX {
            self.drain_line(io)?;
        }
        self.write_cell(parse_leading_int(&buffer));
        Ok(())
    }

    /// Consumes input up to and including the next newline or end of input.
    fn drain_line<IO: HostIo>(&mut self, io: &mut IO) -> Result<(), CowError> {
        loop {
            match io.read_char()? {
                None | Some(b'\n') => return Ok(()),
                Some(_) => {}
            }
        }
    }

    /// Accounts `bytes` of pending output against the output ceiling.
    fn charge_output(&mut self, bytes: u64) -> Result<(), CowError> {
        let total = self.output_bytes.saturating_add(bytes);
        if self.limits.max_output > 0 && total > self.limits.max_output {
            return Err(CowError::OutputLimit {
                limit: self.limits.max_output,
            });
        }
        self.output_bytes = total;
        Ok(())
    }

    fn read_cell(&self) -> i64 {
        self.tape[self.pointer]
    }

    fn write_cell(&mut self, value: i64) {
        self.tape[self.pointer] = value;
    }

    /// Current lifecycle state.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Index of the next instruction to execute.
    pub fn program_counter(&self) -> usize {
        self.pc
    }

    /// Index of the cell under the memory pointer.
    pub fn memory_pointer(&self) -> usize {
        self.pointer
    }

    /// Value of the cell under the memory pointer.
    pub fn current_cell(&self) -> i64 {
        self.read_cell()
    }

    /// Contents of the exchange register, if it holds a value.
    pub fn register(&self) -> Option<i64> {
        self.register_loaded.then_some(self.register)
    }

    /// Number of instructions executed since the last reset.
    pub fn steps_executed(&self) -> u64 {
        self.steps
    }

    /// Current tape length in cells.
    pub fn tape_len(&self) -> usize {
        self.tape.len()
    }
}

impl Default for CowVm {
    fn default() -> Self {
        Self::new()
    }
}

/// Leading-integer parse over raw bytes: optional whitespace, optional
/// sign, then digits. Anything else, or no digits at all, parses as zero.
fn parse_leading_int(bytes: &[u8]) -> i64 {
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let mut negative = false;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        negative = bytes[i] == b'-';
        i += 1;
    }
    let mut value: i64 = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        value = value.wrapping_mul(10).wrapping_add(i64::from(bytes[i] - b'0'));
        i += 1;
    }
    if negative { value.wrapping_neg() } else { value }
}
