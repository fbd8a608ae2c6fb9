//! Source parsing: the sliding-window tokenizer, loop validation, the
//! coalescing optimizer, and the compile entry points.
//!
//! Everything here is a pure function from text to instructions; all
//! run-time state lives in [`crate::vm`].

use crate::errors::CowError;
use crate::isa::Opcode;
use crate::program::{Instruction, Program};

/// A recognized token and the byte offset of its first character.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token {
    pub opcode: Opcode,
    pub offset: usize,
}

/// Lazy left-to-right scanner over source text.
///
/// Equivalent to sliding a three-byte window that is tested after every
/// absorbed byte and cleared on a match: a match consumes its three bytes,
/// otherwise the scan advances one byte. Recognized tokens therefore never
/// overlap, and bytes that complete no token are commentary.
pub struct Tokens<'a> {
    source: &'a [u8],
    pos: usize,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.pos + 3 <= self.source.len() {
            let window = &self.source[self.pos..self.pos + 3];
            if let Some(opcode) = Opcode::from_window(window) {
                let token = Token {
                    opcode,
                    offset: self.pos,
                };
                self.pos += 3;
                return Some(token);
            }
            self.pos += 1;
        }
        None
    }
}

/// Returns a fresh scanner over `source`.
pub fn tokenize(source: &str) -> Tokens<'_> {
    Tokens {
        source: source.as_bytes(),
        pos: 0,
    }
}

/// Compiles source text into an executable program, one instruction per
/// recognized token.
pub fn compile_source(source: &str) -> Result<Program, CowError> {
    Program::resolve(parse(source)?)
}

/// Compiles source text with the coalescing pass applied.
pub fn compile_source_optimized(source: &str) -> Result<Program, CowError> {
    let instructions = parse(source)?;
    Program::resolve(coalesce(&instructions))
}

/// Coalesces runs of increments and decrements into single instructions
/// carrying the run's net magnitude.
///
/// A run whose net effect is zero vanishes entirely; every other opcode ends
/// the current run. Applying the pass to its own output changes nothing.
pub fn coalesce(instructions: &[Instruction]) -> Vec<Instruction> {
    let mut out = Vec::with_capacity(instructions.len());
    let mut delta: i64 = 0;
    for instruction in instructions {
        match instruction.opcode {
            Opcode::Increment => delta += instruction.magnitude,
            Opcode::Decrement => delta -= instruction.magnitude,
            _ => {
                flush(&mut out, &mut delta);
                out.push(*instruction);
            }
        }
    }
    flush(&mut out, &mut delta);
    out
}

fn flush(out: &mut Vec<Instruction>, delta: &mut i64) {
    if *delta > 0 {
        out.push(Instruction::with_magnitude(Opcode::Increment, *delta));
    } else if *delta < 0 {
        out.push(Instruction::with_magnitude(Opcode::Decrement, -*delta));
    }
    *delta = 0;
}

/// Tokenizes and validates `source` without coalescing.
fn parse(source: &str) -> Result<Vec<Instruction>, CowError> {
    let tokens: Vec<Token> = tokenize(source).collect();
    validate(&tokens, source)?;
    Ok(tokens
        .iter()
        .map(|token| Instruction::plain(token.opcode))
        .collect())
}

/// Checks bracket pairing over the token sequence.
///
/// Runs before any coalescing, so the accept/reject decision and the
/// reported positions are identical in both compile modes.
fn validate(tokens: &[Token], source: &str) -> Result<(), CowError> {
    let mut stack: Vec<usize> = Vec::new();
    for (position, token) in tokens.iter().enumerate() {
        match token.opcode {
            Opcode::LoopStart => stack.push(position),
            Opcode::LoopEnd => {
                if stack.pop().is_none() {
                    let (line, column) = line_column(source, token.offset);
                    return Err(CowError::UnmatchedLoopEnd {
                        position,
                        line,
                        column,
                    });
                }
            }
            _ => {}
        }
    }
    if let Some(&position) = stack.last() {
        let (line, column) = line_column(source, tokens[position].offset);
        return Err(CowError::UnmatchedLoopStart {
            position,
            line,
            column,
        });
    }
    Ok(())
}

/// 1-based line and column of a byte offset.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for byte in &source.as_bytes()[..offset] {
        if *byte == b'\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// Renders a parse failure against its source, pointing at the offending
/// token.
///
/// Errors without source locations render as a plain `error:` line.
pub fn render_parse_error(source: &str, error: &CowError) -> String {
    let (line, column) = match error {
        CowError::UnmatchedLoopStart { line, column, .. }
        | CowError::UnmatchedLoopEnd { line, column, .. } => (*line, *column),
        other => return format!("error: {other}\n"),
    };
    let text = source.lines().nth(line - 1).unwrap_or("");
    format!(
        "error: {error}\n  --> line {line}, column {column}\n   |\n   | {text}\n   | {:>pad$}^^^\n",
        "",
        pad = column - 1,
    )
}
