//! A sandboxed interpreter for the COW esoteric language.
//!
//! COW programs are written with twelve three-letter opcodes spelled from the
//! alphabet {m, o, O, M} ("moo", "MoO", "MOO", ...); every other character in
//! the source is commentary. Programs operate on a growable tape of signed
//! integer cells through a memory pointer, with a one-slot exchange register
//! and an instruction that executes the opcode stored in the current cell.
//!
//! # Architecture
//!
//! - **Pipeline**: source text → [`parser::tokenize`] → loop validation →
//!   optional coalescing ([`parser::coalesce`]) →
//!   [`program::Program::resolve`] (one-pass jump pairing) → [`vm::CowVm`].
//! - **State**: the engine is the only stateful component; everything ahead
//!   of it is a pure function from text to instructions.
//! - **Sandboxing**: execution is bounded by [`limits::Limits`] ceilings on
//!   steps, tape growth, and output volume, each checked before the side
//!   effect it guards.
//! - **I/O**: hosts drive input and output through the [`io::HostIo`] seam;
//!   the default implementation binds to the console.
//!
//! # Modules
//!
//! - [`errors`]: failure enum and the parse/runtime/limit/io taxonomy
//! - [`io`]: host I/O trait, console default, scripted test double
//! - [`isa`]: the twelve-opcode instruction table
//! - [`limits`]: sandbox ceilings
//! - [`parser`]: tokenizer, loop validator, optimizer, compile entry points
//! - [`program`]: executable program with resolved jump targets
//! - [`utils`]: logging
//! - [`vm`]: the execution engine

pub mod errors;
pub mod io;
pub mod isa;
#[cfg(test)]
mod isa_static_check;
pub mod limits;
pub mod parser;
pub mod program;
pub mod utils;
pub mod vm;
