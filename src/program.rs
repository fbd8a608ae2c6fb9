//! Executable program representation and jump-target resolution.

use crate::errors::CowError;
use crate::isa::Opcode;

/// A single executable operation.
///
/// `magnitude` only matters for [`Opcode::Increment`]/[`Opcode::Decrement`]
/// and is always at least 1 (the coalescing pass stores a run's net effect
/// here). `target` only matters for the loop opcodes and holds the index of
/// the matching bracket once the program is resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub magnitude: i64,
    pub target: usize,
}

impl Instruction {
    /// An instruction with the default magnitude of 1 and no resolved target.
    pub const fn plain(opcode: Opcode) -> Self {
        Self {
            opcode,
            magnitude: 1,
            target: 0,
        }
    }

    /// A coalesced increment or decrement moving the cell by `magnitude`.
    pub const fn with_magnitude(opcode: Opcode, magnitude: i64) -> Self {
        Self {
            opcode,
            magnitude,
            target: 0,
        }
    }
}

/// A loaded instruction sequence with every loop bracket pre-paired.
///
/// Targets are resolved exactly once here; the execution engine never scans
/// for a matching bracket at run time. The pairing is bidirectional: a loop
/// start's target is its loop end's index and vice versa.
#[derive(Clone, Debug, Default)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Resolves jump targets and produces an executable program.
    ///
    /// Fails if any bracket is unpaired, so a resolved program always
    /// satisfies the pairing invariant.
    pub fn resolve(mut instructions: Vec<Instruction>) -> Result<Self, CowError> {
        let mut stack: Vec<usize> = Vec::new();
        for i in 0..instructions.len() {
            match instructions[i].opcode {
                Opcode::LoopStart => stack.push(i),
                Opcode::LoopEnd => {
                    let Some(start) = stack.pop() else {
                        return Err(CowError::DanglingLoopEnd { position: i });
                    };
                    instructions[start].target = i;
                    instructions[i].target = start;
                }
                _ => {}
            }
        }
        if let Some(&position) = stack.last() {
            return Err(CowError::DanglingLoopStart { position });
        }
        Ok(Self { instructions })
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The instruction at `index`, if within the program.
    pub fn get(&self, index: usize) -> Option<Instruction> {
        self.instructions.get(index).copied()
    }

    /// The full instruction sequence.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(opcodes: &[Opcode]) -> Vec<Instruction> {
        opcodes.iter().map(|op| Instruction::plain(*op)).collect()
    }

    #[test]
    fn resolve_pairs_brackets_bidirectionally() {
        let program = Program::resolve(ops(&[
            Opcode::LoopStart,
            Opcode::Increment,
            Opcode::LoopEnd,
        ]))
        .unwrap();
        assert_eq!(program.instructions()[0].target, 2);
        assert_eq!(program.instructions()[2].target, 0);
    }

    #[test]
    fn resolve_pairs_nested_brackets() {
        let program = Program::resolve(ops(&[
            Opcode::LoopStart,
            Opcode::LoopStart,
            Opcode::LoopEnd,
            Opcode::LoopEnd,
        ]))
        .unwrap();
        let targets: Vec<usize> = program.instructions().iter().map(|i| i.target).collect();
        assert_eq!(targets, vec![3, 2, 1, 0]);
    }

    #[test]
    fn resolve_rejects_dangling_loop_end() {
        let err = Program::resolve(ops(&[Opcode::LoopEnd])).unwrap_err();
        assert!(matches!(err, CowError::DanglingLoopEnd { position: 0 }));
    }

    #[test]
    fn resolve_rejects_dangling_loop_start() {
        let err = Program::resolve(ops(&[
            Opcode::LoopStart,
            Opcode::LoopStart,
            Opcode::LoopEnd,
        ]))
        .unwrap_err();
        assert!(matches!(err, CowError::DanglingLoopStart { position: 0 }));
    }

    #[test]
    fn empty_program_resolves() {
        let program = Program::resolve(Vec::new()).unwrap();
        assert!(program.is_empty());
        assert_eq!(program.len(), 0);
        assert_eq!(program.get(0), None);
    }

    #[test]
    fn plain_instructions_default_to_magnitude_one() {
        let inst = Instruction::plain(Opcode::Increment);
        assert_eq!(inst.magnitude, 1);
        assert_eq!(inst.target, 0);
        let wide = Instruction::with_magnitude(Opcode::Decrement, 5);
        assert_eq!(wide.magnitude, 5);
    }
}
