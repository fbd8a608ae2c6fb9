//! Sandbox ceilings for bounding untrusted program execution.

/// Resource ceilings enforced while a program runs.
///
/// A field set to 0 disables that ceiling. Limits are fixed at machine
/// construction and hold for its whole lifetime.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Limits {
    /// Maximum instructions executed in one run.
    pub max_steps: u64,
    /// Maximum tape length in cells, counting the initial cells.
    pub max_tape: usize,
    /// Maximum output volume in bytes across both output channels.
    pub max_output: u64,
}

impl Limits {
    /// No ceilings: execution is bounded only by the program.
    pub const fn unlimited() -> Self {
        Self {
            max_steps: 0,
            max_tape: 0,
            max_output: 0,
        }
    }

    /// Conservative ceilings for running untrusted programs.
    pub const fn sandboxed() -> Self {
        Self {
            max_steps: 10_000_000,
            max_tape: 65_536,
            max_output: 1 << 20,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::unlimited()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_disables_every_ceiling() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_steps, 0);
        assert_eq!(limits.max_tape, 0);
        assert_eq!(limits.max_output, 0);
        assert_eq!(Limits::default(), limits);
    }

    #[test]
    fn sandboxed_sets_every_ceiling() {
        let limits = Limits::sandboxed();
        assert!(limits.max_steps > 0);
        assert!(limits.max_tape > 0);
        assert!(limits.max_output > 0);
    }
}
