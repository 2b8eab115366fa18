//! Dynamical System Traits: Standardized Stepping API
//!
//! Systems advanced by the simulation loop implement [`DynamicalSystem`].
//! Randomness is passed in on every step rather than owned by the system,
//! so a run can be replayed from a scripted source.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DynamicalSystem Trait                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + step(rng)        - Advance system by one outer step       │
//! │  + run(n, rng)      - Run n outer steps                      │
//! │  + state()          - Snapshot of the current state          │
//! │  + n_elements()     - Current number of nodes                │
//! │  + is_terminal()    - No further meaningful step possible    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::random::RandomSource;

/// Trait for discrete-time systems driven by the simulation loop
pub trait DynamicalSystem {
    /// State snapshot type for this system
    type State;

    /// Advance the system by one outer step
    fn step<R: RandomSource + ?Sized>(&mut self, rng: &mut R);

    /// Run up to `n_steps` outer steps, stopping early once terminal.
    ///
    /// Returns the number of steps actually taken.
    fn run<R: RandomSource + ?Sized>(&mut self, n_steps: usize, rng: &mut R) -> usize {
        let mut taken = 0;
        for _ in 0..n_steps {
            if self.is_terminal() {
                break;
            }
            self.step(rng);
            taken += 1;
        }
        taken
    }

    /// Current state snapshot
    fn state(&self) -> Self::State;

    /// Number of elements (nodes) currently in the system
    fn n_elements(&self) -> usize;

    /// True once the system can no longer evolve meaningfully
    fn is_terminal(&self) -> bool {
        self.n_elements() <= 1
    }
}
