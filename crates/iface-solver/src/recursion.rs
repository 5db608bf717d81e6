//! Recursion guard for cycle detection, depth limiting and iteration
//! bounding in hierarchy walks.
//!
//! Every walk over declared structure (base-class chains, interface closures,
//! constraint chains, nested type arguments, implementation-map requests that
//! recurse into base types) goes through a [`RecursionGuard`]. Well-formed
//! input never trips one; malformed input (a class that is its own base, an
//! interface inheriting itself) turns into a [`RecursionResult::Cycle`] or an
//! exceeded limit instead of unbounded recursion.
//!
//! # Profiles
//!
//! [`RecursionProfile`] names the depth limit used at each call site; every
//! profile shares the same iteration budget:
//!
//! ```ignore
//! let mut guard = RecursionGuard::with_profile(RecursionProfile::BaseChain);
//! ```
//!
//! In debug builds, dropping a guard with active entries panics, catching
//! forgotten `leave()` calls.

use iface_common::limits;
use rustc_hash::FxHashSet;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Walking `T -> base(T) -> ...`, including implementation-map requests
    /// that recurse into base types.
    BaseChain,

    /// Collecting the transitive interface set of a type.
    InterfaceClosure,

    /// Following type-parameter constraints (`T : U`, `U : I<T>`).
    ConstraintChain,

    /// Descending into nested generic arguments of one type occurrence.
    TypeNesting,
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::BaseChain => limits::MAX_BASE_CHAIN_DEPTH,
            Self::InterfaceClosure => limits::MAX_INTERFACE_CLOSURE_DEPTH,
            Self::ConstraintChain => limits::MAX_CONSTRAINT_CHAIN_DEPTH,
            Self::TypeNesting => limits::MAX_TYPE_NESTING_DEPTH,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already being visited.
    Cycle,
    /// Maximum recursion depth exceeded.
    DepthExceeded,
    /// Maximum iteration count exceeded.
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }

    #[inline]
    pub fn is_denied(self) -> bool {
        !matches!(self, Self::Entered)
    }
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Tracks the keys currently being visited plus depth and total work.
///
/// ```ignore
/// match guard.enter(def) {
///     RecursionResult::Entered => {
///         let result = walk(def);
///         guard.leave(def);
///         result
///     }
///     RecursionResult::Cycle => report_cycle(def),
///     RecursionResult::DepthExceeded
///     | RecursionResult::IterationExceeded => report_too_deep(def),
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    /// A guard with explicit limits; call sites use
    /// [`with_profile`](Self::with_profile).
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), limits::MAX_WALK_ITERATIONS)
    }

    /// Try to enter a recursive computation for `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller must call
    /// [`leave`](Self::leave) with the same key when done.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }
        if self.visiting.contains(&key) {
            return RecursionResult::Cycle;
        }

        self.visiting.insert(key);
        self.depth += 1;
        RecursionResult::Entered
    }

    /// Leave a recursive computation for `key`.
    ///
    /// Must be called exactly once after every successful [`enter`](Self::enter).
    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);

        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set"
        );

        self.depth = self.depth.saturating_sub(1);
    }

    /// Execute `f` inside a guarded scope.
    ///
    /// Returns `Ok(value)` on success or `Err(reason)` if entry was denied.
    /// `f` receives the guard back so nested walks can keep using it.
    pub fn scope<T>(
        &mut self,
        key: K,
        f: impl FnOnce(&mut Self) -> T,
    ) -> Result<T, RecursionResult> {
        match self.enter(key) {
            RecursionResult::Entered => {
                let result = f(self);
                self.leave(key);
                Ok(result)
            }
            denied => Err(denied),
        }
    }

    /// Drop every active entry. Walks that stop at the first denied entry
    /// (a base chain) call this instead of unwinding with `leave`.
    pub fn reset(&mut self) {
        self.visiting.clear();
        self.depth = 0;
        self.iterations = 0;
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries still in the visiting set",
                self.visiting.len(),
            );
        }
    }
}

#[cfg(test)]
#[path = "tests/recursion_tests.rs"]
mod tests;
