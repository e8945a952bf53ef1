//! Recursion guard shared by type lowering and type relations.
//!
//! One `RecursionGuard` tracks three things for a recursive walk: the keys
//! currently being visited (cycle detection), the nesting depth, and the total
//! number of entries attempted. Limits come from a `RecursionProfile` so that
//! every call site names what it is bounding instead of repeating numbers.

use rustc_hash::FxHashSet;
use std::hash::Hash;
use tsbc_common::limits::MAX_ALIAS_EXPANSION_DEPTH;

/// Named limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Structural equivalence and assignability between two lowered types.
    ///
    /// depth = 100, iterations = 100,000
    TypeRelation,

    /// Inlining type alias bodies while lowering a type node.
    ///
    /// depth = `MAX_ALIAS_EXPANSION_DEPTH`, iterations = 100,000
    AliasExpansion,

    /// Custom limits for tests.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::TypeRelation => 100,
            Self::AliasExpansion => MAX_ALIAS_EXPANSION_DEPTH,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::TypeRelation | Self::AliasExpansion => 100_000,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

/// Outcome of [`RecursionGuard::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already on the visiting stack.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }

    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

/// Cycle, depth and work-budget tracking for one recursive computation.
///
/// Every successful [`enter`](Self::enter) must be paired with a
/// [`leave`](Self::leave) for the same key. Debug builds panic when a guard
/// is dropped with keys still on the stack.
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to start work on `key`.
    ///
    /// The iteration budget is checked first, then depth, then cycles.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);
        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }
        if !self.visiting.insert(key) {
            return RecursionResult::Cycle;
        }
        self.depth += 1;
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(was_present, "RecursionGuard::leave() without matching enter()");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Run `f` between `enter(key)` and `leave(key)`.
    pub fn scope<T>(&mut self, key: K, f: impl FnOnce() -> T) -> Result<T, RecursionResult> {
        match self.enter(key) {
            RecursionResult::Entered => {
                let result = f();
                self.leave(key);
                Ok(result)
            }
            denied => Err(denied),
        }
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Sticky: stays set after the depth drops again.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} keys still entered",
                self.visiting.len()
            );
        }
    }
}
