//! Trait node identity
//!
//! Every trait node gets a process-unique id when it is created. Ids are used
//! for logging, for rendering composition trees and for leaf membership
//! queries.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::Lazy;

/// A unique identifier for a trait node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TraitId(pub usize);

impl TraitId {
    /// Create a new TraitId with the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use trait_compose::compose::TraitId;
    ///
    /// let id = TraitId::new(42);
    /// assert_eq!(id.value(), 42);
    /// ```
    #[inline]
    pub fn new(value: usize) -> Self {
        TraitId(value)
    }

    /// Returns the inner value of the trait ID.
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TraitId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Generator for creating unique trait IDs.
#[derive(Debug)]
pub struct TraitIdGenerator {
    next_id: AtomicUsize,
}

impl TraitIdGenerator {
    /// Create a new generator starting at zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use trait_compose::compose::TraitIdGenerator;
    ///
    /// let generator = TraitIdGenerator::new();
    /// let id1 = generator.generate();
    /// let id2 = generator.generate();
    /// assert_ne!(id1, id2);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(0),
        }
    }

    /// Generate a new unique trait ID.
    #[inline]
    pub fn generate(&self) -> TraitId {
        TraitId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for TraitIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide generator used by `Trait` constructors
static TRAIT_IDS: Lazy<TraitIdGenerator> = Lazy::new(TraitIdGenerator::new);

/// Allocate the next trait id
pub(crate) fn next_trait_id() -> TraitId {
    TRAIT_IDS.generate()
}
