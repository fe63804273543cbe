//! Identifiers and simple allocators for adapter entities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stamp attached to each play request. Completions carrying an older stamp
/// belong to a superseded request.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

/// Identity of an [`AnimationElement`](crate::element::AnimationElement).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic allocator for [`Generation`] values.
#[derive(Default, Debug)]
pub struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> Generation {
        self.current
    }

    /// Advance and return the new generation; everything issued before is stale.
    #[inline]
    pub fn advance(&mut self) -> Generation {
        self.current = Generation(self.current.0.wrapping_add(1));
        self.current
    }

    #[inline]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current == generation
    }
}
