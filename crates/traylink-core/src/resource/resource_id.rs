use std::{fmt, num::NonZeroU64};

/// Opaque identifier of a resource owned by one owner generation.
///
/// Packs `generation` into the high 32 bits and a non-zero `index` into
/// the low 32 bits, so the raw form is never zero and can travel across
/// the C boundary as a non-null pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId {
    generation: u32,
    index: u32,
}

impl ResourceId {
    /// Build an id. `index` zero is reserved and yields `None`.
    pub fn new(generation: u32, index: u32) -> Option<Self> {
        (index != 0).then_some(Self { generation, index })
    }

    /// Owner generation this resource belongs to.
    pub fn generation(self) -> u32 {
        self.generation
    }

    /// Slot within its generation.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Packed representation.
    pub fn to_raw(self) -> NonZeroU64 {
        let raw = (u64::from(self.generation) << 32) | u64::from(self.index);
        // index is non-zero, so raw is too.
        NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN)
    }

    /// Inverse of [`ResourceId::to_raw`]. Rejects a zero index.
    pub fn from_raw(raw: u64) -> Option<Self> {
        let generation = u32::try_from(raw >> 32).ok()?;
        let index = u32::try_from(raw & u64::from(u32::MAX)).ok()?;
        Self::new(generation, index)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.generation, self.index)
    }
}
