use crate::ResourceId;

use std::collections::HashMap;

/// Storage for resources created by one owner generation.
///
/// Lookups with an id from any other generation miss, so handles that
/// outlived their owner are treated as stale rather than aliasing new
/// resources.
#[derive(Debug)]
pub struct ResourceTable<T> {
    generation: u32,
    next_index: u32,
    entries: HashMap<u32, T>,
}

impl<T> ResourceTable<T> {
    /// Empty table for `generation`.
    pub fn new(generation: u32) -> Self {
        Self {
            generation,
            next_index: 1,
            entries: HashMap::new(),
        }
    }

    /// Generation whose ids this table accepts.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Store `value` under a fresh id.
    ///
    /// Returns `None` only when every index of the generation is in use.
    pub fn insert(&mut self, value: T) -> Option<ResourceId> {
        let id = self.allocate()?;
        self.entries.insert(id.index(), value);
        Some(id)
    }

    /// Reserve a fresh id without storing anything yet.
    ///
    /// For values that need their own id at construction time; hand the
    /// value over with [`ResourceTable::place`]. An id is not handed out
    /// again until the index space wraps around.
    pub fn allocate(&mut self) -> Option<ResourceId> {
        if self.entries.len() >= u32::MAX as usize {
            return None;
        }
        while self.entries.contains_key(&self.next_index) {
            self.bump();
        }
        let id = ResourceId::new(self.generation, self.next_index)?;
        self.bump();
        Some(id)
    }

    /// Store `value` under an id from [`ResourceTable::allocate`].
    ///
    /// Gives `value` back if the id belongs to another generation or is
    /// already occupied.
    pub fn place(&mut self, id: ResourceId, value: T) -> Result<(), T> {
        if !self.accepts(id) || self.entries.contains_key(&id.index()) {
            return Err(value);
        }
        self.entries.insert(id.index(), value);
        Ok(())
    }

    /// Resource for `id`, if it belongs to this generation and still exists.
    pub fn get(&self, id: ResourceId) -> Option<&T> {
        self.accepts(id).then(|| self.entries.get(&id.index())).flatten()
    }

    /// Mutable access to the resource for `id`.
    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut T> {
        if self.accepts(id) {
            self.entries.get_mut(&id.index())
        } else {
            None
        }
    }

    /// Remove and return the resource for `id`.
    pub fn remove(&mut self, id: ResourceId) -> Option<T> {
        if self.accepts(id) {
            self.entries.remove(&id.index())
        } else {
            None
        }
    }

    /// Whether `id` refers to a live resource here.
    pub fn contains(&self, id: ResourceId) -> bool {
        self.get(id).is_some()
    }

    /// Ids of every live resource.
    pub fn ids(&self) -> Vec<ResourceId> {
        self.entries
            .keys()
            .filter_map(|index| ResourceId::new(self.generation, *index))
            .collect()
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove everything, returning it with its ids.
    pub fn drain(&mut self) -> Vec<(ResourceId, T)> {
        let generation = self.generation;
        self.entries
            .drain()
            .filter_map(|(index, value)| ResourceId::new(generation, index).map(|id| (id, value)))
            .collect()
    }

    fn accepts(&self, id: ResourceId) -> bool {
        id.generation() == self.generation
    }

    fn bump(&mut self) {
        self.next_index = self.next_index.checked_add(1).unwrap_or(1);
    }
}
