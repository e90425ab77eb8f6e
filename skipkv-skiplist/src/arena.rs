use std::mem;

/// Stable index of a slot in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

enum Slot<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// Slab storage with a free list. Ids stay valid until the slot is removed,
/// and removed slots are reused by later inserts.
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> NodeId {
        self.len += 1;
        match self.free_head {
            Some(idx) => {
                let slot = mem::replace(&mut self.slots[idx], Slot::Occupied(value));
                match slot {
                    Slot::Vacant(next) => self.free_head = next,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                }
                NodeId(idx)
            }
            None => {
                self.slots.push(Slot::Occupied(value));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// # Panics
    ///
    /// Panics if `id` is not occupied.
    pub fn remove(&mut self, id: NodeId) -> T {
        let slot = mem::replace(&mut self.slots[id.0], Slot::Vacant(self.free_head));
        match slot {
            Slot::Occupied(value) => {
                self.free_head = Some(id.0);
                self.len -= 1;
                value
            }
            Slot::Vacant(next) => {
                self.slots[id.0] = Slot::Vacant(next);
                panic!("remove of vacant slot {}", id.0);
            }
        }
    }

    pub fn get(&self, id: NodeId) -> &T {
        match &self.slots[id.0] {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => panic!("access to vacant slot {}", id.0),
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut T {
        match &mut self.slots[id.0] {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => panic!("access to vacant slot {}", id.0),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }

    /// Bytes held by the slot vector, not counting heap data owned by `T`.
    pub fn mem_usage(&self) -> usize {
        self.slots.capacity() * mem::size_of::<Slot<T>>()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        })
    }
}
