use alloc::vec::Vec;

use super::handle::Handle;

#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    // Vacant slots form an intrusive free list.
    Vacant { next_free: Option<Handle> },
}

/// Handle-addressed node storage. Released slots are reused, most recent first.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<Handle>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    /// Number of live elements.
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free_head {
            let slot = &mut self.slots[handle.index()];
            self.free_head = match slot {
                Slot::Vacant { next_free } => *next_free,
                Slot::Occupied(_) => unreachable!("`Arena::alloc()` - free list points at a live slot!"),
            };
            *slot = Slot::Occupied(element);
            self.len += 1;
            return handle;
        }

        assert!(
            self.slots.len() <= Handle::MAX,
            "`Arena::alloc()` - arena is at maximum capacity ({})",
            Handle::MAX + 1
        );
        self.slots.push(Slot::Occupied(element));
        self.len += 1;
        Handle::from_index(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get()` - `handle` is vacant!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get_mut()` - `handle` is vacant!"),
        }
    }

    /// Moves the element out and releases its slot.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match core::mem::replace(&mut self.slots[handle.index()], vacant) {
            Slot::Occupied(element) => {
                self.free_head = Some(handle);
                self.len -= 1;
                element
            }
            Slot::Vacant { next_free } => {
                // Undo so the free list stays intact before panicking.
                self.slots[handle.index()] = Slot::Vacant { next_free };
                panic!("`Arena::take()` - `handle` is vacant!")
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn released_slots_are_reused_last_in_first_out() {
        let mut arena = Arena::new();
        let a = arena.alloc('a');
        let b = arena.alloc('b');
        let c = arena.alloc('c');

        assert_eq!(arena.take(a), 'a');
        assert_eq!(arena.take(c), 'c');
        assert_eq!(arena.len(), 1);

        assert_eq!(arena.alloc('x'), c);
        assert_eq!(arena.alloc('y'), a);
        assert_eq!(*arena.get(b), 'b');
        assert_eq!(arena.len(), 3);
    }

    #[test]
    #[should_panic(expected = "`handle` is vacant")]
    fn get_after_take_panics() {
        let mut arena = Arena::new();
        let handle = arena.alloc(1u8);
        arena.take(handle);
        let _ = arena.get(handle);
    }

    proptest! {
        #[test]
        fn arena_tracks_live_elements(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut live: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.alloc(value);
                        prop_assert!(live.iter().all(|&(h, _)| h != handle), "handle {:?} handed out twice", handle);
                        live.push((handle, value));
                    }
                    Operation::Overwrite(which, value) if !live.is_empty() => {
                        let index = which % live.len();
                        *arena.get_mut(live[index].0) = value;
                        live[index].1 = value;
                    }
                    Operation::Take(which) if !live.is_empty() => {
                        let index = which % live.len();
                        let (handle, expected) = live.swap_remove(index);
                        prop_assert_eq!(arena.take(handle), expected);
                    }
                    Operation::Clear => {
                        arena.clear();
                        live.clear();
                    }
                    Operation::Overwrite(..) | Operation::Take(_) => {}
                }

                prop_assert_eq!(arena.len(), live.len());
                for &(handle, value) in &live {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        Overwrite(usize, u32),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::Overwrite(which, value)),
            10 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }
}
