//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name          | Description                                        | Key Methods              |
// |---------------|----------------------------------------------------|--------------------------|
// | RingBuffer    | Fixed-capacity FIFO log, oldest evicted first      | push, iter, to_vec       |
//--------------------------------------------------------------------------------------------------
// TESTS
//--------------------------------------------------------------------------------------------------
// | Name                          | Description                                              |
// |-------------------------------|----------------------------------------------------------|
// | test_under_capacity           | Items come back in push order                           |
// | test_overwrites_oldest        | Items beyond capacity evict the oldest                  |
// | test_wraps_many_times         | Chronological order survives repeated wrap-around       |
// | test_zero_capacity            | A zero-capacity buffer holds nothing                    |
// | test_clear                    | Clearing resets the logical start                       |
//--------------------------------------------------------------------------------------------------

/// Fixed-capacity circular buffer.
///
/// Slots are filled in order until the buffer is full; after that every push
/// overwrites the slot holding the oldest item and moves the logical start one
/// position forward.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    capacity: usize,
    /// Slot holding the oldest item
    start: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` items.
    ///
    /// A capacity of zero yields a buffer that discards every push.
    pub fn new(capacity: usize) -> Self {
        Self {
            // Large capacities are filled lazily
            slots: Vec::with_capacity(capacity.min(1024)),
            capacity,
            start: 0,
        }
    }

    /// Appends an item, evicting the oldest one if the buffer is full.
    ///
    /// # Returns
    /// The evicted item, if any
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }

        if self.slots.len() < self.capacity {
            self.slots.push(item);
            return None;
        }

        let evicted = std::mem::replace(&mut self.slots[self.start], item);
        self.start = (self.start + 1) % self.capacity;
        Some(evicted)
    }

    /// Iterates over held items from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (wrapped, head) = self.slots.split_at(self.start);
        head.iter().chain(wrapped.iter())
    }

    /// Number of items currently held
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing has been pushed since creation or the last clear
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true once the next push will evict
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.slots.len() == self.capacity
    }

    /// Maximum number of items held
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every held item
    pub fn clear(&mut self) {
        self.slots.clear();
        self.start = 0;
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Returns the held items from oldest to newest
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}
