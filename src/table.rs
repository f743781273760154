use std::cmp::min;

use crate::utils::MyHash;

#[derive(Clone)]
struct Entry<T> {
    value: T,
    next: usize,
}

/// Fixed-capacity table with a bucket-chained index over its values.
///
/// Values are appended and never removed, so an index is a stable identity.
/// Index `0` is never part of a chain and doubles as the end-of-chain marker.
#[derive(Clone)]
pub struct Table<T> {
    data: Vec<Entry<T>>,
    capacity: usize,

    buckets: Vec<usize>,
    bitmask: u64,
}

/// The table has no room for another value.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TableFull {
    pub capacity: usize,
}

impl<T> Table<T> {
    /// Create a new table of size `2^bits`.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Storage bits should be in the range 0..=31");

        let capacity = 1 << bits;
        let buckets_bits = min(bits, 16);
        let buckets_size = 1 << buckets_bits;

        Self {
            data: Vec::with_capacity(min(capacity, 1 << 16)),
            capacity,
            buckets: vec![0; buckets_size],
            bitmask: (buckets_size - 1) as u64,
        }
    }

    /// Get the capacity of the table.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    /// Get the number of stored values.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        &self.data[index].value
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index).map(|entry| &entry.value)
    }

    /// Get the index of the next value in the same bucket.
    pub fn next(&self, index: usize) -> usize {
        self.data[index].next
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.iter().map(|entry| &entry.value)
    }

    /// Append a value without registering it in the index.
    pub fn add(&mut self, value: T) -> Result<usize, TableFull> {
        let index = self.data.len();
        if index >= self.capacity {
            return Err(TableFull {
                capacity: self.capacity,
            });
        }
        self.data.push(Entry { value, next: 0 });
        Ok(index)
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Put a value into the table and return its index.
    ///
    /// Returns the index of the existing value if an equal one is already stored.
    pub fn put(&mut self, value: T) -> Result<usize, TableFull> {
        let bucket_index = self.bucket_index(&value);
        let mut index = self.buckets[bucket_index];

        if index == 0 {
            // Create new value and put it into the bucket.
            let i = self.add(value)?;
            assert_ne!(i, 0, "Index 0 cannot be chained");
            self.buckets[bucket_index] = i;
            return Ok(i);
        }

        loop {
            if &value == self.value(index) {
                // The value already exists.
                return Ok(index);
            }

            let next = self.next(index);

            if next == 0 {
                // Create new value and append it to the bucket.
                let i = self.add(value)?;
                self.data[index].next = i;
                return Ok(i);
            } else {
                // Go to the next value in the bucket.
                index = next;
            }
        }
    }
}
