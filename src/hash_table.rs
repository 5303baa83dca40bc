use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::config::Config;
use crate::error::Error;
use crate::error::Result;

/// One link of a bucket chain. `next` is a handle into the same arena.
#[derive(Clone)]
struct Node<V> {
    hash: u64,
    value: V,
    next: Option<usize>,
}

/// Where a probe of a single chain ended up.
enum Probe {
    Found { index: usize, prev: Option<usize> },
    Missing { tail: Option<usize> },
}

/// Chain-length statistics for a table.
///
/// `bins[n]` is the number of buckets whose chain holds exactly `n` entries.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHistogram {
    /// Bucket counts indexed by chain length.
    pub bins: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ChainHistogram {
    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("chain histogram ({} buckets):", self.bins.iter().sum::<usize>());

        for (len, &count) in self.bins.iter().enumerate() {
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            match units % 8 {
                0 => {}
                1 => bar.push('▏'),
                2 => bar.push('▎'),
                3 => bar.push('▍'),
                4 => bar.push('▌'),
                5 => bar.push('▋'),
                6 => bar.push('▊'),
                _ => bar.push('▉'),
            }
            println!("{len:>3} | {bar} ({count})");
        }
    }
}

/// Debug statistics for hash table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries currently in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Number of buckets with a non-empty chain
    pub occupied_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Current occupancy (populated / capacity)
    pub load: f64,
    /// Configured occupancy at which the table grows
    pub load_factor: f64,
    /// Bucket utilization (occupied_buckets / capacity)
    pub bucket_utilization: f64,
    /// Bytes reserved for bucket heads and the entry arena
    pub total_bytes: usize,
    /// Bytes reserved in the entry arena but not holding an entry
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load, grows at {:.2}%)",
            self.populated,
            self.capacity,
            self.load * 100.0,
            self.load_factor * 100.0
        );
        println!(
            "Bucket Usage: {}/{} ({:.2}% utilization)",
            self.occupied_buckets,
            self.capacity,
            self.bucket_utilization * 100.0
        );
        println!("Longest chain: {} entries", self.longest_chain);
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// A hash table resolving collisions with separate chaining.
///
/// `HashTable<V>` stores values of type `V` in per-bucket chains. Like a raw
/// table, it does not hash anything itself: every operation takes the hash of
/// the value's key and an equality predicate that identifies the value.
///
/// Chains are singly linked through integer handles into a dense entry
/// arena. The bucket for a hash is `hash & (capacity - 1)`; capacity is a
/// power of two and doubles whenever an insert finds
/// `len / capacity >= load_factor`.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use chain_hash::hash_table::Entry;
/// # use chain_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::new();
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123).unwrap() {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    heads: Vec<Option<usize>>,
    nodes: Vec<Node<V>>,
    load_factor: f64,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;

        let chains = self
            .heads
            .iter()
            .enumerate()
            .filter_map(|(bucket, head)| {
                head.map(|head| {
                    let mut links = Vec::new();
                    let mut cursor = Some(head);
                    while let Some(index) = cursor {
                        links.push(format!("{index}"));
                        cursor = self.nodes[index].next;
                    }
                    format!("{bucket:02}: {}", links.join(" -> "))
                })
            })
            .collect::<Vec<String>>();

        f.debug_struct("HashTable")
            .field("chains", &chains)
            .field("populated", &self.nodes.len())
            .field("capacity", &self.heads.len())
            .field("load_factor", &self.load_factor)
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with 16 buckets and a 0.75 load factor.
    pub fn new() -> Self {
        Self::from_validated(Config::default())
    }

    /// Creates an empty table with the given number of buckets, rounded up to
    /// a power of two.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100).unwrap();
    /// assert_eq!(table.capacity(), 128);
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(Config::default().with_initial_capacity(capacity))
    }

    /// Creates an empty table from a [`Config`].
    ///
    /// # Errors
    ///
    /// Whatever [`Config::validate`] rejects.
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self::from_validated(config.validate()?))
    }

    fn from_validated(config: Config) -> Self {
        debug_assert!(config.initial_capacity().is_power_of_two());
        Self {
            heads: vec![None; config.initial_capacity()],
            nodes: Vec::new(),
            load_factor: config.load_factor(),
        }
    }

    /// Returns an iterator over all values, bucket by bucket and in chain
    /// order within each bucket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(0, |&n: &u32| n == 1).unwrap().or_insert(1);
    /// table.entry(0, |&n: &u32| n == 2).unwrap().or_insert(2);
    ///
    /// // Same bucket, so chain order is insertion order.
    /// assert_eq!(table.iter().copied().collect::<Vec<_>>(), [1, 2]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            table: self,
            bucket: 0,
            cursor: None,
            remaining: self.nodes.len(),
        }
    }

    /// Returns an iterator over mutable references to all values, in
    /// unspecified order.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            inner: self.nodes.iter_mut(),
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// The table is empty as soon as this is called; capacity is kept.
    pub fn drain(&mut self) -> Drain<'_, V> {
        self.heads.fill(None);
        Drain {
            inner: self.nodes.drain(..),
        }
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.heads.len()
    }

    /// Returns the configured load-factor threshold.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Removes all elements from the table, keeping its capacity.
    pub fn clear(&mut self) {
        self.heads.fill(None);
        self.nodes.clear();
    }

    /// Maps a hash to its bucket.
    ///
    /// # Errors
    ///
    /// [`Error::InvariantViolation`] if the computed index is outside the
    /// slot array.
    pub fn bucket_index(&self, hash: u64) -> Result<usize> {
        let capacity = self.heads.len();
        debug_assert!(capacity.is_power_of_two());
        let index = hash as usize & capacity.wrapping_sub(1);
        if index >= capacity {
            return Err(Error::InvariantViolation { index, capacity });
        }
        Ok(index)
    }

    /// Returns the length of the chain `hash` falls into, whether or not a
    /// value with that hash is present.
    pub fn chain_len(&self, hash: u64) -> Result<usize> {
        let mut len = 0;
        let mut cursor = self.heads[self.bucket_index(hash)?];
        while let Some(index) = cursor {
            len += 1;
            cursor = self.nodes[index].next;
        }
        Ok(len)
    }

    /// Removes and returns a value from the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&n: &u64| n == 42).unwrap().or_insert(42);
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), Ok(Some(42)));
    /// assert!(table.is_empty());
    ///
    /// // Removing a missing value is not an error.
    /// assert_eq!(table.remove(99, |&n| n == 99), Ok(None));
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Result<Option<V>> {
        let bucket = self.bucket_index(hash)?;
        match self.probe(bucket, hash, eq) {
            Probe::Found { index, prev } => Ok(Some(self.unlink(bucket, index, prev))),
            Probe::Missing { .. } => Ok(None),
        }
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// If the table has reached its load factor, it is grown before the
    /// chain is searched, so a vacant entry always inserts without resizing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::Entry;
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    ///
    /// match table.entry(7, |s: &String| s == "hello").unwrap() {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() = "updated".to_string();
    ///     }
    /// }
    /// assert_eq!(table.find(7, |s| s == "hello"), Ok(Some(&"hello".to_string())));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Result<Entry<'_, V>> {
        self.maybe_resize_rehash();

        let bucket = self.bucket_index(hash)?;
        Ok(match self.probe(bucket, hash, eq) {
            Probe::Found { index, prev } => Entry::Occupied(OccupiedEntry {
                table: self,
                bucket,
                index,
                prev,
            }),
            Probe::Missing { tail } => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                bucket,
                tail,
            }),
        })
    }

    /// Finds a value by hash and equality predicate.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Result<Option<&V>> {
        let bucket = self.bucket_index(hash)?;
        Ok(match self.probe(bucket, hash, eq) {
            Probe::Found { index, .. } => Some(&self.nodes[index].value),
            Probe::Missing { .. } => None,
        })
    }

    /// Finds a value by hash and equality predicate, returning a mutable
    /// reference.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Result<Option<&mut V>> {
        let bucket = self.bucket_index(hash)?;
        Ok(match self.probe(bucket, hash, eq) {
            Probe::Found { index, .. } => Some(&mut self.nodes[index].value),
            Probe::Missing { .. } => None,
        })
    }

    fn probe(&self, bucket: usize, hash: u64, eq: impl Fn(&V) -> bool) -> Probe {
        let mut prev = None;
        let mut cursor = self.heads[bucket];
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            if node.hash == hash && eq(&node.value) {
                return Probe::Found { index, prev };
            }
            prev = Some(index);
            cursor = node.next;
        }
        Probe::Missing { tail: prev }
    }

    /// Unlinks `index` from its chain and compacts the arena by moving the
    /// last node into the freed handle.
    fn unlink(&mut self, bucket: usize, index: usize, prev: Option<usize>) -> V {
        let next = self.nodes[index].next;
        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.heads[bucket] = next,
        }

        let last = self.nodes.len() - 1;
        if index != last {
            self.relink(last, index);
        }
        self.nodes.swap_remove(index).value
    }

    /// Points the single link that references `from` at `to` instead.
    fn relink(&mut self, from: usize, to: usize) {
        let bucket = self.nodes[from].hash as usize & (self.heads.len() - 1);
        if self.heads[bucket] == Some(from) {
            self.heads[bucket] = Some(to);
            return;
        }

        let mut cursor = self.heads[bucket];
        while let Some(index) = cursor {
            if self.nodes[index].next == Some(from) {
                self.nodes[index].next = Some(to);
                return;
            }
            cursor = self.nodes[index].next;
        }
        unreachable!("node {from} is not linked from bucket {bucket}");
    }

    fn maybe_resize_rehash(&mut self) {
        if self.nodes.len() as f64 >= self.heads.len() as f64 * self.load_factor {
            self.resize_rehash();
        }
    }

    /// Doubles the bucket count and relinks every node into a fresh slot
    /// array, which replaces the old one once complete. Nodes are prepended,
    /// so intra-bucket order reverses.
    fn resize_rehash(&mut self) {
        let old_capacity = self.heads.len();
        let Some(new_capacity) = old_capacity.checked_mul(2) else {
            log::warn!("hash table cannot grow past {old_capacity} buckets");
            return;
        };
        log::debug!(
            "growing hash table from {old_capacity} to {new_capacity} buckets ({} entries)",
            self.nodes.len()
        );

        let mask = new_capacity - 1;
        let mut heads = vec![None; new_capacity];
        for bucket in 0..old_capacity {
            let mut cursor = self.heads[bucket];
            while let Some(index) = cursor {
                let node = &mut self.nodes[index];
                cursor = node.next;
                let target = node.hash as usize & mask;
                node.next = heads[target];
                heads[target] = Some(index);
            }
        }
        self.heads = heads;
    }

    /// Computes the distribution of chain lengths across all buckets.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> ChainHistogram {
        let mut bins = vec![0usize; 1];
        for head in &self.heads {
            let mut len = 0;
            let mut cursor = *head;
            while let Some(index) = cursor {
                len += 1;
                cursor = self.nodes[index].next;
            }
            if len >= bins.len() {
                bins.resize(len + 1, 0);
            }
            bins[len] += 1;
        }
        ChainHistogram { bins }
    }

    /// Returns detailed utilization statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.chain_histogram();
        let capacity = self.heads.len();
        let occupied_buckets = capacity - histogram.bins[0];
        let node_size = core::mem::size_of::<Node<V>>();

        DebugStats {
            populated: self.nodes.len(),
            capacity,
            occupied_buckets,
            longest_chain: histogram.bins.len() - 1,
            load: self.nodes.len() as f64 / capacity as f64,
            load_factor: self.load_factor,
            bucket_utilization: occupied_buckets as f64 / capacity as f64,
            total_bytes: capacity * core::mem::size_of::<Option<usize>>()
                + self.nodes.capacity() * node_size,
            wasted_bytes: (self.nodes.capacity() - self.nodes.len()) * node_size,
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - no value in the chain matched
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a value in the chain matched
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant entry in a [`HashTable`].
///
/// Inserting appends to the tail of the bucket's chain.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    bucket: usize,
    tail: Option<usize>,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts a value into the table and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        let index = table.nodes.len();
        table.nodes.push(Node {
            hash: self.hash,
            value,
            next: None,
        });
        match self.tail {
            Some(tail) => table.nodes[tail].next = Some(index),
            None => table.heads[self.bucket] = Some(index),
        }
        &mut table.nodes[index].value
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    bucket: usize,
    index: usize,
    prev: Option<usize>,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.table.nodes[self.index].value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.nodes[self.index].value
    }

    /// Converts the entry into a mutable reference to the value, bound to the
    /// table's lifetime.
    pub fn into_mut(self) -> &'a mut V {
        let table = self.table;
        &mut table.nodes[self.index].value
    }

    /// Removes the value from the table and returns it.
    pub fn remove(self) -> V {
        self.table.unlink(self.bucket, self.index, self.prev)
    }
}

/// An iterator over the values in a [`HashTable`], in bucket-then-chain
/// order.
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    table: &'a HashTable<V>,
    bucket: usize,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(index) = self.cursor {
                let node = &self.table.nodes[index];
                self.cursor = node.next;
                self.remaining -= 1;
                return Some(&node.value);
            }
            if self.remaining == 0 || self.bucket >= self.table.heads.len() {
                return None;
            }
            self.cursor = self.table.heads[self.bucket];
            self.bucket += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// An iterator over mutable references to the values in a [`HashTable`].
pub struct IterMut<'a, V> {
    inner: core::slice::IterMut<'a, Node<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| &mut node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    inner: alloc::vec::Drain<'a, Node<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
