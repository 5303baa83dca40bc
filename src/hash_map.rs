use core::borrow::Borrow;
use core::fmt::Debug;
use core::fmt::Display;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::argument;
use crate::argument::Argument;
use crate::config::Config;
use crate::error::Result;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Placeholder for the default hasher builder when neither `foldhash`
        /// nor `std` is enabled. It cannot be constructed, so maps must be
        /// built with one of the `*_hasher` constructors.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}

/// A hash map using separate chaining, backed by a [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq + Argument` and uses a configurable hasher builder `S` to hash
/// keys. The bucket for a key is `hash(key) & (capacity - 1)`. Capacity
/// starts at 16 buckets by default and doubles whenever an insert finds
/// `len / capacity >= 0.75`; it never shrinks.
///
/// Keyed operations are checked: a key that is absent (`None` for an
/// `Option` key type) or the empty string, or a value that is the empty
/// string, is rejected with [`Error::InvalidArgument`] before the map is
/// touched. See [`Argument`].
///
/// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

/// Renders `{[k1=v1], [k2=v2]}` in bucket-then-chain order.
///
/// Intended for diagnostics; the order changes when the map resizes.
impl<K, V, S> Display for HashMap<K, V, S>
where
    K: Display,
    V: Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "[{k}={v}]")?;
        }
        f.write_str("}")
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Creates an empty map with the default [`Config`] and the given hasher
    /// builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates an empty map with `capacity` buckets (rounded up to a power of
    /// two) and the given hasher builder.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// `capacity` is zero.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self> {
        Self::with_config_and_hasher(
            Config::default().with_initial_capacity(capacity),
            hash_builder,
        )
    }

    /// Creates an empty map from a [`Config`] and the given hasher builder.
    ///
    /// # Errors
    ///
    /// Whatever [`Config::validate`] rejects.
    pub fn with_config_and_hasher(config: Config, hash_builder: S) -> Result<Self> {
        Ok(Self {
            table: HashTable::with_config(config)?,
            hash_builder,
        })
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns the number of entries in the map. Same as [`len`](Self::len).
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets. Always a power of two, never
    /// decreasing.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the `len / capacity` ratio at which the map grows.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all entries, keeping the allocated buckets.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// An iterator visiting all key-value pairs in bucket-then-chain order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// An iterator visiting all keys in bucket-then-chain order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// An iterator visiting all values in bucket-then-chain order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Clears the map, returning all key-value pairs as an iterator.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq + Argument,
    S: BuildHasher,
{
    /// Inserts a key-value pair, overwriting the value of an existing key.
    ///
    /// Grows the map first if it has reached its load factor.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the key
    /// is absent or empty, or if the value is empty. The map is left
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::Error;
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.put(2, "Hello, world!").unwrap();
    /// map.put(2, "Hello, wor").unwrap();
    /// assert_eq!(map.get(&2), Ok(Some(&"Hello, wor")));
    /// assert_eq!(map.size(), 1);
    ///
    /// assert_eq!(
    ///     map.put(3, ""),
    ///     Err(Error::InvalidArgument("value cannot be empty"))
    /// );
    /// # }
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Result<()>
    where
        V: Argument,
    {
        self.insert(key, value).map(drop)
    }

    /// Inserts a key-value pair, returning the value it replaced.
    ///
    /// # Errors
    ///
    /// As for [`put`](Self::put).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// assert_eq!(map.insert(37, "a"), Ok(None));
    /// assert_eq!(map.insert(37, "b"), Ok(Some("a")));
    /// assert_eq!(map.get(&37), Ok(Some(&"b")));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>>
    where
        V: Argument,
    {
        argument::check_key(&key)?;
        argument::check_value(&value)?;

        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key)? {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Ok(Some(old_value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                Ok(None)
            }
        }
    }

    /// Inserts every pair from `iter`, stopping at the first rejected pair.
    ///
    /// Pairs before the rejected one stay inserted.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        V: Argument,
    {
        for (key, value) in iter {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Returns a reference to the value for `key`, or `Ok(None)` if it is
    /// missing.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the key
    /// is absent or empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::Error;
    /// use chain_hash::HashMap;
    ///
    /// let mut map: HashMap<Option<String>, i32> = HashMap::new();
    /// map.put(Some("one".to_string()), 1).unwrap();
    ///
    /// assert_eq!(map.get(&Some("one".to_string())), Ok(Some(&1)));
    /// assert_eq!(map.get(&Some("two".to_string())), Ok(None));
    /// assert_eq!(
    ///     map.get(&None),
    ///     Err(Error::InvalidArgument("key cannot be null"))
    /// );
    /// # }
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Argument + ?Sized,
    {
        Ok(self.get_key_value(key)?.map(|(_, v)| v))
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Result<Option<(&K, &V)>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Argument + ?Sized,
    {
        argument::check_key(key)?;
        let hash = self.hash_builder.hash_one(key);
        Ok(self
            .table
            .find(hash, |(k, _)| k.borrow() == key)?
            .map(|(k, v)| (k, v)))
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Argument + ?Sized,
    {
        Ok(self.get_key_value(key)?.is_some())
    }

    /// Removes `key` from the map, returning its value. Removing a missing
    /// key is a no-op that returns `Ok(None)`.
    ///
    /// The map never shrinks on removal.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the key
    /// is absent or empty.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Argument + ?Sized,
    {
        Ok(self.remove_entry(key)?.map(|(_, v)| v))
    }

    /// Removes `key` from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Result<Option<(K, V)>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Argument + ?Sized,
    {
        argument::check_key(key)?;
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k.borrow() == key)
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// Like [`put`](Self::put), this grows the map first if it has reached
    /// its load factor, even when the key turns out to be present and
    /// nothing is inserted. Only the key is checked here; values written
    /// through the returned entry are checked when they are stored.
    pub fn entry(&mut self, key: K) -> Result<Entry<'_, K, V>> {
        argument::check_key(&key)?;

        let hash = self.hash_builder.hash_one(&key);
        Ok(match self.table.entry(hash, |(k, _)| k == &key)? {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        })
    }

    /// Returns the bucket `key` maps to: `hash(key) & (capacity - 1)`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) for an
    /// absent or empty key, [`Error::InvariantViolation`] if the index is out
    /// of bounds.
    ///
    /// [`Error::InvariantViolation`]: crate::Error::InvariantViolation
    pub fn index<Q>(&self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Argument + ?Sized,
    {
        argument::check_key(key)?;
        self.table.bucket_index(self.hash_builder.hash_one(key))
    }

    /// Returns the length of the chain in the bucket `key` maps to, whether
    /// or not `key` itself is present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.chain_len(&1), Ok(0));
    /// map.put(1, 'a').unwrap();
    /// assert_eq!(map.chain_len(&1), Ok(1));
    /// # }
    /// ```
    pub fn chain_len<Q>(&self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Argument + ?Sized,
    {
        argument::check_key(key)?;
        self.table.chain_len(self.hash_builder.hash_one(key))
    }

    /// Computes the distribution of chain lengths across all buckets.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> crate::hash_table::ChainHistogram {
        self.table.chain_histogram()
    }

    /// Returns detailed utilization statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> HashMap<K, V, DefaultHashBuilder> {
    /// Creates an empty map with 16 buckets, a 0.75 load factor and the
    /// default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty map with `capacity` buckets, rounded up to a power of
    /// two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::with_capacity(100).unwrap();
    /// assert_eq!(map.capacity(), 128);
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }

    /// Creates an empty map from a [`Config`].
    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Argument,
{
    /// Inserts `default` if the entry is vacant and returns a reference to
    /// the value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the entry
    /// is vacant and `default` is empty. Nothing is inserted.
    pub fn or_insert(self, default: V) -> Result<&'a V> {
        match self {
            Entry::Occupied(entry) => Ok(entry.into_ref()),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the value computed by `default` if the entry is vacant and
    /// returns a reference to the value.
    ///
    /// # Errors
    ///
    /// As for [`or_insert`](Self::or_insert).
    pub fn or_insert_with<F>(self, default: F) -> Result<&'a V>
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => Ok(entry.into_ref()),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Appends the pair to the key's chain and returns a reference to the
    /// value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if `value`
    /// is empty. The entry is consumed and the map is left unchanged.
    pub fn insert(self, value: V) -> Result<&'a V>
    where
        V: Argument,
    {
        argument::check_value(&value)?;
        Ok(&self.entry.insert((self.key, value)).1)
    }
}

/// A view into an occupied entry in the map.
///
/// Values are only replaced through [`insert`](Self::insert), which applies
/// the same checks as [`HashMap::put`].
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    fn into_ref(self) -> &'a V {
        &self.entry.into_mut().1
    }

    /// Replaces the value in place and returns the old one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`](crate::Error::InvalidArgument) if `value`
    /// is empty. The stored value is kept.
    pub fn insert(&mut self, value: V) -> Result<V>
    where
        V: Argument,
    {
        argument::check_value(&value)?;
        Ok(core::mem::replace(&mut self.entry.get_mut().1, value))
    }

    /// Unlinks the entry from its chain and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Unlinks the entry from its chain and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Drain<'a, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
