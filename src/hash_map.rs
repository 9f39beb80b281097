use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::DefaultHashBuilder;
use crate::hash_table::ConcurrentModification;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A hash map built on the treeifying [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq`, using a configurable hasher builder `S`. Buckets hold
/// colliding pairs in a short linked chain; a bucket that accumulates enough
/// collisions is promoted to a red-black tree, so lookups stay O(log n) in
/// the worst case instead of degrading linearly. Value-only updates never
/// move or rebuild an entry.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "foldhash")]
/// # {
/// use treebin::HashMap;
///
/// let mut map = HashMap::new();
/// map.insert("a", 1);
/// map.insert("b", 2);
/// assert_eq!(map.get(&"a"), Some(&1));
/// # }
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug + Hash + Eq,
    V: Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash map with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates a new hash map holding at least `capacity` pairs before
    /// growing, with the given hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns the number of pairs in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no pairs.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of pairs the map can hold before growing.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all pairs, keeping the allocated buckets.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Ensures space for at least `additional` more pairs.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Inserts a key-value pair, returning the previous value if the key was
    /// present.
    ///
    /// Inserting over an existing key is a value-only update: the stored key
    /// and the entry's position are untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use treebin::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// # }
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                let old = core::mem::replace(&mut entry.get_mut().1, value);
                Some(old)
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    /// Returns a reference to the value for `key`, if present.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for `key`, if present.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let hash = self.hash_builder.hash_one(key);
        match self.table.find(hash, |(k, _)| k == key) {
            Some((k, v)) => Some((k, v)),
            None => None,
        }
    }

    /// Returns a mutable reference to the value for `key`, if present.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        match self.table.find_mut(hash, |(k, _)| k == key) {
            Some((_, v)) => Some(v),
            None => None,
        }
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key` from the map, returning its value if it was present.
    /// Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` from the map, returning the stored key and value if the
    /// key was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Inserts `value` only if `key` is absent.
    ///
    /// On success returns a mutable reference to the inserted value. If the
    /// key is already present, nothing changes and the error carries both
    /// the occupied entry and the rejected value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use treebin::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert!(map.try_insert(1, "a").is_ok());
    /// let err = map.try_insert(1, "b").unwrap_err();
    /// assert_eq!(err.value, "b");
    /// assert_eq!(err.entry.get(), &"a");
    /// # }
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<&mut V, OccupiedError<'_, K, V>> {
        match self.entry(key) {
            Entry::Occupied(entry) => Err(OccupiedError { entry, value }),
            Entry::Vacant(entry) => Ok(entry.insert(value)),
        }
    }

    /// Replaces the value for `key` only if the key is present.
    ///
    /// Returns the previous value, or hands `value` back untouched if the
    /// key is absent. Never inserts; never changes the stored key.
    pub fn replace(&mut self, key: &K, value: V) -> Result<V, V> {
        let hash = self.hash_builder.hash_one(key);
        match self.table.find_mut(hash, |(k, _)| k == key) {
            Some(pair) => Ok(core::mem::replace(&mut pair.1, value)),
            None => Err(value),
        }
    }

    /// Replaces the value for `key` only if the key is present and the
    /// current value satisfies `pred`.
    ///
    /// Returns the previous value on success; hands `value` back otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use treebin::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert("slot", 3);
    /// assert_eq!(map.replace_if(&"slot", |v| *v == 3, 4), Ok(3));
    /// assert_eq!(map.replace_if(&"slot", |v| *v == 3, 5), Err(5));
    /// assert_eq!(map.get(&"slot"), Some(&4));
    /// # }
    /// ```
    pub fn replace_if<F>(&mut self, key: &K, pred: F, value: V) -> Result<V, V>
    where
        F: FnOnce(&V) -> bool,
    {
        let hash = self.hash_builder.hash_one(key);
        if let Some(pair) = self.table.find_mut(hash, |(k, _)| k == key) {
            if pred(&pair.1) {
                return Ok(core::mem::replace(&mut pair.1, value));
            }
        }
        Err(value)
    }

    /// Returns the value for `key`, inserting one computed by `f` first if
    /// the key is absent. `f` runs at most once, and not at all when the key
    /// is present.
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce(&K) -> V,
    {
        match self.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let value = f(entry.key());
                entry.insert(value)
            }
        }
    }

    /// Re-maps the value for `key` if the key is present: `f` receives the
    /// stored key and the owned value, and decides between a replacement
    /// (`Some`) and removal (`None`).
    ///
    /// Returns the surviving value. Absence short-circuits without calling
    /// `f`.
    pub fn compute_if_present<F>(&mut self, key: &K, f: F) -> Option<&mut V>
    where
        F: FnOnce(&K, V) -> Option<V>,
    {
        let hash = self.hash_builder.hash_one(key);
        match self.table.entry(hash, |(k, _)| k == key) {
            TableEntry::Occupied(entry) => {
                let (stored_key, value) = entry.remove();
                match f(&stored_key, value) {
                    Some(new) => {
                        let slot = self.table.entry(hash, |(k, _)| k == &stored_key);
                        Some(&mut slot.or_insert((stored_key, new)).1)
                    }
                    None => None,
                }
            }
            TableEntry::Vacant(_) => None,
        }
    }

    /// Re-maps the value for `key` whether or not it is present: `f`
    /// receives the key and `Some(value)` or `None`, and decides between
    /// storing a value (`Some`) and leaving the key absent (`None`).
    ///
    /// `f` runs exactly once. Returns the surviving value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use treebin::HashMap;
    ///
    /// let mut map: HashMap<&str, u32> = HashMap::new();
    /// map.compute("counter", |_, v| Some(v.unwrap_or(0) + 1));
    /// map.compute("counter", |_, v| Some(v.unwrap_or(0) + 1));
    /// assert_eq!(map.get(&"counter"), Some(&2));
    /// map.compute("counter", |_, _| None);
    /// assert!(!map.contains_key(&"counter"));
    /// # }
    /// ```
    pub fn compute<F>(&mut self, key: K, f: F) -> Option<&mut V>
    where
        F: FnOnce(&K, Option<V>) -> Option<V>,
    {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.remove(hash, |(k, _)| k == &key) {
            Some((stored_key, value)) => match f(&stored_key, Some(value)) {
                Some(new) => {
                    let slot = self.table.entry(hash, |(k, _)| k == &stored_key);
                    Some(&mut slot.or_insert((stored_key, new)).1)
                }
                None => None,
            },
            None => match f(&key, None) {
                Some(new) => {
                    let slot = self.table.entry(hash, |(k, _)| k == &key);
                    Some(&mut slot.or_insert((key, new)).1)
                }
                None => None,
            },
        }
    }

    /// Inserts `value` if `key` is absent; otherwise combines the stored
    /// value with `value` through `f`, which decides between a replacement
    /// (`Some`) and removal (`None`). `f` is not called on absence.
    ///
    /// Returns the surviving value.
    pub fn merge<F>(&mut self, key: K, value: V, f: F) -> Option<&mut V>
    where
        F: FnOnce(V, V) -> Option<V>,
    {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.remove(hash, |(k, _)| k == &key) {
            Some((stored_key, old)) => match f(old, value) {
                Some(new) => {
                    let slot = self.table.entry(hash, |(k, _)| k == &stored_key);
                    Some(&mut slot.or_insert((stored_key, new)).1)
                }
                None => None,
            },
            None => {
                let slot = self.table.entry(hash, |(k, _)| k == &key);
                Some(&mut slot.or_insert((key, value)).1)
            }
        }
    }

    /// Gets the given key's entry for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use treebin::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.entry("poneyland").or_insert(3);
    /// *map.entry("poneyland").or_insert(10) *= 2;
    /// assert_eq!(map.get(&"poneyland"), Some(&6));
    /// # }
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Returns an iterator over `(&K, &V)` pairs in an arbitrary order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over `(&K, &mut V)` pairs in an arbitrary order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values of the map.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Removes all pairs, yielding each one. The map is empty as soon as
    /// `drain` returns.
    pub fn drain(&mut self) -> Drain<K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Retains only the pairs for which `f` returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.table.retain(|(k, v)| f(k, v));
    }

    /// Creates a detached fail-fast cursor over the map.
    ///
    /// The cursor holds no borrow; the map is passed back in on every step.
    /// A structural modification made outside the cursor (insert, remove,
    /// clear — but not value overwrites) makes the next cursor operation
    /// report [`ConcurrentModification`]. Removing the current pair through
    /// the cursor is allowed and re-synchronizes it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use treebin::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "one");
    ///
    /// let mut cursor = map.cursor();
    /// assert_eq!(cursor.next(&map), Ok(Some((&1, &"one"))));
    ///
    /// map.insert(2, "two");
    /// assert!(cursor.next(&map).is_err());
    /// # }
    /// ```
    pub fn cursor(&self) -> Cursor {
        Cursor {
            raw: self.table.cursor(),
        }
    }
}

#[cfg(feature = "foldhash")]
impl<K, V> HashMap<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    /// Creates a new hash map using the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash map holding at least `capacity` pairs before
    /// growing, using the default hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
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
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

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
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a
    /// mutable reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
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

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Replaces the value, returning the old one. The stored key and the
    /// entry's position are untouched.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// Error returned by [`HashMap::try_insert`] when the key was already
/// present.
pub struct OccupiedError<'a, K, V> {
    /// The entry for the key that was already in the map.
    pub entry: OccupiedEntry<'a, K, V>,
    /// The value that was not inserted.
    pub value: V,
}

impl<K: Debug, V: Debug> Debug for OccupiedError<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OccupiedError")
            .field("key", self.entry.key())
            .field("old_value", self.entry.get())
            .field("new_value", &self.value)
            .finish()
    }
}

impl<K: Debug, V: Debug> core::fmt::Display for OccupiedError<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "failed to insert {:?}, key {:?} already holds {:?}",
            self.value,
            self.entry.key(),
            self.entry.get()
        )
    }
}

impl<K: Debug, V: Debug> core::error::Error for OccupiedError<'_, K, V> {}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }
}

/// A mutable iterator over the key-value pairs of a `HashMap`.
pub struct IterMut<'a, K, V> {
    inner: crate::hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next() {
            Some((k, v)) => Some((k, v)),
            None => None,
        }
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

/// An iterator over mutable references to the values of a `HashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// An owning iterator over pairs removed by [`HashMap::drain`].
pub struct Drain<K, V> {
    inner: crate::hash_table::Drain<(K, V)>,
}

impl<K, V> Iterator for Drain<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// A detached, fail-fast iteration handle over a [`HashMap`].
///
/// See [`HashMap::cursor`].
#[derive(Debug, Clone)]
pub struct Cursor {
    raw: crate::hash_table::Cursor,
}

impl Cursor {
    /// Advances to the next pair.
    ///
    /// Returns `Ok(None)` at the end of the traversal, or
    /// `Err(ConcurrentModification)` if the map was structurally modified
    /// outside this cursor.
    pub fn next<'a, K, V, S>(
        &mut self,
        map: &'a HashMap<K, V, S>,
    ) -> Result<Option<(&'a K, &'a V)>, ConcurrentModification> {
        match self.raw.next(&map.table)? {
            Some((k, v)) => Ok(Some((k, v))),
            None => Ok(None),
        }
    }

    /// Removes the pair most recently yielded by [`next`](Self::next) and
    /// re-synchronizes the cursor.
    pub fn remove<K, V, S>(
        &mut self,
        map: &mut HashMap<K, V, S>,
    ) -> Result<Option<(K, V)>, ConcurrentModification> {
        self.raw.remove_current(&mut map.table)
    }
}
