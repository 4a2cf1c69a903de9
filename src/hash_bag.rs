use core::fmt::Debug;
use core::fmt::Display;
use core::hash::BuildHasher;
use core::hash::Hash;

use alloc::string::String;
use alloc::string::ToString;

use crate::hash_table::CapacityError;
#[cfg(feature = "stats")]
use crate::hash_table::ChainHistogram;
#[cfg(feature = "stats")]
use crate::hash_table::DebugStats;
use crate::hash_table::Diagnostics;
use crate::hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(any(feature = "foldhash", feature = "std"))] {
        use crate::DefaultHashBuilder;

        /// An unordered bag of values stored in a chained [`HashTable`].
        ///
        /// `HashBag<T, S>` hashes each value with the hasher builder `S` and
        /// keeps it in the chain of slot `hash % capacity`. Adding a value
        /// that is already present stores a second copy, so the bag behaves
        /// as a multiset. Values cannot be removed.
        ///
        /// # Performance Characteristics
        ///
        /// - **Memory**: one pointer per slot, plus one boxed node per entry
        ///   holding the value, its hash and the next link.
        /// - **Lookup**: proportional to the length of one chain.
        #[derive(Clone)]
        pub struct HashBag<T, S = DefaultHashBuilder> {
            table: HashTable<T>,
            hash_builder: S,
        }
    } else {
        /// An unordered bag of values stored in a chained [`HashTable`].
        ///
        /// `HashBag<T, S>` hashes each value with the hasher builder `S` and
        /// keeps it in the chain of slot `hash % capacity`. Adding a value
        /// that is already present stores a second copy, so the bag behaves
        /// as a multiset. Values cannot be removed.
        #[derive(Clone)]
        pub struct HashBag<T, S> {
            table: HashTable<T>,
            hash_builder: S,
        }
    }
}

impl<T, S> Debug for HashBag<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.table.iter()).finish()
    }
}

impl<T, S> HashBag<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new bag with the default capacity and the given hasher
    /// builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use chain_hash::HashBag;
    ///
    /// let bag: HashBag<i32, _> = HashBag::with_hasher(RandomState::new());
    /// assert!(bag.is_empty());
    /// assert_eq!(bag.capacity(), 4);
    /// # }
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates a new bag with `capacity` slots and the given hasher builder.
    ///
    /// A capacity of zero falls back to the default of 4 slots.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Fallible version of
    /// [`with_capacity_and_hasher`](Self::with_capacity_and_hasher).
    pub fn try_with_capacity_and_hasher(
        capacity: usize,
        hash_builder: S,
    ) -> Result<Self, CapacityError> {
        Ok(Self {
            table: HashTable::try_with_capacity(capacity)?,
            hash_builder,
        })
    }

    /// Returns the number of values in the bag, counting duplicates.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the bag contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of slots holding at least one value.
    pub fn occupied_slots(&self) -> usize {
        self.table.occupied_slots()
    }

    /// Returns the ratio of occupied slots to capacity.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns a reference to the bag's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Adds a value to the bag.
    ///
    /// Duplicates are stored as separate entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::HashBag;
    ///
    /// let mut bag: HashBag<i32> = HashBag::new();
    /// bag.add(37);
    /// bag.add(37);
    /// assert_eq!(bag.len(), 2);
    /// assert_eq!(bag.count(&37), 2);
    /// # }
    /// ```
    pub fn add(&mut self, value: T) {
        let hash = self.hash_builder.hash_one(&value);
        self.table.insert(hash, value);
    }

    /// Fallible version of [`add`](Self::add).
    ///
    /// If the growth triggered by this value cannot be performed the value is
    /// dropped and the bag is left untouched.
    pub fn try_add(&mut self, value: T) -> Result<(), CapacityError> {
        let hash = self.hash_builder.hash_one(&value);
        self.table.try_insert(hash, value)
    }

    /// Returns `true` if the bag holds a value equal to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::HashBag;
    ///
    /// let mut bag: HashBag<String> = HashBag::new();
    /// bag.add("one".to_string());
    /// assert!(bag.contains(&"one".to_string()));
    /// assert!(!bag.contains(&"two".to_string()));
    /// # }
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the most recently added value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| v == value)
    }

    /// Returns how many copies of `value` the bag holds.
    pub fn count(&self, value: &T) -> usize {
        let hash = self.hash_builder.hash_one(value);
        self.table.count(hash, |v| v == value)
    }

    /// Doubles the number of slots and redistributes every value.
    pub fn resize(&mut self) {
        self.table.resize();
    }

    /// Multiplies the number of slots by `growth_factor` and redistributes
    /// every value.
    ///
    /// # Panics
    ///
    /// Panics if `growth_factor` is zero or the new capacity overflows
    /// `usize`.
    pub fn resize_by(&mut self, growth_factor: usize) {
        self.table.resize_by(growth_factor);
    }

    /// Fallible version of [`resize_by`](Self::resize_by).
    pub fn try_resize_by(&mut self, growth_factor: usize) -> Result<(), CapacityError> {
        self.table.try_resize_by(growth_factor)
    }

    /// Returns an iterator over the values of the bag, in no particular order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns the values stored in slot `slot`, most recently added first.
    pub fn chain(&self, slot: usize) -> crate::hash_table::Chain<'_, T> {
        self.table.chain(slot)
    }

    /// Returns a [`Display`] adapter rendering the slot layout.
    pub fn diagnostics(&self) -> Diagnostics<'_, T>
    where
        T: Display,
    {
        self.table.diagnostics()
    }

    /// Renders the slot layout into a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::HashBag;
    ///
    /// let bag: HashBag<u32> = HashBag::with_capacity(2);
    /// assert_eq!(
    ///     bag.to_diagnostic_string(),
    ///     "Underlying array usage / length: 0/2\n\
    ///      Total number of nodes: 0\n\
    ///      [  0 ]: null\n\
    ///      [  1 ]: null"
    /// );
    /// # }
    /// ```
    pub fn to_diagnostic_string(&self) -> String
    where
        T: Display,
    {
        self.diagnostics().to_string()
    }

    /// Returns summary statistics about chain distribution.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> DebugStats {
        self.table.debug_stats()
    }

    /// Computes how many slots hold chains of each length.
    #[cfg(feature = "stats")]
    pub fn chain_histogram(&self) -> ChainHistogram {
        self.table.chain_histogram()
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<T> HashBag<T, DefaultHashBuilder>
where
    T: Hash + Eq,
{
    /// Creates a new bag with 4 slots using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use chain_hash::HashBag;
    ///
    /// let bag: HashBag<i32> = HashBag::new();
    /// assert!(bag.is_empty());
    /// assert_eq!(bag.capacity(), 4);
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates a new bag with `capacity` slots using the default hasher
    /// builder.
    ///
    /// A capacity of zero falls back to 4 slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<T, S> Default for HashBag<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// An iterator over the values of a `HashBag`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T, S> IntoIterator for &'a HashBag<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> FromIterator<T> for HashBag<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut bag = Self::default();
        bag.extend(iter);
        bag
    }
}

impl<T, S> Extend<T> for HashBag<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}
