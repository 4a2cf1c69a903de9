//! The raw separate-chaining table.
//!
//! [`HashTable`] stores values in a fixed-length array of slots, each slot
//! holding the head of a singly linked chain. Callers supply the 64-bit hash of
//! every value, and an equality predicate for lookups, the same way a raw
//! table in `hashbrown` is driven. Every entry remembers the hash it was
//! inserted with, so growing the table never needs to re-run a hasher.

use alloc::boxed::Box;
use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::fmt::Display;

/// Capacity used when a table is requested with zero slots.
pub const DEFAULT_CAPACITY: usize = 4;

/// Factor by which [`HashTable::resize`] multiplies the slot count.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Ratio of occupied slots to capacity above which an insertion first grows
/// the table.
pub const LOAD_FACTOR_THRESHOLD: f64 = 0.75;

#[cfg_attr(all(not(test), feature = "truncating-load-check"), allow(dead_code))]
#[inline(always)]
fn fits_float_load_factor(occupied: usize, capacity: usize) -> bool {
    occupied.saturating_add(1) as f64 / capacity as f64 <= LOAD_FACTOR_THRESHOLD
}

/// Integer quotient: stays 0 until `occupied + 1` reaches `capacity`, so the
/// table only grows once it is one slot away from full.
#[cfg_attr(not(any(test, feature = "truncating-load-check")), allow(dead_code))]
#[inline(always)]
fn fits_truncating_load_factor(occupied: usize, capacity: usize) -> bool {
    (occupied.saturating_add(1) / capacity) as f64 <= LOAD_FACTOR_THRESHOLD
}

cfg_if::cfg_if! {
    if #[cfg(feature = "truncating-load-check")] {
        use self::fits_truncating_load_factor as fits_load_factor;
    } else {
        use self::fits_float_load_factor as fits_load_factor;
    }
}

struct Node<V> {
    hash: u64,
    value: V,
    next: Slot<V>,
}

type Slot<V> = Option<Box<Node<V>>>;

fn alloc_slots<V>(capacity: usize) -> Box<[Slot<V>]> {
    core::iter::repeat_with(|| None).take(capacity).collect()
}

fn try_alloc_slots<V>(capacity: usize) -> Result<Box<[Slot<V>]>, TryReserveError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, || None);
    Ok(slots.into_boxed_slice())
}

#[inline]
fn nodes<V>(slot: &Slot<V>) -> impl Iterator<Item = &Node<V>> {
    core::iter::successors(slot.as_deref(), |node| node.next.as_deref())
}

/// Error returned by the fallible growth operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapacityError {
    /// A growth factor of zero was requested.
    ZeroGrowthFactor,
    /// The requested slot count does not fit in a `usize`.
    Overflow,
    /// The allocator could not provide the new slot array.
    AllocFailed(TryReserveError),
}

impl From<TryReserveError> for CapacityError {
    fn from(err: TryReserveError) -> Self {
        CapacityError::AllocFailed(err)
    }
}

impl Display for CapacityError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CapacityError::ZeroGrowthFactor => f.write_str("growth factor must be at least 1"),
            CapacityError::Overflow => f.write_str("capacity overflow"),
            CapacityError::AllocFailed(err) => write!(f, "slot array allocation failed: {err}"),
        }
    }
}

impl core::error::Error for CapacityError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            CapacityError::AllocFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Debug statistics for hash table analysis.
#[cfg(feature = "stats")]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries in the table
    pub populated: usize,
    /// Number of slots
    pub capacity: usize,
    /// Number of slots holding a chain
    pub occupied_slots: usize,
    /// Number of slots without a chain
    pub empty_slots: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Mean chain length over occupied slots
    pub mean_chain_length: f64,
    /// Load factor (occupied_slots / capacity)
    pub load_factor: f64,
    /// Entries per slot (populated / capacity)
    pub entries_per_slot: f64,
}

#[cfg(feature = "stats")]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Slot Usage: {}/{} ({:.2}% load factor)",
            self.occupied_slots,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Population: {} entries ({:.2} per slot)",
            self.populated, self.entries_per_slot
        );
        println!("Empty Slots: {}", self.empty_slots);
        println!(
            "Chains: longest {}, mean {:.2}",
            self.longest_chain, self.mean_chain_length
        );
    }
}

/// Number of slots per chain length.
///
/// Index `n` of [`counts`](ChainHistogram::counts) is the number of slots whose
/// chain holds exactly `n` entries, so index 0 counts the empty slots.
#[cfg(feature = "stats")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHistogram {
    counts: Vec<usize>,
}

#[cfg(feature = "stats")]
impl ChainHistogram {
    /// Slot counts indexed by chain length.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Length of the longest chain.
    pub fn longest(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!("chain histogram ({} slots):", self.counts.iter().sum::<usize>());
        for (len, &count) in self.counts.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", len, "█".repeat(width), count);
        }
    }
}

/// A hash table resolving collisions by separate chaining.
///
/// `HashTable<V>` owns a fixed-length array of slots. A value is placed in
/// slot `hash % capacity`; values landing in the same slot form a chain, with
/// the most recently inserted value at its head. Duplicates are never
/// detected: every insertion creates a new entry.
///
/// The table grows when an insertion would push the ratio of occupied slots to
/// capacity above [`LOAD_FACTOR_THRESHOLD`]. It never shrinks and entries
/// cannot be removed.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use chain_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # fn hash_str(s: &str) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     s.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::new();
/// table.insert(hash_str("alice"), "alice".to_string());
///
/// assert_eq!(
///     table.find(hash_str("alice"), |name| name == "alice"),
///     Some(&"alice".to_string())
/// );
/// assert!(table.find(hash_str("bob"), |name| name == "bob").is_none());
/// ```
pub struct HashTable<V> {
    slots: Box<[Slot<V>]>,
    occupied: usize,
    populated: usize,
    load_factor: f64,
}

impl<V> Debug for HashTable<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct DebugChain<'a, V>(&'a Slot<V>);

        impl<V: Debug> Debug for DebugChain<'_, V> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_list()
                    .entries(nodes(self.0).map(|node| &node.value))
                    .finish()
            }
        }

        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("occupied", &self.occupied)
            .field("capacity", &self.capacity())
            .field(
                "slots",
                &self.slots.iter().map(DebugChain).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<V> Clone for HashTable<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut slots = alloc_slots(self.capacity());
        let mut chain = Vec::new();
        for (dst, src) in slots.iter_mut().zip(self.slots.iter()) {
            chain.extend(nodes(src));
            // Rebuild tail first so prepending restores the original order.
            for node in chain.drain(..).rev() {
                *dst = Some(Box::new(Node {
                    hash: node.hash,
                    value: node.value.clone(),
                    next: dst.take(),
                }));
            }
        }

        Self {
            slots,
            occupied: self.occupied,
            populated: self.populated,
            load_factor: self.load_factor,
        }
    }
}

impl<V> Drop for HashTable<V> {
    fn drop(&mut self) {
        // Unlink iteratively; the default drop recurses once per chain link.
        for slot in self.slots.iter_mut() {
            let mut cursor = slot.take();
            while let Some(mut node) = cursor {
                cursor = node.next.take();
            }
        }
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty table with `capacity` slots.
    ///
    /// A capacity of zero falls back to [`DEFAULT_CAPACITY`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64> = HashTable::with_capacity(16);
    /// assert_eq!(table.capacity(), 16);
    ///
    /// let table: HashTable<u64> = HashTable::with_capacity(0);
    /// assert_eq!(table.capacity(), 4);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_slots(alloc_slots(Self::effective_capacity(capacity)))
    }

    /// Creates an empty table with `capacity` slots, reporting allocation
    /// failure instead of aborting.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Ok(Self::from_slots(try_alloc_slots(Self::effective_capacity(
            capacity,
        ))?))
    }

    fn effective_capacity(capacity: usize) -> usize {
        if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        }
    }

    fn from_slots(slots: Box<[Slot<V>]>) -> Self {
        Self {
            slots,
            occupied: 0,
            populated: 0,
            load_factor: 0.0,
        }
    }

    /// Returns the number of entries, counting duplicates.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of slots holding a non-empty chain.
    pub fn occupied_slots(&self) -> usize {
        self.occupied
    }

    /// Returns the ratio of occupied slots to capacity.
    ///
    /// This is the metric compared against [`LOAD_FACTOR_THRESHOLD`]; it
    /// counts slots, not entries, so long chains do not raise it.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    #[inline(always)]
    fn slot_index(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    fn reload(&mut self) {
        self.load_factor = self.occupied as f64 / self.slots.len() as f64;
    }

    /// Inserts `value` with the given `hash`.
    ///
    /// If one more occupied slot would push the load factor above
    /// [`LOAD_FACTOR_THRESHOLD`], the table first grows by
    /// [`DEFAULT_GROWTH_FACTOR`]. The new entry then becomes the head of the
    /// chain in slot `hash % capacity`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(4);
    /// table.insert(0, "a");
    /// table.insert(4, "b");
    ///
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.occupied_slots(), 1);
    /// assert_eq!(table.chain(0).collect::<Vec<_>>(), vec![&"b", &"a"]);
    /// ```
    pub fn insert(&mut self, hash: u64, value: V) {
        if !fits_load_factor(self.occupied, self.capacity()) {
            self.resize();
        }
        self.link(hash, value);
    }

    /// Fallible version of [`insert`](Self::insert).
    ///
    /// Returns an error, leaving the table untouched, if the growth triggered
    /// by this insertion cannot be performed.
    pub fn try_insert(&mut self, hash: u64, value: V) -> Result<(), CapacityError> {
        if !fits_load_factor(self.occupied, self.capacity()) {
            self.try_resize_by(DEFAULT_GROWTH_FACTOR)?;
        }
        self.link(hash, value);
        Ok(())
    }

    fn link(&mut self, hash: u64, value: V) {
        let index = self.slot_index(hash);
        let slot = &mut self.slots[index];
        if slot.is_none() {
            self.occupied += 1;
        }

        let next = slot.take();
        *slot = Some(Box::new(Node { hash, value, next }));

        self.populated += 1;
        self.reload();
    }

    /// Grows the table by [`DEFAULT_GROWTH_FACTOR`].
    pub fn resize(&mut self) {
        self.resize_by(DEFAULT_GROWTH_FACTOR);
    }

    /// Multiplies the slot count by `growth_factor` and moves every entry to
    /// slot `hash % new_capacity`.
    ///
    /// Entries are relinked, not copied. Each old chain is walked head to tail
    /// and every entry is prepended to its new chain, so entries that stay
    /// together end up in reverse order.
    ///
    /// # Panics
    ///
    /// Panics if `growth_factor` is zero or the new capacity overflows
    /// `usize`.
    pub fn resize_by(&mut self, growth_factor: usize) {
        assert!(growth_factor > 0, "growth factor must be at least 1");
        let new_capacity = self
            .capacity()
            .checked_mul(growth_factor)
            .expect("capacity overflow");
        self.relink(alloc_slots(new_capacity));
    }

    /// Fallible version of [`resize_by`](Self::resize_by).
    ///
    /// On error the table is left untouched.
    pub fn try_resize_by(&mut self, growth_factor: usize) -> Result<(), CapacityError> {
        if growth_factor == 0 {
            return Err(CapacityError::ZeroGrowthFactor);
        }
        let new_capacity = self
            .capacity()
            .checked_mul(growth_factor)
            .ok_or(CapacityError::Overflow)?;
        self.relink(try_alloc_slots(new_capacity)?);
        Ok(())
    }

    fn relink(&mut self, mut slots: Box<[Slot<V>]>) {
        let capacity = slots.len() as u64;
        for slot in self.slots.iter_mut() {
            let mut cursor = slot.take();
            while let Some(mut node) = cursor {
                cursor = node.next.take();
                let index = (node.hash % capacity) as usize;
                node.next = slots[index].take();
                slots[index] = Some(node);
            }
        }

        self.slots = slots;
        self.occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        self.reload();
    }

    /// Returns the head-most entry in the chain for `hash` satisfying `eq`.
    ///
    /// Only the chain in slot `hash % capacity` is walked.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        self.chain(self.slot_index(hash)).find(|v| eq(*v))
    }

    /// Returns the number of entries in the chain for `hash` satisfying `eq`.
    pub fn count(&self, hash: u64, eq: impl Fn(&V) -> bool) -> usize {
        self.chain(self.slot_index(hash)).filter(|v| eq(*v)).count()
    }

    /// Returns the entries of slot `slot`, head to tail.
    ///
    /// An empty or out-of-range slot yields an empty chain.
    pub fn chain(&self, slot: usize) -> Chain<'_, V> {
        Chain {
            cursor: self.slots.get(slot).and_then(|slot| slot.as_deref()),
        }
    }

    /// Returns an iterator over every entry.
    ///
    /// Slots are visited in index order and each chain head to tail. The order
    /// changes whenever the table grows.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            chain: Chain { cursor: None },
            remaining: self.populated,
        }
    }

    /// Returns a [`Display`] adapter rendering the table layout.
    ///
    /// The report starts with the occupied/capacity and entry counts,
    /// followed by one line per slot holding either `null` or the chain
    /// rendered as `a --> b --> `.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(2);
    /// table.insert(1, 'x');
    ///
    /// assert_eq!(
    ///     table.diagnostics().to_string(),
    ///     "Underlying array usage / length: 1/2\n\
    ///      Total number of nodes: 1\n\
    ///      [  0 ]: null\n\
    ///      [  1 ]: x --> "
    /// );
    /// ```
    pub fn diagnostics(&self) -> Diagnostics<'_, V>
    where
        V: Display,
    {
        Diagnostics { table: self }
    }

    /// Returns summary statistics about chain distribution.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> DebugStats {
        let mut longest_chain = 0;
        for slot in self.slots.iter() {
            longest_chain = longest_chain.max(nodes(slot).count());
        }

        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            occupied_slots: self.occupied,
            empty_slots: self.capacity() - self.occupied,
            longest_chain,
            mean_chain_length: if self.occupied == 0 {
                0.0
            } else {
                self.populated as f64 / self.occupied as f64
            },
            load_factor: self.load_factor,
            entries_per_slot: self.populated as f64 / self.capacity() as f64,
        }
    }

    /// Computes how many slots hold chains of each length.
    #[cfg(feature = "stats")]
    pub fn chain_histogram(&self) -> ChainHistogram {
        let mut counts = alloc::vec![0usize];
        for slot in self.slots.iter() {
            let len = nodes(slot).count();
            if counts.len() <= len {
                counts.resize(len + 1, 0);
            }
            counts[len] += 1;
        }
        ChainHistogram { counts }
    }

    /// Checks every structural invariant, panicking on the first violation.
    #[cfg(test)]
    pub(crate) fn validate(&self) {
        let capacity = self.slots.len() as u64;
        let mut occupied = 0;
        let mut populated = 0;
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.is_some() {
                occupied += 1;
            }
            for node in nodes(slot) {
                assert_eq!((node.hash % capacity) as usize, index);
                populated += 1;
            }
        }

        assert!(capacity > 0);
        assert_eq!(occupied, self.occupied);
        assert_eq!(populated, self.populated);
        assert_eq!(self.load_factor, occupied as f64 / capacity as f64);
    }
}

/// Renders a [`HashTable`] slot by slot.
///
/// Created by [`HashTable::diagnostics`].
pub struct Diagnostics<'a, V> {
    table: &'a HashTable<V>,
}

const EMPTY_CHAIN: &str = "null";
const CHAIN_LINK: &str = " --> ";

impl<V> Display for Diagnostics<'_, V>
where
    V: Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let table = self.table;
        write!(
            f,
            "Underlying array usage / length: {}/{}",
            table.occupied,
            table.capacity()
        )?;
        write!(f, "\nTotal number of nodes: {}", table.populated)?;

        for (index, slot) in table.slots.iter().enumerate() {
            write!(f, "\n[ {index:>2} ]: ")?;
            if slot.is_none() {
                f.write_str(EMPTY_CHAIN)?;
                continue;
            }
            for node in nodes(slot) {
                write!(f, "{}{CHAIN_LINK}", node.value)?;
            }
        }

        Ok(())
    }
}

/// An iterator over the entries of a single slot, head to tail.
pub struct Chain<'a, V> {
    cursor: Option<&'a Node<V>>,
}

impl<'a, V> Iterator for Chain<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor?;
        self.cursor = node.next.as_deref();
        Some(&node.value)
    }
}

/// An iterator over every entry of a [`HashTable`].
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    chain: Chain<'a, V>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.chain.next() {
                self.remaining -= 1;
                return Some(value);
            }
            self.chain = Chain {
                cursor: self.slots.next()?.as_deref(),
            };
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
