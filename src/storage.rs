use hashbrown::HashMap;
use std::cmp::Ordering;
use std::collections::{BTreeMap, LinkedList};

use crate::variant::{IndexKind, SequenceKind};

#[cfg(feature = "fast-hash")]
use rustc_hash::FxHasher;
#[cfg(feature = "fast-hash")]
use std::hash::BuildHasherDefault;

#[cfg(not(feature = "fast-hash"))]
use ahash::RandomState;

#[cfg(feature = "fast-hash")]
type Build = BuildHasherDefault<FxHasher>;
#[cfg(not(feature = "fast-hash"))]
type Build = RandomState;

/// Hash map used by the hash index and the group aggregation.
pub type FastHashMap<K, V> = HashMap<K, V, Build>;

/// Handle of a record inside the container arena. Handles are `u32`, so one
/// container holds at most [`MAX_RECORDS`] records.
pub type RecordId = u32;

/// Record capacity of one container.
pub const MAX_RECORDS: u64 = RecordId::MAX as u64 + 1;

/// Ordered sequence of record handles.
pub trait RecordSequence {
    fn push(&mut self, id: RecordId);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> Box<dyn Iterator<Item = RecordId> + '_>;

    /// Stable sort.
    fn sort_by(&mut self, cmp: &mut dyn FnMut(RecordId, RecordId) -> Ordering);

    fn to_vec(&self) -> Vec<RecordId> {
        self.iter().collect()
    }

    /// Replaces the whole order with `ids`.
    fn replace(&mut self, ids: Vec<RecordId>);
}

impl RecordSequence for Vec<RecordId> {
    #[inline]
    fn push(&mut self, id: RecordId) {
        Vec::push(self, id);
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = RecordId> + '_> {
        Box::new(self.as_slice().iter().copied())
    }

    fn sort_by(&mut self, cmp: &mut dyn FnMut(RecordId, RecordId) -> Ordering) {
        self.as_mut_slice().sort_by(|a, b| cmp(*a, *b));
    }

    fn to_vec(&self) -> Vec<RecordId> {
        self.clone()
    }

    fn replace(&mut self, ids: Vec<RecordId>) {
        *self = ids;
    }
}

impl RecordSequence for LinkedList<RecordId> {
    #[inline]
    fn push(&mut self, id: RecordId) {
        self.push_back(id);
    }

    #[inline]
    fn len(&self) -> usize {
        LinkedList::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = RecordId> + '_> {
        Box::new(LinkedList::iter(self).copied())
    }

    // A list cannot be sorted in place; sort a copy and relink.
    fn sort_by(&mut self, cmp: &mut dyn FnMut(RecordId, RecordId) -> Ordering) {
        let mut ids = <Self as RecordSequence>::to_vec(self);
        ids.as_mut_slice().sort_by(|a, b| cmp(*a, *b));
        self.replace(ids);
    }

    fn replace(&mut self, ids: Vec<RecordId>) {
        self.clear();
        self.extend(ids);
    }
}

/// Email to handle lookup.
pub trait RecordIndex {
    /// Inserts or overwrites, returning the previous handle for `key`.
    fn insert(&mut self, key: String, id: RecordId) -> Option<RecordId>;

    fn get(&self, key: &str) -> Option<RecordId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles in the structure's own iteration order.
    fn iter(&self) -> Box<dyn Iterator<Item = RecordId> + '_>;
}

impl RecordIndex for FastHashMap<String, RecordId> {
    #[inline]
    fn insert(&mut self, key: String, id: RecordId) -> Option<RecordId> {
        HashMap::insert(self, key, id)
    }

    #[inline]
    fn get(&self, key: &str) -> Option<RecordId> {
        HashMap::get(self, key).copied()
    }

    #[inline]
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = RecordId> + '_> {
        Box::new(self.values().copied())
    }
}

impl RecordIndex for BTreeMap<String, RecordId> {
    #[inline]
    fn insert(&mut self, key: String, id: RecordId) -> Option<RecordId> {
        BTreeMap::insert(self, key, id)
    }

    #[inline]
    fn get(&self, key: &str) -> Option<RecordId> {
        BTreeMap::get(self, key).copied()
    }

    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = RecordId> + '_> {
        Box::new(self.values().copied())
    }
}

pub fn new_sequence(kind: SequenceKind) -> Box<dyn RecordSequence> {
    match kind {
        SequenceKind::Contiguous => Box::new(Vec::<RecordId>::new()),
        SequenceKind::Linked => Box::new(LinkedList::<RecordId>::new()),
    }
}

pub fn new_index(kind: IndexKind) -> Box<dyn RecordIndex> {
    match kind {
        IndexKind::Hash => Box::new(FastHashMap::<String, RecordId>::default()),
        IndexKind::Sorted => Box::new(BTreeMap::<String, RecordId>::new()),
    }
}
