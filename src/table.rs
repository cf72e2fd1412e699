//! FeatureTable: fixed bucket array of chained feature → count entries.
//!
//! Entries live in an arena (`Vec<Entry>`); buckets and chains hold `u32`
//! indices. Freed slots are recycled through a free list. New entries are
//! linked at the head of their chain.

use std::sync::Arc;

use crate::power::ROLLING_BUCKETS;
use crate::scheme::FeatureScheme;

/// Bucket count of the string-hash layout.
pub const SIMPLE_BUCKETS: usize = 20_013;

const NIL: u32 = u32::MAX;

/// Bucket addressing strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TableLayout {
    /// 65,536 buckets addressed by the 16-bit rolling hash (streaming).
    #[default]
    Rolling,
    /// 20,013 buckets addressed by a radix string hash (ad-hoc lookups).
    Simple,
}

impl TableLayout {
    pub fn buckets(self) -> usize {
        match self {
            TableLayout::Rolling => ROLLING_BUCKETS,
            TableLayout::Simple => SIMPLE_BUCKETS,
        }
    }
}

/// Outcome of an insert-or-update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tally {
    /// A new entry was created.
    Created,
    /// An existing entry (under the scheme's equality) was updated.
    Existing,
    /// Invalid key, or a restricted table without this key.
    Ignored,
}

#[derive(Clone, Debug)]
struct Entry {
    key: Box<[u8]>,
    count: u32,
    next: u32,
}

/// Associative store of canonical feature → count.
#[derive(Clone, Debug)]
pub struct FeatureTable {
    scheme: Arc<FeatureScheme>,
    layout: TableLayout,
    heads: Vec<u32>,
    entries: Vec<Entry>,
    free: Vec<u32>,
    live: usize,
    restricted: bool,
}

impl FeatureTable {
    /// Empty table with the given layout.
    pub fn new(scheme: Arc<FeatureScheme>, layout: TableLayout) -> Self {
        FeatureTable {
            scheme,
            layout,
            heads: vec![NIL; layout.buckets()],
            entries: Vec::new(),
            free: Vec::new(),
            live: 0,
            restricted: false,
        }
    }

    /// Empty rolling-layout table.
    pub fn rolling(scheme: Arc<FeatureScheme>) -> Self {
        Self::new(scheme, TableLayout::Rolling)
    }

    #[inline]
    pub fn scheme(&self) -> &Arc<FeatureScheme> {
        &self.scheme
    }

    #[inline]
    pub fn layout(&self) -> TableLayout {
        self.layout
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Seal the key set: absent keys are ignored from now on.
    pub fn restrict(&mut self) {
        self.restricted = true;
    }

    #[inline]
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// Add `delta` to the count of `key`, creating the entry if allowed.
    pub fn increment(&mut self, key: &[u8], delta: u32) -> Tally {
        self.update(key, |c| c.saturating_add(delta))
    }

    /// Store `max(existing, value)`, creating the entry if allowed.
    pub fn max_merge(&mut self, key: &[u8], value: u32) -> Tally {
        self.update(key, |c| c.max(value))
    }

    /// Overwrite the count of an existing entry. `false` if absent.
    pub fn assign(&mut self, key: &[u8], value: u32) -> bool {
        match self.locate(key) {
            Some(idx) => {
                self.entries[idx as usize].count = value;
                true
            }
            None => false,
        }
    }

    /// Count of `key`, if present.
    pub fn get(&self, key: &[u8]) -> Option<u32> {
        self.locate(key).map(|idx| self.entries[idx as usize].count)
    }

    #[inline]
    pub fn contains(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`. `false` if absent.
    pub fn delete(&mut self, key: &[u8]) -> bool {
        let Some(canon) = self.scheme.canonical_key(key) else {
            return false;
        };
        let bucket = self.bucket_of(&canon);
        let mut prev = NIL;
        let mut cur = self.heads[bucket];
        while cur != NIL {
            let next = self.entries[cur as usize].next;
            if self.scheme.keys_equal(&self.entries[cur as usize].key, &canon) {
                if prev == NIL {
                    self.heads[bucket] = next;
                } else {
                    self.entries[prev as usize].next = next;
                }
                let e = &mut self.entries[cur as usize];
                e.key = Box::default();
                e.count = 0;
                e.next = NIL;
                self.free.push(cur);
                self.live -= 1;
                return true;
            }
            prev = cur;
            cur = next;
        }
        false
    }

    /// Zero every count, keeping the entries.
    pub fn reset(&mut self) {
        // freed slots already hold zero
        for e in &mut self.entries {
            e.count = 0;
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.heads.fill(NIL);
        self.entries.clear();
        self.free.clear();
        self.live = 0;
    }

    /// Total of all counts.
    pub fn sum(&self) -> u64 {
        self.values().map(u64::from).sum()
    }

    /// Live entries in bucket order, then chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], u32)> + '_ {
        self.heads.iter().flat_map(move |&head| Chain {
            entries: &self.entries,
            cur: head,
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Streaming update with a canonical window and its unmasked rolling hash.
    #[inline]
    pub(crate) fn tally_window(&mut self, key: &[u8], hash: u16) -> Tally {
        let bucket = match self.layout {
            TableLayout::Rolling => self.scheme.bucket_hash(key, hash) as usize,
            TableLayout::Simple => self.simple_bucket(key),
        };
        self.update_at(bucket, key, |c| c.saturating_add(1))
    }

    fn update(&mut self, key: &[u8], f: impl FnOnce(u32) -> u32) -> Tally {
        let Some(canon) = self.scheme.canonical_key(key) else {
            return Tally::Ignored;
        };
        let bucket = self.bucket_of(&canon);
        self.update_at(bucket, &canon, f)
    }

    fn update_at(&mut self, bucket: usize, canon: &[u8], f: impl FnOnce(u32) -> u32) -> Tally {
        if let Some(idx) = self.find(bucket, canon) {
            let e = &mut self.entries[idx as usize];
            e.count = f(e.count);
            return Tally::Existing;
        }
        if self.restricted {
            return Tally::Ignored;
        }
        let idx = self.insert(bucket, canon);
        let e = &mut self.entries[idx as usize];
        e.count = f(0);
        Tally::Created
    }

    fn insert(&mut self, bucket: usize, canon: &[u8]) -> u32 {
        let entry = Entry {
            key: canon.into(),
            count: 0,
            next: self.heads[bucket],
        };
        let idx = match self.free.pop() {
            Some(i) => {
                self.entries[i as usize] = entry;
                i
            }
            None => {
                self.entries.push(entry);
                (self.entries.len() - 1) as u32
            }
        };
        self.heads[bucket] = idx;
        self.live += 1;
        idx
    }

    fn find(&self, bucket: usize, canon: &[u8]) -> Option<u32> {
        let mut cur = self.heads[bucket];
        while cur != NIL {
            let e = &self.entries[cur as usize];
            if self.scheme.keys_equal(&e.key, canon) {
                return Some(cur);
            }
            cur = e.next;
        }
        None
    }

    fn locate(&self, key: &[u8]) -> Option<u32> {
        let canon = self.scheme.canonical_key(key)?;
        self.find(self.bucket_of(&canon), &canon)
    }

    fn bucket_of(&self, canon: &[u8]) -> usize {
        match self.layout {
            TableLayout::Rolling => {
                self.scheme.bucket_hash(canon, self.scheme.hash(canon)) as usize
            }
            TableLayout::Simple => self.simple_bucket(canon),
        }
    }

    /// Radix string hash over kept positions, reduced at every step.
    fn simple_bucket(&self, canon: &[u8]) -> usize {
        let alphabet = self.scheme.alphabet();
        let radix = alphabet.radix() as u64;
        let mask = self.scheme.mask();
        let h = canon
            .iter()
            .enumerate()
            .filter(|&(i, _)| mask.is_none_or(|m| m.is_kept(i)))
            .fold(0u64, |h, (_, &c)| {
                (h * radix + alphabet.value(c) as u64) % SIMPLE_BUCKETS as u64
            });
        h as usize
    }
}

struct Chain<'a> {
    entries: &'a [Entry],
    cur: u32,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (&'a [u8], u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur == NIL {
            return None;
        }
        let e = &self.entries[self.cur as usize];
        self.cur = e.next;
        Some((&e.key[..], e.count))
    }
}
