//! 「每個集合最多一筆預設」的記錄集合，地址與付款方式共用。
//!
//! 每個 `DefaultSet` 自帶一把 `RwLock`：所有變更連同預設值修復都在同一個
//! 寫鎖內完成，讀取端只會拿到複本，不會看到修復到一半的狀態。

use crate::domain::ports::{Bootstrap, Defaultable};
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Largest id accepted from injected state; signed 64-bit storage tops out here.
pub const MAX_INJECTED_ID: u64 = i64::MAX as u64;

fn is_injectable_id(id: u64) -> bool {
    (1..=MAX_INJECTED_ID).contains(&id)
}

#[derive(Debug)]
struct Records<T> {
    items: Vec<T>,
    last_id: u64,
    bootstrapped: bool,
}

impl<T: Defaultable> Records<T> {
    // last_id starts at or below MAX_INJECTED_ID, so this cannot overflow.
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn has_default(&self) -> bool {
        self.items.iter().any(Defaultable::is_default)
    }

    /// Keeps the first flagged record as default, or promotes the first
    /// record when none is flagged.
    fn repair(&mut self) {
        let mut seen = false;
        for item in &mut self.items {
            if item.is_default() {
                if seen {
                    item.set_default(false);
                }
                seen = true;
            }
        }
        if !seen {
            if let Some(first) = self.items.first_mut() {
                first.set_default(true);
            }
        }
    }
}

#[derive(Debug)]
pub struct DefaultSet<T: Defaultable> {
    name: &'static str,
    records: RwLock<Records<T>>,
}

impl<T: Defaultable> DefaultSet<T> {
    pub fn new(name: &'static str) -> Self {
        Self::with_records(name, Vec::new())
    }

    /// Starts from injected state. Records with id 0, an id above
    /// `MAX_INJECTED_ID` or a repeated id get a fresh one, and the default
    /// flag is repaired.
    pub fn with_records(name: &'static str, items: Vec<T>) -> Self {
        let mut records = Records {
            last_id: items
                .iter()
                .map(Defaultable::id)
                .filter(|id| is_injectable_id(*id))
                .max()
                .unwrap_or(0),
            items: Vec::with_capacity(items.len()),
            bootstrapped: false,
        };

        let mut seen = HashSet::new();
        for mut item in items {
            if !is_injectable_id(item.id()) || !seen.insert(item.id()) {
                let id = records.next_id();
                item.set_id(id);
                seen.insert(id);
            }
            records.items.push(item);
        }
        records.repair();

        Self {
            name,
            records: RwLock::new(records),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn read(&self) -> RwLockReadGuard<'_, Records<T>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Records<T>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads initial records once. Only applies while the set is still
    /// empty; returns how many records were loaded.
    ///
    /// Source order is kept. The first record flagged default stays default,
    /// otherwise the first record is promoted.
    pub fn bootstrap<B>(&self, source: &B) -> usize
    where
        B: Bootstrap<T> + ?Sized,
    {
        let mut records = self.write();
        if records.bootstrapped {
            return 0;
        }
        records.bootstrapped = true;
        if !records.items.is_empty() {
            tracing::debug!(store = self.name, "Store already populated, skipping bootstrap");
            return 0;
        }

        for mut item in source.initial_records() {
            let id = records.next_id();
            item.set_id(id);
            records.items.push(item);
        }
        records.repair();

        let loaded = records.items.len();
        tracing::info!(store = self.name, loaded, "Bootstrapped store");
        loaded
    }

    /// Stores `record` at the front with the next unused id.
    ///
    /// The new record becomes default when `request_default` is set or when
    /// nothing else is default; its own incoming flag is ignored.
    pub fn add(&self, mut record: T, request_default: bool) -> T {
        let mut records = self.write();

        let id = records.next_id();
        record.set_id(id);

        let promote = request_default || !records.has_default();
        if promote {
            for item in &mut records.items {
                item.set_default(false);
            }
        }
        record.set_default(promote);
        records.items.insert(0, record.clone());

        tracing::debug!(store = self.name, id, is_default = promote, "Added record");
        record
    }

    /// Removes the record with `id`. Returns false when there was none.
    pub fn delete(&self, id: u64) -> bool {
        let mut records = self.write();

        let Some(pos) = records.items.iter().position(|item| item.id() == id) else {
            tracing::debug!(store = self.name, id, "Delete ignored, unknown id");
            return false;
        };

        let removed = records.items.remove(pos);
        if removed.is_default() || !records.has_default() {
            if let Some(first) = records.items.first_mut() {
                first.set_default(true);
            }
        }

        tracing::debug!(store = self.name, id, was_default = removed.is_default(), "Deleted record");
        true
    }

    /// Makes `id` the only default. Returns false, changing nothing, when
    /// `id` is unknown.
    pub fn set_default(&self, id: u64) -> bool {
        let mut records = self.write();

        if !records.items.iter().any(|item| item.id() == id) {
            tracing::debug!(store = self.name, id, "Set default ignored, unknown id");
            return false;
        }
        for item in &mut records.items {
            let is_target = item.id() == id;
            item.set_default(is_target);
        }

        tracing::debug!(store = self.name, id, "Changed default record");
        true
    }

    /// Snapshot in maintained order.
    pub fn list(&self) -> Vec<T> {
        self.read().items.clone()
    }

    pub fn get(&self, id: u64) -> Option<T> {
        self.read().items.iter().find(|item| item.id() == id).cloned()
    }

    pub fn default_record(&self) -> Option<T> {
        self.read().items.iter().find(|item| item.is_default()).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }

    /// Ends the store's lifecycle and hands back its records.
    pub fn into_records(self) -> Vec<T> {
        self.records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u64,
        label: &'static str,
        is_default: bool,
    }

    impl Item {
        fn new(label: &'static str) -> Self {
            Self {
                id: 0,
                label,
                is_default: false,
            }
        }
    }

    impl Defaultable for Item {
        fn id(&self) -> u64 {
            self.id
        }
        fn set_id(&mut self, id: u64) {
            self.id = id;
        }
        fn is_default(&self) -> bool {
            self.is_default
        }
        fn set_default(&mut self, is_default: bool) {
            self.is_default = is_default;
        }
    }

    fn defaults(set: &DefaultSet<Item>) -> Vec<&'static str> {
        set.list()
            .into_iter()
            .filter(|item| item.is_default)
            .map(|item| item.label)
            .collect()
    }

    fn assert_invariant(items: &[Item]) {
        let count = items.iter().filter(|item| item.is_default).count();
        if items.is_empty() {
            assert_eq!(count, 0);
        } else {
            assert_eq!(count, 1, "expected exactly one default in {:?}", items);
        }
    }

    #[test]
    fn test_default_scenario() {
        let set = DefaultSet::new("items");

        let a = set.add(Item::new("a"), false);
        assert_eq!(a.id, 1);
        assert!(a.is_default);

        let b = set.add(Item::new("b"), false);
        assert_eq!(b.id, 2);
        assert!(!b.is_default);
        assert_eq!(defaults(&set), vec!["a"]);

        assert!(set.set_default(b.id));
        assert_eq!(defaults(&set), vec!["b"]);

        assert!(set.delete(b.id));
        assert_eq!(defaults(&set), vec!["a"]);
    }

    #[test]
    fn test_add_inserts_at_front() {
        let set = DefaultSet::new("items");
        set.add(Item::new("a"), false);
        set.add(Item::new("b"), false);
        set.add(Item::new("c"), true);

        let labels: Vec<_> = set.list().into_iter().map(|item| item.label).collect();
        assert_eq!(labels, vec!["c", "b", "a"]);
        assert_eq!(defaults(&set), vec!["c"]);
    }

    #[test]
    fn test_incoming_default_flag_is_ignored() {
        let set = DefaultSet::new("items");
        set.add(Item::new("a"), false);

        let mut flagged = Item::new("b");
        flagged.is_default = true;
        let stored = set.add(flagged, false);

        assert!(!stored.is_default);
        assert_eq!(defaults(&set), vec!["a"]);
    }

    #[test]
    fn test_delete_non_default_keeps_default() {
        let set = DefaultSet::new("items");
        let a = set.add(Item::new("a"), false);
        let b = set.add(Item::new("b"), false);
        set.add(Item::new("c"), false);

        assert!(set.delete(b.id));
        assert_eq!(defaults(&set), vec!["a"]);
        assert!(set.get(a.id).is_some());
    }

    #[test]
    fn test_delete_default_promotes_first_remaining() {
        let set = DefaultSet::new("items");
        let a = set.add(Item::new("a"), false);
        set.add(Item::new("b"), false);
        set.add(Item::new("c"), false);

        assert!(set.delete(a.id));
        assert_eq!(defaults(&set), vec!["c"]);
    }

    #[test]
    fn test_delete_last_record_leaves_empty_set() {
        let set = DefaultSet::new("items");
        let a = set.add(Item::new("a"), true);
        assert!(set.delete(a.id));
        assert!(set.is_empty());
        assert!(set.default_record().is_none());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let set = DefaultSet::new("items");
        set.add(Item::new("a"), false);
        set.add(Item::new("b"), false);
        let before = set.list();

        assert!(!set.set_default(99));
        assert!(!set.delete(99));
        assert_eq!(set.list(), before);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let set = DefaultSet::new("items");
        set.add(Item::new("a"), false);
        let b = set.add(Item::new("b"), false);
        set.delete(b.id);

        let c = set.add(Item::new("c"), false);
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_list_returns_a_copy() {
        let set = DefaultSet::new("items");
        set.add(Item::new("a"), false);

        let mut snapshot = set.list();
        snapshot[0].is_default = false;
        snapshot.clear();

        assert_eq!(defaults(&set), vec!["a"]);
    }

    #[test]
    fn test_with_records_repairs_state() {
        let mut a = Item::new("a");
        a.id = 5;
        a.is_default = true;
        let mut b = Item::new("b");
        b.id = 5;
        b.is_default = true;
        let c = Item::new("c");

        let set = DefaultSet::with_records("items", vec![a, b, c]);
        let items = set.list();
        let ids: Vec<_> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![5, 6, 7]);
        assert_eq!(defaults(&set), vec!["a"]);

        assert_eq!(set.add(Item::new("d"), false).id, 8);
    }

    #[test]
    fn test_with_records_reassigns_out_of_range_ids() {
        let mut huge = Item::new("huge");
        huge.id = u64::MAX;
        let mut top = Item::new("top");
        top.id = MAX_INJECTED_ID;

        let set = DefaultSet::with_records("items", vec![Item::new("a"), huge]);
        let ids: Vec<_> = set.list().iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(set.add(Item::new("b"), false).id, 3);

        let set = DefaultSet::with_records("items", vec![top]);
        assert_eq!(set.list()[0].id, MAX_INJECTED_ID);
        assert_eq!(set.add(Item::new("c"), false).id, MAX_INJECTED_ID + 1);
    }

    #[test]
    fn test_bootstrap_runs_once() {
        let set = DefaultSet::new("items");
        let seed = vec![Item::new("a"), Item::new("b")];

        assert_eq!(set.bootstrap(&seed), 2);
        assert_eq!(set.bootstrap(&seed), 0);

        let labels: Vec<_> = set.list().into_iter().map(|item| item.label).collect();
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!(defaults(&set), vec!["a"]);
    }

    #[test]
    fn test_bootstrap_keeps_seeded_default() {
        let set = DefaultSet::new("items");
        let mut b = Item::new("b");
        b.is_default = true;

        set.bootstrap(&vec![Item::new("a"), b]);
        assert_eq!(defaults(&set), vec!["b"]);
    }

    #[test]
    fn test_bootstrap_skipped_when_populated() {
        let set = DefaultSet::new("items");
        set.add(Item::new("manual"), false);

        assert_eq!(set.bootstrap(&vec![Item::new("seed")]), 0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_invariant_holds_over_operation_sequences() {
        // 固定種子的 LCG，讓序列可以重現
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move |bound: u64| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 33) % bound
        };

        for _ in 0..50 {
            let set: DefaultSet<Item> = DefaultSet::new("items");
            for _ in 0..40 {
                let max_id = set.list().iter().map(|item| item.id).max().unwrap_or(0) + 2;
                match next(3) {
                    0 => {
                        set.add(Item::new("x"), next(2) == 0);
                    }
                    1 => {
                        set.delete(next(max_id));
                    }
                    _ => {
                        set.set_default(next(max_id));
                    }
                }
                assert_invariant(&set.list());
            }
        }
    }

    #[test]
    fn test_concurrent_mutations_keep_invariant() {
        use std::sync::Arc;
        use std::thread;

        let set = Arc::new(DefaultSet::new("items"));
        let writers: Vec<_> = (0..4)
            .map(|t| {
                let set = Arc::clone(&set);
                thread::spawn(move || {
                    for i in 0..200u64 {
                        let added = set.add(Item::new("x"), i % 3 == 0);
                        if i % 2 == 0 {
                            set.set_default(added.id);
                        }
                        if (i + t) % 5 == 0 {
                            set.delete(added.id);
                        }
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..2)
            .map(|_| {
                let set = Arc::clone(&set);
                thread::spawn(move || {
                    for _ in 0..500 {
                        assert_invariant(&set.list());
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }

        let items = Arc::try_unwrap(set).unwrap().into_records();
        assert_invariant(&items);
        let ids: HashSet<_> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids.len(), items.len());
    }
}
