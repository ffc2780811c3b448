use std::borrow::Borrow;

use log::{debug, trace};

use crate::config::DictConfig;
use crate::error::{DictError, Result};
use crate::linked_list::{Chain, Upsert};

/// A snapshot of how entries are spread over the buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    pub buckets: usize,
    pub items: usize,
    pub empty_buckets: usize,
    pub longest_chain: usize,
}

#[derive(Debug)]
pub(crate) struct HashTable<K, V> {
    pub(crate) buckets: Vec<Chain<K, V>>,
    pub(crate) items: usize,
    max_load_factor: f64,
    growth_factor: usize,
}

impl<K, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::from_config(&DictConfig::default())
    }
}

impl<K, V> HashTable<K, V> {
    /// Creates a `HashTable` shaped by an already validated `config`
    pub fn from_config(config: &DictConfig) -> Self {
        debug!(
            "new hash table: {} buckets, max load factor {}, growth factor {}",
            config.initial_capacity, config.max_load_factor, config.growth_factor
        );
        Self {
            buckets: Self::new_buckets(config.initial_capacity),
            items: 0,
            max_load_factor: config.max_load_factor,
            growth_factor: config.growth_factor,
        }
    }

    /// Returns the number of items in the table
    pub fn used(&self) -> usize {
        self.items
    }

    /// Shorthand for `self.used() == 0`
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Returns the number of buckets, or "slots" of the table
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.items as f64 / self.bucket_count() as f64
    }

    /// The only bucket that may hold an entry with this hash
    pub fn index_for(&self, hash: u64) -> usize {
        Self::index_in(hash, self.bucket_count())
    }

    pub fn get<Q>(&self, key: &Q, hash: u64) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.buckets[self.index_for(hash)]
            .find(key, hash)
            .map(|node| &node.value)
            .ok_or(DictError::KeyNotFound)
    }

    pub fn get_mut<Q>(&mut self, key: &Q, hash: u64) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let i = self.index_for(hash);
        self.buckets[i]
            .find_mut(key, hash)
            .map(|node| &mut node.value)
            .ok_or(DictError::KeyNotFound)
    }

    pub fn contains<Q>(&self, key: &Q, hash: u64) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.buckets[self.index_for(hash)].contains(key, hash)
    }

    /// Inserts or overwrites `key`, growing afterwards
    /// if the new entry pushed the load factor over the limit
    pub fn set(&mut self, key: K, hash: u64, value: V) -> Upsert
    where
        K: Eq,
    {
        let i = self.index_for(hash);
        let outcome = self.buckets[i].upsert(key, hash, value);

        if outcome == Upsert::Inserted {
            self.items += 1;
            while self.over_threshold() {
                self.grow();
            }
        }

        outcome
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            buckets: self.bucket_count(),
            items: self.items,
            empty_buckets: self.buckets.iter().filter(|c| c.is_empty()).count(),
            longest_chain: self.buckets.iter().map(Chain::len).max().unwrap_or(0),
        }
    }

    // [private]

    fn new_buckets(cap: usize) -> Vec<Chain<K, V>> {
        (0..cap).map(|_| Chain::new()).collect()
    }

    fn index_in(hash: u64, bucket_count: usize) -> usize {
        (hash % bucket_count as u64) as usize
    }

    fn over_threshold(&self) -> bool {
        self.load_factor() > self.max_load_factor
    }

    /// Moves every node into a fresh bucket array `growth_factor` times larger,
    /// placing each by its cached hash
    ///
    /// # Panics
    ///
    /// If the new bucket count overflows `usize` or cannot be allocated
    fn grow(&mut self) {
        let old_cap = self.bucket_count();
        let new_cap = old_cap
            .checked_mul(self.growth_factor)
            .expect("bucket count overflowed usize");

        trace!(
            target: "hash_table",
            "growing from {} to {} buckets, moving {} items",
            old_cap,
            new_cap,
            self.items
        );

        let mut new_buckets = Self::new_buckets(new_cap);
        for mut chain in self.buckets.drain(..) {
            while let Some(node) = chain.pop_boxed() {
                let i = Self::index_in(node.hash, new_cap);
                new_buckets[i].push_boxed(node);
            }
        }

        // dropping the emptied old array
        self.buckets = new_buckets;
    }
}

#[cfg(test)]
mod test {
    use std::hash::{BuildHasherDefault, DefaultHasher};

    use super::HashTable;
    use crate::config::DictConfig;
    use crate::error::DictError;
    use crate::key::validate;
    use crate::linked_list::Upsert;

    fn hash(key: &str) -> u64 {
        validate(key, &BuildHasherDefault::<DefaultHasher>::default()).unwrap()
    }

    fn table(cap: usize) -> HashTable<String, String> {
        HashTable::from_config(&DictConfig::new().with_initial_capacity(cap))
    }

    #[test]
    fn set() {
        let mut t = HashTable::default();

        assert_eq!(t.set("foo".to_string(), hash("foo"), "bar"), Upsert::Inserted);
        assert_eq!(t.used(), 1);

        assert_eq!(t.set("foo".to_string(), hash("foo"), "baz"), Upsert::Updated);
        assert_eq!(t.used(), 1);
        assert_eq!(t.get("foo", hash("foo")), Ok(&"baz"));

        t.set("peti".to_string(), hash("peti"), "is a baby");
        t.set("sina".to_string(), hash("sina"), "is a tiny baby");
        assert_eq!(t.used(), 3);
    }

    #[test]
    fn get() {
        let mut t = table(4);

        t.set("peti".into(), hash("peti"), "is a baby".into());
        t.set("sina".into(), hash("sina"), "is a tiny baby".into());

        assert_eq!(t.get("peti", hash("peti")).map(String::as_str), Ok("is a baby"));
        assert_eq!(
            t.get("sina", hash("sina")).map(String::as_str),
            Ok("is a tiny baby")
        );
        assert_eq!(t.get("noone", hash("noone")), Err(DictError::KeyNotFound));
        assert!(t.contains("peti", hash("peti")));
        assert!(!t.contains("noone", hash("noone")));
    }

    #[test]
    fn get_mut() {
        let mut t = table(4);
        t.set("k".into(), hash("k"), "v".into());

        t.get_mut("k", hash("k")).unwrap().push('!');
        assert_eq!(t.get("k", hash("k")).map(String::as_str), Ok("v!"));
        assert_eq!(t.get_mut("x", hash("x")), Err(DictError::KeyNotFound));
    }

    #[test]
    fn index_for_is_hash_mod_capacity() {
        let t = table(12);
        for h in [0u64, 1, 11, 12, 13, u64::MAX] {
            assert_eq!(t.index_for(h), (h % 12) as usize);
        }
    }

    #[test]
    fn grows_past_threshold() {
        // 4 buckets at 0.75: the 4th item would make it 1.0
        let mut t = table(4);
        for i in 0..3 {
            let k = format!("{i}");
            t.set(k.clone(), hash(&k), k);
        }
        assert_eq!(t.bucket_count(), 4);

        t.set("3".into(), hash("3"), "3".into());
        assert_eq!(t.bucket_count(), 8);
        assert_eq!(t.used(), 4);
        assert!(t.load_factor() <= 0.75);
    }

    #[test]
    fn growth_keeps_everything() {
        let mut t = table(1);

        let pairs: Vec<(String, String)> = (0..500)
            .map(|i| (format!("{i}"), format!("value of {i}")))
            .collect();

        for (k, v) in &pairs {
            t.set(k.clone(), hash(k), v.clone());
            assert!(t.load_factor() <= 0.75);
        }

        assert_eq!(t.used(), pairs.len());
        assert_eq!(t.bucket_count(), 1024);

        let stored: usize = t.buckets.iter().map(|c| c.len()).sum();
        assert_eq!(stored, pairs.len());

        for (k, v) in &pairs {
            assert_eq!(t.get(k.as_str(), hash(k)), Ok(v));
            // every entry sits in the bucket its hash points at
            assert!(t.buckets[t.index_for(hash(k))].contains(k.as_str(), hash(k)));
        }
    }

    #[test]
    fn growth_factor_and_load_factor() {
        let config = DictConfig::new()
            .with_initial_capacity(2)
            .with_max_load_factor(2f64)
            .with_growth_factor(3);
        let mut t = HashTable::from_config(&config);

        for i in 0..5u64 {
            t.set(i, i, ());
        }
        // 5 / 2 > 2.0
        assert_eq!(t.bucket_count(), 6);
        assert_eq!(t.used(), 5);
    }

    #[test]
    fn long_chains() {
        // identical hashes all land in one chain
        let mut t = HashTable::from_config(&DictConfig::new().with_initial_capacity(2));
        for i in 0..25u32 {
            t.set(i, 42, i);
        }

        let stats = t.stats();
        assert_eq!(stats.items, 25);
        assert_eq!(stats.longest_chain, 25);
        assert_eq!(stats.empty_buckets, stats.buckets - 1);

        for i in 0..25 {
            assert_eq!(t.get(&i, 42), Ok(&i));
        }
    }

    #[test]
    fn stats() {
        let t: HashTable<u8, u8> = HashTable::default();
        let stats = t.stats();
        assert_eq!(stats.buckets, 8);
        assert_eq!(stats.items, 0);
        assert_eq!(stats.empty_buckets, 8);
        assert_eq!(stats.longest_chain, 0);
        assert!(t.is_empty());
    }
}
