use std::borrow::Borrow;
use std::hash::{BuildHasher, BuildHasherDefault, DefaultHasher};

use super::hash_table::{HashTable, TableStats};
use crate::config::DictConfig;
use crate::error::{ConfigError, Result};
use crate::key::{Key, validate};

/// A separately chained dictionary.
///
/// Every operation validates its key first, so a failing call never
/// changes the dictionary.
///
/// ```
/// use chaindict::{Dict, DictError, Value};
///
/// let mut d = Dict::new();
/// d.set(Value::from("a"), Value::from("aa")).unwrap();
/// d.set(Value::from("a"), Value::from("b")).unwrap();
///
/// assert_eq!(d.get(&Value::from("a")), Ok(&Value::from("b")));
/// assert_eq!(d.len(), 1);
///
/// let set = Value::Set(vec![Value::Int(1)]);
/// assert_eq!(
///     d.contains(&set),
///     Err(DictError::UnhashableKey { type_name: "set" })
/// );
/// ```
pub struct Dict<K, V, S = BuildHasherDefault<DefaultHasher>> {
    table: HashTable<K, V>,
    hash_builder: S,
    config: DictConfig,
}

impl<K: Key, V> Default for Dict<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, V> Dict<K, V> {
    /// Creates an empty dictionary with [`DictConfig::default`]
    pub fn new() -> Self {
        let config = DictConfig::default();
        Self {
            table: HashTable::from_config(&config),
            hash_builder: BuildHasherDefault::default(),
            config,
        }
    }

    pub fn with_config(config: DictConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, BuildHasherDefault::default())
    }
}

impl<K, V, S> Dict<K, V, S>
where
    K: Key,
    S: BuildHasher,
{
    pub fn with_config_and_hasher(
        config: DictConfig,
        hash_builder: S,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            table: HashTable::from_config(&config),
            hash_builder,
            config,
        })
    }

    /// Returns the value stored for `key`
    ///
    /// # Errors
    ///
    /// [`DictError::UnhashableKey`](crate::DictError::UnhashableKey) if `key` cannot be hashed,
    /// [`DictError::KeyNotFound`](crate::DictError::KeyNotFound) if it was never set.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Key + ?Sized,
    {
        let hash = validate(key, &self.hash_builder)?;
        self.table.get(key, hash)
    }

    /// Same as [`Dict::get`], but hands out the value for modification
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Key + ?Sized,
    {
        let hash = validate(key, &self.hash_builder)?;
        self.table.get_mut(key, hash)
    }

    /// Maps `key` to `value`, replacing the value of an equal key if there is one.
    /// May grow the table.
    pub fn set(&mut self, key: K, value: V) -> Result<()> {
        let hash = validate(&key, &self.hash_builder)?;
        self.table.set(key, hash, value);
        Ok(())
    }

    pub fn contains<Q>(&self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Key + ?Sized,
    {
        let hash = validate(key, &self.hash_builder)?;
        Ok(self.table.contains(key, hash))
    }
}

impl<K, V, S> Dict<K, V, S> {
    /// Returns the number of distinct keys
    pub fn len(&self) -> usize {
        self.table.used()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets
    pub fn capacity(&self) -> usize {
        self.table.bucket_count()
    }

    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    pub fn stats(&self) -> TableStats {
        self.table.stats()
    }

    pub fn config(&self) -> &DictConfig {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug, S> std::fmt::Debug for Dict<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for chain in &self.table.buckets {
            for node in chain.iter() {
                map.entry(node.key(), node.value());
            }
        }
        map.finish()
    }
}
