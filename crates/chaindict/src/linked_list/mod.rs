use std::borrow::Borrow;

/// Outcome of [`Chain::upsert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// A collision chain: every entry whose hash maps to one bucket.
///
/// Singly linked, each node owns the next one.
pub struct Chain<K, V> {
    head: Option<Box<Node<K, V>>>,
    len: usize,
}

impl<K, V> Default for Chain<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Chain<K, V> {
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Finds the entry equal to `key`, comparing the cached hash before the key itself
    pub fn find<Q>(&self, key: &Q, hash: u64) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.iter()
            .find(|node| node.hash == hash && key.eq(node.key.borrow()))
    }

    pub fn find_mut<Q>(&mut self, key: &Q, hash: u64) -> Option<&mut Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut curr = self.head.as_deref_mut();
        while let Some(node) = curr {
            if node.hash == hash && key.eq(node.key.borrow()) {
                return Some(node);
            }
            curr = node.next.as_deref_mut();
        }
        None
    }

    pub fn contains<Q>(&self, key: &Q, hash: u64) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.find(key, hash).is_some()
    }

    /// Overwrites the value of an equal key in place,
    /// or links a new entry at the head of the chain
    pub fn upsert(&mut self, key: K, hash: u64, value: V) -> Upsert
    where
        K: Eq,
    {
        match self.find_mut(&key, hash) {
            Some(node) => {
                // the old value is dropped only after the new one is in place
                node.value = value;
                Upsert::Updated
            }
            None => {
                self.push_boxed(boxnode!(key, value, hash));
                Upsert::Inserted
            }
        }
    }

    /// Links an already allocated node at the head of the chain
    pub(crate) fn push_boxed(&mut self, mut boxed: Box<Node<K, V>>) {
        boxed.next = self.head.take();
        self.head = Some(boxed);
        self.len += 1;
    }

    /// Unlinks the head node without deallocating it
    pub(crate) fn pop_boxed(&mut self) -> Option<Box<Node<K, V>>> {
        let mut node = self.head.take()?;
        self.head = node.next.take();
        self.len -= 1;
        Some(node)
    }

    // [adapters]

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }
}

impl<K, V> Drop for Chain<K, V> {
    fn drop(&mut self) {
        let mut curr = self.head.take();
        while let Some(mut node) = curr {
            curr = node.next.take();
            // node goes out of scope here, without recursing into `next`
        }
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for Chain<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// One key/value record together with the hash its bucket was chosen by
pub struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    pub(crate) next: Option<Box<Node<K, V>>>,
}

impl<K, V> Node<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{:?}, {:?}>", self.key, self.value)
    }
}

// [iterators]

pub struct Iter<'a, K, V> {
    current: Option<&'a Node<K, V>>,
    len: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current.take()?;
        self.current = node.next.as_deref();
        self.len -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    pub fn new(chain: &'a Chain<K, V>) -> Self {
        Self {
            current: chain.head.as_deref(),
            len: chain.len,
        }
    }
}
