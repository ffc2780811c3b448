use std::hash::{BuildHasher, Hasher};
use std::rc::Rc;
use std::sync::Arc;

use crate::error::Result;

/// The equality + hash capability a dictionary key must have.
///
/// Unlike [`std::hash::Hash`], hashing may be refused at run time, which is
/// how dynamically typed keys (see [`Value`](crate::Value)) report being
/// mutable containers. Two keys that compare equal must feed identical
/// data into `state`.
pub trait Key: Eq {
    /// Feeds this key into `state`, or fails with
    /// [`DictError::UnhashableKey`](crate::DictError::UnhashableKey).
    fn hash_key<H: Hasher>(&self, state: &mut H) -> Result<()>;
}

/// Validates `key` and computes its hash with a fresh hasher from `hash_builder`.
///
/// Pure: the same key and builder always give the same hash.
pub fn validate<Q, S>(key: &Q, hash_builder: &S) -> Result<u64>
where
    Q: Key + ?Sized,
    S: BuildHasher,
{
    let mut state = hash_builder.build_hasher();
    key.hash_key(&mut state)?;
    Ok(state.finish())
}

hashable!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    str,
    String,
);

hashable_tuple!(
    (A),
    (A, B),
    (A, B, C),
    (A, B, C, D),
    (A, B, C, D, E),
    (A, B, C, D, E, F),
);

// smart pointers hash like their pointee so that `Borrow` lookups agree

impl<T: Key + ?Sized> Key for &T {
    fn hash_key<H: Hasher>(&self, state: &mut H) -> Result<()> {
        (**self).hash_key(state)
    }
}

impl<T: Key + ?Sized> Key for Box<T> {
    fn hash_key<H: Hasher>(&self, state: &mut H) -> Result<()> {
        (**self).hash_key(state)
    }
}

impl<T: Key + ?Sized> Key for Rc<T> {
    fn hash_key<H: Hasher>(&self, state: &mut H) -> Result<()> {
        (**self).hash_key(state)
    }
}

impl<T: Key + ?Sized> Key for Arc<T> {
    fn hash_key<H: Hasher>(&self, state: &mut H) -> Result<()> {
        (**self).hash_key(state)
    }
}

impl<T: Key> Key for Option<T> {
    fn hash_key<H: Hasher>(&self, state: &mut H) -> Result<()> {
        match self {
            None => {
                state.write_u8(0);
                Ok(())
            }
            Some(inner) => {
                state.write_u8(1);
                inner.hash_key(state)
            }
        }
    }
}
