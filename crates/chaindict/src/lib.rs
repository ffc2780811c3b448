//! A separately chained hash table with dictionary semantics.
//!
//! Keys must implement [`Key`], an equality + hash capability that may be
//! refused at run time. That is how a dynamically typed [`Value`] rejects
//! mutable containers as keys with [`DictError::UnhashableKey`].

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod hashmap;
pub mod key;
pub mod linked_list;
pub mod value;

pub use config::DictConfig;
pub use error::{ConfigError, DictError, Result};
pub use hashmap::{Dict, TableStats};
pub use key::Key;
pub use linked_list::{Chain, Node, Upsert};
pub use value::Value;
