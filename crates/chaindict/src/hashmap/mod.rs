mod dict;
mod hash_table;

pub use dict::Dict;
pub use hash_table::TableStats;
