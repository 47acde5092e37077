//! Hash containers with a crate-wide, swappable hasher.

pub use hashbrown::hash_map::Entry;

/// Hash-map used throughout this crate.
pub type HashMap<K, V> = hashbrown::HashMap<K, V>;

/// Hash-set used throughout this crate.
pub type HashSet<T> = hashbrown::HashSet<T>;
