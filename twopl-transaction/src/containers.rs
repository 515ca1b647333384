//! Container aliases used by lock table and scheduler lookups.
//!
//! Keeping them in one place lets the lookup tables switch hash implementation without touching
//! scheduling logic. Anything whose iteration order reaches the trace uses `Vec` instead.

use hashbrown::HashMap as HbMap;

/// Hash map keyed by resource or transaction id.
pub type HotMap<K, V> = HbMap<K, V>;
