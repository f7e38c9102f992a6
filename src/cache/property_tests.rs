//! Property-Based Tests for the View Cache
//!
//! Uses proptest to check the cache against a simple model of which keys are
//! currently cached.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::cache::testing::CountingBuilder;
use crate::cache::{PreloadBatch, Proposal, ViewCache, DEFAULT_EXPIRATION};

// == Strategies ==
/// A small key space so that operations collide often.
fn key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["stock", "sales", "returns", "customers"]).prop_map(String::from)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Get { key: String },
    Invalidate { key: String },
    /// Start a batch for `key`, then deliver its proposal after `ops_later`
    /// further operations.
    Preload { key: String, ops_later: usize },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
        2 => (key_strategy(), 0usize..4)
            .prop_map(|(key, ops_later)| CacheOp::Preload { key, ops_later }),
    ]
}

fn new_cache(builder: &Arc<CountingBuilder>) -> ViewCache<String> {
    ViewCache::<String>::new(builder.clone(), DEFAULT_EXPIRATION)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // A get within the expiry window builds only when the key is not cached,
    // and repeated gets return the same instance until the key is invalidated.
    #[test]
    fn prop_get_builds_only_on_miss(
        ops in prop::collection::vec(cache_op_strategy(), 1..60)
    ) {
        let builder = CountingBuilder::new();
        let mut cache = new_cache(&builder);
        let mut served: HashMap<String, Arc<String>> = HashMap::new();
        let mut expected_builds = 0;

        for op in ops {
            match op {
                CacheOp::Get { key } => {
                    let view = cache.get(&key).unwrap();
                    match served.get(&key) {
                        Some(previous) => prop_assert!(Arc::ptr_eq(previous, &view)),
                        None => {
                            expected_builds += 1;
                            served.insert(key, view);
                        }
                    }
                }
                CacheOp::Invalidate { key } => {
                    let removed = cache.invalidate(&key);
                    prop_assert_eq!(removed, served.remove(&key).is_some());
                }
                CacheOp::Preload { .. } => {}
            }
            prop_assert_eq!(builder.builds(), expected_builds);
            prop_assert_eq!(cache.len(), served.len());
        }
    }

    // Invalidating one key never disturbs the entries of other keys.
    #[test]
    fn prop_invalidate_leaves_other_keys(
        keys in prop::collection::hash_set(key_strategy(), 1..4),
        target in key_strategy()
    ) {
        let builder = CountingBuilder::new();
        let mut cache = new_cache(&builder);
        let before: HashMap<String, Arc<String>> = keys
            .iter()
            .map(|key| (key.clone(), cache.get(key).unwrap()))
            .collect();

        cache.invalidate(&target);

        for (key, view) in &before {
            if *key == target {
                prop_assert!(!cache.contains(key));
            } else {
                prop_assert!(Arc::ptr_eq(view, &cache.peek(key).unwrap()));
            }
        }
    }

    // Interleaving lookups, invalidations and late preload deliveries keeps at
    // most one entry per key, and never admits a proposal for a key
    // invalidated after its batch started.
    #[test]
    fn prop_preload_never_resurrects_invalidated_views(
        ops in prop::collection::vec(cache_op_strategy(), 1..60)
    ) {
        let builder = CountingBuilder::new();
        let mut cache = new_cache(&builder);
        let mut in_flight: Vec<(usize, PreloadBatch, bool)> = Vec::new();
        let mut keys_seen: HashSet<String> = HashSet::new();

        for (step, op) in ops.into_iter().enumerate() {
            match op {
                CacheOp::Get { key } => {
                    cache.get(&key).unwrap();
                    keys_seen.insert(key);
                }
                CacheOp::Invalidate { key } => {
                    cache.invalidate(&key);
                    for (_, batch, invalidated) in in_flight.iter_mut() {
                        if batch.keys.contains(&key) {
                            *invalidated = true;
                        }
                    }
                }
                CacheOp::Preload { key, ops_later } => {
                    let batch = cache.begin_preload([key.clone()]);
                    in_flight.push((step + ops_later, batch, false));
                    keys_seen.insert(key);
                }
            }

            let (due, pending): (Vec<_>, Vec<_>) =
                in_flight.drain(..).partition(|(deliver_at, _, _)| *deliver_at <= step);
            in_flight = pending;

            for (_, batch, invalidated) in due {
                for key in &batch.keys {
                    let accepted = cache.accept(Proposal {
                        key: key.clone(),
                        generation: batch.generation,
                        value: format!("{key}@preload"),
                    });
                    if invalidated {
                        prop_assert!(!accepted, "stale proposal for {} accepted", key);
                    }
                }
            }

            prop_assert!(cache.len() <= keys_seen.len());
            let stats = cache.stats();
            prop_assert_eq!(stats.total_entries, cache.len());
        }
    }
}
