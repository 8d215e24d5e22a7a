use crate::domain::model::{BaziChart, BirthInput};
use crate::domain::ports::ChartCache;
use crate::utils::error::{BaziError, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Process-lifetime memo of computed charts. No eviction, no TTL.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: RwLock<HashMap<BirthInput, Arc<BaziChart>>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> BaziError {
    BaziError::InternalComputation {
        message: "chart cache lock poisoned".to_string(),
    }
}

impl ChartCache for ResultCache {
    fn get(&self, key: &BirthInput) -> Result<Option<Arc<BaziChart>>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn insert(&self, key: BirthInput, chart: BaziChart) -> Result<Arc<BaziChart>> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let stored = entries.entry(key).or_insert_with(|| Arc::new(chart));
        Ok(Arc::clone(stored))
    }

    fn len(&self) -> usize {
        match self.entries.read() {
            Ok(entries) => entries.len(),
            Err(poison) => poison.into_inner().len(),
        }
    }
}

/// Pass-through used when caching is switched off in the config.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl ChartCache for NoCache {
    fn get(&self, _key: &BirthInput) -> Result<Option<Arc<BaziChart>>> {
        Ok(None)
    }

    fn insert(&self, _key: BirthInput, chart: BaziChart) -> Result<Arc<BaziChart>> {
        Ok(Arc::new(chart))
    }

    fn len(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::compute_chart;
    use crate::domain::model::Gender;
    use std::cell::Cell;

    fn input(day: i32) -> BirthInput {
        BirthInput::new(1990, 5, day, 14, Gender::Male)
    }

    #[test]
    fn computes_once_per_key() {
        let cache = ResultCache::new();
        let calls = Cell::new(0);
        let key = input(15);

        let first = cache
            .get_or_compute(&key, || {
                calls.set(calls.get() + 1);
                compute_chart(&key)
            })
            .unwrap();
        let second = cache
            .get_or_compute(&key, || {
                calls.set(calls.get() + 1);
                compute_chart(&key)
            })
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn gender_is_part_of_the_key() {
        let cache = ResultCache::new();
        let male = input(15);
        let female = BirthInput {
            gender: Gender::Female,
            ..male
        };
        let a = cache.get_or_compute(&male, || compute_chart(&male)).unwrap();
        let b = cache.get_or_compute(&female, || compute_chart(&female)).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn failures_are_not_stored() {
        let cache = ResultCache::new();
        let bad = BirthInput::new(2023, 4, 31, 12, Gender::Female);
        assert!(cache.get_or_compute(&bad, || compute_chart(&bad)).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn first_insert_wins() {
        let cache = ResultCache::new();
        let key = input(15);
        let original = cache.insert(key, compute_chart(&key).unwrap()).unwrap();
        let other = compute_chart(&input(16)).unwrap();
        let kept = cache.insert(key, other).unwrap();
        assert!(Arc::ptr_eq(&original, &kept));
    }

    #[test]
    fn no_cache_always_recomputes() {
        let cache = NoCache;
        let calls = Cell::new(0);
        let key = input(15);
        for _ in 0..3 {
            cache
                .get_or_compute(&key, || {
                    calls.set(calls.get() + 1);
                    compute_chart(&key)
                })
                .unwrap();
        }
        assert_eq!(calls.get(), 3);
        assert!(cache.is_empty());
    }

    #[test]
    fn poisoned_lock_is_an_internal_error() {
        let cache = ResultCache::new();
        let key = input(15);
        cache.insert(key, compute_chart(&key).unwrap()).unwrap();

        std::thread::scope(|s| {
            let writer = s.spawn(|| {
                let _guard = cache.entries.write().unwrap();
                panic!("writer died holding the lock");
            });
            assert!(writer.join().is_err());
        });

        let calls = Cell::new(0);
        let other = input(16);
        let result = cache.get_or_compute(&other, || {
            calls.set(calls.get() + 1);
            compute_chart(&other)
        });
        assert!(matches!(
            result,
            Err(BaziError::InternalComputation { .. })
        ));
        assert_eq!(calls.get(), 0);
        assert!(matches!(
            cache.insert(other, compute_chart(&other).unwrap()),
            Err(BaziError::InternalComputation { .. })
        ));
        assert_eq!(cache.len(), 1);
    }
}
