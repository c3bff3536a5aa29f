use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::error::RentalRegimeError;
use crate::inputs::SimulationInputs;
use crate::law::TaxLaw;
use crate::simulation::{simulate_with_law, SimulationReport};
use crate::RentalRegimeResult;

/// Entries kept by `SimulationCache::new` before the cache starts over.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Memoizes full reports on the complete input tuple for one fixed law.
///
/// A presentation layer re-rendering with unchanged inputs gets the same
/// shared report back instead of re-running the year loops. The cache holds
/// at most `capacity` reports; inserting past that drops every entry first.
/// Reports already handed out stay alive through their `Arc`.
#[derive(Debug)]
pub struct SimulationCache {
    law: TaxLaw,
    capacity: usize,
    entries: FxHashMap<SimulationInputs, Arc<SimulationReport>>,
    hits: u64,
    misses: u64,
}

impl SimulationCache {
    /// Validates `law` once; every cached run uses it.
    pub fn new(law: TaxLaw) -> RentalRegimeResult<Self> {
        Self::with_capacity(law, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(law: TaxLaw, capacity: usize) -> RentalRegimeResult<Self> {
        law.validate()?;
        if capacity == 0 {
            return Err(RentalRegimeError::InvalidInput {
                field: "capacity".into(),
                reason: "Cache must hold at least one report".into(),
            });
        }
        Ok(Self {
            law,
            capacity,
            entries: FxHashMap::default(),
            hits: 0,
            misses: 0,
        })
    }

    pub fn get_or_simulate(
        &mut self,
        inputs: &SimulationInputs,
    ) -> RentalRegimeResult<Arc<SimulationReport>> {
        if let Some(report) = self.entries.get(inputs) {
            self.hits += 1;
            tracing::trace!(hits = self.hits, "simulation cache hit");
            return Ok(Arc::clone(report));
        }

        self.misses += 1;
        tracing::debug!(
            misses = self.misses,
            cached = self.entries.len(),
            "simulation cache miss"
        );
        let report = Arc::new(simulate_with_law(inputs, &self.law)?);
        if self.entries.len() >= self.capacity {
            tracing::debug!(capacity = self.capacity, "simulation cache full, starting over");
            self.entries.clear();
        }
        self.entries.insert(inputs.clone(), Arc::clone(&report));
        Ok(report)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
