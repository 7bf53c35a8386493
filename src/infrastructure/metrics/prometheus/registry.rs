//! Label-keyed metric storage.
//!
//! The registry owns every metric family created at startup and hands out
//! cheap handles for the hot path. Series are stored in `DashMap`s keyed by
//! the tuple of label values in declared order, so increments to unrelated
//! label combinations never contend beyond shard granularity. Counters are
//! single `AtomicU64`s; histogram cells are plain structs mutated under the
//! map's per-entry exclusive guard, which keeps every snapshot read of a
//! series internally consistent.

use crate::domain::MetricError;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// What a metric family accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Histogram,
}

/// Immutable description of one metric family: unique name, help text, kind,
/// declared label names, and (for histograms) the bucket upper bounds.
#[derive(Debug, Clone)]
pub struct MetricDefinition {
    name: String,
    help: String,
    kind: MetricKind,
    label_names: Vec<String>,
    buckets: Vec<f64>,
}

impl MetricDefinition {
    pub fn counter(name: &str, help: &str, label_names: &[&str]) -> Self {
        MetricDefinition {
            name: name.to_string(),
            help: help.to_string(),
            kind: MetricKind::Counter,
            label_names: label_names.iter().map(|n| n.to_string()).collect(),
            buckets: Vec::new(),
        }
    }

    pub fn histogram(name: &str, help: &str, label_names: &[&str], buckets: &[f64]) -> Self {
        MetricDefinition {
            name: name.to_string(),
            help: help.to_string(),
            kind: MetricKind::Histogram,
            label_names: label_names.iter().map(|n| n.to_string()).collect(),
            buckets: buckets.to_vec(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Map the supplied labels onto the declared names, producing the series
    /// key (label values in declared order).
    ///
    /// The label names must match the declared set exactly: no missing, no
    /// extra.
    fn series_key(&self, labels: &[(&str, &str)]) -> Result<Vec<String>, MetricError> {
        if labels.len() == self.label_names.len() {
            let mut key = Vec::with_capacity(labels.len());
            for name in &self.label_names {
                match labels.iter().find(|(k, _)| k == name) {
                    Some((_, value)) => key.push((*value).to_string()),
                    None => break,
                }
            }
            if key.len() == self.label_names.len() {
                return Ok(key);
            }
        }
        Err(MetricError::LabelSetMismatch {
            metric: self.name.clone(),
            expected: self.label_names.clone(),
            got: labels.iter().map(|(k, _)| k.to_string()).collect(),
        })
    }
}

struct CounterFamily {
    def: MetricDefinition,
    series: DashMap<Vec<String>, AtomicU64>,
}

struct HistogramCell {
    bucket_counts: Vec<u64>,
    count: u64,
    sum: f64,
}

impl HistogramCell {
    fn new(bucket_len: usize) -> Self {
        HistogramCell {
            bucket_counts: vec![0; bucket_len],
            count: 0,
            sum: 0.0,
        }
    }
}

struct HistogramFamily {
    def: MetricDefinition,
    series: DashMap<Vec<String>, HistogramCell>,
}

enum Family {
    Counter(Arc<CounterFamily>),
    Histogram(Arc<HistogramFamily>),
}

impl Family {
    fn def(&self) -> &MetricDefinition {
        match self {
            Family::Counter(f) => &f.def,
            Family::Histogram(f) => &f.def,
        }
    }
}

/// Handle for incrementing one registered counter family.
#[derive(Clone)]
pub struct CounterHandle {
    family: Arc<CounterFamily>,
}

impl CounterHandle {
    /// Atomically create-or-update the series for `labels`.
    ///
    /// Fails with [`MetricError::InvalidDelta`] for negative deltas and
    /// [`MetricError::LabelSetMismatch`] for undeclared labels; in both cases
    /// nothing is recorded.
    pub fn increment(&self, labels: &[(&str, &str)], delta: i64) -> Result<(), MetricError> {
        if delta < 0 {
            return Err(MetricError::InvalidDelta(delta));
        }
        let key = self.family.def.series_key(labels)?;
        self.family
            .series
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(delta as u64, Ordering::Relaxed);
        Ok(())
    }
}

/// Handle for observing into one registered histogram family.
#[derive(Clone)]
pub struct HistogramHandle {
    family: Arc<HistogramFamily>,
}

impl HistogramHandle {
    /// Record one observation: every bucket with bound >= `value` is
    /// incremented, along with the total count and running sum. Values above
    /// the largest bound only reach the implicit +Inf total.
    pub fn observe(&self, labels: &[(&str, &str)], value: f64) -> Result<(), MetricError> {
        let key = self.family.def.series_key(labels)?;
        let buckets = &self.family.def.buckets;

        let mut entry = self
            .family
            .series
            .entry(key)
            .or_insert_with(|| HistogramCell::new(buckets.len()));
        let cell = entry.value_mut();
        for (i, bound) in buckets.iter().enumerate() {
            if value <= *bound {
                cell.bucket_counts[i] += 1;
            }
        }
        cell.count += 1;
        cell.sum += value;
        Ok(())
    }
}

/// One series as captured by [`MetricRegistry::snapshot`].
pub enum SeriesSnapshot {
    Counter {
        label_values: Vec<String>,
        value: u64,
    },
    Histogram {
        label_values: Vec<String>,
        /// `(upper_bound, cumulative_count)` pairs in bucket order.
        buckets: Vec<(f64, u64)>,
        count: u64,
        sum: f64,
    },
}

impl SeriesSnapshot {
    pub fn label_values(&self) -> &[String] {
        match self {
            SeriesSnapshot::Counter { label_values, .. } => label_values,
            SeriesSnapshot::Histogram { label_values, .. } => label_values,
        }
    }
}

/// Point-in-time view of one metric family.
pub struct FamilySnapshot {
    pub name: String,
    pub help: String,
    pub kind: MetricKind,
    pub label_names: Vec<String>,
    pub series: Vec<SeriesSnapshot>,
}

/// Point-in-time view of the whole registry, ready for rendering.
pub struct RegistrySnapshot {
    pub families: Vec<FamilySnapshot>,
}

/// Process-wide store of metric definitions and their accumulated values.
///
/// Registration happens once at startup; afterwards the registry lock is only
/// taken for snapshots, never on the recording path.
pub struct MetricRegistry {
    families: RwLock<Vec<Family>>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        MetricRegistry {
            families: RwLock::new(Vec::new()),
        }
    }

    /// Register a counter family. Fails with
    /// [`MetricError::DuplicateMetricName`] if the name is taken.
    pub fn register_counter(&self, def: MetricDefinition) -> Result<CounterHandle, MetricError> {
        let mut families = self.families.write().expect("metric registry lock poisoned");
        Self::check_name(&families, def.name())?;
        let family = Arc::new(CounterFamily {
            def,
            series: DashMap::new(),
        });
        families.push(Family::Counter(Arc::clone(&family)));
        Ok(CounterHandle { family })
    }

    /// Register a histogram family with fixed bucket bounds. Fails with
    /// [`MetricError::DuplicateMetricName`] if the name is taken.
    pub fn register_histogram(
        &self,
        def: MetricDefinition,
    ) -> Result<HistogramHandle, MetricError> {
        let mut families = self.families.write().expect("metric registry lock poisoned");
        Self::check_name(&families, def.name())?;
        let family = Arc::new(HistogramFamily {
            def,
            series: DashMap::new(),
        });
        families.push(Family::Histogram(Arc::clone(&family)));
        Ok(HistogramHandle { family })
    }

    fn check_name(families: &[Family], name: &str) -> Result<(), MetricError> {
        if families.iter().any(|f| f.def().name() == name) {
            return Err(MetricError::DuplicateMetricName(name.to_string()));
        }
        Ok(())
    }

    /// Capture an immutable view of every series.
    ///
    /// Families come out in registration order and series sorted by label
    /// values, so two snapshots of an unchanged registry render identically.
    /// Each series is read under its map entry's guard; writers are only ever
    /// blocked for the duration of one cell copy.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let families = self.families.read().expect("metric registry lock poisoned");
        let families = families
            .iter()
            .map(|family| {
                let def = family.def();
                let mut series: Vec<SeriesSnapshot> = match family {
                    Family::Counter(f) => f
                        .series
                        .iter()
                        .map(|entry| SeriesSnapshot::Counter {
                            label_values: entry.key().clone(),
                            value: entry.value().load(Ordering::Relaxed),
                        })
                        .collect(),
                    Family::Histogram(f) => f
                        .series
                        .iter()
                        .map(|entry| {
                            let cell = entry.value();
                            SeriesSnapshot::Histogram {
                                label_values: entry.key().clone(),
                                buckets: def
                                    .buckets
                                    .iter()
                                    .copied()
                                    .zip(cell.bucket_counts.iter().copied())
                                    .collect(),
                                count: cell.count,
                                sum: cell.sum,
                            }
                        })
                        .collect(),
                };
                series.sort_by(|a, b| a.label_values().cmp(b.label_values()));
                FamilySnapshot {
                    name: def.name.clone(),
                    help: def.help.clone(),
                    kind: def.kind,
                    label_names: def.label_names.clone(),
                    series,
                }
            })
            .collect();
        RegistrySnapshot { families }
    }
}
