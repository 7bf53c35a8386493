//! Text exposition rendering.
//!
//! Serializes a [`RegistrySnapshot`] into the Prometheus text format
//! (version 0.0.4): a `# HELP` and `# TYPE` comment per family, then one
//! line per series, with histograms expanded into cumulative `_bucket`
//! lines plus `_sum` and `_count`. Output is deterministic for an unchanged
//! snapshot; the only failure mode is a non-finite accumulated value.

use super::registry::{MetricKind, RegistrySnapshot, SeriesSnapshot};
use crate::domain::MetricError;
use std::fmt::Write;

/// Escape a label value for the exposition format.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// `name="value"` pairs joined with commas, in declared label order.
fn label_pairs(names: &[String], values: &[String]) -> String {
    names
        .iter()
        .zip(values.iter())
        .map(|(name, value)| format!("{}=\"{}\"", name, escape_label(value)))
        .collect::<Vec<_>>()
        .join(",")
}

fn write_sample(out: &mut String, name: &str, labels: &str, value: impl std::fmt::Display) {
    if labels.is_empty() {
        let _ = writeln!(out, "{} {}", name, value);
    } else {
        let _ = writeln!(out, "{}{{{}}} {}", name, labels, value);
    }
}

/// Render the snapshot into exposition text.
///
/// Fails with [`MetricError::Render`] only for serialization-impossible
/// states (a NaN or infinite sum); every well-formed snapshot renders.
pub fn render(snapshot: &RegistrySnapshot) -> Result<String, MetricError> {
    let mut out = String::new();
    for family in &snapshot.families {
        let _ = writeln!(out, "# HELP {} {}", family.name, family.help);
        let type_name = match family.kind {
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
        };
        let _ = writeln!(out, "# TYPE {} {}", family.name, type_name);

        for series in &family.series {
            match series {
                SeriesSnapshot::Counter {
                    label_values,
                    value,
                } => {
                    let labels = label_pairs(&family.label_names, label_values);
                    write_sample(&mut out, &family.name, &labels, value);
                }
                SeriesSnapshot::Histogram {
                    label_values,
                    buckets,
                    count,
                    sum,
                } => {
                    if !sum.is_finite() {
                        return Err(MetricError::Render(format!(
                            "metric `{}` accumulated a non-finite sum ({})",
                            family.name, sum
                        )));
                    }
                    let labels = label_pairs(&family.label_names, label_values);
                    let le_prefix = if labels.is_empty() {
                        String::new()
                    } else {
                        format!("{},", labels)
                    };
                    for (bound, bucket_count) in buckets {
                        let _ = writeln!(
                            out,
                            "{}_bucket{{{}le=\"{}\"}} {}",
                            family.name, le_prefix, bound, bucket_count
                        );
                    }
                    let _ = writeln!(
                        out,
                        "{}_bucket{{{}le=\"+Inf\"}} {}",
                        family.name, le_prefix, count
                    );
                    write_sample(&mut out, &format!("{}_sum", family.name), &labels, sum);
                    write_sample(&mut out, &format!("{}_count", family.name), &labels, count);
                }
            }
        }
    }
    Ok(out)
}
