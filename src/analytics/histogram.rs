use std::collections::BTreeMap;

use crate::data::model::CustomerRecord;

// ---------------------------------------------------------------------------
// Equal-width histograms split by a categorical column
// ---------------------------------------------------------------------------

/// Bucket counts for one category (one colored series in the chart).
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    pub label: String,
    pub counts: Vec<u64>,
}

/// An equal-width histogram over a numeric column, with counts kept
/// separately per category so the chart can stack or color by it.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Left edge of the first bin.
    pub start: f64,
    pub bin_width: f64,
    pub bins: usize,
    pub series: Vec<HistogramSeries>,
}

/// Bucket `value(rec)` into `bins` equal-width bins over the observed
/// range, counting separately per `category(rec)`.
///
/// Returns `None` for zero rows. A single-value domain collapses to one
/// bucket of nominal width 1.
pub fn split_histogram<V, C>(
    rows: &[&CustomerRecord],
    bins: usize,
    value: V,
    category: C,
) -> Option<Histogram>
where
    V: Fn(&CustomerRecord) -> f64,
    C: Fn(&CustomerRecord) -> &str,
{
    if rows.is_empty() || bins == 0 {
        return None;
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for rec in rows {
        let v = value(rec);
        min = min.min(v);
        max = max.max(v);
    }

    let (bins, bin_width) = if max > min {
        (bins, (max - min) / bins as f64)
    } else {
        (1, 1.0)
    };

    let mut by_category: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    for rec in rows {
        let v = value(rec);
        // The maximum lands in the last bin, not one past it.
        let idx = (((v - min) / bin_width) as usize).min(bins - 1);
        by_category
            .entry(category(rec).to_string())
            .or_insert_with(|| vec![0; bins])[idx] += 1;
    }

    Some(Histogram {
        start: min,
        bin_width,
        bins,
        series: by_category
            .into_iter()
            .map(|(label, counts)| HistogramSeries { label, counts })
            .collect(),
    })
}
