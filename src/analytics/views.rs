use std::collections::BTreeMap;

use crate::data::filter::FilterSelection;
use crate::data::model::{CustomerRecord, RecordStore};

use super::aggregate::{
    average_sales_by_city, channel_satisfaction_pivot, frequency_count, summary_by_group,
    GroupMeanRow, PivotTable,
};
use super::histogram::{split_histogram, Histogram};
use super::stats::{ols_fit, pearson, quartiles, Quartiles};

// ---------------------------------------------------------------------------
// Derived view types
// ---------------------------------------------------------------------------

/// Scatter points for one gender, with the fitted OLS line when the group
/// has at least two points of distinct x.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
    pub trend: Option<TrendLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    /// x extent of the group, for drawing the segment.
    pub x_min: f64,
    pub x_max: f64,
}

/// Box-plot summary for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBox {
    pub label: String,
    pub quartiles: Quartiles,
}

/// Pairwise Pearson correlations across the six numeric columns.
/// Zero-variance columns produce NaN entries, never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<&'static str>,
    pub values: Vec<Vec<f64>>,
}

/// The numeric columns entering the correlation matrix, in display order.
pub const CORRELATION_COLUMNS: [&str; 6] = [
    "Age",
    "Items Purchased",
    "Average Rating",
    "Discount Amount",
    "Net Sales",
    "Engagement Score",
];

// ---------------------------------------------------------------------------
// Per-tab view bundles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct OverviewViews {
    pub summary: Vec<GroupMeanRow>,
    pub age_histogram: Option<Histogram>,
    pub sales_histogram: Option<Histogram>,
}

#[derive(Debug, Clone, Default)]
pub struct SalesViews {
    pub discount_scatter: Vec<ScatterSeries>,
    pub city_averages: Vec<(String, f64)>,
    pub discount_by_satisfaction: Vec<GroupedBox>,
}

#[derive(Debug, Clone)]
pub struct EngagementViews {
    pub engagement_boxes: Vec<GroupedBox>,
    pub rating_histogram: Option<Histogram>,
    pub correlation: CorrelationMatrix,
}

#[derive(Debug, Clone, Default)]
pub struct MarketingViews {
    pub channel_counts: Vec<(String, usize)>,
    pub lead_source_sales: Vec<GroupedBox>,
    pub channel_satisfaction: PivotTable,
}

/// Everything the four tabs display, recomputed as one unit per filter
/// change. Pure function of (store, selection); no hidden state.
#[derive(Debug, Clone)]
pub struct DashboardViews {
    pub matching: usize,
    pub overview: OverviewViews,
    pub sales: SalesViews,
    pub engagement: EngagementViews,
    pub marketing: MarketingViews,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build all tab views for the current filter selection.
pub fn render(store: &RecordStore, selection: &FilterSelection) -> DashboardViews {
    let indices = selection.matching_indices(store);
    let rows: Vec<&CustomerRecord> = indices.iter().map(|&i| &store.records[i]).collect();

    DashboardViews {
        matching: rows.len(),
        overview: build_overview(&rows),
        sales: build_sales(&rows),
        engagement: build_engagement(&rows),
        marketing: build_marketing(&rows),
    }
}

fn build_overview(rows: &[&CustomerRecord]) -> OverviewViews {
    OverviewViews {
        summary: summary_by_group(rows),
        age_histogram: split_histogram(rows, 20, |r| r.age as f64, |r| &r.gender),
        sales_histogram: split_histogram(rows, 30, |r| r.net_sales, |r| &r.city),
    }
}

fn build_sales(rows: &[&CustomerRecord]) -> SalesViews {
    SalesViews {
        discount_scatter: scatter_by_gender(rows),
        city_averages: average_sales_by_city(rows),
        discount_by_satisfaction: boxes_by_group(
            rows,
            |r| r.satisfaction_level.clone(),
            |r| r.discount_amount,
        ),
    }
}

fn build_engagement(rows: &[&CustomerRecord]) -> EngagementViews {
    EngagementViews {
        engagement_boxes: boxes_by_group(
            rows,
            |r| format!("{} / {}", r.gender, r.repeat_purchase_intent),
            |r| r.engagement_score,
        ),
        rating_histogram: split_histogram(
            rows,
            10,
            |r| r.average_rating,
            |r| &r.satisfaction_level,
        ),
        correlation: correlation_matrix(rows),
    }
}

fn build_marketing(rows: &[&CustomerRecord]) -> MarketingViews {
    MarketingViews {
        channel_counts: frequency_count(rows, |r| &r.acquisition_channel),
        lead_source_sales: boxes_by_group(rows, |r| r.lead_source.clone(), |r| r.net_sales),
        channel_satisfaction: channel_satisfaction_pivot(rows),
    }
}

/// (Discount Amount, Net Sales) pairs per gender, plus the per-group OLS
/// trend. Groups with fewer than two points (or no x spread) get no trend.
fn scatter_by_gender(rows: &[&CustomerRecord]) -> Vec<ScatterSeries> {
    let mut by_gender: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for rec in rows {
        by_gender
            .entry(rec.gender.clone())
            .or_default()
            .push([rec.discount_amount, rec.net_sales]);
    }
    by_gender
        .into_iter()
        .map(|(label, points)| {
            let trend = ols_fit(&points).map(|(slope, intercept)| {
                let x_min = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
                let x_max = points.iter().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);
                TrendLine {
                    slope,
                    intercept,
                    x_min,
                    x_max,
                }
            });
            ScatterSeries {
                label,
                points,
                trend,
            }
        })
        .collect()
}

/// Quartile summaries of `value` grouped by `key`, in key order.
fn boxes_by_group<K, V>(rows: &[&CustomerRecord], key: K, value: V) -> Vec<GroupedBox>
where
    K: Fn(&CustomerRecord) -> String,
    V: Fn(&CustomerRecord) -> f64,
{
    let mut by_key: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for rec in rows {
        by_key.entry(key(rec)).or_default().push(value(rec));
    }
    by_key
        .into_iter()
        .filter_map(|(label, values)| {
            quartiles(&values).map(|quartiles| GroupedBox { label, quartiles })
        })
        .collect()
}

fn numeric_column(rows: &[&CustomerRecord], name: &str) -> Vec<f64> {
    rows.iter()
        .map(|r| match name {
            "Age" => r.age as f64,
            "Items Purchased" => r.items_purchased as f64,
            "Average Rating" => r.average_rating,
            "Discount Amount" => r.discount_amount,
            "Net Sales" => r.net_sales,
            "Engagement Score" => r.engagement_score,
            other => unreachable!("unknown correlation column {other}"),
        })
        .collect()
}

fn correlation_matrix(rows: &[&CustomerRecord]) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = CORRELATION_COLUMNS
        .iter()
        .map(|name| numeric_column(rows, name))
        .collect();

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        labels: CORRELATION_COLUMNS.to_vec(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn rec(gender: &str, city: &str, age: i64, sales: f64, items: i64) -> CustomerRecord {
        CustomerRecord {
            gender: gender.into(),
            city: city.into(),
            age,
            net_sales: sales,
            items_purchased: items,
            discount_amount: sales / 10.0,
            satisfaction_level: "Neutral".into(),
            engagement_score: age as f64 / 10.0,
            average_rating: 3.5,
            repeat_purchase_intent: "Maybe".into(),
            acquisition_channel: "Organic".into(),
            lead_source: "Web".into(),
        }
    }

    fn set(vals: &[&str]) -> BTreeSet<String> {
        vals.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reference_scenario_filters_and_averages() {
        // (M,NYC,30,100,5), (F,NYC,40,200,8), (M,LA,50,150,6)
        let store = RecordStore::from_records(vec![
            rec("M", "NYC", 30, 100.0, 5),
            rec("F", "NYC", 40, 200.0, 8),
            rec("M", "LA", 50, 150.0, 6),
        ]);
        let selection = FilterSelection {
            genders: set(&["M"]),
            cities: set(&["NYC", "LA"]),
            age_range: (25, 50),
        };
        let views = render(&store, &selection);
        assert_eq!(views.matching, 2);

        let avgs: BTreeMap<_, _> = views.sales.city_averages.iter().cloned().collect();
        assert_eq!(avgs["NYC"], 100.0);
        assert_eq!(avgs["LA"], 150.0);
    }

    #[test]
    fn empty_selection_yields_placeholder_views_without_panic() {
        let store = RecordStore::from_records(vec![rec("M", "NYC", 30, 100.0, 5)]);
        let selection = FilterSelection {
            genders: BTreeSet::new(),
            cities: set(&["NYC"]),
            age_range: (0, 100),
        };
        let views = render(&store, &selection);
        assert_eq!(views.matching, 0);
        assert!(views.overview.summary.is_empty());
        assert!(views.overview.age_histogram.is_none());
        assert!(views.sales.discount_scatter.is_empty());
        assert!(views.marketing.channel_counts.is_empty());
        assert!(views.engagement.correlation.values[0][0].is_nan());
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let store = RecordStore::from_records(vec![
            rec("M", "NYC", 30, 100.0, 5),
            rec("F", "NYC", 40, 200.0, 8),
            rec("M", "LA", 50, 150.0, 6),
            rec("F", "LA", 25, 80.0, 2),
        ]);
        let views = render(&store, &FilterSelection::select_all(&store));
        let corr = &views.engagement.correlation;
        let n = corr.labels.len();
        for i in 0..n {
            for j in 0..n {
                let a = corr.values[i][j];
                let b = corr.values[j][i];
                assert!(a.is_nan() && b.is_nan() || (a - b).abs() < 1e-12);
            }
        }
        // Average Rating is constant in the fixture, so its diagonal is NaN;
        // every other column varies and must sit at exactly 1.
        for (i, label) in corr.labels.iter().enumerate() {
            if *label == "Average Rating" {
                assert!(corr.values[i][i].is_nan());
            } else {
                assert!((corr.values[i][i] - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn singleton_satisfaction_group_gives_degenerate_box() {
        let mut single = rec("M", "NYC", 30, 100.0, 5);
        single.satisfaction_level = "Unhappy".into();
        single.discount_amount = 42.0;
        let store = RecordStore::from_records(vec![single, rec("F", "NYC", 40, 200.0, 8)]);

        let views = render(&store, &FilterSelection::select_all(&store));
        let unhappy = views
            .sales
            .discount_by_satisfaction
            .iter()
            .find(|b| b.label == "Unhappy")
            .unwrap();
        let q = &unhappy.quartiles;
        assert_eq!(q.min, 42.0);
        assert_eq!(q.q1, 42.0);
        assert_eq!(q.median, 42.0);
        assert_eq!(q.q3, 42.0);
        assert_eq!(q.max, 42.0);
    }

    #[test]
    fn scatter_trend_omitted_for_single_point_group() {
        let store = RecordStore::from_records(vec![
            rec("M", "NYC", 30, 100.0, 5),
            rec("F", "NYC", 40, 200.0, 8),
            rec("F", "NYC", 45, 300.0, 9),
        ]);
        let views = render(&store, &FilterSelection::select_all(&store));
        let by_label: BTreeMap<_, _> = views
            .sales
            .discount_scatter
            .iter()
            .map(|s| (s.label.clone(), s))
            .collect();
        assert!(by_label["M"].trend.is_none());
        assert!(by_label["F"].trend.is_some());
    }
}
