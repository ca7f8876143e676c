use std::collections::BTreeMap;

use crate::data::model::CustomerRecord;

use super::stats::round2;

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// One row of the gender × city summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMeanRow {
    pub gender: String,
    pub city: String,
    pub mean_net_sales: f64,
    pub mean_items_purchased: f64,
    pub count: usize,
}

/// Mean Net Sales and Items Purchased grouped by (Gender, City),
/// rounded to two decimals. Groups with no rows simply do not appear.
pub fn summary_by_group(rows: &[&CustomerRecord]) -> Vec<GroupMeanRow> {
    let mut acc: BTreeMap<(String, String), (f64, f64, usize)> = BTreeMap::new();
    for rec in rows {
        let e = acc
            .entry((rec.gender.clone(), rec.city.clone()))
            .or_insert((0.0, 0.0, 0));
        e.0 += rec.net_sales;
        e.1 += rec.items_purchased as f64;
        e.2 += 1;
    }
    acc.into_iter()
        .map(|((gender, city), (sales, items, n))| GroupMeanRow {
            gender,
            city,
            mean_net_sales: round2(sales / n as f64),
            mean_items_purchased: round2(items / n as f64),
            count: n,
        })
        .collect()
}

/// Mean Net Sales per City, in city order.
pub fn average_sales_by_city(rows: &[&CustomerRecord]) -> Vec<(String, f64)> {
    let mut acc: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for rec in rows {
        let e = acc.entry(rec.city.clone()).or_insert((0.0, 0));
        e.0 += rec.net_sales;
        e.1 += 1;
    }
    acc.into_iter()
        .map(|(city, (sum, n))| (city, sum / n as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// Frequencies and pivot
// ---------------------------------------------------------------------------

/// Frequency count of a categorical key over the filtered rows.
pub fn frequency_count<F>(rows: &[&CustomerRecord], key: F) -> Vec<(String, usize)>
where
    F: Fn(&CustomerRecord) -> &str,
{
    let mut acc: BTreeMap<String, usize> = BTreeMap::new();
    for rec in rows {
        *acc.entry(key(rec).to_string()).or_default() += 1;
    }
    acc.into_iter().collect()
}

/// Row-normalized contingency table: for each Customer Acquisition Channel,
/// the share of each Satisfaction Level among that channel's rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PivotTable {
    /// Column headers (the satisfaction levels present in the data).
    pub columns: Vec<String>,
    /// (channel, per-column shares). Each share row sums to 1 before the
    /// two-decimal rounding applied for display.
    pub rows: Vec<(String, Vec<f64>)>,
}

/// Normalized frequency of Satisfaction Level within each Acquisition
/// Channel, rounded to two decimals. Channels with zero rows are omitted
/// (they never enter the counts).
pub fn channel_satisfaction_pivot(rows: &[&CustomerRecord]) -> PivotTable {
    let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    let mut levels: BTreeMap<String, ()> = BTreeMap::new();
    for rec in rows {
        *counts
            .entry(rec.acquisition_channel.clone())
            .or_default()
            .entry(rec.satisfaction_level.clone())
            .or_default() += 1;
        levels.entry(rec.satisfaction_level.clone()).or_insert(());
    }

    let columns: Vec<String> = levels.into_keys().collect();
    let rows = counts
        .into_iter()
        .map(|(channel, by_level)| {
            let total: usize = by_level.values().sum();
            let shares = columns
                .iter()
                .map(|lvl| {
                    let n = by_level.get(lvl).copied().unwrap_or(0);
                    round2(n as f64 / total as f64)
                })
                .collect();
            (channel, shares)
        })
        .collect();

    PivotTable { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(gender: &str, city: &str, sales: f64, items: i64) -> CustomerRecord {
        CustomerRecord {
            gender: gender.into(),
            city: city.into(),
            age: 30,
            net_sales: sales,
            items_purchased: items,
            discount_amount: 0.0,
            satisfaction_level: "Neutral".into(),
            engagement_score: 0.0,
            average_rating: 3.0,
            repeat_purchase_intent: "Maybe".into(),
            acquisition_channel: "Organic".into(),
            lead_source: "Web".into(),
        }
    }

    #[test]
    fn group_means_partition_the_total() {
        let data = vec![
            rec("M", "NYC", 100.0, 5),
            rec("M", "NYC", 300.0, 3),
            rec("F", "LA", 50.0, 2),
        ];
        let rows: Vec<&CustomerRecord> = data.iter().collect();
        let summary = summary_by_group(&rows);
        assert_eq!(summary.len(), 2);

        // Σ(group mean × group count) == Σ(whole table)
        let regrouped: f64 = summary
            .iter()
            .map(|g| g.mean_net_sales * g.count as f64)
            .sum();
        let total: f64 = rows.iter().map(|r| r.net_sales).sum();
        assert!((regrouped - total).abs() < 1e-9);
    }

    #[test]
    fn empty_groups_are_omitted() {
        let data = vec![rec("M", "NYC", 100.0, 5)];
        let rows: Vec<&CustomerRecord> = data.iter().collect();
        let summary = summary_by_group(&rows);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].gender, "M");
    }

    #[test]
    fn city_averages_match_scenario() {
        // Rows 1 and 3 of the reference scenario: (M,NYC,100) and (M,LA,150).
        let data = vec![rec("M", "NYC", 100.0, 5), rec("M", "LA", 150.0, 6)];
        let rows: Vec<&CustomerRecord> = data.iter().collect();
        let avgs = average_sales_by_city(&rows);
        assert_eq!(avgs, vec![("LA".to_string(), 150.0), ("NYC".to_string(), 100.0)]);
    }

    #[test]
    fn pivot_rows_sum_to_one() {
        let mut a = rec("M", "NYC", 0.0, 0);
        a.acquisition_channel = "Email".into();
        a.satisfaction_level = "Satisfied".into();
        let mut b = a.clone();
        b.satisfaction_level = "Neutral".into();
        let mut c = a.clone();
        c.satisfaction_level = "Satisfied".into();
        let data = vec![a, b, c];
        let rows: Vec<&CustomerRecord> = data.iter().collect();

        let pivot = channel_satisfaction_pivot(&rows);
        assert_eq!(pivot.columns, vec!["Neutral".to_string(), "Satisfied".to_string()]);
        assert_eq!(pivot.rows.len(), 1);
        let (channel, shares) = &pivot.rows[0];
        assert_eq!(channel, "Email");
        assert_eq!(shares, &vec![0.33, 0.67]);
    }

    #[test]
    fn pivot_of_empty_input_is_empty() {
        let pivot = channel_satisfaction_pivot(&[]);
        assert!(pivot.columns.is_empty());
        assert!(pivot.rows.is_empty());
    }
}
