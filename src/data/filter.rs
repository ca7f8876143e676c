use std::collections::BTreeSet;

use super::model::{DataError, RecordStore};

// ---------------------------------------------------------------------------
// Filter predicate: selected genders, cities, and an inclusive age range
// ---------------------------------------------------------------------------

/// The user's current filter choices. Re-created on every interaction;
/// an empty gender or city set selects nothing (supported, not an error).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub genders: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    /// Inclusive `[lo, hi]` age bounds.
    pub age_range: (i64, i64),
}

impl FilterSelection {
    /// A selection that passes every row of the store: all genders, all
    /// cities, the full age span.
    pub fn select_all(store: &RecordStore) -> Self {
        FilterSelection {
            genders: store.genders.clone(),
            cities: store.cities.clone(),
            age_range: store.age_span.unwrap_or((0, 0)),
        }
    }

    /// Reject an inverted age range. The UI clamps slider inputs so this
    /// only fires on programmatic misuse.
    pub fn validate_range(&self) -> Result<(), DataError> {
        let (lo, hi) = self.age_range;
        if lo > hi {
            return Err(DataError::InvalidRange { lo, hi });
        }
        Ok(())
    }

    /// Return indices of records that pass all three predicates:
    /// gender ∈ genders, city ∈ cities, lo ≤ age ≤ hi.
    pub fn matching_indices(&self, store: &RecordStore) -> Vec<usize> {
        let (lo, hi) = self.age_range;
        store
            .records
            .iter()
            .enumerate()
            .filter(|(_, rec)| {
                self.genders.contains(&rec.gender)
                    && self.cities.contains(&rec.city)
                    && rec.age >= lo
                    && rec.age <= hi
            })
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CustomerRecord;

    fn rec(gender: &str, city: &str, age: i64, sales: f64) -> CustomerRecord {
        CustomerRecord {
            gender: gender.into(),
            city: city.into(),
            age,
            net_sales: sales,
            items_purchased: 1,
            discount_amount: 0.0,
            satisfaction_level: "Neutral".into(),
            engagement_score: 0.0,
            average_rating: 3.0,
            repeat_purchase_intent: "Maybe".into(),
            acquisition_channel: "Organic".into(),
            lead_source: "Web".into(),
        }
    }

    fn sample_store() -> RecordStore {
        RecordStore::from_records(vec![
            rec("M", "NYC", 30, 100.0),
            rec("F", "NYC", 40, 200.0),
            rec("M", "LA", 50, 150.0),
        ])
    }

    fn set(vals: &[&str]) -> BTreeSet<String> {
        vals.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn every_match_satisfies_all_predicates() {
        let store = sample_store();
        let sel = FilterSelection {
            genders: set(&["M"]),
            cities: set(&["NYC", "LA"]),
            age_range: (25, 50),
        };
        let idx = sel.matching_indices(&store);
        assert_eq!(idx, vec![0, 2]);
        for &i in &idx {
            let r = &store.records[i];
            assert!(sel.genders.contains(&r.gender));
            assert!(sel.cities.contains(&r.city));
            assert!(r.age >= 25 && r.age <= 50);
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let store = sample_store();
        let sel = FilterSelection {
            genders: set(&["M", "F"]),
            cities: set(&["NYC"]),
            age_range: (0, 100),
        };
        let once = sel.matching_indices(&store);
        let sub = RecordStore::from_records(
            once.iter().map(|&i| store.records[i].clone()).collect(),
        );
        let twice = sel.matching_indices(&sub);
        assert_eq!(twice.len(), once.len());
        for (a, &b) in twice.iter().zip(once.iter()) {
            assert_eq!(sub.records[*a], store.records[b]);
        }
    }

    #[test]
    fn full_selection_returns_all_rows() {
        let store = sample_store();
        let sel = FilterSelection::select_all(&store);
        assert_eq!(sel.matching_indices(&store), vec![0, 1, 2]);
    }

    #[test]
    fn empty_gender_set_yields_empty_result() {
        let store = sample_store();
        let sel = FilterSelection {
            genders: BTreeSet::new(),
            cities: set(&["NYC", "LA"]),
            age_range: (0, 100),
        };
        assert!(sel.matching_indices(&store).is_empty());
    }

    #[test]
    fn inverted_age_range_is_rejected() {
        let sel = FilterSelection {
            genders: set(&["M"]),
            cities: set(&["NYC"]),
            age_range: (50, 25),
        };
        assert!(matches!(
            sel.validate_range(),
            Err(DataError::InvalidRange { lo: 50, hi: 25 })
        ));
    }
}
