use std::collections::BTreeSet;

use crate::analytics::views::{render, DashboardViews};
use crate::color::ColorMap;
use crate::data::filter::FilterSelection;
use crate::data::model::RecordStore;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The four dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    SalesDiscounts,
    EngagementRatings,
    MarketingInsights,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::Overview,
        Tab::SalesDiscounts,
        Tab::EngagementRatings,
        Tab::MarketingInsights,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::SalesDiscounts => "Sales & Discounts",
            Tab::EngagementRatings => "Engagement & Ratings",
            Tab::MarketingInsights => "Marketing Insights",
        }
    }
}

/// Stable category colours, one map per categorical column the charts use.
#[derive(Debug, Clone, Default)]
pub struct CategoryColors {
    pub gender: ColorMap,
    pub city: ColorMap,
    pub satisfaction: ColorMap,
    pub channel: ColorMap,
    pub lead_source: ColorMap,
}

impl CategoryColors {
    fn from_store(store: &RecordStore) -> Self {
        CategoryColors {
            gender: ColorMap::new(&store.genders),
            city: ColorMap::new(&store.cities),
            satisfaction: ColorMap::new(&store.satisfaction_levels),
            channel: ColorMap::new(&store.acquisition_channels),
            lead_source: ColorMap::new(&store.lead_sources),
        }
    }
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct DashboardState {
    /// Loaded dataset (None until the user opens a file).
    pub store: Option<RecordStore>,

    /// Current filter choices; meaningful only while a store is loaded.
    pub selection: Option<FilterSelection>,

    /// Views for the current selection (rebuilt on every filter change).
    pub views: Option<DashboardViews>,

    /// Per-column category colours.
    pub colors: CategoryColors,

    /// Which tab is showing.
    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl DashboardState {
    /// Ingest a newly loaded store: select everything, build colours,
    /// compute the initial views.
    pub fn set_store(&mut self, store: RecordStore) {
        self.selection = Some(FilterSelection::select_all(&store));
        self.colors = CategoryColors::from_store(&store);
        self.store = Some(store);
        self.status_message = None;
        self.recompute();
    }

    /// Rebuild all views from the current selection. One synchronous pass,
    /// called on every control change.
    pub fn recompute(&mut self) {
        self.views = match (&self.store, &self.selection) {
            (Some(store), Some(selection)) => Some(render(store, selection)),
            _ => None,
        };
    }

    /// Toggle one gender in the filter.
    pub fn toggle_gender(&mut self, value: &str) {
        if let Some(sel) = &mut self.selection {
            toggle(&mut sel.genders, value);
            self.recompute();
        }
    }

    /// Toggle one city in the filter.
    pub fn toggle_city(&mut self, value: &str) {
        if let Some(sel) = &mut self.selection {
            toggle(&mut sel.cities, value);
            self.recompute();
        }
    }

    /// Replace the gender set wholesale (All / None buttons).
    pub fn set_genders(&mut self, values: BTreeSet<String>) {
        if let Some(sel) = &mut self.selection {
            sel.genders = values;
            self.recompute();
        }
    }

    /// Replace the city set wholesale.
    pub fn set_cities(&mut self, values: BTreeSet<String>) {
        if let Some(sel) = &mut self.selection {
            sel.cities = values;
            self.recompute();
        }
    }

    /// Set the age range, clamped to the store's span and normalized so
    /// the bounds can never invert through the UI.
    pub fn set_age_range(&mut self, lo: i64, hi: i64) {
        let span = self.store.as_ref().and_then(|s| s.age_span);
        if let (Some(sel), Some((min, max))) = (&mut self.selection, span) {
            let lo = lo.clamp(min, max);
            let hi = hi.clamp(min, max);
            sel.age_range = (lo.min(hi), lo.max(hi));
            self.recompute();
        }
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CustomerRecord;

    fn rec(gender: &str, city: &str, age: i64) -> CustomerRecord {
        CustomerRecord {
            gender: gender.into(),
            city: city.into(),
            age,
            net_sales: 100.0,
            items_purchased: 1,
            discount_amount: 5.0,
            satisfaction_level: "Neutral".into(),
            engagement_score: 5.0,
            average_rating: 3.0,
            repeat_purchase_intent: "Maybe".into(),
            acquisition_channel: "Organic".into(),
            lead_source: "Web".into(),
        }
    }

    #[test]
    fn set_store_selects_everything() {
        let mut state = DashboardState::default();
        state.set_store(RecordStore::from_records(vec![
            rec("M", "NYC", 30),
            rec("F", "LA", 40),
        ]));
        let views = state.views.as_ref().unwrap();
        assert_eq!(views.matching, 2);
    }

    #[test]
    fn toggling_a_gender_recomputes_views() {
        let mut state = DashboardState::default();
        state.set_store(RecordStore::from_records(vec![
            rec("M", "NYC", 30),
            rec("F", "NYC", 40),
        ]));
        state.toggle_gender("F");
        assert_eq!(state.views.as_ref().unwrap().matching, 1);
        state.toggle_gender("F");
        assert_eq!(state.views.as_ref().unwrap().matching, 2);
    }

    #[test]
    fn age_range_cannot_invert_through_the_ui() {
        let mut state = DashboardState::default();
        state.set_store(RecordStore::from_records(vec![
            rec("M", "NYC", 20),
            rec("F", "NYC", 60),
        ]));
        state.set_age_range(55, 25);
        let sel = state.selection.as_ref().unwrap();
        assert_eq!(sel.age_range, (25, 55));
        assert!(sel.validate_range().is_ok());
    }
}
