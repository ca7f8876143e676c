/// Analytics layer: pure view builders over the filtered rows.
///
/// ```text
///   filtered indices
///        │
///        ▼
///   ┌───────────┐   grouped means, histograms, box summaries,
///   │   views    │   scatter + OLS trend, Pearson matrix, pivot
///   └───────────┘
///        │
///        ▼
///   DashboardViews (one bundle per tab, rebuilt per filter change)
/// ```
///
/// Everything here is a stateless transform: same rows in, same views out.

pub mod aggregate;
pub mod histogram;
pub mod stats;
pub mod views;
