use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::analytics::views::DashboardViews;
use crate::state::{CategoryColors, DashboardState, Tab};

use super::charts;

// ---------------------------------------------------------------------------
// Central panel: tab strip + active tab content
// ---------------------------------------------------------------------------

/// Render the tab selector and the active tab's charts.
pub fn central_panel(ui: &mut Ui, state: &mut DashboardState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            if ui
                .selectable_label(state.active_tab == tab, tab.title())
                .clicked()
            {
                state.active_tab = tab;
            }
        }
    });
    ui.separator();

    let views = match &state.views {
        Some(v) => v,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a data file to explore customer sales  (File → Open…)");
            });
            return;
        }
    };

    if views.matching == 0 {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No records match the current filters.");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.active_tab {
            Tab::Overview => overview_tab(ui, views, &state.colors),
            Tab::SalesDiscounts => sales_tab(ui, views, &state.colors),
            Tab::EngagementRatings => engagement_tab(ui, views, &state.colors),
            Tab::MarketingInsights => marketing_tab(ui, views, &state.colors),
        });
}

// ---------------------------------------------------------------------------
// Tab 1: Overview
// ---------------------------------------------------------------------------

fn overview_tab(ui: &mut Ui, views: &DashboardViews, colors: &CategoryColors) {
    ui.heading("Customer Overview");

    section(ui, "Summary statistics by gender and city");
    egui::Grid::new("summary_table")
        .striped(true)
        .min_col_width(96.0)
        .show(ui, |ui: &mut Ui| {
            for header in ["Gender", "City", "Net Sales", "Items Purchased"] {
                ui.label(RichText::new(header).strong());
            }
            ui.end_row();
            for row in &views.overview.summary {
                ui.label(&row.gender);
                ui.label(&row.city);
                ui.label(format!("{:.2}", row.mean_net_sales));
                ui.label(format!("{:.2}", row.mean_items_purchased));
                ui.end_row();
            }
        });

    if let Some(hist) = &views.overview.age_histogram {
        section(ui, "Age Distribution by Gender");
        charts::histogram_chart(ui, "age_hist", hist, &colors.gender, "Age");
    }

    if let Some(hist) = &views.overview.sales_histogram {
        section(ui, "Net Sales by City");
        charts::histogram_chart(ui, "sales_hist", hist, &colors.city, "Net Sales");
    }
}

// ---------------------------------------------------------------------------
// Tab 2: Sales & Discounts
// ---------------------------------------------------------------------------

fn sales_tab(ui: &mut Ui, views: &DashboardViews, colors: &CategoryColors) {
    ui.heading("Sales & Discount Analysis");

    section(ui, "Sales vs Discount Scatter");
    charts::scatter_chart(
        ui,
        "discount_scatter",
        &views.sales.discount_scatter,
        &colors.gender,
        "Discount Amount",
        "Net Sales",
    );

    section(ui, "Average Net Sales per City");
    charts::category_bar_chart(
        ui,
        "city_avg",
        &views.sales.city_averages,
        &colors.city,
        "Net Sales",
    );

    section(ui, "Discount Usage by Satisfaction");
    charts::box_chart(
        ui,
        "discount_box",
        &views.sales.discount_by_satisfaction,
        &colors.satisfaction,
        "Discount Amount",
    );
}

// ---------------------------------------------------------------------------
// Tab 3: Engagement & Ratings
// ---------------------------------------------------------------------------

fn engagement_tab(ui: &mut Ui, views: &DashboardViews, colors: &CategoryColors) {
    ui.heading("Engagement & Ratings");

    section(ui, "Engagement Score by Gender and Intent");
    charts::box_chart(
        ui,
        "engagement_box",
        &views.engagement.engagement_boxes,
        &colors.gender,
        "Engagement Score",
    );

    if let Some(hist) = &views.engagement.rating_histogram {
        section(ui, "Average Rating Distribution");
        charts::histogram_chart(
            ui,
            "rating_hist",
            hist,
            &colors.satisfaction,
            "Average Rating",
        );
    }

    section(ui, "Correlation Heatmap");
    charts::correlation_grid(ui, &views.engagement.correlation);
}

// ---------------------------------------------------------------------------
// Tab 4: Marketing Insights
// ---------------------------------------------------------------------------

fn marketing_tab(ui: &mut Ui, views: &DashboardViews, colors: &CategoryColors) {
    ui.heading("Marketing Channels & Acquisition");

    section(ui, "Acquisition Channel Distribution");
    charts::pie_chart(ui, &views.marketing.channel_counts, &colors.channel);

    section(ui, "Lead Source vs Net Sales");
    charts::box_chart(
        ui,
        "lead_source_box",
        &views.marketing.lead_source_sales,
        &colors.lead_source,
        "Net Sales",
    );

    section(ui, "Satisfaction Level by Channel");
    let pivot = &views.marketing.channel_satisfaction;
    egui::Grid::new("pivot_table")
        .striped(true)
        .min_col_width(96.0)
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new("Channel").strong());
            for col in &pivot.columns {
                ui.label(RichText::new(col).strong());
            }
            ui.end_row();
            for (channel, shares) in &pivot.rows {
                ui.label(channel);
                for share in shares {
                    ui.label(format!("{share:.2}"));
                }
                ui.end_row();
            }
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(8.0);
    ui.label(RichText::new(title).strong());
    ui.add_space(2.0);
}
