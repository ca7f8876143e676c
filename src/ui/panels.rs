use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::DashboardState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: gender and city checkboxes plus the age
/// range sliders. Every change triggers one synchronous recompute.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState) {
    ui.heading("Filters");
    ui.separator();

    let store = match &state.store {
        Some(s) => s,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let genders = store.genders.clone();
    let cities = store.cities.clone();
    let age_span = store.age_span;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            category_section(ui, state, "Gender", &genders, CategoryKind::Gender);
            category_section(ui, state, "City", &cities, CategoryKind::City);
            age_section(ui, state, age_span);
        });
}

#[derive(Clone, Copy)]
enum CategoryKind {
    Gender,
    City,
}

fn category_section(
    ui: &mut Ui,
    state: &mut DashboardState,
    title: &str,
    all_values: &BTreeSet<String>,
    kind: CategoryKind,
) {
    let selected: BTreeSet<String> = state
        .selection
        .as_ref()
        .map(|sel| match kind {
            CategoryKind::Gender => sel.genders.clone(),
            CategoryKind::City => sel.cities.clone(),
        })
        .unwrap_or_default();

    let header = format!("{title}  ({}/{})", selected.len(), all_values.len());
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    apply_set(state, kind, all_values.clone());
                }
                if ui.small_button("None").clicked() {
                    apply_set(state, kind, BTreeSet::new());
                }
            });

            for val in all_values {
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, val).changed() {
                    match kind {
                        CategoryKind::Gender => state.toggle_gender(val),
                        CategoryKind::City => state.toggle_city(val),
                    }
                }
            }
        });
}

fn apply_set(state: &mut DashboardState, kind: CategoryKind, values: BTreeSet<String>) {
    match kind {
        CategoryKind::Gender => state.set_genders(values),
        CategoryKind::City => state.set_cities(values),
    }
}

fn age_section(ui: &mut Ui, state: &mut DashboardState, age_span: Option<(i64, i64)>) {
    let Some((span_lo, span_hi)) = age_span else {
        return;
    };
    let Some(sel) = &state.selection else {
        return;
    };
    let (mut lo, mut hi) = sel.age_range;

    egui::CollapsingHeader::new(RichText::new("Age Range").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            let changed_lo = ui
                .add(egui::Slider::new(&mut lo, span_lo..=span_hi).text("Min"))
                .changed();
            let changed_hi = ui
                .add(egui::Slider::new(&mut hi, span_lo..=span_hi).text("Max"))
                .changed();
            if changed_lo || changed_hi {
                // set_age_range clamps and normalizes, so the sliders can
                // never produce an inverted range.
                state.set_age_range(lo, hi);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut DashboardState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(store) = &state.store {
            let matching = state.views.as_ref().map(|v| v.matching).unwrap_or(0);
            ui.label(format!("{} records loaded, {} matching", store.len(), matching));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut DashboardState) {
    let file = rfd::FileDialog::new()
        .set_title("Open customer sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(store) => {
                log::info!(
                    "Loaded {} customer records ({} genders, {} cities)",
                    store.len(),
                    store.genders.len(),
                    store.cities.len()
                );
                state.set_store(store);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
