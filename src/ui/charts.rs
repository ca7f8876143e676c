use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};

use crate::analytics::histogram::Histogram;
use crate::analytics::views::{CorrelationMatrix, GroupedBox, ScatterSeries};
use crate::color::ColorMap;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Histogram (grouped bars, one colored series per category)
// ---------------------------------------------------------------------------

/// Render a split histogram: bars of each category are placed side by side
/// within every bin.
pub fn histogram_chart(ui: &mut Ui, id: &str, hist: &Histogram, colors: &ColorMap, x_label: &str) {
    let n_series = hist.series.len().max(1);
    let sub_width = hist.bin_width / n_series as f64;

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label("Count")
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            for (k, series) in hist.series.iter().enumerate() {
                let color = colors.color_for(&series.label);
                let bars: Vec<Bar> = series
                    .counts
                    .iter()
                    .enumerate()
                    .filter(|(_, &c)| c > 0)
                    .map(|(i, &c)| {
                        let x = hist.start
                            + i as f64 * hist.bin_width
                            + (k as f64 + 0.5) * sub_width;
                        Bar::new(x, c as f64).width(sub_width * 0.9).fill(color)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&series.label).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter with per-group trend lines
// ---------------------------------------------------------------------------

pub fn scatter_chart(
    ui: &mut Ui,
    id: &str,
    series: &[ScatterSeries],
    colors: &ColorMap,
    x_label: &str,
    y_label: &str,
) {
    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            for s in series {
                let color = colors.color_for(&s.label);
                let points: PlotPoints = s.points.iter().copied().collect();
                plot_ui.points(Points::new(points).name(&s.label).color(color).radius(2.5));

                if let Some(t) = &s.trend {
                    let line: PlotPoints = [
                        [t.x_min, t.slope * t.x_min + t.intercept],
                        [t.x_max, t.slope * t.x_max + t.intercept],
                    ]
                    .into_iter()
                    .collect();
                    plot_ui.line(Line::new(line).name(&s.label).color(color).width(1.5));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Labeled bar chart (one bar per category)
// ---------------------------------------------------------------------------

pub fn category_bar_chart(
    ui: &mut Ui,
    id: &str,
    entries: &[(String, f64)],
    colors: &ColorMap,
    y_label: &str,
) {
    Plot::new(id)
        .legend(Legend::default())
        .y_axis_label(y_label)
        .show_x(false)
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            for (i, (label, value)) in entries.iter().enumerate() {
                let color = colors.color_for(label);
                let bar = Bar::new(i as f64, *value).width(0.7).fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(label).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Grouped box plot
// ---------------------------------------------------------------------------

/// One box per group. Whiskers stop at the 1.5×IQR fences (clipped to the
/// observed min/max), matching the usual box-plot convention.
pub fn box_chart(ui: &mut Ui, id: &str, boxes: &[GroupedBox], colors: &ColorMap, y_label: &str) {
    Plot::new(id)
        .legend(Legend::default())
        .y_axis_label(y_label)
        .show_x(false)
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            for (i, b) in boxes.iter().enumerate() {
                let q = &b.quartiles;
                let color = colors.color_for(&b.label);
                let spread = BoxSpread::new(
                    q.min.max(q.lower_fence),
                    q.q1,
                    q.median,
                    q.q3,
                    q.max.min(q.upper_fence),
                );
                let elem = BoxElem::new(i as f64, spread)
                    .name(&b.label)
                    .fill(color.gamma_multiply(0.4))
                    .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&b.label).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap (colored grid)
// ---------------------------------------------------------------------------

pub fn correlation_grid(ui: &mut Ui, corr: &CorrelationMatrix) {
    egui::Grid::new("correlation_grid")
        .striped(true)
        .min_col_width(72.0)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for label in &corr.labels {
                ui.label(RichText::new(*label).strong());
            }
            ui.end_row();

            for (i, label) in corr.labels.iter().enumerate() {
                ui.label(RichText::new(*label).strong());
                for j in 0..corr.labels.len() {
                    let r = corr.values[i][j];
                    if r.is_nan() {
                        ui.label(RichText::new("–").weak());
                    } else {
                        ui.label(
                            RichText::new(format!("{r:.2}"))
                                .background_color(correlation_color(r))
                                .color(Color32::BLACK),
                        );
                    }
                }
                ui.end_row();
            }
        });
}

/// White at 0, saturated blue at +1, saturated red at −1.
fn correlation_color(r: f64) -> Color32 {
    let t = (r.abs().clamp(0.0, 1.0) * 255.0) as u8;
    let rest = 255 - t / 2;
    if r >= 0.0 {
        Color32::from_rgb(rest, rest, 255)
    } else {
        Color32::from_rgb(255, rest, rest)
    }
}

// ---------------------------------------------------------------------------
// Pie chart (painter-drawn)
// ---------------------------------------------------------------------------

pub fn pie_chart(ui: &mut Ui, counts: &[(String, usize)], colors: &ColorMap) {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) =
            ui.allocate_painter(Vec2::splat(CHART_HEIGHT), Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.45;

        let mut angle = -std::f32::consts::FRAC_PI_2;
        for (label, n) in counts {
            let sweep = (*n as f32 / total as f32) * std::f32::consts::TAU;
            let color = colors.color_for(label);

            // Triangle-fan approximation of the slice.
            let steps = ((sweep / 0.05).ceil() as usize).max(2);
            let mut points = vec![center];
            for s in 0..=steps {
                let a = angle + sweep * s as f32 / steps as f32;
                points.push(center + Vec2::new(a.cos(), a.sin()) * radius);
            }
            painter.add(egui::Shape::convex_polygon(
                points,
                color,
                Stroke::new(1.0, Color32::WHITE),
            ));
            angle += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for (label, n) in counts {
                let share = 100.0 * *n as f64 / total as f64;
                ui.label(
                    RichText::new(format!("⏺ {label}: {n} ({share:.1}%)"))
                        .color(colors.color_for(label)),
                );
            }
        });
    });
}
