use eframe::egui::Ui;
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::state::{Trace, ViewState};

// ---------------------------------------------------------------------------
// Observation plot (central panel)
// ---------------------------------------------------------------------------

/// Samples as markers, the mean as a larger marker and the quantile ellipse
/// as a closed line, on equal-aspect axes.
pub fn observation_plot(ui: &mut Ui, state: &ViewState) {
    let obs = &state.output.observations;
    let ellipse = &state.output.ellipse;

    Plot::new("observation_plot")
        .legend(Legend::default())
        .x_axis_label("y_x")
        .y_axis_label("y_y")
        .data_aspect(1.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if state.is_visible(Trace::Samples) {
                let points: PlotPoints = obs.samples.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.points(
                    Points::new(points)
                        .name(state.name(Trace::Samples))
                        .color(state.color(Trace::Samples))
                        .shape(MarkerShape::Circle)
                        .radius(3.0),
                );
            }

            if state.is_visible(Trace::Mean) {
                plot_ui.points(
                    Points::new(vec![[obs.mean.x, obs.mean.y]])
                        .name(state.name(Trace::Mean))
                        .color(state.color(Trace::Mean))
                        .shape(MarkerShape::Diamond)
                        .filled(true)
                        .radius(6.0),
                );
            }

            if state.is_visible(Trace::Ellipse) {
                let points: PlotPoints = ellipse.points.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.line(
                    Line::new(points)
                        .name(state.name(Trace::Ellipse))
                        .color(state.color(Trace::Ellipse))
                        .width(1.5),
                );
            }
        });
}
