use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::{Trace, ViewState};

// ---------------------------------------------------------------------------
// Left side panel – run summary
// ---------------------------------------------------------------------------

/// Render the generating parameters and output locations.
pub fn side_panel(ui: &mut Ui, state: &ViewState) {
    let out = &state.output;
    let obs = &out.observations;

    ui.heading("Observations");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Mean y");
            ui.monospace(format!("({:.4}, {:.4})", obs.mean.x, obs.mean.y));
            if let Some(idx) = obs.source_index {
                ui.label(format!("latent sample #{idx}"));
            }
            ui.add_space(4.0);

            ui.strong("Covariance y");
            ui.monospace(format!("[{:>9.4} {:>9.4}]", obs.cov[(0, 0)], obs.cov[(0, 1)]));
            ui.monospace(format!("[{:>9.4} {:>9.4}]", obs.cov[(1, 0)], obs.cov[(1, 1)]));
            ui.add_space(4.0);

            ui.strong("Ellipse");
            ui.label(format!(
                "{}, semi-axes {:.4} / {:.4}",
                out.ellipse.label(),
                out.ellipse.semi_axes[0],
                out.ellipse.semi_axes[1]
            ));
            ui.separator();

            egui::CollapsingHeader::new(RichText::new("Files").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.label(format!("z info: {}", out.z_info_path.display()));
                    ui.label(format!("y info: {}", out.y_info_path.display()));
                    ui.label(format!("y metadata: {}", out.y_metadata_path.display()));
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the trace toggles and the sample count.
pub fn top_bar(ui: &mut Ui, state: &mut ViewState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(format!("{} samples", state.output.observations.len()));
        ui.separator();

        for trace in Trace::ALL {
            let text = RichText::new(state.name(trace)).color(state.color(trace));
            if ui.selectable_label(state.is_visible(trace), text).clicked() {
                state.toggle(trace);
            }
        }
    });
}
