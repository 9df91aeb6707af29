use eframe::egui;

use crate::pipeline::RunOutput;
use crate::state::ViewState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ObservationViewer {
    pub state: ViewState,
}

impl ObservationViewer {
    pub fn new(output: RunOutput) -> Self {
        Self {
            state: ViewState::new(output),
        }
    }
}

impl eframe::App for ObservationViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: trace toggles ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: run summary ----
        egui::SidePanel::left("summary_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::observation_plot(ui, &self.state);
        });
    }
}

/// Open a window showing `output` and block until it is closed.
pub fn show(output: RunOutput) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([500.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Linear-Gaussian Observations",
        options,
        Box::new(|_cc| Ok(Box::new(ObservationViewer::new(output)))),
    )
}
