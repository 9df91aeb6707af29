use eframe::egui::Color32;

use crate::pipeline::RunOutput;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// One of the three overlaid plot traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    Samples,
    Mean,
    Ellipse,
}

impl Trace {
    pub const ALL: [Trace; 3] = [Trace::Samples, Trace::Mean, Trace::Ellipse];

    fn index(self) -> usize {
        match self {
            Trace::Samples => 0,
            Trace::Mean => 1,
            Trace::Ellipse => 2,
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            Trace::Samples => SAMPLES_COLOR,
            Trace::Mean => MEAN_COLOR,
            Trace::Ellipse => ELLIPSE_COLOR,
        }
    }
}

const SAMPLES_COLOR: Color32 = Color32::from_rgb(66, 135, 245);
const MEAN_COLOR: Color32 = Color32::from_rgb(235, 64, 52);
const ELLIPSE_COLOR: Color32 = Color32::from_rgb(46, 184, 92);

/// The full UI state, independent of rendering.
pub struct ViewState {
    /// Result of the pipeline run being displayed.
    pub output: RunOutput,

    /// Per-trace visibility toggles.
    visible: [bool; 3],
}

impl ViewState {
    pub fn new(output: RunOutput) -> Self {
        Self {
            output,
            visible: [true; 3],
        }
    }

    pub fn is_visible(&self, trace: Trace) -> bool {
        self.visible[trace.index()]
    }

    pub fn toggle(&mut self, trace: Trace) {
        let v = &mut self.visible[trace.index()];
        *v = !*v;
    }

    pub fn color(&self, trace: Trace) -> Color32 {
        trace.color()
    }

    /// Legend name of a trace.
    pub fn name(&self, trace: Trace) -> String {
        match trace {
            Trace::Samples => "samples".to_string(),
            Trace::Mean => "mean".to_string(),
            Trace::Ellipse => self.output.ellipse.label(),
        }
    }
}
