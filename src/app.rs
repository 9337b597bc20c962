use eframe::egui;

use crate::state::ViewerState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CubeViewerApp {
    pub state: ViewerState,
}

impl CubeViewerApp {
    pub fn new(state: ViewerState) -> Self {
        Self { state }
    }
}

impl eframe::App for CubeViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Right side panel: colour legend ----
        egui::SidePanel::right("colorbar_panel")
            .default_width(110.0)
            .resizable(false)
            .show(ctx, |ui| {
                panels::colorbar_panel(ui, &self.state);
            });

        // ---- Central panel: heatmap ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::heatmap_plot(ui, &mut self.state);
        });
    }
}
