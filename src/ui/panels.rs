use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::hot;
use crate::state::ViewerState;

/// Physical units of the binned emissivity.
const UNITS_LABEL: &str = "ergs cm^-2 s^-1 sr^-1";

const COLORBAR_STEPS: usize = 128;
const COLORBAR_WIDTH: f32 = 24.0;

// ---------------------------------------------------------------------------
// Right side panel – colour legend
// ---------------------------------------------------------------------------

/// Vertical colour bar from 0 (bottom) to the grid maximum (top).
pub fn colorbar_panel(ui: &mut Ui, state: &ViewerState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(format!("{:.3e}", state.scale.vmax));

        let height = (ui.available_height() - 48.0).max(64.0);
        let (rect, _) =
            ui.allocate_exact_size(egui::vec2(COLORBAR_WIDTH, height), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let step = rect.height() / COLORBAR_STEPS as f32;
        for i in 0..COLORBAR_STEPS {
            let bottom = rect.bottom() - i as f32 * step;
            let band = egui::Rect::from_min_max(
                egui::pos2(rect.left(), bottom - step),
                egui::pos2(rect.right(), bottom),
            );
            let t = (i as f32 + 0.5) / COLORBAR_STEPS as f32;
            painter.rect_filled(band, 0.0, hot(t));
        }

        ui.label(format!("{:.3e}", state.scale.vmin));
        ui.add_space(4.0);
        ui.label(RichText::new(UNITS_LABEL).small());
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export PNG…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} samples binned (header: {}), grid {}×{}",
            state.sample_count,
            state.declared_count,
            state.grid.cols(),
            state.grid.rows()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_file_dialog(state: &mut ViewerState) {
    let default_name = state
        .source
        .file_name()
        .map(|n| format!("{}.png", n.to_string_lossy()))
        .unwrap_or_else(|| "rendercube.png".to_string());

    let file = rfd::FileDialog::new()
        .set_title("Export heatmap")
        .set_file_name(default_name)
        .add_filter("PNG", &["png"])
        .save_file();

    if let Some(path) = file {
        state.export_png(&path);
    }
}
