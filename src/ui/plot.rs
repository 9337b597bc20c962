use eframe::egui::{self, Ui};
use egui_plot::{Plot, PlotImage, PlotPoint};

use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Heatmap plot (central panel)
// ---------------------------------------------------------------------------

/// Render the binned grid as an image spanning the cube's extent.
pub fn heatmap_plot(ui: &mut Ui, state: &mut ViewerState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(state.title());
    });

    let texture_id = state.texture(ui.ctx()).id();
    let [cx, cy] = state.extent.center();
    let [w, h] = state.extent.size();
    let state = &*state;

    Plot::new("heatmap_plot")
        .x_axis_label("x")
        .y_axis_label("y")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(|_name, point: &PlotPoint| match state.cell_at(point.x, point.y) {
            Some((px, py, value)) => {
                format!("x = {:.4}\ny = {:.4}\npixel ({px}, {py}) = {value:.4e}", point.x, point.y)
            }
            None => format!("x = {:.4}\ny = {:.4}", point.x, point.y),
        })
        .show(ui, |plot_ui| {
            let image = PlotImage::new(
                texture_id,
                PlotPoint::new(cx, cy),
                egui::vec2(w as f32, h as f32),
            );
            plot_ui.image(image);
        });
}
