mod app;
mod cli;
mod color;
mod compare;
mod config;
mod data;
mod export;
mod state;
mod ui;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use app::CubeViewerApp;
use cli::{Command, USAGE};
use config::{Settings, ShowTarget};
use data::binning::rasterize_show;
use data::loader::load_file;
use eframe::egui;
use state::ViewerState;

fn main() -> Result<()> {
    env_logger::init();

    match Command::from_args(std::env::args_os()) {
        Command::Usage => {
            println!("{USAGE}");
            Ok(())
        }
        Command::Show(path) => show(&path, &Settings::from_env()?),
        Command::Compare(path0, path1) => {
            compare::compare_files(&path0, &path1, config::mean_source_from_env()?)
        }
    }
}

/// Bin one cube and display it, or write it to PNG when no window can open.
fn show(path: &Path, settings: &Settings) -> Result<()> {
    let cube = load_file(path)?;
    let raster =
        rasterize_show(&cube).with_context(|| format!("binning {}", path.display()))?;
    println!("Finished loading!");
    log::info!(
        "x in [{}, {}], y in [{}, {}], max cell {:?}",
        raster.bounds.x.min,
        raster.bounds.x.max,
        raster.bounds.y.min,
        raster.bounds.y.max,
        raster.grid.max()
    );

    match settings.show_target(path) {
        ShowTarget::Png(out) => {
            if settings.output.is_none() {
                log::warn!("No display available, writing heatmap to {}", out.display());
            }
            export::save_png(&raster.grid, &out, settings.scale)
        }
        ShowTarget::Window => {
            let state = ViewerState::new(path, &cube, raster, settings.scale);
            let title = state.title();

            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_title(title.clone())
                    .with_inner_size([900.0, 1000.0])
                    .with_min_inner_size([400.0, 400.0]),
                ..Default::default()
            };

            eframe::run_native(
                &title,
                options,
                Box::new(move |_cc| Ok(Box::new(CubeViewerApp::new(state)))),
            )
            .map_err(|e| anyhow!("viewer window failed: {e}"))
        }
    }
}
