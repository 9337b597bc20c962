use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::compare::MeanSource;

pub const OUTPUT_VAR: &str = "RENDERCUBE_OUTPUT";
pub const SCALE_VAR: &str = "RENDERCUBE_SCALE";
pub const LEGACY_MEAN_VAR: &str = "RENDERCUBE_LEGACY_MEAN";

const DEFAULT_SCALE: u32 = 4;

// ---------------------------------------------------------------------------
// Settings – environment-derived knobs for show mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Write the show-mode heatmap here instead of opening a window.
    pub output: Option<PathBuf>,
    /// Integer nearest-neighbour upscale for exported PNGs.
    pub scale: u32,
    /// Whether a windowing environment is reachable.
    pub display_available: bool,
}

/// Where show mode sends the heatmap.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowTarget {
    Window,
    Png(PathBuf),
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let output = lookup(OUTPUT_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let scale = match lookup(SCALE_VAR).filter(|v| !v.is_empty()) {
            Some(raw) => {
                let scale = raw
                    .trim()
                    .parse::<u32>()
                    .with_context(|| format!("{SCALE_VAR}='{raw}' is not a positive integer"))?;
                if scale == 0 {
                    bail!("{SCALE_VAR} must be at least 1");
                }
                scale
            }
            None => DEFAULT_SCALE,
        };


        let display_available = if cfg!(all(unix, not(target_os = "macos"))) {
            ["DISPLAY", "WAYLAND_DISPLAY"]
                .iter()
                .any(|key| lookup(key).is_some_and(|v| !v.is_empty()))
        } else {
            true
        };

        Ok(Settings {
            output,
            scale,
            display_available,
        })
    }

    /// Explicit output path first, then a window if one can open, else a PNG
    /// next to the input file.
    pub fn show_target(&self, input: &Path) -> ShowTarget {
        if let Some(path) = &self.output {
            return ShowTarget::Png(path.clone());
        }
        if self.display_available {
            return ShowTarget::Window;
        }
        let mut fallback = input.as_os_str().to_owned();
        fallback.push(".png");
        ShowTarget::Png(PathBuf::from(fallback))
    }
}

/// Compare mode only reads the legacy mean switch; show-mode settings such
/// as the export scale are never parsed there.
pub fn mean_source_from_env() -> Result<MeanSource> {
    mean_source_from_lookup(|key| std::env::var(key).ok())
}

pub fn mean_source_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<MeanSource> {
    Ok(match lookup(LEGACY_MEAN_VAR).as_deref().map(str::trim) {
        None | Some("") | Some("0") | Some("false") => MeanSource::SecondGrid,
        Some("1") | Some("true") => MeanSource::FirstGridTwice,
        Some(other) => bail!("{LEGACY_MEAN_VAR}='{other}': expected 0, 1, true or false"),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[("DISPLAY", ":0")]).unwrap();
        assert_eq!(s.output, None);
        assert_eq!(s.scale, DEFAULT_SCALE);
        assert!(s.display_available);
        assert_eq!(s.show_target(Path::new("cube.txt")), ShowTarget::Window);
    }

    #[test]
    fn test_explicit_output_wins() {
        let s = settings(&[("DISPLAY", ":0"), (OUTPUT_VAR, "/tmp/out.png")]).unwrap();
        assert_eq!(
            s.show_target(Path::new("cube.txt")),
            ShowTarget::Png(PathBuf::from("/tmp/out.png"))
        );
    }

    #[test]
    #[cfg(all(unix, not(target_os = "macos")))]
    fn test_headless_falls_back_to_png_next_to_input() {
        let s = settings(&[]).unwrap();
        assert!(!s.display_available);
        assert_eq!(
            s.show_target(Path::new("runs/cube.txt")),
            ShowTarget::Png(PathBuf::from("runs/cube.txt.png"))
        );
    }

    #[test]
    fn test_scale_validation() {
        assert_eq!(settings(&[(SCALE_VAR, "8")]).unwrap().scale, 8);
        assert!(settings(&[(SCALE_VAR, "0")]).is_err());
        assert!(settings(&[(SCALE_VAR, "big")]).is_err());
    }

    #[test]
    fn test_legacy_mean_switch() {
        let legacy = |value: &'static str| {
            mean_source_from_lookup(move |key| (key == LEGACY_MEAN_VAR).then(|| value.to_string()))
        };
        assert_eq!(legacy("1").unwrap(), MeanSource::FirstGridTwice);
        assert_eq!(legacy("false").unwrap(), MeanSource::SecondGrid);
        assert!(legacy("maybe").is_err());
    }

    #[test]
    fn test_compare_ignores_show_settings() {
        let lookup = |key: &str| match key {
            SCALE_VAR => Some("big".to_string()),
            OUTPUT_VAR => Some("/tmp/out.png".to_string()),
            LEGACY_MEAN_VAR => Some("true".to_string()),
            _ => None,
        };
        assert!(Settings::from_lookup(lookup).is_err());
        assert_eq!(
            mean_source_from_lookup(lookup).unwrap(),
            MeanSource::FirstGridTwice
        );
        assert_eq!(
            mean_source_from_lookup(|_: &str| None).unwrap(),
            MeanSource::SecondGrid
        );
    }
}
