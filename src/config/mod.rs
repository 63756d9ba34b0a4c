use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "pixlabel";
const APP_CONFIG_FILE: &str = "config.json";

/// Engine tunables from `config.json`. Every knob has a working default so
/// the engine runs without any configuration file present.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Coverage added to the mask by one brush disk stamp, as a fraction of
    /// mask saturation.
    pub brush_coverage_step: f32,
    /// Minimum accumulated coverage fraction a pixel needs to be extracted.
    pub extraction_threshold: f32,
    /// Alpha of the pen's enclosed-area tint.
    pub pen_fill_alpha: f32,
    /// Visible alpha of one brush disk stamp.
    pub brush_glaze_alpha: f32,
    /// Alpha used when compositing stored region overlays.
    pub overlay_alpha: f32,
    /// Overlay color for the selected region.
    pub highlight_color: [u8; 3],
    /// Side length of the enlarged per-pixel marker drawn for the selection.
    pub selection_marker_size: u32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub zoom_step: f32,
    pub brush_width_min: u32,
    pub brush_width_max: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            brush_coverage_step: 0.06,
            extraction_threshold: 0.5,
            pen_fill_alpha: 0.5,
            brush_glaze_alpha: 0.03,
            overlay_alpha: 0.5,
            highlight_color: [255, 255, 0],
            selection_marker_size: 2,
            zoom_min: 1.0,
            zoom_max: 3.0,
            zoom_step: 0.1,
            brush_width_min: 1,
            brush_width_max: 50,
        }
    }
}

impl EngineConfig {
    /// Clamps loaded values into ranges the engine can operate with.
    fn sanitized(mut self) -> Self {
        self.brush_coverage_step = self.brush_coverage_step.clamp(0.001, 1.0);
        self.extraction_threshold = self.extraction_threshold.clamp(0.001, 1.0);
        self.pen_fill_alpha = self.pen_fill_alpha.clamp(0.0, 1.0);
        self.brush_glaze_alpha = self.brush_glaze_alpha.clamp(0.0, 1.0);
        self.overlay_alpha = self.overlay_alpha.clamp(0.0, 1.0);
        self.selection_marker_size = self.selection_marker_size.max(1);
        if self.zoom_min <= 0.0 {
            self.zoom_min = 1.0;
        }
        if self.zoom_max < self.zoom_min {
            self.zoom_max = self.zoom_min;
        }
        if self.zoom_step <= 0.0 {
            self.zoom_step = 0.1;
        }
        self.brush_width_min = self.brush_width_min.max(1);
        if self.brush_width_max < self.brush_width_min {
            self.brush_width_max = self.brush_width_min;
        }
        self
    }
}

pub fn load_engine_config() -> EngineConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_engine_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_engine_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> EngineConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return EngineConfig::default(),
    };
    if !path.exists() {
        return EngineConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str::<EngineConfig>(&contents)
            .map(EngineConfig::sanitized)
            .unwrap_or_else(|err| {
                tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
                EngineConfig::default()
            }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            EngineConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
