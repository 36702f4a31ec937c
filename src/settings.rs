//! Display and output settings exposed to the settings panel.
//!
//! Every mutable field has a [`SettingUpdate`] variant. The point pick range
//! and point size keep a cached half value used by hit testing and marker
//! drawing, so they go through dedicated setters.

/// Default stroke width for curve paths.
pub const DEFAULT_LINE_WIDTH: f64 = 2.0;
/// Default side of the pick box around points and control endpoints.
pub const DEFAULT_POINT_RANGE: f64 = 16.0;
/// Default side of the square point marker.
pub const DEFAULT_POINT_SIZE: f64 = 8.0;
pub const DEFAULT_ACTIVE_OPACITY: f64 = 1.0;
pub const DEFAULT_INACTIVE_OPACITY: f64 = 0.3;
pub const DEFAULT_MAIN_COLOR: &str = "#000000";
pub const DEFAULT_CONTROL_COLOR: &str = "#ff0000";
pub const DEFAULT_ORIGIN_COLOR: &str = "#0000ff";
/// Default number of decimals in exported coordinates.
pub const DEFAULT_OUTPUT_PRECISION: usize = 2;
/// Largest accepted number of decimals.
pub const MAX_OUTPUT_PRECISION: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub line_width: f64,
    point_range: f64,
    point_range_half: f64,
    point_size: f64,
    point_size_half: f64,
    pub active_opacity: f64,
    pub inactive_opacity: f64,
    pub main_color: String,
    pub control_color: String,
    pub origin_color: String,
    pub output_precision: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            point_range: DEFAULT_POINT_RANGE,
            point_range_half: DEFAULT_POINT_RANGE / 2.0,
            point_size: DEFAULT_POINT_SIZE,
            point_size_half: DEFAULT_POINT_SIZE / 2.0,
            active_opacity: DEFAULT_ACTIVE_OPACITY,
            inactive_opacity: DEFAULT_INACTIVE_OPACITY,
            main_color: DEFAULT_MAIN_COLOR.to_string(),
            control_color: DEFAULT_CONTROL_COLOR.to_string(),
            origin_color: DEFAULT_ORIGIN_COLOR.to_string(),
            output_precision: DEFAULT_OUTPUT_PRECISION,
        }
    }
}

/// A change to one settings field.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingUpdate {
    LineWidth(f64),
    PointRange(f64),
    PointSize(f64),
    ActiveOpacity(f64),
    InactiveOpacity(f64),
    MainColor(String),
    ControlColor(String),
    OriginColor(String),
    OutputPrecision(usize),
}

impl Settings {
    pub fn point_range(&self) -> f64 {
        self.point_range
    }

    pub fn point_range_half(&self) -> f64 {
        self.point_range_half
    }

    pub fn set_point_range(&mut self, range: f64) {
        self.point_range = range;
        self.point_range_half = range / 2.0;
    }

    pub fn point_size(&self) -> f64 {
        self.point_size
    }

    pub fn point_size_half(&self) -> f64 {
        self.point_size_half
    }

    pub fn set_point_size(&mut self, size: f64) {
        self.point_size = size;
        self.point_size_half = size / 2.0;
    }

    pub fn apply(&mut self, update: SettingUpdate) {
        match update {
            SettingUpdate::LineWidth(v) => self.line_width = v,
            SettingUpdate::PointRange(v) => self.set_point_range(v),
            SettingUpdate::PointSize(v) => self.set_point_size(v),
            SettingUpdate::ActiveOpacity(v) => self.active_opacity = v.clamp(0.0, 1.0),
            SettingUpdate::InactiveOpacity(v) => self.inactive_opacity = v.clamp(0.0, 1.0),
            SettingUpdate::MainColor(c) => self.main_color = c,
            SettingUpdate::ControlColor(c) => self.control_color = c,
            SettingUpdate::OriginColor(c) => self.origin_color = c,
            SettingUpdate::OutputPrecision(p) => {
                self.output_precision = p.min(MAX_OUTPUT_PRECISION)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_and_size_keep_cached_halves() {
        let mut settings = Settings::default();
        settings.apply(SettingUpdate::PointRange(30.0));
        settings.apply(SettingUpdate::PointSize(5.0));
        assert_eq!(settings.point_range_half(), 15.0);
        assert_eq!(settings.point_size_half(), 2.5);
    }

    #[test]
    fn colors_are_stored_verbatim() {
        let mut settings = Settings::default();
        settings.apply(SettingUpdate::MainColor("rebeccapurple".into()));
        assert_eq!(settings.main_color, "rebeccapurple");
    }

    #[test]
    fn precision_is_capped() {
        let mut settings = Settings::default();
        settings.apply(SettingUpdate::OutputPrecision(2_000_000));
        assert_eq!(settings.output_precision, MAX_OUTPUT_PRECISION);
        settings.apply(SettingUpdate::OutputPrecision(0));
        assert_eq!(settings.output_precision, 0);
    }
}
