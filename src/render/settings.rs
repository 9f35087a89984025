use serde::{Deserialize, Serialize};

use crate::render::svg::{Color, Point};

/// Canvas and styling parameters of the map. This is both the JSON model of
/// the `render_settings` document section and the snapshot record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub line_width: f64,
    pub stop_radius: f64,
    pub bus_label_font_size: u32,
    pub bus_label_offset: Point,
    pub stop_label_font_size: u32,
    pub stop_label_offset: Point,
    pub underlayer_color: Color,
    pub underlayer_width: f64,
    pub color_palette: Vec<Color>,
}

impl RenderSettings {
    /// Field-domain checks the serde layer cannot express. A violation is an
    /// input error: the caller reports it fatally, nothing is rendered.
    pub fn validate(&self) -> Result<(), String> {
        if self.color_palette.is_empty() {
            return Err("color_palette must not be empty".into());
        }
        if 2.0 * self.padding >= self.width.min(self.height) {
            return Err(format!(
                "padding {} too large for a {}x{} canvas",
                self.padding, self.width, self.height
            ));
        }
        for color in self.color_palette.iter().chain([&self.underlayer_color]) {
            if let Color::Rgba(_, _, _, opacity) = color
                && !(0.0..=1.0).contains(opacity)
            {
                return Err(format!("opacity {opacity} outside [0, 1]"));
            }
        }
        Ok(())
    }
}
