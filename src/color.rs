use eframe::egui::Color32;
use palette::{IntoColor, Lab, Mix, Srgb};

// ---------------------------------------------------------------------------
// Sequential colormaps
// ---------------------------------------------------------------------------

/// Colour scales for per-year boxes and heatmap cells, interpolated in Lab
/// between fixed anchor colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Blue → yellow → red, for temperature.
    Thermal,
    /// White → dark blue, for pressure.
    Blues,
}

const THERMAL: [(u8, u8, u8); 11] = [
    (49, 54, 149),
    (69, 117, 180),
    (116, 173, 209),
    (171, 217, 233),
    (224, 243, 248),
    (255, 255, 191),
    (254, 224, 144),
    (253, 174, 97),
    (244, 109, 67),
    (215, 48, 39),
    (165, 0, 38),
];

const BLUES: [(u8, u8, u8); 9] = [
    (247, 251, 255),
    (222, 235, 247),
    (198, 219, 239),
    (158, 202, 225),
    (107, 174, 214),
    (66, 146, 198),
    (33, 113, 181),
    (8, 81, 156),
    (8, 48, 107),
];

fn to_lab((r, g, b): (u8, u8, u8)) -> Lab {
    Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0).into_color()
}

fn to_color32(lab: Lab) -> Color32 {
    let rgb: Srgb = lab.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

impl Colormap {
    fn anchors(self) -> &'static [(u8, u8, u8)] {
        match self {
            Colormap::Thermal => &THERMAL,
            Colormap::Blues => &BLUES,
        }
    }

    /// Colour at position `t` in `[0, 1]` (clamped; NaN maps to the start).
    pub fn sample(self, t: f64) -> Color32 {
        let anchors = self.anchors();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (anchors.len() - 1) as f64;
        let i = (pos.floor() as usize).min(anchors.len() - 2);
        let frac = (pos - i as f64) as f32;
        to_color32(to_lab(anchors[i]).mix(to_lab(anchors[i + 1]), frac))
    }

    /// Colour for `value` within `[lo, hi]`.
    pub fn scaled(self, value: f64, (lo, hi): (f64, f64)) -> Color32 {
        let span = hi - lo;
        if span.abs() < f64::EPSILON {
            return self.sample(0.5);
        }
        self.sample((value - lo) / span)
    }

    /// `n` colours evenly spread over the scale, light end trimmed so every
    /// entry stays visible on a white background.
    pub fn palette(self, n: usize) -> Vec<Color32> {
        match n {
            0 => Vec::new(),
            1 => vec![self.sample(0.75)],
            _ => (0..n)
                .map(|i| self.sample(0.15 + 0.85 * i as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}

/// Black or white, whichever reads better on `background`.
pub fn contrasting_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

/// Series colours used by the line charts.
pub const TEMPERATURE_COLOR: Color32 = Color32::from_rgb(214, 39, 40);
pub const PRESSURE_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color32, (r, g, b): (u8, u8, u8)) -> bool {
        (a.r() as i16 - r as i16).abs() <= 1
            && (a.g() as i16 - g as i16).abs() <= 1
            && (a.b() as i16 - b as i16).abs() <= 1
    }

    #[test]
    fn endpoints_hit_anchor_colours() {
        assert!(close(Colormap::Thermal.sample(0.0), THERMAL[0]));
        assert!(close(Colormap::Thermal.sample(1.0), THERMAL[10]));
        assert!(close(Colormap::Blues.sample(1.0), BLUES[8]));
        assert!(close(Colormap::Blues.sample(-3.0), BLUES[0]));
    }

    #[test]
    fn palette_has_requested_length() {
        assert!(Colormap::Blues.palette(0).is_empty());
        assert_eq!(Colormap::Thermal.palette(1).len(), 1);
        assert_eq!(Colormap::Thermal.palette(5).len(), 5);
    }

    #[test]
    fn degenerate_range_uses_midpoint() {
        assert_eq!(
            Colormap::Blues.scaled(3.0, (3.0, 3.0)),
            Colormap::Blues.sample(0.5)
        );
    }

    #[test]
    fn text_contrast() {
        assert_eq!(contrasting_text(Color32::from_rgb(247, 251, 255)), Color32::BLACK);
        assert_eq!(contrasting_text(Color32::from_rgb(8, 48, 107)), Color32::WHITE);
    }
}
