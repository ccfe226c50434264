//! Plot visualization configuration

use eframe::egui::Color32;

use crate::domain::RegionColor;

pub struct PlotConfig {
    // --- REGION OVERLAYS ---
    pub region_green: Color32,
    pub region_red: Color32,
    pub region_blue: Color32,
    pub region_grey: Color32,
    /// Opacity of the region rectangle fill (0.0 = invisible, 1.0 = fully opaque)
    pub region_fill_opacity_pct: f32,
    /// Width of the vertical start/end boundary lines
    pub region_boundary_line_width: f32,
    /// Stroke drawn around the region currently being edited
    pub highlighted_region_stroke_color: Color32,
    pub highlighted_region_stroke_width: f32,
    /// Horizontal dashed line at the region key price
    pub key_price_line_width: f32,

    // --- MARKERS (unsaved draft) ---
    pub marker_color: Color32,
    pub marker_line_width: f32,

    // --- CANDLESTICKS ---
    pub candle_bullish_color: Color32,
    pub candle_bearish_color: Color32,
    pub candle_width_pct: f64, // 0.0 to 1.0 (relative to one index step)
    pub candle_wick_width: f32, // Pixels

    pub plot_y_padding_pct: f64, // Y-Axis Padding factor (e.g. 0.05 = 5% padding top and bottom)
    pub plot_x_padding_pct: f64,

    pub color_text_subdued: Color32,
    pub color_error: Color32,
    pub color_success: Color32,
}

impl PlotConfig {
    pub fn region_color(&self, color: RegionColor) -> Color32 {
        match color {
            RegionColor::Green => self.region_green,
            RegionColor::Red => self.region_red,
            RegionColor::Blue => self.region_blue,
            RegionColor::Grey => self.region_grey,
        }
    }
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    region_green: Color32::from_rgb(34, 139, 34), // Forest Green
    region_red: Color32::from_rgb(178, 34, 34),   // Firebrick Red
    region_blue: Color32::from_rgb(30, 144, 255), // Dodger Blue
    region_grey: Color32::from_gray(128),

    // 30% matches the translucent band look; candles stay readable underneath
    region_fill_opacity_pct: 0.30,
    region_boundary_line_width: 2.0,
    highlighted_region_stroke_color: Color32::WHITE,
    highlighted_region_stroke_width: 1.5,
    key_price_line_width: 1.0,

    marker_color: Color32::from_rgb(255, 215, 0), // Gold
    marker_line_width: 1.5,

    candle_bullish_color: Color32::from_rgb(38, 166, 154), // TradingView Green
    candle_bearish_color: Color32::from_rgb(239, 83, 80),  // TradingView Red
    candle_width_pct: 0.8, // 80% width leaves a small gap between candles
    candle_wick_width: 1.0,

    plot_y_padding_pct: 0.02,
    // E.g. if viewing 100 candles, this adds 2 "empty" candles of space on each side.
    plot_x_padding_pct: 0.02,

    color_text_subdued: Color32::GRAY,
    color_error: Color32::from_rgb(255, 80, 80),
    color_success: Color32::from_rgb(100, 255, 100),
};
