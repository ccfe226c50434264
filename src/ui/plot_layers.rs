use eframe::egui::{Color32, Id, LayerId, Order::Tooltip, RichText, Stroke, Ui};

#[allow(deprecated)]
use eframe::egui::show_tooltip_at_pointer;

use egui_plot::{HLine, Line, LineStyle, PlotPoints, PlotUi, Polygon, VLine};

use crate::config::plot::PLOT_CONFIG;
use crate::domain::{Candle, CandleType, PriceSeries};
use crate::engine::Overlay;
use crate::models::MarkerCursor;

use crate::ui::ui_plot_view::PlotVisibility;
use crate::ui::utils::{format_candle_count, format_price};

/// Context passed to every layer during rendering.
pub struct LayerContext<'a> {
    pub series: &'a PriceSeries,
    pub overlays: &'a [Overlay],
    pub markers: &'a MarkerCursor,
    pub visibility: &'a PlotVisibility,
    /// (min, max) price of the whole series, used to size vertical elements
    pub y_bounds: (f64, f64),
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. REGION OVERLAYS
// ============================================================================
pub struct RegionOverlayLayer;

impl PlotLayer for RegionOverlayLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        // Projection order is draw order, so later overlays land on top
        for overlay in ctx.overlays {
            draw_region(plot_ui, overlay, ctx);
        }
    }
}

/// Candle-centred x extent of a region: half a step either side of its boundary candles.
fn region_x_extent(overlay: &Overlay) -> (f64, f64) {
    (overlay.start_idx as f64 - 0.5, overlay.end_idx as f64 + 0.5)
}

fn draw_region(plot_ui: &mut PlotUi, overlay: &Overlay, ctx: &LayerContext) {
    let (y_min, y_max) = ctx.y_bounds;
    let (x_min, x_max) = region_x_extent(overlay);
    let color = PLOT_CONFIG.region_color(overlay.color);

    let points = PlotPoints::new(vec![
        [x_min, y_min],
        [x_max, y_min],
        [x_max, y_max],
        [x_min, y_max],
    ]);

    let stroke = if overlay.highlighted {
        Stroke::new(
            PLOT_CONFIG.highlighted_region_stroke_width,
            PLOT_CONFIG.highlighted_region_stroke_color,
        )
    } else {
        Stroke::NONE
    };

    plot_ui.polygon(
        Polygon::new(overlay.label.as_str(), points)
            .fill_color(color.linear_multiply(PLOT_CONFIG.region_fill_opacity_pct))
            .stroke(stroke),
    );

    for x in [overlay.start_idx as f64, overlay.end_idx as f64] {
        plot_ui.vline(
            VLine::new("", x)
                .color(color)
                .width(PLOT_CONFIG.region_boundary_line_width),
        );
    }

    if ctx.visibility.key_prices {
        plot_ui.line(
            Line::new("", PlotPoints::new(vec![[x_min, overlay.key_price], [x_max, overlay.key_price]]))
                .color(color)
                .width(PLOT_CONFIG.key_price_line_width)
                .style(LineStyle::Dashed { length: 6.0 }),
        );
    }

    // Manual Hit Test
    if let Some(pointer) = plot_ui.pointer_coordinate() {
        if pointer.x >= x_min && pointer.x <= x_max && pointer.y >= y_min && pointer.y <= y_max {
            let tooltip_layer = LayerId::new(Tooltip, Id::new("region_tooltips"));

            #[allow(deprecated)]
            show_tooltip_at_pointer(
                plot_ui.ctx(),
                tooltip_layer,
                Id::new(("region_tooltip", overlay.trade_id, overlay.region_id)),
                |ui: &mut Ui| {
                    ui.label(RichText::new(&overlay.label).strong().color(color));
                    ui.separator();
                    ui.label(format!("Trade #{} / Region #{}", overlay.trade_id, overlay.region_id));
                    ui.label(format!("{} → {}", overlay.start_time, overlay.end_time));
                    ui.label(format_candle_count(overlay.end_idx - overlay.start_idx + 1));
                    ui.label(format!("Key: {}", format_price(overlay.key_price)));
                },
            );
        }
    }
}

// ============================================================================
// 2. CANDLESTICKS
// ============================================================================
pub struct CandlestickLayer;

impl PlotLayer for CandlestickLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for candle in ctx.series.candles() {
            draw_candle(plot_ui, candle);
        }
    }
}

fn draw_candle(ui: &mut PlotUi, candle: &Candle) {
    let x = candle.index as f64;
    let color = match candle.get_type() {
        CandleType::Bullish => PLOT_CONFIG.candle_bullish_color,
        CandleType::Bearish => PLOT_CONFIG.candle_bearish_color,
    };

    if candle.high > candle.low {
        draw_wick_line(ui, x, candle.high, candle.low, color);
    }

    let (body_bot, body_top_raw) = candle.body_range();
    // Doji check
    let body_top = if (body_top_raw - body_bot).abs() < f64::EPSILON {
        body_bot * 1.0001
    } else {
        body_top_raw
    };
    draw_body_rect(ui, x, body_top, body_bot, color);
}

#[inline]
fn draw_wick_line(ui: &mut PlotUi, x: f64, top: f64, bottom: f64, color: Color32) {
    ui.line(
        Line::new("", PlotPoints::new(vec![[x, bottom], [x, top]]))
            .color(color)
            .width(PLOT_CONFIG.candle_wick_width),
    );
}

#[inline]
fn draw_body_rect(ui: &mut PlotUi, x: f64, top: f64, bottom: f64, color: Color32) {
    let half_w = PLOT_CONFIG.candle_width_pct / 2.0;
    let pts = vec![
        [x - half_w, bottom],
        [x + half_w, bottom],
        [x + half_w, top],
        [x - half_w, top],
    ];

    // No stroke: thin candles blur with a border
    ui.polygon(
        Polygon::new("", PlotPoints::new(pts))
            .fill_color(color)
            .stroke(Stroke::NONE),
    );
}

// ============================================================================
// 3. DRAFT MARKERS
// ============================================================================
pub struct MarkerLayer;

impl PlotLayer for MarkerLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if !ctx.markers.is_usable() {
            return;
        }
        let dash = LineStyle::Dashed { length: 8.0 };
        for (label, idx) in [("Start", ctx.markers.start_idx()), ("End", ctx.markers.end_idx())] {
            plot_ui.vline(
                VLine::new(label, idx as f64)
                    .color(PLOT_CONFIG.marker_color)
                    .width(PLOT_CONFIG.marker_line_width)
                    .style(dash),
            );
        }

        if let Some(close) = ctx.series.close_at(ctx.markers.end_idx()) {
            plot_ui.hline(
                HLine::new("", close)
                    .color(PLOT_CONFIG.marker_color.linear_multiply(0.4))
                    .width(1.0)
                    .style(LineStyle::dashed_loose()),
            );
        }
    }
}
