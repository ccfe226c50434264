use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{Axis, AxisHints, GridMark, HPlacement, Plot, VPlacement};
use serde::{Deserialize, Serialize};

use crate::config::plot::PLOT_CONFIG;
use crate::domain::PriceSeries;
use crate::engine::Overlay;
use crate::models::MarkerCursor;

use crate::ui::plot_layers::{CandlestickLayer, LayerContext, MarkerLayer, PlotLayer, RegionOverlayLayer};
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::format_price;

/// Layer toggles. Persisted with the rest of the UI preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlotVisibility {
    pub candles: bool,
    pub regions: bool,
    pub key_prices: bool,
    pub markers: bool,
}

impl Default for PlotVisibility {
    fn default() -> Self {
        Self {
            candles: true,
            regions: true,
            key_prices: true,
            markers: true,
        }
    }
}

/// What the user did on the chart this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlotInteraction {
    None,
    /// Primary click on a candle
    SetStart(usize),
    /// Secondary click on a candle
    SetEnd(usize),
}

fn calculate_adaptive_step(range: f64, target_count: f64) -> f64 {
    let raw_step = range / target_count.max(1.0);
    if raw_step <= 0.0 || !raw_step.is_finite() {
        return 1.0;
    }
    let mag = 10.0_f64.powi(raw_step.log10().floor() as i32);
    let normalized = raw_step / mag;

    let nice_step = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };

    (nice_step * mag).max(1.0)
}

/// Nearest candle index for a plot x coordinate, if it lands on the series.
fn candle_at(x: f64, series: &PriceSeries) -> Option<usize> {
    let max_idx = series.max_idx()?;
    let idx = x.round();
    if idx < 0.0 || idx > max_idx as f64 {
        return None;
    }
    Some(idx as usize)
}

fn create_time_axis(series: &PriceSeries) -> AxisHints<'static> {
    let timestamps: Vec<String> = series.candles().iter().map(|c| c.timestamp.clone()).collect();

    AxisHints::new(Axis::X)
        .label(UI_TEXT.plot_x_axis)
        .formatter(move |mark, _range| {
            let idx = mark.value.round();
            if idx < 0.0 || mark.value.fract().abs() > f64::EPSILON {
                return String::new();
            }
            timestamps.get(idx as usize).cloned().unwrap_or_default()
        })
        .placement(VPlacement::Bottom)
}

fn create_y_axis(series: &PriceSeries) -> AxisHints<'static> {
    let label = format!("{} {}  {}", series.symbol, series.interval, UI_TEXT.plot_y_axis);
    AxisHints::new_y()
        .label(label)
        .formatter(|grid_mark, _range| format_price(grid_mark.value))
        .placement(HPlacement::Right)
}

fn calculate_y_bounds(series: &PriceSeries) -> (f64, f64) {
    let (lo, hi) = series.price_bounds().unwrap_or((0.0, 1.0));
    let pad = (hi - lo) * PLOT_CONFIG.plot_y_padding_pct;
    ((lo - pad).max(0.0), hi + pad)
}

fn calculate_x_bounds(series: &PriceSeries) -> RangeInclusive<f64> {
    let count = series.len().max(1) as f64;
    let pad = (count * PLOT_CONFIG.plot_x_padding_pct).max(1.0);
    (-pad)..=(count - 1.0 + pad)
}

#[derive(Default)]
pub struct PlotView;

impl PlotView {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn show_my_plot(
        &mut self,
        ui: &mut Ui,
        series: &PriceSeries,
        overlays: &[Overlay],
        markers: &MarkerCursor,
        visibility: &PlotVisibility,
    ) -> PlotInteraction {
        let (y_min, y_max) = calculate_y_bounds(series);
        let x_range = calculate_x_bounds(series);

        let response = Plot::new("annotation_plot")
            .custom_x_axes(vec![create_time_axis(series)])
            .custom_y_axes(vec![create_y_axis(series)])
            .label_formatter(|_, _| String::new())
            .x_grid_spacer(move |input| {
                let (min, max) = input.bounds;
                let step = calculate_adaptive_step(max - min, 8.0);
                let start = (min / step).ceil() as i64;
                let end = (max / step).floor() as i64;
                (start..=end)
                    .map(|i| GridMark {
                        value: i as f64 * step,
                        step_size: step,
                    })
                    .collect()
            })
            .allow_double_click_reset(true)
            .include_x(*x_range.start())
            .include_x(*x_range.end())
            .include_y(y_min)
            .include_y(y_max)
            .show(ui, |plot_ui| {
                let ctx = LayerContext {
                    series,
                    overlays,
                    markers,
                    visibility,
                    y_bounds: (y_min, y_max),
                };

                let mut layers: Vec<Box<dyn PlotLayer>> = Vec::with_capacity(3);
                if visibility.regions {
                    layers.push(Box::new(RegionOverlayLayer));
                }
                if visibility.candles {
                    layers.push(Box::new(CandlestickLayer));
                }
                if visibility.markers {
                    layers.push(Box::new(MarkerLayer));
                }

                for layer in layers {
                    layer.render(plot_ui, &ctx);
                }

                plot_ui.pointer_coordinate()
            });

        let Some(pointer) = response.inner else {
            return PlotInteraction::None;
        };
        let Some(idx) = candle_at(pointer.x, series) else {
            return PlotInteraction::None;
        };
        if response.response.clicked() {
            PlotInteraction::SetStart(idx)
        } else if response.response.secondary_clicked() {
            PlotInteraction::SetEnd(idx)
        } else {
            PlotInteraction::None
        }
    }
}
