mod app;
mod plot_layers;
mod styles;
mod ui_config;
mod ui_panels;
mod ui_plot_view;
mod ui_text;
mod utils;

pub use app::AnnotatorApp;
pub use ui_text::UI_TEXT;
pub use utils::{RegionInfo, format_candle_count, format_feature, format_price, format_span};
