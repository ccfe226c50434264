use std::sync::LazyLock;

pub const ICON_EYE: &str = "\u{f0208}";
pub const ICON_CLOSE: &str = "\u{f00d}";
pub const ICON_CANDLE: &str = "\u{f11c9}";
pub const ICON_TARGET: &str = "\u{f04fe}";
pub const ICON_WARNING: &str = "\u{ea6c}";

pub struct UiText {
    pub app_title: &'static str,

    // --- Markers ---
    pub marker_heading: &'static str,
    pub marker_start: &'static str,
    pub marker_end: &'static str,
    pub marker_reset: &'static str,
    pub marker_region_size: &'static str,
    pub marker_start_close: &'static str,
    pub marker_end_close: &'static str,
    pub marker_unusable: &'static str,

    // --- Annotate form ---
    pub form_heading: String,
    pub form_category: &'static str,
    pub form_feature1: &'static str,
    pub form_feature2: &'static str,
    pub form_none: &'static str,
    pub form_trade_group: &'static str,
    pub form_new_trade: &'static str,
    pub form_new_trade_name: &'static str,
    pub form_key_price: &'static str,
    pub form_tags: &'static str,
    pub form_tags_hint: &'static str,
    pub form_notes: &'static str,
    pub form_save: &'static str,
    pub form_update: &'static str,
    pub form_cancel_edit: &'static str,
    pub form_editing: &'static str,

    // --- Trades ---
    pub trades_heading: &'static str,
    pub trades_empty: &'static str,
    pub trades_view: &'static str,
    pub trades_view_all: &'static str,
    pub trades_rename: &'static str,
    pub trades_delete: String,
    pub trades_region_count: &'static str,

    // --- Region table ---
    pub table_heading: &'static str,
    pub table_trade: &'static str,
    pub table_id: &'static str,
    pub table_category: &'static str,
    pub table_span: &'static str,
    pub table_key_price: &'static str,
    pub table_feature1: &'static str,
    pub table_feature2: &'static str,
    pub table_tags: &'static str,
    pub table_notes: &'static str,
    pub table_shown: String,
    pub table_edit: &'static str,
    pub table_delete: String,

    // --- Plot ---
    pub plot_x_axis: &'static str,
    pub plot_y_axis: &'static str,
    pub plot_toggle_candles: String,
    pub plot_toggle_regions: &'static str,
    pub plot_toggle_key_prices: &'static str,
    pub plot_toggle_markers: &'static str,

    // --- Status ---
    pub status_ready: &'static str,
    pub status_load_failed: String,
    pub status_saved: &'static str,
    pub status_updated: &'static str,
    pub status_removed: &'static str,
    pub status_trade_deleted: &'static str,
}

pub static UI_TEXT: LazyLock<UiText> = LazyLock::new(|| UiText {
    app_title: "Trade Region Annotator",

    marker_heading: "Markers",
    marker_start: "Start",
    marker_end: "End",
    marker_reset: "Reset",
    marker_region_size: "Region size",
    marker_start_close: "Start close",
    marker_end_close: "End close",
    marker_unusable: "Need at least two candles to mark a region",

    form_heading: format!("{} Annotate Region", ICON_TARGET),
    form_category: "Category",
    form_feature1: "Feature 1",
    form_feature2: "Feature 2",
    form_none: "(none)",
    form_trade_group: "Trade group",
    form_new_trade: "New Trade",
    form_new_trade_name: "Trade name",
    form_key_price: "Key price",
    form_tags: "Tags",
    form_tags_hint: "comma separated",
    form_notes: "Notes",
    form_save: "Save Region",
    form_update: "Update Region",
    form_cancel_edit: "Cancel Edit",
    form_editing: "Editing region",

    trades_heading: "Trades",
    trades_empty: "No trades yet. Save a region to start one.",
    trades_view: "View",
    trades_view_all: "All trades",
    trades_rename: "Rename",
    trades_delete: format!("{} Delete", ICON_CLOSE),
    trades_region_count: "regions",

    table_heading: "Regions",
    table_trade: "Trade",
    table_id: "#",
    table_category: "Category",
    table_span: "Span",
    table_key_price: "Key",
    table_feature1: "Feature 1",
    table_feature2: "Feature 2",
    table_tags: "Tags",
    table_notes: "Notes",
    table_shown: ICON_EYE.to_string(),
    table_edit: "Edit",
    table_delete: ICON_CLOSE.to_string(),

    plot_x_axis: "Time",
    plot_y_axis: "Price",
    plot_toggle_candles: format!("{} Candles", ICON_CANDLE),
    plot_toggle_regions: "Regions",
    plot_toggle_key_prices: "Key prices",
    plot_toggle_markers: "Markers",

    status_ready: "Ready",
    status_load_failed: format!("{} Failed to load price data", ICON_WARNING),
    status_saved: "Region saved",
    status_updated: "Region updated",
    status_removed: "Region removed",
    status_trade_deleted: "Trade deleted",
});
