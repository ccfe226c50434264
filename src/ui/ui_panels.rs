use eframe::egui::{ComboBox, DragValue, Grid, Label, RichText, ScrollArea, Slider, TextEdit, Ui};
use strum::IntoEnumIterator;

use crate::config::plot::PLOT_CONFIG;
use crate::domain::{Category, Feature1, Feature2, PriceSeries};
use crate::engine::AnnotationStore;
use crate::models::{MarkerCursor, Region, RegionDraft, SelectionState, TradeId, TradeSummary, ViewFilter};

use crate::ui::styles::UiStyleExt;
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::{RegionInfo, format_candle_count, format_feature, format_price, format_span};

/// Where a newly saved region goes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SaveTarget {
    Existing(TradeId),
    New(String),
}

/// Everything a panel can ask the app to do. Panels never touch the store directly.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UiAction {
    NudgeStart(i64),
    NudgeEnd(i64),
    SetStart(usize),
    SetEnd(usize),
    ResetMarkers,
    SaveRegion { target: SaveTarget, draft: RegionDraft },
    UpdateRegion { trade_id: TradeId, position: usize, draft: RegionDraft },
    EditRegion { trade_id: TradeId, position: usize },
    CancelEdit,
    RemoveRegion { trade_id: TradeId, position: usize },
    SetRegionVisible { trade_id: TradeId, position: usize, visible: bool },
    SelectTrade(TradeId),
    DeleteTrade(TradeId),
    SetTradeVisible(TradeId, bool),
    RenameTrade(TradeId, String),
    SetView(ViewFilter),
}

/// Trade group picked in the annotate form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum FormTarget {
    #[default]
    New,
    Existing(TradeId),
}

/// Editable values of the annotate form, kept between frames.
#[derive(Debug, Clone)]
pub(crate) struct AnnotationForm {
    pub category: Category,
    pub feature1: Option<Feature1>,
    pub feature2: Feature2,
    pub target: FormTarget,
    pub new_trade_name: String,
    pub key_price: f64,
    /// Follow the end marker's close until the user types a price
    pub key_price_auto: bool,
    pub tags: String,
    pub notes: String,
}

impl Default for AnnotationForm {
    fn default() -> Self {
        Self {
            category: Category::BullishRunUp,
            feature1: None,
            feature2: Feature2::Plain,
            target: FormTarget::New,
            new_trade_name: String::new(),
            key_price: 0.0,
            key_price_auto: true,
            tags: String::new(),
            notes: String::new(),
        }
    }
}

impl AnnotationForm {
    /// Keeps the auto key price on the end candle's close and drops a target trade
    /// that no longer exists.
    pub fn sync(&mut self, series: &PriceSeries, markers: &MarkerCursor, trades: &[TradeSummary]) {
        if self.key_price_auto {
            if let Some(close) = series.close_at(markers.end_idx()) {
                self.key_price = close;
            }
        }
        if let FormTarget::Existing(id) = self.target {
            if !trades.iter().any(|t| t.trade_id == id) {
                self.target = FormTarget::New;
            }
        }
    }

    /// Copy a stored region into the form for editing.
    pub fn load_region(&mut self, trade_id: TradeId, region: &Region) {
        self.category = region.category;
        self.feature1 = region.feature1;
        self.feature2 = region.feature2.unwrap_or(Feature2::Plain);
        self.target = FormTarget::Existing(trade_id);
        self.key_price = region.key_price;
        self.key_price_auto = false;
        self.tags = region.tags.clone();
        self.notes = region.notes.clone();
    }

    /// Clear the per-region fields after a save, keeping the trade group and pickers.
    pub fn reset_after_save(&mut self, saved_to: TradeId) {
        self.target = FormTarget::Existing(saved_to);
        self.new_trade_name.clear();
        self.key_price_auto = true;
        self.tags.clear();
        self.notes.clear();
    }

    pub fn to_draft(&self, series: &PriceSeries, markers: &MarkerCursor) -> RegionDraft {
        let mut draft = markers
            .to_draft(series, self.category)
            .with_key_price(self.key_price)
            .with_feature2(self.feature2)
            .with_tags(self.tags.clone())
            .with_notes(self.notes.clone());
        draft.feature1 = Some(self.feature1.map(|f| f.to_string()).unwrap_or_default());
        draft
    }

    pub fn save_target(&self) -> SaveTarget {
        match self.target {
            FormTarget::Existing(id) => SaveTarget::Existing(id),
            FormTarget::New => SaveTarget::New(self.new_trade_name.clone()),
        }
    }
}

// ============================================================================
// MARKERS
// ============================================================================
pub struct MarkerPanel<'a> {
    series: &'a PriceSeries,
    markers: &'a MarkerCursor,
}

impl<'a> MarkerPanel<'a> {
    pub fn new(series: &'a PriceSeries, markers: &'a MarkerCursor) -> Self {
        Self { series, markers }
    }

    pub(crate) fn render(&self, ui: &mut Ui) -> Vec<UiAction> {
        let mut events = Vec::new();
        ui.heading(UI_TEXT.marker_heading);

        if !self.markers.is_usable() {
            ui.label(RichText::new(UI_TEXT.marker_unusable).color(PLOT_CONFIG.color_error));
            return events;
        }

        let max_idx = self.markers.max_idx();
        let rows = [
            (UI_TEXT.marker_start, self.markers.start_idx(), true),
            (UI_TEXT.marker_end, self.markers.end_idx(), false),
        ];
        Grid::new("marker_grid").num_columns(4).show(ui, |ui| {
            for (label, current, is_start) in rows {
                ui.label(label);
                if ui.small_button("-").clicked() {
                    events.push(if is_start { UiAction::NudgeStart(-1) } else { UiAction::NudgeEnd(-1) });
                }
                let mut value = current;
                if ui.add(Slider::new(&mut value, 0..=max_idx)).changed() {
                    events.push(if is_start { UiAction::SetStart(value) } else { UiAction::SetEnd(value) });
                }
                if ui.small_button("+").clicked() {
                    events.push(if is_start { UiAction::NudgeStart(1) } else { UiAction::NudgeEnd(1) });
                }
                ui.end_row();
            }
        });

        let info = RegionInfo::from_markers(self.series, self.markers);
        ui.metric(UI_TEXT.marker_region_size, &format_candle_count(info.size), PLOT_CONFIG.marker_color);
        let span = match &info.duration {
            Some(d) => format!("{} → {} ({})", info.start_time, info.end_time, d),
            None => format!("{} → {}", info.start_time, info.end_time),
        };
        ui.label_subdued(span);
        if let Some(close) = info.start_close {
            ui.metric(UI_TEXT.marker_start_close, &format_price(close), PLOT_CONFIG.color_text_subdued);
        }
        if let Some(close) = info.end_close {
            let change = info
                .change_pct()
                .map(|pct| format!(" ({:+.2}%)", pct))
                .unwrap_or_default();
            let color = match info.change_pct() {
                Some(pct) if pct >= 0.0 => PLOT_CONFIG.color_success,
                Some(_) => PLOT_CONFIG.color_error,
                None => PLOT_CONFIG.color_text_subdued,
            };
            ui.metric(UI_TEXT.marker_end_close, &format!("{}{}", format_price(close), change), color);
        }

        if ui.small_button(UI_TEXT.marker_reset).clicked() {
            events.push(UiAction::ResetMarkers);
        }
        events
    }
}

// ============================================================================
// ANNOTATE FORM
// ============================================================================
pub struct AnnotatePanel<'a> {
    form: &'a mut AnnotationForm,
    trades: &'a [TradeSummary],
    /// (trade, position) of the region open for editing
    editing: Option<(TradeId, usize)>,
    series: &'a PriceSeries,
    markers: &'a MarkerCursor,
}

impl<'a> AnnotatePanel<'a> {
    pub(crate) fn new(
        form: &'a mut AnnotationForm,
        trades: &'a [TradeSummary],
        editing: Option<(TradeId, usize)>,
        series: &'a PriceSeries,
        markers: &'a MarkerCursor,
    ) -> Self {
        Self {
            form,
            trades,
            editing,
            series,
            markers,
        }
    }

    pub(crate) fn render(&mut self, ui: &mut Ui) -> Vec<UiAction> {
        let mut events = Vec::new();
        ui.heading(&UI_TEXT.form_heading);

        Grid::new("annotate_grid").num_columns(2).show(ui, |ui| {
            ui.label(UI_TEXT.form_category);
            ComboBox::from_id_salt("category_combo")
                .selected_text(self.form.category.to_string())
                .show_ui(ui, |ui| {
                    for category in Category::iter() {
                        ui.selectable_value(&mut self.form.category, category, category.to_string());
                    }
                });
            ui.end_row();

            ui.label(UI_TEXT.form_feature1);
            let feature1_text = self
                .form
                .feature1
                .map(|f| f.to_string())
                .unwrap_or_else(|| UI_TEXT.form_none.to_string());
            ComboBox::from_id_salt("feature1_combo")
                .selected_text(feature1_text)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.form.feature1, None, UI_TEXT.form_none);
                    for feature in Feature1::iter() {
                        ui.selectable_value(&mut self.form.feature1, Some(feature), feature.to_string());
                    }
                });
            ui.end_row();

            ui.label(UI_TEXT.form_feature2);
            ComboBox::from_id_salt("feature2_combo")
                .selected_text(self.form.feature2.to_string())
                .show_ui(ui, |ui| {
                    for feature in Feature2::iter() {
                        ui.selectable_value(&mut self.form.feature2, feature, feature.to_string());
                    }
                });
            ui.end_row();

            if self.editing.is_none() {
                self.render_trade_group(ui);
            }

            ui.label(UI_TEXT.form_key_price);
            if ui
                .add(DragValue::new(&mut self.form.key_price).speed(0.05).max_decimals(4))
                .changed()
            {
                self.form.key_price_auto = false;
            }
            ui.end_row();

            ui.label(UI_TEXT.form_tags);
            ui.add(TextEdit::singleline(&mut self.form.tags).hint_text(UI_TEXT.form_tags_hint));
            ui.end_row();
        });

        ui.label(UI_TEXT.form_notes);
        ui.add(TextEdit::multiline(&mut self.form.notes).desired_rows(3));

        ui.add_space(4.0);
        let draft = self.form.to_draft(self.series, self.markers);
        match self.editing {
            Some((trade_id, position)) => {
                ui.label_subheader(format!("{} #{}", UI_TEXT.form_editing, position + 1));
                ui.horizontal(|ui| {
                    if ui.button(ui.button_text_primary(UI_TEXT.form_update)).clicked() {
                        events.push(UiAction::UpdateRegion {
                            trade_id,
                            position,
                            draft,
                        });
                    }
                    if ui.button(ui.button_text_secondary(UI_TEXT.form_cancel_edit)).clicked() {
                        events.push(UiAction::CancelEdit);
                    }
                });
            }
            None => {
                let enabled = self.markers.is_usable();
                if ui
                    .add_enabled(enabled, eframe::egui::Button::new(ui.button_text_primary(UI_TEXT.form_save)))
                    .clicked()
                {
                    events.push(UiAction::SaveRegion {
                        target: self.form.save_target(),
                        draft,
                    });
                }
            }
        }
        events
    }

    fn render_trade_group(&mut self, ui: &mut Ui) {
        ui.label(UI_TEXT.form_trade_group);
        let selected_text = match self.form.target {
            FormTarget::New => UI_TEXT.form_new_trade.to_string(),
            FormTarget::Existing(id) => self
                .trades
                .iter()
                .find(|t| t.trade_id == id)
                .map(|t| format!("#{} {}", t.trade_id, t.name))
                .unwrap_or_else(|| UI_TEXT.form_new_trade.to_string()),
        };
        ComboBox::from_id_salt("trade_group_combo")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.form.target, FormTarget::New, UI_TEXT.form_new_trade);
                for trade in self.trades {
                    ui.selectable_value(
                        &mut self.form.target,
                        FormTarget::Existing(trade.trade_id),
                        format!("#{} {}", trade.trade_id, trade.name),
                    );
                }
            });
        ui.end_row();

        if self.form.target == FormTarget::New {
            ui.label(UI_TEXT.form_new_trade_name);
            ui.text_edit_singleline(&mut self.form.new_trade_name);
            ui.end_row();
        }
    }
}

// ============================================================================
// TRADES
// ============================================================================
pub struct TradesPanel<'a> {
    trades: &'a [TradeSummary],
    selection: &'a SelectionState,
    rename_buffer: &'a mut String,
}

impl<'a> TradesPanel<'a> {
    pub fn new(trades: &'a [TradeSummary], selection: &'a SelectionState, rename_buffer: &'a mut String) -> Self {
        Self {
            trades,
            selection,
            rename_buffer,
        }
    }

    pub(crate) fn render(&mut self, ui: &mut Ui) -> Vec<UiAction> {
        let mut events = Vec::new();
        ui.heading(UI_TEXT.trades_heading);

        if self.trades.is_empty() {
            ui.label_subdued(UI_TEXT.trades_empty);
            return events;
        }

        let view = self.selection.view();
        ui.horizontal(|ui| {
            ui.label(UI_TEXT.trades_view);
            let mut picked = view;
            ComboBox::from_id_salt("view_filter_combo")
                .selected_text(match view {
                    ViewFilter::All => UI_TEXT.trades_view_all.to_string(),
                    ViewFilter::Trade(id) => format!("#{}", id),
                })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut picked, ViewFilter::All, UI_TEXT.trades_view_all);
                    for trade in self.trades {
                        ui.selectable_value(
                            &mut picked,
                            ViewFilter::Trade(trade.trade_id),
                            format!("#{} {}", trade.trade_id, trade.name),
                        );
                    }
                });
            if picked != view {
                events.push(UiAction::SetView(picked));
            }
        });

        ScrollArea::vertical()
            .id_salt("trades_scroll")
            .max_height(200.0)
            .show(ui, |ui| {
                Grid::new("trades_grid").striped(true).num_columns(4).show(ui, |ui| {
                    for trade in self.trades {
                        let mut visible = trade.visible;
                        if ui.checkbox(&mut visible, "").changed() {
                            events.push(UiAction::SetTradeVisible(trade.trade_id, visible));
                        }

                        let is_selected = self.selection.selected_trade_id() == Some(trade.trade_id);
                        let text = format!("#{} {}", trade.trade_id, trade.name);
                        if ui.selectable_label(is_selected, text).clicked() && !is_selected {
                            events.push(UiAction::SelectTrade(trade.trade_id));
                        }

                        ui.label_subdued(format!("{} {}", trade.region_count, UI_TEXT.trades_region_count));

                        if ui.small_button(&UI_TEXT.trades_delete).clicked() {
                            events.push(UiAction::DeleteTrade(trade.trade_id));
                        }
                        ui.end_row();
                    }
                });
            });

        if let Some(trade_id) = self.selection.selected_trade_id() {
            ui.horizontal(|ui| {
                ui.add(TextEdit::singleline(self.rename_buffer).desired_width(140.0));
                if ui.small_button(UI_TEXT.trades_rename).clicked() {
                    events.push(UiAction::RenameTrade(trade_id, self.rename_buffer.clone()));
                }
            });
        }
        events
    }
}

// ============================================================================
// REGION TABLE
// ============================================================================
pub struct RegionTablePanel<'a> {
    store: &'a AnnotationStore,
}

impl<'a> RegionTablePanel<'a> {
    pub fn new(store: &'a AnnotationStore) -> Self {
        Self { store }
    }

    pub(crate) fn render(&self, ui: &mut Ui) -> Vec<UiAction> {
        let mut events = Vec::new();
        ui.label_subheader(UI_TEXT.table_heading);

        let selection = self.store.selection();
        let view = selection.view();

        ScrollArea::vertical()
            .id_salt("region_table_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Grid::new("region_table").striped(true).num_columns(12).show(ui, |ui| {
                    for header in [
                        UI_TEXT.table_shown.as_str(),
                        UI_TEXT.table_trade,
                        UI_TEXT.table_id,
                        UI_TEXT.table_category,
                        UI_TEXT.table_span,
                        UI_TEXT.table_key_price,
                        UI_TEXT.table_feature1,
                        UI_TEXT.table_feature2,
                        UI_TEXT.table_tags,
                        UI_TEXT.table_notes,
                        "",
                        "",
                    ] {
                        ui.label(RichText::new(header).strong());
                    }
                    ui.end_row();

                    for trade in self.store.trades().filter(|t| view.includes(t.trade_id)) {
                        for (position, region) in trade.regions.iter().enumerate() {
                            let mut visible = region.visible;
                            if ui.checkbox(&mut visible, "").changed() {
                                events.push(UiAction::SetRegionVisible {
                                    trade_id: trade.trade_id,
                                    position,
                                    visible,
                                });
                            }
                            ui.label(&trade.name);
                            ui.label(region.region_id.to_string());
                            ui.label(
                                RichText::new(region.category.to_string())
                                    .color(PLOT_CONFIG.region_color(region.color)),
                            );
                            ui.label(format_span(self.store.series(), region.start_idx, region.end_idx));
                            ui.label(format_price(region.key_price));
                            ui.label(format_feature(region.feature1));
                            ui.label(format_feature(region.feature2));
                            ui.label(region.tag_list().join(", "));
                            ui.add(Label::new(&region.notes).truncate());

                            let editing = selection.is_editing(trade.trade_id, position);
                            if ui.selectable_label(editing, UI_TEXT.table_edit).clicked() {
                                events.push(if editing {
                                    UiAction::CancelEdit
                                } else {
                                    UiAction::EditRegion {
                                        trade_id: trade.trade_id,
                                        position,
                                    }
                                });
                            }
                            if ui.small_button(&UI_TEXT.table_delete).clicked() {
                                events.push(UiAction::RemoveRegion {
                                    trade_id: trade.trade_id,
                                    position,
                                });
                            }
                            ui.end_row();
                        }
                    }
                });
            });
        events
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::fixtures::daily_series;
    use crate::engine::validate;

    #[test]
    fn test_form_draft_uses_markers_and_clears_feature1() {
        let series = daily_series(300);
        let markers = MarkerCursor::for_series(&series);
        let mut form = AnnotationForm::default();
        form.sync(&series, &markers, &[]);
        assert_eq!(form.key_price, 121.0);

        form.category = Category::EntryRegion;
        form.tags = "breakout, gap".to_string();
        let draft = form.to_draft(&series, &markers);
        assert_eq!((draft.start_idx, draft.end_idx), (Some(10), Some(20)));
        assert_eq!(draft.feature1.as_deref(), Some(""));
        assert_eq!(draft.feature2.as_deref(), Some("None"));

        let validated = validate(&draft, series.max_idx()).unwrap();
        assert_eq!(validated.category, Category::EntryRegion);
        assert_eq!(validated.feature1, None);
        assert_eq!(validated.key_price, 121.0);
    }

    #[test]
    fn test_typed_key_price_stops_following_markers() {
        let series = daily_series(300);
        let mut markers = MarkerCursor::for_series(&series);
        let mut form = AnnotationForm::default();
        form.key_price = 150.25;
        form.key_price_auto = false;
        markers.nudge_end(5);
        form.sync(&series, &markers, &[]);
        assert_eq!(form.key_price, 150.25);
    }

    #[test]
    fn test_sync_drops_deleted_target_trade() {
        let series = daily_series(300);
        let markers = MarkerCursor::for_series(&series);
        let mut form = AnnotationForm {
            target: FormTarget::Existing(3),
            ..Default::default()
        };
        form.sync(&series, &markers, &[]);
        assert_eq!(form.target, FormTarget::New);
    }

    #[test]
    fn test_load_region_round_trips_through_update() {
        let mut store = AnnotationStore::new(Arc::new(daily_series(300)));
        let t = store.create_trade("Swing1").unwrap();
        store
            .add_region(
                t,
                RegionDraft::new(10, 20, Category::BearishRunDown)
                    .with_feature1(Feature1::GapDown)
                    .with_tags("a, b"),
            )
            .unwrap();

        let mut form = AnnotationForm::default();
        form.load_region(t, store.region(t, 0).unwrap());
        assert_eq!(form.target, FormTarget::Existing(t));
        assert_eq!(form.feature1, Some(Feature1::GapDown));
        assert!(!form.key_price_auto);

        let mut markers = MarkerCursor::for_series(store.series());
        markers.set_span(12, 18);
        let updated = store.update_region(t, 0, form.to_draft(store.series(), &markers)).unwrap();
        assert_eq!((updated.start_idx, updated.end_idx), (12, 18));
        assert_eq!(updated.feature1, Some(Feature1::GapDown));
        assert_eq!(updated.feature2, None);
        assert_eq!(updated.tags, "a, b");
    }

    #[test]
    fn test_save_target_follows_form() {
        let mut form = AnnotationForm {
            new_trade_name: "Swing1".to_string(),
            ..Default::default()
        };
        assert_eq!(form.save_target(), SaveTarget::New("Swing1".to_string()));
        form.reset_after_save(4);
        assert_eq!(form.save_target(), SaveTarget::Existing(4));
        assert!(form.new_trade_name.is_empty());
    }
}
