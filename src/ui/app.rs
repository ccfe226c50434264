use std::sync::Arc;

use anyhow::Result;
use eframe::egui::{CentralPanel, Context, RichText, ScrollArea, SidePanel, TopBottomPanel, Ui};
use eframe::{Frame, Storage};
use serde::{Deserialize, Serialize};

use crate::Cli;

use crate::config::plot::PLOT_CONFIG;

#[cfg(debug_assertions)]
use crate::config::DF;

use crate::data::{CsvSource, SeriesSource};
use crate::domain::PriceSeries;
use crate::engine::{AnnotationResult, AnnotationStore};
use crate::models::{MarkerCursor, RegionDraft, RegionId, TradeId};

use crate::ui::ui_config::{UI_CONFIG, setup_custom_visuals};
use crate::ui::ui_panels::{
    AnnotatePanel, AnnotationForm, FormTarget, MarkerPanel, RegionTablePanel, SaveTarget, TradesPanel, UiAction,
};
use crate::ui::ui_plot_view::{PlotInteraction, PlotView, PlotVisibility};
use crate::ui::ui_text::UI_TEXT;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Live editing state for one loaded series.
pub(crate) struct Session {
    pub store: AnnotationStore,
    pub markers: MarkerCursor,
    pub form: AnnotationForm,
    pub rename_buffer: String,
    pub status: StatusMessage,
}

impl Session {
    pub fn new(series: PriceSeries) -> Self {
        let markers = MarkerCursor::for_series(&series);
        Self {
            store: AnnotationStore::new(Arc::new(series)),
            markers,
            form: AnnotationForm::default(),
            rename_buffer: String::new(),
            status: StatusMessage::info(UI_TEXT.status_ready),
        }
    }

    /// Apply one panel action. Failures land in the status line; nothing here is fatal.
    pub fn apply(&mut self, action: UiAction) {
        #[cfg(debug_assertions)]
        if DF.log_selection {
            log::info!("UI action: {:?}", action);
        }

        let outcome: AnnotationResult<Option<StatusMessage>> = match action {
            UiAction::NudgeStart(delta) => {
                self.markers.nudge_start(delta);
                Ok(None)
            }
            UiAction::NudgeEnd(delta) => {
                self.markers.nudge_end(delta);
                Ok(None)
            }
            UiAction::SetStart(idx) => {
                self.markers.set_start(idx);
                Ok(None)
            }
            UiAction::SetEnd(idx) => {
                self.markers.set_end(idx);
                Ok(None)
            }
            UiAction::ResetMarkers => {
                self.markers.reset();
                Ok(None)
            }
            UiAction::SaveRegion { target, draft } => self.save_region(target, draft).map(|(trade_id, region_id)| {
                self.form.reset_after_save(trade_id);
                Some(StatusMessage::info(format!(
                    "{} (trade #{}, region #{})",
                    UI_TEXT.status_saved, trade_id, region_id
                )))
            }),
            UiAction::UpdateRegion {
                trade_id,
                position,
                draft,
            } => self.update_region(trade_id, position, draft).map(|_| {
                self.form.key_price_auto = true;
                Some(StatusMessage::info(UI_TEXT.status_updated))
            }),
            UiAction::EditRegion { trade_id, position } => self.edit_region(trade_id, position).map(|_| None),
            UiAction::CancelEdit => {
                self.store.clear_region_edit();
                self.form.key_price_auto = true;
                Ok(None)
            }
            UiAction::RemoveRegion { trade_id, position } => self
                .store
                .remove_region(trade_id, position)
                .map(|_| Some(StatusMessage::info(UI_TEXT.status_removed))),
            UiAction::SetRegionVisible {
                trade_id,
                position,
                visible,
            } => self
                .store
                .set_region_visible(trade_id, position, visible)
                .map(|_| None),
            UiAction::SelectTrade(trade_id) => self.store.select_trade(trade_id).map(|_| {
                self.form.target = FormTarget::Existing(trade_id);
                None
            }),
            UiAction::DeleteTrade(trade_id) => Ok(self
                .store
                .delete_trade(trade_id)
                .map(|_| StatusMessage::info(UI_TEXT.status_trade_deleted))),
            UiAction::SetTradeVisible(trade_id, visible) => {
                self.store.set_trade_visible(trade_id, visible).map(|_| None)
            }
            UiAction::RenameTrade(trade_id, name) => self.store.rename_trade(trade_id, &name).map(|_| {
                self.rename_buffer.clear();
                None
            }),
            UiAction::SetView(view) => self.store.set_view_filter(view).map(|_| None),
        };

        match outcome {
            Ok(Some(message)) => self.status = message,
            Ok(None) => {}
            Err(err) => {
                log::warn!("Annotation rejected: {}", err);
                self.status = StatusMessage::error(err.to_string());
            }
        }
    }

    /// A new trade is only created once the draft is known to be valid, so a rejected
    /// save never leaves an empty trade behind.
    fn save_region(&mut self, target: SaveTarget, draft: RegionDraft) -> AnnotationResult<(TradeId, RegionId)> {
        let trade_id = match target {
            SaveTarget::Existing(trade_id) => trade_id,
            SaveTarget::New(name) => {
                self.store.check_draft(&draft)?;
                self.store.create_trade(&name)?
            }
        };
        let region_id = self.store.add_region(trade_id, draft)?;
        Ok((trade_id, region_id))
    }

    fn update_region(&mut self, trade_id: TradeId, position: usize, draft: RegionDraft) -> AnnotationResult<()> {
        self.store.update_region(trade_id, position, draft)?;
        self.store.clear_region_edit();
        Ok(())
    }

    fn edit_region(&mut self, trade_id: TradeId, position: usize) -> AnnotationResult<()> {
        self.store.select_region_for_edit(trade_id, position)?;
        let region = self.store.region(trade_id, position)?;
        self.markers.set_span(region.start_idx, region.end_idx);
        self.form.load_region(trade_id, region);
        Ok(())
    }

    fn editing(&self) -> Option<(TradeId, usize)> {
        let selection = self.store.selection();
        selection.selected_trade_id().zip(selection.editing_region_index())
    }
}

pub(crate) enum AppState {
    Failed(String),
    Running(Session),
}

impl Default for AppState {
    fn default() -> Self {
        Self::Failed(String::new())
    }
}

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct AnnotatorApp {
    pub(crate) plot_visibility: PlotVisibility,

    #[serde(skip)]
    pub(crate) plot_view: PlotView,
    #[serde(skip)]
    pub(crate) state: AppState,
}

impl Default for AnnotatorApp {
    fn default() -> Self {
        Self {
            plot_visibility: PlotVisibility::default(),
            plot_view: PlotView::new(),
            state: AppState::default(),
        }
    }
}

fn load_series(args: &Cli) -> Result<PriceSeries> {
    let source = CsvSource {
        path: args.csv.clone(),
        symbol: args.symbol.clone(),
        interval: args.interval.clone(),
        tail: args.tail,
    };
    source.load()
}

impl AnnotatorApp {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> Self {
        let mut app: AnnotatorApp = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Self::default()
        };

        app.state = match load_series(&args) {
            Ok(series) => {
                log::info!(
                    "Loaded {} candles of {} {} from {}",
                    series.len(),
                    series.symbol,
                    series.interval,
                    args.csv.display()
                );
                AppState::Running(Session::new(series))
            }
            Err(err) => {
                log::error!("{:#}", err);
                AppState::Failed(format!("{:#}", err))
            }
        };
        app
    }

    fn render_plot_toggles(ui: &mut Ui, visibility: &mut PlotVisibility) {
        ui.horizontal(|ui| {
            ui.checkbox(&mut visibility.candles, &UI_TEXT.plot_toggle_candles);
            ui.checkbox(&mut visibility.regions, UI_TEXT.plot_toggle_regions);
            ui.checkbox(&mut visibility.key_prices, UI_TEXT.plot_toggle_key_prices);
            ui.checkbox(&mut visibility.markers, UI_TEXT.plot_toggle_markers);
        });
    }

    fn render_running(&mut self, ctx: &Context) {
        let AppState::Running(session) = &mut self.state else {
            return;
        };
        let mut actions = Vec::new();

        let trades = session.store.list_trades();
        session.form.sync(session.store.series(), &session.markers, &trades);

        SidePanel::left("left_panel")
            .min_width(UI_CONFIG.side_panel_width)
            .resizable(false)
            .frame(UI_CONFIG.side_panel_frame())
            .show(ctx, |ui| {
                ScrollArea::vertical().id_salt("left_scroll").show(ui, |ui| {
                    actions.extend(MarkerPanel::new(session.store.series(), &session.markers).render(ui));
                    ui.separator();

                    let editing = session.editing();
                    actions.extend(
                        AnnotatePanel::new(
                            &mut session.form,
                            &trades,
                            editing,
                            session.store.series(),
                            &session.markers,
                        )
                        .render(ui),
                    );
                    ui.separator();

                    actions.extend(
                        TradesPanel::new(&trades, session.store.selection(), &mut session.rename_buffer).render(ui),
                    );
                });
            });

        TopBottomPanel::bottom("status_panel")
            .frame(UI_CONFIG.bottom_panel_frame())
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let color = if session.status.is_error {
                        PLOT_CONFIG.color_error
                    } else {
                        PLOT_CONFIG.color_text_subdued
                    };
                    ui.label(RichText::new(&session.status.text).color(color));
                    ui.separator();
                    ui.label(RichText::new(session.store.selection().to_string()).small());
                });
            });

        TopBottomPanel::bottom("region_table_panel")
            .frame(UI_CONFIG.bottom_panel_frame())
            .resizable(true)
            .default_height(UI_CONFIG.region_table_height)
            .show(ctx, |ui| {
                actions.extend(RegionTablePanel::new(&session.store).render(ui));
            });

        let overlays = session.store.project();
        let visibility = &mut self.plot_visibility;
        let plot_view = &mut self.plot_view;
        CentralPanel::default()
            .frame(UI_CONFIG.central_panel_frame())
            .show(ctx, |ui| {
                Self::render_plot_toggles(ui, visibility);
                let interaction = plot_view.show_my_plot(
                    ui,
                    session.store.series(),
                    &overlays,
                    &session.markers,
                    visibility,
                );
                match interaction {
                    PlotInteraction::SetStart(idx) => actions.push(UiAction::SetStart(idx)),
                    PlotInteraction::SetEnd(idx) => actions.push(UiAction::SetEnd(idx)),
                    PlotInteraction::None => {}
                }
            });

        for action in actions {
            session.apply(action);
        }
    }
}

fn render_fullscreen_message(ui: &mut Ui, title: &str, subtitle: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading(title);
        ui.add_space(6.0);
        ui.label(RichText::new(subtitle).color(PLOT_CONFIG.color_error));
    });
}

impl eframe::App for AnnotatorApp {
    fn save(&mut self, storage: &mut dyn Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);
        // No I-beam cursor over labels; text edits still select
        ctx.style_mut(|s| s.interaction.selectable_labels = false);

        if let AppState::Failed(reason) = &self.state {
            CentralPanel::default().show(ctx, |ui| {
                render_fullscreen_message(ui, &UI_TEXT.status_load_failed, reason);
            });
            return;
        }
        self.render_running(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::domain::fixtures::daily_series;

    fn session() -> Session {
        Session::new(daily_series(300))
    }

    #[test]
    fn test_save_to_new_trade_then_existing() {
        let mut s = session();
        s.form.new_trade_name = "Swing1".to_string();
        s.form.sync(s.store.series(), &s.markers, &[]);
        let draft = s.form.to_draft(s.store.series(), &s.markers);
        s.apply(UiAction::SaveRegion {
            target: s.form.save_target(),
            draft,
        });
        assert!(!s.status.is_error, "{}", s.status.text);
        assert_eq!(s.store.list_trades().len(), 1);
        assert_eq!(s.form.target, FormTarget::Existing(1));

        s.markers.set_span(25, 30);
        s.form.category = Category::EntryRegion;
        s.form.key_price_auto = true;
        s.form.sync(s.store.series(), &s.markers, &s.store.list_trades());
        let draft = s.form.to_draft(s.store.series(), &s.markers);
        s.apply(UiAction::SaveRegion {
            target: s.form.save_target(),
            draft,
        });

        let trade = s.store.get_trade(1).unwrap();
        assert_eq!(trade.regions.len(), 2);
        assert_eq!(trade.regions[1].region_id, 2);
        assert_eq!(s.store.project().len(), 2);
    }

    #[test]
    fn test_invalid_save_does_not_create_trade() {
        let mut s = session();
        let draft = RegionDraft::new(295, 310, Category::BullishRunUp).with_key_price(1.0);
        s.apply(UiAction::SaveRegion {
            target: SaveTarget::New("Swing1".to_string()),
            draft,
        });
        assert!(s.status.is_error);
        assert!(s.status.text.contains("end_idx"), "got {}", s.status.text);
        assert!(s.store.list_trades().is_empty());
    }

    #[test]
    fn test_missing_key_price_saves_to_either_target() {
        let mut s = session();
        let t = s.store.create_trade("Swing1").unwrap();
        s.apply(UiAction::SaveRegion {
            target: SaveTarget::Existing(t),
            draft: RegionDraft::new(10, 20, Category::EntryRegion),
        });
        assert!(!s.status.is_error, "{}", s.status.text);

        s.apply(UiAction::SaveRegion {
            target: SaveTarget::New("Fresh".to_string()),
            draft: RegionDraft::new(10, 20, Category::EntryRegion),
        });
        assert!(!s.status.is_error, "{}", s.status.text);
        assert_eq!(s.store.list_trades().len(), 2);

        let close = s.store.series().close_at(20);
        for trade in s.store.trades() {
            assert_eq!(Some(trade.regions[0].key_price), close);
        }
    }

    #[test]
    fn test_unnamed_new_trade_is_reported() {
        let mut s = session();
        let draft = s.form.to_draft(s.store.series(), &s.markers);
        s.apply(UiAction::SaveRegion {
            target: SaveTarget::New("  ".to_string()),
            draft,
        });
        assert!(s.status.is_error);
        assert!(s.store.list_trades().is_empty());
    }

    #[test]
    fn test_edit_loads_markers_and_update_clears_edit() {
        let mut s = session();
        let t = s.store.create_trade("T").unwrap();
        s.store
            .add_region(t, RegionDraft::new(40, 60, Category::BearishRunDown))
            .unwrap();

        s.apply(UiAction::EditRegion { trade_id: t, position: 0 });
        assert_eq!((s.markers.start_idx(), s.markers.end_idx()), (40, 60));
        assert_eq!(s.editing(), Some((t, 0)));
        assert_eq!(s.form.category, Category::BearishRunDown);

        s.apply(UiAction::NudgeEnd(2));
        let draft = s.form.to_draft(s.store.series(), &s.markers);
        s.apply(UiAction::UpdateRegion {
            trade_id: t,
            position: 0,
            draft,
        });
        assert!(!s.status.is_error, "{}", s.status.text);
        assert_eq!(s.store.region(t, 0).unwrap().end_idx, 62);
        assert_eq!(s.editing(), None);
    }

    #[test]
    fn test_errors_from_stale_actions_become_status() {
        let mut s = session();
        s.apply(UiAction::RemoveRegion { trade_id: 9, position: 0 });
        assert!(s.status.is_error);

        s.apply(UiAction::DeleteTrade(9));
        assert!(s.status.is_error, "silent delete leaves the previous message");
    }
}
