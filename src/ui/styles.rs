use eframe::egui::{Color32, RichText, Ui};

use crate::ui::ui_config::UI_CONFIG;

pub(crate) fn colored_subsection_heading(text: impl Into<String>) -> RichText {
    RichText::new(text.into()).color(UI_CONFIG.colors.subsection_heading)
}

pub(crate) trait UiStyleExt {
    fn label_subdued(&mut self, text: impl Into<String>);
    fn metric(&mut self, label: &str, value: &str, color: Color32);
    fn label_subheader(&mut self, text: impl Into<String>);
    fn button_text_primary(&self, text: impl Into<String>) -> RichText;
    fn button_text_secondary(&self, text: impl Into<String>) -> RichText;
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(Color32::GRAY));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0;
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).small().color(color));
        });
    }

    fn label_subheader(&mut self, text: impl Into<String>) {
        self.label(colored_subsection_heading(text));
    }

    fn button_text_primary(&self, text: impl Into<String>) -> RichText {
        RichText::new(text).strong().color(Color32::GREEN).small()
    }

    fn button_text_secondary(&self, text: impl Into<String>) -> RichText {
        RichText::new(text).strong().color(Color32::WHITE).small()
    }
}
