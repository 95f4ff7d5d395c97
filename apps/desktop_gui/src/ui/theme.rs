//! Colors shared by the panels.

use eframe::egui;
use shared::domain::Category;

pub const APP_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(41, 37, 36);
pub const CARD_FILL: egui::Color32 = egui::Color32::from_rgb(68, 64, 60);
pub const TEXT: egui::Color32 = egui::Color32::from_rgb(250, 250, 249);
pub const MUTED_TEXT: egui::Color32 = egui::Color32::from_rgb(168, 162, 158);
pub const DISPUTED: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);

pub fn category_color(category: Category) -> egui::Color32 {
    let [r, g, b] = category.color_rgb();
    egui::Color32::from_rgb(r, g, b)
}

pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = APP_BACKGROUND;
    visuals.window_fill = CARD_FILL;
    visuals.override_text_color = Some(TEXT);
    visuals.hyperlink_color = MUTED_TEXT;
    ctx.set_visuals(visuals);
}
