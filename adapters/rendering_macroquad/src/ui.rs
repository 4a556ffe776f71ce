//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use conquest_core::UnitType;
use conquest_rendering::{Hud, UiAction};
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Snapshot of the control panel's layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext<'a> {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub(crate) background: Color,
    /// Base colour of buttons; hover and click states are derived from it.
    pub(crate) button: conquest_rendering::Color,
    /// Text composed by the session for this frame.
    pub(crate) hud: &'a Hud,
}

/// Renders the control panel and returns the buttons pressed this frame.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext<'_>,
) -> Vec<UiAction> {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button = to_macroquad_color(context.button);
    let hovered = to_macroquad_color(context.button.lighten(0.2));
    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(button)
        .color_hovered(hovered)
        .color_clicked(button)
        .color_selected(button)
        .color_selected_hovered(hovered)
        .color_inactive(button)
        .margin(RectOffset::new(0.0, 0.0, 6.0, 6.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let hud = context.hud;
    let mut pressed = Vec::new();
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        for line in &hud.status {
            ui.label(None, line.as_str());
        }
        if hud.pending {
            ui.label(None, "Waiting for server...");
        }
        ui.separator();

        if ui.button(None, "New Game") {
            pressed.push(UiAction::NewGame);
        }
        if ui.button(None, "End Turn") {
            pressed.push(UiAction::EndTurn);
        }
        if ui.button(None, "Refresh") {
            pressed.push(UiAction::Refresh);
        }
        if ui.button(None, "Save") {
            pressed.push(UiAction::Save);
        }
        if ui.button(None, "Load") {
            pressed.push(UiAction::LoadLastSave);
        }
        ui.separator();

        for line in &hud.details {
            ui.label(None, line.as_str());
        }
        if hud.unit_selected {
            if ui.button(None, "Move") {
                pressed.push(UiAction::ArmMove);
            }
            if ui.button(None, "Attack") {
                pressed.push(UiAction::ArmAttack);
            }
        }
        if hud.city_selected {
            for unit_type in UnitType::ALL {
                let label = build_label(unit_type);
                if ui.button(None, label.as_str()) {
                    pressed.push(UiAction::Produce(unit_type));
                }
            }
        }
        if (hud.unit_selected || hud.city_selected) && ui.button(None, "Deselect") {
            pressed.push(UiAction::Deselect);
        }
    });

    ui.pop_skin();

    pressed
}

fn build_label(unit_type: UnitType) -> String {
    format!("Build {unit_type} ({})", unit_type.cost())
}

pub(crate) fn to_macroquad_color(color: conquest_rendering::Color) -> Color {
    Color::new(color.red, color.green, color.blue, color.alpha)
}
