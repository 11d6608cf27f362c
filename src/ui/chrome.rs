//! The explorer's widget layer: system visibility checkboxes, display
//! options, view presets, search, the part info panel, and the projected
//! label overlay.
//!
//! The chrome is deliberately passive. It renders from the registry and its
//! own view state, and every user interaction comes back as a
//! [`ChromeAction`] for the app loop to apply. That keeps all mutation of
//! the registry, camera, and selection in one place.

use imgui::Ui;

use crate::gfx::camera::ViewPreset;
use crate::interact::{LabelPlacement, PanelUpdate, PanelViewModel};
use crate::registry::AnatomyRegistry;

/// A user interaction the app loop must apply.
#[derive(Debug, Clone, PartialEq)]
pub enum ChromeAction {
    ToggleSystem { system_id: String, visible: bool },
    SoloSystem(String),
    ToggleLabels(bool),
    ToggleGrid(bool),
    Search(String),
    SetView(ViewPreset),
    ClosePanel,
}

/// Per-frame chrome state and widget builder.
pub struct UiChrome {
    panel: Option<PanelViewModel>,
    search_text: String,
    show_labels: bool,
    show_grid: bool,
    pending_systems: Vec<String>,
}

impl UiChrome {
    pub fn new() -> Self {
        Self {
            panel: None,
            search_text: String::new(),
            show_labels: true,
            show_grid: true,
            pending_systems: Vec::new(),
        }
    }

    /// Applies a selection-machine instruction to the info panel.
    pub fn apply_panel_update(&mut self, update: PanelUpdate) {
        match update {
            PanelUpdate::Show(view_model) => self.panel = Some(view_model),
            PanelUpdate::Hide => self.panel = None,
        }
    }

    pub fn panel_shown(&self) -> bool {
        self.panel.is_some()
    }

    /// Marks systems whose models are still loading; shown in the overlay.
    pub fn set_pending_systems(&mut self, system_ids: Vec<String>) {
        self.pending_systems = system_ids;
    }

    pub fn mark_system_settled(&mut self, system_id: &str) {
        self.pending_systems.retain(|id| id != system_id);
    }

    /// Builds all chrome windows for this frame and collects the resulting
    /// actions.
    pub fn build(
        &mut self,
        ui: &Ui,
        registry: &AnatomyRegistry,
        labels: &[LabelPlacement],
    ) -> Vec<ChromeAction> {
        let mut actions = Vec::new();

        self.draw_control_panel(ui, registry, &mut actions);
        self.draw_info_panel(ui, &mut actions);
        self.draw_labels(ui, registry, labels);
        self.draw_loading_overlay(ui);

        actions
    }

    fn draw_control_panel(
        &mut self,
        ui: &Ui,
        registry: &AnatomyRegistry,
        actions: &mut Vec<ChromeAction>,
    ) {
        ui.window("Anatomy Explorer")
            .size([300.0, 520.0], imgui::Condition::FirstUseEver)
            .position([20.0, 20.0], imgui::Condition::FirstUseEver)
            .build(|| {
                ui.text("Body Systems");
                ui.separator();

                for system in registry.systems() {
                    let mut visible = system.visible;
                    if ui.checkbox(&title_case(&system.id), &mut visible) {
                        actions.push(ChromeAction::ToggleSystem {
                            system_id: system.id.clone(),
                            visible,
                        });
                    }
                    ui.same_line();
                    if ui.small_button(format!("solo##{}", system.id)) {
                        actions.push(ChromeAction::SoloSystem(system.id.clone()));
                    }
                }

                ui.spacing();
                ui.text("Display");
                ui.separator();

                if ui.checkbox("Labels", &mut self.show_labels) {
                    actions.push(ChromeAction::ToggleLabels(self.show_labels));
                }
                if ui.checkbox("Grid", &mut self.show_grid) {
                    actions.push(ChromeAction::ToggleGrid(self.show_grid));
                }

                ui.spacing();
                ui.text("View");
                ui.separator();

                let presets = [
                    ("Reset", ViewPreset::Reset),
                    ("Front", ViewPreset::Front),
                    ("Back", ViewPreset::Back),
                    ("Side", ViewPreset::Side),
                    ("Top", ViewPreset::Top),
                ];
                for (i, (label, preset)) in presets.iter().enumerate() {
                    if i % 3 != 0 {
                        ui.same_line();
                    }
                    if ui.button(label) {
                        actions.push(ChromeAction::SetView(*preset));
                    }
                }

                ui.spacing();
                ui.text("Search");
                ui.separator();

                ui.input_text("##search", &mut self.search_text).build();
                ui.same_line();
                if ui.button("Find") && !self.search_text.trim().is_empty() {
                    actions.push(ChromeAction::Search(self.search_text.clone()));
                }
            });
    }

    fn draw_info_panel(&mut self, ui: &Ui, actions: &mut Vec<ChromeAction>) {
        let Some(view_model) = &self.panel else {
            return;
        };
        let display_size = ui.io().display_size;

        ui.window("Part Details")
            .size([340.0, 280.0], imgui::Condition::FirstUseEver)
            .position(
                [display_size[0] - 360.0, 20.0],
                imgui::Condition::FirstUseEver,
            )
            .build(|| {
                ui.text(&view_model.name);
                ui.separator();

                ui.text_wrapped(&view_model.description);
                ui.spacing();

                ui.text("Function:");
                ui.text_wrapped(&view_model.function);
                ui.spacing();

                if !view_model.related.is_empty() {
                    ui.text("Related:");
                    for related in &view_model.related {
                        ui.bullet_text(related);
                    }
                    ui.spacing();
                }

                if ui.button("Close") {
                    actions.push(ChromeAction::ClosePanel);
                }
            });
    }

    /// Draws label text at the projected anchors on the background draw
    /// list, behind every window.
    fn draw_labels(&self, ui: &Ui, registry: &AnatomyRegistry, labels: &[LabelPlacement]) {
        if labels.iter().all(|placement| !placement.shown) {
            return;
        }

        let draw_list = ui.get_background_draw_list();
        for placement in labels.iter().filter(|placement| placement.shown) {
            let Ok(part) = registry.get_part(&placement.part_id) else {
                continue;
            };
            draw_list.add_text(
                [placement.screen_x, placement.screen_y],
                [0.12, 0.12, 0.12, 1.0],
                &part.display_name,
            );
        }
    }

    fn draw_loading_overlay(&self, ui: &Ui) {
        if self.pending_systems.is_empty() {
            return;
        }
        let display_size = ui.io().display_size;

        ui.window("##loading")
            .position(
                [display_size[0] * 0.5 - 110.0, display_size[1] * 0.5 - 40.0],
                imgui::Condition::Always,
            )
            .size([220.0, 0.0], imgui::Condition::Always)
            .title_bar(false)
            .resizable(false)
            .movable(false)
            .build(|| {
                ui.text("Loading anatomy models...");
                for system_id in &self.pending_systems {
                    ui.bullet_text(title_case(system_id));
                }
            });
    }
}

impl Default for UiChrome {
    fn default() -> Self {
        Self::new()
    }
}

fn title_case(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_updates_drive_panel_visibility() {
        let mut chrome = UiChrome::new();
        assert!(!chrome.panel_shown());

        chrome.apply_panel_update(PanelUpdate::Show(PanelViewModel {
            name: "Heart".to_string(),
            description: "The heart pumps blood throughout the body.".to_string(),
            function: "Pump blood, circulate oxygen and nutrients".to_string(),
            related: vec!["Lungs".to_string()],
        }));
        assert!(chrome.panel_shown());

        chrome.apply_panel_update(PanelUpdate::Hide);
        assert!(!chrome.panel_shown());

        // Hiding an already hidden panel stays hidden.
        chrome.apply_panel_update(PanelUpdate::Hide);
        assert!(!chrome.panel_shown());
    }

    #[test]
    fn pending_systems_drain_as_loads_settle() {
        let mut chrome = UiChrome::new();
        chrome.set_pending_systems(vec!["skeletal".to_string(), "nervous".to_string()]);

        chrome.mark_system_settled("skeletal");
        assert_eq!(chrome.pending_systems, vec!["nervous".to_string()]);

        chrome.mark_system_settled("nervous");
        assert!(chrome.pending_systems.is_empty());
    }

    #[test]
    fn title_case_capitalizes_system_ids() {
        assert_eq!(title_case("skeletal"), "Skeletal");
        assert_eq!(title_case(""), "");
    }
}
