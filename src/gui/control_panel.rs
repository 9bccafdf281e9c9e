//! Filter Panel Widget
//! Left side panel with the data source, filters and export controls.

use crate::data::{CrashTable, FilterField, Predicates};
use egui::{Color32, RichText, ScrollArea};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub csv_path: PathBuf,
    pub predicates: Predicates,
    /// Selectable values per filter field; fields without values are hidden.
    pub options: BTreeMap<FilterField, Vec<String>>,
    pub is_busy: bool,
    pub status: String,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(csv_path: PathBuf) -> Self {
        Self {
            csv_path,
            predicates: Predicates::new(),
            options: BTreeMap::new(),
            is_busy: false,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }

    /// Refresh filter choices after a table load. Old selections are dropped.
    pub fn update_options(&mut self, table: &CrashTable) {
        self.predicates.clear();
        self.options = FilterField::ALL
            .iter()
            .map(|&field| (field, table.filter_options(field)))
            .filter(|(_, values)| !values.is_empty())
            .collect();
        self.export_enabled = true;
    }

    pub fn clear_options(&mut self) {
        self.predicates.clear();
        self.options.clear();
        self.export_enabled = false;
    }

    /// Draw the panel and report what the user asked for this frame.
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Header
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("✈ Air Crash Data")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Analysis Dashboard").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let file_name = self
                    .csv_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "No file selected".to_string());
                ui.label(RichText::new(file_name).size(12.0));

                ui.horizontal(|ui| {
                    ui.add_enabled_ui(!self.is_busy, |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                        if ui.button("🔄 Reload").clicked() {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.horizontal(|ui| {
            ui.label(RichText::new("🔧 Filters").size(14.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!self.predicates.is_empty(), egui::Button::new("Reset").small())
                    .clicked()
                {
                    self.predicates.clear();
                    action = ControlPanelAction::FiltersChanged;
                }
            });
        });
        ui.add_space(8.0);

        if self.options.is_empty() {
            ui.label(RichText::new("Load data to enable filters").color(Color32::GRAY));
        }

        for (&field, values) in &self.options {
            let selected = self
                .predicates
                .allowed(field)
                .map(|set| set.len())
                .unwrap_or(0);
            let header = if selected == 0 {
                format!("{} (all)", field.label())
            } else {
                format!("{} ({} selected)", field.label(), selected)
            };

            egui::CollapsingHeader::new(header)
                .id_salt(field.name())
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.small_button("Select All").clicked() {
                            self.predicates.set(field, values.iter().cloned());
                            action = ControlPanelAction::FiltersChanged;
                        }
                        if ui.small_button("Clear All").clicked() {
                            self.predicates.clear_field(field);
                            action = ControlPanelAction::FiltersChanged;
                        }
                    });

                    egui::Frame::none()
                        .fill(ui.visuals().widgets.noninteractive.bg_fill)
                        .rounding(5.0)
                        .inner_margin(5.0)
                        .show(ui, |ui| {
                            ScrollArea::vertical()
                                .id_salt(field.name())
                                .max_height(160.0)
                                .show(ui, |ui| {
                                    for value in values {
                                        let mut checked = self.predicates.is_selected(field, value);
                                        if ui.checkbox(&mut checked, value).changed() {
                                            self.predicates.toggle(field, value);
                                            action = ControlPanelAction::FiltersChanged;
                                        }
                                    }
                                });
                        });
                });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled && !self.is_busy, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.horizontal(|ui| {
            if self.is_busy {
                ui.spinner();
            }
            let status_color = if self.status.starts_with("Error") {
                Color32::from_rgb(220, 53, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        });

        action
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

/// User requests raised by the filter panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Reload,
    FiltersChanged,
    ExportPng,
}
