//! egui rendering of control panels.

use rand::Rng;

use crate::{ControlChange, ControlNode, ControlPanels, ControlPath, ControlTree, ControlValue};

/// Drag speed for unbounded numbers.
const DRAG_SPEED: f64 = 0.01;

impl ControlPanels {
    /// Draw every panel in one window and return the edits made this frame.
    ///
    /// Panels are top-level collapsible headers, open by default. Nested
    /// folders start closed.
    pub fn show(&mut self, ctx: &egui::Context, width: f32) -> Vec<ControlChange> {
        let mut changes = Vec::new();
        let rng = &mut self.rng;
        let panels = &mut self.panels;

        egui::Window::new("Controls")
            .default_width(width)
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for panel in panels.iter_mut() {
                        let root = ControlPath::root(&panel.title);
                        egui::CollapsingHeader::new(panel.title.as_str())
                            .id_salt(root.to_string())
                            .default_open(true)
                            .show(ui, |ui| {
                                show_tree(ui, &mut panel.tree, &root, rng, &mut changes);
                            });
                    }
                });
            });

        changes
    }
}

fn show_tree<R: Rng + ?Sized>(
    ui: &mut egui::Ui,
    tree: &mut ControlTree,
    at: &ControlPath,
    rng: &mut R,
    changes: &mut Vec<ControlChange>,
) {
    for (key, node) in tree.iter_mut() {
        let path = at.child(key);
        match node {
            ControlNode::Folder(inner) => {
                egui::CollapsingHeader::new(key)
                    .id_salt(path.to_string())
                    .show(ui, |ui| show_tree(ui, inner, &path, rng, changes));
            }
            ControlNode::Leaf(value) => {
                if show_value(ui, key, &path, value, rng) {
                    tracing::trace!(path = %path, "control edited");
                    changes.push(ControlChange {
                        value: value.clone(),
                        path,
                    });
                }
            }
        }
    }
}

/// Draw one leaf. Returns whether it changed.
fn show_value<R: Rng + ?Sized>(
    ui: &mut egui::Ui,
    label: &str,
    path: &ControlPath,
    value: &mut ControlValue,
    rng: &mut R,
) -> bool {
    match value {
        ControlValue::Number { value, range } => match (range.min, range.max) {
            (Some(min), Some(max)) => {
                let mut slider = egui::Slider::new(value, min..=max).text(label);
                if let Some(step) = range.step {
                    slider = slider.step_by(step);
                }
                ui.add(slider).changed()
            }
            (min, max) => {
                let before = *value;
                ui.horizontal(|ui| {
                    ui.add(
                        egui::DragValue::new(&mut *value)
                            .speed(range.step.unwrap_or(DRAG_SPEED))
                            .range(min.unwrap_or(f64::NEG_INFINITY)..=max.unwrap_or(f64::INFINITY)),
                    );
                    ui.label(label);
                });
                *value = range.constrain(*value);
                *value != before
            }
        },
        ControlValue::Bool(checked) => ui.checkbox(checked, label).changed(),
        ControlValue::Text(text) => {
            ui.horizontal(|ui| {
                let response = ui.text_edit_singleline(text);
                ui.label(label);
                response.changed()
            })
            .inner
        }
        ControlValue::Color(color) => {
            ui.horizontal(|ui| {
                let response = ui.color_edit_button_srgb(&mut color.0);
                ui.label(label);
                response.changed()
            })
            .inner
        }
        ControlValue::Choice { selected, options } => {
            let before = *selected;
            let current = options
                .get(*selected)
                .map(|option| option.label.clone())
                .unwrap_or_default();
            egui::ComboBox::new(path.to_string(), label)
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for (index, option) in options.iter().enumerate() {
                        ui.selectable_value(&mut *selected, index, option.label.as_str());
                    }
                });
            *selected != before
        }
        ControlValue::Function {
            function,
            last_result,
        } => {
            let pressed = ui
                .horizontal(|ui| {
                    let pressed = ui.button(label).clicked();
                    if let Some(result) = last_result.as_deref() {
                        ui.weak(result);
                    }
                    pressed
                })
                .inner;
            if pressed {
                *last_result = Some(function.invoke(rng));
            }
            pressed
        }
    }
}
