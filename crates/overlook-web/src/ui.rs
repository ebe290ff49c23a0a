//! Place selector overlay using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use overlook_core::{ControlState, PlaceCatalog};
use overlook_scene::{NavigationFinished, Navigator, PlaceSelected, Places, ReturnHome, ViewControl};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiState>()
            .add_systems(Update, track_arrivals)
            .add_systems(EguiPrimaryContextPass, ui_system);
    }
}

/// What the overlay shows between frames
#[derive(Debug, Clone, Resource, Default)]
pub struct UiState {
    /// Place chosen in the combo box
    pub selected: Option<usize>,
    /// Most recently reached place and where the camera stopped
    pub last_arrival: Option<(usize, Vec3)>,
}

fn track_arrivals(mut finished: MessageReader<NavigationFinished>, mut state: ResMut<UiState>) {
    for arrival in finished.read() {
        state.last_arrival = Some((arrival.place, arrival.position));
    }
}

fn status_text(state: &UiState, navigator: &Navigator, control: &ViewControl) -> String {
    if let Some(place) = navigator.current_place() {
        return format!("Flying to {}...", PlaceCatalog::label(place));
    }
    let arrival = match state.last_arrival {
        Some((place, p)) => format!("{} reached at ({:.1}, {:.1}, {:.1})", PlaceCatalog::label(place), p.x, p.y, p.z),
        None => "Drag to look around".to_string(),
    };
    if control.state() == ControlState::Dragging {
        format!("{} | looking", arrival)
    } else {
        arrival
    }
}

fn ui_system(
    mut contexts: EguiContexts,
    mut state: ResMut<UiState>,
    places: Res<Places>,
    navigator: Res<Navigator>,
    control: Res<ViewControl>,
    mut selections: MessageWriter<PlaceSelected>,
    mut home_requests: MessageWriter<ReturnHome>,
) {
    // Get the egui context - early return if not available
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let status = status_text(&state, &navigator, &control);

    egui::Window::new("Places")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            let selected_text = state
                .selected
                .map(PlaceCatalog::label)
                .unwrap_or_else(|| "Select a place".to_string());

            ui.horizontal(|ui| {
                egui::ComboBox::from_id_salt("place_selector")
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        for index in 0..places.len() {
                            let label = PlaceCatalog::label(index);
                            if ui.selectable_label(state.selected == Some(index), label).clicked() {
                                state.selected = Some(index);
                                selections.write(PlaceSelected { index });
                            }
                        }
                    });

                if ui.button("Home").clicked() {
                    state.selected = None;
                    home_requests.write(ReturnHome);
                }
            });

            ui.separator();
            ui.label(egui::RichText::new(status).small());
        });
}
