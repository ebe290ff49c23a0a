//! Bevy application setup

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::{DefaultPickingPlugins, prelude::MeshPickingPlugin};
use overlook_core::ViewerConfig;
use overlook_scene::OverlookScenePlugin;
use tracing::{info, warn};

use crate::ui::UiPlugin;

const CANVAS_SELECTOR: &str = "#overlook-canvas";

/// Configuration shipped with the page
const EMBEDDED_CONFIG: &str = include_str!("../overlook.toml");

/// Configuration overrides taken from the page URL (`?seed=42&places=20`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlOverrides {
    pub seed: Option<u64>,
    pub places: Option<usize>,
}

impl UrlOverrides {
    #[cfg(target_arch = "wasm32")]
    pub fn from_browser() -> Self {
        web_sys::window()
            .and_then(|window| window.location().search().ok())
            .map(|search| Self::from_query(&search))
            .unwrap_or_default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_browser() -> Self {
        Self::default()
    }

    pub fn from_query(search: &str) -> Self {
        let seed = parse_query_param(search, "seed").and_then(|value| match value.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!(value = %value, "Ignoring invalid seed parameter");
                None
            }
        });
        let places = parse_query_param(search, "places").and_then(|value| match value.parse::<usize>() {
            Ok(count) if count > 0 => Some(count),
            _ => {
                warn!(value = %value, "Ignoring invalid places parameter");
                None
            }
        });
        Self { seed, places }
    }

    pub fn apply(&self, config: &mut ViewerConfig) {
        if let Some(seed) = self.seed {
            info!(seed, "Using seed from URL parameter");
            config.seed = Some(seed);
        }
        if let Some(count) = self.places {
            info!(count, "Using place count from URL parameter");
            config.places.count = count;
        }
    }
}

fn parse_query_param(search: &str, param: &str) -> Option<String> {
    let search = search.trim_start_matches('?');
    for pair in search.split('&') {
        let mut parts = pair.splitn(2, '=');
        if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
            if key == param {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Embedded configuration with URL overrides applied
fn load_config() -> ViewerConfig {
    let mut config = match ViewerConfig::from_toml_str(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Embedded config rejected, using defaults");
            ViewerConfig::default()
        }
    };
    UrlOverrides::from_browser().apply(&mut config);
    config
}

#[cfg(target_arch = "wasm32")]
fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

/// Dragging across the canvas must not select page text
#[cfg(target_arch = "wasm32")]
fn suppress_canvas_selection() {
    use wasm_bindgen::JsCast;

    let Some(canvas) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.query_selector(CANVAS_SELECTOR).ok().flatten())
        .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        warn!(selector = CANVAS_SELECTOR, "Canvas not found");
        return;
    };
    let style = canvas.style();
    for property in ["user-select", "-webkit-user-select"] {
        if style.set_property(property, "none").is_err() {
            warn!(property, "Failed to set canvas style");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn suppress_canvas_selection() {}

pub fn run() {
    let config = load_config();
    let seed = config.seed.unwrap_or_else(clock_seed);
    info!(seed, "Starting Overlook");
    suppress_canvas_selection();

    App::new()
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Overlook".to_string(),
                    canvas: Some(CANVAS_SELECTOR.to_string()),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: false,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                // No .meta files are served alongside assets
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
        )
        // Picking must be added BEFORE EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .add_plugins(OverlookScenePlugin { config, seed })
        .add_plugins(UiPlugin)
        .run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_param() {
        assert_eq!(parse_query_param("?seed=42&places=3", "places"), Some("3".to_string()));
        assert_eq!(parse_query_param("seed=42", "seed"), Some("42".to_string()));
        assert_eq!(parse_query_param("?seed", "seed"), None);
        assert_eq!(parse_query_param("", "seed"), None);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let overrides = UrlOverrides::from_query("?places=25&seed=9");
        assert_eq!(overrides, UrlOverrides { seed: Some(9), places: Some(25) });

        let mut config = ViewerConfig::default();
        overrides.apply(&mut config);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.places.count, 25);
    }

    #[test]
    fn test_invalid_overrides_are_dropped() {
        let overrides = UrlOverrides::from_query("?places=0&seed=abc");
        assert_eq!(overrides, UrlOverrides::default());
    }

    #[test]
    fn test_embedded_config_is_valid() {
        let config = ViewerConfig::from_toml_str(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }
}
