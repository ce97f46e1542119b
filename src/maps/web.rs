// ============================================================================
// WEB MAP SURFACE - Mapbox GL JS via FFI
// ============================================================================

use std::cell::Cell;
use serde::Serialize;
use crate::config::CONFIG;
use crate::utils::mapbox_ffi::*;
use super::{MapSurface, MarkerSpec, PathSpec};

/// Superficie de mapa para web. El widget se construye una vez por mount y
/// se destruye en unmount; capas y marcadores se limpian y recrean enteros
/// en cada render de la ruta (sin diffing incremental).
pub struct MapboxSurface {
    ready: Cell<bool>,
}

#[derive(Serialize)]
struct PopupUpdate<'a> {
    marker_id: &'a str,
    address: &'a str,
    postcode: &'a str,
    lng: f64,
    lat: f64,
}

impl MapboxSurface {
    pub fn new() -> Self {
        Self {
            ready: Cell::new(false),
        }
    }

    /// Construye el mapa en el contenedor (detecta dark mode del sistema)
    pub fn initialize(&self, container_id: &str) -> Result<(), String> {
        let token = CONFIG.mapbox_token();
        if token.is_empty() {
            return Err("Mapbox token missing: set MAPBOX_ACCESS_TOKEN in .env".to_string());
        }

        let is_dark = web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok())
            .flatten()
            .map(|mq| mq.matches())
            .unwrap_or(false);

        let map = &CONFIG.map_config;
        log::info!("🗺️ Inicializando Mapbox GL (dark mode: {})", is_dark);
        init_map(
            container_id,
            is_dark,
            token,
            map.default_center_lng,
            map.default_center_lat,
            map.default_zoom,
            map.min_zoom,
            map.max_zoom,
        );

        self.ready.set(true);
        Ok(())
    }

    /// Teardown en unmount
    pub fn destroy(&self) {
        if self.ready.get() {
            destroy_map();
            self.ready.set(false);
        }
    }
}

impl MapSurface for MapboxSurface {
    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    fn clear_markers(&self) {
        clear_map_markers();
    }

    fn clear_paths(&self) {
        clear_map_paths();
    }

    fn add_marker(&self, spec: &MarkerSpec) {
        match serde_json::to_string(spec) {
            Ok(json) => add_map_marker(&json),
            Err(e) => log::error!("❌ Error serializando marcador {}: {}", spec.id, e),
        }
    }

    fn draw_path(&self, spec: &PathSpec) {
        match serde_json::to_string(spec) {
            Ok(json) => draw_map_path(&json),
            Err(e) => log::error!("❌ Error serializando path {}: {}", spec.id, e),
        }
    }

    fn fit_bounds(&self, coordinates: &[[f64; 2]]) {
        match serde_json::to_string(coordinates) {
            Ok(json) => fit_map_to_bounds(&json),
            Err(e) => log::error!("❌ Error serializando bounds: {}", e),
        }
    }

    fn update_marker_popup(&self, marker_id: &str, address: &str, postcode: &str, lng: f64, lat: f64) {
        let update = PopupUpdate {
            marker_id,
            address,
            postcode,
            lng,
            lat,
        };
        match serde_json::to_string(&update) {
            Ok(json) => update_map_marker_popup(&json),
            Err(e) => log::error!("❌ Error serializando popup update: {}", e),
        }
    }
}

impl Default for MapboxSurface {
    fn default() -> Self {
        Self::new()
    }
}
