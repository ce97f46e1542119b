// ============================================================================
// MAPBOX FFI - Foreign Function Interface para JavaScript
// ============================================================================
// Solo wrappers para funciones JS del shell - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    pub fn init_map(
        container_id: &str,
        is_dark: bool,
        access_token: &str,
        center_lng: f64,
        center_lat: f64,
        zoom: f64,
        min_zoom: f64,
        max_zoom: f64,
    );

    #[wasm_bindgen(js_name = destroyMap)]
    pub fn destroy_map();

    #[wasm_bindgen(js_name = addMapMarker)]
    pub fn add_map_marker(marker_json: &str);

    #[wasm_bindgen(js_name = clearMapMarkers)]
    pub fn clear_map_markers();

    #[wasm_bindgen(js_name = drawMapPath)]
    pub fn draw_map_path(path_json: &str);

    #[wasm_bindgen(js_name = clearMapPaths)]
    pub fn clear_map_paths();

    #[wasm_bindgen(js_name = fitMapToBounds)]
    pub fn fit_map_to_bounds(coordinates_json: &str);

    #[wasm_bindgen(js_name = updateMapMarkerPopup)]
    pub fn update_map_marker_popup(update_json: &str);
}
