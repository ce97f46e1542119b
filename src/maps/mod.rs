// Módulo de mapas: abstracción de la superficie + implementación web

pub mod web;

use serde::Serialize;

/// Superficie de dibujo del mapa. El pipeline de render (MapViewModel)
/// habla contra este trait; la implementación real vive en `web` (Mapbox
/// GL via FFI) y los tests usan un stub que graba llamadas.
pub trait MapSurface {
    /// El mapa está construido y listo para recibir capas
    fn is_ready(&self) -> bool;

    /// Quitar todos los marcadores de pedidos (el depósito incluido)
    fn clear_markers(&self);

    /// Quitar todas las capas de path
    fn clear_paths(&self);

    fn add_marker(&self, spec: &MarkerSpec);

    fn draw_path(&self, spec: &PathSpec);

    /// Ajustar el encuadre para mostrar todas las coordenadas
    fn fit_bounds(&self, coordinates: &[[f64; 2]]);

    /// Actualizar solo el texto del popup de un marcador (tras drag)
    fn update_marker_popup(&self, marker_id: &str, address: &str, postcode: &str, lng: f64, lat: f64);
}

/// Marcador con etiqueta de secuencia
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MarkerSpec {
    pub id: String,
    /// Posición en la ruta optimizada, o el basket number si no hay ruta
    pub label: String,
    pub color: String,
    pub lng: f64,
    pub lat: f64,
    pub draggable: bool,
    pub is_depot: bool,
    pub popup: MarkerPopup,
}

#[derive(Serialize, Clone, Debug, PartialEq, Default)]
pub struct MarkerPopup {
    pub title: String,
    pub route_label: String,
    pub customer_name: String,
    pub address: String,
    pub postcode: String,
    pub amount: f64,
    pub status: String,
    pub distance: Option<f64>,
}

/// Capa de path entre paradas
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PathSpec {
    pub id: String,
    pub coordinates: Vec<[f64; 2]>,
    pub color: String,
    pub width: u32,
    /// true = trazado por carretera (discontinuo), false = fallback recto
    pub dashed: bool,
}
