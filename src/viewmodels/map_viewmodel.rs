// ============================================================================
// MAP VIEWMODEL - Pipeline de render del mapa
// ============================================================================
// Ciclo por invocación: Idle → ResolvingCoordinates → DrawingMarkers →
// RequestingPath → Done (vuelve a Idle al arrancar el siguiente ciclo).
// Errores al resolver o al pedir el path se loggean y el render sigue con
// lo que haya: un postcode malo no aborta el ciclo entero.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use crate::config::CONFIG;
use crate::maps::{MapSurface, MarkerPopup, MarkerSpec, PathSpec};
use crate::models::order::{Order, OrderStatus};
use crate::models::route::RouteStop;
use crate::services::directions::{fallback_stats, straight_line_path, RouteStats};
use crate::services::{DirectionsService, GeocodingService};
use crate::state::AppState;

// Colores de marcador y path
const COLOR_OPTIMIZED: &str = "#FF9800";
const COLOR_DELIVERED: &str = "#4CAF50";
const COLOR_IN_PROCESS: &str = "#FF9800";
const COLOR_PENDING: &str = "#2196F3";
const COLOR_DEFAULT: &str = "#9E9E9E";
const COLOR_PATH: &str = "#FF6B6B";
const COLOR_DEPOT: &str = "#FF6B6B";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    ResolvingCoordinates,
    DrawingMarkers,
    RequestingPath,
    Done,
}

/// Proyección unificada de lo que se pinta: sale de un RouteStop cuando hay
/// ruta optimizada, de un Order cuando no
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayStop {
    pub id: String,
    pub basket_no: u32,
    pub customer_name: String,
    pub address: String,
    pub postcode: String,
    pub amount: f64,
    pub status: Option<OrderStatus>,
    pub distance: Option<f64>,
}

impl DisplayStop {
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            basket_no: order.basket_no,
            customer_name: order.customer_name.clone(),
            address: order.customer_address.clone(),
            postcode: order.customer_postcode.clone(),
            amount: order.total_amount,
            status: Some(order.status),
            distance: order.distance,
        }
    }

    pub fn from_route_stop(stop: &RouteStop) -> Self {
        Self {
            id: stop.id.clone(),
            basket_no: stop.basket_no,
            customer_name: stop.customer_name.clone(),
            address: stop.customer_address.clone(),
            postcode: stop.customer_postcode.clone(),
            amount: stop.total_amount,
            status: stop.status,
            distance: stop.distance,
        }
    }
}

/// Parada con coordenada resuelta; `index` es la posición en la lista a
/// mostrar (las paradas saltadas también consumen índice, como los números
/// de secuencia del popup)
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStop {
    pub index: usize,
    pub stop: DisplayStop,
    pub coords: [f64; 2],
}

pub struct MarkerPlan {
    pub markers: Vec<MarkerSpec>,
    /// Depósito primero, luego cada marcador en secuencia
    pub coordinates: Vec<[f64; 2]>,
    pub skipped_duplicates: usize,
}

/// Resumen de un ciclo de render (para logs y para el shell)
#[derive(Clone, Debug, Default)]
pub struct RenderReport {
    pub markers: usize,
    pub skipped_unresolved: usize,
    pub skipped_duplicates: usize,
    pub road_snapped: bool,
    pub stats: Option<RouteStats>,
}

pub struct MapViewModel {
    geocoding: GeocodingService,
    directions: DirectionsService,
    phase: Rc<RefCell<RenderPhase>>,
}

impl MapViewModel {
    pub fn new() -> Self {
        Self {
            geocoding: GeocodingService::new(),
            directions: DirectionsService::new(),
            phase: Rc::new(RefCell::new(RenderPhase::Idle)),
        }
    }

    pub fn phase(&self) -> RenderPhase {
        *self.phase.borrow()
    }

    fn set_phase(&self, phase: RenderPhase) {
        *self.phase.borrow_mut() = phase;
    }

    /// Qué paradas se muestran: la ruta optimizada si existe, si no los
    /// pedidos (con el filtro de estado aplicado). Devuelve también si la
    /// secuencia viene del optimizador.
    pub fn stops_to_display(
        orders: &[Order],
        route: &[RouteStop],
        status_filter: Option<OrderStatus>,
    ) -> (Vec<DisplayStop>, bool) {
        if !route.is_empty() {
            return (route.iter().map(DisplayStop::from_route_stop).collect(), true);
        }

        let stops = orders
            .iter()
            .filter(|o| status_filter.map_or(true, |s| o.status == s))
            .map(DisplayStop::from_order)
            .collect();
        (stops, false)
    }

    /// Clave de dedup: coordenada redondeada a 4 decimales
    pub fn coord_key(lng: f64, lat: f64) -> String {
        format!("{:.4},{:.4}", lng, lat)
    }

    pub fn marker_color(status: Option<OrderStatus>, optimized: bool) -> &'static str {
        if optimized {
            return COLOR_OPTIMIZED;
        }
        match status {
            Some(OrderStatus::Delivered) => COLOR_DELIVERED,
            Some(OrderStatus::InProcess) => COLOR_IN_PROCESS,
            Some(OrderStatus::Pending) => COLOR_PENDING,
            _ => COLOR_DEFAULT,
        }
    }

    /// Marcador fijo del depósito (arranque de toda ruta)
    pub fn depot_marker() -> MarkerSpec {
        let depot = &CONFIG.depot_config;
        MarkerSpec {
            id: "depot".to_string(),
            label: String::new(),
            color: COLOR_DEPOT.to_string(),
            lng: depot.longitude,
            lat: depot.latitude,
            draggable: false,
            is_depot: true,
            popup: MarkerPopup {
                title: format!("🏢 {}", depot.name),
                route_label: "Starting Point".to_string(),
                customer_name: String::new(),
                address: depot.postcode.clone(),
                postcode: depot.postcode.clone(),
                amount: 0.0,
                status: String::new(),
                distance: None,
            },
        }
    }

    /// Convierte las paradas resueltas en marcadores, saltando las que caen
    /// sobre una coordenada ya usada (redondeo a 4 decimales). Quirk
    /// conocido: dos clientes genuinamente co-ubicados muestran un solo
    /// marcador.
    pub fn plan_markers(resolved: &[ResolvedStop], optimized: bool) -> MarkerPlan {
        let depot = &CONFIG.depot_config;
        let mut markers = Vec::new();
        let mut coordinates = vec![[depot.longitude, depot.latitude]];
        let mut used_coordinates: HashSet<String> = HashSet::new();
        let mut skipped_duplicates = 0;

        for entry in resolved {
            let [lng, lat] = entry.coords;
            let key = Self::coord_key(lng, lat);
            if used_coordinates.contains(&key) {
                log::info!(
                    "📍 Coordenada duplicada, saltando Order #{} ({}): {}",
                    entry.stop.basket_no, entry.stop.postcode, key
                );
                skipped_duplicates += 1;
                continue;
            }
            used_coordinates.insert(key);

            // Número de secuencia: posición en la ruta optimizada si la hay,
            // si no el basket number del propio pedido
            let label = if optimized {
                (entry.index + 1).to_string()
            } else {
                entry.stop.basket_no.to_string()
            };

            markers.push(MarkerSpec {
                id: entry.stop.id.clone(),
                label: label.clone(),
                color: Self::marker_color(entry.stop.status, optimized).to_string(),
                lng,
                lat,
                draggable: true,
                is_depot: false,
                popup: MarkerPopup {
                    title: format!("📦 Order #{}", entry.stop.basket_no),
                    route_label: label,
                    customer_name: entry.stop.customer_name.clone(),
                    address: entry.stop.address.clone(),
                    postcode: entry.stop.postcode.clone(),
                    amount: entry.stop.amount,
                    status: entry
                        .stop
                        .status
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    distance: entry.stop.distance,
                },
            });
            coordinates.push([lng, lat]);
        }

        MarkerPlan {
            markers,
            coordinates,
            skipped_duplicates,
        }
    }

    /// Fase de resolución: tabla conocida → geocoder GB → se salta la parada
    async fn resolve_stops(&self, stops: &[DisplayStop]) -> (Vec<ResolvedStop>, usize) {
        let mut resolved = Vec::new();
        let mut unresolved = 0;

        for (index, stop) in stops.iter().enumerate() {
            match self.geocoding.resolve_postcode(&stop.postcode).await {
                Ok(Some(coords)) => resolved.push(ResolvedStop {
                    index,
                    stop: stop.clone(),
                    coords,
                }),
                Ok(None) => {
                    unresolved += 1;
                }
                Err(e) => {
                    // Un postcode malo no aborta el render completo
                    log::error!("❌ Geocoding error para {} ({}): {}", stop.id, stop.postcode, e);
                    unresolved += 1;
                }
            }
        }

        (resolved, unresolved)
    }

    /// Ciclo de render completo contra la superficie del mapa
    pub async fn render(&self, surface: &dyn MapSurface, state: &AppState) -> RenderReport {
        if !surface.is_ready() {
            log::warn!("⚠️ Superficie de mapa no lista, saltando render");
            return RenderReport::default();
        }

        self.set_phase(RenderPhase::ResolvingCoordinates);

        let orders = state.orders.visible_orders();
        let route = state.orders.optimized_route();
        let (stops, optimized) =
            Self::stops_to_display(&orders, &route, state.map_status_filter());

        let (resolved, skipped_unresolved) = self.resolve_stops(&stops).await;

        self.set_phase(RenderPhase::DrawingMarkers);

        // Sin diffing: capa de marcadores y paths se recrean enteras
        surface.clear_markers();
        surface.clear_paths();
        surface.add_marker(&Self::depot_marker());

        let plan = Self::plan_markers(&resolved, optimized);
        for marker in &plan.markers {
            surface.add_marker(marker);
        }
        if !plan.markers.is_empty() {
            surface.fit_bounds(&plan.coordinates);
        }

        self.set_phase(RenderPhase::RequestingPath);

        let mut report = RenderReport {
            markers: plan.markers.len(),
            skipped_unresolved,
            skipped_duplicates: plan.skipped_duplicates,
            road_snapped: false,
            stats: None,
        };

        if plan.coordinates.len() > 1 {
            let (path, road_snapped) = match self.directions.fetch_road_path(&plan.coordinates).await {
                Ok(path) => (path, true),
                Err(e) => {
                    // Fallback: siempre se pinta algún path
                    log::warn!("⚠️ Directions falló ({}), usando línea recta", e);
                    (straight_line_path(&plan.coordinates), false)
                }
            };

            surface.draw_path(&PathSpec {
                id: format!("route-{}", uuid::Uuid::new_v4()),
                coordinates: path,
                color: COLOR_PATH.to_string(),
                width: CONFIG.map_config.route_line_width,
                dashed: road_snapped,
            });
            report.road_snapped = road_snapped;

            let stats = match self.directions.fetch_route_stats(&plan.coordinates).await {
                Ok(stats) => stats,
                Err(e) => {
                    log::warn!("⚠️ Stats de ruta no disponibles ({}), usando Haversine", e);
                    fallback_stats(&plan.coordinates)
                }
            };
            report.stats = Some(stats);
        }

        self.set_phase(RenderPhase::Done);

        log::info!(
            "✅ Render completado: {} marcadores ({} sin resolver, {} duplicados)",
            report.markers, report.skipped_unresolved, report.skipped_duplicates
        );
        report
    }

    /// Marcador arrastrado: reverse lookup de la nueva coordenada para
    /// refrescar el popup. Solo display: no toca la ruta ni persiste nada.
    pub async fn handle_marker_drag(
        &self,
        surface: &dyn MapSurface,
        marker_id: &str,
        lng: f64,
        lat: f64,
    ) {
        log::info!("📍 Marcador {} arrastrado a [{}, {}]", marker_id, lng, lat);

        match self.geocoding.reverse_lookup(lng, lat).await {
            Ok(Some(address)) => {
                surface.update_marker_popup(marker_id, &address.address, &address.postcode, lng, lat);
            }
            Ok(None) => {
                log::warn!("⚠️ Sin dirección para la nueva coordenada [{}, {}]", lng, lat);
            }
            Err(e) => {
                log::error!("❌ Reverse geocoding error: {}", e);
            }
        }
    }
}

impl Default for MapViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, basket: u32, postcode: &str, status: OrderStatus) -> Order {
        Order {
            id: id.to_string(),
            basket_no: basket,
            shop_name: String::new(),
            customer_name: format!("Customer {}", id),
            customer_phone: String::new(),
            customer_address: String::new(),
            customer_postcode: postcode.to_string(),
            total_amount: 0.0,
            status,
            payment_method: None,
            delivery_notes: None,
            created_at: None,
            delivered_at: None,
            distance: None,
        }
    }

    fn resolved(index: usize, id: &str, basket: u32, coords: [f64; 2]) -> ResolvedStop {
        ResolvedStop {
            index,
            stop: DisplayStop {
                id: id.to_string(),
                basket_no: basket,
                customer_name: String::new(),
                address: String::new(),
                postcode: String::new(),
                amount: 0.0,
                status: Some(OrderStatus::Pending),
                distance: None,
            },
            coords,
        }
    }

    #[test]
    fn dos_paradas_en_la_misma_coordenada_redondeada_dan_un_marcador() {
        let stops = vec![
            resolved(0, "a", 1, [-1.89764, 50.74279]),
            resolved(1, "b", 2, [-1.89761, 50.74281]), // mismo redondeo a 4 decimales
        ];
        let plan = MapViewModel::plan_markers(&stops, false);
        assert_eq!(plan.markers.len(), 1);
        assert_eq!(plan.skipped_duplicates, 1);
        // Depósito + un marcador
        assert_eq!(plan.coordinates.len(), 2);
    }

    #[test]
    fn coordenadas_distintas_no_se_deduplican() {
        let stops = vec![
            resolved(0, "a", 1, [-1.8976, 50.7428]),
            resolved(1, "b", 2, [-1.7766, 50.7338]),
        ];
        let plan = MapViewModel::plan_markers(&stops, false);
        assert_eq!(plan.markers.len(), 2);
        assert_eq!(plan.skipped_duplicates, 0);
    }

    #[test]
    fn etiquetas_optimizadas_usan_posicion_y_si_no_el_basket_number() {
        let stops = vec![
            resolved(0, "a", 7, [-1.8976, 50.7428]),
            resolved(1, "b", 3, [-1.7766, 50.7338]),
        ];

        let plan = MapViewModel::plan_markers(&stops, true);
        assert_eq!(plan.markers[0].label, "1");
        assert_eq!(plan.markers[1].label, "2");

        let plan = MapViewModel::plan_markers(&stops, false);
        assert_eq!(plan.markers[0].label, "7");
        assert_eq!(plan.markers[1].label, "3");
    }

    #[test]
    fn las_paradas_saltadas_consumen_numero_de_secuencia() {
        // La parada con índice 1 no resolvió: la siguiente conserva su
        // posición original en la ruta (etiqueta 3, no 2)
        let stops = vec![
            resolved(0, "a", 1, [-1.8976, 50.7428]),
            resolved(2, "c", 3, [-1.7766, 50.7338]),
        ];
        let plan = MapViewModel::plan_markers(&stops, true);
        assert_eq!(plan.markers[0].label, "1");
        assert_eq!(plan.markers[1].label, "3");
    }

    #[test]
    fn con_ruta_optimizada_se_muestran_las_paradas_de_la_ruta() {
        let orders = vec![order("a", 1, "BH10 6LF", OrderStatus::Pending)];
        let route = vec![RouteStop {
            id: "b".to_string(),
            basket_no: 2,
            customer_name: String::new(),
            customer_address: String::new(),
            customer_postcode: "SO14 7FN".to_string(),
            total_amount: 0.0,
            status: None,
            distance: Some(2.0),
        }];

        let (stops, optimized) = MapViewModel::stops_to_display(&orders, &route, None);
        assert!(optimized);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].id, "b");
    }

    #[test]
    fn sin_ruta_el_filtro_de_estado_aplica() {
        let orders = vec![
            order("a", 1, "BH10 6LF", OrderStatus::Pending),
            order("b", 2, "SO14 7FN", OrderStatus::Delivered),
        ];

        let (stops, optimized) =
            MapViewModel::stops_to_display(&orders, &[], Some(OrderStatus::Delivered));
        assert!(!optimized);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].id, "b");

        let (all, _) = MapViewModel::stops_to_display(&orders, &[], None);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn colores_por_estado_y_modo_optimizado() {
        assert_eq!(MapViewModel::marker_color(Some(OrderStatus::Pending), true), COLOR_OPTIMIZED);
        assert_eq!(MapViewModel::marker_color(Some(OrderStatus::Delivered), false), COLOR_DELIVERED);
        assert_eq!(MapViewModel::marker_color(Some(OrderStatus::Pending), false), COLOR_PENDING);
        assert_eq!(MapViewModel::marker_color(Some(OrderStatus::Cancelled), false), COLOR_DEFAULT);
        assert_eq!(MapViewModel::marker_color(None, false), COLOR_DEFAULT);
    }

    #[test]
    fn el_ciclo_arranca_en_idle() {
        let vm = MapViewModel::new();
        assert_eq!(vm.phase(), RenderPhase::Idle);
    }
}
