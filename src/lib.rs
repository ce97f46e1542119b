// ============================================================================
// MAGICROUTE FRONTEND - CORE MVVM (RUST PURO)
// ============================================================================
// Arquitectura MVVM estricta:
// - ViewModels: lógica de rutas, driver, mapa y CRUD
// - Services: SOLO comunicación (REST, geocoding, directions, push)
// - State: stores con Rc<RefCell> + notificaciones
// - Models: estructuras compartidas con el backend
// El shell JS consume los exports de este módulo; la capa de vistas/DOM
// queda fuera del core.
// ============================================================================

mod app;
mod config;
mod maps;
mod models;
mod services;
mod state;
mod utils;
mod viewmodels;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use crate::app::App;

// Instancia única de la app, viva durante toda la sesión
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Panic hook para debugging decente en consola
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("🚀 MagicRoute Frontend - Rust Puro + MVVM");

    let mut app = App::new();

    // Señal genérica de cambio de estado hacia el shell: dispara un evento
    // de window y el shell decide qué re-leer
    app.state().subscribe_to_changes(|| {
        if let Some(window) = web_sys::window() {
            if let Ok(event) = web_sys::Event::new("magicroute:update") {
                let _ = window.dispatch_event(&event);
            }
        }
    });

    app.start();

    APP.with(|cell| {
        *cell.borrow_mut() = Some(app);
    });

    Ok(())
}

fn with_app(f: impl FnOnce(&App)) {
    APP.with(|cell| match *cell.borrow() {
        Some(ref app) => f(app),
        None => {
            web_sys::console::warn_1(&JsValue::from_str("⚠️ [APP] App no está inicializada"));
        }
    });
}

// ============================================================================
// Exports hacia el shell JS
// ============================================================================

/// Re-fetch manual de pedidos, clientes y analytics
#[wasm_bindgen]
pub fn refresh_all() {
    with_app(|app| app.refresh_all());
}

/// Teardown en unmount: para el polling, cierra el push y destruye el mapa
#[wasm_bindgen]
pub fn shutdown() {
    APP.with(|cell| {
        if let Some(ref mut app) = *cell.borrow_mut() {
            app.stop();
        }
    });
}

/// Optimizar la ruta de los pedidos activos
#[wasm_bindgen]
pub fn optimize_route() {
    with_app(|app| app.optimize_route());
}

/// Repintar el mapa con el estado actual
#[wasm_bindgen]
pub fn render_map() {
    with_app(|app| app.render_map());
}

#[wasm_bindgen]
pub fn next_stop() {
    with_app(|app| app.next_stop());
}

#[wasm_bindgen]
pub fn previous_stop() {
    with_app(|app| app.previous_stop());
}

/// Método de pago del formulario de entrega ("Cash" | "Card" | "Bank Transfer")
#[wasm_bindgen]
pub fn select_payment_method(value: &str) {
    with_app(|app| app.select_payment_method(value));
}

#[wasm_bindgen]
pub fn set_delivery_notes(notes: &str) {
    with_app(|app| app.set_delivery_notes(notes));
}

/// Completar la entrega de la parada actual (requiere método de pago)
#[wasm_bindgen]
pub fn complete_current_delivery() {
    with_app(|app| app.complete_current_delivery());
}

#[wasm_bindgen]
pub fn delete_order(order_id: &str) {
    with_app(|app| app.delete_order(order_id));
}

/// Cambio de estado de un pedido ("Pending" | "In Process" | "Delivered" | "Cancelled")
#[wasm_bindgen]
pub fn update_order_status(
    order_id: &str,
    status: &str,
    notes: Option<String>,
    payment_method: Option<String>,
) {
    with_app(|app| app.update_order_status(order_id, status, notes, payment_method));
}

/// Alta/edición de pedido; `draft_json` con el shape de OrderDraft
#[wasm_bindgen]
pub fn submit_order(draft_json: &str, editing_id: Option<String>) {
    with_app(|app| app.submit_order(draft_json, editing_id));
}

/// Alta/edición de cliente; `draft_json` con el shape de CustomerDraft
#[wasm_bindgen]
pub fn submit_customer(draft_json: &str, editing_id: Option<String>) {
    with_app(|app| app.submit_customer(draft_json, editing_id));
}

#[wasm_bindgen]
pub fn delete_customer(customer_id: &str) {
    with_app(|app| app.delete_customer(customer_id));
}

/// Filtros del servidor ("status=Pending&shopName=...")
#[wasm_bindgen]
pub fn apply_order_filters(query: &str) {
    with_app(|app| app.apply_order_filters(query));
}

#[wasm_bindgen]
pub fn clear_order_filters() {
    with_app(|app| app.clear_order_filters());
}

/// Descargar el PDF de hoja de ruta con los pedidos activos
#[wasm_bindgen]
pub fn print_route() {
    with_app(|app| app.print_route());
}

/// Filtro de estado del mapa: "all" o un estado concreto
#[wasm_bindgen]
pub fn set_map_status_filter(value: &str) {
    with_app(|app| app.set_map_status_filter(value));
}

/// Toggle mapa/lista en la vista del driver
#[wasm_bindgen]
pub fn set_route_view(show_map: bool) {
    with_app(|app| app.set_route_view(show_map));
}

/// Callback del shell al soltar un marcador arrastrado
#[wasm_bindgen]
pub fn handle_marker_dragged(marker_id: &str, lng: f64, lat: f64) {
    with_app(|app| app.handle_marker_dragged(marker_id, lng, lat));
}

// ============================================================================
// Lecturas para el shell (JSON)
// ============================================================================

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("❌ Error serializando estado: {}", e);
        "null".to_string()
    })
}

/// Pedidos visibles (filtrados si hay filtro activo)
#[wasm_bindgen]
pub fn visible_orders_json() -> String {
    let mut json = "[]".to_string();
    with_app(|app| json = to_json(&app.state().orders.visible_orders()));
    json
}

/// Última ruta optimizada publicada (puede estar vacía)
#[wasm_bindgen]
pub fn optimized_route_json() -> String {
    let mut json = "[]".to_string();
    with_app(|app| json = to_json(&app.state().orders.optimized_route()));
    json
}

/// Clientes cargados (página actual) + paginación
#[wasm_bindgen]
pub fn customers_json() -> String {
    let mut json = "null".to_string();
    with_app(|app| {
        let state = app.state();
        json = to_json(&serde_json::json!({
            "customers": state.customers.snapshot(),
            "pagination": state.customers.pagination(),
        }));
    });
    json
}

/// Métricas del dashboard (null hasta el primer fetch)
#[wasm_bindgen]
pub fn analytics_json() -> String {
    let mut json = "null".to_string();
    with_app(|app| {
        if let Some(analytics) = app.state().analytics() {
            json = to_json(&analytics);
        }
    });
    json
}

/// Parada actual del driver: índice + pedido bajo el puntero
#[wasm_bindgen]
pub fn driver_stop_json() -> String {
    let mut json = "null".to_string();
    with_app(|app| {
        let state = app.state();
        let pointer = state.driver.current_stop();
        let active = state.orders.active_orders();
        json = to_json(&serde_json::json!({
            "pointer": pointer,
            "activeCount": active.len(),
            "currentOrder": active.get(pointer),
        }));
    });
    json
}

/// Última notificación emitida (el shell la muestra y llama a clear)
#[wasm_bindgen]
pub fn current_notification_json() -> String {
    let mut json = "null".to_string();
    with_app(|app| {
        if let Some(notification) = app.state().notifications.current() {
            json = to_json(&serde_json::json!({
                "message": notification.message,
                "severity": notification.severity.as_str(),
            }));
        }
    });
    json
}

#[wasm_bindgen]
pub fn clear_notification() {
    with_app(|app| app.state().notifications.clear());
}
