// ============================================================================
// APP - Cableado de la aplicación
// ============================================================================
// Construye stores, servicios y viewmodels; arranca el refresh periódico y
// el canal push; expone los handlers que lib.rs publica hacia el shell JS.
// ============================================================================

use std::rc::Rc;
use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen_futures::spawn_local;
use crate::config::CONFIG;
use crate::maps::web::MapboxSurface;
use crate::models::customer::CustomerDraft;
use crate::models::order::{OrderDraft, OrderStatus, PaymentMethod};
use crate::services::PushChannel;
use crate::state::AppState;
use crate::utils::storage;
use crate::viewmodels::{
    AnalyticsViewModel, DriverViewModel, MapViewModel, OrdersViewModel, RouteViewModel,
};

const MAP_CONTAINER_ID: &str = "map";

// Refetch diferido tras completar una entrega (igual que el resto de
// mutaciones: el backend necesita un momento para propagar)
const POST_DELIVERY_REFETCH_MS: u32 = 100;

pub struct App {
    state: AppState,
    orders_vm: OrdersViewModel,
    route_vm: Rc<RouteViewModel>,
    driver_vm: Rc<DriverViewModel>,
    map_vm: Rc<MapViewModel>,
    analytics_vm: Rc<AnalyticsViewModel>,
    surface: Rc<MapboxSurface>,
    push: PushChannel,
    // Handle del polling periódico; se suelta en stop()
    refresh_interval: Option<Interval>,
}

impl App {
    pub fn new() -> Self {
        Self {
            state: AppState::new(),
            orders_vm: OrdersViewModel::new(),
            route_vm: Rc::new(RouteViewModel::new()),
            driver_vm: Rc::new(DriverViewModel::new()),
            map_vm: Rc::new(MapViewModel::new()),
            analytics_vm: Rc::new(AnalyticsViewModel::new()),
            surface: Rc::new(MapboxSurface::new()),
            push: PushChannel::new(),
            refresh_interval: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Arranque completo: mapa, preferencias, push, polling y primer fetch
    pub fn start(&mut self) {
        // Preferencia persistida de vista del driver (mapa vs lista)
        if let Some(show_map) = storage::load_from_storage::<bool>(storage::PREF_SHOW_ROUTE_MAP) {
            self.state.orders.set_show_route_map(show_map);
        }

        if let Err(e) = self.surface.initialize(MAP_CONTAINER_ID) {
            log::error!("❌ Error inicializando el mapa: {}", e);
        }

        // El puntero del driver se re-deriva en CADA cambio de la lista:
        // un pedido entregado/cancelado/borrado desplaza los índices
        {
            let state = self.state.clone();
            self.state.orders.subscribe(move || {
                let active_len = state.orders.active_orders().len();
                let pointer = state.driver.current_stop();
                let reconciled = DriverViewModel::reconcile_pointer(pointer, active_len);
                if reconciled != pointer {
                    log::info!("🔄 Puntero re-derivado: {} → {}", pointer, reconciled);
                    state.driver.set_current_stop(reconciled);
                }
            });
        }

        // Canal push: order-updated / customer-updated
        {
            let vm = self.orders_vm.clone();
            let state = self.state.clone();
            if let Err(e) = self.push.connect(move |event| {
                vm.handle_push(&state, &event);
            }) {
                log::error!("❌ Error conectando canal push: {}", e);
            }
        }

        // Polling periódico: pedidos + clientes + analytics, pase lo que
        // pase con los requests en vuelo (última respuesta gana)
        {
            let vm = self.orders_vm.clone();
            let analytics_vm = self.analytics_vm.clone();
            let state = self.state.clone();
            let millis = CONFIG.refresh_interval_seconds * 1_000;
            self.refresh_interval = Some(Interval::new(millis, move || {
                log::info!("🔄 Refresh periódico...");
                let vm = vm.clone();
                let analytics_vm = analytics_vm.clone();
                let state = state.clone();
                spawn_local(async move {
                    vm.refresh_orders(&state).await;
                    vm.refresh_customers(&state).await;
                    analytics_vm.refresh(&state).await;
                });
            }));
        }

        // Primer fetch
        self.refresh_all();
    }

    /// Teardown en unmount: para el polling y destruye el widget del mapa.
    /// Los fetches en vuelo NO se cancelan (pueden aterrizar tarde).
    pub fn stop(&mut self) {
        self.refresh_interval = None;
        self.push.close();
        self.surface.destroy();
    }

    pub fn refresh_all(&self) {
        let vm = self.orders_vm.clone();
        let analytics_vm = self.analytics_vm.clone();
        let state = self.state.clone();
        spawn_local(async move {
            vm.refresh_orders(&state).await;
            vm.refresh_customers(&state).await;
            analytics_vm.refresh(&state).await;
        });
    }

    /// Optimizar la ruta del subset activo y repintar el mapa
    pub fn optimize_route(&self) {
        let route_vm = self.route_vm.clone();
        let map_vm = self.map_vm.clone();
        let surface = self.surface.clone();
        let state = self.state.clone();
        spawn_local(async move {
            if route_vm.optimize(&state).await.is_ok() {
                map_vm.render(surface.as_ref(), &state).await;
            }
        });
    }

    /// Repintar el mapa con el estado actual
    pub fn render_map(&self) {
        let map_vm = self.map_vm.clone();
        let surface = self.surface.clone();
        let state = self.state.clone();
        spawn_local(async move {
            map_vm.render(surface.as_ref(), &state).await;
        });
    }

    pub fn next_stop(&self) {
        let active_len = self.state.orders.active_orders().len();
        let pointer = self.state.driver.current_stop();
        self.state.driver.set_current_stop(DriverViewModel::next(pointer, active_len));
    }

    pub fn previous_stop(&self) {
        let pointer = self.state.driver.current_stop();
        self.state.driver.set_current_stop(DriverViewModel::previous(pointer));
    }

    pub fn select_payment_method(&self, value: &str) {
        self.state.driver.set_payment_method(PaymentMethod::parse(value));
    }

    pub fn set_delivery_notes(&self, notes: &str) {
        self.state.driver.set_delivery_notes(notes);
    }

    /// Completar la entrega de la parada actual del driver
    pub fn complete_current_delivery(&self) {
        let current = match DriverViewModel::current_order(&self.state) {
            Some(order) => order,
            None => {
                log::warn!("⚠️ No hay parada actual que completar");
                return;
            }
        };

        let driver_vm = self.driver_vm.clone();
        let orders_vm = self.orders_vm.clone();
        let state = self.state.clone();
        spawn_local(async move {
            if driver_vm.complete_delivery(&state, &current.id).await.is_ok() {
                let orders_vm = orders_vm.clone();
                let state_refetch = state.clone();
                Timeout::new(POST_DELIVERY_REFETCH_MS, move || {
                    spawn_local(async move {
                        orders_vm.refresh_orders(&state_refetch).await;
                    });
                })
                .forget();
            }
        });
    }

    /// Cambio de estado de un pedido desde el dashboard
    pub fn update_order_status(
        &self,
        order_id: &str,
        status: &str,
        notes: Option<String>,
        payment: Option<String>,
    ) {
        let status = match OrderStatus::parse(status) {
            Some(status) => status,
            None => {
                log::warn!("⚠️ Estado desconocido: {}", status);
                return;
            }
        };
        let payment = payment.as_deref().and_then(PaymentMethod::parse);

        let vm = self.orders_vm.clone();
        let state = self.state.clone();
        let order_id = order_id.to_string();
        spawn_local(async move {
            let _ = vm.update_status(&state, &order_id, status, notes, payment).await;
        });
    }

    /// Alta/edición de pedido desde el formulario del dashboard
    pub fn submit_order(&self, draft_json: &str, editing_id: Option<String>) {
        let draft: OrderDraft = match serde_json::from_str(draft_json) {
            Ok(draft) => draft,
            Err(e) => {
                log::error!("❌ Formulario de pedido inválido: {}", e);
                return;
            }
        };

        let vm = self.orders_vm.clone();
        let state = self.state.clone();
        spawn_local(async move {
            let _ = vm.submit_order(&state, &draft, editing_id.as_deref()).await;
        });
    }

    /// Alta/edición de cliente desde el formulario del dashboard
    pub fn submit_customer(&self, draft_json: &str, editing_id: Option<String>) {
        let draft: CustomerDraft = match serde_json::from_str(draft_json) {
            Ok(draft) => draft,
            Err(e) => {
                log::error!("❌ Formulario de cliente inválido: {}", e);
                return;
            }
        };

        let vm = self.orders_vm.clone();
        let state = self.state.clone();
        spawn_local(async move {
            let _ = vm.submit_customer(&state, &draft, editing_id.as_deref()).await;
        });
    }

    pub fn delete_customer(&self, customer_id: &str) {
        let vm = self.orders_vm.clone();
        let state = self.state.clone();
        let customer_id = customer_id.to_string();
        spawn_local(async move {
            let _ = vm.delete_customer(&state, &customer_id).await;
        });
    }

    /// Filtros del servidor sobre la lista de pedidos
    pub fn apply_order_filters(&self, query: &str) {
        let vm = self.orders_vm.clone();
        let state = self.state.clone();
        let query = query.to_string();
        spawn_local(async move {
            let _ = vm.apply_filters(&state, &query).await;
        });
    }

    pub fn clear_order_filters(&self) {
        self.orders_vm.clear_filters(&self.state);
    }

    pub fn delete_order(&self, order_id: &str) {
        let vm = self.orders_vm.clone();
        let state = self.state.clone();
        let order_id = order_id.to_string();
        spawn_local(async move {
            let _ = vm.delete_order(&state, &order_id).await;
        });
    }

    pub fn print_route(&self) {
        let vm = self.orders_vm.clone();
        let state = self.state.clone();
        spawn_local(async move {
            let _ = vm.print_route(&state).await;
        });
    }

    /// Filtro de estado del mapa ("all" o un estado concreto) + repintado
    pub fn set_map_status_filter(&self, value: &str) {
        let filter = if value == "all" {
            None
        } else {
            OrderStatus::parse(value)
        };
        self.state.set_map_status_filter(filter);
        self.render_map();
    }

    /// Toggle mapa/lista de la vista del driver (persistido)
    pub fn set_route_view(&self, show_map: bool) {
        self.state.orders.set_show_route_map(show_map);
        if let Err(e) = storage::save_to_storage(storage::PREF_SHOW_ROUTE_MAP, &show_map) {
            log::warn!("⚠️ No se pudo persistir la preferencia de vista: {}", e);
        }
    }

    /// Callback del shell cuando un marcador se suelta tras arrastrarlo
    pub fn handle_marker_dragged(&self, marker_id: &str, lng: f64, lat: f64) {
        let map_vm = self.map_vm.clone();
        let surface = self.surface.clone();
        let marker_id = marker_id.to_string();
        spawn_local(async move {
            map_vm.handle_marker_drag(surface.as_ref(), &marker_id, lng, lat).await;
        });
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
