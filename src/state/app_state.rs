// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================
// Agrega los stores y el estado de UI compartido. Se inyecta por clone
// (todos los campos son Rc) en viewmodels y closures; nada de globals
// ambientales.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::models::analytics::Analytics;
use crate::models::order::OrderStatus;
use crate::state::customer_state::CustomerState;
use crate::state::driver_state::DriverState;
use crate::state::notification_state::NotificationState;
use crate::state::order_state::OrderState;

#[derive(Clone)]
pub struct AppState {
    pub orders: OrderState,
    pub customers: CustomerState,
    pub driver: DriverState,
    pub notifications: NotificationState,

    // Métricas del dashboard (None hasta el primer fetch)
    analytics: Rc<RefCell<Option<Analytics>>>,
    // Filtro de estado del mapa; solo aplica cuando no hay ruta optimizada
    map_status_filter: Rc<RefCell<Option<OrderStatus>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            orders: OrderState::new(),
            customers: CustomerState::new(),
            driver: DriverState::new(),
            notifications: NotificationState::new(),
            analytics: Rc::new(RefCell::new(None)),
            map_status_filter: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set_analytics(&self, analytics: Analytics) {
        *self.analytics.borrow_mut() = Some(analytics);
    }

    pub fn analytics(&self) -> Option<Analytics> {
        self.analytics.borrow().clone()
    }

    pub fn set_map_status_filter(&self, filter: Option<OrderStatus>) {
        *self.map_status_filter.borrow_mut() = filter;
    }

    pub fn map_status_filter(&self) -> Option<OrderStatus> {
        *self.map_status_filter.borrow()
    }

    /// Un solo punto de suscripción para el shell: dispara en cambios de
    /// pedidos, clientes o notificaciones
    pub fn subscribe_to_changes(&self, callback: impl Fn() + 'static) {
        let callback = Rc::new(callback);

        let cb = callback.clone();
        self.orders.subscribe(move || cb());

        let cb = callback.clone();
        self.customers.subscribe(move || cb());

        let cb = callback;
        self.notifications.subscribe(move || cb());
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
