// ============================================================================
// ORDER STATE - Fuente única de verdad de los pedidos visibles en la UI
// ============================================================================
// Mantiene la lista completa, la vista filtrada del servidor y la última
// ruta optimizada publicada. Se refresca por polling periódico y por
// eventos push; sin patching incremental (el volumen de pedidos es bajo).
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::models::order::Order;
use crate::models::push::PushEvent;
use crate::models::route::RouteStop;
use crate::state::reactivity::Observable;

/// Qué tiene que hacer el caller después de aplicar un evento push
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// Borrado explícito: ya se eliminó localmente, NO hace falta refetch
    RemovedLocally,
    /// Cualquier otro cambio de pedido: refetch completo
    RefetchOrders,
    /// Cambio de cliente: refetch de clientes
    RefetchCustomers,
}

#[derive(Clone)]
pub struct OrderState {
    orders: Observable<Vec<Order>>,
    // Resultado de filtros del servidor; None = sin filtro activo
    filtered: Rc<RefCell<Option<Vec<Order>>>>,
    // Última ruta optimizada publicada. NO se limpia cuando el set activo
    // se vacía (evita parpadeo): los consumidores comprueban staleness.
    optimized_route: Rc<RefCell<Vec<RouteStop>>>,
    loading: Rc<RefCell<bool>>,
    error: Rc<RefCell<Option<String>>>,
    last_fetch_time: Rc<RefCell<Option<i64>>>,
    // Vista del driver: true = mapa, false = lista
    show_route_map: Rc<RefCell<bool>>,
}

impl OrderState {
    pub fn new() -> Self {
        Self {
            orders: Observable::new(Vec::new()),
            filtered: Rc::new(RefCell::new(None)),
            optimized_route: Rc::new(RefCell::new(Vec::new())),
            loading: Rc::new(RefCell::new(false)),
            error: Rc::new(RefCell::new(None)),
            last_fetch_time: Rc::new(RefCell::new(None)),
            show_route_map: Rc::new(RefCell::new(true)),
        }
    }

    /// Sobrescribe la lista completa (tras un fetch)
    pub fn replace_all(&self, orders: Vec<Order>) {
        self.orders.set(orders);
    }

    pub fn snapshot(&self) -> Vec<Order> {
        self.orders.snapshot()
    }

    /// Lista visible: la filtrada si hay filtro activo, si no la completa
    pub fn visible_orders(&self) -> Vec<Order> {
        match self.filtered.borrow().as_ref() {
            Some(filtered) => filtered.clone(),
            None => self.orders.snapshot(),
        }
    }

    /// Subset activo (Pending / In Process): lo único elegible para reparto
    pub fn active_orders(&self) -> Vec<Order> {
        self.orders
            .with(|orders| orders.iter().filter(|o| o.is_active()).cloned().collect())
    }

    pub fn set_filtered(&self, orders: Vec<Order>) {
        *self.filtered.borrow_mut() = Some(orders);
        self.orders.update(|_| {}); // notificar sin tocar la lista base
    }

    pub fn clear_filter(&self) {
        *self.filtered.borrow_mut() = None;
        self.orders.update(|_| {});
    }

    pub fn is_filtered(&self) -> bool {
        self.filtered.borrow().is_some()
    }

    /// Borrado local optimista: quita el pedido de la lista completa y de la
    /// filtrada de inmediato. Sin rollback si la confirmación falla (gap
    /// conocido, la divergencia se corrige en el siguiente refresh).
    pub fn remove_local(&self, order_id: &str) -> bool {
        let mut removed = false;
        if let Some(filtered) = self.filtered.borrow_mut().as_mut() {
            filtered.retain(|o| o.id != order_id);
        }
        self.orders.update(|orders| {
            let before = orders.len();
            orders.retain(|o| o.id != order_id);
            removed = orders.len() < before;
        });
        removed
    }

    /// Aplica un evento push y devuelve la acción de seguimiento
    pub fn apply_push(&self, event: &PushEvent) -> PushOutcome {
        match event {
            PushEvent::OrderUpdated(payload) if payload.deleted => {
                if let Some(order_id) = payload.order_id.as_deref() {
                    log::info!("🗑️ Push de borrado: eliminando pedido {} localmente", order_id);
                    self.remove_local(order_id);
                }
                PushOutcome::RemovedLocally
            }
            PushEvent::OrderUpdated(_) => PushOutcome::RefetchOrders,
            PushEvent::CustomerUpdated => PushOutcome::RefetchCustomers,
        }
    }

    pub fn set_optimized_route(&self, route: Vec<RouteStop>) {
        *self.optimized_route.borrow_mut() = route;
        self.orders.update(|_| {});
    }

    pub fn optimized_route(&self) -> Vec<RouteStop> {
        self.optimized_route.borrow().clone()
    }

    pub fn has_optimized_route(&self) -> bool {
        !self.optimized_route.borrow().is_empty()
    }

    pub fn set_loading(&self, loading: bool) {
        *self.loading.borrow_mut() = loading;
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn set_error(&self, error: Option<String>) {
        *self.error.borrow_mut() = error;
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn set_last_fetch_time(&self, timestamp: i64) {
        *self.last_fetch_time.borrow_mut() = Some(timestamp);
    }

    pub fn last_fetch_time(&self) -> Option<i64> {
        *self.last_fetch_time.borrow()
    }

    pub fn set_show_route_map(&self, show: bool) {
        *self.show_route_map.borrow_mut() = show;
    }

    pub fn show_route_map(&self) -> bool {
        *self.show_route_map.borrow()
    }

    /// Suscripción a cualquier cambio de la lista de pedidos
    pub fn subscribe(&self, callback: impl Fn() + 'static) {
        self.orders.subscribe(callback);
    }
}

impl Default for OrderState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::OrderStatus;
    use crate::models::push::OrderUpdatePayload;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: id.to_string(),
            basket_no: 1,
            shop_name: String::new(),
            customer_name: String::new(),
            customer_phone: String::new(),
            customer_address: String::new(),
            customer_postcode: String::new(),
            total_amount: 0.0,
            status,
            payment_method: None,
            delivery_notes: None,
            created_at: None,
            delivered_at: None,
            distance: None,
        }
    }

    fn stop(id: &str) -> RouteStop {
        RouteStop {
            id: id.to_string(),
            basket_no: 1,
            customer_name: String::new(),
            customer_address: String::new(),
            customer_postcode: String::new(),
            total_amount: 0.0,
            status: None,
            distance: None,
        }
    }

    #[test]
    fn active_orders_filtra_pending_e_in_process() {
        let state = OrderState::new();
        state.replace_all(vec![
            order("a", OrderStatus::Pending),
            order("b", OrderStatus::Delivered),
            order("c", OrderStatus::InProcess),
            order("d", OrderStatus::Cancelled),
        ]);

        let active: Vec<String> = state.active_orders().into_iter().map(|o| o.id).collect();
        assert_eq!(active, vec!["a", "c"]);
    }

    #[test]
    fn push_de_borrado_elimina_local_sin_refetch() {
        let state = OrderState::new();
        state.replace_all(vec![order("a", OrderStatus::Pending), order("b", OrderStatus::Pending)]);

        let event = PushEvent::OrderUpdated(OrderUpdatePayload {
            order_id: Some("a".to_string()),
            deleted: true,
        });

        assert_eq!(state.apply_push(&event), PushOutcome::RemovedLocally);
        let remaining: Vec<String> = state.snapshot().into_iter().map(|o| o.id).collect();
        assert_eq!(remaining, vec!["b"]);
    }

    #[test]
    fn cualquier_otro_push_pide_refetch() {
        let state = OrderState::new();
        state.replace_all(vec![order("a", OrderStatus::Pending)]);

        let update = PushEvent::OrderUpdated(OrderUpdatePayload {
            order_id: Some("a".to_string()),
            deleted: false,
        });
        assert_eq!(state.apply_push(&update), PushOutcome::RefetchOrders);
        // El pedido sigue ahí: el refetch es responsabilidad del caller
        assert_eq!(state.snapshot().len(), 1);

        assert_eq!(state.apply_push(&PushEvent::CustomerUpdated), PushOutcome::RefetchCustomers);
    }

    #[test]
    fn remove_local_limpia_tambien_la_vista_filtrada() {
        let state = OrderState::new();
        state.replace_all(vec![order("a", OrderStatus::Pending), order("b", OrderStatus::Pending)]);
        state.set_filtered(vec![order("a", OrderStatus::Pending)]);

        assert!(state.remove_local("a"));
        assert!(state.visible_orders().is_empty());
        assert_eq!(state.snapshot().len(), 1);
    }

    #[test]
    fn la_ruta_optimizada_sobrevive_al_vaciado_del_set_activo() {
        let state = OrderState::new();
        state.replace_all(vec![order("a", OrderStatus::Pending)]);
        state.set_optimized_route(vec![stop("a")]);

        // Todos entregados: la lista activa se vacía pero la ruta queda
        state.replace_all(vec![order("a", OrderStatus::Delivered)]);
        assert!(state.active_orders().is_empty());
        assert!(state.has_optimized_route());
    }
}
