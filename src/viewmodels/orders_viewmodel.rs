// ============================================================================
// ORDERS VIEWMODEL - Orquestación de CRUD de pedidos y clientes
// ============================================================================
// Consistencia eventual: las mutaciones van al backend y disparan un
// refetch completo; la única excepción es el borrado, que quita el pedido
// localmente de inmediato (optimista, sin rollback) para no percibir
// latencia.
// ============================================================================

use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use crate::models::customer::CustomerDraft;
use crate::models::order::{OrderDraft, OrderStatus, OrderUpdate, PaymentMethod};
use crate::models::push::PushEvent;
use crate::services::ApiClient;
use crate::state::{AppState, PushOutcome};
use crate::utils::download;

// Pequeño delay antes del refetch tras una mutación, para que el backend
// termine de propagar el cambio
const REFETCH_DELAY_MS: u32 = 100;

const CUSTOMERS_PAGE_LIMIT: u32 = 1_000;

#[derive(Clone)]
pub struct OrdersViewModel {
    api: ApiClient,
}

impl OrdersViewModel {
    pub fn new() -> Self {
        Self {
            api: ApiClient::new(),
        }
    }

    /// Refetch completo de pedidos
    pub async fn refresh_orders(&self, state: &AppState) {
        state.orders.set_loading(true);
        match self.api.get_orders().await {
            Ok(orders) => {
                state.orders.set_error(None);
                state.orders.set_last_fetch_time(chrono::Utc::now().timestamp_millis());
                state.orders.replace_all(orders);
            }
            Err(e) => {
                // Transporte caído: se loggea y se mantiene lo que haya
                log::error!("❌ Error obteniendo pedidos: {}", e);
                state.orders.set_error(Some(e));
            }
        }
        state.orders.set_loading(false);
    }

    /// Refetch de clientes (primera página grande, orden por tienda)
    pub async fn refresh_customers(&self, state: &AppState) {
        match self.api.get_customers(1, CUSTOMERS_PAGE_LIMIT).await {
            Ok(page) => state.customers.set_page(page),
            Err(e) => log::error!("❌ Error obteniendo clientes: {}", e),
        }
    }

    /// Refetch diferido de pedidos (tras una mutación)
    fn schedule_orders_refetch(&self, state: &AppState) {
        let vm = self.clone();
        let state = state.clone();
        Timeout::new(REFETCH_DELAY_MS, move || {
            spawn_local(async move {
                vm.refresh_orders(&state).await;
            });
        })
        .forget();
    }

    /// Alta o edición de pedido
    pub async fn submit_order(
        &self,
        state: &AppState,
        draft: &OrderDraft,
        editing_id: Option<&str>,
    ) -> Result<(), String> {
        let result = match editing_id {
            Some(id) => self.api.update_order(id, draft).await,
            None => self.api.create_order(draft).await,
        };

        match result {
            Ok(()) => {
                let message = if editing_id.is_some() {
                    "Order updated successfully!"
                } else {
                    "Order added successfully!"
                };
                state.notifications.success(message);
                self.schedule_orders_refetch(state);
                Ok(())
            }
            Err(e) => {
                state.notifications.error("Error saving order!");
                Err(e)
            }
        }
    }

    /// Cambio de estado (con notas y pago opcionales). El merge de campos
    /// calculados por el servidor no es optimista: se confía en el refetch.
    pub async fn update_status(
        &self,
        state: &AppState,
        order_id: &str,
        new_status: OrderStatus,
        notes: Option<String>,
        payment_method: Option<PaymentMethod>,
    ) -> Result<(), String> {
        let update = OrderUpdate {
            status: Some(new_status),
            delivery_notes: notes,
            delivered_at: if new_status == OrderStatus::Delivered {
                Some(chrono::Utc::now().to_rfc3339())
            } else {
                None
            },
            payment_method,
        };

        match self.api.patch_order(order_id, &update).await {
            Ok(_) => {
                state.notifications.success(format!("Order status updated to {}", new_status));
                self.schedule_orders_refetch(state);
                Ok(())
            }
            Err(e) => {
                state.notifications.error(format!("Error updating order status: {}", e));
                Err(e)
            }
        }
    }

    /// Borrado con respuesta percibida inmediata: se quita de la lista local
    /// ANTES de confirmar con el backend. Sin rollback si el DELETE falla:
    /// la divergencia se corrige en el siguiente refresh completo.
    pub async fn delete_order(&self, state: &AppState, order_id: &str) -> Result<(), String> {
        state.orders.remove_local(order_id);

        match self.api.delete_order(order_id).await {
            Ok(()) => {
                state.notifications.success("Order deleted successfully!");
                self.schedule_orders_refetch(state);
                Ok(())
            }
            Err(e) => {
                state.notifications.error("Error deleting order!");
                Err(e)
            }
        }
    }

    /// Filtros del servidor: la query llega ya montada ("status=Pending&...")
    pub async fn apply_filters(&self, state: &AppState, query: &str) -> Result<(), String> {
        match self.api.get_orders_filtered(query).await {
            Ok(orders) => {
                state.orders.set_filtered(orders);
                Ok(())
            }
            Err(e) => {
                log::error!("❌ Error aplicando filtros: {}", e);
                Err(e)
            }
        }
    }

    pub fn clear_filters(&self, state: &AppState) {
        state.orders.clear_filter();
    }

    /// Alta o edición de cliente
    pub async fn submit_customer(
        &self,
        state: &AppState,
        draft: &CustomerDraft,
        editing_id: Option<&str>,
    ) -> Result<(), String> {
        let result = match editing_id {
            Some(id) => self.api.update_customer(id, draft).await,
            None => self.api.create_customer(draft).await,
        };

        match result {
            Ok(()) => {
                let message = if editing_id.is_some() {
                    "Customer updated successfully!"
                } else {
                    "Customer added successfully!"
                };
                state.notifications.success(message);
                state.customers.reset_pagination();
                let vm = self.clone();
                let state = state.clone();
                spawn_local(async move {
                    vm.refresh_customers(&state).await;
                });
                Ok(())
            }
            Err(e) => {
                state.notifications.error("Error saving customer!");
                Err(e)
            }
        }
    }

    pub async fn delete_customer(&self, state: &AppState, customer_id: &str) -> Result<(), String> {
        match self.api.delete_customer(customer_id).await {
            Ok(()) => {
                state.notifications.success("Customer deleted successfully!");
                state.customers.reset_pagination();
                let vm = self.clone();
                let state = state.clone();
                spawn_local(async move {
                    vm.refresh_customers(&state).await;
                });
                Ok(())
            }
            Err(e) => {
                state.notifications.error("Error deleting customer!");
                Err(e)
            }
        }
    }

    /// PDF de hoja de ruta con los pedidos activos
    pub async fn print_route(&self, state: &AppState) -> Result<(), String> {
        let active = state.orders.active_orders();

        let bytes = match self.api.print_route(active).await {
            Ok(bytes) => bytes,
            Err(e) => {
                state.notifications.error(format!("Error generating route PDF: {}", e));
                return Err(e);
            }
        };

        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let filename = download::route_pdf_filename(&today);
        download::save_binary(&bytes, &filename, "application/pdf")?;

        state.notifications.success("Route PDF downloaded!");
        Ok(())
    }

    /// Evento push del backend: el borrado explícito ya se aplicó localmente
    /// dentro del store; el resto dispara refetch
    pub fn handle_push(&self, state: &AppState, event: &PushEvent) {
        log::info!("📡 Evento push recibido: {:?}", event);
        match state.orders.apply_push(event) {
            PushOutcome::RemovedLocally => {}
            PushOutcome::RefetchOrders => {
                let vm = self.clone();
                let state = state.clone();
                spawn_local(async move {
                    vm.refresh_orders(&state).await;
                });
            }
            PushOutcome::RefetchCustomers => {
                let vm = self.clone();
                let state = state.clone();
                spawn_local(async move {
                    vm.refresh_customers(&state).await;
                });
            }
        }
    }
}

impl Default for OrdersViewModel {
    fn default() -> Self {
        Self::new()
    }
}
