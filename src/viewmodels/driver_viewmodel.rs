// ============================================================================
// DRIVER VIEWMODEL - Navegación de paradas para la vista del repartidor
// ============================================================================
// Mantiene válido el puntero "parada actual" sobre el subset activo y
// gestiona el flujo de completar una entrega (pago obligatorio antes de
// cualquier llamada de red).
// ============================================================================

use gloo_timers::callback::Timeout;
use crate::models::order::{Order, OrderStatus, OrderUpdate, PaymentMethod};
use crate::services::ApiClient;
use crate::state::AppState;

// Pausa antes de avanzar el puntero, para que se vea el mensaje de éxito
const ADVANCE_DELAY_MS: u32 = 1_000;

pub struct DriverViewModel {
    api: ApiClient,
}

impl DriverViewModel {
    pub fn new() -> Self {
        Self {
            api: ApiClient::new(),
        }
    }

    /// Re-deriva el puntero cuando cambia la forma del subset activo.
    /// Fuera de rango (o subset vacío) → 0.
    pub fn reconcile_pointer(pointer: usize, active_len: usize) -> usize {
        if active_len == 0 || pointer >= active_len {
            0
        } else {
            pointer
        }
    }

    /// Tras entregar un pedido: primera parada restante cuyo id difiere del
    /// recién entregado, o 0 si no queda ninguna
    pub fn pointer_after_delivery(active: &[Order], delivered_id: &str) -> usize {
        active
            .iter()
            .position(|o| o.id != delivered_id)
            .unwrap_or(0)
    }

    /// Avanzar sin wraparound
    pub fn next(pointer: usize, active_len: usize) -> usize {
        if active_len == 0 {
            0
        } else {
            (pointer + 1).min(active_len - 1)
        }
    }

    /// Retroceder sin wraparound
    pub fn previous(pointer: usize) -> usize {
        pointer.saturating_sub(1)
    }

    /// Validación local: sin método de pago no se completa la entrega
    pub fn ensure_deliverable(payment: Option<PaymentMethod>) -> Result<PaymentMethod, String> {
        payment.ok_or_else(|| "Payment method is required to complete delivery".to_string())
    }

    /// Completa la entrega de la parada actual. Rechaza localmente si falta
    /// el método de pago (sin request); tras el éxito espera ~1s y avanza
    /// el puntero a la siguiente parada activa restante.
    pub async fn complete_delivery(&self, state: &AppState, order_id: &str) -> Result<(), String> {
        let payment = match Self::ensure_deliverable(state.driver.payment_method()) {
            Ok(payment) => payment,
            Err(message) => {
                state.notifications.error(message.clone());
                return Err(message);
            }
        };

        let notes = state.driver.delivery_notes();
        let update = OrderUpdate {
            status: Some(OrderStatus::Delivered),
            delivery_notes: if notes.is_empty() { None } else { Some(notes) },
            delivered_at: Some(chrono::Utc::now().to_rfc3339()),
            payment_method: Some(payment),
        };

        log::info!("🚚 Completando entrega del pedido {} ({})", order_id, payment);

        if let Err(e) = self.api.patch_order(order_id, &update).await {
            state.notifications.error(format!("Error updating order status: {}", e));
            return Err(e);
        }

        state.driver.clear_delivery_form();
        state.notifications.success("Order delivered successfully!");

        // Avance diferido del puntero: el subset local puede contener aún el
        // pedido entregado hasta que aterrice el refetch, por eso se salta
        // explícitamente por id
        let state = state.clone();
        let delivered_id = order_id.to_string();
        Timeout::new(ADVANCE_DELAY_MS, move || {
            let active = state.orders.active_orders();
            let next = Self::pointer_after_delivery(&active, &delivered_id);
            state.driver.set_current_stop(next);
            log::info!("🔄 Puntero avanzado a la parada {}", next);
        })
        .forget();

        Ok(())
    }

    /// Pedido bajo el puntero actual, si el subset activo no está vacío
    pub fn current_order(state: &AppState) -> Option<Order> {
        let active = state.orders.active_orders();
        let pointer = Self::reconcile_pointer(state.driver.current_stop(), active.len());
        active.into_iter().nth(pointer)
    }
}

impl Default for DriverViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn el_puntero_siempre_es_valido_o_cero() {
        // Dentro de rango: se queda donde está
        assert_eq!(DriverViewModel::reconcile_pointer(1, 3), 1);
        // Fuera de rango: vuelve a 0
        assert_eq!(DriverViewModel::reconcile_pointer(3, 3), 0);
        assert_eq!(DriverViewModel::reconcile_pointer(7, 2), 0);
        // Subset vacío: 0
        assert_eq!(DriverViewModel::reconcile_pointer(0, 0), 0);
        assert_eq!(DriverViewModel::reconcile_pointer(4, 0), 0);
    }

    #[test]
    fn entregar_la_parada_apuntada_avanza_a_la_siguiente() {
        let active = vec![
            order("a", OrderStatus::Pending),
            order("b", OrderStatus::Pending),
            order("c", OrderStatus::InProcess),
        ];
        // "a" entregado pero aún presente (refetch pendiente): se salta
        assert_eq!(DriverViewModel::pointer_after_delivery(&active, "a"), 1);

        // El entregado ya no está: primera restante
        let rest = vec![order("b", OrderStatus::Pending)];
        assert_eq!(DriverViewModel::pointer_after_delivery(&rest, "a"), 0);

        // No queda nada
        assert_eq!(DriverViewModel::pointer_after_delivery(&[], "a"), 0);

        // Solo queda el entregado: 0, nunca más allá del final
        let only_delivered = vec![order("a", OrderStatus::Pending)];
        assert_eq!(DriverViewModel::pointer_after_delivery(&only_delivered, "a"), 0);
    }

    #[test]
    fn next_y_previous_clampan_en_los_bordes() {
        assert_eq!(DriverViewModel::next(0, 3), 1);
        assert_eq!(DriverViewModel::next(2, 3), 2); // sin wraparound
        assert_eq!(DriverViewModel::next(0, 0), 0);
        assert_eq!(DriverViewModel::previous(2), 1);
        assert_eq!(DriverViewModel::previous(0), 0);
    }

    #[test]
    fn sin_metodo_de_pago_la_entrega_se_rechaza() {
        assert!(DriverViewModel::ensure_deliverable(None).is_err());
        assert_eq!(
            DriverViewModel::ensure_deliverable(Some(PaymentMethod::Card)).unwrap(),
            PaymentMethod::Card
        );
    }
}
