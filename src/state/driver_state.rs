// ============================================================================
// DRIVER STATE - Estado de la vista móvil del repartidor
// ============================================================================
// `current_stop` es el RoutePointer: índice dentro del subset activo
// (Pending/In Process). Invariante: siempre en [0, active_len-1], o 0 si
// el subset está vacío. Se re-deriva en cada cambio de membresía.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::models::order::PaymentMethod;

#[derive(Clone)]
pub struct DriverState {
    current_stop: Rc<RefCell<usize>>,
    // Formulario de entrega en curso
    payment_method: Rc<RefCell<Option<PaymentMethod>>>,
    delivery_notes: Rc<RefCell<String>>,
}

impl DriverState {
    pub fn new() -> Self {
        Self {
            current_stop: Rc::new(RefCell::new(0)),
            payment_method: Rc::new(RefCell::new(None)),
            delivery_notes: Rc::new(RefCell::new(String::new())),
        }
    }

    pub fn current_stop(&self) -> usize {
        *self.current_stop.borrow()
    }

    pub fn set_current_stop(&self, index: usize) {
        *self.current_stop.borrow_mut() = index;
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        *self.payment_method.borrow()
    }

    pub fn set_payment_method(&self, method: Option<PaymentMethod>) {
        *self.payment_method.borrow_mut() = method;
    }

    pub fn delivery_notes(&self) -> String {
        self.delivery_notes.borrow().clone()
    }

    pub fn set_delivery_notes(&self, notes: impl Into<String>) {
        *self.delivery_notes.borrow_mut() = notes.into();
    }

    /// Limpia el formulario tras completar o cancelar una entrega
    pub fn clear_delivery_form(&self) {
        *self.payment_method.borrow_mut() = None;
        self.delivery_notes.borrow_mut().clear();
    }
}

impl Default for DriverState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_delivery_form_resetea_pago_y_notas() {
        let state = DriverState::new();
        state.set_payment_method(Some(PaymentMethod::Cash));
        state.set_delivery_notes("left at door");

        state.clear_delivery_form();
        assert!(state.payment_method().is_none());
        assert!(state.delivery_notes().is_empty());
    }
}
