// ============================================================================
// CUSTOMER STATE - Clientes + paginación del servidor
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::models::customer::{Customer, CustomerPage, Pagination};
use crate::state::reactivity::Observable;

#[derive(Clone)]
pub struct CustomerState {
    customers: Observable<Vec<Customer>>,
    pagination: Rc<RefCell<Pagination>>,
}

impl CustomerState {
    pub fn new() -> Self {
        Self {
            customers: Observable::new(Vec::new()),
            pagination: Rc::new(RefCell::new(Pagination::single_page(0))),
        }
    }

    pub fn set_page(&self, page: CustomerPage) {
        *self.pagination.borrow_mut() = page.pagination;
        self.customers.set(page.customers);
    }

    pub fn snapshot(&self) -> Vec<Customer> {
        self.customers.snapshot()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination.borrow().clone()
    }

    /// Vuelta a la primera página tras crear/editar/borrar un cliente
    pub fn reset_pagination(&self) {
        *self.pagination.borrow_mut() = Pagination::single_page(0);
    }

    pub fn subscribe(&self, callback: impl Fn() + 'static) {
        self.customers.subscribe(callback);
    }
}

impl Default for CustomerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_page_actualiza_lista_y_paginacion() {
        let state = CustomerState::new();
        state.set_page(CustomerPage {
            customers: vec![Customer {
                id: "1".to_string(),
                shop_name: "Barber 77".to_string(),
                name: String::new(),
                phone: String::new(),
                address: String::new(),
                postcode: String::new(),
                city: String::new(),
            }],
            pagination: Pagination {
                current_page: 2,
                total_pages: 5,
                total_customers: 42,
                customers_per_page: 10,
                has_next_page: true,
                has_prev_page: true,
            },
        });

        assert_eq!(state.snapshot().len(), 1);
        assert_eq!(state.pagination().current_page, 2);

        state.reset_pagination();
        assert_eq!(state.pagination().current_page, 1);
    }
}
