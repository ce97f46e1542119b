use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub shop_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_customers: usize,
    pub customers_per_page: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// Paginación sintética de una sola página (para el formato legacy)
    pub fn single_page(total: usize) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_customers: total,
            customers_per_page: total,
            has_next_page: false,
            has_prev_page: false,
        }
    }
}

#[derive(Clone, PartialEq, Deserialize, Debug)]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub pagination: Pagination,
}

/// GET /api/customers devuelve `{customers, pagination}` en backends nuevos
/// y un array plano en los antiguos; ambos formatos tienen que parsear.
#[derive(Clone, PartialEq, Deserialize, Debug)]
#[serde(untagged)]
pub enum CustomerListResponse {
    Paginated(CustomerPage),
    Legacy(Vec<Customer>),
}

impl CustomerListResponse {
    /// Normaliza al formato paginado; el formato legacy se ordena por
    /// nombre de tienda y recibe una paginación de una sola página.
    pub fn into_page(self) -> CustomerPage {
        match self {
            CustomerListResponse::Paginated(page) => page,
            CustomerListResponse::Legacy(mut customers) => {
                customers.sort_by(|a, b| a.shop_name.cmp(&b.shop_name));
                let pagination = Pagination::single_page(customers.len());
                CustomerPage { customers, pagination }
            }
        }
    }
}

/// Formulario de alta/edición de clientes
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub shop_name: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub postcode: String,
    pub city: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, shop: &str) -> Customer {
        Customer {
            id: id.to_string(),
            shop_name: shop.to_string(),
            name: String::new(),
            phone: String::new(),
            address: String::new(),
            postcode: String::new(),
            city: String::new(),
        }
    }

    #[test]
    fn formato_paginado_parsea_directo() {
        let json = r#"{
            "customers": [{"id":"1","shopName":"Barber 77"}],
            "pagination": {
                "currentPage":1,"totalPages":3,"totalCustomers":25,
                "customersPerPage":10,"hasNextPage":true,"hasPrevPage":false
            }
        }"#;
        let parsed: CustomerListResponse = serde_json::from_str(json).unwrap();
        let page = parsed.into_page();
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.customers.len(), 1);
    }

    #[test]
    fn formato_legacy_ordena_y_sintetiza_paginacion() {
        let json = r#"[
            {"id":"1","shopName":"Zenith Cuts"},
            {"id":"2","shopName":"Barber 77"}
        ]"#;
        let parsed: CustomerListResponse = serde_json::from_str(json).unwrap();
        let page = parsed.into_page();
        assert_eq!(page.customers[0].shop_name, "Barber 77");
        assert_eq!(page.pagination.total_customers, 2);
        assert_eq!(page.pagination.current_page, 1);
        assert!(!page.pagination.has_next_page);
    }

    #[test]
    fn into_page_mantiene_orden_estable_en_empates() {
        let response = CustomerListResponse::Legacy(vec![
            customer("a", "Same Shop"),
            customer("b", "Same Shop"),
        ]);
        let page = response.into_page();
        assert_eq!(page.customers[0].id, "a");
        assert_eq!(page.customers[1].id, "b");
    }
}
