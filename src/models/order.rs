use serde::{Deserialize, Serialize};
use std::fmt;

/// Estado del ciclo de vida de un pedido
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum OrderStatus {
    Pending,
    #[serde(rename = "In Process")]
    InProcess,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Pending e In Process son los únicos estados elegibles para reparto
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::InProcess)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProcess => "In Process",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(OrderStatus::Pending),
            "In Process" => Some(OrderStatus::InProcess),
            "Delivered" => Some(OrderStatus::Delivered),
            "Cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Método de pago elegido al completar la entrega
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum PaymentMethod {
    Cash,
    Card,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Cash" => Some(PaymentMethod::Cash),
            "Card" => Some(PaymentMethod::Card),
            "Bank Transfer" => Some(PaymentMethod::BankTransfer),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub basket_no: u32,
    #[serde(default)]
    pub shop_name: String,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub customer_postcode: String,
    #[serde(default)]
    pub total_amount: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub delivery_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub delivered_at: Option<String>,

    // Distancia por parada devuelta por el optimizador; nunca se persiste
    #[serde(default)]
    pub distance: Option<f64>,
}

impl Order {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Formulario de alta/edición de pedidos (POST /api/orders, PUT /api/orders/{id})
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub basket_no: u32,
    pub shop_name: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_postcode: String,
    pub total_amount: f64,
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

/// Actualización parcial de un pedido (PUT /api/orders/{id})
#[derive(Clone, PartialEq, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: id.to_string(),
            basket_no: 1,
            shop_name: "Barber 77".to_string(),
            customer_name: "Test".to_string(),
            customer_phone: String::new(),
            customer_address: String::new(),
            customer_postcode: "BH22 8EB".to_string(),
            total_amount: 10.0,
            status,
            payment_method: None,
            delivery_notes: None,
            created_at: None,
            delivered_at: None,
            distance: None,
        }
    }

    #[test]
    fn solo_pending_e_in_process_son_activos() {
        assert!(order("1", OrderStatus::Pending).is_active());
        assert!(order("2", OrderStatus::InProcess).is_active());
        assert!(!order("3", OrderStatus::Delivered).is_active());
        assert!(!order("4", OrderStatus::Cancelled).is_active());
    }

    #[test]
    fn status_serializa_con_espacio() {
        let json = serde_json::to_string(&OrderStatus::InProcess).unwrap();
        assert_eq!(json, "\"In Process\"");
        let parsed: OrderStatus = serde_json::from_str("\"In Process\"").unwrap();
        assert_eq!(parsed, OrderStatus::InProcess);
    }

    #[test]
    fn order_deserializa_payload_del_backend() {
        let json = r#"{
            "id": "ord-1",
            "basketNo": 7,
            "customerName": "UK King Barbering",
            "customerPostcode": "BH8 8SN",
            "totalAmount": 45.5,
            "status": "Pending"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.basket_no, 7);
        assert_eq!(order.customer_postcode, "BH8 8SN");
        assert!(order.distance.is_none());
        assert!(order.payment_method.is_none());
    }

    #[test]
    fn update_parcial_omite_campos_vacios() {
        let update = OrderUpdate {
            status: Some(OrderStatus::Delivered),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"status":"Delivered"}"#);
    }
}
