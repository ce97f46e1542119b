use serde::{Deserialize, Serialize};
use crate::models::order::{Order, OrderStatus};

/// Una parada de la ruta optimizada: proyección de un pedido + distancia por tramo.
/// Efímera: se recalcula en cada optimización, nunca se persiste por separado.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub id: String,
    #[serde(default)]
    pub basket_no: u32,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub customer_postcode: String,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub distance: Option<f64>,
}

impl RouteStop {
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            basket_no: order.basket_no,
            customer_name: order.customer_name.clone(),
            customer_address: order.customer_address.clone(),
            customer_postcode: order.customer_postcode.clone(),
            total_amount: order.total_amount,
            status: Some(order.status),
            distance: order.distance,
        }
    }
}

/// POST /api/optimize-route
#[derive(Clone, PartialEq, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRouteRequest {
    pub start_postcode: String,
    pub orders: Vec<Order>,
}

#[derive(Clone, PartialEq, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRouteResponse {
    #[serde(default)]
    pub route: Vec<RouteStop>,
    #[serde(default)]
    pub total_distance: Option<f64>,
}

/// POST /api/print-route
#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct PrintRouteRequest {
    pub orders: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_sin_ruta_deserializa_vacio() {
        let resp: OptimizeRouteResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.route.is_empty());
        assert!(resp.total_distance.is_none());
    }

    #[test]
    fn route_stop_deserializa_con_distancia() {
        let json = r#"{"id":"a","basketNo":3,"customerPostcode":"BH10 6LF","distance":5.0}"#;
        let stop: RouteStop = serde_json::from_str(json).unwrap();
        assert_eq!(stop.distance, Some(5.0));
        assert_eq!(stop.basket_no, 3);
    }
}
