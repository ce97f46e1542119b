use serde::Deserialize;

/// Evento recibido por el canal push del backend.
///
/// `order-updated` puede llevar un flag de borrado: en ese caso el pedido se
/// elimina del estado local sin refetch; cualquier otro cambio dispara un
/// refetch completo (sin patching incremental, el volumen de pedidos es bajo).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum PushEvent {
    #[serde(rename = "order-updated")]
    OrderUpdated(OrderUpdatePayload),
    #[serde(rename = "customer-updated")]
    CustomerUpdated,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdatePayload {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evento_de_borrado_parsea_con_flag() {
        let json = r#"{"event":"order-updated","data":{"orderId":"ord-9","deleted":true}}"#;
        let event: PushEvent = serde_json::from_str(json).unwrap();
        match event {
            PushEvent::OrderUpdated(payload) => {
                assert_eq!(payload.order_id.as_deref(), Some("ord-9"));
                assert!(payload.deleted);
            }
            other => panic!("evento inesperado: {:?}", other),
        }
    }

    #[test]
    fn evento_sin_flag_no_es_borrado() {
        let json = r#"{"event":"order-updated","data":{"orderId":"ord-9"}}"#;
        let event: PushEvent = serde_json::from_str(json).unwrap();
        match event {
            PushEvent::OrderUpdated(payload) => assert!(!payload.deleted),
            other => panic!("evento inesperado: {:?}", other),
        }
    }

    #[test]
    fn customer_updated_parsea_sin_payload() {
        let json = r#"{"event":"customer-updated"}"#;
        let event: PushEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, PushEvent::CustomerUpdated);
    }
}
