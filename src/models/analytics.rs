use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::models::order::{Order, OrderStatus};

/// Métricas agregadas del dashboard (GET /api/analytics)
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub in_process_orders: usize,
    pub delivered_orders: usize,
    pub cancelled_orders: usize,
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub top_shops: Vec<ShopStat>,
    pub todays_orders: usize,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ShopStat {
    pub shop: String,
    pub count: usize,
    pub revenue: f64,
}

impl Analytics {
    /// Cálculo local de respaldo cuando /api/analytics no responde.
    /// `today` llega como "YYYY-MM-DD" y se compara contra el prefijo de fecha
    /// del timestamp de creación.
    pub fn from_orders(orders: &[Order], today: &str) -> Self {
        let total_orders = orders.len();
        let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();

        let total_revenue: f64 = orders.iter().map(|o| o.total_amount).sum();
        let average_order_value = if total_orders > 0 {
            total_revenue / total_orders as f64
        } else {
            0.0
        };

        // Top 5 tiendas por número de pedidos
        let mut shop_stats: HashMap<&str, (usize, f64)> = HashMap::new();
        for order in orders {
            let entry = shop_stats.entry(order.shop_name.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += order.total_amount;
        }
        let mut top_shops: Vec<ShopStat> = shop_stats
            .into_iter()
            .map(|(shop, (count, revenue))| ShopStat {
                shop: shop.to_string(),
                count,
                revenue,
            })
            .collect();
        top_shops.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.shop.cmp(&b.shop)));
        top_shops.truncate(5);

        let todays_orders = orders
            .iter()
            .filter(|o| {
                o.created_at
                    .as_deref()
                    .map(|created| created.starts_with(today))
                    .unwrap_or(false)
            })
            .count();

        Self {
            total_orders,
            pending_orders: count(OrderStatus::Pending),
            in_process_orders: count(OrderStatus::InProcess),
            delivered_orders: count(OrderStatus::Delivered),
            cancelled_orders: count(OrderStatus::Cancelled),
            total_revenue,
            average_order_value,
            top_shops,
            todays_orders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(shop: &str, status: OrderStatus, amount: f64, created: Option<&str>) -> Order {
        Order {
            id: format!("{}-{}", shop, amount),
            basket_no: 1,
            shop_name: shop.to_string(),
            customer_name: String::new(),
            customer_phone: String::new(),
            customer_address: String::new(),
            customer_postcode: String::new(),
            total_amount: amount,
            status,
            payment_method: None,
            delivery_notes: None,
            created_at: created.map(|s| s.to_string()),
            delivered_at: None,
            distance: None,
        }
    }

    #[test]
    fn agrega_totales_por_estado_y_revenue() {
        let orders = vec![
            order("A", OrderStatus::Pending, 10.0, None),
            order("A", OrderStatus::Delivered, 30.0, None),
            order("B", OrderStatus::InProcess, 20.0, None),
            order("C", OrderStatus::Cancelled, 0.0, None),
        ];
        let analytics = Analytics::from_orders(&orders, "2025-01-01");
        assert_eq!(analytics.total_orders, 4);
        assert_eq!(analytics.pending_orders, 1);
        assert_eq!(analytics.in_process_orders, 1);
        assert_eq!(analytics.delivered_orders, 1);
        assert_eq!(analytics.cancelled_orders, 1);
        assert_eq!(analytics.total_revenue, 60.0);
        assert_eq!(analytics.average_order_value, 15.0);
    }

    #[test]
    fn top_shops_ordena_por_numero_de_pedidos() {
        let orders = vec![
            order("A", OrderStatus::Pending, 10.0, None),
            order("B", OrderStatus::Pending, 50.0, None),
            order("A", OrderStatus::Pending, 15.0, None),
        ];
        let analytics = Analytics::from_orders(&orders, "2025-01-01");
        assert_eq!(analytics.top_shops[0].shop, "A");
        assert_eq!(analytics.top_shops[0].count, 2);
        assert_eq!(analytics.top_shops[0].revenue, 25.0);
        assert_eq!(analytics.top_shops[1].shop, "B");
    }

    #[test]
    fn todays_orders_compara_prefijo_de_fecha() {
        let orders = vec![
            order("A", OrderStatus::Pending, 10.0, Some("2025-03-10T09:30:00.000Z")),
            order("B", OrderStatus::Pending, 10.0, Some("2025-03-09T23:59:00.000Z")),
            order("C", OrderStatus::Pending, 10.0, None),
        ];
        let analytics = Analytics::from_orders(&orders, "2025-03-10");
        assert_eq!(analytics.todays_orders, 1);
    }

    #[test]
    fn lista_vacia_no_divide_por_cero() {
        let analytics = Analytics::from_orders(&[], "2025-01-01");
        assert_eq!(analytics.average_order_value, 0.0);
        assert!(analytics.top_shops.is_empty());
    }
}
