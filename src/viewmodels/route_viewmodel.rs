// ============================================================================
// ROUTE VIEWMODEL - Coordinación de la ruta optimizada
// ============================================================================
// Pide al backend un orden para el subset activo, mergea las distancias
// devueltas sobre la lista local y publica la ruta a los suscriptores
// (mapa y navegador del driver). La optimización en sí es del backend.
// ============================================================================

use std::cmp::Ordering;
use crate::config::CONFIG;
use crate::models::order::Order;
use crate::models::route::RouteStop;
use crate::services::ApiClient;
use crate::state::AppState;

pub struct RouteViewModel {
    api: ApiClient,
}

impl RouteViewModel {
    pub fn new() -> Self {
        Self {
            api: ApiClient::new(),
        }
    }

    /// Validación local previa: sin pedidos activos no se llama a la red
    pub fn ensure_optimizable(active: &[Order]) -> Result<(), String> {
        if active.is_empty() {
            Err("No active orders to optimize!".to_string())
        } else {
            Ok(())
        }
    }

    /// Copia la distancia de cada parada devuelta sobre el pedido que
    /// matchea por id; los pedidos sin parada quedan intactos
    pub fn merge_distances(orders: &mut [Order], route: &[RouteStop]) {
        for order in orders.iter_mut() {
            if let Some(stop) = route.iter().find(|s| s.id == order.id) {
                if stop.distance.is_some() {
                    order.distance = stop.distance;
                }
            }
        }
    }

    /// Orden ascendente por distancia. Sort estable: cualquier par donde
    /// falte una distancia se trata como igual, así los pedidos sin
    /// distancia conservan su posición relativa original.
    pub fn sort_by_distance(orders: &mut [Order]) {
        orders.sort_by(|a, b| match (a.distance, b.distance) {
            (Some(da), Some(db)) => da.partial_cmp(&db).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        });
    }

    /// Optimiza la ruta del subset activo y publica el resultado.
    /// El último estado publicado se mantiene hasta la siguiente llamada
    /// (no se limpia al vaciarse el set activo).
    pub async fn optimize(&self, state: &AppState) -> Result<(), String> {
        let orders = state.orders.snapshot();
        let active: Vec<Order> = orders.iter().filter(|o| o.is_active()).cloned().collect();

        if let Err(message) = Self::ensure_optimizable(&active) {
            state.notifications.warning(message.clone());
            return Err(message);
        }

        log::info!("🗺️ Optimizando ruta: {} pedidos activos", active.len());

        let result = match self
            .api
            .optimize_route(&CONFIG.depot_config.postcode, active)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                state.notifications.error(format!("Error optimizing route: {}", e));
                return Err(e);
            }
        };

        if result.route.is_empty() {
            let message = "No route data received from backend".to_string();
            state.notifications.error(message.clone());
            return Err(message);
        }

        // Merge de distancias sobre la lista completa + sort estable
        let mut updated = orders;
        Self::merge_distances(&mut updated, &result.route);
        Self::sort_by_distance(&mut updated);

        let stops = result.route.len();
        state.orders.replace_all(updated);
        state.orders.set_optimized_route(result.route);
        // Al optimizar se pasa a la vista de lista
        state.orders.set_show_route_map(false);

        let distance_text = match result.total_distance {
            Some(d) => format!("{}", d),
            None => "N/A".to_string(),
        };
        state.notifications.success(format!(
            "Route optimized! Total distance: {} km, Orders: {}",
            distance_text, stops
        ));

        Ok(())
    }
}

impl Default for RouteViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::OrderStatus;

    fn order(id: &str, basket: u32) -> Order {
        Order {
            id: id.to_string(),
            basket_no: basket,
            shop_name: String::new(),
            customer_name: String::new(),
            customer_phone: String::new(),
            customer_address: String::new(),
            customer_postcode: String::new(),
            total_amount: 0.0,
            status: OrderStatus::Pending,
            payment_method: None,
            delivery_notes: None,
            created_at: None,
            delivered_at: None,
            distance: None,
        }
    }

    fn stop(id: &str, distance: Option<f64>) -> RouteStop {
        RouteStop {
            id: id.to_string(),
            basket_no: 0,
            customer_name: String::new(),
            customer_address: String::new(),
            customer_postcode: String::new(),
            total_amount: 0.0,
            status: None,
            distance,
        }
    }

    #[test]
    fn sin_pedidos_activos_se_rechaza_antes_de_la_red() {
        assert!(RouteViewModel::ensure_optimizable(&[]).is_err());
        assert!(RouteViewModel::ensure_optimizable(&[order("a", 1)]).is_ok());
    }

    #[test]
    fn merge_copia_distancias_y_deja_intactos_los_demas() {
        let mut orders = vec![order("a", 1), order("b", 2), order("c", 3)];
        let route = vec![stop("a", Some(5.0)), stop("b", Some(2.0))];

        RouteViewModel::merge_distances(&mut orders, &route);
        assert_eq!(orders[0].distance, Some(5.0));
        assert_eq!(orders[1].distance, Some(2.0));
        assert_eq!(orders[2].distance, None);
    }

    #[test]
    fn sort_pone_primero_las_distancias_cortas_y_respeta_a_los_sin_distancia() {
        // Respuesta [{A,5},{B,2}] sobre lista [A,B,C] → [B,A,C]
        let mut orders = vec![order("a", 1), order("b", 2), order("c", 3)];
        let route = vec![stop("a", Some(5.0)), stop("b", Some(2.0))];

        RouteViewModel::merge_distances(&mut orders, &route);
        RouteViewModel::sort_by_distance(&mut orders);

        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn sort_es_estable_con_empates_y_sin_distancias() {
        let mut orders = vec![order("x", 1), order("y", 2), order("z", 3)];
        RouteViewModel::sort_by_distance(&mut orders);
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);

        // Empate de distancias: se conserva el orden original
        let mut orders = vec![order("x", 1), order("y", 2)];
        orders[0].distance = Some(3.0);
        orders[1].distance = Some(3.0);
        RouteViewModel::sort_by_distance(&mut orders);
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn merge_no_borra_una_distancia_previa_si_la_parada_llega_sin_ella() {
        let mut orders = vec![order("a", 1)];
        orders[0].distance = Some(7.5);
        let route = vec![stop("a", None)];

        RouteViewModel::merge_distances(&mut orders, &route);
        assert_eq!(orders[0].distance, Some(7.5));
    }
}
