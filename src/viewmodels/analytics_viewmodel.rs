// ============================================================================
// ANALYTICS VIEWMODEL - Métricas del dashboard
// ============================================================================

use crate::models::analytics::Analytics;
use crate::services::ApiClient;
use crate::state::AppState;

pub struct AnalyticsViewModel {
    api: ApiClient,
}

impl AnalyticsViewModel {
    pub fn new() -> Self {
        Self {
            api: ApiClient::new(),
        }
    }

    /// Pide las métricas al backend; si falla, cae al cálculo local sobre
    /// el store de pedidos (misma semántica de agregación)
    pub async fn refresh(&self, state: &AppState) {
        match self.api.get_analytics().await {
            Ok(analytics) => {
                log::info!("📊 Analytics recibidas: {} pedidos totales", analytics.total_orders);
                state.set_analytics(analytics);
            }
            Err(e) => {
                log::warn!("⚠️ Analytics no disponibles ({}), calculando en local", e);
                let orders = state.orders.snapshot();
                let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
                state.set_analytics(Analytics::from_orders(&orders, &today));
            }
        }
    }
}

impl Default for AnalyticsViewModel {
    fn default() -> Self {
        Self::new()
    }
}
