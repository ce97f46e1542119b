// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio, solo hace requests HTTP contra el backend
// ============================================================================

use gloo_net::http::Request;
use crate::config::CONFIG;
use crate::models::analytics::Analytics;
use crate::models::customer::{CustomerDraft, CustomerListResponse, CustomerPage};
use crate::models::order::{Order, OrderDraft, OrderUpdate};
use crate::models::route::{OptimizeRouteRequest, OptimizeRouteResponse, PrintRouteRequest};

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: CONFIG.backend_url().to_string(),
        }
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    /// Listar pedidos. Añade un timestamp anti-caché porque algunos
    /// proxies cachean el GET aunque mandemos Cache-Control.
    pub async fn get_orders(&self) -> Result<Vec<Order>, String> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let url = format!("{}/api/orders?t={}", self.base_url, timestamp);

        let response = Request::get(&url)
            .header("Cache-Control", "no-cache, no-store, must-revalidate")
            .header("Pragma", "no-cache")
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        let orders = response
            .json::<Vec<Order>>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;

        log::info!("📋 Pedidos obtenidos: {}", orders.len());
        Ok(orders)
    }

    /// Listar pedidos con filtros del servidor (query string ya montada)
    pub async fn get_orders_filtered(&self, query: &str) -> Result<Vec<Order>, String> {
        let url = format!("{}/api/orders?{}", self.base_url, query);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        response
            .json::<Vec<Order>>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    /// Crear pedido
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<(), String> {
        let url = format!("{}/api/orders", self.base_url);

        log::info!("📦 Creando pedido para: {}", draft.customer_name);

        let response = Request::post(&url)
            .json(draft)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if response.ok() {
            Ok(())
        } else {
            Err(format!("HTTP {}: {}", response.status(), response.status_text()))
        }
    }

    /// Editar pedido completo
    pub async fn update_order(&self, order_id: &str, draft: &OrderDraft) -> Result<(), String> {
        let url = format!("{}/api/orders/{}", self.base_url, order_id);

        let response = Request::put(&url)
            .json(draft)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if response.ok() {
            Ok(())
        } else {
            Err(format!("HTTP {}: {}", response.status(), response.status_text()))
        }
    }

    /// Actualización parcial (estado/pago/notas) de un pedido
    pub async fn patch_order(&self, order_id: &str, update: &OrderUpdate) -> Result<Order, String> {
        let url = format!("{}/api/orders/{}", self.base_url, order_id);

        log::info!("🔄 Actualizando pedido {}: {:?}", order_id, update.status);

        let response = Request::put(&url)
            .json(update)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            let status = response.status();
            let error_text = response.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("HTTP {}: {}", status, error_text));
        }

        response
            .json::<Order>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    /// Borrar pedido
    pub async fn delete_order(&self, order_id: &str) -> Result<(), String> {
        let url = format!("{}/api/orders/{}", self.base_url, order_id);

        let response = Request::delete(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if response.ok() {
            Ok(())
        } else {
            Err(format!("HTTP {}: {}", response.status(), response.status_text()))
        }
    }

    /// Listar clientes (paginado, con fallback al formato legacy)
    pub async fn get_customers(&self, page: u32, limit: u32) -> Result<CustomerPage, String> {
        let url = format!(
            "{}/api/customers?page={}&limit={}&sortBy=shopName&sortOrder=asc",
            self.base_url, page, limit
        );

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        let parsed = response
            .json::<CustomerListResponse>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;

        Ok(parsed.into_page())
    }

    /// Crear cliente
    pub async fn create_customer(&self, draft: &CustomerDraft) -> Result<(), String> {
        let url = format!("{}/api/customers", self.base_url);

        let response = Request::post(&url)
            .json(draft)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if response.ok() {
            Ok(())
        } else {
            Err(format!("HTTP {}: {}", response.status(), response.status_text()))
        }
    }

    /// Editar cliente
    pub async fn update_customer(&self, customer_id: &str, draft: &CustomerDraft) -> Result<(), String> {
        let url = format!("{}/api/customers/{}", self.base_url, customer_id);

        let response = Request::put(&url)
            .json(draft)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if response.ok() {
            Ok(())
        } else {
            Err(format!("HTTP {}: {}", response.status(), response.status_text()))
        }
    }

    /// Borrar cliente
    pub async fn delete_customer(&self, customer_id: &str) -> Result<(), String> {
        let url = format!("{}/api/customers/{}", self.base_url, customer_id);

        let response = Request::delete(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if response.ok() {
            Ok(())
        } else {
            Err(format!("HTTP {}: {}", response.status(), response.status_text()))
        }
    }

    /// Optimizar ruta: manda los pedidos activos + postcode del depósito,
    /// el backend devuelve las paradas ordenadas con distancia por tramo
    pub async fn optimize_route(
        &self,
        start_postcode: &str,
        orders: Vec<Order>,
    ) -> Result<OptimizeRouteResponse, String> {
        let url = format!("{}/api/optimize-route", self.base_url);
        let request = OptimizeRouteRequest {
            start_postcode: start_postcode.to_string(),
            orders,
        };

        log::info!("🗺️ Optimizando ruta: {} pedidos desde {}",
                   request.orders.len(), request.start_postcode);

        let response = Request::post(&url)
            .json(&request)
            .map_err(|e| format!("Request build error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            let status = response.status();
            let error_text = response.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("HTTP {}: {}", status, error_text));
        }

        let result = response
            .json::<OptimizeRouteResponse>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;

        log::info!("✅ Ruta recibida: {} paradas, distancia total: {:?} km",
                   result.route.len(), result.total_distance);

        Ok(result)
    }

    /// Generar el PDF de la hoja de ruta (binario)
    pub async fn print_route(&self, orders: Vec<Order>) -> Result<Vec<u8>, String> {
        let url = format!("{}/api/print-route", self.base_url);
        let request = PrintRouteRequest { orders };

        log::info!("🖨️ Generando PDF de ruta: {} pedidos", request.orders.len());

        let response = Request::post(&url)
            .json(&request)
            .map_err(|e| format!("Request build error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        response
            .binary()
            .await
            .map_err(|e| format!("Download error: {}", e))
    }

    /// Métricas agregadas del dashboard
    pub async fn get_analytics(&self) -> Result<Analytics, String> {
        let url = format!("{}/api/analytics", self.base_url);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        response
            .json::<Analytics>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
