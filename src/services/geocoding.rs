// ============================================================================
// GEOCODING SERVICE - Resolución de postcodes a coordenadas
// ============================================================================
// Orden de resolución: (1) tabla estática de postcodes conocidos,
// (2) geocoding de Mapbox restringido a GB, (3) None → la parada se salta.
// Los resultados del geocoder se memoizan por sesión.
// ============================================================================

use gloo_net::http::Request;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use crate::config::CONFIG;

const GEOCODING_BASE: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

lazy_static::lazy_static! {
    /// Postcodes habituales de la zona de reparto, con coordenadas verificadas
    /// a mano. Evita round-trips al geocoder para los clientes de siempre.
    static ref KNOWN_POSTCODES: HashMap<&'static str, [f64; 2]> = {
        let mut table = HashMap::new();
        table.insert("BH10 6LF", [-1.8976, 50.7428]); // Bournemouth
        table.insert("W1W 7LT", [-0.1386, 51.5200]);  // London
        table.insert("BH23 3TQ", [-1.7766, 50.7338]); // Christchurch
        table.insert("SO14 7FN", [-1.4044, 50.9094]); // Southampton
        table.insert("BH22 9HT", [-1.8996, 50.7994]); // Ferndown
        table.insert("BH22 8EB", [-1.8875, 50.8002]); // West Parley, Ferndown
        table.insert("BH22 8EH", [-1.8875, 50.8002]); // West Parley, Ferndown
        table.insert("PO16 9UZ", [-1.1791, 50.8516]); // Fareham (Portchester)
        table.insert("BH8 8SN", [-1.8476, 50.7208]);  // Boscombe
        table.insert("BH13 7EX", [-1.9876, 50.7128]); // Poole Depot
        table
    };
}

/// Dirección obtenida por reverse geocoding (solo para display del popup)
#[derive(Clone, Debug, PartialEq)]
pub struct ReverseAddress {
    pub address: String,
    pub postcode: String,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Deserialize)]
struct GeocodeFeature {
    #[serde(default)]
    center: Option<[f64; 2]>,
    #[serde(default)]
    place_name: Option<String>,
    #[serde(default)]
    context: Option<Vec<GeocodeContext>>,
}

#[derive(Deserialize)]
struct GeocodeContext {
    id: String,
    text: String,
}

pub struct GeocodingService {
    token: String,
    // Memoización por sesión: postcode → coordenada resuelta
    cache: RefCell<HashMap<String, [f64; 2]>>,
}

impl GeocodingService {
    pub fn new() -> Self {
        Self {
            token: CONFIG.mapbox_token().to_string(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Consulta la tabla estática (match exacto de string)
    pub fn lookup_known(postcode: &str) -> Option<[f64; 2]> {
        KNOWN_POSTCODES.get(postcode).copied()
    }

    /// URL de geocoding directo, restringido al país de reparto
    pub fn forward_url(token: &str, postcode: &str) -> String {
        format!(
            "{}/{}.json?access_token={}&country=GB&types=postcode&limit=1",
            GEOCODING_BASE,
            postcode.replace(' ', "%20"),
            token
        )
    }

    /// URL de reverse geocoding para una coordenada arrastrada
    pub fn reverse_url(token: &str, lng: f64, lat: f64) -> String {
        format!(
            "{}/{},{}.json?access_token={}&country=GB&types=address&limit=1",
            GEOCODING_BASE, lng, lat, token
        )
    }

    /// Resuelve un postcode a coordenadas [lng, lat].
    /// `Ok(None)` significa "no encontrado": la parada no se pinta.
    pub async fn resolve_postcode(&self, postcode: &str) -> Result<Option<[f64; 2]>, String> {
        if postcode.is_empty() {
            return Ok(None);
        }

        if let Some(coords) = Self::lookup_known(postcode) {
            log::info!("📍 Postcode conocido {}: [{}, {}]", postcode, coords[0], coords[1]);
            return Ok(Some(coords));
        }

        if let Some(coords) = self.cache.borrow().get(postcode) {
            return Ok(Some(*coords));
        }

        let url = Self::forward_url(&self.token, postcode);
        log::info!("🌍 Geocoding de postcode: {}", postcode);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        let data = response
            .json::<GeocodeResponse>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;

        match data.features.first().and_then(|f| f.center) {
            Some(coords) => {
                self.cache.borrow_mut().insert(postcode.to_string(), coords);
                Ok(Some(coords))
            }
            None => {
                log::warn!("⚠️ Sin coordenadas para el postcode: {}", postcode);
                Ok(None)
            }
        }
    }

    /// Reverse geocoding tras arrastrar un marcador. Solo alimenta el popup,
    /// no persiste nada ni recalcula la ruta.
    pub async fn reverse_lookup(&self, lng: f64, lat: f64) -> Result<Option<ReverseAddress>, String> {
        let url = Self::reverse_url(&self.token, lng, lat);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        let data = response
            .json::<GeocodeResponse>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;

        Ok(data.features.into_iter().next().map(|feature| {
            let postcode = feature
                .context
                .as_ref()
                .and_then(|ctx| ctx.iter().find(|c| c.id.starts_with("postcode")))
                .map(|c| c.text.clone())
                .unwrap_or_else(|| "Unknown".to_string());
            ReverseAddress {
                address: feature.place_name.unwrap_or_else(|| "Unknown Address".to_string()),
                postcode,
            }
        }))
    }
}

impl Default for GeocodingService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn la_tabla_conocida_resuelve_sin_geocoder() {
        assert_eq!(GeocodingService::lookup_known("BH13 7EX"), Some([-1.9876, 50.7128]));
        assert_eq!(GeocodingService::lookup_known("SO14 7FN"), Some([-1.4044, 50.9094]));
        assert_eq!(GeocodingService::lookup_known("ZZ99 9ZZ"), None);
    }

    #[test]
    fn el_match_es_exacto_por_string() {
        // Sin normalización: minúsculas o espacios extra no matchean
        assert_eq!(GeocodingService::lookup_known("bh13 7ex"), None);
        assert_eq!(GeocodingService::lookup_known("BH137EX"), None);
    }

    #[test]
    fn forward_url_restringe_a_gb() {
        let url = GeocodingService::forward_url("tok", "BH1 1AA");
        assert!(url.contains("country=GB"));
        assert!(url.contains("types=postcode"));
        assert!(url.contains("limit=1"));
        assert!(url.contains("BH1%201AA"));
    }

    #[test]
    fn reverse_url_usa_lng_lat() {
        let url = GeocodingService::reverse_url("tok", -1.9, 50.7);
        assert!(url.contains("/-1.9,50.7.json"));
        assert!(url.contains("types=address"));
    }
}
