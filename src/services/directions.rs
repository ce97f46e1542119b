// ============================================================================
// DIRECTIONS SERVICE - Trazado por carretera y estadísticas de ruta
// ============================================================================
// Pide a Mapbox Directions el path pegado a carretera entre las paradas; si
// falla, el caller cae a la línea recta (siempre se pinta algún path).
// ============================================================================

use gloo_net::http::Request;
use serde::Deserialize;
use crate::config::CONFIG;

const DIRECTIONS_BASE: &str = "https://api.mapbox.com/directions/v5/mapbox";
const DRIVING_PROFILE: &str = "driving";

// Estimación de respaldo cuando Directions no responde: 2 min por km
const FALLBACK_MINUTES_PER_KM: f64 = 2.0;

/// Distancia y tiempo totales del path dibujado
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RouteStats {
    pub total_distance_km: f64,
    pub total_time_min: f64,
}

#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    geometry: Option<DirectionsGeometry>,
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Deserialize)]
struct DirectionsGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

pub struct DirectionsService {
    token: String,
}

impl DirectionsService {
    pub fn new() -> Self {
        Self {
            token: CONFIG.mapbox_token().to_string(),
        }
    }

    /// Monta la URL de Directions con waypoints "lng,lat;lng,lat;..."
    pub fn directions_url(token: &str, coordinates: &[[f64; 2]], full_overview: bool) -> String {
        let waypoints: Vec<String> = coordinates
            .iter()
            .map(|c| format!("{},{}", c[0], c[1]))
            .collect();
        let overview = if full_overview {
            "geometries=geojson&overview=full"
        } else {
            "overview=false"
        };
        format!(
            "{}/{}/{}?{}&access_token={}",
            DIRECTIONS_BASE,
            DRIVING_PROFILE,
            waypoints.join(";"),
            overview,
            token
        )
    }

    /// Path pegado a carretera por todas las paradas en secuencia.
    /// Devuelve Err si la API no da ruta: el caller decide el fallback.
    pub async fn fetch_road_path(&self, coordinates: &[[f64; 2]]) -> Result<Vec<[f64; 2]>, String> {
        if coordinates.len() < 2 {
            return Err("Not enough coordinates for a path".to_string());
        }

        let url = Self::directions_url(&self.token, coordinates, true);
        log::info!("🛣️ Pidiendo path por carretera: {} paradas", coordinates.len());

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        let data = response
            .json::<DirectionsResponse>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;

        let path = data
            .routes
            .into_iter()
            .next()
            .and_then(|r| r.geometry)
            .map(|g| g.coordinates)
            .unwrap_or_default();

        if path.is_empty() {
            return Err("Directions API returned no route".to_string());
        }

        log::info!("✅ Path recibido: {} puntos", path.len());
        Ok(path)
    }

    /// Distancia/tiempo reales de la ruta según Directions
    pub async fn fetch_route_stats(&self, coordinates: &[[f64; 2]]) -> Result<RouteStats, String> {
        if coordinates.len() < 2 {
            return Ok(RouteStats::default());
        }

        let url = Self::directions_url(&self.token, coordinates, false);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        let data = response
            .json::<DirectionsResponse>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;

        match data.routes.first() {
            Some(route) => Ok(RouteStats {
                total_distance_km: route.distance.unwrap_or(0.0) / 1000.0,
                total_time_min: route.duration.unwrap_or(0.0) / 60.0,
            }),
            None => Err("Directions API returned no route".to_string()),
        }
    }
}

impl Default for DirectionsService {
    fn default() -> Self {
        Self::new()
    }
}

/// Fallback: path en línea recta con exactamente las coordenadas de entrada
pub fn straight_line_path(coordinates: &[[f64; 2]]) -> Vec<[f64; 2]> {
    coordinates.to_vec()
}

/// Distancia Haversine en km entre dos [lng, lat]
pub fn haversine_km(a: [f64; 2], b: [f64; 2]) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let (lng1, lat1) = (a[0], a[1]);
    let (lng2, lat2) = (b[0], b[1]);

    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Estadísticas de respaldo: suma Haversine de los tramos + 2 min/km
pub fn fallback_stats(coordinates: &[[f64; 2]]) -> RouteStats {
    let total_distance_km: f64 = coordinates
        .windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .sum();
    RouteStats {
        total_distance_km,
        total_time_min: total_distance_km * FALLBACK_MINUTES_PER_KM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPOT: [f64; 2] = [-1.9876, 50.7128];
    const BOURNEMOUTH: [f64; 2] = [-1.8976, 50.7428];

    #[test]
    fn url_concatena_waypoints_con_punto_y_coma() {
        let url = DirectionsService::directions_url("tok", &[DEPOT, BOURNEMOUTH], true);
        assert!(url.contains("/driving/-1.9876,50.7128;-1.8976,50.7428?"));
        assert!(url.contains("geometries=geojson"));
        assert!(url.contains("overview=full"));
    }

    #[test]
    fn url_de_stats_no_pide_geometria() {
        let url = DirectionsService::directions_url("tok", &[DEPOT, BOURNEMOUTH], false);
        assert!(url.contains("overview=false"));
        assert!(!url.contains("geometries"));
    }

    #[test]
    fn linea_recta_conserva_las_coordenadas_en_orden() {
        let coords = vec![DEPOT, BOURNEMOUTH, [-0.1386, 51.52]];
        assert_eq!(straight_line_path(&coords), coords);
    }

    #[test]
    fn haversine_da_distancias_razonables() {
        // Depósito de Poole a Bournemouth: ~7 km en línea recta
        let d = haversine_km(DEPOT, BOURNEMOUTH);
        assert!(d > 5.0 && d < 10.0, "distancia fuera de rango: {}", d);

        // Un punto consigo mismo es 0
        assert!(haversine_km(DEPOT, DEPOT) < 1e-9);
    }

    #[test]
    fn fallback_estima_dos_minutos_por_km() {
        let stats = fallback_stats(&[DEPOT, BOURNEMOUTH]);
        assert!((stats.total_time_min - stats.total_distance_km * 2.0).abs() < 1e-9);
    }

    #[test]
    fn fallback_con_un_solo_punto_es_cero() {
        let stats = fallback_stats(&[DEPOT]);
        assert_eq!(stats, RouteStats::default());
    }
}
