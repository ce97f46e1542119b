use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url_development: String,
    pub backend_url_production: String,
    pub environment: String,
    pub enable_logging: bool,
    pub refresh_interval_seconds: u32,
    pub map_config: MapConfig,
    pub depot_config: DepotConfig,
    pub mapbox_access_token: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url_development: "http://localhost:5001".to_string(),
            backend_url_production: "https://api.magicroute.co.uk".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            refresh_interval_seconds: 30,
            map_config: MapConfig::default(),
            depot_config: DepotConfig::default(),
            mapbox_access_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub default_center_lng: f64,
    pub default_center_lat: f64,
    pub default_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub route_line_width: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        // Centro en Bournemouth, buena vista general de la costa sur de UK
        Self {
            default_center_lng: -1.8976,
            default_center_lat: 50.7428,
            default_zoom: 8.0,
            min_zoom: 6.0,
            max_zoom: 16.0,
            route_line_width: 6,
        }
    }
}

/// Depósito fijo desde donde arrancan todas las rutas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepotConfig {
    pub name: String,
    pub postcode: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl Default for DepotConfig {
    fn default() -> Self {
        Self {
            name: "Poole Depot".to_string(),
            postcode: "BH13 7EX".to_string(),
            longitude: -1.9876,
            latitude: 50.7128,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self {
            backend_url_development: option_env!("BACKEND_URL_DEVELOPMENT")
                .unwrap_or("http://localhost:5001").to_string(),
            backend_url_production: option_env!("BACKEND_URL_PRODUCTION")
                .unwrap_or("https://api.magicroute.co.uk").to_string(),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            refresh_interval_seconds: option_env!("REFRESH_INTERVAL_SECONDS")
                .unwrap_or("30").parse().unwrap_or(30),
            map_config: MapConfig {
                default_center_lng: option_env!("DEFAULT_MAP_CENTER_LNG")
                    .unwrap_or("-1.8976").parse().unwrap_or(-1.8976),
                default_center_lat: option_env!("DEFAULT_MAP_CENTER_LAT")
                    .unwrap_or("50.7428").parse().unwrap_or(50.7428),
                default_zoom: option_env!("DEFAULT_MAP_ZOOM")
                    .unwrap_or("8.0").parse().unwrap_or(8.0),
                min_zoom: option_env!("MIN_MAP_ZOOM")
                    .unwrap_or("6.0").parse().unwrap_or(6.0),
                max_zoom: option_env!("MAX_MAP_ZOOM")
                    .unwrap_or("16.0").parse().unwrap_or(16.0),
                route_line_width: option_env!("ROUTE_LINE_WIDTH")
                    .unwrap_or("6").parse().unwrap_or(6),
            },
            depot_config: DepotConfig {
                name: option_env!("DEPOT_NAME")
                    .unwrap_or("Poole Depot").to_string(),
                postcode: option_env!("DEPOT_POSTCODE")
                    .unwrap_or("BH13 7EX").to_string(),
                longitude: option_env!("DEPOT_LONGITUDE")
                    .unwrap_or("-1.9876").parse().unwrap_or(-1.9876),
                latitude: option_env!("DEPOT_LATITUDE")
                    .unwrap_or("50.7128").parse().unwrap_or(50.7128),
            },
            mapbox_access_token: option_env!("MAPBOX_ACCESS_TOKEN")
                .unwrap_or("").to_string(),
        }
    }

    /// Obtiene la URL del backend según el entorno actual
    pub fn backend_url(&self) -> &str {
        match self.environment.as_str() {
            "production" => &self.backend_url_production,
            _ => &self.backend_url_development,
        }
    }

    /// Obtiene el token de Mapbox
    pub fn mapbox_token(&self) -> &str {
        &self.mapbox_access_token
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_url_sigue_al_entorno() {
        let mut config = AppConfig::default();
        assert_eq!(config.backend_url(), "http://localhost:5001");

        config.environment = "production".to_string();
        assert_eq!(config.backend_url(), "https://api.magicroute.co.uk");
    }

    #[test]
    fn depot_por_defecto_es_poole() {
        let depot = DepotConfig::default();
        assert_eq!(depot.postcode, "BH13 7EX");
        assert!(depot.longitude < 0.0 && depot.latitude > 50.0);
    }
}
