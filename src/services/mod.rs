pub mod api_client;
pub mod geocoding;
pub mod directions;
pub mod push_channel;

pub use api_client::ApiClient;
pub use geocoding::{GeocodingService, ReverseAddress};
pub use directions::{DirectionsService, RouteStats};
pub use push_channel::PushChannel;
