pub mod route_viewmodel;
pub mod driver_viewmodel;
pub mod map_viewmodel;
pub mod orders_viewmodel;
pub mod analytics_viewmodel;

pub use route_viewmodel::RouteViewModel;
pub use driver_viewmodel::DriverViewModel;
pub use map_viewmodel::{MapViewModel, RenderPhase, RenderReport};
pub use orders_viewmodel::OrdersViewModel;
pub use analytics_viewmodel::AnalyticsViewModel;
