pub mod order;
pub mod customer;
pub mod route;
pub mod analytics;
pub mod push;

pub use order::{Order, OrderDraft, OrderStatus, OrderUpdate, PaymentMethod};
pub use customer::{Customer, CustomerDraft, CustomerListResponse, CustomerPage, Pagination};
pub use route::{OptimizeRouteRequest, OptimizeRouteResponse, PrintRouteRequest, RouteStop};
pub use analytics::{Analytics, ShopStat};
pub use push::{OrderUpdatePayload, PushEvent};
