// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod order_state;
pub mod customer_state;
pub mod driver_state;
pub mod notification_state;
pub mod app_state;

pub use reactivity::Observable;
pub use order_state::{OrderState, PushOutcome};
pub use customer_state::CustomerState;
pub use driver_state::DriverState;
pub use notification_state::{Notification, NotificationState, Severity};
pub use app_state::AppState;
