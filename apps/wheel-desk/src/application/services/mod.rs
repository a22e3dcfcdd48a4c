//! Application services.

mod dashboard_session;
mod order_status_poller;

pub use dashboard_session::{
    ActionGuard, DashboardSession, SessionAction, SessionDefaults, SessionError,
};
pub use order_status_poller::{OrderStatusPoller, PollerConfig};
