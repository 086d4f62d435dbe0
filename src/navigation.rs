use crate::model::Route;
use tracing::info;

/// Navigation collaborator: the owning page controller moves the user to
/// `route` when asked. The core never decides how routing happens.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator for headless use: records the requested route in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteLog;

impl Navigator for RouteLog {
    fn navigate(&self, route: Route) {
        info!(route = route.as_str(), "navigating");
    }
}
