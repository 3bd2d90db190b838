use std::sync::Arc;

use rally_application::{EventService, ImageService, PrincipalResolver, SessionLogService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub event_service: EventService,
    pub session_log_service: SessionLogService,
    pub image_service: ImageService,
    pub principal_resolver: Arc<dyn PrincipalResolver>,
}
