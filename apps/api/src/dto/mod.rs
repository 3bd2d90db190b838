mod common;
mod events;
mod session_logs;

pub use common::HealthResponse;
pub use events::{
    CoordinatesResponse, CreateEventRequest, EventResponse, ImageUploadResponse,
    ProximitySearchResponse, SearchQuery, UpdateEventRequest,
};
pub use session_logs::SessionLogResponse;
