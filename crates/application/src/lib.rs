//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_ports;
mod event_ports;
mod event_service;
mod image_service;
mod session_log_service;

pub use auth_ports::PrincipalResolver;
pub use event_ports::{
    CreateEventInput, EventRepository, GeocodingGateway, ProximitySearchOutcome, UpdateEventInput,
};
pub use event_service::EventService;
pub use image_service::{ImageService, ImageStore, ImageUpload, MAX_IMAGE_BYTES};
pub use session_log_service::{SessionLogRepository, SessionLogService};
