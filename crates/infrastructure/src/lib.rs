//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_image_store;
mod http_principal_resolver;
mod in_memory_event_repository;
mod nominatim_geocoding_gateway;
mod postgres_event_repository;
mod postgres_session_log_repository;

pub use http_image_store::{HttpImageStore, HttpImageStoreConfig};
pub use http_principal_resolver::HttpPrincipalResolver;
pub use in_memory_event_repository::InMemoryEventRepository;
pub use nominatim_geocoding_gateway::{GeocoderConfig, NominatimGeocodingGateway};
pub use postgres_event_repository::PostgresEventRepository;
pub use postgres_session_log_repository::PostgresSessionLogRepository;
