pub mod events;
pub mod health;
pub mod images;
pub mod session_logs;
