pub mod routes;
pub mod session_dto;
pub mod session_handlers;

pub use routes::session_routes;
