pub mod notification_dto;
pub mod notification_handlers;
pub mod notification_models;
pub mod notification_repository;
pub mod notification_service;
pub mod notification_store;
pub mod routes;

pub use notification_models::{FeedEvent, Notification, Toast};
pub use notification_repository::NotificationRepository;
pub use notification_service::FeedController;
pub use routes::feed_routes;
