mod events;
mod health;
mod methods;

pub use events::event_router;
pub use health::health_router;
pub use methods::method_router;
