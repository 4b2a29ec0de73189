pub mod command;
pub mod router;

pub use command::{RouteError, WatcherCommand};
pub use router::{CommandRouter, WATCHER_METHOD};
