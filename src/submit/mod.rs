pub mod error;
pub mod notify;
pub mod path_resolver;

pub use error::{ResponseData, SubmitError, ValidationDetail};
pub use notify::{MemoryNotifier, Notification, Notifier, TracingNotifier};
pub use path_resolver::{FullPath, LastKeySegment, LastSegment, PathResolver, map_validation_errors};
