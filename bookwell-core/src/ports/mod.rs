pub mod callers;
pub mod jobs;
pub mod notifications;

pub use callers::CallerDirectory;
pub use jobs::JobRepository;
pub use notifications::NotificationTransport;
