pub mod authorization;
pub mod distance_feed;
pub mod history;
pub mod job_access;
pub mod lifecycle;
pub mod notifications;
pub mod outcome;
pub mod unit_of_work;

pub use authorization::{ListingPolicy, ListingScope, select_listing};
pub use distance_feed::{AffectedCounts, DistanceFeedService};
pub use history::HistoryService;
pub use job_access::JobAccessService;
pub use lifecycle::{BookingLifecycleService, LifecycleResult};
pub use notifications::NotificationDispatcher;
pub use outcome::{Outcome, OutcomeKind};
pub use unit_of_work::{AppUnitOfWork, AppUnitOfWorkBuilder};
