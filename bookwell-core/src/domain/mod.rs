pub mod caller;
pub mod distance;
pub mod history;
pub mod job;
pub mod notification;

pub use caller::{Caller, CallerRecord, Role, RoleMapping, UserId};
pub use distance::{AdminPatch, Distance, DistanceFeed, TelemetryPatch};
pub use history::{HistoryEntry, HistoryView, Relation};
pub use job::{BookingPayload, Job, JobFilter, JobId, JobQuery, JobScope};
pub use notification::{Ack, Channel, Notification};
