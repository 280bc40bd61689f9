use std::{any::type_name_of_val, fmt, sync::Arc};

use tracing::{error, info, warn};

use crate::application::outcome::Outcome;
use crate::domain::{Ack, Caller, Channel, JobId, Notification};
use crate::ports::{JobRepository, NotificationTransport};

/// Routes a resend request to the translator of a job over one channel.
#[derive(Clone)]
pub struct NotificationDispatcher {
    jobs: Arc<dyn JobRepository>,
    transport: Arc<dyn NotificationTransport>,
}

impl fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("jobs", &type_name_of_val(self.jobs.as_ref()))
            .field("transport", &type_name_of_val(self.transport.as_ref()))
            .finish()
    }
}

impl NotificationDispatcher {
    pub fn new(jobs: Arc<dyn JobRepository>, transport: Arc<dyn NotificationTransport>) -> Self {
        Self { jobs, transport }
    }

    pub async fn dispatch(&self, caller: &Caller, job_id: i64, channel: Channel) -> Outcome<Ack> {
        let Some(job_id) = JobId::new(job_id) else {
            return Outcome::NotFound;
        };

        let job = match self.jobs.find_job(job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => return Outcome::NotFound,
            Err(err) => {
                error!(job_id = %job_id, error = %err, "failed to load job for notification");
                return Outcome::fault(err);
            }
        };

        let Some(translator_id) = job.translator_id else {
            warn!(job_id = %job_id, %channel, "no translator assigned; nothing to notify");
            return Outcome::Empty;
        };

        let notification = Notification {
            job_id,
            translator_id,
            channel,
            requested_by: caller.id,
        };

        match self.transport.send(&notification).await {
            Ok(()) => {
                info!(
                    job_id = %job_id,
                    translator_id = %translator_id,
                    %channel,
                    "translator notification handed off"
                );
                Outcome::Done(Ack { channel })
            }
            Err(err) => {
                error!(job_id = %job_id, %channel, error = %err, "notification hand-off failed");
                Outcome::fault(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingPayload, Role, UserId};
    use crate::error::BookingError;
    use crate::infrastructure::memory::InMemoryStore;
    use crate::ports::notifications::MockNotificationTransport;

    async fn store_with(translator: Option<i64>) -> (Arc<InMemoryStore>, i64) {
        let store = Arc::new(InMemoryStore::new());
        let job = store
            .insert_job(&BookingPayload {
                user_id: UserId(1),
                translator_id: translator.map(UserId),
                ..Default::default()
            })
            .await
            .unwrap();
        (store, job.id.get())
    }

    fn admin() -> Caller {
        Caller::new(UserId(99), Role::Admin)
    }

    #[tokio::test]
    async fn routes_to_translator_on_requested_channel() {
        let (store, job_id) = store_with(Some(7)).await;
        let mut transport = MockNotificationTransport::new();
        transport
            .expect_send()
            .withf(move |n| {
                n.job_id.get() == job_id
                    && n.translator_id == UserId(7)
                    && n.channel == Channel::Sms
                    && n.requested_by == UserId(99)
            })
            .times(1)
            .returning(|_| Ok(()));
        let dispatcher = NotificationDispatcher::new(store, Arc::new(transport));

        let outcome = dispatcher.dispatch(&admin(), job_id, Channel::Sms).await;
        assert_eq!(outcome, Outcome::Done(Ack { channel: Channel::Sms }));
        assert_eq!(Ack { channel: Channel::Sms }.text(), "SMS sent");
    }

    #[tokio::test]
    async fn job_without_translator_is_a_no_op() {
        let (store, job_id) = store_with(None).await;
        let mut transport = MockNotificationTransport::new();
        transport.expect_send().never();
        let dispatcher = NotificationDispatcher::new(store, Arc::new(transport));

        assert_eq!(
            dispatcher.dispatch(&admin(), job_id, Channel::Push).await,
            Outcome::Empty
        );
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let (store, _) = store_with(Some(7)).await;
        let mut transport = MockNotificationTransport::new();
        transport.expect_send().never();
        let dispatcher = NotificationDispatcher::new(store, Arc::new(transport));

        assert_eq!(
            dispatcher.dispatch(&admin(), 404, Channel::Push).await,
            Outcome::NotFound
        );
        assert_eq!(
            dispatcher.dispatch(&admin(), -1, Channel::Push).await,
            Outcome::NotFound
        );
    }

    #[tokio::test]
    async fn transport_rejection_is_a_fault() {
        let (store, job_id) = store_with(Some(7)).await;
        let mut transport = MockNotificationTransport::new();
        transport
            .expect_send()
            .returning(|_| Err(BookingError::Transport("queue closed".into())));
        let dispatcher = NotificationDispatcher::new(store, Arc::new(transport));

        assert_eq!(
            dispatcher.dispatch(&admin(), job_id, Channel::Push).await,
            Outcome::Fault("Notification transport error: queue closed".into())
        );
    }
}
