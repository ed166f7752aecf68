//! Best-effort notification dispatch.
//!
//! Purchase notifications go onto a bounded queue served by one worker
//! task instead of an unmanaged detached task per request. Every failure
//! mode — full queue, stopped worker, downstream error — is logged and
//! swallowed: notification delivery never affects the purchase outcome.

use notification_service::rpc::{NotificationApi, SendNotificationRequest};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A queued notification.
#[derive(Clone, Debug)]
pub struct NotificationJob {
    /// Recipient
    pub user_id: String,
    /// Message to deliver
    pub message: String,
}

/// Handle for enqueueing notification jobs.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::Sender<NotificationJob>,
}

impl Notifier {
    /// Start a dispatch worker over the given notification API and return
    /// the enqueue handle plus the worker task.
    ///
    /// The worker exits once every handle is dropped and the queue drains.
    #[must_use]
    pub fn spawn(api: Arc<dyn NotificationApi>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<NotificationJob>(capacity);

        let worker = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let request = SendNotificationRequest {
                    user_id: job.user_id.clone(),
                    message: job.message,
                };
                match api.send_notification(request).await {
                    Ok(notification) => {
                        debug!(
                            notification_id = %notification.id,
                            user_id = %job.user_id,
                            "notification delivered"
                        );
                    }
                    Err(e) => {
                        metrics::counter!("ticketing_notifications_failed_total").increment(1);
                        warn!(user_id = %job.user_id, error = %e, "notification delivery failed");
                    }
                }
            }
            debug!("notification worker stopped");
        });

        (Self { tx }, worker)
    }

    /// Enqueue a job without waiting. A full queue drops the job with a
    /// warning (best-effort contract).
    pub fn enqueue(&self, job: NotificationJob) {
        if let Err(e) = self.tx.try_send(job) {
            let job = match &e {
                mpsc::error::TrySendError::Full(job)
                | mpsc::error::TrySendError::Closed(job) => job,
            };
            metrics::counter!("ticketing_notifications_dropped_total").increment(1);
            warn!(user_id = %job.user_id, "notification dropped: {e}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use notification_service::service::NotificationService;
    use notification_service::store::InMemoryNotificationStore;

    #[tokio::test]
    async fn test_jobs_are_delivered_to_the_service() {
        let store = Arc::new(InMemoryNotificationStore::new());
        let api = Arc::new(NotificationService::new(store));
        let (notifier, worker) = Notifier::spawn(api.clone(), 16);

        notifier.enqueue(NotificationJob {
            user_id: "user-1".to_string(),
            message: "hello".to_string(),
        });
        drop(notifier);
        worker.await.unwrap();

        use notification_service::rpc::NotificationApi as _;
        let listed = api.get_notifications("user-1").await.unwrap();
        assert_eq!(listed.notifications.len(), 1);
        assert_eq!(listed.notifications[0].message, "hello");
    }

    /// Notification API that never completes, keeping the worker busy so
    /// the queue can fill up.
    struct StuckNotificationApi;

    #[async_trait::async_trait]
    impl NotificationApi for StuckNotificationApi {
        async fn send_notification(
            &self,
            _req: SendNotificationRequest,
        ) -> platform_core::Result<notification_service::rpc::NotificationResponse> {
            std::future::pending().await
        }

        async fn get_notifications(
            &self,
            _user_id: &str,
        ) -> platform_core::Result<notification_service::rpc::ListNotificationsResponse> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_full_queue_drops_jobs_without_error() {
        let (notifier, worker) = Notifier::spawn(Arc::new(StuckNotificationApi), 1);

        // Give the worker a moment to pull the first job off the queue.
        notifier.enqueue(NotificationJob {
            user_id: "user-1".to_string(),
            message: "first".to_string(),
        });
        tokio::task::yield_now().await;

        // One slot plus one in-flight job; everything beyond is dropped
        // silently.
        for i in 0..5 {
            notifier.enqueue(NotificationJob {
                user_id: "user-1".to_string(),
                message: format!("overflow {i}"),
            });
        }

        worker.abort();
        let _ = worker.await;
    }

    #[tokio::test]
    async fn test_enqueue_after_worker_stopped_does_not_panic() {
        let store = Arc::new(InMemoryNotificationStore::new());
        let api = Arc::new(NotificationService::new(store));
        let (notifier, worker) = Notifier::spawn(api, 1);

        worker.abort();
        let _ = worker.await;

        // Channel closed: the job is dropped, never an error.
        notifier.enqueue(NotificationJob {
            user_id: "user-1".to_string(),
            message: "lost".to_string(),
        });
    }
}
