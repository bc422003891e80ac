use crate::announcement::Announcement;
use crate::task::Task;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use super::message_formatter::{format_announcement, format_task, FormatterConfig};
use super::notification_dispatcher::Dispatcher;
use super::notification_models::NotificationPayload;

/// Turns domain events into chat notifications.
///
/// Every operation reports a plain `bool`; nothing here can fail the mutation
/// that triggered it.
#[derive(Clone)]
pub struct NotificationService {
    dispatcher: Arc<dyn Dispatcher>,
    formatter: FormatterConfig,
}

impl NotificationService {
    pub fn new(dispatcher: Arc<dyn Dispatcher>, formatter: FormatterConfig) -> Self {
        Self {
            dispatcher,
            formatter,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.dispatcher.is_enabled()
    }

    pub async fn notify_task_created(&self, task: &Task) -> bool {
        let payload = format_task(task, &self.formatter);
        let delivered = self.dispatch(&payload).await;
        info!(task_id = %task.id, delivered, "Task notification processed");
        delivered
    }

    pub async fn notify_announcement_created(&self, announcement: &Announcement) -> bool {
        let payload = format_announcement(announcement, &self.formatter);
        let delivered = self.dispatch(&payload).await;
        info!(announcement_id = %announcement.id, delivered, "Announcement notification processed");
        delivered
    }

    /// Fire-and-forget variant; the handle may be awaited or dropped.
    pub fn spawn_task_created(&self, task: Task) -> JoinHandle<bool> {
        let service = self.clone();
        tokio::spawn(async move { service.notify_task_created(&task).await })
    }

    pub fn spawn_announcement_created(&self, announcement: Announcement) -> JoinHandle<bool> {
        let service = self.clone();
        tokio::spawn(async move { service.notify_announcement_created(&announcement).await })
    }

    async fn dispatch(&self, payload: &NotificationPayload) -> bool {
        self.dispatcher
            .send(&payload.text, payload.media_url.as_deref())
            .await
    }
}
