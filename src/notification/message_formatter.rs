//! Renders domain entities into Telegram HTML notifications.
//!
//! Everything here is pure: no I/O, no shared state, and no failure path.
//! Text that does not match the link or image patterns simply produces no
//! attachments and no media.

use crate::announcement::Announcement;
use crate::task::{Task, TaskCategory, TaskStatus};
use regex::Regex;
use std::sync::LazyLock;

use super::notification_models::NotificationPayload;

static LINK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("Invalid link marker regex"));

static BARE_IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://\S+\.(jpg|jpeg|png|gif|webp)").expect("Invalid image url regex")
});

const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

const DUE_DATE_FORMAT: &str = "%B %-d, %Y";
const CREATED_AT_FORMAT: &str = "%B %-d, %Y %H:%M";

#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Public URL of the application, linked from every message.
    pub app_url: String,
}

/// URLs of every `[label](url)` marker, in order of appearance, duplicates kept.
pub fn extract_link_urls(text: &str) -> Vec<String> {
    LINK_MARKER
        .captures_iter(text)
        .map(|caps| caps[2].to_string())
        .collect()
}

pub fn is_image_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// First bare `http(s)://...` image URL anywhere in the text.
pub fn first_image_url(text: &str) -> Option<String> {
    BARE_IMAGE_URL.find(text).map(|m| m.as_str().to_string())
}

/// Replaces each `[label](url)` with an HTML anchor; everything else is untouched.
pub fn rewrite_links(text: &str) -> String {
    LINK_MARKER
        .replace_all(text, r#"<a href="$2">$1</a>"#)
        .into_owned()
}

pub fn status_emoji(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "📝",
        TaskStatus::InProgress => "⏳",
        TaskStatus::Completed => "✅",
    }
}

pub fn category_emoji(category: TaskCategory) -> &'static str {
    match category {
        TaskCategory::Presentation => "🎯",
        TaskCategory::Assignment => "📚",
        TaskCategory::Quiz => "📖",
        TaskCategory::LabReport => "🔬",
        TaskCategory::LabFinal => "🧪",
        TaskCategory::Documents => "📄",
        TaskCategory::Blc => "🏢",
        TaskCategory::Groups => "👥",
        TaskCategory::Other => "📋",
    }
}

fn attachments_section(urls: &[String]) -> Option<String> {
    if urls.is_empty() {
        return None;
    }

    let lines: Vec<String> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| format!("{n}. <a href=\"{url}\">View File {n}</a>", n = i + 1))
        .collect();

    Some(format!("📎 <b>Attachments:</b>\n{}", lines.join("\n")))
}

pub fn format_task(task: &Task, config: &FormatterConfig) -> NotificationPayload {
    let urls = extract_link_urls(&task.description);
    let media_url = urls.iter().find(|url| is_image_url(url)).cloned();

    let header = if task.is_admin_task {
        "🔔 <b>New Admin Task Alert!</b>"
    } else {
        "🔔 <b>New Task Alert!</b>"
    };
    let category = task.category.as_str();

    let mut text = format!(
        "{header}\n\n\
         {category_emoji} <b>{name}</b>\n\
         {status_emoji} Status: {status}\n\n\
         📝 <b>Description:</b>\n\
         {description}\n\n\
         🏷️ Category: #{category}\n\
         📅 Due Date: {due}\n\
         ⏰ Created: {created}",
        category_emoji = category_emoji(task.category),
        name = task.name,
        status_emoji = status_emoji(task.status),
        status = task.status.label(),
        description = rewrite_links(&task.description),
        due = task.due_date.format(DUE_DATE_FORMAT),
        created = task.created_at.format(CREATED_AT_FORMAT),
    );

    if task.is_admin_task {
        text.push_str("\n👑 <b>Admin Task</b>");
    }

    if let Some(section) = attachments_section(&urls) {
        text.push_str("\n\n");
        text.push_str(&section);
    }

    text.push_str(&format!(
        "\n\n🔗 <b>View full details:</b>\n• {}\n\n",
        config.app_url
    ));

    if task.is_admin_task {
        text.push_str(&format!("#NestTask #{} #AdminTask #Task", category));
        text.push_str("\n\n⚡️ Stay updated with NestTask!");
    } else {
        text.push_str(&format!("#NestTask #{} #Task", category));
    }

    NotificationPayload { text, media_url }
}

pub fn format_announcement(
    announcement: &Announcement,
    config: &FormatterConfig,
) -> NotificationPayload {
    let text = format!(
        "📢 <b>Important Announcement</b>\n\n\
         🔔 <b>{title}</b>\n\n\
         {content}\n\n\n\
         🔗 <b>View full details:</b>\n\
         • {app_url}\n\n\n\
         ⚡️ Stay updated with NestTask!",
        title = announcement.title,
        content = announcement.content,
        app_url = config.app_url,
    );

    NotificationPayload {
        text,
        media_url: first_image_url(&announcement.content),
    }
}
