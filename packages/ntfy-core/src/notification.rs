use crate::payload::Payload;
use serde::{Deserialize, Serialize};

/// 交给系统展示的本地通知，`id` 相同时替换已有通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub id: String,
    pub title: String,
    pub body: String,
    pub metadata: Payload,
}
