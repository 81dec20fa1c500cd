// ==========================================
// 教务管理系统 - 分配事件发布
// ==========================================
// 职责: 定义分配事件发布 trait，通知表单调用方（列表刷新等）
// 说明: 引擎/API 层只依赖 trait，调用方自行实现适配器
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 分配事件类型
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentEventType {
    /// 教师已分配到班次
    FacultyAssigned,
    /// 表单关闭（会话结束）
    FormClosed,
}

impl AssignmentEventType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            AssignmentEventType::FacultyAssigned => "FacultyAssigned",
            AssignmentEventType::FormClosed => "FormClosed",
        }
    }
}

/// 分配事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentEvent {
    /// 表单会话 ID
    pub session_id: String,
    pub event_type: AssignmentEventType,
    pub faculty_id: Option<i64>,
    pub batch_id: Option<i64>,
    /// 后端返回的分配记录 ID
    pub assignment_id: Option<i64>,
    pub occurred_at: DateTime<Utc>,
}

impl AssignmentEvent {
    pub fn faculty_assigned(
        session_id: &str,
        faculty_id: i64,
        batch_id: i64,
        assignment_id: i64,
    ) -> Self {
        Self {
            session_id: session_id.to_string(),
            event_type: AssignmentEventType::FacultyAssigned,
            faculty_id: Some(faculty_id),
            batch_id: Some(batch_id),
            assignment_id: Some(assignment_id),
            occurred_at: Utc::now(),
        }
    }

    pub fn form_closed(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            event_type: AssignmentEventType::FormClosed,
            faculty_id: None,
            batch_id: None,
            assignment_id: None,
            occurred_at: Utc::now(),
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

pub trait AssignmentEventPublisher: Send + Sync {
    /// 发布分配事件
    ///
    /// # 返回
    /// - `Err`: 发布失败（调用方只记录日志，不回滚已成功的分配）
    fn publish(&self, event: AssignmentEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl AssignmentEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: AssignmentEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - session_id={}, event_type={}",
            event.session_id,
            event.event_type.as_str()
        );
        Ok(())
    }
}

/// 记录型事件发布者（按发布顺序保存）
#[derive(Debug, Clone, Default)]
pub struct RecordingEventPublisher {
    events: Arc<Mutex<Vec<AssignmentEvent>>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AssignmentEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl AssignmentEventPublisher for RecordingEventPublisher {
    fn publish(&self, event: AssignmentEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut events = self
            .events
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?;
        events.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faculty_assigned_event() {
        let event = AssignmentEvent::faculty_assigned("S1", 3, 7, 42);

        assert_eq!(event.event_type, AssignmentEventType::FacultyAssigned);
        assert_eq!(event.faculty_id, Some(3));
        assert_eq!(event.batch_id, Some(7));
        assert_eq!(event.assignment_id, Some(42));
    }

    #[test]
    fn test_noop_publisher() {
        let publisher = NoOpEventPublisher;
        let result = publisher.publish(AssignmentEvent::form_closed("S1"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_recording_publisher_keeps_order() {
        let publisher = RecordingEventPublisher::new();
        publisher
            .publish(AssignmentEvent::faculty_assigned("S1", 1, 2, 3))
            .unwrap();
        publisher.publish(AssignmentEvent::form_closed("S1")).unwrap();

        let events = publisher.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type.as_str(), "FacultyAssigned");
        assert_eq!(events[1].event_type, AssignmentEventType::FormClosed);
    }
}
