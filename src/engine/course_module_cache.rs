// ==========================================
// 教务管理系统 - 课程模块缓存
// ==========================================
// 职责: 会话级 course_id -> CourseModuleSet 缓存
// 规则:
// - 懒加载、只增不删；会话结束时 clear()
// - 每个课程一个 OnceCell：并发解析同一课程时只发起一次查询
// - 查询失败不写入缓存，下一次解析可重试
// ==========================================

use crate::backend::BackendResult;
use crate::domain::CourseModuleSet;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

type CourseCell = Arc<OnceCell<Arc<CourseModuleSet>>>;

/// 缓存统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub lookups: u64,
    pub fetches: u64,
}

#[derive(Default)]
pub struct CourseModuleCache {
    cells: Mutex<HashMap<i64, CourseCell>>,
    lookups: AtomicU64,
    fetches: AtomicU64,
}

impl CourseModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, course_id: i64) -> CourseCell {
        let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells.entry(course_id).or_default().clone()
    }

    /// 命中直接返回；未命中调用 fetch 并写入
    pub async fn get_or_fetch<F, Fut>(
        &self,
        course_id: i64,
        fetch: F,
    ) -> BackendResult<Arc<CourseModuleSet>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = BackendResult<CourseModuleSet>>,
    {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let cell = self.cell(course_id);

        if let Some(modules) = cell.get() {
            tracing::debug!(course_id, "课程模块缓存命中");
            return Ok(modules.clone());
        }

        let modules = cell
            .get_or_try_init(move || async move {
                self.fetches.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(course_id, "课程模块缓存未命中，查询后端");
                fetch().await.map(Arc::new)
            })
            .await?;
        Ok(modules.clone())
    }

    /// 已成功缓存的课程
    pub fn get(&self, course_id: i64) -> Option<Arc<CourseModuleSet>> {
        let cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells.get(&course_id).and_then(|cell| cell.get().cloned())
    }

    pub fn contains(&self, course_id: i64) -> bool {
        self.get(course_id).is_some()
    }

    /// 已成功缓存的课程数
    pub fn len(&self) -> usize {
        let cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells.values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 会话结束时清空
    pub fn clear(&self) {
        let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            lookups: self.lookups.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
        }
    }
}
