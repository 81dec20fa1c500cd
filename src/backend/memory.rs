// ==========================================
// 教务管理系统 - 内存后端
// ==========================================
// 职责: 以 BackendFixture 为数据源实现全部后端接口
// 用途: 单元/集成测试、命令行离线演示
// 附加: 记录调用次数、可注入课程模块失败/目录失败/查询延迟
// ==========================================

use crate::backend::backend_trait::{
    BatchAssignmentGateway, BatchCatalog, CourseCatalog, FacultyDirectory, ModuleAssignmentLookup,
};
use crate::backend::dto::{
    BackendFixture, BatchDto, CourseDto, CourseModuleDto, FacultyBatchAssignmentDto,
    FacultyModuleAssignmentDto, FacultyProfileDto,
};
use crate::backend::error::{BackendError, BackendResult};
use crate::domain::AssignFacultyRequest;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub struct InMemoryBackend {
    fixture: BackendFixture,
    batch_assignments: Mutex<Vec<FacultyBatchAssignmentDto>>,
    failing_courses: HashSet<i64>,
    catalog_failure: Option<String>,
    assignment_delays: HashMap<i64, Duration>,
    course_module_calls: Mutex<HashMap<i64, usize>>,
    assign_calls: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new(fixture: BackendFixture) -> Self {
        let existing = fixture.batch_assignments.clone();
        Self {
            fixture,
            batch_assignments: Mutex::new(existing),
            failing_courses: HashSet::new(),
            catalog_failure: None,
            assignment_delays: HashMap::new(),
            course_module_calls: Mutex::new(HashMap::new()),
            assign_calls: AtomicUsize::new(0),
        }
    }

    pub fn from_json(json: &str) -> BackendResult<Self> {
        Ok(Self::new(BackendFixture::from_json(json)?))
    }

    /// 该课程的模块查询始终失败
    pub fn with_failing_course(mut self, course_id: i64) -> Self {
        self.failing_courses.insert(course_id);
        self
    }

    /// 目录加载（教师/班次/课程）全部失败
    pub fn with_catalog_failure(mut self, message: &str) -> Self {
        self.catalog_failure = Some(message.to_string());
        self
    }

    /// 查询该教师模块分配时延迟返回
    pub fn with_assignment_delay(mut self, faculty_id: i64, delay: Duration) -> Self {
        self.assignment_delays.insert(faculty_id, delay);
        self
    }

    /// 某课程模块被查询的次数
    pub fn course_module_calls(&self, course_id: i64) -> usize {
        self.course_module_calls
            .lock()
            .map(|calls| calls.get(&course_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// 课程模块查询总次数
    pub fn total_course_module_calls(&self) -> usize {
        self.course_module_calls
            .lock()
            .map(|calls| calls.values().sum())
            .unwrap_or(0)
    }

    /// 分配接口被调用次数
    pub fn assign_calls(&self) -> usize {
        self.assign_calls.load(Ordering::SeqCst)
    }

    /// 当前已存在的教师-班次分配
    pub fn batch_assignments(&self) -> Vec<FacultyBatchAssignmentDto> {
        self.batch_assignments
            .lock()
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    fn check_catalog(&self) -> BackendResult<()> {
        match &self.catalog_failure {
            Some(msg) => Err(BackendError::Unavailable(msg.clone())),
            None => Ok(()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(BackendFixture::default())
    }
}

#[async_trait]
impl FacultyDirectory for InMemoryBackend {
    async fn list_active_faculty(&self) -> BackendResult<Vec<FacultyProfileDto>> {
        self.check_catalog()?;
        Ok(self
            .fixture
            .faculty
            .iter()
            .filter(|f| f.is_active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BatchCatalog for InMemoryBackend {
    async fn list_active_batches(&self) -> BackendResult<Vec<BatchDto>> {
        self.check_catalog()?;
        Ok(self
            .fixture
            .batches
            .iter()
            .filter(|b| b.is_active && !b.status.eq_ignore_ascii_case("CANCELLED"))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CourseCatalog for InMemoryBackend {
    async fn list_courses(&self) -> BackendResult<Vec<CourseDto>> {
        self.check_catalog()?;
        Ok(self.fixture.courses.clone())
    }

    async fn list_course_modules(&self, course_id: i64) -> BackendResult<Vec<CourseModuleDto>> {
        if let Ok(mut calls) = self.course_module_calls.lock() {
            *calls.entry(course_id).or_insert(0) += 1;
        }
        // 让出执行权，模拟网络往返
        tokio::task::yield_now().await;

        if self.failing_courses.contains(&course_id) {
            return Err(BackendError::Request(format!(
                "course {} modules: 502 Bad Gateway",
                course_id
            )));
        }
        Ok(self
            .fixture
            .course_modules
            .get(&course_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ModuleAssignmentLookup for InMemoryBackend {
    async fn list_active_module_assignments(
        &self,
        faculty_id: i64,
    ) -> BackendResult<Vec<FacultyModuleAssignmentDto>> {
        if let Some(delay) = self.assignment_delays.get(&faculty_id) {
            tokio::time::sleep(*delay).await;
        }
        Ok(self
            .fixture
            .module_assignments
            .get(&faculty_id)
            .map(|list| list.iter().filter(|a| a.is_active).cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl BatchAssignmentGateway for InMemoryBackend {
    async fn assign_faculty_to_batch(
        &self,
        request: &AssignFacultyRequest,
    ) -> BackendResult<FacultyBatchAssignmentDto> {
        self.assign_calls.fetch_add(1, Ordering::SeqCst);

        if !self.fixture.faculty.iter().any(|f| f.id == request.faculty_id) {
            return Err(BackendError::NotFound {
                entity: "Faculty".to_string(),
                id: request.faculty_id.to_string(),
            });
        }
        if !self.fixture.batches.iter().any(|b| b.id == request.batch_id) {
            return Err(BackendError::NotFound {
                entity: "Batch".to_string(),
                id: request.batch_id.to_string(),
            });
        }

        let mut list = self
            .batch_assignments
            .lock()
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        if list.iter().any(|a| a.matches(request)) {
            return Err(BackendError::Conflict(
                "Faculty is already assigned to this batch".to_string(),
            ));
        }

        let next_id = list.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let created = FacultyBatchAssignmentDto {
            id: next_id,
            faculty_id: request.faculty_id,
            batch_id: request.batch_id,
            assigned_at: Some(Utc::now()),
        };
        list.push(created.clone());
        Ok(created)
    }
}
