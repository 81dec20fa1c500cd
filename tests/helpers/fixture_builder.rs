// ==========================================
// 后端数据构建器 - 用于集成测试
// ==========================================

use campus_admin::backend::{
    BackendFixture, BatchDto, CourseDto, CourseModuleDto, FacultyBatchAssignmentDto,
    FacultyModuleAssignmentDto, FacultyProfileDto, FacultyUserDto, InMemoryBackend,
};

// ==========================================
// FixtureBuilder
// ==========================================

#[derive(Default)]
pub struct FixtureBuilder {
    fixture: BackendFixture,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faculty(mut self, id: i64, full_name: &str) -> Self {
        self.fixture.faculty.push(FacultyProfileDto {
            id,
            employee_code: format!("EMP{:03}", id),
            designation: Some("Lecturer".to_string()),
            user: Some(FacultyUserDto {
                full_name: Some(full_name.to_string()),
            }),
            is_active: true,
        });
        self
    }

    pub fn inactive_faculty(mut self, id: i64, full_name: &str) -> Self {
        self = self.faculty(id, full_name);
        if let Some(dto) = self.fixture.faculty.last_mut() {
            dto.is_active = false;
        }
        self
    }

    pub fn course(mut self, id: i64, code: &str) -> Self {
        self.fixture.courses.push(CourseDto {
            id,
            code: code.to_string(),
            name: format!("{} course", code),
        });
        self
    }

    pub fn batch(self, id: i64, code: &str, course_code: &str) -> Self {
        self.batch_with_status(id, code, course_code, "ACTIVE")
    }

    pub fn batch_with_status(mut self, id: i64, code: &str, course_code: &str, status: &str) -> Self {
        self.fixture.batches.push(BatchDto {
            id,
            code: code.to_string(),
            course_code: course_code.to_string(),
            course_name: None,
            centre_name: Some("Main Campus".to_string()),
            mode: Some("OFFLINE".to_string()),
            status: status.to_string(),
            is_active: true,
            start_date: None,
            end_date: None,
        });
        self
    }

    /// 课程模块（新字段 module）
    pub fn course_modules(mut self, course_id: i64, modules: &[(i64, &str)]) -> Self {
        let entry = self.fixture.course_modules.entry(course_id).or_default();
        for (id, name) in modules {
            entry.push(CourseModuleDto::module(*id, name));
        }
        self
    }

    /// 课程模块（旧字段 subject）
    pub fn course_subjects(mut self, course_id: i64, subjects: &[(i64, &str)]) -> Self {
        let entry = self.fixture.course_modules.entry(course_id).or_default();
        for (id, name) in subjects {
            entry.push(CourseModuleDto::legacy_subject(*id, name));
        }
        self
    }

    pub fn assign_module(mut self, faculty_id: i64, module_id: i64, name: &str) -> Self {
        self.fixture
            .module_assignments
            .entry(faculty_id)
            .or_default()
            .push(FacultyModuleAssignmentDto::module(Some(module_id), Some(name)));
        self
    }

    /// 只有名称、没有 ID 的模块分配
    pub fn assign_module_name(mut self, faculty_id: i64, name: &str) -> Self {
        self.fixture
            .module_assignments
            .entry(faculty_id)
            .or_default()
            .push(FacultyModuleAssignmentDto::module(None, Some(name)));
        self
    }

    pub fn assign_legacy_subject(mut self, faculty_id: i64, subject_id: i64, name: &str) -> Self {
        self.fixture
            .module_assignments
            .entry(faculty_id)
            .or_default()
            .push(FacultyModuleAssignmentDto::legacy_subject(Some(subject_id), Some(name)));
        self
    }

    pub fn inactive_module(mut self, faculty_id: i64, module_id: i64, name: &str) -> Self {
        let mut dto = FacultyModuleAssignmentDto::module(Some(module_id), Some(name));
        dto.is_active = false;
        self.fixture
            .module_assignments
            .entry(faculty_id)
            .or_default()
            .push(dto);
        self
    }

    pub fn existing_assignment(mut self, id: i64, faculty_id: i64, batch_id: i64) -> Self {
        self.fixture.batch_assignments.push(FacultyBatchAssignmentDto {
            id,
            faculty_id,
            batch_id,
            assigned_at: None,
        });
        self
    }

    pub fn build(self) -> BackendFixture {
        self.fixture
    }

    pub fn backend(self) -> InMemoryBackend {
        InMemoryBackend::new(self.fixture)
    }
}

/// 标准场景:
/// - 课程 A(id=1) 教授模块 {5, 7}，课程 B(id=2) 教授模块 {8}
/// - 班次 b1 → A，b2 → B，b3 → A
/// - 教师 10 分配模块 5；教师 20 分配模块 8；教师 30 无分配
pub fn standard_fixture() -> FixtureBuilder {
    FixtureBuilder::new()
        .faculty(10, "Asha Rao")
        .faculty(20, "Vikram Sen")
        .faculty(30, "Meera Iyer")
        .course(1, "A")
        .course(2, "B")
        .course_modules(1, &[(5, "Data Structures"), (7, "Algorithms")])
        .course_modules(2, &[(8, "Networks")])
        .batch(101, "b1", "A")
        .batch(102, "b2", "B")
        .batch(103, "b3", "A")
        .assign_module(10, 5, "Data Structures")
        .assign_module(20, 8, "Networks")
}
