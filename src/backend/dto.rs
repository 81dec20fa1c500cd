// ==========================================
// 教务管理系统 - 后端报文结构
// ==========================================
// 职责: 描述后端 JSON 形态，并在此一次性归一化为领域类型
// 说明:
// - 课程模块: {module: id, module_name} 或旧版 {subject: id, subject_name}
// - 教师模块分配: {module: {id, name}} 或旧版 {subject: {id, name}}
// ==========================================

use crate::backend::error::{BackendError, BackendResult};
use crate::domain::{
    AssignFacultyRequest, Batch, BatchStatus, Course, FacultyBatchAssignment,
    FacultyModuleAssignment, FacultyProfile, ModuleRef,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_true() -> bool {
    true
}

// ==========================================
// 教师档案
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyUserDto {
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyProfileDto {
    pub id: i64,
    #[serde(default)]
    pub employee_code: String,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub user: Option<FacultyUserDto>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<FacultyProfileDto> for FacultyProfile {
    fn from(dto: FacultyProfileDto) -> Self {
        let full_name = dto
            .user
            .and_then(|u| u.full_name)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| dto.employee_code.clone());
        FacultyProfile {
            id: dto.id,
            employee_code: dto.employee_code,
            designation: dto.designation,
            full_name,
            is_active: dto.is_active,
        }
    }
}

// ==========================================
// 班次
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDto {
    pub id: i64,
    pub code: String,
    pub course_code: String,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub centre_name: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    pub status: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl TryFrom<BatchDto> for Batch {
    type Error = BackendError;

    fn try_from(dto: BatchDto) -> BackendResult<Self> {
        let status = BatchStatus::from_str(&dto.status).ok_or_else(|| {
            BackendError::Decode(format!("batch {} 状态未知: {}", dto.id, dto.status))
        })?;
        Ok(Batch {
            id: dto.id,
            code: dto.code,
            course_code: dto.course_code,
            course_name: dto.course_name,
            centre_name: dto.centre_name,
            mode: dto.mode,
            status,
            is_active: dto.is_active,
            start_date: dto.start_date,
            end_date: dto.end_date,
        })
    }
}

// ==========================================
// 课程 / 课程模块
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDto {
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl From<CourseDto> for Course {
    fn from(dto: CourseDto) -> Self {
        Course {
            id: dto.id,
            code: dto.code,
            name: dto.name,
        }
    }
}

/// 课程模块条目（两种形态）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CourseModuleDto {
    Module {
        module: i64,
        #[serde(default)]
        module_name: Option<String>,
    },
    Subject {
        subject: i64,
        #[serde(default)]
        subject_name: Option<String>,
    },
}

impl CourseModuleDto {
    pub fn module(id: i64, name: &str) -> Self {
        CourseModuleDto::Module {
            module: id,
            module_name: Some(name.to_string()),
        }
    }

    pub fn legacy_subject(id: i64, name: &str) -> Self {
        CourseModuleDto::Subject {
            subject: id,
            subject_name: Some(name.to_string()),
        }
    }
}

impl From<CourseModuleDto> for ModuleRef {
    fn from(dto: CourseModuleDto) -> Self {
        match dto {
            CourseModuleDto::Module {
                module,
                module_name,
            } => ModuleRef::new(Some(module), module_name),
            CourseModuleDto::Subject {
                subject,
                subject_name,
            } => ModuleRef::new(Some(subject), subject_name),
        }
    }
}

// ==========================================
// 教师模块分配
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleBodyDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// 分配目标（两种形态）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssignmentTargetDto {
    Module { module: ModuleBodyDto },
    Subject { subject: ModuleBodyDto },
}

impl From<AssignmentTargetDto> for ModuleRef {
    fn from(dto: AssignmentTargetDto) -> Self {
        let body = match dto {
            AssignmentTargetDto::Module { module } => module,
            AssignmentTargetDto::Subject { subject } => subject,
        };
        ModuleRef::new(body.id, body.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyModuleAssignmentDto {
    #[serde(flatten)]
    pub target: AssignmentTargetDto,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub assigned_at: Option<DateTime<Utc>>,
}

impl FacultyModuleAssignmentDto {
    pub fn module(id: Option<i64>, name: Option<&str>) -> Self {
        Self {
            target: AssignmentTargetDto::Module {
                module: ModuleBodyDto {
                    id,
                    name: name.map(str::to_string),
                },
            },
            is_active: true,
            assigned_at: None,
        }
    }

    pub fn legacy_subject(id: Option<i64>, name: Option<&str>) -> Self {
        Self {
            target: AssignmentTargetDto::Subject {
                subject: ModuleBodyDto {
                    id,
                    name: name.map(str::to_string),
                },
            },
            is_active: true,
            assigned_at: None,
        }
    }

    pub fn into_domain(self, faculty_id: i64) -> FacultyModuleAssignment {
        FacultyModuleAssignment {
            faculty_id,
            module: self.target.into(),
            is_active: self.is_active,
            assigned_at: self.assigned_at,
        }
    }
}

// ==========================================
// 教师-班次分配
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyBatchAssignmentDto {
    pub id: i64,
    #[serde(alias = "faculty")]
    pub faculty_id: i64,
    #[serde(alias = "batch")]
    pub batch_id: i64,
    #[serde(default)]
    pub assigned_at: Option<DateTime<Utc>>,
}

impl FacultyBatchAssignmentDto {
    pub fn matches(&self, request: &AssignFacultyRequest) -> bool {
        self.faculty_id == request.faculty_id && self.batch_id == request.batch_id
    }
}

impl From<FacultyBatchAssignmentDto> for FacultyBatchAssignment {
    fn from(dto: FacultyBatchAssignmentDto) -> Self {
        FacultyBatchAssignment {
            id: dto.id,
            faculty_id: dto.faculty_id,
            batch_id: dto.batch_id,
            assigned_at: dto.assigned_at,
        }
    }
}

// ==========================================
// 离线数据集（JSON fixture）
// ==========================================

/// 一份完整的后端数据快照，用于内存后端与命令行演示
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendFixture {
    #[serde(default)]
    pub faculty: Vec<FacultyProfileDto>,
    #[serde(default)]
    pub batches: Vec<BatchDto>,
    #[serde(default)]
    pub courses: Vec<CourseDto>,
    /// course_id -> 课程模块
    #[serde(default)]
    pub course_modules: HashMap<i64, Vec<CourseModuleDto>>,
    /// faculty_id -> 模块分配（含已停用）
    #[serde(default)]
    pub module_assignments: HashMap<i64, Vec<FacultyModuleAssignmentDto>>,
    #[serde(default)]
    pub batch_assignments: Vec<FacultyBatchAssignmentDto>,
}

impl BackendFixture {
    pub fn from_json(json: &str) -> BackendResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_module_shapes_normalize_to_same_ref() {
        let modern: CourseModuleDto =
            serde_json::from_str(r#"{"module": 5, "module_name": "Data Structures"}"#).unwrap();
        let legacy: CourseModuleDto =
            serde_json::from_str(r#"{"subject": 5, "subject_name": "Data Structures"}"#).unwrap();

        assert!(matches!(legacy, CourseModuleDto::Subject { .. }));
        assert_eq!(ModuleRef::from(modern), ModuleRef::from(legacy));
    }

    #[test]
    fn test_assignment_shapes_and_defaults() {
        let json = r#"[
            {"module": {"id": 5, "name": "DBMS"}, "assigned_at": "2024-07-01T09:00:00Z"},
            {"subject": {"name": "Data Structures"}, "is_active": false}
        ]"#;
        let dtos: Vec<FacultyModuleAssignmentDto> = serde_json::from_str(json).unwrap();
        let assignments: Vec<_> = dtos.into_iter().map(|d| d.into_domain(9)).collect();

        assert_eq!(assignments[0].module.id, Some(5));
        assert!(assignments[0].is_active);
        assert!(assignments[0].assigned_at.is_some());

        assert_eq!(assignments[1].module.id, None);
        assert_eq!(assignments[1].module.name.as_deref(), Some("Data Structures"));
        assert!(!assignments[1].is_active);
        assert_eq!(assignments[1].faculty_id, 9);
    }

    #[test]
    fn test_batch_unknown_status_is_decode_error() {
        let dto: BatchDto = serde_json::from_str(
            r#"{"id": 1, "code": "B1", "course_code": "DCA", "status": "PAUSED"}"#,
        )
        .unwrap();
        let err = Batch::try_from(dto).unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn test_faculty_name_falls_back_to_employee_code() {
        let dto: FacultyProfileDto =
            serde_json::from_str(r#"{"id": 3, "employee_code": "EMP003", "user": {"full_name": " "}}"#)
                .unwrap();
        let profile = FacultyProfile::from(dto);
        assert_eq!(profile.full_name, "EMP003");
        assert!(profile.is_active);
    }

    #[test]
    fn test_fixture_integer_keys() {
        let fixture = BackendFixture::from_json(
            r#"{"course_modules": {"10": [{"module": 1, "module_name": "C"}]}}"#,
        )
        .unwrap();
        assert_eq!(fixture.course_modules.get(&10).map(Vec::len), Some(1));
    }
}
