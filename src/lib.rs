// ==========================================
// 教务管理系统 - 核心库
// ==========================================
// 职责: 教师-班次资格解析、班次分配提交、AIKEN 题库导入
// 定位: 后端为外部协作方，本库只做内存关联、校验与编排
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 后端边界层 - 外部接口 trait、报文结构与归一化
pub mod backend;

// 引擎层 - 资格解析规则
pub mod engine;

// 导入层 - AIKEN 题库
pub mod importer;

// 数据仓储层 - 本地题库存储
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 表单会话与共享状态
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    AssignFacultyRequest, Batch, BatchStatus, Course, CourseModuleSet, FacultyBatchAssignment,
    FacultyModuleAssignment, FacultyProfile, ModuleRef,
};

pub use engine::{
    CourseModuleCache, EligibilityCore, EligibilityCriteria, EligibilityOutcome,
    EligibilityResolver, FailedCourse,
};

pub use api::{ApiError, ApiResult, BatchAssignmentApi, QuestionBankApi};

pub use app::{AppState, AssignmentFormSession, ResolutionTicket};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "教务管理系统";
