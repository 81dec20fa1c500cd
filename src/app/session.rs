// ==========================================
// 教务管理系统 - 教师班次分配表单会话
// ==========================================
// 职责: 持有一次表单生命周期内的状态
// - 基础数据快照、课程模块缓存、草稿请求、可选班次
// - 代次计数: 旧的解析结果不能覆盖新的
// 生命周期: open → select_faculty / select_batch → submit | close
// ==========================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::{ApiError, ApiResult, BatchAssignmentApi};
use crate::backend::{AcademicGateway, CatalogSnapshot};
use crate::config::CampusConfigReader;
use crate::domain::{AssignFacultyRequest, Batch, FacultyBatchAssignment};
use crate::engine::{
    AssignmentEventPublisher, EligibilityCore, EligibilityCriteria, EligibilityOutcome,
    EligibilityResolver,
};
use crate::i18n::{t, t_with_args};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 一次解析的凭据；代次落后于最新代次的结果会被丢弃
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
    faculty_id: i64,
}

impl ResolutionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn faculty_id(&self) -> i64 {
        self.faculty_id
    }
}

#[derive(Default)]
struct FormState {
    open: bool,
    snapshot: Option<Arc<CatalogSnapshot>>,
    draft: AssignFacultyRequest,
    eligible: Vec<Batch>,
    last_outcome: Option<EligibilityOutcome>,
}

pub struct AssignmentFormSession<C>
where
    C: CampusConfigReader,
{
    session_id: String,
    gateway: AcademicGateway,
    resolver: EligibilityResolver<C>,
    assignment_api: BatchAssignmentApi,
    generation: AtomicU64,
    state: Mutex<FormState>,
}

impl<C> AssignmentFormSession<C>
where
    C: CampusConfigReader,
{
    pub fn new(
        gateway: AcademicGateway,
        config: Arc<C>,
        publisher: Arc<dyn AssignmentEventPublisher>,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            resolver: EligibilityResolver::new(gateway.clone(), config),
            assignment_api: BatchAssignmentApi::new(gateway.clone(), publisher),
            gateway,
            generation: AtomicU64::new(0),
            state: Mutex::new(FormState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_open(&self) -> bool {
        self.state().open
    }

    /// 表单已打开且基础数据已加载
    pub fn is_ready(&self) -> bool {
        let state = self.state();
        state.open && state.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        self.state().snapshot.clone()
    }

    pub fn draft(&self) -> AssignFacultyRequest {
        self.state().draft
    }

    pub fn eligible_batches(&self) -> Vec<Batch> {
        self.state().eligible.clone()
    }

    pub fn last_outcome(&self) -> Option<EligibilityOutcome> {
        self.state().last_outcome.clone()
    }

    pub fn resolver(&self) -> &EligibilityResolver<C> {
        &self.resolver
    }

    fn ready_snapshot(&self) -> ApiResult<Arc<CatalogSnapshot>> {
        let state = self.state();
        match (&state.snapshot, state.open) {
            (Some(snapshot), true) => Ok(snapshot.clone()),
            _ => Err(ApiError::NotReady(t("assignment.not_ready"))),
        }
    }

    // ==========================================
    // 生命周期
    // ==========================================

    /// 打开表单并加载基础数据
    ///
    /// 加载失败时表单保持打开但未就绪，提交被阻断
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn open(&self) -> ApiResult<()> {
        {
            let mut state = self.state();
            // 重新打开前发起的解析全部失效
            self.generation.fetch_add(1, Ordering::SeqCst);
            state.open = true;
            state.draft.reset();
            state.eligible.clear();
            state.last_outcome = None;
        }
        self.load_catalogs().await
    }

    /// 重新加载基础数据，并为当前教师重新解析
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn reload_catalogs(&self) -> ApiResult<Option<EligibilityOutcome>> {
        self.load_catalogs().await?;
        let faculty_id = self.state().draft.faculty_id;
        if faculty_id > 0 {
            Ok(Some(self.select_faculty(faculty_id).await?))
        } else {
            Ok(None)
        }
    }

    async fn load_catalogs(&self) -> ApiResult<()> {
        match self.gateway.load_catalogs().await {
            Ok(snapshot) => {
                self.state().snapshot = Some(Arc::new(snapshot));
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "基础数据加载失败");
                self.state().snapshot = None;
                Err(ApiError::catalog_load(&e))
            }
        }
    }

    /// 关闭表单: 清空缓存、可选班次与草稿
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn close(&self) {
        {
            let mut state = self.state();
            // 使进行中的解析全部失效
            self.generation.fetch_add(1, Ordering::SeqCst);
            *state = FormState::default();
        }
        self.resolver.clear_cache();
        self.assignment_api.publish_closed(&self.session_id);
        info!("表单已关闭");
    }

    // ==========================================
    // 教师选择与资格解析
    // ==========================================

    /// 选择教师并解析可选班次
    ///
    /// faculty_id = 0 表示清空选择
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn select_faculty(&self, faculty_id: i64) -> ApiResult<EligibilityOutcome> {
        let ticket = self.begin_resolution(faculty_id)?;
        match self.resolve_ticket(&ticket).await {
            Ok(outcome) => {
                self.apply_resolution(&ticket, outcome.clone());
                Ok(outcome)
            }
            Err(e) => {
                self.apply_resolution(&ticket, EligibilityOutcome::empty(EligibilityCriteria::empty()));
                Err(e)
            }
        }
    }

    /// 开始一次解析: 记录教师选择并推进代次
    pub fn begin_resolution(&self, faculty_id: i64) -> ApiResult<ResolutionTicket> {
        if faculty_id < 0 {
            return Err(ApiError::InvalidInput(t("assignment.faculty_required")));
        }
        let snapshot = self.ready_snapshot()?;
        if faculty_id > 0 && snapshot.find_faculty(faculty_id).is_none() {
            warn!(faculty_id, "教师不在有效教师目录中");
            return Err(ApiError::InvalidInput(t_with_args(
                "assignment.faculty_unknown",
                &[("faculty", &faculty_id.to_string())],
            )));
        }

        let mut state = self.state();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        state.draft.faculty_id = faculty_id;
        debug!(generation, faculty_id, "开始资格解析");
        Ok(ResolutionTicket {
            generation,
            faculty_id,
        })
    }

    /// 执行解析（不修改表单状态）
    pub async fn resolve_ticket(&self, ticket: &ResolutionTicket) -> ApiResult<EligibilityOutcome> {
        let snapshot = self.ready_snapshot()?;
        if ticket.faculty_id == 0 {
            return Ok(EligibilityOutcome::empty(EligibilityCriteria::empty()));
        }

        let assignments = self
            .gateway
            .active_module_assignments(ticket.faculty_id)
            .await
            .map_err(|e| {
                warn!(faculty_id = ticket.faculty_id, error = %e, "教师模块分配查询失败");
                ApiError::Backend(e.raw_message())
            })?;

        Ok(self
            .resolver
            .resolve(
                ticket.faculty_id,
                &assignments,
                &snapshot.batches,
                &snapshot.course_index,
            )
            .await)
    }

    /// 应用解析结果
    ///
    /// # 返回
    /// - true: 已应用
    /// - false: 凭据已过期，结果被丢弃
    pub fn apply_resolution(&self, ticket: &ResolutionTicket, outcome: EligibilityOutcome) -> bool {
        let mut state = self.state();
        let latest = self.generation.load(Ordering::SeqCst);
        if ticket.generation != latest {
            debug!(
                generation = ticket.generation,
                latest,
                faculty_id = ticket.faculty_id,
                "丢弃过期解析结果"
            );
            return false;
        }

        let selected = EligibilityCore::retain_selection(state.draft.batch_id, &outcome.eligible);
        if selected != state.draft.batch_id {
            debug!(batch_id = state.draft.batch_id, "已选班次不再可选，清空");
        }
        state.draft.batch_id = selected;
        state.eligible = outcome.eligible.clone();
        state.last_outcome = Some(outcome);
        true
    }

    // ==========================================
    // 班次选择与提交
    // ==========================================

    /// 选择班次（只接受可选班次；0 表示清空）
    pub fn select_batch(&self, batch_id: i64) -> ApiResult<()> {
        self.ready_snapshot()?;
        let mut state = self.state();
        if batch_id != 0 && !state.eligible.iter().any(|b| b.id == batch_id) {
            return Err(ApiError::InvalidInput(t("assignment.not_eligible")));
        }
        state.draft.batch_id = batch_id;
        Ok(())
    }

    /// 提交分配；成功后关闭表单
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn submit(&self) -> ApiResult<FacultyBatchAssignment> {
        self.ready_snapshot()?;
        let draft = self.draft();
        let assignment = self.assignment_api.submit(&self.session_id, &draft).await?;
        self.close();
        Ok(assignment)
    }
}
