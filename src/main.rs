// ==========================================
// 教务管理系统 - 命令行入口
// ==========================================
// 用法:
//   campus-admin eligible <fixture.json> <faculty_id>
//   campus-admin assign <fixture.json> <faculty_id> <batch_id>
//   campus-admin create-bank <db_path> <name>
//   campus-admin import-aiken <db_path> <bank_id> <file> [report.csv]
// 环境变量:
//   CAMPUS_ADMIN_DB_PATH  配置库路径（eligible / assign）
//   CAMPUS_ADMIN_LOCALE   zh-CN（默认）| en
//   CAMPUS_ADMIN_LOG_JSON 设置后输出 JSON 日志
// ==========================================

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use campus_admin::app::{get_default_db_path, AppState};
use campus_admin::backend::InMemoryBackend;
use campus_admin::{i18n, logging};

const USAGE: &str = "用法:
  campus-admin eligible <fixture.json> <faculty_id>
  campus-admin assign <fixture.json> <faculty_id> <batch_id>
  campus-admin create-bank <db_path> <name>
  campus-admin import-aiken <db_path> <bank_id> <file> [report.csv]";

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var_os("CAMPUS_ADMIN_LOG_JSON").is_some() {
        logging::init_json();
    } else {
        logging::init();
    }
    i18n::init_from_env();

    tracing::info!("{} v{}", campus_admin::APP_NAME, campus_admin::VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("eligible") if args.len() == 3 => {
            let faculty_id = parse_id(&args[2], "faculty_id")?;
            run_eligible(&args[1], faculty_id).await
        }
        Some("assign") if args.len() == 4 => {
            let faculty_id = parse_id(&args[2], "faculty_id")?;
            let batch_id = parse_id(&args[3], "batch_id")?;
            run_assign(&args[1], faculty_id, batch_id).await
        }
        Some("create-bank") if args.len() == 3 => run_create_bank(&args[1], &args[2]),
        Some("import-aiken") if args.len() == 4 || args.len() == 5 => {
            let bank_id = parse_id(&args[2], "bank_id")?;
            run_import(&args[1], bank_id, &args[3], args.get(4).map(String::as_str)).await
        }
        _ => bail!("{}", USAGE),
    }
}

fn parse_id(value: &str, name: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .with_context(|| format!("{} 必须是整数: {}", name, value))
}

fn app_state(fixture_path: &str) -> Result<AppState> {
    let json = std::fs::read_to_string(fixture_path)
        .with_context(|| format!("无法读取数据文件: {}", fixture_path))?;
    let backend = InMemoryBackend::from_json(&json)?;
    AppState::new(get_default_db_path(), Arc::new(backend)).map_err(anyhow::Error::msg)
}

async fn run_eligible(fixture_path: &str, faculty_id: i64) -> Result<()> {
    let state = app_state(fixture_path)?;
    let session = state.new_assignment_session();
    session.open().await?;

    let outcome = session.select_faculty(faculty_id).await?;
    println!("匹配依据: {}", outcome.basis());
    for batch in &outcome.eligible {
        println!(
            "{}\t{}\t{}\t{}",
            batch.id,
            batch.code,
            batch.course_code,
            batch.centre_name.as_deref().unwrap_or("-")
        );
    }
    for failed in &outcome.failed_courses {
        eprintln!(
            "课程 {} 模块查询失败（班次 {:?} 已排除）: {}",
            failed.course_id, failed.batch_ids, failed.reason
        );
    }
    if !outcome.unmapped_batch_ids.is_empty() {
        eprintln!("课程编码无法识别的班次: {:?}", outcome.unmapped_batch_ids);
    }

    session.close();
    Ok(())
}

async fn run_assign(fixture_path: &str, faculty_id: i64, batch_id: i64) -> Result<()> {
    let state = app_state(fixture_path)?;
    let session = state.new_assignment_session();
    session.open().await?;
    session.select_faculty(faculty_id).await?;
    session.select_batch(batch_id)?;

    // 提交成功后表单关闭，先取出展示用的名称
    let (faculty_label, batch_label) = match session.snapshot() {
        Some(snapshot) => (
            snapshot
                .find_faculty(faculty_id)
                .map(|f| f.display_label())
                .unwrap_or_else(|| faculty_id.to_string()),
            snapshot
                .find_batch(batch_id)
                .map(|b| b.code.clone())
                .unwrap_or_else(|| batch_id.to_string()),
        ),
        None => (faculty_id.to_string(), batch_id.to_string()),
    };

    let assignment = session.submit().await?;
    tracing::info!(assignment_id = assignment.id, "分配已提交");
    println!(
        "{}",
        i18n::t_with_args(
            "assignment.success",
            &[("faculty", &faculty_label), ("batch", &batch_label)],
        )
    );
    Ok(())
}

fn run_create_bank(db_path: &str, name: &str) -> Result<()> {
    let state = AppState::new(db_path.to_string(), Arc::new(InMemoryBackend::default()))
        .map_err(anyhow::Error::msg)?;
    let bank_id = state.question_bank_api.create_bank(name)?;
    println!("{}", bank_id);
    Ok(())
}

async fn run_import(
    db_path: &str,
    bank_id: i64,
    file: &str,
    report_path: Option<&str>,
) -> Result<()> {
    let state = AppState::new(db_path.to_string(), Arc::new(InMemoryBackend::default()))
        .map_err(anyhow::Error::msg)?;
    let report = state
        .question_bank_api
        .import_aiken_file(Path::new(file), bank_id)
        .await?;

    println!(
        "导入批次 {}: 共 {} 题，成功 {}，失败 {}",
        report.batch.import_batch_id,
        report.batch.total_questions,
        report.batch.imported_questions,
        report.batch.failed_questions
    );
    for v in &report.violations {
        eprintln!(
            "[{}] 第 {} 题 (行 {}) {}: {}",
            v.level, v.question_index, v.line_number, v.field, v.message
        );
    }
    if let Some(path) = report_path {
        state
            .question_bank_api
            .write_report_csv(&report, Path::new(path))?;
    }
    Ok(())
}
