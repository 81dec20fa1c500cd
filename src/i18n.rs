// ==========================================
// 教务管理系统 - 界面文案
// ==========================================
// 文案文件: locales/zh-CN.yml（默认）、locales/en.yml
// 语言来源: CAMPUS_ADMIN_LOCALE 环境变量，未识别的取值回落到 zh-CN
// rust_i18n::i18n! 宏在 lib.rs 中初始化
// ==========================================

pub const DEFAULT_LOCALE: &str = "zh-CN";
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];
pub const LOCALE_ENV: &str = "CAMPUS_ADMIN_LOCALE";

/// 将外部语言标记归一为已支持的语言
///
/// 接受 "en"、"en-US"、"en_GB"、"zh"、"zh_CN" 等写法（大小写不敏感）
pub fn normalize_locale(raw: &str) -> Option<&'static str> {
    let lang = raw
        .trim()
        .split(['-', '_', '.'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match lang.as_str() {
        "zh" => Some("zh-CN"),
        "en" => Some("en"),
        _ => None,
    }
}

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 切换语言；返回实际生效的语言
pub fn set_locale(raw: &str) -> &'static str {
    let locale = normalize_locale(raw).unwrap_or(DEFAULT_LOCALE);
    rust_i18n::set_locale(locale);
    locale
}

/// 按环境变量设置语言（未设置时使用默认语言）
pub fn init_from_env() -> &'static str {
    match std::env::var(LOCALE_ENV) {
        Ok(raw) => {
            let locale = set_locale(&raw);
            if normalize_locale(&raw).is_none() {
                tracing::warn!(requested = %raw, fallback = locale, "不支持的语言设置");
            }
            locale
        }
        Err(_) => set_locale(DEFAULT_LOCALE),
    }
}

pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 带占位符的文案，占位符写法为 %{name}
///
/// ```no_run
/// use campus_admin::i18n::t_with_args;
/// let msg = t_with_args("import.bank_not_found", &[("bank", "3")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter()
        .fold(rust_i18n::t!(key).to_string(), |text, (name, value)| {
            text.replace(&format!("%{{{}}}", name), value)
        })
}
