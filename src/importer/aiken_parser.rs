// ==========================================
// 教务管理系统 - AIKEN 文本解析器
// ==========================================
// 格式:
//   题干（可多行）
//   A. 选项 / A) 选项
//   ...
//   ANSWER: B
// 规则:
// - ANSWER 行结束一道题；空行忽略
// - 选项之后出现普通文本 → 上一题缺少 ANSWER，新题开始
// - 只做结构切分，不做合法性判断（交给 AikenValidator）
// ==========================================

/// 原始选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAikenOption {
    pub letter: char,
    pub text: String,
    pub line: usize,
}

/// 原始答案行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAikenAnswer {
    pub value: String,
    pub line: usize,
}

/// 原始题目块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAikenBlock {
    /// 题目序号（1-based）
    pub index: usize,
    /// 起始行号（1-based）
    pub start_line: usize,
    pub question_lines: Vec<String>,
    pub options: Vec<RawAikenOption>,
    pub answer: Option<RawAikenAnswer>,
}

impl RawAikenBlock {
    fn new(index: usize, start_line: usize) -> Self {
        Self {
            index,
            start_line,
            question_lines: Vec::new(),
            options: Vec::new(),
            answer: None,
        }
    }

    pub fn question_text(&self) -> String {
        self.question_lines.join("\n")
    }
}

pub struct AikenParser;

impl AikenParser {
    /// 切分题目块
    pub fn parse(text: &str) -> Vec<RawAikenBlock> {
        let text = text.trim_start_matches('\u{feff}');
        let mut blocks = Vec::new();
        let mut current: Option<RawAikenBlock> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(value) = Self::parse_answer_line(line) {
                let mut block = current
                    .take()
                    .unwrap_or_else(|| RawAikenBlock::new(blocks.len() + 1, line_no));
                block.answer = Some(RawAikenAnswer {
                    value,
                    line: line_no,
                });
                blocks.push(block);
                continue;
            }

            if let Some((letter, option_text)) = Self::parse_option_line(line) {
                let block = current
                    .get_or_insert_with(|| RawAikenBlock::new(blocks.len() + 1, line_no));
                block.options.push(RawAikenOption {
                    letter,
                    text: option_text,
                    line: line_no,
                });
                continue;
            }

            // 普通文本：题干
            match current.take() {
                Some(mut block) if block.options.is_empty() => {
                    block.question_lines.push(line.to_string());
                    current = Some(block);
                }
                Some(block) => {
                    // 选项之后又出现题干 → 上一题未写 ANSWER
                    blocks.push(block);
                    let mut next = RawAikenBlock::new(blocks.len() + 1, line_no);
                    next.question_lines.push(line.to_string());
                    current = Some(next);
                }
                None => {
                    let mut next = RawAikenBlock::new(blocks.len() + 1, line_no);
                    next.question_lines.push(line.to_string());
                    current = Some(next);
                }
            }
        }

        if let Some(block) = current {
            blocks.push(block);
        }
        blocks
    }

    /// "A. text" / "A) text" → ('A', "text")
    pub fn parse_option_line(line: &str) -> Option<(char, String)> {
        let mut chars = line.chars();
        let letter = chars.next()?;
        if !letter.is_ascii_uppercase() {
            return None;
        }
        let marker = chars.next()?;
        if marker != '.' && marker != ')' {
            return None;
        }
        let rest = chars.as_str();
        if rest.is_empty() {
            return Some((letter, String::new()));
        }
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some((letter, rest.trim().to_string()))
    }

    /// "ANSWER: B"（大小写不敏感，冒号前允许空白）→ "B"
    pub fn parse_answer_line(line: &str) -> Option<String> {
        const KEYWORD: &str = "ANSWER";
        let head = line.get(..KEYWORD.len())?;
        if !head.eq_ignore_ascii_case(KEYWORD) {
            return None;
        }
        let rest = line[KEYWORD.len()..].trim_start();
        let value = rest.strip_prefix(':')?;
        Some(value.trim().to_string())
    }
}
