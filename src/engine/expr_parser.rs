// ==========================================
// 板卡选型优化系统 - 逻辑表达式解析器
// ==========================================
// 职责: 将逻辑表达式文本解析为析取范式 (DNF)
// 文法: 原子比较式，AND (and/∧) 优先于 OR (or/∨)，括号仅作结构分组
// 红线: 解析永不 panic，无法解析的原子条件记诊断后丢弃
// ==========================================

use tracing::warn;

use crate::domain::types::{Clause, Dnf};
use crate::engine::cond_parser::ConditionParser;

/// 深度 0 扫描产生的记号
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// 原子条件文本
    Atom(String),
    /// 括号分组内容（外层括号已剥除）
    Group(String),
    /// 合取符 and/∧
    And,
    /// 析取符 or/∨
    Or,
}

// ==========================================
// ExpressionParser - 纯函数解析器
// ==========================================
pub struct ExpressionParser;

impl ExpressionParser {
    /// 解析逻辑表达式为 DNF
    ///
    /// # 规则
    /// 1. 剥除整体包裹的外层括号
    /// 2. 深度 0 按 or/∨ 切分合取项，项内按 and/∧ 切分原子条件
    /// 3. 合取型括号分组递归展平进所在合取项；含析取的分组整体保留为单个原子
    ///    （供隐式 ∈ 条件使用，文法不支持合取组内嵌套 OR）
    /// 4. 无法解析的原子条件记 warn 后丢弃，不中断整个需求
    pub fn parse(text: &str) -> Dnf {
        let mut dnf = Vec::new();
        for atoms in Self::split_dnf(text) {
            let mut clause: Clause = Vec::new();
            for atom in atoms {
                match ConditionParser::parse(&atom) {
                    Ok(cond) => clause.push(cond),
                    Err(e) => {
                        warn!("条件解析失败，已跳过: '{}' ({})", atom, e);
                    }
                }
            }
            if !clause.is_empty() {
                dnf.push(clause);
            }
        }
        dnf
    }

    /// 将表达式切分为原子条件文本的二维列表（外层 OR，内层 AND）
    ///
    /// # 边界情况
    /// - 空白输入 → 空列表
    /// - 未出现析取符 → 单个合取项
    /// - 切不出任何条件 → 原始文本整体保留为单条件（兜底，交由条件解析器诊断）
    pub fn split_dnf(text: &str) -> Vec<Vec<String>> {
        let normalized = text.replace(['\n', '\t'], " ");
        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let stripped = Self::strip_outer_parens(trimmed);
        let tokens = Self::tokenize(stripped);

        let mut parts: Vec<Vec<String>> = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for token in tokens {
            match token {
                Token::Atom(atom) => current.push(atom),
                Token::Group(content) => Self::flatten_group(&content, &mut current),
                Token::And => {}
                Token::Or => {
                    if !current.is_empty() {
                        parts.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            parts.push(current);
        }

        // 兜底: 切不出任何条件时整体保留
        if parts.is_empty() {
            parts.push(vec![stripped.to_string()]);
        }

        parts
    }

    /// 判断文本在深度 0 是否含析取符
    pub fn has_top_level_disjunction(text: &str) -> bool {
        Self::tokenize(text).iter().any(|t| *t == Token::Or)
    }

    /// 剥除整体包裹的外层括号（逐层，带深度校验）
    fn strip_outer_parens(text: &str) -> &str {
        let mut current = text.trim();
        while current.starts_with('(') && current.ends_with(')') {
            let inner = &current[1..current.len() - 1];
            let mut depth = 0i32;
            let mut is_outer = true;
            for c in inner.chars() {
                match c {
                    '(' => depth += 1,
                    ')' => {
                        depth -= 1;
                        if depth < 0 {
                            is_outer = false;
                            break;
                        }
                    }
                    _ => {}
                }
            }
            if is_outer && depth == 0 {
                current = inner.trim();
            } else {
                break;
            }
        }
        current
    }

    /// 深度 0 扫描，产生原子/分组/操作符记号
    ///
    /// ASCII 关键字要求两侧空格（" and " / " or "，大小写不敏感），
    /// Unicode 操作符 (∧/∨) 无此要求，两种写法可混用。
    fn tokenize(text: &str) -> Vec<Token> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut buf = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c == '(' {
                // 读取配平的括号分组
                let mut depth = 0i32;
                let mut j = i;
                while j < chars.len() {
                    match chars[j] {
                        '(' => depth += 1,
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    j += 1;
                }
                if depth != 0 {
                    // 括号不配平，剩余部分按普通文本处理
                    buf.push(c);
                    i += 1;
                    continue;
                }
                Self::flush(&mut buf, &mut tokens);
                let content: String = chars[i + 1..j].iter().collect();
                let content = content.trim().to_string();
                if !content.is_empty() {
                    tokens.push(Token::Group(content));
                }
                i = j + 1;
            } else if c == '∨' {
                Self::flush(&mut buf, &mut tokens);
                tokens.push(Token::Or);
                i += 1;
            } else if c == '∧' {
                Self::flush(&mut buf, &mut tokens);
                tokens.push(Token::And);
                i += 1;
            } else if c == ' ' && Self::keyword_at(&chars, i + 1, "and") {
                Self::flush(&mut buf, &mut tokens);
                tokens.push(Token::And);
                i += 5; // " and "
            } else if c == ' ' && Self::keyword_at(&chars, i + 1, "or") {
                Self::flush(&mut buf, &mut tokens);
                tokens.push(Token::Or);
                i += 4; // " or "
            } else {
                buf.push(c);
                i += 1;
            }
        }
        Self::flush(&mut buf, &mut tokens);
        tokens
    }

    /// 检查 chars[pos..] 是否为关键字后接空格（大小写不敏感）
    fn keyword_at(chars: &[char], pos: usize, keyword: &str) -> bool {
        let kw: Vec<char> = keyword.chars().collect();
        if pos + kw.len() >= chars.len() + 1 {
            return false;
        }
        for (k, kc) in kw.iter().enumerate() {
            match chars.get(pos + k) {
                Some(c) if c.to_ascii_lowercase() == *kc => {}
                _ => return false,
            }
        }
        chars.get(pos + kw.len()) == Some(&' ')
    }

    fn flush(buf: &mut String, tokens: &mut Vec<Token>) {
        let atom = buf.trim().to_string();
        if !atom.is_empty() {
            tokens.push(Token::Atom(atom));
        }
        buf.clear();
    }

    /// 展平括号分组
    ///
    /// 纯合取内容递归切分后并入所在合取项；
    /// 含析取的分组整体作为单个原子保留（隐式 ∈ 的来源）。
    fn flatten_group(content: &str, clause: &mut Vec<String>) {
        if Self::has_top_level_disjunction(content) {
            clause.push(content.to_string());
            return;
        }
        for token in Self::tokenize(content) {
            match token {
                Token::Atom(atom) => clause.push(atom),
                Token::Group(inner) => Self::flatten_group(&inner, clause),
                Token::And | Token::Or => {}
            }
        }
    }
}
