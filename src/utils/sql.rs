use sea_orm::sea_query::LikeExpr;

/// 转义 LIKE 模式中的通配符，让用户输入按字面匹配
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 包含匹配的 LIKE 表达式，用反斜杠作转义符
pub fn like_contains(input: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like_pattern(input))).escape('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcards_escaped() {
        assert_eq!(escape_like_pattern("Form 2"), "Form 2");
        assert_eq!(escape_like_pattern("100%_done"), "100\\%\\_done");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
    }
}
