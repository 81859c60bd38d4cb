//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod answer_keys;
pub mod assignment_students;
pub mod assignments;
pub mod generated_questions;
pub mod students;
pub mod users;
pub mod worksheets;

/// JSON 文本列解析为字符串列表，解析失败时返回空列表
pub(crate) fn parse_string_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// 字符串列表序列化为 JSON 文本列
pub(crate) fn encode_string_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_list_column() {
        let items = vec!["Algebra".to_string(), "Fractions".to_string()];
        let encoded = encode_string_list(&items);
        assert_eq!(encoded, r#"["Algebra","Fractions"]"#);
        assert_eq!(parse_string_list(&encoded), items);
    }

    #[test]
    fn test_corrupt_list_column_is_empty() {
        assert!(parse_string_list("not json").is_empty());
        assert!(parse_string_list("").is_empty());
    }
}
