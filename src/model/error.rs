//! 错误分类：转换错误、结构性契约违例，以及汇总的 EditorError

use thiserror::Error;

/// 树与外部嵌套对象之间转换失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// 外部值既不是对象也不是空值
    #[error("期望JSON对象，实际为{0}")]
    NotAnObject(&'static str),
    /// 两个同级节点使用了相同的非空键名
    #[error("同级存在重复的键名: {0}")]
    DuplicateKey(String),
    /// 非空键名与空键标记前缀冲突
    #[error("键名使用了保留前缀: {0}")]
    ReservedKey(String),
}

/// 结构性编辑的契约违例，由调用方负责避免
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("节点路径为空")]
    EmptyPath,
    #[error("索引越界: {index}（共 {len} 个）")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),
    #[error("转换失败: {0}")]
    Convert(#[from] ConvertError),
    #[error("编辑失败: {0}")]
    Mutation(#[from] MutationError),
    #[error("JSONPath错误: {0}")]
    JsonPath(String),
}

/// 值的类别名，用于错误信息
pub fn value_kind_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "布尔值",
        Value::Number(_) => "数字",
        Value::String(_) => "字符串",
        Value::Array(_) => "数组",
        Value::Object(_) => "对象",
    }
}
