//! JSONPath 子树提取

use jsonpath_rust::{JsonPath, query::queryable::Queryable};
use serde_json::Value;

use crate::model::error::EditorError;

/// 按 JSONPath 提取第一个匹配节点的 pretty 字符串
pub fn extract_subtree_pretty(dom: &Value, json_path: &str) -> Result<String, EditorError> {
    let hits: Vec<&Value> = dom
        .query(json_path)
        .map_err(|e| EditorError::JsonPath(e.to_string()))?;
    let first = hits
        .into_iter()
        .next()
        .ok_or_else(|| EditorError::JsonPath(format!("未匹配到任何节点: {}", json_path)))?;
    Ok(serde_json::to_string_pretty(first)?)
}
