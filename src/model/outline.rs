//! 大纲视图：把属性树按深度优先展开为扁平行，供界面按 id 渲染与定位

use serde_json::Value;

use crate::model::convert::empty_key_marker;
use crate::model::property::{EditorMode, Property, PropertyType};

/// 预览中字符串的最大字符数
pub const PREVIEW_MAX_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineRow {
    /// 节点 id（界面渲染与编辑的稳定键）
    pub id: String,
    /// 键名（可能为空）
    pub key: String,
    /// RFC 9535 JSONPath，指向节点在序列化输出中的条目
    pub path: String,
    pub kind: PropertyType,
    /// 直接子节点数量
    pub children: u32,
    /// 轻量预览
    pub preview: String,
    /// 节点深度（顶层为 0）
    pub depth: u32,
}

/// 展开整棵树
pub fn build_outline(properties: &[Property], mode: EditorMode) -> Vec<OutlineRow> {
    let mut out = Vec::new();
    walk(&mut out, properties, "$", 0, mode);
    out
}

fn walk(out: &mut Vec<OutlineRow>, properties: &[Property], parent_path: &str, depth: u32, mode: EditorMode) {
    for property in properties {
        let segment = if property.has_empty_key() {
            empty_key_marker(&property.id)
        } else {
            property.key.clone()
        };
        let path = field_path(parent_path, &segment);
        out.push(OutlineRow {
            id: property.id.clone(),
            key: property.key.clone(),
            path: path.clone(),
            kind: property.kind,
            children: property.children().len() as u32,
            preview: preview_of(property, mode),
            depth,
        });

        if let Some(children) = &property.children {
            let container = match (mode, property.kind) {
                (EditorMode::Schema, PropertyType::Array) => field_path(&field_path(&path, "items"), "properties"),
                (EditorMode::Schema, _) => field_path(&path, "properties"),
                (EditorMode::Value, _) => path,
            };
            walk(out, children, &container, depth + 1, mode);
        }
    }
}

/// JSONPath 字段含特殊字符或以数字开头时使用 bracket-notation（先转义 `\` 再转义 `'`）
pub fn field_path(parent: &str, key: &str) -> String {
    let shorthand = key.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if shorthand {
        format!("{}.{}", parent, key)
    } else {
        format!("{}['{}']", parent, key.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

fn preview_of(property: &Property, mode: EditorMode) -> String {
    match mode {
        EditorMode::Value => match &property.value {
            Some(value) => preview_value(value),
            None => "null".to_string(),
        },
        EditorMode::Schema => match (property.kind, property.item_type) {
            (PropertyType::Array, Some(item)) => format!("array<{}>", item),
            (PropertyType::Object, _) => format!("{{..}} ({} keys)", property.children().len()),
            (kind, _) if property.required => format!("{} *", kind),
            (kind, _) => kind.to_string(),
        },
    }
}

fn preview_value(v: &Value) -> String {
    match v {
        Value::String(s) => {
            let s = s.trim();
            if s.chars().count() > PREVIEW_MAX_CHARS {
                let truncated: String = s.chars().take(PREVIEW_MAX_CHARS).collect();
                format!("\"{}...\"", truncated)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(m) => format!("{{..}} ({} keys)", m.len()),
        Value::Array(a) => format!("[..] ({} items)", a.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::convert::{to_properties_from_schema, to_properties_from_value};
    use serde_json::json;

    #[test]
    fn test_schema_outline_paths() {
        let schema = json!({
            "user": {
                "type": "object",
                "properties": {
                    "name": {"type": "string", "required": true}
                }
            },
            "tags list": {
                "type": "array",
                "items": {"type": "object", "properties": {"label": {"type": "string"}}}
            }
        });
        let props = to_properties_from_schema(schema.as_object().unwrap(), "");
        let rows = build_outline(&props, EditorMode::Schema);

        let paths: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "$.user",
                "$.user.properties.name",
                "$['tags list']",
                "$['tags list'].items.properties.label",
            ]
        );
        assert_eq!(rows[0].children, 1);
        assert_eq!(rows[0].preview, "{..} (1 keys)");
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[1].preview, "string *");
        assert_eq!(rows[2].preview, "array<object>");
    }

    #[test]
    fn test_value_outline_preview_and_empty_key() {
        let value = json!({
            "short": "短文本",
            "long": "这是一个非常长的字符串，应该被截断以便在预览中显示，不应该显示完整内容",
            "n": 42,
            "nested": {"a": 1}
        });
        let mut props = to_properties_from_value(value.as_object().unwrap(), "", EditorMode::Value);
        props.push(Property::blank(EditorMode::Value));
        let rows = build_outline(&props, EditorMode::Value);

        assert_eq!(rows.len(), 5, "Value 模式不展开嵌套值");
        assert_eq!(rows[0].preview, "\"短文本\"");
        assert!(rows[1].preview.ends_with("...\""));
        assert_eq!(rows[2].preview, "42");
        assert_eq!(rows[3].preview, "{..} (1 keys)");
        assert_eq!(rows[4].path, format!("$.__empty_{}", props[4].id));
    }

    #[test]
    fn test_field_path_escaping() {
        assert_eq!(field_path("$", "normal_key"), "$.normal_key");
        assert_eq!(field_path("$", "x-api-key"), "$['x-api-key']");
        assert_eq!(field_path("$", "it's"), "$['it\\'s']");
        assert_eq!(field_path("$", ""), "$['']");
        assert_eq!(field_path("$", "2fa"), "$['2fa']");
        assert_eq!(field_path("$", "a\\b"), "$['a\\\\b']");
        assert_eq!(field_path("$", "\\'"), "$['\\\\\\'']", "反斜杠先于单引号转义");
    }
}
