//! 属性树节点：同一棵树既可描述 Schema（形状），也可描述 Value（具体值）

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::id::generate_id;

/// 编辑模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// 树描述数据的形状（类型、描述、是否必填）
    #[default]
    Schema,
    /// 树描述具体数据
    Value,
}

impl EditorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EditorMode::Schema => "schema",
            EditorMode::Value => "value",
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "schema" => Ok(EditorMode::Schema),
            "value" => Ok(EditorMode::Value),
            other => Err(format!("未知的编辑模式: {}", other)),
        }
    }
}

/// 节点类型（固定集合，不做额外的类型转换）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    #[default]
    String,
    Number,
    Boolean,
    Object,
    Array,
    ImageBase64,
    ImageUrl,
    ImageBlob,
}

impl PropertyType {
    pub const ALL: [PropertyType; 8] = [
        PropertyType::String,
        PropertyType::Number,
        PropertyType::Boolean,
        PropertyType::Object,
        PropertyType::Array,
        PropertyType::ImageBase64,
        PropertyType::ImageUrl,
        PropertyType::ImageBlob,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::Object => "object",
            PropertyType::Array => "array",
            PropertyType::ImageBase64 => "image-base64",
            PropertyType::ImageUrl => "image-url",
            PropertyType::ImageBlob => "image-blob",
        }
    }

    /// 按 Schema 条目声明的 `type` 选择节点类型：`integer` 并入 `number`，未知或缺失回落为 `string`
    pub fn from_declared(declared: Option<&str>) -> Self {
        match declared {
            Some("number") | Some("integer") => PropertyType::Number,
            Some("boolean") => PropertyType::Boolean,
            Some("object") => PropertyType::Object,
            Some("array") => PropertyType::Array,
            Some("image-base64") => PropertyType::ImageBase64,
            Some("image-url") => PropertyType::ImageUrl,
            Some("image-blob") => PropertyType::ImageBlob,
            _ => PropertyType::String,
        }
    }

    /// Value 模式下切换到该类型时写入的零值
    pub fn zero_value(self) -> Value {
        match self {
            PropertyType::Number => Value::from(0),
            PropertyType::Boolean => Value::Bool(false),
            PropertyType::Object => Value::Object(Map::new()),
            _ => Value::String(String::new()),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 属性树节点
///
/// `children` 仅在 `kind == Object`，或 `kind == Array` 且 `item_type == Object` 时存在；
/// `item_type` / `item_description` 仅在 `kind == Array` 时存在。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// 稳定标识，删除后不复用
    pub id: String,
    /// 在父容器中的键名，编辑过程中允许为空
    pub key: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    /// 仅 Schema 模式有意义
    pub description: String,
    /// 仅 Schema 模式有意义，不向子节点继承
    pub required: bool,
    /// 仅 Value 模式有意义
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Property>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<PropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_description: Option<String>,
}

impl Property {
    /// 新建一个空白的 `string` 节点（新 id、空键名）
    pub fn blank(mode: EditorMode) -> Self {
        Self {
            id: generate_id(),
            value: match mode {
                EditorMode::Value => Some(Value::String(String::new())),
                EditorMode::Schema => None,
            },
            ..Self::default()
        }
    }

    /// 按类型建立节点的附属字段，使其满足 children / item 字段的存在条件
    pub(crate) fn shaped(mut self, kind: PropertyType) -> Self {
        self.kind = kind;
        match kind {
            PropertyType::Object => {
                self.children.get_or_insert_with(Vec::new);
                self.item_type = None;
                self.item_description = None;
            }
            PropertyType::Array => {
                let item_type = *self.item_type.get_or_insert(PropertyType::String);
                self.item_description.get_or_insert_with(String::new);
                if item_type == PropertyType::Object {
                    self.children.get_or_insert_with(Vec::new);
                } else {
                    self.children = None;
                }
            }
            _ => {
                self.children = None;
                self.item_type = None;
                self.item_description = None;
            }
        }
        self
    }

    /// 是否允许添加子属性
    pub fn accepts_children(&self) -> bool {
        match self.kind {
            PropertyType::Object => true,
            PropertyType::Array => self.item_type == Some(PropertyType::Object),
            _ => false,
        }
    }

    pub fn children(&self) -> &[Property] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// 键名为空（含仅空白）时需要以空键标记序列化
    pub fn has_empty_key(&self) -> bool {
        self.key.trim().is_empty()
    }
}
