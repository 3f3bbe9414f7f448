//! 原始值类型嗅探：按顺序匹配的规则表，首个命中的规则决定类型

use serde_json::Value;

use crate::model::property::PropertyType;

/// 识别为图片的文件扩展名（不区分大小写）
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// 一条嗅探规则
#[derive(Debug, Clone, Copy)]
pub struct SniffRule {
    pub name: &'static str,
    pub kind: PropertyType,
    pub matches: fn(&Value) -> bool,
}

/// 规则按顺序求值
pub const SNIFF_RULES: [SniffRule; 7] = [
    SniffRule {
        name: "data-uri-image",
        kind: PropertyType::ImageBase64,
        matches: is_data_uri_image,
    },
    SniffRule {
        name: "http-image",
        kind: PropertyType::ImageUrl,
        matches: is_http_image,
    },
    SniffRule {
        name: "blob-image",
        kind: PropertyType::ImageBlob,
        matches: is_blob_image,
    },
    SniffRule {
        name: "plain-object",
        kind: PropertyType::Object,
        matches: Value::is_object,
    },
    SniffRule {
        name: "array",
        kind: PropertyType::Array,
        matches: Value::is_array,
    },
    SniffRule {
        name: "number",
        kind: PropertyType::Number,
        matches: Value::is_number,
    },
    SniffRule {
        name: "boolean",
        kind: PropertyType::Boolean,
        matches: Value::is_boolean,
    },
];

/// 对原始值分类，未命中任何规则时为 `string`
pub fn classify(value: &Value) -> PropertyType {
    SNIFF_RULES
        .iter()
        .find(|rule| (rule.matches)(value))
        .map(|rule| rule.kind)
        .unwrap_or(PropertyType::String)
}

fn is_data_uri_image(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.starts_with("data:image/"))
}

fn is_http_image(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.starts_with("http") && has_image_extension(s))
}

fn is_blob_image(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.starts_with("blob:") && has_image_extension(s))
}

/// 字符串是否以图片扩展名结尾
pub fn has_image_extension(s: &str) -> bool {
    let Some((_, ext)) = s.rsplit_once('.') else {
        return false;
    };
    IMAGE_EXTENSIONS
        .iter()
        .any(|candidate| ext.eq_ignore_ascii_case(candidate))
}
