//! VM桥接层：面向宿主界面的文案与错误信息
//!
//! 编辑器核心只通过错误回调向外报告人类可读的信息，这里集中定义这些文案

use crate::model::error::ConvertError;
use crate::model::property::EditorMode;

// === 常量定义（消除魔法值） ===
pub const TITLE_SCHEMA: &str = "Schema编辑器";
pub const TITLE_VALUE: &str = "JSON编辑器";
pub const EMPTY_SCHEMA: &str = "尚未定义任何Schema属性。";
pub const EMPTY_VALUE: &str = "尚未添加任何属性。";

pub fn title(mode: EditorMode) -> &'static str {
    match mode {
        EditorMode::Schema => TITLE_SCHEMA,
        EditorMode::Value => TITLE_VALUE,
    }
}

pub fn empty_placeholder(mode: EditorMode) -> &'static str {
    match mode {
        EditorMode::Schema => EMPTY_SCHEMA,
        EditorMode::Value => EMPTY_VALUE,
    }
}

/// 外部值无法解析为属性树
pub fn parse_error_message(mode: EditorMode, cause: &ConvertError) -> String {
    format!("解析初始{}失败: {}", mode, cause)
}

/// 属性树无法写回外部形状
pub fn serialize_error_message(mode: EditorMode, cause: &ConvertError) -> String {
    format!("转换属性为{}失败: {}", mode, cause)
}
