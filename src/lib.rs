//! JSON/Schema 属性树编辑核心
//!
//! 提供属性树模型、树与嵌套对象之间的双向转换、结构性编辑，以及协调外部值与内部编辑的控制器
//! 遵循MVVM架构模式：model 为纯数据与转换，vm 负责与宿主界面的状态同步

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::convert::{
    from_properties_to_schema, from_properties_to_value, infer_schema, to_properties_from_schema,
    to_properties_from_value,
};
pub use model::error::{ConvertError, EditorError, MutationError};
pub use model::mutation::PropertyPath;
pub use model::property::{EditorMode, Property, PropertyType};
pub use vm::controller::{JsonEditor, SyncOutcome, SyncState};
pub use vm::presets::Preset;
