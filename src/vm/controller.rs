//! 协调控制器：在外部值与内部属性树之间决定谁是权威
//!
//! 外部值以 `Arc<Value>` 传入，按指针判断“是否变化”。每次内部编辑后序列化整棵树并
//! 通过变更回调发出新值，同时进入 `AwaitingExternalAck`；宿主回传这些值时只做确认，
//! 不会重建属性树，从而避免 重建 -> 发出 -> 重建 的循环。

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::model::convert::{parse_external, serialize};
use crate::model::error::{ConvertError, MutationError};
use crate::model::mutation::{self, find_path, node_at, siblings_at_mut, PropertyPath};
use crate::model::outline::{build_outline, OutlineRow};
use crate::model::property::{EditorMode, Property, PropertyType};
use crate::vm::bridge::{parse_error_message, serialize_error_message};
use crate::vm::presets::Preset;

pub type ChangeCallback = Box<dyn FnMut(Arc<Value>)>;
pub type ErrorCallback = Box<dyn FnMut(Option<&str>)>;

/// 等待回传的发出值上限，超出时丢弃最早的
pub const MAX_PENDING_ACKS: usize = 8;

/// 同步状态
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    /// 已发出但尚未被宿主回传的值（按发出顺序）
    AwaitingExternalAck(Vec<Arc<Value>>),
}

/// 一次外部变更观察的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// 与上次观察到的外部值是同一引用
    Unchanged,
    /// 外部值来自本编辑器的发出，已确认
    Acknowledged,
    /// 已按外部值重建属性树
    Rebuilt,
    /// 外部值无法解析，保留原属性树
    Rejected,
}

pub struct JsonEditor {
    mode: EditorMode,
    properties: Vec<Property>,
    sync: SyncState,
    external: Option<Arc<Value>>,
    error: Option<String>,
    on_change: ChangeCallback,
    on_error: Option<ErrorCallback>,
}

impl fmt::Debug for JsonEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonEditor")
            .field("mode", &self.mode)
            .field("properties", &self.properties)
            .field("sync", &self.sync)
            .field("external", &self.external)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

fn same_ref(a: &Option<Arc<Value>>, b: &Option<Arc<Value>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

fn contract_violation(e: MutationError) -> MutationError {
    tracing::warn!("结构性编辑请求无效: {}", e);
    e
}

impl JsonEditor {
    /// 创建空编辑器，尚未观察任何外部值
    pub fn new(mode: EditorMode, on_change: impl FnMut(Arc<Value>) + 'static) -> Self {
        Self {
            mode,
            properties: Vec::new(),
            sync: SyncState::Idle,
            external: None,
            error: None,
            on_change: Box::new(on_change),
            on_error: None,
        }
    }

    pub fn with_error_callback(mut self, on_error: impl FnMut(Option<&str>) + 'static) -> Self {
        self.on_error = Some(Box::new(on_error));
        self
    }

    /// 以初始外部值建树；无法解析时得到空树并报告错误
    pub fn mount(mut self, initial: Option<Arc<Value>>) -> Self {
        self.external = initial;
        if self.rebuild() == SyncOutcome::Rejected {
            self.properties.clear();
        }
        self
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    pub fn external(&self) -> Option<&Arc<Value>> {
        self.external.as_ref()
    }

    pub fn find(&self, id: &str) -> Option<PropertyPath> {
        find_path(&self.properties, id)
    }

    pub fn get(&self, path: &PropertyPath) -> Option<&Property> {
        node_at(&self.properties, path).ok()
    }

    pub fn outline(&self) -> Vec<OutlineRow> {
        build_outline(&self.properties, self.mode)
    }

    /// 序列化当前属性树但不发出
    pub fn snapshot(&self) -> Result<Value, ConvertError> {
        serialize(&self.properties, self.mode)
    }

    /// 外部值变化时调用
    pub fn sync_external(&mut self, external: Option<Arc<Value>>) -> SyncOutcome {
        if same_ref(&self.external, &external) {
            return SyncOutcome::Unchanged;
        }
        self.external = external;

        if let SyncState::AwaitingExternalAck(mut pending) = std::mem::take(&mut self.sync) {
            let position = self.external.as_ref().and_then(|current| {
                pending
                    .iter()
                    .position(|emitted| Arc::ptr_eq(current, emitted) || **current == **emitted)
            });
            if let Some(position) = position {
                pending.drain(..=position);
                if !pending.is_empty() {
                    self.sync = SyncState::AwaitingExternalAck(pending);
                }
                tracing::debug!("外部值为本编辑器的发出，跳过重建");
                return SyncOutcome::Acknowledged;
            }
            tracing::warn!("等待回传期间外部值被替换，按外部变更重建");
        }

        self.rebuild()
    }

    /// 切换模式后按新模式从外部值重建
    pub fn set_mode(&mut self, mode: EditorMode) -> SyncOutcome {
        if self.mode == mode {
            return SyncOutcome::Unchanged;
        }
        self.mode = mode;
        self.sync = SyncState::Idle;
        self.rebuild()
    }

    fn rebuild(&mut self) -> SyncOutcome {
        match parse_external(self.external.as_deref(), self.mode) {
            Ok(properties) => {
                tracing::info!("按外部值重建属性树: {} 个顶层节点 ({})", properties.len(), self.mode);
                self.properties = properties;
                self.report(None);
                SyncOutcome::Rebuilt
            }
            Err(cause) => {
                let message = parse_error_message(self.mode, &cause);
                tracing::error!("{}", message);
                self.report(Some(message));
                SyncOutcome::Rejected
            }
        }
    }

    fn report(&mut self, message: Option<String>) {
        self.error = message;
        if let Some(on_error) = self.on_error.as_mut() {
            on_error(self.error.as_deref());
        }
    }

    /// 序列化并向外发出；失败时不发出，外部值保持权威
    fn emit(&mut self) -> bool {
        match serialize(&self.properties, self.mode) {
            Ok(value) => {
                let value = Arc::new(value);
                match &mut self.sync {
                    SyncState::AwaitingExternalAck(pending) => {
                        pending.push(Arc::clone(&value));
                        if pending.len() > MAX_PENDING_ACKS {
                            let dropped = pending.len() - MAX_PENDING_ACKS;
                            pending.drain(..dropped);
                            tracing::debug!("宿主未回传，丢弃 {} 个最早的待确认值", dropped);
                        }
                    }
                    SyncState::Idle => self.sync = SyncState::AwaitingExternalAck(vec![Arc::clone(&value)]),
                }
                if self.error.is_some() {
                    self.report(None);
                }
                tracing::debug!("发出新值: {} 个顶层节点", self.properties.len());
                (self.on_change)(value);
                true
            }
            Err(cause) => {
                let message = serialize_error_message(self.mode, &cause);
                tracing::error!("{}", message);
                self.report(Some(message));
                false
            }
        }
    }

    /// 用固定对象整体替换属性树并立即发出（仅 value 模式，返回是否已应用）
    pub fn apply_preset(&mut self, preset: Preset) -> bool {
        if self.mode != EditorMode::Value {
            tracing::debug!("预设仅适用于 value 模式，忽略: {}", preset);
            return false;
        }
        let value = preset.value();
        match parse_external(Some(&value), self.mode) {
            Ok(properties) => {
                tracing::info!("应用预设: {}", preset);
                self.properties = properties;
                self.emit()
            }
            Err(cause) => {
                let message = parse_error_message(self.mode, &cause);
                self.report(Some(message));
                false
            }
        }
    }

    /// 在顶层追加空白属性，返回其 id
    pub fn add_property(&mut self) -> String {
        let id = mutation::add_property(&mut self.properties, self.mode).id.clone();
        tracing::debug!("添加顶层属性: {}", id);
        self.emit();
        id
    }

    /// 替换顶层属性
    pub fn update_property(&mut self, index: usize, property: Property) -> Result<bool, MutationError> {
        let old = mutation::replace_property(&mut self.properties, index, property).map_err(contract_violation)?;
        let changed = old != self.properties[index];
        if changed {
            self.emit();
        }
        Ok(changed)
    }

    /// 删除顶层属性
    pub fn delete_property(&mut self, index: usize) -> Result<Property, MutationError> {
        let removed = mutation::delete_property(&mut self.properties, index).map_err(contract_violation)?;
        tracing::debug!("删除顶层属性: {}", removed.id);
        self.emit();
        Ok(removed)
    }

    /// 删除任意深度的属性
    pub fn delete_at(&mut self, path: &PropertyPath) -> Result<Property, MutationError> {
        let (siblings, index) = siblings_at_mut(&mut self.properties, path).map_err(contract_violation)?;
        let removed = mutation::delete_property(siblings, index).map_err(contract_violation)?;
        tracing::debug!("删除属性: {}", removed.id);
        self.emit();
        Ok(removed)
    }

    /// 以值替换的方式编辑任意深度的节点；节点未变化时不发出
    pub fn update_at(
        &mut self,
        path: &PropertyPath,
        edit: impl FnOnce(Property) -> Property,
    ) -> Result<bool, MutationError> {
        let (siblings, index) = siblings_at_mut(&mut self.properties, path).map_err(contract_violation)?;
        let before = siblings[index].clone();
        let after = edit(std::mem::take(&mut siblings[index]));
        let changed = after != before;
        siblings[index] = after;
        if changed {
            self.emit();
        }
        Ok(changed)
    }

    pub fn set_key(&mut self, path: &PropertyPath, key: &str) -> Result<bool, MutationError> {
        self.update_at(path, |p| p.with_key(key))
    }

    /// Value 模式下切换到非 `string` 类型不生效
    pub fn set_type(&mut self, path: &PropertyPath, kind: PropertyType) -> Result<bool, MutationError> {
        let mode = self.mode;
        self.update_at(path, |p| p.retyped(kind, mode))
    }

    pub fn set_value(&mut self, path: &PropertyPath, value: Value) -> Result<bool, MutationError> {
        self.update_at(path, |p| p.with_value(value))
    }

    pub fn set_description(&mut self, path: &PropertyPath, description: &str) -> Result<bool, MutationError> {
        self.update_at(path, |p| p.with_description(description))
    }

    pub fn set_required(&mut self, path: &PropertyPath, required: bool) -> Result<bool, MutationError> {
        self.update_at(path, |p| p.with_required(required))
    }

    pub fn set_item_type(&mut self, path: &PropertyPath, item_type: PropertyType) -> Result<bool, MutationError> {
        self.update_at(path, |p| p.with_item_type(item_type))
    }

    pub fn set_item_description(&mut self, path: &PropertyPath, description: &str) -> Result<bool, MutationError> {
        self.update_at(path, |p| p.with_item_description(description))
    }

    /// 给节点追加子属性，返回新子节点的 id；节点不接受子属性时返回 `None`
    pub fn add_child(&mut self, path: &PropertyPath) -> Result<Option<String>, MutationError> {
        let mode = self.mode;
        if !self.update_at(path, |p| p.with_child_added(mode))? {
            tracing::debug!("节点不接受子属性，忽略添加请求");
            return Ok(None);
        }
        Ok(self
            .get(path)
            .and_then(|p| p.children().last())
            .map(|child| child.id.clone()))
    }

    /// 替换节点的第 `index` 个子属性
    pub fn update_child(&mut self, path: &PropertyPath, index: usize, child: Property) -> Result<bool, MutationError> {
        let (siblings, at) = siblings_at_mut(&mut self.properties, path).map_err(contract_violation)?;
        let parent = &mut siblings[at];
        let old = parent.replace_child(index, child).map_err(contract_violation)?;
        let changed = old != parent.children()[index];
        if changed {
            self.emit();
        }
        Ok(changed)
    }

    /// 删除节点的第 `index` 个子属性
    pub fn delete_child(&mut self, path: &PropertyPath, index: usize) -> Result<Property, MutationError> {
        let (siblings, at) = siblings_at_mut(&mut self.properties, path).map_err(contract_violation)?;
        let removed = siblings[at].remove_child(index).map_err(contract_violation)?;
        self.emit();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::convert::empty_key_marker;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder {
        emitted: Rc<RefCell<Vec<Arc<Value>>>>,
        errors: Rc<RefCell<Vec<Option<String>>>>,
    }

    impl Recorder {
        fn editor(&self, mode: EditorMode, initial: Option<Value>) -> JsonEditor {
            let emitted = Rc::clone(&self.emitted);
            let errors = Rc::clone(&self.errors);
            JsonEditor::new(mode, move |v| emitted.borrow_mut().push(v))
                .with_error_callback(move |e| errors.borrow_mut().push(e.map(str::to_string)))
                .mount(initial.map(Arc::new))
        }

        fn last(&self) -> Value {
            self.emitted.borrow().last().map(|v| (**v).clone()).expect("应已发出新值")
        }

        fn count(&self) -> usize {
            self.emitted.borrow().len()
        }

        fn last_error(&self) -> Option<String> {
            self.errors.borrow().last().cloned().flatten()
        }
    }

    fn at(indices: &[usize]) -> PropertyPath {
        PropertyPath::from(indices.to_vec())
    }

    #[test]
    fn test_scenario_value_mode_add_token() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Value, Some(json!({})));
        assert!(editor.properties().is_empty());

        editor.add_property();
        editor.set_key(&at(&[0]), "token").unwrap();
        assert_eq!(editor.properties()[0].kind, PropertyType::String);
        editor.set_value(&at(&[0]), json!("abc")).unwrap();

        assert_eq!(rec.last(), json!({"token": "abc"}));
        assert_eq!(rec.count(), 3, "每次编辑各发出一次");
    }

    #[test]
    fn test_scenario_add_child_refused_on_number() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Schema, Some(json!({"age": {"type": "number", "required": true}})));
        assert_eq!(editor.properties().len(), 1);
        assert_eq!(editor.properties()[0].kind, PropertyType::Number);
        assert!(editor.properties()[0].required);

        let before = editor.properties().to_vec();
        assert_eq!(editor.add_child(&at(&[0])), Ok(None));
        assert_eq!(editor.properties(), &before[..], "结构不应变化");
        assert_eq!(rec.count(), 0, "被拒绝的编辑不发出");
    }

    #[test]
    fn test_scenario_array_of_objects() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Schema, Some(json!({})));
        editor.add_property();
        editor.set_key(&at(&[0]), "people").unwrap();
        editor.set_type(&at(&[0]), PropertyType::Array).unwrap();
        editor.set_item_type(&at(&[0]), PropertyType::Object).unwrap();
        let child_id = editor.add_child(&at(&[0])).unwrap().expect("数组元素为 object 时应允许添加");
        assert_eq!(editor.find(&child_id), Some(at(&[0, 0])));
        editor.set_key(&at(&[0, 0]), "name").unwrap();

        assert_eq!(
            rec.last(),
            json!({
                "people": {
                    "type": "array",
                    "description": "",
                    "required": false,
                    "items": {
                        "type": "object",
                        "description": "",
                        "properties": {
                            "name": {"type": "string", "required": false, "description": ""}
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_scenario_api_key_preset_replaces_tree() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Value, Some(json!({"a": "1", "b": "2"})));
        editor.apply_preset(Preset::ApiKey);
        assert_eq!(rec.last(), json!({"x-api-key": "<insert api key>"}));
        assert_eq!(editor.properties().len(), 1);
        assert_eq!(editor.properties()[0].key, "x-api-key");
    }

    #[test]
    fn test_preset_refused_in_schema_mode() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Schema, Some(json!({"name": {"type": "string", "required": true}})));
        let before = editor.properties().to_vec();

        assert!(!editor.apply_preset(Preset::ApiKey));
        assert_eq!(rec.count(), 0, "Schema 模式下预设不应发出");
        assert_eq!(editor.properties(), &before[..], "Schema 模式下属性树不应被替换");
        assert_eq!(editor.sync_state(), &SyncState::Idle);
    }

    #[test]
    fn test_pending_acks_stay_bounded_without_host_echo() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Value, Some(json!({"a": "0"})));
        for i in 0..500 {
            editor.set_value(&at(&[0]), json!(i.to_string())).unwrap();
        }
        assert_eq!(rec.count(), 499, "值未变化的第一次编辑不发出");
        match editor.sync_state() {
            SyncState::AwaitingExternalAck(pending) => {
                assert_eq!(pending.len(), MAX_PENDING_ACKS, "待确认队列应有上限");
                assert_eq!(*pending[MAX_PENDING_ACKS - 1], json!({"a": "499"}));
            }
            SyncState::Idle => panic!("编辑后应处于等待回传状态"),
        }

        // 最新的发出仍可被确认
        let latest = Arc::clone(rec.emitted.borrow().last().unwrap());
        assert_eq!(editor.sync_external(Some(latest)), SyncOutcome::Acknowledged);
        assert_eq!(editor.sync_state(), &SyncState::Idle);
    }

    #[test]
    fn test_same_reference_is_ignored() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Schema, None);
        let external = Arc::new(json!({"a": {"type": "string"}}));

        assert_eq!(editor.sync_external(Some(Arc::clone(&external))), SyncOutcome::Rebuilt);
        let ids: Vec<String> = editor.properties().iter().map(|p| p.id.clone()).collect();
        assert_eq!(editor.sync_external(Some(Arc::clone(&external))), SyncOutcome::Unchanged);
        let again: Vec<String> = editor.properties().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, again, "同一引用不应触发重建");
    }

    #[test]
    fn test_own_emission_is_acknowledged_not_rebuilt() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Value, Some(json!({"a": "1"})));
        let original_id = editor.properties()[0].id.clone();

        editor.set_value(&at(&[0]), json!("2")).unwrap();
        assert!(matches!(editor.sync_state(), SyncState::AwaitingExternalAck(_)));

        let emitted = Arc::clone(rec.emitted.borrow().last().unwrap());
        assert_eq!(editor.sync_external(Some(emitted)), SyncOutcome::Acknowledged);
        assert_eq!(editor.sync_state(), &SyncState::Idle);
        assert_eq!(editor.properties()[0].id, original_id, "确认后 id 保持不变");

        let replaced = Arc::new(json!({"a": "from outside"}));
        assert_eq!(editor.sync_external(Some(replaced)), SyncOutcome::Rebuilt);
        assert_ne!(editor.properties()[0].id, original_id, "外部变更重建后生成新 id");
    }

    #[test]
    fn test_acknowledges_batched_emissions_in_order() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Value, Some(json!({})));
        editor.add_property();
        editor.set_key(&at(&[0]), "k").unwrap();
        let first = Arc::clone(&rec.emitted.borrow()[0]);
        let second = Arc::clone(&rec.emitted.borrow()[1]);

        assert_eq!(editor.sync_external(Some(first)), SyncOutcome::Acknowledged);
        assert_eq!(editor.properties()[0].key, "k", "较早的回传不应回退较新的编辑");
        assert!(matches!(editor.sync_state(), SyncState::AwaitingExternalAck(p) if p.len() == 1));

        assert_eq!(editor.sync_external(Some(second)), SyncOutcome::Acknowledged);
        assert_eq!(editor.sync_state(), &SyncState::Idle);
    }

    #[test]
    fn test_empty_key_survives_rebuild_cycle() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Value, Some(json!({})));
        let first = editor.add_property();
        let second = editor.add_property();

        let emitted = rec.last();
        assert!(emitted.get(empty_key_marker(&first)).is_some());
        assert!(emitted.get(empty_key_marker(&second)).is_some());

        let ack = Arc::clone(rec.emitted.borrow().last().unwrap());
        editor.sync_external(Some(ack));
        assert_eq!(editor.sync_external(Some(Arc::new(emitted))), SyncOutcome::Rebuilt);

        let ids: Vec<&str> = editor.properties().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![first.as_str(), second.as_str()]);
        assert!(editor.properties().iter().all(|p| p.key.is_empty()));
    }

    #[test]
    fn test_value_mode_retype_is_noop() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Value, Some(json!({"flag": "yes"})));
        assert_eq!(editor.set_type(&at(&[0]), PropertyType::Boolean), Ok(false));
        assert_eq!(editor.properties()[0].kind, PropertyType::String);
        assert_eq!(rec.count(), 0);
    }

    #[test]
    fn test_parse_error_keeps_previous_tree() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Schema, Some(json!({"a": {"type": "boolean"}})));
        let before = editor.properties().to_vec();

        assert_eq!(editor.sync_external(Some(Arc::new(json!([1, 2])))), SyncOutcome::Rejected);
        assert_eq!(editor.properties(), &before[..], "解析失败时保留原属性树");
        assert_eq!(
            rec.last_error().as_deref(),
            Some("解析初始schema失败: 期望JSON对象，实际为数组")
        );
        assert!(editor.error().is_some());

        editor.sync_external(Some(Arc::new(json!({"b": {"type": "string"}}))));
        assert_eq!(editor.error(), None);
        assert_eq!(rec.errors.borrow().last(), Some(&None), "成功重建后清除错误");
    }

    #[test]
    fn test_mount_with_malformed_value_gives_empty_tree() {
        let rec = Recorder::default();
        let editor = rec.editor(EditorMode::Value, Some(json!("not an object")));
        assert!(editor.properties().is_empty());
        assert!(rec.last_error().is_some());

        let absent = Recorder::default().editor(EditorMode::Schema, None);
        assert!(absent.properties().is_empty());
        assert_eq!(absent.error(), None);
    }

    #[test]
    fn test_serialize_error_does_not_emit() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Value, Some(json!({"a": "1", "b": "2"})));

        assert_eq!(editor.set_key(&at(&[1]), "a"), Ok(true));
        assert_eq!(rec.count(), 0, "重复键名时不发出");
        assert_eq!(
            rec.last_error().as_deref(),
            Some("转换属性为value失败: 同级存在重复的键名: a")
        );

        editor.set_key(&at(&[1]), "c").unwrap();
        assert_eq!(rec.last(), json!({"a": "1", "c": "2"}));
        assert_eq!(editor.error(), None);
    }

    #[test]
    fn test_contract_violations_are_returned_not_reported() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Schema, Some(json!({"a": {"type": "string"}})));
        assert_eq!(
            editor.delete_property(4).unwrap_err(),
            MutationError::IndexOutOfRange { index: 4, len: 1 }
        );
        assert!(editor.set_key(&at(&[0, 2]), "x").is_err());
        assert!(editor.delete_child(&at(&[0]), 0).is_err());
        assert_eq!(editor.properties()[0].children, None, "失败的编辑不改动叶子节点");
        assert_eq!(rec.last_error(), None);
        assert_eq!(rec.count(), 0);
    }

    #[test]
    fn test_nested_child_edits() {
        let rec = Recorder::default();
        let mut editor = rec.editor(
            EditorMode::Schema,
            Some(json!({"user": {"type": "object", "properties": {"name": {"type": "string"}}}})),
        );
        let user = at(&[0]);
        editor.add_child(&user).unwrap();
        let replacement = editor.get(&at(&[0, 1])).unwrap().clone().with_key("email").with_required(true);
        assert_eq!(editor.update_child(&user, 1, replacement), Ok(true));
        editor.set_description(&at(&[0, 1]), "联系邮箱").unwrap();

        let props = &rec.last()["user"]["properties"];
        assert_eq!(props["email"], json!({"type": "string", "description": "联系邮箱", "required": true}));

        editor.delete_child(&user, 0).unwrap();
        let keys: Vec<String> = rec.last()["user"]["properties"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["email"]);

        editor.delete_at(&at(&[0, 0])).unwrap();
        assert_eq!(rec.last()["user"]["properties"], json!({}));
    }

    #[test]
    fn test_top_level_update_and_delete() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Value, Some(json!({"a": "1", "b": "2"})));
        let replacement = editor.properties()[0].clone().with_value(json!("one"));
        assert_eq!(editor.update_property(0, replacement.clone()), Ok(true));
        assert_eq!(editor.update_property(0, replacement), Ok(false), "相同节点不重复发出");
        assert_eq!(rec.count(), 1);

        editor.delete_property(1).unwrap();
        assert_eq!(rec.last(), json!({"a": "one"}));
    }

    #[test]
    fn test_mode_switch_rebuilds_from_external() {
        let rec = Recorder::default();
        let mut editor = rec.editor(EditorMode::Schema, Some(json!({"a": {"type": "number"}})));
        assert_eq!(editor.properties()[0].kind, PropertyType::Number);

        assert_eq!(editor.set_mode(EditorMode::Value), SyncOutcome::Rebuilt);
        assert_eq!(editor.properties()[0].kind, PropertyType::String);
        assert_eq!(editor.properties()[0].value, Some(json!({"type": "number"})));
        assert_eq!(editor.set_mode(EditorMode::Value), SyncOutcome::Unchanged);
    }

    #[test]
    fn test_outline_and_snapshot() {
        let rec = Recorder::default();
        let editor = rec.editor(EditorMode::Value, Some(json!({"Authorization": "Bearer x"})));
        let rows = editor.outline();
        assert_eq!(rows[0].path, "$.Authorization");
        assert_eq!(editor.snapshot().unwrap(), json!({"Authorization": "Bearer x"}));
        assert_eq!(rec.count(), 0, "快照不发出");
    }
}
