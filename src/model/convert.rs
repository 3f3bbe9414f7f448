//! 转换引擎：属性树 <-> 外部嵌套对象（Value 形状 / Schema 形状）
//!
//! 四个转换函数均为纯函数。空键节点以 `__empty_<id>` 形式的标记键写出，
//! 读回时从标记中恢复原 id 并把键名置空，因此编辑中的节点在往返后既不丢失也不合并。
//! 顶层值的合法性（必须是对象或空）在 [`parse_external`] 这一边界上检查。

use serde_json::{Map, Value};

use crate::model::classify::classify;
use crate::model::error::{value_kind_name, ConvertError};
use crate::model::property::{EditorMode, Property, PropertyType};
use crate::utils::id::generate_id;

/// 空键标记前缀
pub const EMPTY_KEY_PREFIX: &str = "__empty_";

/// 由节点 id 生成空键标记
pub fn empty_key_marker(id: &str) -> String {
    format!("{}{}", EMPTY_KEY_PREFIX, id)
}

/// 若键名是空键标记，返回其中携带的 id
pub fn decode_empty_key(key: &str) -> Option<&str> {
    key.strip_prefix(EMPTY_KEY_PREFIX)
}

/// 节点在序列化容器中使用的键名
pub fn output_key(property: &Property) -> Result<String, ConvertError> {
    if property.has_empty_key() {
        return Ok(empty_key_marker(&property.id));
    }
    if property.key.starts_with(EMPTY_KEY_PREFIX) {
        return Err(ConvertError::ReservedKey(property.key.clone()));
    }
    Ok(property.key.clone())
}

/// 从外部键名恢复 (键名, id)
fn entry_identity(key: &str, parent_id: &str) -> (String, String) {
    match decode_empty_key(key) {
        Some(id) => (String::new(), id.to_string()),
        None => (key.to_string(), format!("{}_{}_{}", parent_id, key, generate_id())),
    }
}

fn insert_unique(target: &mut Map<String, Value>, key: String, value: Value) -> Result<(), ConvertError> {
    if target.contains_key(&key) {
        return Err(ConvertError::DuplicateKey(key));
    }
    target.insert(key, value);
    Ok(())
}

/// 由原始值构建属性列表
///
/// Value 模式下所有节点均为 `string`，原值原样保存，不向下递归；
/// Schema 模式下按嗅探规则推断类型，并递归进入嵌套对象（数组取首个元素推断元素类型）。
pub fn to_properties_from_value(obj: &Map<String, Value>, parent_id: &str, mode: EditorMode) -> Vec<Property> {
    obj.iter()
        .map(|(raw_key, value)| {
            let (key, id) = entry_identity(raw_key, parent_id);
            match mode {
                EditorMode::Value => Property {
                    id,
                    key,
                    kind: PropertyType::String,
                    value: Some(value.clone()),
                    ..Property::default()
                },
                EditorMode::Schema => sniffed_property(id, key, value),
            }
        })
        .collect()
}

fn sniffed_property(id: String, key: String, value: &Value) -> Property {
    let kind = classify(value);
    let mut property = Property {
        kind,
        ..Property::default()
    };
    match (kind, value) {
        (PropertyType::Object, Value::Object(map)) => {
            property.children = Some(to_properties_from_value(map, &id, EditorMode::Schema));
        }
        (PropertyType::Array, Value::Array(items)) => {
            let first = items.first();
            let item_type = first.map(classify).unwrap_or_default();
            property.item_type = Some(item_type);
            property.item_description = Some(String::new());
            if item_type == PropertyType::Object {
                let item_map = first.and_then(Value::as_object);
                property.children = Some(
                    item_map
                        .map(|m| to_properties_from_value(m, &id, EditorMode::Schema))
                        .unwrap_or_default(),
                );
            }
        }
        _ => {}
    }
    property.id = id;
    property.key = key;
    property
}

/// 由 Schema 对象构建属性列表
pub fn to_properties_from_schema(schema: &Map<String, Value>, parent_id: &str) -> Vec<Property> {
    schema
        .iter()
        .map(|(raw_key, entry)| {
            let (key, id) = entry_identity(raw_key, parent_id);
            let Some(entry) = entry.as_object() else {
                return Property {
                    id,
                    key,
                    ..Property::default()
                };
            };

            let kind = PropertyType::from_declared(entry.get("type").and_then(Value::as_str));
            let mut property = Property {
                kind,
                description: string_field(entry, "description"),
                required: entry.get("required").and_then(Value::as_bool).unwrap_or(false),
                ..Property::default()
            };

            match kind {
                PropertyType::Object => {
                    property.children = Some(nested_schema(entry.get("properties"), &id));
                }
                PropertyType::Array => {
                    let items = entry.get("items").and_then(Value::as_object);
                    let item_type =
                        PropertyType::from_declared(items.and_then(|i| i.get("type")).and_then(Value::as_str));
                    property.item_type = Some(item_type);
                    property.item_description = Some(items.map(|i| string_field(i, "description")).unwrap_or_default());
                    if item_type == PropertyType::Object {
                        property.children = Some(nested_schema(items.and_then(|i| i.get("properties")), &id));
                    }
                }
                _ => {}
            }

            property.id = id;
            property.key = key;
            property
        })
        .collect()
}

fn string_field(entry: &Map<String, Value>, field: &str) -> String {
    entry
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn nested_schema(properties: Option<&Value>, parent_id: &str) -> Vec<Property> {
    properties
        .and_then(Value::as_object)
        .map(|p| to_properties_from_schema(p, parent_id))
        .unwrap_or_default()
}

/// 将属性列表写回 Schema 对象
pub fn from_properties_to_schema(properties: &[Property]) -> Result<Map<String, Value>, ConvertError> {
    let mut result = Map::new();
    for property in properties {
        let key = output_key(property)?;
        let entry = schema_entry(property)?;
        insert_unique(&mut result, key, Value::Object(entry))?;
    }
    Ok(result)
}

fn schema_entry(property: &Property) -> Result<Map<String, Value>, ConvertError> {
    let mut entry = Map::new();
    entry.insert("type".into(), Value::from(property.kind.as_str()));
    entry.insert("description".into(), Value::from(property.description.as_str()));
    entry.insert("required".into(), Value::Bool(property.required));

    match property.kind {
        PropertyType::Object => {
            entry.insert(
                "properties".into(),
                Value::Object(from_properties_to_schema(property.children())?),
            );
        }
        PropertyType::Array => {
            let item_type = property.item_type.unwrap_or_default();
            let mut items = Map::new();
            items.insert("type".into(), Value::from(item_type.as_str()));
            items.insert(
                "description".into(),
                Value::from(property.item_description.as_deref().unwrap_or_default()),
            );
            if item_type == PropertyType::Object {
                items.insert(
                    "properties".into(),
                    Value::Object(from_properties_to_schema(property.children())?),
                );
            }
            entry.insert("items".into(), Value::Object(items));
        }
        _ => {}
    }
    Ok(entry)
}

/// 将属性列表写回普通值对象
pub fn from_properties_to_value(properties: &[Property]) -> Result<Map<String, Value>, ConvertError> {
    let mut result = Map::new();
    for property in properties {
        let key = output_key(property)?;
        let value = match (&property.kind, &property.children) {
            (PropertyType::Object, Some(children)) => Value::Object(from_properties_to_value(children)?),
            _ => property.value.clone().unwrap_or(Value::Null),
        };
        insert_unique(&mut result, key, value)?;
    }
    Ok(result)
}

/// 外部边界：把外部值解析为属性树；缺失或 `null` 视为空树
pub fn parse_external(value: Option<&Value>, mode: EditorMode) -> Result<Vec<Property>, ConvertError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(map)) => Ok(match mode {
            EditorMode::Value => to_properties_from_value(map, "", EditorMode::Value),
            EditorMode::Schema => to_properties_from_schema(map, ""),
        }),
        Some(other) => Err(ConvertError::NotAnObject(value_kind_name(other))),
    }
}

/// 按模式序列化整棵树
pub fn serialize(properties: &[Property], mode: EditorMode) -> Result<Value, ConvertError> {
    let map = match mode {
        EditorMode::Value => from_properties_to_value(properties)?,
        EditorMode::Schema => from_properties_to_schema(properties)?,
    };
    Ok(Value::Object(map))
}

/// 由样例值推断 Schema
pub fn infer_schema(sample: &Map<String, Value>) -> Result<Map<String, Value>, ConvertError> {
    from_properties_to_schema(&to_properties_from_value(sample, "", EditorMode::Schema))
}
