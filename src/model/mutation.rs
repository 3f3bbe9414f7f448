//! 编辑操作：字段级替换返回新节点（保留 id），同级列表上的增删改做越界检查

use serde_json::Value;

use crate::model::error::MutationError;
use crate::model::property::{EditorMode, Property, PropertyType};

impl Property {
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// 切换类型
    ///
    /// Value 模式下只允许切换到 `string`，其余请求原样返回；切换到相同类型也不做任何改动。
    pub fn retyped(self, kind: PropertyType, mode: EditorMode) -> Self {
        if mode == EditorMode::Value && kind != PropertyType::String {
            return self;
        }
        if self.kind == kind {
            return self;
        }
        let mut next = self;
        if mode == EditorMode::Value {
            next.value = Some(kind.zero_value());
        }
        // 离开 object/array 时丢弃子节点，进入 array 时元素类型从 string 开始
        next.children = None;
        next.item_type = None;
        next.item_description = None;
        next.shaped(kind)
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// 设置数组元素类型（非数组节点原样返回）
    pub fn with_item_type(mut self, item_type: PropertyType) -> Self {
        if self.kind != PropertyType::Array {
            return self;
        }
        self.item_type = Some(item_type);
        if item_type == PropertyType::Object {
            self.children.get_or_insert_with(Vec::new);
        } else {
            self.children = None;
        }
        self
    }

    /// 设置数组元素描述（非数组节点原样返回）
    pub fn with_item_description(mut self, description: impl Into<String>) -> Self {
        if self.kind == PropertyType::Array {
            self.item_description = Some(description.into());
        }
        self
    }

    /// 追加一个空白子属性；节点不接受子属性时原样返回
    pub fn with_child_added(mut self, mode: EditorMode) -> Self {
        if !self.accepts_children() {
            return self;
        }
        self.children
            .get_or_insert_with(Vec::new)
            .push(Property::blank(mode));
        self
    }

    /// 替换指定位置的子属性，返回被替换的旧节点
    pub fn replace_child(&mut self, index: usize, child: Property) -> Result<Property, MutationError> {
        match self.children.as_mut() {
            Some(children) => replace_property(children, index, child),
            None => Err(MutationError::IndexOutOfRange { index, len: 0 }),
        }
    }

    /// 删除指定位置的子属性
    pub fn remove_child(&mut self, index: usize) -> Result<Property, MutationError> {
        match self.children.as_mut() {
            Some(children) => delete_property(children, index),
            None => Err(MutationError::IndexOutOfRange { index, len: 0 }),
        }
    }
}

fn check_index(list: &[Property], index: usize) -> Result<(), MutationError> {
    if index < list.len() {
        Ok(())
    } else {
        Err(MutationError::IndexOutOfRange { index, len: list.len() })
    }
}

/// 在同级列表末尾追加空白属性，返回新节点的引用
pub fn add_property(list: &mut Vec<Property>, mode: EditorMode) -> &Property {
    list.push(Property::blank(mode));
    &list[list.len() - 1]
}

/// 替换同级列表中的属性
pub fn replace_property(list: &mut [Property], index: usize, property: Property) -> Result<Property, MutationError> {
    check_index(list, index)?;
    Ok(std::mem::replace(&mut list[index], property))
}

/// 从同级列表中删除属性
pub fn delete_property(list: &mut Vec<Property>, index: usize) -> Result<Property, MutationError> {
    check_index(list, index)?;
    Ok(list.remove(index))
}

/// 从根列表出发的下标路径
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyPath(Vec<usize>);

impl PropertyPath {
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn parent(&self) -> Option<Self> {
        match self.0.len() {
            0 | 1 => None,
            n => Some(Self(self.0[..n - 1].to_vec())),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<usize>> for PropertyPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// 按路径只读定位节点
pub fn node_at<'a>(list: &'a [Property], path: &PropertyPath) -> Result<&'a Property, MutationError> {
    let (&last, parents) = path.indices().split_last().ok_or(MutationError::EmptyPath)?;
    let mut current = list;
    for &index in parents {
        check_index(current, index)?;
        current = current[index].children();
    }
    check_index(current, last)?;
    Ok(&current[last])
}

/// 按路径定位节点所在的同级列表及其下标
pub fn siblings_at_mut<'a>(
    list: &'a mut Vec<Property>,
    path: &PropertyPath,
) -> Result<(&'a mut Vec<Property>, usize), MutationError> {
    // 先只读校验整条路径，避免在叶子节点上留下空的子列表
    node_at(list, path)?;
    let (&last, parents) = path.indices().split_last().ok_or(MutationError::EmptyPath)?;
    let mut current = list;
    for &index in parents {
        current = current[index].children.get_or_insert_with(Vec::new);
    }
    check_index(current, last)?;
    Ok((current, last))
}

/// 按 id 深度优先查找节点路径
pub fn find_path(list: &[Property], id: &str) -> Option<PropertyPath> {
    for (index, property) in list.iter().enumerate() {
        if property.id == id {
            return Some(PropertyPath::root(index));
        }
        if let Some(sub) = find_path(property.children(), id) {
            let mut indices = vec![index];
            indices.extend_from_slice(sub.indices());
            return Some(PropertyPath(indices));
        }
    }
    None
}
