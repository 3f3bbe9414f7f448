//! 节点标识生成：会话内实际唯一即可，不做全局登记与冲突检测

use uuid::Uuid;

/// 生成标识的长度（十六进制字符数）
pub const ID_LEN: usize = 10;

/// 生成一个新的本地节点标识
pub fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id
}
