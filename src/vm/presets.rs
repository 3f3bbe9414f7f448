//! 预设：Value 模式下可整体替换属性树的请求头凭据模板

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    BearerAuth,
    ApiKey,
    BasicAuth,
    Other,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::BearerAuth, Preset::ApiKey, Preset::BasicAuth, Preset::Other];

    /// 预设对应的固定对象
    pub fn value(self) -> Value {
        match self {
            Preset::BearerAuth => json!({"Authorization": "Bearer <insert api token>"}),
            Preset::ApiKey => json!({"x-api-key": "<insert api key>"}),
            Preset::BasicAuth => json!({"Authorization": "Basic <insert api token>"}),
            Preset::Other => json!({"Authorization": "<insert authorization header>"}),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::BearerAuth => "Bearer Auth",
            Preset::ApiKey => "X-API Key",
            Preset::BasicAuth => "Basic Auth",
            Preset::Other => "Other",
        }
    }

    /// 命令行使用的名称
    pub fn name(self) -> &'static str {
        match self {
            Preset::BearerAuth => "bearer",
            Preset::ApiKey => "api-key",
            Preset::BasicAuth => "basic",
            Preset::Other => "other",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("未知的预设: {}（可选: bearer, api-key, basic, other）", s))
    }
}
