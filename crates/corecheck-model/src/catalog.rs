//! Check-definition catalog: maps a check id to its display text.
//!
//! The engine only ever emits check ids; this persisted mapping supplies the
//! human-readable message for reports. Operators may override the default
//! message per check id (`user_message` wins over `default_message`).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One entry of `check_definitions.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckDefinition {
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub default_message: String,
    #[serde(default)]
    pub user_message: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub description: String,
}

impl CheckDefinition {
    /// The message currently in effect for this definition.
    pub fn message(&self) -> &str {
        if self.user_message.is_empty() {
            &self.default_message
        } else {
            &self.user_message
        }
    }
}

/// The full catalog, keyed by check id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckCatalog {
    definitions: BTreeMap<String, CheckDefinition>,
}

impl CheckCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn insert(&mut self, check_id: impl Into<String>, definition: CheckDefinition) {
        self.definitions.insert(check_id.into(), definition);
    }

    pub fn get(&self, check_id: &str) -> Option<&CheckDefinition> {
        self.definitions.get(check_id)
    }

    /// Display text for a check id: user override, else default message,
    /// else an unknown-id marker.
    pub fn message_for(&self, check_id: &str) -> String {
        match self.definitions.get(check_id) {
            Some(definition) if !definition.message().is_empty() => {
                definition.message().to_string()
            }
            Some(_) => "エラー内容が定義されていません。".to_string(),
            None => format!("不明なチェックID: {check_id}"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CheckDefinition)> {
        self.definitions
            .iter()
            .map(|(id, definition)| (id.as_str(), definition))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CheckCatalog {
        let json = r#"{
            "DEKISPART_CHK_0058": {
                "series": "DEKISPART",
                "name": "stdNsyu「121」とstdKbiko「更新案内不要」の組み合わせチェック",
                "default_message": "stdNsyu(入金経路)が121でstdKbiko(備考（更新・一斉）)に「更新案内不要」を含む場合NG",
                "user_message": "",
                "severity": "エラー",
                "description": "入金経路と備考内容の矛盾を確認します。"
            },
            "DEKISPART_E001": {
                "series": "DEKISPART",
                "name": "個人名未登録チェック",
                "default_message": "登録されていない個人名です。",
                "user_message": "個人名リストを確認してください。",
                "severity": "エラー",
                "description": ""
            }
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn user_message_overrides_default() {
        let catalog = sample();
        assert_eq!(
            catalog.message_for("DEKISPART_E001"),
            "個人名リストを確認してください。"
        );
        assert_eq!(
            catalog.message_for("DEKISPART_CHK_0058"),
            "stdNsyu(入金経路)が121でstdKbiko(備考（更新・一斉）)に「更新案内不要」を含む場合NG"
        );
    }

    #[test]
    fn unknown_id_is_marked() {
        let catalog = sample();
        assert_eq!(
            catalog.message_for("DEKISPART_CHK_9999"),
            "不明なチェックID: DEKISPART_CHK_9999"
        );
    }
}
