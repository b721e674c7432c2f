//! Catalog access for the seed console.
//!
//! The catalog is fetched from the server's `/api/presets` endpoint. Preset
//! entries reference demos either by id (`"shelf"`) or as
//! `{"demoId": "shelf", "screenNumber": 3}`.

use serde_json::{Map, Value};

use seedwall_server::infrastructure::dto::websocket::DemoDto;

use crate::error::ClientError;

/// HTTP client for the catalog endpoint
pub struct CatalogClient {
    http: reqwest::Client,
    presets_url: String,
}

impl CatalogClient {
    /// `api_base` is the server's HTTP root, e.g. `http://127.0.0.1:3000`
    pub fn new(api_base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            presets_url: format!("{}/api/presets", api_base.trim_end_matches('/')),
        }
    }

    pub async fn fetch(&self) -> Result<Value, ClientError> {
        let response = self
            .http
            .get(&self.presets_url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

/// `(preset id, display name)` pairs in catalog order
pub fn list_presets(catalog: &Value) -> Vec<(String, String)> {
    let Some(presets) = catalog["presets"].as_object() else {
        return Vec::new();
    };

    let order: Vec<String> = match catalog["presetOrder"].as_array() {
        Some(order) if !order.is_empty() => order
            .iter()
            .filter_map(|id| id.as_str().map(str::to_string))
            .collect(),
        _ => presets.keys().cloned().collect(),
    };

    order
        .into_iter()
        .filter_map(|id| {
            let preset = presets.get(&id)?;
            let name = preset["name"].as_str().unwrap_or(&id).to_string();
            Some((id, name))
        })
        .collect()
}

/// Look up one demo by id
pub fn resolve_demo(catalog: &Value, demo_id: &str) -> Result<DemoDto, ClientError> {
    let fields = catalog["demos"]
        .get(demo_id)
        .and_then(Value::as_object)
        .ok_or_else(|| ClientError::Catalog(format!("unknown demo '{}'", demo_id)))?;
    Ok(demo_dto(fields, None))
}

/// Resolve a preset into its display name and demos with screen assignments.
///
/// Entries that reference a missing demo are skipped. A screen assignment
/// that is not a screen number fails the whole preset, since sending the
/// demo to every screen instead would be wrong.
pub fn resolve_preset(
    catalog: &Value,
    preset_id: &str,
) -> Result<(String, Vec<DemoDto>), ClientError> {
    let preset = catalog["presets"]
        .get(preset_id)
        .ok_or_else(|| ClientError::Catalog(format!("unknown preset '{}'", preset_id)))?;
    let name = preset["name"].as_str().unwrap_or(preset_id).to_string();
    let entries = preset["demos"].as_array().map(Vec::as_slice).unwrap_or_default();

    let mut demos = Vec::with_capacity(entries.len());
    for entry in entries {
        let (demo_id, screen_number) = match entry {
            Value::String(demo_id) => (demo_id.as_str(), None),
            Value::Object(reference) => {
                let Some(demo_id) = reference.get("demoId").and_then(Value::as_str) else {
                    continue;
                };
                let screen_number = match reference.get("screenNumber") {
                    Some(value) => screen_number_of(value).ok_or_else(|| {
                        ClientError::Catalog(format!(
                            "preset '{}': demo '{}' has invalid screen number {}",
                            preset_id, demo_id, value
                        ))
                    })?,
                    None => None,
                };
                (demo_id, screen_number)
            }
            _ => continue,
        };
        if let Some(fields) = catalog["demos"].get(demo_id).and_then(Value::as_object) {
            demos.push(demo_dto(fields, screen_number));
        }
    }

    Ok((name, demos))
}

fn demo_dto(fields: &Map<String, Value>, screen_number: Option<i64>) -> DemoDto {
    let mut fields = fields.clone();
    fields.remove("screenNumber");
    DemoDto {
        screen_number,
        fields,
    }
}

/// Screen assignments saved by the catalog editor are numbers, numeric
/// strings or empty. `Some(None)` means "all screens"; `None` means the
/// value is not a usable screen number.
fn screen_number_of(value: &Value) -> Option<Option<i64>> {
    let number = match value {
        Value::Null => return Some(None),
        Value::String(s) if s.trim().is_empty() => return Some(None),
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        Value::Number(n) => n.as_i64()?,
        _ => return None,
    };
    (1..=99).contains(&number).then_some(Some(number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Value {
        json!({
            "presets": {
                "finance": {
                    "name": "Finance",
                    "demos": [
                        {"demoId": "fraud", "screenNumber": 3},
                        "risk",
                        {"demoId": "missing", "screenNumber": 1},
                        {"demoId": "risk", "screenNumber": ""}
                    ]
                },
                "retail": {"name": "Retail", "demos": []}
            },
            "demos": {
                "fraud": {"title": "Fraud Detection"},
                "risk": {"title": "Risk Assessment"}
            },
            "presetOrder": ["retail", "finance"]
        })
    }

    #[test]
    fn test_list_presets_follows_preset_order() {
        // テスト項目: presetOrder の順にプリセットが並ぶ
        // given (前提条件):
        let catalog = catalog();

        // when (操作):
        let presets = list_presets(&catalog);

        // then (期待する結果):
        assert_eq!(
            presets,
            vec![
                ("retail".to_string(), "Retail".to_string()),
                ("finance".to_string(), "Finance".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_presets_without_order_uses_keys() {
        // テスト項目: presetOrder が無ければキーの順になる
        // given (前提条件):
        let catalog = json!({"presets": {"a": {"name": "A"}, "b": {}}, "demos": {}});

        // when (操作):
        let presets = list_presets(&catalog);

        // then (期待する結果):
        assert_eq!(
            presets,
            vec![
                ("a".to_string(), "A".to_string()),
                ("b".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_resolve_preset_handles_both_entry_forms() {
        // テスト項目: 文字列 ID とオブジェクト参照の両方を解決し、存在しないデモは除く
        // given (前提条件):
        let catalog = catalog();

        // when (操作):
        let (name, demos) = resolve_preset(&catalog, "finance").unwrap();

        // then (期待する結果):
        assert_eq!(name, "Finance");
        assert_eq!(demos.len(), 3);
        assert_eq!(demos[0].screen_number, Some(3));
        assert_eq!(demos[0].fields["title"], "Fraud Detection");
        assert_eq!(demos[1].screen_number, None);
        assert_eq!(demos[1].fields["title"], "Risk Assessment");
        assert_eq!(demos[2].screen_number, None);
    }

    #[test]
    fn test_resolve_unknown_preset_fails() {
        // テスト項目: 存在しないプリセットはエラー
        // given (前提条件):
        let catalog = catalog();

        // when (操作):
        let result = resolve_preset(&catalog, "nope");

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::Catalog(_))));
    }

    #[test]
    fn test_resolve_demo() {
        // テスト項目: ID でデモを1件引ける
        // given (前提条件):
        let catalog = catalog();

        // when (操作):
        let demo = resolve_demo(&catalog, "risk").unwrap();
        let missing = resolve_demo(&catalog, "nope");

        // then (期待する結果):
        assert_eq!(demo.fields["title"], "Risk Assessment");
        assert!(missing.is_err());
    }

    #[test]
    fn test_resolve_preset_rejects_unparsable_screen() {
        // テスト項目: 数値として読めない画面番号の割り当てがあるとプリセット全体がエラーになる
        // given (前提条件): "3a" は全画面扱いにしてはいけない
        let catalog = json!({
            "presets": {"broken": {"name": "Broken", "demos": [
                "risk",
                {"demoId": "fraud", "screenNumber": "3a"}
            ]}},
            "demos": {
                "fraud": {"title": "Fraud Detection"},
                "risk": {"title": "Risk Assessment"}
            }
        });

        // when (操作):
        let result = resolve_preset(&catalog, "broken");

        // then (期待する結果): エラーメッセージに問題のデモが含まれる
        let message = match result {
            Err(ClientError::Catalog(message)) => message,
            other => panic!("expected a catalog error, got {:?}", other),
        };
        assert!(message.contains("fraud"));
        assert!(message.contains("3a"));
    }

    #[test]
    fn test_screen_number_of() {
        // テスト項目: 画面番号の割り当て値の解釈
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(screen_number_of(&json!(7)), Some(Some(7)));
        assert_eq!(screen_number_of(&json!(" 12 ")), Some(Some(12)));
        assert_eq!(screen_number_of(&json!("")), Some(None));
        assert_eq!(screen_number_of(&Value::Null), Some(None));
        assert_eq!(screen_number_of(&json!("3a")), None);
        assert_eq!(screen_number_of(&json!(0)), None);
        assert_eq!(screen_number_of(&json!(100)), None);
        assert_eq!(screen_number_of(&json!(true)), None);
    }
}
