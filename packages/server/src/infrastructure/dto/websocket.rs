//! WebSocket message DTOs.
//!
//! Every message is a JSON object with a `type` discriminator and camelCase
//! fields.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

use crate::domain::Role;

/// Messages sent by a client to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    SetMode {
        mode: Role,
        #[serde(
            default,
            deserialize_with = "optional_screen_number",
            skip_serializing_if = "Option::is_none"
        )]
        screen_number: Option<i64>,
        /// Shared secret required to take the seed role, when configured
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secret: Option<String>,
    },
    RegisterScreen {
        #[serde(deserialize_with = "screen_number")]
        screen_number: i64,
    },
    SelectPreset {
        preset: String,
        #[serde(default)]
        demos: Vec<DemoDto>,
    },
    SendIndividualDemo {
        #[serde(deserialize_with = "screen_number")]
        screen_number: i64,
        demo: DemoDto,
    },
    Ping,
    Pong,
}

/// Messages sent by the server to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Connected {
        client_id: String,
        current_preset: Option<PresetDto>,
        peers_count: usize,
        registered_screens: usize,
    },
    PresetSelected {
        preset: String,
        demos: Vec<DemoDto>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        screen_number: Option<u8>,
    },
    DemoSent {
        demo: DemoDto,
        screen_number: u8,
        /// Always `true`; lets displays tell a directed send from a broadcast
        individual: bool,
    },
    PeersCount {
        count: usize,
    },
    RegisteredScreens {
        count: usize,
    },
    ScreensList {
        screens: Vec<(u8, Vec<ScreenMemberDto>)>,
    },
    RegistrationConfirmed {
        screen_number: u8,
    },
    RegistrationError {
        message: String,
    },
    SeedTakenOver {
        message: String,
    },
    SeedDenied {
        message: String,
    },
    PresetsUpdated {
        data: Value,
    },
    Ping,
    Pong,
}

/// A demo as carried on the wire: the catalog item fields plus an optional
/// target screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoDto {
    #[serde(
        rename = "screenNumber",
        default,
        deserialize_with = "optional_screen_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub screen_number: Option<i64>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetDto {
    pub name: String,
    pub demos: Vec<DemoDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenMemberDto {
    pub online: bool,
    pub client_id: String,
}

/// Screen numbers arrive as numbers or, from HTML form controls, as numeric
/// strings. Empty strings and null mean "not set".
fn optional_screen_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("screen number {n} is not an integer"))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("screen number '{s}' is not an integer"))),
        Some(other) => Err(de::Error::custom(format!(
            "screen number must be a number, got {other}"
        ))),
    }
}

fn screen_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    optional_screen_number(deserializer)?
        .ok_or_else(|| de::Error::custom("screen number is required"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_set_mode_with_null_screen() {
        // テスト項目: screenNumber が null の setMode を解釈できる
        // given (前提条件):
        let text = r#"{"type":"setMode","mode":"peer","screenNumber":null}"#;

        // when (操作):
        let message: ClientMessage = serde_json::from_str(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            message,
            ClientMessage::SetMode {
                mode: Role::Peer,
                screen_number: None,
                secret: None,
            }
        );
    }

    #[test]
    fn test_parse_register_screen_accepts_numeric_string() {
        // テスト項目: 文字列の screenNumber も数値として解釈される
        // given (前提条件):
        let text = r#"{"type":"registerScreen","screenNumber":"12"}"#;

        // when (操作):
        let message: ClientMessage = serde_json::from_str(text).unwrap();

        // then (期待する結果):
        assert_eq!(message, ClientMessage::RegisterScreen { screen_number: 12 });
    }

    #[test]
    fn test_parse_register_screen_keeps_out_of_range_value() {
        // テスト項目: 範囲外の番号もパースは成功し、検証はユースケースに委ねられる
        // given (前提条件):
        let text = r#"{"type":"registerScreen","screenNumber":100}"#;

        // when (操作):
        let message: ClientMessage = serde_json::from_str(text).unwrap();

        // then (期待する結果):
        assert_eq!(message, ClientMessage::RegisterScreen { screen_number: 100 });
    }

    #[test]
    fn test_parse_select_preset_demos() {
        // テスト項目: デモの任意フィールドと screenNumber が分離して保持される
        // given (前提条件):
        let text = r#"{
            "type":"selectPreset",
            "preset":"Finance",
            "demos":[
                {"title":"fraud-detection","url":"https://example.com/f","screenNumber":3},
                {"title":"risk-assessment","screenNumber":""}
            ]
        }"#;

        // when (操作):
        let message: ClientMessage = serde_json::from_str(text).unwrap();

        // then (期待する結果):
        let ClientMessage::SelectPreset { preset, demos } = message else {
            panic!("expected selectPreset");
        };
        assert_eq!(preset, "Finance");
        assert_eq!(demos[0].screen_number, Some(3));
        assert_eq!(demos[0].fields["url"], json!("https://example.com/f"));
        assert!(!demos[0].fields.contains_key("screenNumber"));
        assert_eq!(demos[1].screen_number, None);
    }

    #[test]
    fn test_parse_unknown_type_fails() {
        // テスト項目: 未知の type はパースエラーになる
        // given (前提条件):
        let text = r#"{"type":"launchMissiles"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientMessage>(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_pong() {
        // テスト項目: pong メッセージを解釈できる
        // given (前提条件):
        let text = r#"{"type":"pong"}"#;

        // when (操作):
        let message: ClientMessage = serde_json::from_str(text).unwrap();

        // then (期待する結果):
        assert_eq!(message, ClientMessage::Pong);
    }

    #[test]
    fn test_serialize_screens_list_as_nested_arrays() {
        // テスト項目: screensList は [[番号, [メンバー...]], ...] の形式になる
        // given (前提条件):
        let message = ServerMessage::ScreensList {
            screens: vec![(
                7,
                vec![ScreenMemberDto {
                    online: true,
                    client_id: "abc".to_string(),
                }],
            )],
        };

        // when (操作):
        let value = serde_json::to_value(&message).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type":"screensList","screens":[[7,[{"online":true,"clientId":"abc"}]]]})
        );
    }

    #[test]
    fn test_serialize_preset_selected_omits_missing_screen() {
        // テスト項目: screenNumber 無しの presetSelected ではフィールドが省略される
        // given (前提条件):
        let message = ServerMessage::PresetSelected {
            preset: "Finance".to_string(),
            demos: vec![],
            screen_number: None,
        };

        // when (操作):
        let value = serde_json::to_value(&message).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type":"presetSelected","preset":"Finance","demos":[]})
        );
    }
}
