//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    ConnectionId, Demo, Notice, ScreenEntry, ScreenNumber, Selection, ValueObjectError,
};
use crate::infrastructure::dto::websocket::{
    DemoDto, PresetDto, ScreenMemberDto, ServerMessage,
};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<DemoDto> for Demo {
    type Error = ValueObjectError;

    fn try_from(dto: DemoDto) -> Result<Self, Self::Error> {
        let screen = dto.screen_number.map(ScreenNumber::try_from).transpose()?;
        Ok(Demo::new(dto.fields, screen))
    }
}

impl TryFrom<PresetDto> for Selection {
    type Error = ValueObjectError;

    fn try_from(dto: PresetDto) -> Result<Self, Self::Error> {
        let demos = dto
            .demos
            .into_iter()
            .map(Demo::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Selection::new(dto.name, demos))
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Demo> for DemoDto {
    fn from(model: &Demo) -> Self {
        Self {
            screen_number: model.screen.map(i64::from),
            fields: model.fields.clone(),
        }
    }
}

impl From<&Selection> for PresetDto {
    fn from(model: &Selection) -> Self {
        Self {
            name: model.name.clone(),
            demos: model.demos.iter().map(DemoDto::from).collect(),
        }
    }
}

/// `[screenNumber, [members...]]` pair of a `screensList` message
pub fn screen_entry_to_dto(entry: &ScreenEntry) -> (u8, Vec<ScreenMemberDto>) {
    (
        entry.screen.value(),
        entry
            .members
            .iter()
            .map(|member| ScreenMemberDto {
                online: member.online,
                client_id: member.id.as_str().to_string(),
            })
            .collect(),
    )
}

fn client_id_string(id: &ConnectionId) -> String {
    id.as_str().to_string()
}

impl From<&Notice> for ServerMessage {
    fn from(notice: &Notice) -> Self {
        match notice {
            Notice::Connected {
                client_id,
                current_preset,
                counts,
            } => ServerMessage::Connected {
                client_id: client_id_string(client_id),
                current_preset: current_preset.as_ref().map(PresetDto::from),
                peers_count: counts.peers,
                registered_screens: counts.screens,
            },
            Notice::PresetSelected {
                name,
                demos,
                screen,
            } => ServerMessage::PresetSelected {
                preset: name.clone(),
                demos: demos.iter().map(DemoDto::from).collect(),
                screen_number: screen.map(|s| s.value()),
            },
            Notice::DemoSent { demo, screen } => ServerMessage::DemoSent {
                demo: DemoDto::from(demo),
                screen_number: screen.value(),
                individual: true,
            },
            Notice::PeersCount(count) => ServerMessage::PeersCount { count: *count },
            Notice::RegisteredScreens(count) => ServerMessage::RegisteredScreens { count: *count },
            Notice::ScreensList(entries) => ServerMessage::ScreensList {
                screens: entries.iter().map(screen_entry_to_dto).collect(),
            },
            Notice::RegistrationConfirmed(screen) => ServerMessage::RegistrationConfirmed {
                screen_number: screen.value(),
            },
            Notice::RegistrationError(message) => ServerMessage::RegistrationError {
                message: message.clone(),
            },
            Notice::SeedTakenOver => ServerMessage::SeedTakenOver {
                message: Notice::SEED_TAKEN_OVER_MESSAGE.to_string(),
            },
            Notice::SeedDenied(message) => ServerMessage::SeedDenied {
                message: message.clone(),
            },
            Notice::PresetsUpdated(catalog) => ServerMessage::PresetsUpdated {
                data: catalog.as_value().clone(),
            },
            Notice::Ping => ServerMessage::Ping,
            Notice::Pong => ServerMessage::Pong,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ScreenMember, TopologyCounts};
    use serde_json::{Map, json};

    fn fields(title: &str) -> Map<String, serde_json::Value> {
        let mut fields = Map::new();
        fields.insert("title".to_string(), json!(title));
        fields
    }

    #[test]
    fn test_dto_demo_to_domain() {
        // テスト項目: DTO の DemoDto がドメインの Demo に変換される
        // given (前提条件):
        let dto = DemoDto {
            screen_number: Some(4),
            fields: fields("fraud-detection"),
        };

        // when (操作):
        let demo = Demo::try_from(dto).unwrap();

        // then (期待する結果):
        assert_eq!(demo.screen, Some(ScreenNumber::new(4).unwrap()));
        assert_eq!(demo.title(), Some("fraud-detection"));
    }

    #[test]
    fn test_dto_demo_with_out_of_range_screen_is_rejected() {
        // テスト項目: 範囲外の screenNumber を持つデモは変換に失敗する
        // given (前提条件):
        let dto = DemoDto {
            screen_number: Some(0),
            fields: fields("x"),
        };

        // when (操作):
        let result = Demo::try_from(dto);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::ScreenNumberOutOfRange(0)));
    }

    #[test]
    fn test_dto_preset_to_selection_fails_on_any_bad_demo() {
        // テスト項目: 1つでも不正なデモがあればプリセット全体が不正になる
        // given (前提条件):
        let dto = PresetDto {
            name: "Finance".to_string(),
            demos: vec![
                DemoDto {
                    screen_number: None,
                    fields: fields("ok"),
                },
                DemoDto {
                    screen_number: Some(120),
                    fields: fields("bad"),
                },
            ],
        };

        // when (操作):
        let result = Selection::try_from(dto);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::ScreenNumberOutOfRange(120)));
    }

    #[test]
    fn test_connected_notice_to_dto() {
        // テスト項目: Connected 通知が connected メッセージに変換される
        // given (前提条件):
        let id = ConnectionId::new("abc".to_string()).unwrap();
        let notice = Notice::Connected {
            client_id: id,
            current_preset: None,
            counts: TopologyCounts {
                peers: 2,
                screens: 1,
            },
        };

        // when (操作):
        let value = serde_json::to_value(ServerMessage::from(&notice)).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "type": "connected",
                "clientId": "abc",
                "currentPreset": null,
                "peersCount": 2,
                "registeredScreens": 1
            })
        );
    }

    #[test]
    fn test_demo_sent_notice_carries_individual_marker() {
        // テスト項目: 個別送信には individual マーカーが付く
        // given (前提条件):
        let notice = Notice::DemoSent {
            demo: Demo::new(fields("solo"), None),
            screen: ScreenNumber::new(6).unwrap(),
        };

        // when (操作):
        let value = serde_json::to_value(ServerMessage::from(&notice)).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "type": "demoSent",
                "demo": {"title": "solo"},
                "screenNumber": 6,
                "individual": true
            })
        );
    }

    #[test]
    fn test_screens_list_notice_to_dto() {
        // テスト項目: ScreensList 通知のメンバー情報が変換される
        // given (前提条件):
        let notice = Notice::ScreensList(vec![ScreenEntry {
            screen: ScreenNumber::new(3).unwrap(),
            members: vec![ScreenMember {
                id: ConnectionId::new("p1".to_string()).unwrap(),
                online: false,
            }],
        }]);

        // when (操作):
        let message = ServerMessage::from(&notice);

        // then (期待する結果):
        assert_eq!(
            message,
            ServerMessage::ScreensList {
                screens: vec![(
                    3,
                    vec![ScreenMemberDto {
                        online: false,
                        client_id: "p1".to_string(),
                    }]
                )]
            }
        );
    }
}
