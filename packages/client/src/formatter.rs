//! Message formatting utilities for client display.

use seedwall_server::infrastructure::dto::websocket::{DemoDto, ScreenMemberDto, ServerMessage};
use seedwall_shared::time::{get_timestamp, timestamp_to_rfc3339};

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any server message for the terminal
    pub fn format_server_message(message: &ServerMessage) -> String {
        match message {
            ServerMessage::Connected {
                client_id,
                current_preset,
                peers_count,
                registered_screens,
            } => Self::format_connected(
                client_id,
                current_preset.as_ref().map(|preset| preset.name.as_str()),
                *peers_count,
                *registered_screens,
            ),
            ServerMessage::PresetSelected {
                preset,
                demos,
                screen_number,
            } => Self::format_preset_selected(preset, demos, *screen_number),
            ServerMessage::DemoSent {
                demo,
                screen_number,
                ..
            } => Self::format_demo_sent(demo, *screen_number),
            ServerMessage::PeersCount { count } => format!("\n· peers connected: {}\n", count),
            ServerMessage::RegisteredScreens { count } => {
                format!("\n· screens registered: {}\n", count)
            }
            ServerMessage::ScreensList { screens } => Self::format_screens_list(screens),
            ServerMessage::RegistrationConfirmed { screen_number } => {
                format!("\n✓ registered as screen {}\n", screen_number)
            }
            ServerMessage::RegistrationError { message } => {
                format!("\n✗ registration failed: {}\n", message)
            }
            ServerMessage::SeedTakenOver { message } => format!("\n! {}\n", message),
            ServerMessage::SeedDenied { message } => format!("\n✗ seed role denied: {}\n", message),
            ServerMessage::PresetsUpdated { .. } => "\n· catalog updated\n".to_string(),
            ServerMessage::Ping | ServerMessage::Pong => String::new(),
        }
    }

    pub fn format_connected(
        client_id: &str,
        current_preset: Option<&str>,
        peers_count: usize,
        registered_screens: usize,
    ) -> String {
        format!(
            "\n{}\nConnected as {} at {}\npeers: {}, screens: {}, current preset: {}\n{}\n",
            RULE,
            client_id,
            timestamp_to_rfc3339(get_timestamp()),
            peers_count,
            registered_screens,
            current_preset.unwrap_or("(none)"),
            RULE
        )
    }

    /// Format a broadcast selection as received by a display
    pub fn format_preset_selected(
        preset: &str,
        demos: &[DemoDto],
        screen_number: Option<u8>,
    ) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        match screen_number {
            Some(screen) => output.push_str(&format!("Preset: {} (screen {})\n", preset, screen)),
            None => output.push_str(&format!("Preset: {}\n", preset)),
        }

        if demos.is_empty() {
            output.push_str("(No demos)\n");
        } else {
            for demo in demos {
                output.push_str(&format!("  - {}\n", Self::demo_label(demo)));
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a directed send, marked so it stands out from broadcasts
    pub fn format_demo_sent(demo: &DemoDto, screen_number: u8) -> String {
        format!(
            "\n\n>>> [individual] screen {}: {}\n",
            screen_number,
            Self::demo_label(demo)
        )
    }

    /// Format the topology snapshot sent to the seed
    pub fn format_screens_list(screens: &[(u8, Vec<ScreenMemberDto>)]) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\nScreens:\n", RULE));

        if screens.is_empty() {
            output.push_str("(No screens)\n");
        } else {
            for (screen_number, members) in screens {
                let online = members.iter().filter(|member| member.online).count();
                let status = if online > 0 { "online" } else { "offline" };
                output.push_str(&format!(
                    "  screen {:>2}: {} ({} clients)\n",
                    screen_number,
                    status,
                    members.len()
                ));
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    fn demo_label(demo: &DemoDto) -> String {
        let title = demo
            .fields
            .get("title")
            .and_then(|title| title.as_str())
            .unwrap_or("(untitled)");
        match demo.fields.get("url").and_then(|url| url.as_str()) {
            Some(url) => format!("{} <{}>", title, url),
            None => title.to_string(),
        }
    }
}
