//! Seed console commands.

/// One line typed into the seed console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedCommand {
    /// List the catalog presets
    Presets,
    /// Broadcast a preset to every screen
    Select(String),
    /// Send one demo to one screen
    Send { screen_number: i64, demo_id: String },
    /// Show the last topology received
    Screens,
    Help,
    Quit,
}

impl SeedCommand {
    pub const USAGE: &'static str = "commands: presets | select <presetId> | send <screen> <demoId> | screens | help | quit";

    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err("empty command".to_string());
        };
        let rest: Vec<&str> = words.collect();

        match (command, rest.as_slice()) {
            ("presets", []) => Ok(SeedCommand::Presets),
            ("select", [preset_id]) => Ok(SeedCommand::Select(preset_id.to_string())),
            ("send", [screen, demo_id]) => {
                let screen_number = screen
                    .parse()
                    .map_err(|_| format!("'{}' is not a screen number", screen))?;
                Ok(SeedCommand::Send {
                    screen_number,
                    demo_id: demo_id.to_string(),
                })
            }
            ("screens", []) => Ok(SeedCommand::Screens),
            ("help", []) => Ok(SeedCommand::Help),
            ("quit" | "exit", []) => Ok(SeedCommand::Quit),
            _ => Err(format!("unrecognized command '{}'", line.trim())),
        }
    }
}
