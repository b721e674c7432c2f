//! WebSocket client sessions.
//!
//! A session lasts for one transport connection. It returns `Ok(())` when the
//! user ends it and an error when the connection is lost or refused.
//! Failures after the handshake are reported as `ClientError::ConnectionLost`.

use std::time::Duration;

use futures_util::{
    SinkExt, Stream, StreamExt,
    stream::{SplitSink, SplitStream},
};
use rustyline::{DefaultEditor, error::ReadlineError};
use serde_json::Value;
use tokio::{
    net::TcpStream,
    sync::mpsc,
    time::{Instant, timeout_at},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, protocol::Message},
};

use seedwall_server::{
    domain::Role,
    infrastructure::dto::websocket::{ClientMessage, ScreenMemberDto, ServerMessage},
};

use crate::{
    catalog::{CatalogClient, list_presets, resolve_demo, resolve_preset},
    command::SeedCommand,
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, Message>;
type WsReader = SplitStream<WsStream>;

const SEED_PROMPT: &str = "seed> ";

async fn send(write: &mut WsWriter, message: &ClientMessage) -> Result<(), ClientError> {
    let json = serde_json::to_string(message)
        .map_err(|e| ClientError::ConnectionError(format!("failed to encode message: {}", e)))?;
    write.send(Message::Text(json.into())).await?;
    Ok(())
}

fn parse_server_message(text: &str) -> Option<ServerMessage> {
    match serde_json::from_str(text) {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::debug!("Unrecognized server message: {}", e);
            None
        }
    }
}

/// Wait for the next frame from the server.
///
/// Silence until `deadline` counts as a wedged transport. The server pings
/// every heartbeat interval, so `deadline` should allow a few of those.
async fn next_frame<S>(read: &mut S, deadline: Instant) -> Result<Message, ClientError>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    match timeout_at(deadline, read.next()).await {
        Ok(Some(frame)) => Ok(frame?),
        Ok(None) => Err(ClientError::ConnectionError("Connection lost".to_string())),
        Err(_) => Err(ClientError::ConnectionError(
            "No message from the server before the idle timeout".to_string(),
        )),
    }
}

/// Run one peer display session bound to `screen_number`
pub async fn run_peer_session(
    url: &str,
    screen_number: i64,
    idle_timeout: Duration,
) -> Result<(), ClientError> {
    let (ws_stream, _) = connect_async(url).await?;
    tracing::info!("Connected to {}", url);

    let (write, read) = ws_stream.split();
    peer_loop(write, read, screen_number, idle_timeout)
        .await
        .map_err(ClientError::after_connect)
}

async fn peer_loop(
    mut write: WsWriter,
    mut read: WsReader,
    screen_number: i64,
    idle_timeout: Duration,
) -> Result<(), ClientError> {
    send(
        &mut write,
        &ClientMessage::SetMode {
            mode: Role::Peer,
            screen_number: Some(screen_number),
            secret: None,
        },
    )
    .await?;
    send(&mut write, &ClientMessage::RegisterScreen { screen_number }).await?;

    loop {
        match next_frame(&mut read, Instant::now() + idle_timeout).await? {
            Message::Text(text) => match parse_server_message(text.as_str()) {
                Some(ServerMessage::Ping) => send(&mut write, &ClientMessage::Pong).await?,
                Some(message) => print!("{}", MessageFormatter::format_server_message(&message)),
                None => print!("{}", MessageFormatter::format_raw_message(text.as_str())),
            },
            Message::Close(_) => {
                return Err(ClientError::ConnectionError(
                    "Server closed the connection".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Spawn a blocking thread for rustyline (synchronous readline).
///
/// The returned channel closes when the user presses Ctrl+C or Ctrl+D.
pub fn spawn_readline() -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(SEED_PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}

/// Settings of the seed console
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub url: String,
    pub api_base: String,
    pub secret: Option<String>,
    /// Give up on a connection that stays silent this long
    pub idle_timeout: Duration,
}

/// Console state kept across commands within one session
struct SeedConsole {
    catalog_client: CatalogClient,
    catalog: Option<Value>,
    screens: Vec<(u8, Vec<ScreenMemberDto>)>,
}

impl SeedConsole {
    async fn catalog(&mut self, refresh: bool) -> Result<&Value, ClientError> {
        if refresh || self.catalog.is_none() {
            self.catalog = Some(self.catalog_client.fetch().await?);
        }
        self.catalog
            .as_ref()
            .ok_or_else(|| ClientError::Catalog("catalog unavailable".to_string()))
    }

    /// Execute one console command; `Ok(false)` ends the session
    async fn execute(
        &mut self,
        command: SeedCommand,
        write: &mut WsWriter,
    ) -> Result<bool, ClientError> {
        match command {
            SeedCommand::Presets => match self.catalog(true).await {
                Ok(catalog) => {
                    let presets = list_presets(catalog);
                    if presets.is_empty() {
                        println!("(No presets)");
                    }
                    for (id, name) in presets {
                        println!("  {} - {}", id, name);
                    }
                }
                Err(e) => println!("{}", e),
            },
            SeedCommand::Select(preset_id) => {
                let resolved = match self.catalog(false).await {
                    Ok(catalog) => resolve_preset(catalog, &preset_id),
                    Err(e) => Err(e),
                };
                match resolved {
                    Ok((preset, demos)) => {
                        send(write, &ClientMessage::SelectPreset { preset, demos }).await?
                    }
                    Err(e) => println!("{}", e),
                }
            }
            SeedCommand::Send {
                screen_number,
                demo_id,
            } => {
                let resolved = match self.catalog(false).await {
                    Ok(catalog) => resolve_demo(catalog, &demo_id),
                    Err(e) => Err(e),
                };
                match resolved {
                    Ok(demo) => {
                        send(
                            write,
                            &ClientMessage::SendIndividualDemo {
                                screen_number,
                                demo,
                            },
                        )
                        .await?
                    }
                    Err(e) => println!("{}", e),
                }
            }
            SeedCommand::Screens => {
                print!("{}", MessageFormatter::format_screens_list(&self.screens))
            }
            SeedCommand::Help => println!("{}", SeedCommand::USAGE),
            SeedCommand::Quit => return Ok(false),
        }
        Ok(true)
    }
}

/// Run one seed console session.
///
/// `input` carries console lines across reconnects; when it closes the
/// session ends normally.
pub async fn run_seed_session(
    options: &SeedOptions,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _) = connect_async(options.url.as_str()).await?;
    tracing::info!("Connected to {}", options.url);

    let (write, read) = ws_stream.split();
    seed_loop(options, write, read, input)
        .await
        .map_err(ClientError::after_connect)
}

async fn seed_loop(
    options: &SeedOptions,
    mut write: WsWriter,
    mut read: WsReader,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {

    send(
        &mut write,
        &ClientMessage::SetMode {
            mode: Role::Seed,
            screen_number: None,
            secret: options.secret.clone(),
        },
    )
    .await?;
    println!("\n{}\n", SeedCommand::USAGE);

    let mut console = SeedConsole {
        catalog_client: CatalogClient::new(&options.api_base),
        catalog: None,
        screens: Vec::new(),
    };

    let mut deadline = Instant::now() + options.idle_timeout;

    loop {
        tokio::select! {
            frame = next_frame(&mut read, deadline) => {
                deadline = Instant::now() + options.idle_timeout;
                match frame? {
                    Message::Text(text) => {
                        match parse_server_message(text.as_str()) {
                            Some(ServerMessage::Ping) => {
                                send(&mut write, &ClientMessage::Pong).await?;
                                continue;
                            }
                            Some(ServerMessage::SeedDenied { message }) => {
                                return Err(ClientError::SeedDenied(message));
                            }
                            Some(message) => {
                                match &message {
                                    ServerMessage::ScreensList { screens } => {
                                        console.screens = screens.clone();
                                    }
                                    ServerMessage::PresetsUpdated { data } => {
                                        console.catalog = Some(data.clone());
                                    }
                                    _ => {}
                                }
                                print!("{}", MessageFormatter::format_server_message(&message));
                            }
                            None => print!("{}", MessageFormatter::format_raw_message(text.as_str())),
                        }
                        redisplay_prompt(SEED_PROMPT);
                    }
                    Message::Close(_) => {
                        return Err(ClientError::ConnectionError(
                            "Server closed the connection".to_string(),
                        ));
                    }
                    _ => {}
                }
            }
            line = input.recv() => {
                let Some(line) = line else {
                    write.close().await.ok();
                    return Ok(());
                };
                match SeedCommand::parse(&line) {
                    Ok(command) => {
                        if !console.execute(command, &mut write).await? {
                            write.close().await.ok();
                            return Ok(());
                        }
                    }
                    Err(e) => println!("{}\n{}", e, SeedCommand::USAGE),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[tokio::test]
    async fn test_next_frame_times_out_on_silent_server() {
        // テスト項目: サーバーから何も届かないまま期限を過ぎると接続エラーになる
        // given (前提条件): 何も流れてこないストリーム
        let mut read = stream::pending::<Result<Message, tungstenite::Error>>();

        // when (操作):
        let result = next_frame(&mut read, Instant::now() + Duration::from_millis(20)).await;

        // then (期待する結果): 再接続対象のエラー
        let error = result.unwrap_err();
        assert!(matches!(error, ClientError::ConnectionError(_)));
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn test_next_frame_returns_frame_before_deadline() {
        // テスト項目: 期限内に届いたフレームはそのまま返される
        // given (前提条件):
        let mut read = stream::iter(vec![Ok::<_, tungstenite::Error>(Message::Text(
            r#"{"type":"ping"}"#.into(),
        ))]);

        // when (操作):
        let frame = next_frame(&mut read, Instant::now() + Duration::from_secs(5)).await;

        // then (期待する結果):
        assert_eq!(frame.unwrap(), Message::Text(r#"{"type":"ping"}"#.into()));
    }

    #[tokio::test]
    async fn test_next_frame_end_of_stream_is_connection_error() {
        // テスト項目: ストリームの終端は接続エラーとして扱われる
        // given (前提条件):
        let mut read = stream::empty::<Result<Message, tungstenite::Error>>();

        // when (操作):
        let result = next_frame(&mut read, Instant::now() + Duration::from_secs(5)).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::ConnectionError(_))));
    }
}
