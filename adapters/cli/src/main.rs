#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Strategic Conquest client.
//!
//! The session driver runs on a tokio runtime while macroquad owns the main
//! thread. The two sides only talk through the driver's request and view
//! channels.

mod config;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use conquest_gateway_http::HttpGateway;
use conquest_rendering::{
    Color, Frame, FrameInput, HexRenderer, Hud, Palette, RenderingBackend, UiAction,
};
use conquest_rendering_macroquad::MacroquadBackend;
use conquest_system_interaction::InputEvent;
use conquest_system_session::{
    channel, GameSession, LogKind, PanelAction, SessionHandle, SessionRequest,
};
use glam::Vec2;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use self::config::Settings;

/// Hex-grid strategy client for a Strategic Conquest server.
#[derive(Debug, Parser)]
#[command(name = "conquest", version)]
struct Cli {
    /// Base URL of the game server.
    #[arg(long)]
    server_url: Option<String>,

    /// TOML file with client settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Map width, in offset columns, for new games.
    #[arg(long)]
    width: Option<u32>,

    /// Map height, in offset rows, for new games.
    #[arg(long)]
    height: Option<u32>,

    /// Hex corner radius in pixels.
    #[arg(long)]
    hex_size: Option<f32>,

    /// Render as fast as possible instead of waiting for vertical sync.
    #[arg(long)]
    no_vsync: bool,

    /// Diagnostics filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_filter: String,

    /// Load this save instead of starting a new game.
    #[arg(long, value_name = "FILENAME")]
    load: Option<String>,
}

impl Cli {
    /// Overrides file settings with the flags given on the command line.
    fn apply(&self, settings: &mut Settings) {
        if let Some(server_url) = &self.server_url {
            settings.server_url = server_url.clone();
        }
        if let Some(width) = self.width {
            settings.map_width = width;
        }
        if let Some(height) = self.height {
            settings.map_height = height;
        }
        if let Some(hex_size) = self.hex_size {
            settings.hex_size = hex_size;
        }
        if self.no_vsync {
            settings.vsync = false;
        }
    }

    fn opening_request(&self) -> SessionRequest {
        let action = match &self.load {
            Some(filename) => PanelAction::Load {
                filename: filename.clone(),
            },
            None => PanelAction::NewGame,
        };
        SessionRequest::Panel(action)
    }
}

/// Entry point for the Strategic Conquest command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    install_tracing(&cli.log_filter)?;

    let mut settings =
        Settings::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply(&mut settings);
    settings.validate().context("invalid configuration")?;
    info!(server = %settings.server_url, "starting client");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("conquest-session")
        .build()
        .context("failed to start async runtime")?;

    let gateway = HttpGateway::new(settings.server_url.clone());
    let (driver, handle) = channel(GameSession::new(gateway, settings.session_config()));
    let driver_task = runtime.spawn(driver.run());
    let _ = submit(&handle, cli.opening_request());

    let shutdown = handle.clone();
    let result = MacroquadBackend::new().run(
        settings.presentation(),
        frame_loop(handle, Palette::default()),
    );

    let _ = submit(&shutdown, SessionRequest::Shutdown);
    if let Err(error) = runtime.block_on(driver_task) {
        warn!(%error, "session driver did not finish cleanly");
    }
    result
}

/// Queues `request`, warning when the driver is no longer listening.
fn submit(handle: &SessionHandle, request: SessionRequest) -> bool {
    let verb = request_name(&request);
    let delivered = handle.send(request);
    if !delivered {
        warn!(request = verb, "session driver stopped; request dropped");
    }
    delivered
}

fn request_name(request: &SessionRequest) -> &'static str {
    match request {
        SessionRequest::Input(_) => "input",
        SessionRequest::Panel(_) => "panel",
        SessionRequest::Viewport(_) => "viewport",
        SessionRequest::Shutdown => "shutdown",
    }
}

fn install_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter `{default_filter}`"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!(error))
        .context("failed to install tracing subscriber")
}

/// Builds the per-frame callback: forwards input to the driver, then paints
/// the latest published view.
fn frame_loop(
    handle: SessionHandle,
    palette: Palette,
) -> impl FnMut(FrameInput, &mut Frame, &mut Hud) + 'static {
    let mut viewport = Vec2::ZERO;
    move |input: FrameInput, frame: &mut Frame, hud: &mut Hud| {
        if input.viewport != viewport {
            viewport = input.viewport;
            let _ = handle.send(SessionRequest::Viewport(viewport));
        }
        for action in input.actions {
            let _ = handle.send(request_for(action));
        }
        if let Some(position) = input.click {
            let _ = handle.send(SessionRequest::Input(InputEvent::Click { position }));
        }

        let view = handle.view();
        let snapshot = view.snapshot.as_deref();
        let renderer = HexRenderer::new(view.layout.with_viewport(viewport), palette);
        renderer.render(snapshot, &view.selection, frame);

        *hud = Hud::compose(snapshot, &view.selection);
        hud.pending = view.pending;
        for entry in view.log {
            hud.push_log(entry.message, log_color(entry.kind));
        }
    }
}

fn request_for(action: UiAction) -> SessionRequest {
    match action {
        UiAction::NewGame => SessionRequest::Panel(PanelAction::NewGame),
        UiAction::EndTurn => SessionRequest::Panel(PanelAction::EndTurn),
        UiAction::Refresh => SessionRequest::Panel(PanelAction::Refresh),
        UiAction::Save => SessionRequest::Panel(PanelAction::Save),
        UiAction::LoadLastSave => SessionRequest::Panel(PanelAction::LoadLastSave),
        UiAction::ArmMove => SessionRequest::Input(InputEvent::ArmMove),
        UiAction::ArmAttack => SessionRequest::Input(InputEvent::ArmAttack),
        UiAction::Deselect => SessionRequest::Input(InputEvent::Deselect),
        UiAction::Produce(unit_type) => SessionRequest::Input(InputEvent::Produce { unit_type }),
    }
}

fn log_color(kind: LogKind) -> Color {
    match kind {
        LogKind::Neutral => Color::from_rgb_u8(0xdd, 0xdd, 0xdd),
        LogKind::Error => Color::from_rgb_u8(0xff, 0x6b, 0x6b),
        LogKind::Combat => Color::from_rgb_u8(0xff, 0xa9, 0x4d),
        LogKind::Victory => Color::from_rgb_u8(0x51, 0xcf, 0x66),
        LogKind::Production => Color::from_rgb_u8(0x74, 0xc0, 0xfc),
    }
}
