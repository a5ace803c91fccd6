use std::thread;

use clap::Parser;
use client_core::{BattleSession, SessionEvent, DEFAULT_SERVER_URL};
use crossbeam_channel::{bounded, Receiver, Sender};
use egui::ViewportBuilder;

mod app;
mod commands;
mod events;

use app::BattleGuiApp;
use commands::BackendCommand;
use events::UiEvent;

#[derive(Parser, Debug)]
struct Args {
    /// Poll server websocket endpoint.
    #[arg(long, env = "BATTLE_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
}

fn spawn_backend_thread(
    server_url: String,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "failed to build backend runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let (session, mut events) = BattleSession::open(&server_url);

            let ui_tx_events = ui_tx.clone();
            tokio::spawn(async move {
                // recv_event rides out broadcast lag; only a Closed event
                // (or a spent channel) ends the forwarder.
                while let Some(event) = client_core::recv_event(&mut events).await {
                    let ended = matches!(event, SessionEvent::Closed { .. });
                    let _ = ui_tx_events.try_send(UiEvent::Session(event));
                    if ended {
                        break;
                    }
                }
            });

            // recv() errors when the UI drops its sender on shutdown.
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::CastVote { kind, idx } => {
                        if let Err(err) = session.send_vote(kind, idx).await {
                            let _ = ui_tx.try_send(UiEvent::VoteFailed(err.to_string()));
                        }
                    }
                }
            }
            session.close().await;
        });
    });
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    spawn_backend_thread(args.server_url.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("Battle Poll")
            .with_inner_size([520.0, 680.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Battle Poll",
        options,
        Box::new(move |_cc| Ok(Box::new(BattleGuiApp::new(args.server_url, cmd_tx, ui_rx)))),
    )
}
