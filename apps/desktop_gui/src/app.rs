use client_core::{board::BattleBoard, ConnectionState, SessionEvent};
use crossbeam_channel::{Receiver, Sender};
use shared::protocol::VoteKind;

use crate::commands::{dispatch_backend_command, BackendCommand};
use crate::events::UiEvent;

pub struct BattleGuiApp {
    server_url: String,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    board: BattleBoard,
    connection: ConnectionState,
    status: String,
}

impl BattleGuiApp {
    pub fn new(
        server_url: String,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            server_url,
            cmd_tx,
            ui_rx,
            board: BattleBoard::default(),
            connection: ConnectionState::Connecting,
            status: String::new(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Session(SessionEvent::Opened) => {
                    self.connection = ConnectionState::Open;
                    self.status.clear();
                }
                UiEvent::Session(SessionEvent::Update(update)) => self.board.apply(&update),
                UiEvent::Session(SessionEvent::ProtocolError(err)) => {
                    self.status = format!("Ignored unusable server frame: {err}");
                }
                UiEvent::Session(SessionEvent::Closed { clean }) => {
                    self.connection = ConnectionState::Closed;
                    self.status = if clean {
                        "Connection closed by the server".to_string()
                    } else {
                        "Connection lost".to_string()
                    };
                }
                UiEvent::VoteFailed(err) => self.status = format!("Vote not sent: {err}"),
                UiEvent::BackendFailed(err) => {
                    self.connection = ConnectionState::Closed;
                    self.status = err;
                }
            }
        }
    }

    fn connection_label(&self) -> &'static str {
        match self.connection {
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Open => "Connected",
            ConnectionState::Closed => "Disconnected",
        }
    }
}

impl eframe::App for BattleGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            ui.label(format!("{} — {}", self.connection_label(), self.server_url));
            if !self.status.is_empty() {
                ui.colored_label(egui::Color32::YELLOW, &self.status);
            }
        });

        let can_vote = self.connection == ConnectionState::Open;
        let mut pending_vote: Option<(VoteKind, usize)> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Moves");
            ui.horizontal_wrapped(|ui| {
                for choice in &self.board.moves {
                    let button = egui::Button::new(&choice.label);
                    if ui.add_enabled(can_vote && !choice.disabled, button).clicked() {
                        pending_vote = Some((VoteKind::Move, choice.idx));
                    }
                }
            });

            ui.separator();
            ui.heading("Switch");
            ui.horizontal_wrapped(|ui| {
                for choice in &self.board.switches {
                    let button = egui::Button::new(&choice.label);
                    if ui.add_enabled(can_vote && !choice.disabled, button).clicked() {
                        pending_vote = Some((VoteKind::Switch, choice.idx));
                    }
                }
            });

            ui.separator();
            // Carried from the original layout; never populated.
            ui.heading("Tera");

            ui.separator();
            ui.heading("Messages");
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.monospace(&self.board.message);
            });
        });

        if let Some((kind, idx)) = pending_vote {
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::CastVote { kind, idx },
                &mut self.status,
            );
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
