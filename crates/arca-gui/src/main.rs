mod registry;
mod state;

use std::sync::{Arc, Mutex};
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use arca_core::config;
use arca_core::dirinfo::{DirInfoScheduler, NodeId, NodeView};
use arca_core::remote::{RemoteBrowser, RestClient};

use registry::{normalize_path, NodeRegistry};

slint::slint! {
    import { VerticalBox, HorizontalBox, Button, LineEdit, ScrollView, CheckBox } from "std-widgets.slint";

    export component MainWindow inherits Window {
        in-out property <string> server_url;
        in-out property <string> path_input;
        in-out property <string> current_path;
        in-out property <string> status_text;
        in-out property <string> listing_text;
        in-out property <string> log_text;
        in-out property <bool> sizes_enabled;

        callback open_clicked();
        callback up_clicked();
        callback reset_clicked();
        callback sizes_toggled(bool);

        title: "Arca";
        width: 900px;
        height: 680px;

        VerticalBox {
            padding: 12px;
            spacing: 8px;

            // ── Header ──

            Text {
                text: "Arca Desktop";
                font-size: 26px;
            }

            HorizontalBox {
                spacing: 10px;
                Text { text: "Server:"; }
                Text { text: root.server_url; wrap: word-wrap; }
            }

            HorizontalBox {
                spacing: 10px;
                Text { text: "Status:"; }
                Text { text: root.status_text; wrap: word-wrap; }
            }

            Rectangle {
                height: 1px;
                background: #d5d5d5;
            }

            // ── Browser ──

            HorizontalBox {
                spacing: 8px;
                Text { text: "Path:"; vertical-alignment: center; }
                LineEdit { text <=> root.path_input; }
                Button {
                    text: "Open";
                    clicked => { root.open_clicked(); }
                }
                Button {
                    text: "Up";
                    clicked => { root.up_clicked(); }
                }
                Button {
                    text: "Reset";
                    clicked => { root.reset_clicked(); }
                }
                CheckBox {
                    text: "Directory sizes";
                    checked <=> root.sizes_enabled;
                    toggled => { root.sizes_toggled(self.checked); }
                }
            }

            Text { text: root.current_path; }

            ScrollView {
                vertical-stretch: 1;
                Rectangle {
                    background: #f4f4f4;
                    border-color: #dcdcdc;
                    border-width: 1px;
                    Text {
                        text: root.listing_text;
                        wrap: word-wrap;
                    }
                }
            }

            // ── Footer ──

            Text {
                text: "Activity Log";
                font-size: 16px;
            }
            ScrollView {
                height: 140px;
                Rectangle {
                    background: #f4f4f4;
                    border-color: #dcdcdc;
                    border-width: 1px;
                    Text {
                        text: root.log_text;
                        wrap: word-wrap;
                    }
                }
            }
        }
    }
}

#[derive(Debug)]
enum AppCommand {
    OpenDir { path: String },
    Reset,
    SetSizes { enabled: bool },
}

#[derive(Debug, Clone)]
enum UiEvent {
    Status(String),
    Log(String),
    Listing(String),
    Path(String),
    NodeInfo {
        node: NodeId,
        total_size: u64,
        file_count: u64,
        provisional: bool,
    },
}

/// The scheduler's view of the UI: validity answered from the shared node
/// registry, rendering marshalled through the UI event channel so the
/// mutation itself runs on the event loop.
struct SchedulerBridge {
    registry: Arc<Mutex<NodeRegistry>>,
    ui_tx: Sender<UiEvent>,
}

impl NodeView for SchedulerBridge {
    fn is_valid(&self, node: NodeId) -> bool {
        self.registry.lock().map(|r| r.is_valid(node)).unwrap_or(false)
    }

    fn render(&self, node: NodeId, total_size: u64, file_count: u64, provisional: bool) {
        let _ = self.ui_tx.send(UiEvent::NodeInfo {
            node,
            total_size,
            file_count,
            provisional,
        });
    }
}

fn send_log(ui_tx: &Sender<UiEvent>, message: impl Into<String>) {
    let _ = ui_tx.send(UiEvent::Log(message.into()));
}

fn run_worker(
    cmd_rx: Receiver<AppCommand>,
    ui_tx: Sender<UiEvent>,
    client: Arc<RestClient>,
    scheduler: DirInfoScheduler,
    registry: Arc<Mutex<NodeRegistry>>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            AppCommand::OpenDir { path } => {
                let path = normalize_path(&path);
                if !arca_protocol::is_valid_remote_path(&path) {
                    send_log(&ui_tx, format!("Invalid path: '{path}'"));
                    continue;
                }

                let _ = ui_tx.send(UiEvent::Status(format!("Listing {path}...")));
                match client.list_dir(&path) {
                    Err(e) => {
                        send_log(&ui_tx, format!("Listing {path} failed: {e}"));
                        let _ = ui_tx.send(UiEvent::Status("Idle".to_string()));
                    }
                    Ok(mut entries) => {
                        entries.sort_by(|a, b| {
                            b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name))
                        });

                        // New browsing context: queued lookups for the old
                        // listing are moot.
                        scheduler.clear();

                        let listing = match registry.lock() {
                            Ok(mut reg) => {
                                reg.reset(&path);
                                for entry in &entries {
                                    let node = reg.insert(entry);
                                    if entry.is_dir {
                                        scheduler.submit(&reg.child_path(&entry.name), node);
                                    }
                                }
                                reg.render_listing()
                            }
                            Err(_) => continue,
                        };

                        let _ = ui_tx.send(UiEvent::Path(path.clone()));
                        let _ = ui_tx.send(UiEvent::Listing(listing));
                        let _ = ui_tx.send(UiEvent::Status("Idle".to_string()));
                        send_log(&ui_tx, format!("Listed {path}: {} entries", entries.len()));
                    }
                }
            }
            AppCommand::Reset => {
                scheduler.clear();
                if let Ok(mut reg) = registry.lock() {
                    reg.reset("/");
                }
                let _ = ui_tx.send(UiEvent::Path("/".to_string()));
                let _ = ui_tx.send(UiEvent::Listing(String::new()));
                send_log(&ui_tx, "Browser reset; pending size lookups abandoned.");
            }
            AppCommand::SetSizes { enabled } => {
                scheduler.set_enabled(enabled);
                send_log(
                    &ui_tx,
                    if enabled {
                        "Directory sizes enabled."
                    } else {
                        "Directory sizes disabled."
                    },
                );
            }
        }
    }
}

const MAX_LOG_LINES: usize = 200;

fn append_log(ui: &MainWindow, line: &str) {
    let current = ui.get_log_text();
    let mut lines: Vec<&str> = current.as_str().lines().collect();
    lines.push(line);
    let start = lines.len().saturating_sub(MAX_LOG_LINES);
    ui.set_log_text(lines[start..].join("\n").into());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("ARCA_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_target(false)
        .init();

    let (config, config_path) = config::load(None)?;
    if let Some(path) = &config_path {
        tracing::info!("loaded config from {}", path.display());
    }
    let gui_state = state::GuiState::load();

    // Without a config file, fall back to the server used last session.
    let server_url = match (&config_path, gui_state.server_url) {
        (None, Some(url)) => url,
        _ => config.server.url.clone(),
    };

    let client = Arc::new(RestClient::new(
        &server_url,
        config.server.token.as_deref(),
    ));
    let registry = Arc::new(Mutex::new(NodeRegistry::new()));

    let (app_tx, app_rx) = crossbeam_channel::unbounded::<AppCommand>();
    let (ui_tx, ui_rx) = crossbeam_channel::unbounded::<UiEvent>();

    let bridge = Arc::new(SchedulerBridge {
        registry: registry.clone(),
        ui_tx: ui_tx.clone(),
    });
    let scheduler = DirInfoScheduler::spawn(&config.dir_info, client.clone(), bridge);

    thread::spawn({
        let ui_tx = ui_tx.clone();
        let registry = registry.clone();
        move || run_worker(app_rx, ui_tx, client, scheduler, registry)
    });

    let ui = MainWindow::new()?;
    ui.set_server_url(server_url.into());
    ui.set_status_text("Idle".into());
    ui.set_sizes_enabled(config.dir_info.enabled);
    let start_path = gui_state.last_path.unwrap_or_else(|| "/".to_string());
    ui.set_path_input(start_path.clone().into());
    ui.set_current_path(start_path.clone().into());
    if let (Some(w), Some(h)) = (gui_state.window_width, gui_state.window_height) {
        ui.window().set_size(slint::LogicalSize::new(w, h));
    }

    let ui_weak_for_events = ui.as_weak();
    let registry_for_events = registry.clone();
    thread::spawn(move || {
        while let Ok(event) = ui_rx.recv() {
            let ui_weak = ui_weak_for_events.clone();
            let registry = registry_for_events.clone();
            let _ = slint::invoke_from_event_loop(move || {
                let Some(ui) = ui_weak.upgrade() else {
                    return;
                };

                match event {
                    UiEvent::Status(status) => ui.set_status_text(status.into()),
                    UiEvent::Log(line) => append_log(&ui, &line),
                    UiEvent::Listing(text) => ui.set_listing_text(text.into()),
                    UiEvent::Path(path) => {
                        ui.set_current_path(path.clone().into());
                        ui.set_path_input(path.into());
                    }
                    UiEvent::NodeInfo {
                        node,
                        total_size,
                        file_count,
                        provisional,
                    } => {
                        let Ok(mut reg) = registry.lock() else {
                            return;
                        };
                        // The node can vanish between the worker's dispatch
                        // and this closure running on the event loop.
                        if !reg.is_valid(node) {
                            return;
                        }
                        reg.set_summary(node, total_size, file_count, provisional);
                        ui.set_listing_text(reg.render_listing().into());
                    }
                }
            });
        }
    });

    let tx = app_tx.clone();
    let ui_weak = ui.as_weak();
    ui.on_open_clicked(move || {
        let Some(ui) = ui_weak.upgrade() else {
            return;
        };
        let _ = tx.send(AppCommand::OpenDir {
            path: ui.get_path_input().to_string(),
        });
    });

    let tx = app_tx.clone();
    let ui_weak = ui.as_weak();
    ui.on_up_clicked(move || {
        let Some(ui) = ui_weak.upgrade() else {
            return;
        };
        let _ = tx.send(AppCommand::OpenDir {
            path: registry::parent_path(&ui.get_current_path()),
        });
    });

    let tx = app_tx.clone();
    ui.on_reset_clicked(move || {
        let _ = tx.send(AppCommand::Reset);
    });

    let tx = app_tx.clone();
    ui.on_sizes_toggled(move |enabled| {
        let _ = tx.send(AppCommand::SetSizes { enabled });
    });

    // Open the remembered directory once everything is wired up.
    let _ = app_tx.send(AppCommand::OpenDir {
        path: start_path,
    });

    let ui_weak = ui.as_weak();
    ui.window().on_close_requested(move || {
        if let Some(ui) = ui_weak.upgrade() {
            let size = ui.window().size().to_logical(ui.window().scale_factor());
            state::GuiState {
                server_url: Some(ui.get_server_url().to_string()),
                last_path: Some(ui.get_current_path().to_string()),
                window_width: Some(size.width),
                window_height: Some(size.height),
            }
            .save();
        }
        let _ = slint::quit_event_loop();
        slint::CloseRequestResponse::HideWindow
    });

    ui.run()?;
    Ok(())
}
