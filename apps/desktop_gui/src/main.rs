use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{load_settings, SupabaseStore};
use crossbeam_channel::bounded;
use eframe::egui;
use shared::domain::validate_palette;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::FactasticApp;

#[derive(Parser, Debug)]
struct Args {
    /// Settings file; defaults to ./factastic.toml, then the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    validate_palette().context("category palette is inconsistent")?;
    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);

    match load_settings(args.config.as_deref()) {
        Ok(settings) => backend_bridge::runtime::launch(SupabaseStore::new(settings), cmd_rx, ui_tx),
        Err(err) => {
            tracing::error!("failed to load store settings: {err:#}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: {err:#}"),
            )));
            drop(cmd_rx);
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Factastic")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([820.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Factastic",
        options,
        Box::new(move |_cc| Ok(Box::new(FactasticApp::new(cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow!("desktop ui exited with an error: {err}"))
}
