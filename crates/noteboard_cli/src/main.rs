//! Headless driver for the noteboard editor.
//!
//! # Responsibility
//! - Wire an editor session from command-line options.
//! - Replay a short scripted editing session and print what a UI would show.

use clap::Parser;
use log::info;
use noteboard_core::{
    core_version, default_log_level, init_logging, HeadlessSurface, Session, SessionConfig,
    WidgetKind,
};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Parser)]
#[command(
    name = "noteboard",
    version,
    about = "Replay a scripted note-editing session against a headless surface"
)]
struct Cli {
    /// Selection watcher cadence in milliseconds.
    #[arg(long, default_value_t = noteboard_core::config::DEFAULT_POLL_INTERVAL_MS)]
    poll_interval_ms: u64,

    /// Note database file (in-memory when omitted).
    #[arg(long)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files (logging off when omitted).
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long, default_value_t = default_log_level().to_string())]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> SessionConfig {
        SessionConfig {
            poll_interval_ms: self.poll_interval_ms,
            log_level: self.log_level,
            log_dir: self.log_dir,
            db_path: self.db,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Cli::parse().into_config();
    config.validate()?;
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(&config.log_level, log_dir)?;
    }

    println!("noteboard_core version={}", core_version());
    let surface = Arc::new(HeadlessSurface::new());
    let session = Session::open(&config, surface.clone())?;
    let widgets = session.editor.widgets();
    print_surface("restored", &surface);

    widgets.add.click();
    widgets.title.type_text("Groceries");
    widgets.content.type_text("milk, eggs, bread");
    print_surface("edited", &surface);
    println!("save -> {:?}", widgets.save.click()?);

    widgets.add.click();
    widgets.title.type_text("Meeting notes");
    println!("save -> {:?}", widgets.save.click()?);

    widgets.filter.type_query("groc");
    print_surface("filtered `groc`", &surface);
    widgets.filter.type_query("");

    widgets.list.clear_selection();
    thread::sleep(config.poll_interval() * 2);
    print_surface("selection cleared", &surface);

    widgets.list.select(0);
    widgets.delete.click();
    print_surface("deleted first", &surface);

    session.close();
    for note in session.store.list_notes()? {
        println!("stored {} {:?}", note.id, note.title);
    }
    info!("event=cli_replay module=cli status=ok");
    Ok(())
}

fn print_surface(step: &str, surface: &HeadlessSurface) {
    let visible = |widget| match surface.is_visible(widget) {
        Some(true) => "shown",
        Some(false) => "hidden",
        None => "-",
    };
    println!("[{step}]");
    println!("  rows: {:?} selected={:?}", surface.row_labels(), surface.selected());
    println!(
        "  title={:?} content={:?}",
        surface.text(WidgetKind::TitleEditor).unwrap_or_default(),
        surface.text(WidgetKind::ContentEditor).unwrap_or_default()
    );
    println!(
        "  save={} editors={} placeholder={}",
        visible(WidgetKind::SaveControl),
        visible(WidgetKind::TitleEditor),
        visible(WidgetKind::EmptyPlaceholder)
    );
}
