// Interactive browser over a single task export
mod app;
mod events;
mod layout;
mod rendering;
mod terminal;
pub(crate) mod timestamps;

use std::path::PathBuf;

use anyhow::Result;
pub use app::App;
use tracing::info;

use self::terminal::TerminalManager;
use crate::parsers::parse_task_csv;
use crate::session::ExplorerSession;

/// Load `source` and run the interactive browser until the user quits
pub fn run_interactive(source: PathBuf, page_size: usize) -> Result<()> {
    let records = parse_task_csv(&source)?;
    let session = ExplorerSession::with_records(records, page_size);
    info!(path = %source.display(), "starting interactive browser");

    let mut app = App::new(session, Some(source));
    let mut manager = TerminalManager::new()?;

    let res = app.run(manager.terminal_mut());
    manager.restore()?;

    res
}
