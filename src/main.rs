use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use legislative_dashboard::app::{App, Focus};
use legislative_dashboard::data::{CellPolicy, DatasetCache, DEFAULT_DATA_PATH};
use legislative_dashboard::pages::{self, AnalysisType, Page, Selection};
use legislative_dashboard::ui;
use legislative_dashboard::view::View;
use log::{info, LevelFilter};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// French legislative election second round analysis dashboard
#[derive(Parser, Debug)]
#[command(name = "legislative-dashboard")]
#[command(author, version, about)]
struct Cli {
    /// Semicolon-delimited results file
    #[arg(short, long, value_name = "CSV", default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Page to open, e.g. "National Analysis"
    #[arg(short, long, value_name = "PAGE", default_value = "Homepage")]
    page: String,

    /// Analysis type on the national page
    #[arg(short, long, value_name = "TYPE", default_value = "Vote Analysis")]
    analysis: String,

    /// Count empty or non-numeric cells as zero instead of failing
    #[arg(long)]
    zero_fill: bool,

    /// Print the selected page as text and exit
    #[arg(long)]
    print: bool,

    /// Write logs to this file (the terminal belongs to the dashboard)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn selection(&self) -> Result<Selection> {
        let page = Page::from_label(&self.page)
            .ok_or_else(|| anyhow!("unknown page {:?}", self.page))?;
        let analysis = AnalysisType::from_label(&self.analysis)
            .ok_or_else(|| anyhow!("unknown analysis type {:?}", self.analysis))?;
        Ok(Selection { page, analysis })
    }

    fn policy(&self) -> CellPolicy {
        if self.zero_fill {
            CellPolicy::ZeroFill
        } else {
            CellPolicy::Strict
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder
                .filter_level(LevelFilter::Info)
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
        // Warnings on stderr for --print; the dashboard owns the terminal
        // otherwise, so it stays quiet unless RUST_LOG says so
        None if cli.print => {
            builder.filter_level(LevelFilter::Warn);
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.parse_default_env().init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let selection = cli.selection()?;
    let data = Arc::new(DatasetCache::new(&cli.data));

    if cli.print {
        let view = pages::render(&selection, &*data, cli.policy());
        return print_page(&view, &mut io::stdout().lock());
    }

    let mut app = App::new(data, selection, cli.policy());
    info!("starting dashboard on {}", selection.page.label());

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Run the app
    let result = run(&mut terminal, &mut app);

    // Restore terminal
    ratatui::restore();

    result
}

/// Write the page as text; a page that shows an error fails the command
fn print_page(view: &View, out: &mut impl Write) -> Result<()> {
    out.write_all(view.to_text().as_bytes())?;
    out.flush()?;
    match view.errors().next() {
        Some(e) => Err(anyhow!("page failed to render: {e}")),
        None => Ok(()),
    }
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                        KeyCode::Down | KeyCode::Char('j') => app.move_selection(true),
                        KeyCode::Up | KeyCode::Char('k') => app.move_selection(false),

                        KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                            app.toggle_analysis();
                        }

                        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),

                        KeyCode::Enter if app.focus == Focus::Pages => app.toggle_focus(),

                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
