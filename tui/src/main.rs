//! Demo host loop for the answer box.
//!
//! Reads an extracted-questions JSON file, runs the widget in the alternate
//! screen, and prints the transcript (or a cancellation note) on exit. In the
//! real assistant the host chat loop plays this role; everything here is the
//! thin glue the widget expects: feed key events in, repaint when asked,
//! tear down once a result arrives.

use std::io::stdout;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use crossterm::event::Event;
use crossterm::event::read;
use crossterm::execute;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::text::Text;
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::unbounded_channel;

use followup_protocol::questions::parse_extracted_questions;
use followup_tui::AnswerBoxView;
use followup_tui::AppEvent;
use followup_tui::AppEventSender;

#[derive(Parser, Debug)]
#[command(version, about = "Interactive multi-question answer box")]
struct Cli {
    /// Path to an extracted-questions JSON file ({"questions": [...]}).
    questions: PathBuf,

    /// Clamp the box to at most this many columns.
    #[arg(long)]
    max_width: Option<u16>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // Keep the appender guard alive for the process lifetime; stderr is
    // unusable while the alternate screen is active.
    let _logging_guard = init_logging();

    let raw = std::fs::read_to_string(&cli.questions)
        .with_context(|| format!("failed to read {}", cli.questions.display()))?;
    let extracted = match parse_extracted_questions(&raw) {
        Ok(extracted) => extracted,
        Err(err) => {
            eprintln!("no questions found: {err}");
            return Ok(());
        }
    };

    let (tx_raw, rx) = unbounded_channel::<AppEvent>();
    let mut view = AnswerBoxView::new(extracted.questions, AppEventSender::new(tx_raw));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let run_result = run_loop(&mut view, rx, cli.max_width);
    execute!(stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()?;

    match run_result? {
        Some(transcript) => println!("{transcript}"),
        None => println!("cancelled"),
    }
    Ok(())
}

fn run_loop(
    view: &mut AnswerBoxView,
    mut rx: UnboundedReceiver<AppEvent>,
    max_width: Option<u16>,
) -> Result<Option<String>> {
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    draw(&mut terminal, view, max_width)?;

    loop {
        match read()? {
            Event::Key(key_event) => view.handle_key_event(key_event),
            Event::Resize(..) => draw(&mut terminal, view, max_width)?,
            _ => {}
        }

        let mut needs_redraw = false;
        while let Ok(app_event) = rx.try_recv() {
            match app_event {
                AppEvent::RequestRedraw => needs_redraw = true,
                AppEvent::AnswersSubmitted(transcript) => return Ok(Some(transcript)),
                AppEvent::Cancelled => return Ok(None),
            }
        }
        if needs_redraw {
            draw(&mut terminal, view, max_width)?;
        }
    }
}

fn draw(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    view: &AnswerBoxView,
    max_width: Option<u16>,
) -> Result<()> {
    terminal.draw(|frame| {
        let area = frame.area();
        let width = max_width.map_or(area.width, |w| area.width.min(w));
        let lines = view.display_lines(width);
        let height = (lines.len() as u16).min(area.height);
        let rect = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Paragraph::new(Text::from(lines)), rect);
    })?;
    Ok(())
}

fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(std::env::temp_dir(), "followup-tui.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let result = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(non_blocking)
        .with_ansi(false)
        .try_init();
    if let Err(err) = result {
        eprintln!("failed to initialize logging: {err}");
        return None;
    }
    Some(guard)
}
