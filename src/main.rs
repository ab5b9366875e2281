use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use vocadrill::app::App;
use vocadrill::config::Config;
use vocadrill::event::{AppEvent, EventHandler};
use vocadrill::gateway::dispatch::Dispatcher;
use vocadrill::gateway::http::HttpBackend;
use vocadrill::logging::init_tracing;
use vocadrill::ui::components::control_bar::ControlBar;
use vocadrill::ui::components::dialog::{Dialog, DialogContent};
use vocadrill::ui::components::params_panel::ParamsPanel;
use vocadrill::ui::components::word_card::WordCard;
use vocadrill::ui::layout::{ReviewLayout, pack_hint_lines};
use vocadrill::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "vocadrill", version, about = "Terminal front end for a vocabulary trainer")]
struct Cli {
    #[arg(short, long, help = "Trainer base URL")]
    server: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Vocabulary file targeted by delete")]
    file_id: Option<u64>,

    #[arg(long, help = "The selected file belongs to a shared collection")]
    shared: bool,

    #[arg(short, long, help = "Path to config.toml")]
    config: Option<PathBuf>,

    #[arg(long, help = "Write the effective configuration to the config path and exit")]
    init_config: bool,

    #[arg(long, help = "List bundled themes and exit")]
    list_themes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    if let Some(server) = cli.server {
        config.server_url = server;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(file_id) = cli.file_id {
        config.file_id = Some(file_id);
    }
    if cli.shared {
        config.file_shared = true;
    }

    if cli.init_config {
        config.save_to(&config_path)?;
        println!("wrote {}", config_path.display());
        return Ok(());
    }

    let _log_guard = init_tracing(&config.log_level, &Config::data_dir().join("logs"));
    tracing::info!(server = %config.server_url, "starting");

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let backend = HttpBackend::new(&config.server_url, config.request_timeout())?;
    let events = EventHandler::new(Duration::from_millis(50));
    let dispatcher = Dispatcher::new(Arc::new(backend), events.sender());

    let mut app = App::new(config, theme, dispatcher);
    app.start();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "event loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
            AppEvent::Completed(completion) => app.handle_completion(completion),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // Modals take precedence in this order; each swallows every other key.
    if app.notice.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return;
    }
    if app.guard.is_open() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_confirmation(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.answer_confirmation(false)
            }
            _ => {}
        }
        return;
    }
    if app.prompt.is_some() {
        app.prompt_key(key);
        return;
    }
    if app.params.focus.is_some() {
        if key.code == KeyCode::Tab {
            app.focus_params();
        } else {
            app.param_key(key, Instant::now());
        }
        return;
    }

    handle_review_key(app, key);
}

fn handle_review_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(ch @ '1'..='9') => app.choose(ch as usize - '1' as usize),
        KeyCode::Char('m') => app.mark_mastered(),
        KeyCode::Char('n') | KeyCode::Right => app.next_word(),
        KeyCode::Char('b') | KeyCode::Left => app.prev_word(),
        KeyCode::Char('a') => app.begin_add_word(),
        KeyCode::Char('e') => app.begin_edit_word(),
        KeyCode::Char('R') => app.request_reset(),
        KeyCode::Char('D') => app.request_delete_file(),
        KeyCode::Tab => app.focus_params(),
        KeyCode::Char('q') | KeyCode::Esc => app.exit_session(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let layout = ReviewLayout::new(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " vocadrill ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", app.session.status()),
            Style::default().fg(colors.fg()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    frame.render_widget(WordCard::new(&app.session, app.theme), layout.card);
    frame.render_widget(
        ControlBar::new(&app.config.choices, app.session.buttons(), app.theme),
        layout.controls,
    );
    frame.render_widget(ParamsPanel::new(&app.params, app.theme), layout.params);

    let hints = [
        "[1-9] Choose",
        "[m] Mastered",
        "[n] Next",
        "[b] Previous",
        "[a] Add",
        "[e] Edit",
        "[R] Reset",
        "[D] Delete file",
        "[Tab] Parameters",
        "[q] Exit",
    ];
    let footer_lines: Vec<Line> = pack_hint_lines(&hints, layout.footer.width as usize)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.text_dim()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);

    let overlay = if let Some(notice) = &app.notice {
        Some(DialogContent::Notice(notice))
    } else if let Some(pending) = app.guard.pending() {
        Some(DialogContent::Confirm(pending))
    } else {
        app.prompt.as_ref().map(DialogContent::Prompt)
    };
    if let Some(content) = overlay {
        frame.render_widget(Dialog::new(content, app.theme), area);
    }
}
