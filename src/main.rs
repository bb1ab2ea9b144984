use std::{io, path::PathBuf, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use tarefas_tui::api::ApiClient;
use tarefas_tui::app::{AddField, App, AuthField, EditField, Screen};
use tarefas_tui::session::Session;
use tarefas_tui::task::Prioridade;
use tarefas_tui::ui;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let api_url =
        std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let session_file = std::env::var("TAREFAS_SESSION_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".tarefas_session.json"));

    let session = Session::load(&session_file);
    let mut app = App::new(ApiClient::new(api_url), session);
    if app.screen == Screen::Tasks {
        app.refresh().await;
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("{err:?}");
    }
    Ok(())
}

/// Log to a file; the alternate screen owns stdout.
fn init_logging() -> Result<()> {
    let log_path =
        std::env::var("TAREFAS_LOG_FILE").unwrap_or_else(|_| "tarefas-tui.log".to_string());
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.screen {
                Screen::Login | Screen::Register => handle_auth_key(app, key.code, key.modifiers).await,
                Screen::Tasks => handle_tasks_key(app, key.code, key.modifiers).await,
            }
        }
    }
}

async fn handle_auth_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Tab => {
            app.auth_field = match app.auth_field {
                AuthField::Email => AuthField::Password,
                AuthField::Password => AuthField::Email,
            };
        }
        KeyCode::Enter => match app.screen {
            Screen::Register => app.register().await,
            _ => app.login().await,
        },
        KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.show_register();
        }
        KeyCode::Esc => {
            if app.screen == Screen::Register {
                app.show_login();
            } else {
                app.should_quit = true;
            }
        }
        KeyCode::Backspace => {
            match app.auth_field {
                AuthField::Email => app.auth_email.pop(),
                AuthField::Password => app.auth_password.pop(),
            };
        }
        KeyCode::Char(c) => match app.auth_field {
            AuthField::Email => app.auth_email.push(c),
            AuthField::Password => app.auth_password.push(c),
        },
        _ => {}
    }
}

async fn handle_tasks_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.editing.is_some() {
        handle_edit_key(app, code).await;
        return;
    }
    if app.adding {
        handle_add_key(app, code, modifiers).await;
        return;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('a') => app.begin_add(),
        KeyCode::Char('c') => app.toggle_complete().await,
        KeyCode::Char('e') => app.begin_edit(),
        KeyCode::Char('d') => app.delete_task().await,
        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('o') => app.cycle_sort(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('l') => app.logout(),
        KeyCode::Char('r') => app.refresh().await,
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        _ => {}
    }
}

async fn handle_add_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Esc => app.cancel_add(),
        KeyCode::Enter => app.add_task().await,
        KeyCode::Tab => {
            app.add_field = match app.add_field {
                AddField::Titulo => AddField::Descricao,
                AddField::Descricao => AddField::DataVencimento,
                AddField::DataVencimento => AddField::Titulo,
            };
        }
        KeyCode::Char('p') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.add_prioridade = Prioridade::next(app.add_prioridade);
        }
        KeyCode::Backspace => {
            match app.add_field {
                AddField::Titulo => app.add_titulo.pop(),
                AddField::Descricao => app.add_descricao.pop(),
                AddField::DataVencimento => app.add_data.pop(),
            };
        }
        KeyCode::Char(c) => match app.add_field {
            AddField::Titulo => app.add_titulo.push(c),
            AddField::Descricao => app.add_descricao.push(c),
            AddField::DataVencimento => app.add_data.push(c),
        },
        _ => {}
    }
}

async fn handle_edit_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter => app.save_edit().await,
        KeyCode::Tab => {
            if let Some(edit) = app.editing.as_mut() {
                edit.field = match edit.field {
                    EditField::Titulo => EditField::Descricao,
                    EditField::Descricao => EditField::Titulo,
                };
            }
        }
        KeyCode::Backspace => {
            if let Some(edit) = app.editing.as_mut() {
                match edit.field {
                    EditField::Titulo => edit.titulo.pop(),
                    EditField::Descricao => edit.descricao.pop(),
                };
            }
        }
        KeyCode::Char(c) => {
            if let Some(edit) = app.editing.as_mut() {
                match edit.field {
                    EditField::Titulo => edit.titulo.push(c),
                    EditField::Descricao => edit.descricao.push(c),
                }
            }
        }
        _ => {}
    }
}
