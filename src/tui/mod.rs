pub mod views;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use crate::app::{App, GenerationRequest, View};
use crate::generate::{self, GenerateResult, client::GenerationClient};

/// Model ids threaded through to the generation workflow.
#[derive(Clone)]
pub struct Models {
    pub text: String,
    pub image: String,
}

/// Main entry point for the TUI.
pub async fn run(
    app: App,
    client: Option<Arc<dyn GenerationClient>>,
    models: Models,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = app;
    let result = run_loop(&mut terminal, &mut app, client, models).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: Option<Arc<dyn GenerationClient>>,
    models: Models,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Result<GenerateResult, String>>();

    loop {
        terminal.draw(|frame| match app.view {
            View::Dashboard => views::dashboard::render(frame, app),
            View::Compose => views::compose::render(frame, app),
            View::Detail => views::detail::render(frame, app),
        })?;

        // Deliver any finished generation before handling input
        while let Ok(result) = rx.try_recv() {
            app.finish_generation(result);
        }

        // Poll with a timeout so pending generation results keep flowing
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Global quit: Ctrl+C
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
                {
                    return Ok(());
                }

                match app.view {
                    View::Dashboard => handle_dashboard_keys(app, key),
                    View::Compose => {
                        if let Some(request) = handle_compose_keys(app, key) {
                            if let Some(client) = client.clone() {
                                spawn_generation(client, models.clone(), request, tx.clone());
                            }
                        }
                    }
                    View::Detail => handle_detail_keys(app, key),
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn spawn_generation(
    client: Arc<dyn GenerationClient>,
    models: Models,
    request: GenerationRequest,
    tx: mpsc::UnboundedSender<Result<GenerateResult, String>>,
) {
    tokio::spawn(async move {
        let worker = tokio::spawn(async move {
            generate::generate_app_project(
                client.as_ref(),
                &models.text,
                &models.image,
                &request.name,
                &request.description,
            )
            .await
        });

        // A JoinError here means the workflow escaped both of its internal
        // guards; surface it as a generic creation failure.
        let result = match worker.await {
            Ok(generated) => Ok(generated),
            Err(e) => Err(format!("generation task failed: {e}")),
        };
        let _ = tx.send(result);
    });
}

fn handle_dashboard_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('n') => app.open_compose(),
        KeyCode::Up | KeyCode::Char('k') => app.dashboard_up(),
        KeyCode::Down | KeyCode::Char('j') => app.dashboard_down(),
        KeyCode::Enter => app.open_selected(),
        _ => {}
    }
}

/// Returns the generation request when an AI submission was accepted.
fn handle_compose_keys(app: &mut App, key: KeyEvent) -> Option<GenerationRequest> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => return app.submit_compose(),
            KeyCode::Char('t') => app.toggle_compose_mode(),
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Esc => app.cancel_compose(),
        KeyCode::Tab => app.compose.next_field(),
        KeyCode::Enter => {
            use crate::app::ComposeField;
            match app.compose.field {
                // Name is single-line, Enter just advances
                ComposeField::Name => app.compose.next_field(),
                ComposeField::Description | ComposeField::ManualPrd => {
                    if !app.generating {
                        app.compose.active_buffer().push('\n');
                    }
                }
            }
        }
        KeyCode::Backspace => {
            if !app.generating {
                app.compose.active_buffer().pop();
            }
        }
        KeyCode::Char(c) => {
            if !app.generating {
                app.compose.active_buffer().push(c);
            }
        }
        _ => {}
    }
    None
}

fn handle_detail_keys(app: &mut App, key: KeyEvent) {
    if app.confirm_delete {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete_project(),
            _ => app.cancel_delete(),
        }
        return;
    }

    if app.edit.is_some() {
        handle_edit_keys(app, key);
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('b') => app.back_to_dashboard(),
        KeyCode::Char('e') => app.start_edit(),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('c') => copy_prd(app),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_detail_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_detail_down(),
        _ => {}
    }
}

fn handle_edit_keys(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('s') {
            app.save_edit();
        }
        return;
    }

    if key.code == KeyCode::Esc {
        app.cancel_edit();
        return;
    }

    let Some(edit) = app.edit.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::Enter => edit.next_field(),
        KeyCode::Backspace => {
            edit.active_buffer().pop();
        }
        KeyCode::Char(c) => {
            edit.active_buffer().push(c);
        }
        _ => {}
    }
}

fn copy_prd(app: &mut App) {
    let Some(text) = app.selected_project().map(|p| p.full_prd.clone()) else {
        return;
    };
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => app.set_status("PRD copied to clipboard."),
        Err(e) => {
            tracing::warn!(error = %e, "Clipboard copy failed");
            app.set_status("Could not access the clipboard.");
        }
    }
}
