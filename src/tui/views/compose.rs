use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, ComposeField};

pub fn render(frame: &mut Frame, app: &App) {
    let manual = !app.compose.ai_mode;
    let chunks = Layout::vertical([
        Constraint::Length(3), // Title bar
        Constraint::Length(3), // Name
        Constraint::Length(6), // Description
        // Manual PRD input only exists in manual mode
        Constraint::Min(if manual { 6 } else { 0 }),
        Constraint::Length(2), // Error / progress
        Constraint::Length(3), // Help bar
    ])
    .split(frame.area());

    render_title(frame, chunks[0], app);
    render_field(
        frame,
        chunks[1],
        " App name ",
        &app.compose.name,
        app.compose.field == ComposeField::Name,
    );
    render_field(
        frame,
        chunks[2],
        " Describe your idea ",
        &app.compose.description,
        app.compose.field == ComposeField::Description,
    );
    if manual {
        render_field(
            frame,
            chunks[3],
            " PRD document (blank = use description) ",
            &app.compose.manual_prd,
            app.compose.field == ComposeField::ManualPrd,
        );
    }
    render_feedback(frame, chunks[4], app);
    render_help(frame, chunks[5], app);
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let mode = if app.compose.ai_mode {
        Span::styled("AI-assisted", Style::default().fg(Color::Magenta))
    } else {
        Span::styled("Manual", Style::default().fg(Color::Yellow))
    };
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "New project",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" — mode: "),
        mode,
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(title, area);
}

fn render_field(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let field = Paragraph::new(value.to_string())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(border),
        );
    frame.render_widget(field, area);
}

fn render_feedback(frame: &mut Frame, area: Rect, app: &App) {
    let line = if app.generating {
        Line::from(Span::styled(
            "Generating PRD and icon...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(error) = &app.compose.error {
        Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    let text = if app.generating {
        "Generation in flight — please wait".to_string()
    } else {
        let toggle = if app.ai_available() {
            "Ctrl+T: toggle AI/manual  "
        } else {
            ""
        };
        format!("Tab: next field  {toggle}Ctrl+S: create  Esc: cancel")
    };
    let help = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(help, area);
}
