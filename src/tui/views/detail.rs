use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, EditField, EditForm};
use super::created_at_label;

pub fn render(frame: &mut Frame, app: &App) {
    let Some(project) = app.selected_project() else {
        return;
    };

    if let Some(edit) = &app.edit {
        render_edit(frame, edit);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(4), // Header
        Constraint::Min(8),    // PRD body
        Constraint::Length(3), // Status / help bar
    ])
    .split(frame.area());

    let icon = match &project.image_url {
        Some(uri) => format!("icon: {} bytes inline", uri.len()),
        None => "icon: none".to_string(),
    };
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            project.name.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::raw(project.description.clone())),
        Line::from(Span::styled(
            format!(
                "{} · {} · {}",
                project.model_used,
                created_at_label(project.created_at),
                icon
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, chunks[0]);

    let body = Paragraph::new(project.full_prd.clone())
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0))
        .block(
            Block::default()
                .title(" PRD ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(body, chunks[1]);

    render_footer(frame, chunks[2], app);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let line = if app.confirm_delete {
        Line::from(Span::styled(
            "Delete this project? y: yes  any other key: no",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Green),
        ))
    } else {
        Line::from(Span::styled(
            "e: edit  d: delete  c: copy PRD  ↑/↓: scroll  Esc: back",
            Style::default().fg(Color::DarkGray),
        ))
    };
    let footer = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(footer, area);
}

fn render_edit(frame: &mut Frame, edit: &EditForm) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Title bar
        Constraint::Length(3), // Name
        Constraint::Min(5),    // Description
        Constraint::Length(2), // Error
        Constraint::Length(3), // Help bar
    ])
    .split(frame.area());

    let title = Paragraph::new(Span::styled(
        "Edit project",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(title, chunks[0]);

    render_edit_field(frame, chunks[1], " Name ", &edit.name, edit.field == EditField::Name);
    render_edit_field(
        frame,
        chunks[2],
        " Description ",
        &edit.description,
        edit.field == EditField::Description,
    );

    let error = edit
        .error
        .as_ref()
        .map(|e| {
            Line::from(Span::styled(e.clone(), Style::default().fg(Color::Red)))
        })
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(error).alignment(Alignment::Center),
        chunks[3],
    );

    let help = Paragraph::new(Span::styled(
        "Tab: switch field  Ctrl+S: save  Esc: cancel",
        Style::default().fg(Color::DarkGray),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(help, chunks[4]);
}

fn render_edit_field(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
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
