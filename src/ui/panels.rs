use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::app::constants::NO_PROJECT_SELECTED;
use crate::app::App;
use crate::model::{Field, Phase, TargetKind, TreeRow};
use crate::ui::constants::{HELP_TEXT, LABEL_WIDTH};
use crate::ui::helpers::{action_line, field_line, list_state, truncate_text};

pub(crate) fn draw_submit_form(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Submission ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let value_width = inner
        .width
        .saturating_sub(2 + LABEL_WIDTH as u16 + 2) as usize;
    let project = app
        .form
        .project
        .as_ref()
        .map(|project| project.name.clone())
        .unwrap_or_else(|| NO_PROJECT_SELECTED.to_string());

    let mut lines = vec![
        field_line(
            "Username",
            &app.form.username,
            app.form.active_field == Field::Username,
            false,
            LABEL_WIDTH,
            value_width,
        ),
        field_line(
            "Password",
            &app.form.password,
            app.form.active_field == Field::Password,
            true,
            LABEL_WIDTH,
            value_width,
        ),
        field_line(
            "Project",
            &project,
            app.form.active_field == Field::Project,
            false,
            LABEL_WIDTH,
            value_width,
        ),
        Line::default(),
        action_line("[ Submit ]", app.form.active_field == Field::ActionSubmit),
    ];
    if app.phase == Phase::Submitting {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(details) = app
        .workflow
        .selected_target()
        .filter(|target| target.is_assignment())
        .and_then(|target| target.metadata.as_ref())
    {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            truncate_text(&format!("Details: {details}"), value_width + LABEL_WIDTH + 4),
            Style::default().fg(Color::Gray),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

pub(crate) fn draw_log_panel(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Log ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.log_lines.is_empty() {
        frame.render_widget(
            Paragraph::new(crate::app::constants::LOG_NO_LOGS_MESSAGE)
                .style(Style::default().fg(Color::Gray)),
            inner,
        );
        return;
    }
    let visible = inner.height as usize;
    let lines: Vec<Line<'_>> = app
        .log_lines
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|line| Line::from(truncate_text(line, inner.width as usize)))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

pub(crate) fn draw_target_tree(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let focused = app.form.active_field == Field::Targets;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Assignments ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.browser.rows.is_empty() {
        let hint = match app.phase {
            Phase::FetchingTargets => "Loading...",
            _ => "No assignments loaded. Press F5 to fetch.",
        };
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Color::Gray)),
            inner,
        );
        return;
    }

    let width = inner.width as usize;
    let items: Vec<ListItem<'_>> = app
        .browser
        .rows
        .iter()
        .map(|row| ListItem::new(tree_row_line(row, width)))
        .collect();
    let list = List::new(items).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let mut state = list_state(app.browser.cursor, app.browser.rows.len());
    frame.render_stateful_widget(list, inner, &mut state);
}

fn tree_row_line(row: &TreeRow, width: usize) -> Line<'static> {
    let indent = "  ".repeat(row.depth);
    let marker = match row.kind {
        TargetKind::Folder if row.expanded => "[-] ",
        TargetKind::Folder => "[+] ",
        TargetKind::Assignment => "  - ",
    };
    let style = match row.kind {
        TargetKind::Folder => Style::default().add_modifier(Modifier::BOLD),
        TargetKind::Assignment => Style::default(),
    };
    let text = truncate_text(
        &format!("{indent}{marker}{}", row.name()),
        width.saturating_sub(1),
    );
    Line::from(Span::styled(text, style))
}

pub(crate) fn draw_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let status = Line::from(vec![
        Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(truncate_text(
            &app.status,
            area.width.saturating_sub(9) as usize,
        )),
    ]);
    let help = Line::from(Span::styled(HELP_TEXT, Style::default().fg(Color::Gray)));
    frame.render_widget(Paragraph::new(vec![status, help]), area);
}
