use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph, Wrap};

use crate::app::App;
use crate::model::SettingsField;
use crate::ui::constants::{
    MODAL_MAX_HEIGHT_PERCENT, MODAL_MIN_WIDTH, MODAL_WIDTH_PERCENT, PICKER_HEIGHT, PICKER_WIDTH,
    RESPONSE_HEIGHT_PERCENT, RESPONSE_WIDTH_PERCENT, SETTINGS_LABEL_WIDTH,
};
use crate::ui::helpers::{
    action_line, centered_rect_abs, centered_rect_by_height, draw_popup_frame, field_line,
    list_state, modal_height, render_input_cursor,
};

pub(crate) fn draw_settings_modal(frame: &mut Frame<'_>, app: &App) {
    let area_width = (frame.area().width.saturating_mul(MODAL_WIDTH_PERCENT) / 100)
        .min(frame.area().width.saturating_sub(2))
        .max(MODAL_MIN_WIDTH);
    let pad = 1u16;
    let content_width = area_width.saturating_sub(2 + pad * 2);
    let value_width = content_width.saturating_sub(2 + SETTINGS_LABEL_WIDTH as u16 + 2) as usize;
    let max_height = frame.area().height.saturating_mul(MODAL_MAX_HEIGHT_PERCENT) / 100;

    let form = &app.settings_form;
    let mut lines = vec![
        field_line(
            "Submit URL",
            &form.url,
            form.active_field == SettingsField::Url,
            false,
            SETTINGS_LABEL_WIDTH,
            value_width,
        ),
        field_line(
            "Username",
            &form.username,
            form.active_field == SettingsField::Username,
            false,
            SETTINGS_LABEL_WIDTH,
            value_width,
        ),
        field_line(
            "SMTP server",
            &form.smtp_server,
            form.active_field == SettingsField::Smtp,
            false,
            SETTINGS_LABEL_WIDTH,
            value_width,
        ),
        field_line(
            "Email",
            &form.email,
            form.active_field == SettingsField::Email,
            false,
            SETTINGS_LABEL_WIDTH,
            value_width,
        ),
        Line::default(),
        action_line("[ Save ]", form.active_field == SettingsField::ActionSave),
    ];
    if let Some(error) = &form.error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let footer = Line::from(vec![
        Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to move, "),
        Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to save, "),
        Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to cancel"),
    ]);

    let height = modal_height(lines.len(), 2).min(max_height.max(8));
    let area = centered_rect_abs(area_width, height, frame.area());
    let body = draw_popup_frame(frame, area, "Settings", Style::default().fg(Color::Cyan));

    let content_height = body.height.saturating_sub(2);
    let content = ratatui::layout::Rect {
        x: body.x,
        y: body.y,
        width: body.width,
        height: content_height,
    };
    frame.render_widget(Paragraph::new(lines), content);
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::Gray)),
        ratatui::layout::Rect {
            x: body.x,
            y: body.y + content_height,
            width: body.width,
            height: body.height.saturating_sub(content_height),
        },
    );
    render_input_cursor(frame, app, content);
}

pub(crate) fn draw_project_picker_modal(frame: &mut Frame<'_>, app: &App) {
    let Some(picker) = &app.project_picker else {
        return;
    };
    let area = centered_rect_by_height(
        PICKER_WIDTH,
        frame.area().height.saturating_mul(PICKER_HEIGHT) / 100,
        frame.area(),
    );
    let body = draw_popup_frame(frame, area, "Select project", Style::default().fg(Color::Cyan));

    let items: Vec<ListItem<'_>> = picker
        .projects
        .iter()
        .map(|project| ListItem::new(project.name.clone()))
        .collect();
    let list = List::new(items).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let mut state = list_state(picker.selected, picker.projects.len());
    frame.render_stateful_widget(list, body, &mut state);
}

pub(crate) fn draw_notice_modal(frame: &mut Frame<'_>, app: &App) {
    let Some(notice) = &app.notice else {
        return;
    };
    let area_width = (frame.area().width.saturating_mul(MODAL_WIDTH_PERCENT) / 100)
        .min(frame.area().width.saturating_sub(2))
        .max(MODAL_MIN_WIDTH);
    let wrap_width = area_width.saturating_sub(4).max(1) as usize;
    let message_lines: usize = notice
        .message
        .lines()
        .map(|line| (line.chars().count() / wrap_width) + 1)
        .sum();
    let height = modal_height(message_lines, 1);
    let area = centered_rect_abs(area_width, height, frame.area());
    let body = draw_popup_frame(frame, area, &notice.title, Style::default().fg(Color::Yellow));

    let mut lines: Vec<Line<'_>> = notice.message.lines().map(Line::from).collect();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Press Enter to continue",
        Style::default().fg(Color::Gray),
    )));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);
}

pub(crate) fn draw_response_modal(frame: &mut Frame<'_>, app: &App) {
    let Some(view) = &app.response_view else {
        return;
    };
    let area = centered_rect_abs(
        frame.area().width.saturating_mul(RESPONSE_WIDTH_PERCENT) / 100,
        frame.area().height.saturating_mul(RESPONSE_HEIGHT_PERCENT) / 100,
        frame.area(),
    );
    let body = draw_popup_frame(
        frame,
        area,
        "Submission results",
        Style::default().fg(Color::Green),
    );

    let mut lines: Vec<Line<'_>> = view.text.lines().map(Line::from).collect();
    lines.push(Line::default());
    if let Some(path) = &view.saved_to {
        lines.push(Line::from(Span::styled(
            format!("Saved to {}", path.display()),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Press Enter to continue",
        Style::default().fg(Color::Gray),
    )));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);
}
