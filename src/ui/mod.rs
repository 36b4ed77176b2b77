use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;
use crate::model::Mode;
use crate::ui::constants::{main_columns, FOOTER_HEIGHT, FORM_HEIGHT};
use crate::ui::modals::{
    draw_notice_modal, draw_project_picker_modal, draw_response_modal, draw_settings_modal,
};
use crate::ui::panels::{draw_footer, draw_log_panel, draw_submit_form, draw_target_tree};

pub(crate) mod constants;
mod helpers;
mod modals;
mod panels;

pub(crate) fn draw_ui(frame: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(FOOTER_HEIGHT)].as_ref())
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(main_columns().as_ref())
        .split(layout[0]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(FORM_HEIGHT), Constraint::Min(3)].as_ref())
        .split(body[0]);
    draw_submit_form(frame, app, left[0]);
    draw_log_panel(frame, app, left[1]);
    draw_target_tree(frame, app, body[1]);
    draw_footer(frame, app, layout[1]);

    if app.mode == Mode::Submit
        && app.project_picker.is_none()
        && app.notice.is_none()
        && app.response_view.is_none()
    {
        helpers::render_input_cursor(frame, app, helpers::padded_rect(left[0], 1));
    }

    if app.mode == Mode::Settings {
        draw_settings_modal(frame, app);
    }
    if app.project_picker.is_some() {
        draw_project_picker_modal(frame, app);
    }
    if app.response_view.is_some() {
        draw_response_modal(frame, app);
    }
    if app.notice.is_some() {
        draw_notice_modal(frame, app);
    }
}
