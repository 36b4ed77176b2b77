use ratatui::layout::Constraint;

pub(crate) const HELP_TEXT: &str =
    "Tab move | Enter select | F2 settings | F5 refresh | Esc quit";

pub(crate) const LABEL_WIDTH: usize = 9;
pub(crate) const SETTINGS_LABEL_WIDTH: usize = 12;

pub(crate) const FOOTER_HEIGHT: u16 = 2;
pub(crate) const FORM_HEIGHT: u16 = 9;

pub(crate) const MAIN_COLUMN_PERCENTAGES: [u16; 2] = [45, 55];

pub(crate) const MODAL_WIDTH_PERCENT: u16 = 70;
pub(crate) const MODAL_MAX_HEIGHT_PERCENT: u16 = 70;
pub(crate) const MODAL_MIN_WIDTH: u16 = 30;

pub(crate) const PICKER_WIDTH: u16 = 50;
pub(crate) const PICKER_HEIGHT: u16 = 60;

pub(crate) const RESPONSE_WIDTH_PERCENT: u16 = 80;
pub(crate) const RESPONSE_HEIGHT_PERCENT: u16 = 80;

pub(crate) const POPUP_MIN_WIDTH: u16 = 10;
pub(crate) const POPUP_MIN_HEIGHT: u16 = 5;

pub(crate) fn main_columns() -> [Constraint; 2] {
    MAIN_COLUMN_PERCENTAGES.map(Constraint::Percentage)
}
