use crossterm::event::{KeyCode, KeyEvent};

use crate::app::constants::MSG_BAD_URL;
use crate::app::App;
use crate::model::{Field, Mode, SettingsField};
use crate::storage::save_settings;

impl App {
    /// Routes a key press to whatever currently owns the screen: a modal if
    /// one is up, otherwise the active mode. Returns false when the app
    /// should exit.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.notice.is_some() || self.response_view.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.acknowledge();
            }
            return true;
        }
        if self.project_picker.is_some() {
            self.handle_picker_key(key);
            return true;
        }
        match self.mode {
            Mode::Settings => self.handle_settings_key(key),
            Mode::Submit => return self.handle_submit_key(key),
        }
        true
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Some(picker) = &mut self.project_picker else {
            return;
        };
        match key.code {
            KeyCode::Up => {
                picker.selected = picker.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if picker.selected + 1 < picker.projects.len() {
                    picker.selected += 1;
                }
            }
            KeyCode::Enter => {
                let project = picker.projects[picker.selected].clone();
                self.project_picker = None;
                self.choose_project(project);
            }
            KeyCode::Esc => {
                self.project_picker = None;
            }
            _ => {}
        }
    }

    fn handle_submit_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => return false,
            KeyCode::F(2) => self.open_settings(),
            KeyCode::F(5) => self.start_fetch(),
            KeyCode::Tab => self.focus_next_field(),
            KeyCode::BackTab => self.focus_prev_field(),
            KeyCode::Up => match self.form.active_field {
                Field::Targets => self.tree_move(-1),
                _ => self.focus_prev_field(),
            },
            KeyCode::Down => match self.form.active_field {
                Field::Targets => self.tree_move(1),
                _ => self.focus_next_field(),
            },
            KeyCode::Left => {
                if self.form.active_field == Field::Targets {
                    self.tree_collapse();
                }
            }
            KeyCode::Right => {
                if self.form.active_field == Field::Targets {
                    self.tree_expand();
                }
            }
            KeyCode::Enter => match self.form.active_field {
                Field::Project => self.open_project_picker(),
                Field::Targets => self.tree_toggle(),
                Field::ActionSubmit => self.request_submit(),
                Field::Username | Field::Password => self.focus_next_field(),
            },
            KeyCode::Backspace => match self.form.active_field {
                Field::Username => {
                    self.form.username.pop();
                }
                Field::Password => {
                    self.form.password.pop();
                }
                _ => {}
            },
            KeyCode::Char(ch) => match self.form.active_field {
                Field::Username => self.form.username.push(ch),
                Field::Password => self.form.password.push(ch),
                _ => {}
            },
            _ => {}
        }
        true
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Submit;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.settings_form.active_field = match self.settings_form.active_field {
                    SettingsField::Url => SettingsField::Username,
                    SettingsField::Username => SettingsField::Smtp,
                    SettingsField::Smtp => SettingsField::Email,
                    SettingsField::Email => SettingsField::ActionSave,
                    SettingsField::ActionSave => SettingsField::Url,
                };
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.settings_form.active_field = match self.settings_form.active_field {
                    SettingsField::Url => SettingsField::ActionSave,
                    SettingsField::Username => SettingsField::Url,
                    SettingsField::Smtp => SettingsField::Username,
                    SettingsField::Email => SettingsField::Smtp,
                    SettingsField::ActionSave => SettingsField::Email,
                };
            }
            KeyCode::Enter => {
                if self.settings_form.active_field == SettingsField::ActionSave {
                    self.save_settings_form();
                } else {
                    self.handle_settings_key(KeyEvent::from(KeyCode::Tab));
                }
            }
            KeyCode::Backspace => {
                if let Some(value) = self.active_settings_value() {
                    value.pop();
                    self.settings_form.error = None;
                }
            }
            KeyCode::Char(ch) => {
                if let Some(value) = self.active_settings_value() {
                    value.push(ch);
                    self.settings_form.error = None;
                }
            }
            _ => {}
        }
    }

    fn focus_next_field(&mut self) {
        self.form.active_field = match self.form.active_field {
            Field::Username => Field::Password,
            Field::Password => Field::Project,
            Field::Project => Field::Targets,
            Field::Targets => Field::ActionSubmit,
            Field::ActionSubmit => Field::Username,
        };
    }

    fn focus_prev_field(&mut self) {
        self.form.active_field = match self.form.active_field {
            Field::Username => Field::ActionSubmit,
            Field::Password => Field::Username,
            Field::Project => Field::Password,
            Field::Targets => Field::Project,
            Field::ActionSubmit => Field::Targets,
        };
    }

    pub(crate) fn open_settings(&mut self) {
        self.settings_form = crate::model::SettingsFormState {
            url: self.settings.submit_url.clone(),
            username: self.settings.username.clone(),
            smtp_server: self.settings.smtp_server.clone(),
            email: self.settings.email.clone(),
            active_field: SettingsField::Url,
            error: None,
        };
        self.mode = Mode::Settings;
    }

    fn active_settings_value(&mut self) -> Option<&mut String> {
        match self.settings_form.active_field {
            SettingsField::Url => Some(&mut self.settings_form.url),
            SettingsField::Username => Some(&mut self.settings_form.username),
            SettingsField::Smtp => Some(&mut self.settings_form.smtp_server),
            SettingsField::Email => Some(&mut self.settings_form.email),
            SettingsField::ActionSave => None,
        }
    }

    /// Saves the settings form. The URL must parse as an absolute URL; the
    /// other fields are free-form.
    pub(crate) fn save_settings_form(&mut self) {
        let trimmed = self.settings_form.url.trim();
        if !trimmed.is_empty() && url::Url::parse(trimmed).is_err() {
            self.settings_form.error = Some(MSG_BAD_URL.to_string());
            return;
        }
        let url_changed = self.settings.submit_url != trimmed;
        self.settings.submit_url = trimmed.to_string();
        self.settings.username = self.settings_form.username.trim().to_string();
        self.settings.smtp_server = self.settings_form.smtp_server.trim().to_string();
        self.settings.email = self.settings_form.email.trim().to_string();
        if let Err(err) = save_settings(&self.settings_path, &self.settings) {
            self.settings_form.error = Some(format!("Error: {err}"));
            return;
        }
        if self.form.username.trim().is_empty() {
            self.form.username = self.settings.username.clone();
        }
        self.mode = Mode::Submit;
        if url_changed && !self.settings.submit_url.is_empty() {
            self.start_fetch();
        }
    }
}
