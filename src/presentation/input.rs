use crate::application::{App, AppMode};
use crate::domain::FormStep;
use crate::infrastructure::{DraftRepository, SubmissionClient, UsernameDirectory};
use crate::presentation::fields::{step_fields, FieldKind};
use crate::presentation::ui::application_summary;
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::warn;

/// External collaborators the key handler drives: the username directory
/// and the submission endpoint. Draft persistence goes through
/// [`DraftRepository`] directly.
pub struct Services {
    pub username_directory: Box<dyn UsernameDirectory>,
    pub submission: Box<dyn SubmissionClient>,
}

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(
        app: &mut App,
        key: KeyCode,
        modifiers: KeyModifiers,
        services: &Services,
    ) {
        match app.mode {
            AppMode::Form => Self::handle_form_mode(app, key, modifiers, services),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::DraftPrompt => Self::handle_draft_prompt_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_form_mode(
        app: &mut App,
        key: KeyCode,
        modifiers: KeyModifiers,
        services: &Services,
    ) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => {
                    app.set_save_result(DraftRepository::save_draft(
                        &app.record,
                        &app.draft_path,
                    ));
                    return;
                }
                KeyCode::Char('o') => {
                    app.set_load_result(DraftRepository::load_draft(&app.draft_path));
                    return;
                }
                KeyCode::Char('d') => {
                    app.set_clear_result(DraftRepository::clear_draft(&app.draft_path));
                    return;
                }
                KeyCode::Char('n') => {
                    Self::advance_step(app);
                    return;
                }
                KeyCode::Char('p') => {
                    app.prev_step();
                    return;
                }
                KeyCode::Char('u') => {
                    Self::check_username(app, services);
                    return;
                }
                KeyCode::Char('y') => {
                    Self::copy_summary(app);
                    return;
                }
                _ => {}
            }
        }

        app.status_message = None;

        match key {
            KeyCode::Down | KeyCode::Tab => {
                let field_count = step_fields(app.step(), &app.record).len();
                app.focus_next(field_count);
            }
            KeyCode::Up | KeyCode::BackTab => {
                app.focus_prev();
            }
            KeyCode::Enter => {
                if app.is_last_step() {
                    Self::submit(app, services);
                } else {
                    Self::activate_focused_field(app);
                }
            }
            KeyCode::Char(' ') => {
                Self::toggle_focused_field(app);
            }
            KeyCode::Char(c @ '1'..='5') => {
                let target = c as usize - '1' as usize;
                app.attempt_step_click(target);
            }
            KeyCode::Char('+') if app.step() == FormStep::ProfessionalInfo => {
                app.record.add_experience();
            }
            KeyCode::Char('-') if app.step() == FormStep::ProfessionalInfo => {
                Self::remove_focused_experience(app);
            }
            KeyCode::Char('=') if app.step() == FormStep::ProfessionalInfo => {
                app.record.add_skill();
            }
            KeyCode::Char('_') if app.step() == FormStep::ProfessionalInfo => {
                Self::remove_focused_skill(app);
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    /// Enter on a typed field opens the editor pre-filled with the current
    /// value; on a toggle or choice field it flips the value in place.
    fn activate_focused_field(app: &mut App) {
        let fields = step_fields(app.step(), &app.record);
        let Some(field) = fields.get(app.focused_field).copied() else {
            return;
        };
        match field.kind() {
            FieldKind::Toggle | FieldKind::Choice => {
                if let Err(error) = field.toggle(&mut app.record) {
                    app.status_message = Some(error.to_string());
                }
            }
            _ => {
                app.start_editing(field.get(&app.record));
            }
        }
    }

    fn toggle_focused_field(app: &mut App) {
        let fields = step_fields(app.step(), &app.record);
        let Some(field) = fields.get(app.focused_field).copied() else {
            return;
        };
        if matches!(field.kind(), FieldKind::Toggle | FieldKind::Choice) {
            if let Err(error) = field.toggle(&mut app.record) {
                app.status_message = Some(error.to_string());
            }
        }
    }

    /// Ctrl+N: validate, advance, and persist the draft on success.
    fn advance_step(app: &mut App) {
        if app.next_step() {
            app.set_save_result(DraftRepository::save_draft(&app.record, &app.draft_path));
        }
    }

    fn check_username(app: &mut App, services: &Services) {
        if let Some((request_id, username)) = app.start_username_check() {
            let result = services.username_directory.check(&username);
            app.apply_username_result(request_id, result);
        }
    }

    fn submit(app: &mut App, services: &Services) {
        if !app.validate_for_submit() {
            return;
        }
        let result = services.submission.submit(&app.record);
        let submitted = result.is_ok();
        app.set_submit_result(result);
        if submitted {
            // The draft slot is only cleared once the hand-off succeeded.
            match DraftRepository::clear_draft(&app.draft_path) {
                Ok(()) => app.draft_available = false,
                Err(error) => warn!(error = %error, "could not clear draft after submission"),
            }
            app.go_to_step(0);
        }
    }

    fn copy_summary(app: &mut App) {
        let summary = application_summary(&app.record);
        let copied = arboard::Clipboard::new().and_then(|mut clipboard| {
            clipboard.set_text(summary)
        });
        app.status_message = Some(match copied {
            Ok(()) => "Summary copied to clipboard".to_string(),
            Err(error) => format!("Clipboard unavailable: {}", error),
        });
    }

    fn remove_focused_experience(app: &mut App) {
        let fields = step_fields(app.step(), &app.record);
        let index = fields
            .get(app.focused_field)
            .and_then(|f| f.experience_index());
        if let Some(index) = index {
            if let Err(error) = app.record.remove_experience(index) {
                app.status_message = Some(error.to_string());
            } else {
                app.focused_field = 0;
            }
        }
    }

    fn remove_focused_skill(app: &mut App) {
        let fields = step_fields(app.step(), &app.record);
        let index = fields.get(app.focused_field).and_then(|f| f.skill_index());
        if let Some(index) = index {
            if let Err(error) = app.record.remove_skill(index) {
                app.status_message = Some(error.to_string());
            } else {
                app.focused_field = 0;
            }
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let fields = step_fields(app.step(), &app.record);
                let field = fields.get(app.focused_field).copied();
                let buffer = app.finish_editing();
                if let Some(field) = field {
                    match field.set(&mut app.record, &buffer) {
                        Ok(()) => {
                            app.status_message = None;
                        }
                        Err(error) => {
                            app.status_message = Some(error.to_string());
                        }
                    }
                }
            }
            KeyCode::Esc => {
                app.cancel_editing();
            }
            // The cursor is a byte offset kept on char boundaries, so every
            // move steps by the adjacent char's encoded width.
            KeyCode::Backspace => {
                if let Some(c) = app.input[..app.cursor_position].chars().next_back() {
                    app.cursor_position -= c.len_utf8();
                    app.input.remove(app.cursor_position);
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.input.len() {
                    app.input.remove(app.cursor_position);
                }
            }
            KeyCode::Left => {
                if let Some(c) = app.input[..app.cursor_position].chars().next_back() {
                    app.cursor_position -= c.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(c) = app.input[app.cursor_position..].chars().next() {
                    app.cursor_position += c.len_utf8();
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.input.len();
            }
            KeyCode::Char(c) => {
                app.input.insert(app.cursor_position, c);
                app.cursor_position += c.len_utf8();
            }
            _ => {}
        }
    }

    fn handle_draft_prompt_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Enter => {
                app.set_load_result(DraftRepository::load_draft(&app.draft_path));
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Esc => {
                app.dismiss_draft_prompt();
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                app.set_clear_result(DraftRepository::clear_draft(&app.draft_path));
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Form;
                app.help_scroll = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                app.help_scroll += 10;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApplicationRecord;
    use crate::infrastructure::{LoggingSubmissionClient, StubUsernameDirectory};
    use chrono::NaiveDate;

    fn services() -> Services {
        Services {
            username_directory: Box::new(StubUsernameDirectory),
            submission: Box::new(LoggingSubmissionClient),
        }
    }

    fn app_with_draft_dir() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(dir.path().join("draft.json"), false);
        (app, dir)
    }

    #[test]
    fn test_tab_moves_focus() {
        let (mut app, _dir) = app_with_draft_dir();
        InputHandler::handle_key_event(&mut app, KeyCode::Tab, KeyModifiers::NONE, &services());
        assert_eq!(app.focused_field, 1);
        InputHandler::handle_key_event(&mut app, KeyCode::BackTab, KeyModifiers::NONE, &services());
        assert_eq!(app.focused_field, 0);
    }

    #[test]
    fn test_enter_opens_editor_prefilled() {
        let (mut app, _dir) = app_with_draft_dir();
        app.record.personal_info.first_name = "Ada".to_string();
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE, &services());
        assert_eq!(app.mode, AppMode::Editing);
        assert_eq!(app.input, "Ada");
    }

    #[test]
    fn test_edit_commit_writes_record() {
        let (mut app, _dir) = app_with_draft_dir();
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE, &services());
        for c in "Grace".chars() {
            InputHandler::handle_key_event(
                &mut app,
                KeyCode::Char(c),
                KeyModifiers::NONE,
                &services(),
            );
        }
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE, &services());
        assert_eq!(app.mode, AppMode::Form);
        assert_eq!(app.record.personal_info.first_name, "Grace");
    }

    #[test]
    fn test_edit_rejects_bad_date_with_message() {
        let (mut app, _dir) = app_with_draft_dir();
        app.focused_field = 5; // date of birth
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE, &services());
        app.input = "not-a-date".to_string();
        app.cursor_position = app.input.len();
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE, &services());
        assert!(app.status_message.unwrap().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_typing_after_multibyte_char_does_not_split_it() {
        let (mut app, _dir) = app_with_draft_dir();
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE, &services());
        for c in "Zoé".chars() {
            InputHandler::handle_key_event(
                &mut app,
                KeyCode::Char(c),
                KeyModifiers::NONE,
                &services(),
            );
        }
        // The next keypress must land after the full 'é', not inside it.
        InputHandler::handle_key_event(&mut app, KeyCode::Char('s'), KeyModifiers::NONE, &services());
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE, &services());
        assert_eq!(app.record.personal_info.first_name, "Zoés");
    }

    #[test]
    fn test_backspace_removes_whole_multibyte_char() {
        let (mut app, _dir) = app_with_draft_dir();
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE, &services());
        for c in "Ané".chars() {
            InputHandler::handle_key_event(
                &mut app,
                KeyCode::Char(c),
                KeyModifiers::NONE,
                &services(),
            );
        }
        InputHandler::handle_key_event(&mut app, KeyCode::Backspace, KeyModifiers::NONE, &services());
        assert_eq!(app.input, "An");
        InputHandler::handle_key_event(&mut app, KeyCode::Char('a'), KeyModifiers::NONE, &services());
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE, &services());
        assert_eq!(app.record.personal_info.first_name, "Ana");
    }

    #[test]
    fn test_cursor_steps_over_multibyte_chars() {
        let (mut app, _dir) = app_with_draft_dir();
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE, &services());
        for c in "日本".chars() {
            InputHandler::handle_key_event(
                &mut app,
                KeyCode::Char(c),
                KeyModifiers::NONE,
                &services(),
            );
        }
        // Left over '本', insert between the two chars, then delete '本'.
        InputHandler::handle_key_event(&mut app, KeyCode::Left, KeyModifiers::NONE, &services());
        InputHandler::handle_key_event(&mut app, KeyCode::Char('-'), KeyModifiers::NONE, &services());
        assert_eq!(app.input, "日-本");
        InputHandler::handle_key_event(&mut app, KeyCode::Delete, KeyModifiers::NONE, &services());
        assert_eq!(app.input, "日-");

        // Left twice then Right lands back on a boundary.
        InputHandler::handle_key_event(&mut app, KeyCode::Left, KeyModifiers::NONE, &services());
        InputHandler::handle_key_event(&mut app, KeyCode::Left, KeyModifiers::NONE, &services());
        InputHandler::handle_key_event(&mut app, KeyCode::Right, KeyModifiers::NONE, &services());
        InputHandler::handle_key_event(&mut app, KeyCode::Char('x'), KeyModifiers::NONE, &services());
        assert_eq!(app.input, "日x-");
    }

    #[test]
    fn test_esc_cancels_edit() {
        let (mut app, _dir) = app_with_draft_dir();
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE, &services());
        app.input = "typed".to_string();
        InputHandler::handle_key_event(&mut app, KeyCode::Esc, KeyModifiers::NONE, &services());
        assert_eq!(app.mode, AppMode::Form);
        assert_eq!(app.record.personal_info.first_name, "");
    }

    #[test]
    fn test_ctrl_n_blocked_on_empty_step() {
        let (mut app, _dir) = app_with_draft_dir();
        InputHandler::handle_key_event(
            &mut app,
            KeyCode::Char('n'),
            KeyModifiers::CONTROL,
            &services(),
        );
        assert_eq!(app.current_step, 0);
        assert!(!app.errors.is_empty());
    }

    #[test]
    fn test_ctrl_n_advances_and_saves_draft() {
        let (mut app, _dir) = app_with_draft_dir();
        let p = &mut app.record.personal_info;
        p.first_name = "Ada".to_string();
        p.last_name = "Lovelace".to_string();
        p.email = "ada@example.com".to_string();
        p.phone = "+14155551234".to_string();
        p.username = "ada_l".to_string();
        p.date_of_birth = NaiveDate::from_ymd_opt(1990, 12, 10).unwrap();
        p.address.street = "1 Analytical Way".to_string();
        p.address.city = "London".to_string();
        p.address.state = "LDN".to_string();
        p.address.zip = "12345".to_string();
        p.address.country = "UK".to_string();

        InputHandler::handle_key_event(
            &mut app,
            KeyCode::Char('n'),
            KeyModifiers::CONTROL,
            &services(),
        );
        assert_eq!(app.current_step, 1);
        assert!(app.draft_path.exists());
        assert!(app.draft_available);
    }

    #[test]
    fn test_number_keys_jump_backward_only() {
        let (mut app, _dir) = app_with_draft_dir();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('3'), KeyModifiers::NONE, &services());
        assert_eq!(app.current_step, 0);
    }

    #[test]
    fn test_plus_adds_experience_on_professional_step() {
        let (mut app, _dir) = app_with_draft_dir();
        app.go_to_step(1);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('+'), KeyModifiers::NONE, &services());
        assert_eq!(app.record.professional_info.experiences.len(), 2);

        // Same key is inert on other steps.
        app.go_to_step(2);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('+'), KeyModifiers::NONE, &services());
        assert_eq!(app.record.professional_info.experiences.len(), 2);
    }

    #[test]
    fn test_minus_refuses_to_remove_last_experience() {
        let (mut app, _dir) = app_with_draft_dir();
        app.go_to_step(1);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('-'), KeyModifiers::NONE, &services());
        assert_eq!(app.record.professional_info.experiences.len(), 1);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_space_toggles_consent_on_review_step() {
        let (mut app, _dir) = app_with_draft_dir();
        app.go_to_step(4);
        InputHandler::handle_key_event(&mut app, KeyCode::Char(' '), KeyModifiers::NONE, &services());
        assert!(app.record.terms_and_review.agree_to_terms);
    }

    #[test]
    fn test_submit_blocked_until_valid() {
        let (mut app, _dir) = app_with_draft_dir();
        app.go_to_step(4);
        InputHandler::handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE, &services());
        assert!(!app.submit_success);
        assert!(!app.errors.is_empty());
    }

    #[test]
    fn test_ctrl_u_checks_username_via_directory() {
        let (mut app, _dir) = app_with_draft_dir();
        app.record.personal_info.username = "this_is_taken".to_string();
        InputHandler::handle_key_event(
            &mut app,
            KeyCode::Char('u'),
            KeyModifiers::CONTROL,
            &services(),
        );
        assert_eq!(
            app.username_status,
            crate::application::UsernameStatus::Taken
        );
    }

    #[test]
    fn test_draft_prompt_dismiss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        DraftRepository::save_draft(&ApplicationRecord::default(), &path).unwrap();

        let mut app = App::new(path, true);
        assert_eq!(app.mode, AppMode::DraftPrompt);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('d'), KeyModifiers::NONE, &services());
        assert_eq!(app.mode, AppMode::Form);
        assert!(app.draft_available);
        assert!(app.draft_path.exists());
    }

    #[test]
    fn test_draft_prompt_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        let mut stored = ApplicationRecord::default();
        stored.personal_info.first_name = "Saved".to_string();
        DraftRepository::save_draft(&stored, &path).unwrap();

        let mut app = App::new(path, true);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('l'), KeyModifiers::NONE, &services());
        assert_eq!(app.mode, AppMode::Form);
        assert_eq!(app.record.personal_info.first_name, "Saved");
    }

    #[test]
    fn test_draft_prompt_clear_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        DraftRepository::save_draft(&ApplicationRecord::default(), &path).unwrap();

        let mut app = App::new(path.clone(), true);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('c'), KeyModifiers::NONE, &services());
        assert_eq!(app.mode, AppMode::Form);
        assert!(!app.draft_available);
        assert!(!path.exists());
    }

    #[test]
    fn test_help_mode_toggle_and_scroll() {
        let (mut app, _dir) = app_with_draft_dir();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('?'), KeyModifiers::NONE, &services());
        assert_eq!(app.mode, AppMode::Help);
        InputHandler::handle_key_event(&mut app, KeyCode::Down, KeyModifiers::NONE, &services());
        assert_eq!(app.help_scroll, 1);
        InputHandler::handle_key_event(&mut app, KeyCode::Esc, KeyModifiers::NONE, &services());
        assert_eq!(app.mode, AppMode::Form);
    }
}
