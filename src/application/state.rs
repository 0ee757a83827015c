//! Application state management for the terminal job-application wizard.
//!
//! This module contains the wizard controller: step sequencing, per-step
//! validation gating, draft bookkeeping, and the username-availability
//! state machine. All file and network I/O happens in the input layer,
//! which feeds results back in through the `set_*_result` methods.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::domain::{
    validate_record, validate_step, ApplicationRecord, FormStep, ValidationErrors,
};

/// File name of the single draft slot.
pub const DRAFT_FILE: &str = "job_application_draft.json";

/// Cadence of the background draft save.
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Represents the current mode of the application.
///
/// The mode determines how user input is interpreted and what UI
/// elements are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Navigating fields and steps
    Form,
    /// Typing into the focused field
    Editing,
    /// Startup prompt offering to load, dismiss, or delete a saved draft
    DraftPrompt,
    /// Help screen is displayed
    Help,
}

/// Display classification of a step in the stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Current,
    Incomplete,
    Upcoming,
}

/// Result of the most recent username-availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameStatus {
    Unknown,
    Checking,
    Available,
    Taken,
}

/// Main application state: the application record plus wizard and UI state.
///
/// # Examples
///
/// ```
/// use jobform::application::App;
///
/// let app = App::default();
/// assert_eq!(app.current_step, 0);
/// assert!(app.is_first_step());
/// ```
#[derive(Debug)]
pub struct App {
    /// The application record being filled in
    pub record: ApplicationRecord,
    /// Currently active step index (zero-based)
    pub current_step: usize,
    /// Current application mode
    pub mode: AppMode,
    /// Index of the focused field within the current step
    pub focused_field: usize,
    /// Current input buffer (for editing mode)
    pub input: String,
    /// Byte offset of the cursor within the input buffer, always on a
    /// char boundary
    pub cursor_position: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Field errors from the most recent validation run
    pub errors: ValidationErrors,
    /// Whether a draft exists in the storage slot
    pub draft_available: bool,
    /// Path of the draft storage slot
    pub draft_path: PathBuf,
    /// Whether the whole form was just successfully submitted
    pub submit_success: bool,
    /// Outcome of the latest username-availability check
    pub username_status: UsernameStatus,
    /// Monotonic id of the latest username check request; stale
    /// responses are discarded by comparing against this
    username_request_seq: u64,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// When the auto-save timer last fired
    pub last_autosave: Instant,
}

impl Default for App {
    fn default() -> Self {
        Self {
            record: ApplicationRecord::default(),
            current_step: 0,
            mode: AppMode::Form,
            focused_field: 0,
            input: String::new(),
            cursor_position: 0,
            status_message: None,
            errors: ValidationErrors::new(),
            draft_available: false,
            draft_path: PathBuf::from(DRAFT_FILE),
            submit_success: false,
            username_status: UsernameStatus::Unknown,
            username_request_seq: 0,
            help_scroll: 0,
            last_autosave: Instant::now(),
        }
    }
}

impl App {
    /// Creates the wizard over the given draft slot. When a draft is
    /// already available the session opens with the draft prompt.
    pub fn new(draft_path: PathBuf, draft_available: bool) -> Self {
        Self {
            draft_path,
            draft_available,
            mode: if draft_available {
                AppMode::DraftPrompt
            } else {
                AppMode::Form
            },
            ..Self::default()
        }
    }

    /// The currently active step. An out-of-range index reads as the
    /// last step rather than panicking, since `current_step` is public.
    pub fn step(&self) -> FormStep {
        FormStep::from_index(self.current_step).unwrap_or(FormStep::TermsAndReview)
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == FormStep::COUNT - 1
    }

    /// Jumps directly to a step, clamping the target into range.
    /// No validation is performed.
    pub fn go_to_step(&mut self, target: usize) {
        self.current_step = target.min(FormStep::COUNT - 1);
        self.focused_field = 0;
    }

    /// Handles a click on the stepper. Forward jumps are disallowed;
    /// backward jumps validate the current step first and only happen
    /// when it is clean. Clicking the current step is a no-op.
    pub fn attempt_step_click(&mut self, target: usize) {
        if target >= self.current_step {
            return;
        }
        if self.validate_current_step() {
            self.go_to_step(target);
        }
    }

    /// Advances to the next step if the current step validates.
    ///
    /// Returns `true` when the step advanced; the caller is then expected
    /// to persist the draft. On validation failure the index is unchanged
    /// and the error map is populated for inline display.
    pub fn next_step(&mut self) -> bool {
        if self.is_last_step() {
            return false;
        }
        if !self.validate_current_step() {
            return false;
        }
        self.current_step += 1;
        self.focused_field = 0;
        true
    }

    /// Moves back one step. Backward movement is never blocked.
    pub fn prev_step(&mut self) {
        if self.current_step > 0 {
            self.current_step -= 1;
            self.focused_field = 0;
        }
    }

    /// Validates the active step's fields, replacing the error map.
    pub fn validate_current_step(&mut self) -> bool {
        let today = Local::now().date_naive();
        self.errors = validate_step(&self.record, self.step(), today);
        self.errors.is_empty()
    }

    /// Classifies a step for the stepper display. Pure function of
    /// (record, current step, submit success).
    pub fn step_status(&self, index: usize) -> StepStatus {
        if self.submit_success {
            return StepStatus::Completed;
        }
        if index == self.current_step {
            StepStatus::Current
        } else if index > self.current_step {
            StepStatus::Upcoming
        } else if let Some(step) = FormStep::from_index(index) {
            if step.section_filled(&self.record) {
                StepStatus::Completed
            } else {
                StepStatus::Incomplete
            }
        } else {
            StepStatus::Upcoming
        }
    }

    /// Moves field focus down within the current step.
    pub fn focus_next(&mut self, field_count: usize) {
        if field_count > 0 && self.focused_field + 1 < field_count {
            self.focused_field += 1;
        }
    }

    /// Moves field focus up within the current step.
    pub fn focus_prev(&mut self) {
        self.focused_field = self.focused_field.saturating_sub(1);
    }

    /// Switches to editing mode with the given initial buffer contents
    /// and the cursor at the end.
    pub fn start_editing(&mut self, initial: String) {
        self.mode = AppMode::Editing;
        self.cursor_position = initial.len();
        self.input = initial;
        self.status_message = None;
    }

    /// Completes editing, returning the buffer for the caller to commit
    /// through the field accessor. Returns to form mode.
    pub fn finish_editing(&mut self) -> String {
        self.mode = AppMode::Form;
        self.cursor_position = 0;
        std::mem::take(&mut self.input)
    }

    /// Cancels editing without committing the buffer.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Form;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Processes the result of a draft save.
    pub fn set_save_result(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                self.draft_available = true;
                self.status_message = Some("Draft saved".to_string());
            }
            Err(error) => {
                self.status_message = Some(format!("Draft save failed: {}", error));
            }
        }
    }

    /// Processes the result of a draft load. On success the stored record
    /// replaces the in-memory record wholesale; on failure the wizard
    /// continues with the record it already has.
    pub fn set_load_result(&mut self, result: Result<Option<ApplicationRecord>, String>) {
        match result {
            Ok(Some(record)) => {
                self.record = record;
                self.errors = ValidationErrors::new();
                self.draft_available = true;
                self.status_message = Some("Draft loaded".to_string());
            }
            Ok(None) => {
                self.draft_available = false;
                self.status_message = Some("No saved draft found".to_string());
            }
            Err(error) => {
                self.status_message = Some(format!("Draft load failed: {}", error));
            }
        }
        if self.mode == AppMode::DraftPrompt {
            self.mode = AppMode::Form;
        }
    }

    /// Processes the result of deleting the draft.
    pub fn set_clear_result(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                self.draft_available = false;
                self.status_message = Some("Draft deleted".to_string());
            }
            Err(error) => {
                self.status_message = Some(format!("Draft delete failed: {}", error));
            }
        }
        if self.mode == AppMode::DraftPrompt {
            self.mode = AppMode::Form;
        }
    }

    /// Dismisses the startup draft prompt, keeping the stored draft.
    pub fn dismiss_draft_prompt(&mut self) {
        if self.mode == AppMode::DraftPrompt {
            self.mode = AppMode::Form;
        }
    }

    /// Begins a username-availability check, returning the request id and
    /// username to hand to the directory. Returns `None` when there is no
    /// username to check.
    pub fn start_username_check(&mut self) -> Option<(u64, String)> {
        let username = self.record.personal_info.username.clone();
        if username.is_empty() {
            self.status_message = Some("Enter a username first".to_string());
            return None;
        }
        self.username_request_seq += 1;
        self.username_status = UsernameStatus::Checking;
        Some((self.username_request_seq, username))
    }

    /// Applies the outcome of a username check. Responses carrying a stale
    /// request id are discarded, so a fast re-check can never be
    /// overwritten by an older in-flight result.
    pub fn apply_username_result(&mut self, request_id: u64, result: Result<bool, String>) {
        if request_id != self.username_request_seq {
            return;
        }
        match result {
            Ok(true) => {
                self.username_status = UsernameStatus::Available;
                self.status_message = Some("Username is available".to_string());
            }
            Ok(false) => {
                self.username_status = UsernameStatus::Taken;
                self.status_message = Some("Username is already taken".to_string());
            }
            Err(error) => {
                self.username_status = UsernameStatus::Unknown;
                self.status_message = Some(format!("Username check failed: {}", error));
            }
        }
    }

    /// Runs whole-record validation ahead of submission. Returns `true`
    /// when the record is ready to hand to the submission collaborator.
    pub fn validate_for_submit(&mut self) -> bool {
        let today = Local::now().date_naive();
        self.errors = validate_record(&self.record, today);
        if !self.errors.is_empty() {
            self.status_message = Some(format!(
                "Cannot submit: {} field(s) need attention",
                self.errors.len()
            ));
        }
        self.errors.is_empty()
    }

    /// Processes the result of handing the record to the submission
    /// collaborator. Success discards the record (replaced by defaults);
    /// failure preserves both the record and the draft.
    pub fn set_submit_result(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                self.submit_success = true;
                self.record = ApplicationRecord::default();
                self.errors = ValidationErrors::new();
                self.status_message = Some("Application submitted successfully!".to_string());
            }
            Err(error) => {
                self.status_message = Some(format!("Submission failed: {}", error));
            }
        }
    }

    /// Reports whether the auto-save timer is due, resetting it when so.
    /// Called from the event loop on every poll tick.
    pub fn autosave_due(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_autosave) >= AUTOSAVE_INTERVAL {
            self.last_autosave = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::{Experience, FileMeta};

    fn filled_personal_info(app: &mut App) {
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
    }

    fn fully_valid(app: &mut App) {
        filled_personal_info(app);
        app.record.professional_info.experiences = vec![Experience {
            company: "Babbage & Co".to_string(),
            position: "Engineer".to_string(),
            start_date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            end_date: None,
            current: true,
            description: "Designed the engine".to_string(),
        }];
        app.record.professional_info.skills = vec!["Mathematics".to_string()];
        app.record.documents.resume = Some(FileMeta {
            name: "resume.pdf".to_string(),
            size: 2048,
            mime: "application/pdf".to_string(),
        });
        app.record.additional_info.reason_for_applying =
            "I have long admired this company and believe my experience fits well.".to_string();
        app.record.terms_and_review.agree_to_terms = true;
        app.record.terms_and_review.agree_to_background_check = true;
        app.record.terms_and_review.confirm_information_accurate = true;
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.current_step, 0);
        assert_eq!(app.mode, AppMode::Form);
        assert!(app.is_first_step());
        assert!(!app.is_last_step());
        assert!(app.errors.is_empty());
        assert!(!app.draft_available);
        assert!(!app.submit_success);
        assert_eq!(app.username_status, UsernameStatus::Unknown);
    }

    #[test]
    fn test_new_with_draft_opens_prompt() {
        let app = App::new(PathBuf::from("x.json"), true);
        assert_eq!(app.mode, AppMode::DraftPrompt);
        assert!(app.draft_available);

        let app = App::new(PathBuf::from("x.json"), false);
        assert_eq!(app.mode, AppMode::Form);
    }

    #[test]
    fn test_go_to_step_clamps() {
        let mut app = App::default();
        app.go_to_step(99);
        assert_eq!(app.current_step, FormStep::COUNT - 1);
        app.go_to_step(2);
        assert_eq!(app.current_step, 2);
    }

    #[test]
    fn test_step_reads_last_step_for_out_of_range_index() {
        let mut app = App::default();
        app.current_step = 99;
        assert_eq!(app.step(), FormStep::TermsAndReview);
        // Stepper classification stays total as well.
        assert_eq!(app.step_status(99), StepStatus::Current);
    }

    #[test]
    fn test_attempt_step_click_forward_is_noop() {
        let mut app = App::default();
        app.current_step = 1;
        for target in 2..FormStep::COUNT + 2 {
            app.attempt_step_click(target);
            assert_eq!(app.current_step, 1);
        }
    }

    #[test]
    fn test_attempt_step_click_same_step_is_noop() {
        let mut app = App::default();
        app.current_step = 2;
        app.attempt_step_click(2);
        assert_eq!(app.current_step, 2);
        assert!(app.errors.is_empty());
    }

    #[test]
    fn test_attempt_step_click_back_validates_current_first() {
        let mut app = App::default();
        app.current_step = 0;
        app.go_to_step(0);
        // Force the wizard onto step 1 with an invalid step-1 section,
        // then try to click back to step 0.
        app.current_step = 1;
        app.attempt_step_click(0);
        // Professional info is blank, so the click is refused.
        assert_eq!(app.current_step, 1);
        assert!(!app.errors.is_empty());

        // With a valid current step the backward click goes through.
        app.record.professional_info.experiences[0].company = "Acme".to_string();
        app.record.professional_info.experiences[0].position = "Dev".to_string();
        app.record.professional_info.experiences[0].current = true;
        app.record.professional_info.experiences[0].description = "Things".to_string();
        app.record.professional_info.skills[0] = "Rust".to_string();
        app.attempt_step_click(0);
        assert_eq!(app.current_step, 0);
    }

    #[test]
    fn test_next_step_blocked_by_validation() {
        let mut app = App::default();
        assert!(!app.next_step());
        assert_eq!(app.current_step, 0);
        assert!(app.errors.get("personalInfo.firstName").is_some());
    }

    #[test]
    fn test_next_step_advances_when_valid() {
        let mut app = App::default();
        filled_personal_info(&mut app);
        assert!(app.next_step());
        assert_eq!(app.current_step, 1);
        assert!(app.errors.is_empty());
    }

    #[test]
    fn test_next_step_noop_on_last_step() {
        let mut app = App::default();
        app.current_step = FormStep::COUNT - 1;
        assert!(!app.next_step());
        assert_eq!(app.current_step, FormStep::COUNT - 1);
    }

    #[test]
    fn test_prev_step_never_blocked() {
        let mut app = App::default();
        app.current_step = 3;
        // Step 3 section is invalid but backward movement still works.
        app.prev_step();
        assert_eq!(app.current_step, 2);
        app.current_step = 0;
        app.prev_step();
        assert_eq!(app.current_step, 0);
    }

    #[test]
    fn test_step_status_classification() {
        let mut app = App::default();
        app.current_step = 2;

        // Past step with an empty section reads incomplete.
        assert_eq!(app.step_status(0), StepStatus::Incomplete);
        assert_eq!(app.step_status(2), StepStatus::Current);
        assert_eq!(app.step_status(3), StepStatus::Upcoming);
        assert_eq!(app.step_status(4), StepStatus::Upcoming);

        // Filling the section flips it to completed.
        app.record.personal_info.first_name = "Ada".to_string();
        assert_eq!(app.step_status(0), StepStatus::Completed);
    }

    #[test]
    fn test_step_status_after_submit_success() {
        let mut app = App::default();
        app.submit_success = true;
        for index in 0..FormStep::COUNT {
            assert_eq!(app.step_status(index), StepStatus::Completed);
        }
    }

    #[test]
    fn test_focus_movement() {
        let mut app = App::default();
        app.focus_next(3);
        app.focus_next(3);
        assert_eq!(app.focused_field, 2);
        app.focus_next(3);
        assert_eq!(app.focused_field, 2); // clamped
        app.focus_prev();
        assert_eq!(app.focused_field, 1);
    }

    #[test]
    fn test_editing_round_trip() {
        let mut app = App::default();
        app.start_editing("hello".to_string());
        assert_eq!(app.mode, AppMode::Editing);
        assert_eq!(app.cursor_position, 5);

        let committed = app.finish_editing();
        assert_eq!(committed, "hello");
        assert_eq!(app.mode, AppMode::Form);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_cancel_editing_discards_buffer() {
        let mut app = App::default();
        app.start_editing("typed".to_string());
        app.cancel_editing();
        assert_eq!(app.mode, AppMode::Form);
        assert!(app.input.is_empty());
        assert_eq!(app.cursor_position, 0);
    }

    #[test]
    fn test_save_result_marks_draft_available() {
        let mut app = App::default();
        app.set_save_result(Ok(()));
        assert!(app.draft_available);
        assert_eq!(app.status_message.as_deref(), Some("Draft saved"));

        app.set_save_result(Err("disk full".to_string()));
        assert!(app.status_message.unwrap().contains("disk full"));
    }

    #[test]
    fn test_load_result_adopts_record_wholesale() {
        let mut app = App::new(PathBuf::from("x.json"), true);
        let mut stored = ApplicationRecord::default();
        stored.personal_info.first_name = "Grace".to_string();

        app.set_load_result(Ok(Some(stored)));
        assert_eq!(app.record.personal_info.first_name, "Grace");
        assert_eq!(app.mode, AppMode::Form);
        assert!(app.draft_available);
    }

    #[test]
    fn test_load_result_missing_draft_is_not_an_error() {
        let mut app = App::default();
        app.record.personal_info.first_name = "Keep".to_string();
        app.set_load_result(Ok(None));
        assert_eq!(app.record.personal_info.first_name, "Keep");
        assert!(!app.draft_available);
        assert_eq!(app.status_message.as_deref(), Some("No saved draft found"));
    }

    #[test]
    fn test_load_failure_keeps_in_memory_record() {
        let mut app = App::default();
        app.record.personal_info.first_name = "Keep".to_string();
        app.set_load_result(Err("corrupted".to_string()));
        assert_eq!(app.record.personal_info.first_name, "Keep");
        assert!(app.status_message.unwrap().contains("corrupted"));
    }

    #[test]
    fn test_clear_result() {
        let mut app = App::new(PathBuf::from("x.json"), true);
        app.set_clear_result(Ok(()));
        assert!(!app.draft_available);
        assert_eq!(app.mode, AppMode::Form);
    }

    #[test]
    fn test_username_check_requires_username() {
        let mut app = App::default();
        assert!(app.start_username_check().is_none());
        assert_eq!(app.username_status, UsernameStatus::Unknown);
    }

    #[test]
    fn test_username_check_happy_path() {
        let mut app = App::default();
        app.record.personal_info.username = "ada_l".to_string();
        let (id, username) = app.start_username_check().unwrap();
        assert_eq!(username, "ada_l");
        assert_eq!(app.username_status, UsernameStatus::Checking);

        app.apply_username_result(id, Ok(true));
        assert_eq!(app.username_status, UsernameStatus::Available);
    }

    #[test]
    fn test_stale_username_result_discarded() {
        let mut app = App::default();
        app.record.personal_info.username = "ada_l".to_string();

        let (first, _) = app.start_username_check().unwrap();
        let (second, _) = app.start_username_check().unwrap();
        assert_ne!(first, second);

        // The older in-flight response resolves last but is ignored.
        app.apply_username_result(second, Ok(true));
        app.apply_username_result(first, Ok(false));
        assert_eq!(app.username_status, UsernameStatus::Available);
    }

    #[test]
    fn test_username_check_error_resets_to_unknown() {
        let mut app = App::default();
        app.record.personal_info.username = "ada_l".to_string();
        let (id, _) = app.start_username_check().unwrap();
        app.apply_username_result(id, Err("timeout".to_string()));
        assert_eq!(app.username_status, UsernameStatus::Unknown);
    }

    #[test]
    fn test_validate_for_submit_requires_whole_record() {
        let mut app = App::default();
        filled_personal_info(&mut app);
        // Personal info alone is not enough for submission.
        assert!(!app.validate_for_submit());
        assert!(app.errors.get("documents.resume").is_some());

        fully_valid(&mut app);
        assert!(app.validate_for_submit());
    }

    #[test]
    fn test_submit_success_resets_record() {
        let mut app = App::default();
        fully_valid(&mut app);
        assert!(app.validate_for_submit());

        app.set_submit_result(Ok(()));
        assert!(app.submit_success);
        assert_eq!(app.record, ApplicationRecord::default());
        assert!(app.errors.is_empty());
    }

    #[test]
    fn test_submit_failure_preserves_record() {
        let mut app = App::default();
        fully_valid(&mut app);
        let before = app.record.clone();

        app.set_submit_result(Err("server unavailable".to_string()));
        assert!(!app.submit_success);
        assert_eq!(app.record, before);
        assert!(app.status_message.unwrap().contains("server unavailable"));
    }

    #[test]
    fn test_autosave_cadence() {
        let mut app = App::default();
        let start = app.last_autosave;
        assert!(!app.autosave_due(start + Duration::from_secs(29)));
        assert!(app.autosave_due(start + AUTOSAVE_INTERVAL));
        // Timer reset after firing.
        assert!(!app.autosave_due(start + AUTOSAVE_INTERVAL + Duration::from_secs(1)));
        assert!(app.autosave_due(start + AUTOSAVE_INTERVAL * 2));
    }
}
