use crate::application::{App, AppMode, StepStatus, UsernameStatus};
use crate::domain::{ApplicationRecord, FormStep};
use crate::presentation::fields::{step_fields, Field};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_stepper(f, app, chunks[1]);
    if app.is_last_step() {
        render_review(f, app, chunks[2]);
    } else {
        render_step_form(f, app, chunks[2]);
    }
    render_status_bar(f, app, chunks[3]);

    match app.mode {
        AppMode::Help => render_help_popup(f, app.help_scroll),
        AppMode::DraftPrompt => render_draft_prompt(f),
        _ => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "jobform - Job Application | Step {}/{}: {}",
        app.current_step + 1,
        FormStep::COUNT,
        app.step().label()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_stepper(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for (index, step) in FormStep::ALL.iter().enumerate() {
        let status = app.step_status(index);
        let (marker, style) = match status {
            StepStatus::Completed => ("✓", Style::default().fg(Color::Green)),
            StepStatus::Current => (
                "●",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
            StepStatus::Incomplete => ("!", Style::default().fg(Color::Red)),
            StepStatus::Upcoming => ("○", Style::default().fg(Color::DarkGray)),
        };
        spans.push(Span::styled(
            format!("{} {} {}", marker, index + 1, step.label()),
            style,
        ));
        if index + 1 < FormStep::COUNT {
            spans.push(Span::styled(" ── ", Style::default().fg(Color::DarkGray)));
        }
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_step_form(f: &mut Frame, app: &App, area: Rect) {
    let fields = step_fields(app.step(), &app.record);

    let mut rows = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let focused = index == app.focused_field;
        let value = if focused && app.mode == AppMode::Editing {
            app.input.clone()
        } else {
            field.get(&app.record)
        };
        let error = app.errors.get(&field.path()).unwrap_or("");

        let label_style = if focused {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let value_style = if focused && app.mode == AppMode::Editing {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };

        let mut label = field.label();
        if *field == Field::Username {
            label.push_str(username_suffix(app.username_status));
        }

        rows.push(
            Row::new(vec![
                Cell::from(label).style(label_style),
                Cell::from(value).style(value_style),
                Cell::from(error.to_string()).style(Style::default().fg(Color::Red)),
            ])
            .height(1),
        );
    }

    let widths = [
        Constraint::Length(34),
        Constraint::Min(24),
        Constraint::Min(24),
    ];
    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.step().label()),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}

fn username_suffix(status: UsernameStatus) -> &'static str {
    match status {
        UsernameStatus::Unknown => "",
        UsernameStatus::Checking => " (checking...)",
        UsernameStatus::Available => " (available)",
        UsernameStatus::Taken => " (taken)",
    }
}

fn render_review(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(area);

    let summary = Paragraph::new(application_summary(&app.record))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Review Your Application"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(summary, chunks[0]);

    // The three consent toggles live below the summary.
    let fields = step_fields(FormStep::TermsAndReview, &app.record);
    let mut rows = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let focused = index == app.focused_field;
        let checked = field.get(&app.record) == "yes";
        let marker = if checked { "[x]" } else { "[ ]" };
        let style = if focused {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else if checked {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        let error = app.errors.get(&field.path()).unwrap_or("");
        rows.push(Row::new(vec![
            Cell::from(format!("{} {}", marker, field.label())).style(style),
            Cell::from(error.to_string()).style(Style::default().fg(Color::Red)),
        ]));
    }
    let table = Table::new(rows, [Constraint::Length(50), Constraint::Min(20)])
        .block(Block::default().borders(Borders::ALL).title("Consent"));
    f.render_widget(table, chunks[1]);
}

/// Plain-text summary of the whole record, shown on the review screen and
/// copied to the clipboard on request.
pub fn application_summary(record: &ApplicationRecord) -> String {
    let p = &record.personal_info;
    let pro = &record.professional_info;
    let a = &record.additional_info;

    let mut out = String::new();
    out.push_str("== Personal Information ==\n");
    out.push_str(&format!("Name: {} {}\n", p.first_name, p.last_name));
    out.push_str(&format!("Email: {}\n", p.email));
    out.push_str(&format!("Phone: {}\n", p.phone));
    out.push_str(&format!("Username: {}\n", p.username));
    out.push_str(&format!("Date of Birth: {}\n", p.date_of_birth));
    out.push_str(&format!(
        "Address: {}, {}, {} {}, {}\n",
        p.address.street, p.address.city, p.address.state, p.address.zip, p.address.country
    ));

    out.push_str("\n== Professional Background ==\n");
    out.push_str(&format!("Years of Experience: {}\n", pro.years_of_experience));
    out.push_str(&format!("Salary Expectation: {}\n", pro.salary_expectation));
    out.push_str(&format!("Skills: {}\n", pro.skills.join(", ")));
    for exp in &pro.experiences {
        let end = if exp.current {
            "Present".to_string()
        } else {
            exp.end_date.map(|d| d.to_string()).unwrap_or_default()
        };
        out.push_str(&format!(
            "- {} at {} ({} - {}): {}\n",
            exp.position, exp.company, exp.start_date, end, exp.description
        ));
    }

    out.push_str("\n== Documents ==\n");
    for (label, file) in [
        ("Resume", &record.documents.resume),
        ("Profile Picture", &record.documents.profile_picture),
        ("Cover Letter", &record.documents.cover_letter),
    ] {
        if let Some(meta) = file {
            out.push_str(&format!("{}: {} ({} bytes)\n", label, meta.name, meta.size));
        }
    }

    out.push_str("\n== Additional Information ==\n");
    out.push_str(&format!("Heard about us: {}", a.how_did_you_hear.label()));
    if !a.other_source.is_empty() {
        out.push_str(&format!(" ({})", a.other_source));
    }
    out.push('\n');
    out.push_str(&format!("Available Start Date: {}\n", a.available_start_date));
    out.push_str(&format!(
        "Willing to Relocate: {}\n",
        if a.willing_to_relocate { "Yes" } else { "No" }
    ));
    out.push_str(&format!("Reason for Applying: {}\n", a.reason_for_applying));
    if !a.additional_comments.is_empty() {
        out.push_str(&format!("Additional Comments: {}\n", a.additional_comments));
    }
    out
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.mode {
        AppMode::Form => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else if app.is_last_step() {
                "Enter: submit | Space: toggle consent | Ctrl+Y: copy summary | Ctrl+P: previous | F1/?: help | q: quit".to_string()
            } else {
                "Tab/↑↓: fields | Enter: edit | Space: toggle | Ctrl+N/P: next/prev step | 1-5: jump back | Ctrl+S: save draft | F1/?: help | q: quit".to_string()
            }
        }
        AppMode::Editing => format!("Editing: {} (Enter to commit, Esc to cancel)", app.input),
        AppMode::DraftPrompt => {
            "A saved draft was found: (l)oad, (d)ismiss, (c)lear".to_string()
        }
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
    };

    let style = match app.mode {
        AppMode::Form => Style::default(),
        AppMode::Editing => Style::default().fg(Color::Green),
        AppMode::DraftPrompt => Style::default().fg(Color::Yellow),
        AppMode::Help => Style::default().fg(Color::Cyan),
    };
    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn render_draft_prompt(f: &mut Frame) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 6,
        y: area.height / 3,
        width: area.width * 2 / 3,
        height: 5,
    };
    f.render_widget(Clear, popup_area);
    let prompt = Paragraph::new(
        "A saved draft of your application was found.\n\
         (l) load it   (d) start fresh, keep the draft   (c) delete it",
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Saved Draft")
            .style(Style::default().fg(Color::Yellow)),
    )
    .wrap(Wrap { trim: false });
    f.render_widget(prompt, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "jobform Help (Line {}/{})",
                    start_line + 1,
                    help_lines.len()
                ))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> String {
    r#"JOBFORM - TERMINAL JOB APPLICATION

=== THE WIZARD ===
The application has five steps, completed in order:
  1. Personal Information
  2. Professional Background
  3. Upload Documents
  4. Additional Questions
  5. Review & Submit

Moving forward validates the current step; errors appear next to the
offending fields and block the move until fixed. Moving backward is
never blocked.

=== NAVIGATION ===
Tab / Down      Next field
Shift+Tab / Up  Previous field
Ctrl+N          Next step (validates first)
Ctrl+P          Previous step
1-5             Jump back to an earlier step (validates current step)
q               Quit (form mode)

=== EDITING ===
Enter           Edit the focused field / toggle a checkbox
Space           Toggle a checkbox or cycle a choice
Esc             Cancel the edit
Dates are entered as YYYY-MM-DD. Document fields take a filesystem
path; only the file's name, size, and type are recorded.

=== PROFESSIONAL BACKGROUND ===
+               Add a work experience entry
-               Remove the experience entry under the cursor
=               Add a skill entry
_               Remove the skill entry under the cursor
At least one experience and one skill always remain.

=== DRAFTS ===
Ctrl+S          Save the application as a draft
Ctrl+O          Load the saved draft
Ctrl+D          Delete the saved draft
The draft is also saved automatically every 30 seconds and on every
successful step change. Attached files are stored as metadata only
and must be re-attached after loading a draft.

=== OTHER ===
Ctrl+U          Check username availability (step 1)
Ctrl+Y          Copy the application summary to the clipboard (step 5)
Enter (step 5)  Validate everything and submit
F1 or ?         This help screen"#
        .to_string()
}
