// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use una_app::{
    AnalysisInstruction, AppCommand, AppMode, AppState, ControlField, GatewayAction, KnowledgeDoc,
    PanelKind, Panels, PromptRequest, StatusTab,
};

const ANALYSIS_DELAY: Duration = Duration::from_millis(1500);
const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);
const FOCUS_MARK: &str = "▸";
const CURSOR_MARK: &str = "›";
const AWAITING_TRANSMISSION: &str = "Awaiting transmission...";
const AWAITING_ANALYSIS: &str = "Analysis results will appear here.";
const NO_FILTER_MATCHES: &str = "No filters match your criteria.";
const CODE_PLACEHOLDER: &str =
    "Paste decompiled APK, obfuscated script, or any code block here...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOutcome {
    pub action: GatewayAction,
    pub result: Result<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Gateway(GatewayOutcome),
    AnalysisFinished,
}

/// Seam between the shell and the outside world. The binary backs
/// `send_prompt` with the real HTTP client and overrides `spawn_send` to run
/// it off the event loop; tests substitute canned outcomes.
pub trait ConsoleRuntime {
    fn send_prompt(&mut self, request: &PromptRequest) -> Result<String>;

    fn spawn_send(&mut self, request: PromptRequest, tx: Sender<InternalEvent>) -> Result<()> {
        let action = request.action;
        let result = self
            .send_prompt(&request)
            .map_err(|error| error.to_string());
        tx.send(InternalEvent::Gateway(GatewayOutcome { action, result }))
            .map_err(|_| anyhow::anyhow!("gateway event channel closed"))?;
        Ok(())
    }

    fn copy_identifier(&mut self, id: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("open clipboard")?;
        clipboard.set_text(id.to_owned()).context("write clipboard")?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    panels: Panels,
    help_visible: bool,
    status_token: u64,
}

pub fn run_app<R: ConsoleRuntime>(
    state: &mut AppState,
    panels: Panels,
    runtime: &mut R,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        panels,
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(state: &mut AppState, view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            // Outcomes apply in arrival order; a second send while one is
            // outstanding is not canceled, so the last arrival wins.
            InternalEvent::Gateway(outcome) => {
                view_data.panels.control.apply_outcome(outcome.result);
            }
            InternalEvent::AnalysisFinished => {
                view_data.panels.code.finish_analysis();
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn schedule_analysis_finished(internal_tx: &Sender<InternalEvent>) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(ANALYSIS_DELAY);
        let _ = sender.send(InternalEvent::AnalysisFinished);
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: ConsoleRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    match state.mode {
        AppMode::Input => handle_input_key(state, view_data, key),
        AppMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key),
    }

    false
}

fn handle_nav_key<R: ConsoleRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('?'), KeyModifiers::NONE) => {
            view_data.help_visible = true;
            return;
        }
        (KeyCode::Char('f'), KeyModifiers::NONE) => {
            state.dispatch(AppCommand::NextPanel);
            return;
        }
        (KeyCode::Char('b'), KeyModifiers::NONE) => {
            state.dispatch(AppCommand::PrevPanel);
            return;
        }
        (KeyCode::Char(ch), KeyModifiers::NONE) if ('1'..='4').contains(&ch) => {
            let index = ch as usize - '1' as usize;
            state.dispatch(AppCommand::SelectPanel(PanelKind::ALL[index]));
            return;
        }
        (KeyCode::Char('i'), KeyModifiers::NONE) => {
            if state.active_panel == PanelKind::Knowledge {
                emit_status(state, view_data, internal_tx, "knowledge base is read-only");
            } else {
                state.dispatch(AppCommand::EnterInput);
            }
            return;
        }
        _ => {}
    }

    match state.active_panel {
        PanelKind::Control => handle_control_nav_key(state, runtime, view_data, internal_tx, key),
        PanelKind::Code => handle_code_nav_key(view_data, internal_tx, key),
        PanelKind::Knowledge => handle_knowledge_nav_key(view_data, key),
        PanelKind::Filters => handle_filter_nav_key(state, runtime, view_data, internal_tx, key),
    }
}

fn handle_control_nav_key<R: ConsoleRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Tab, _) => view_data.panels.control.focus_next(),
        (KeyCode::Char('g'), KeyModifiers::NONE) => {
            start_send(state, runtime, view_data, internal_tx, GatewayAction::Command);
        }
        (KeyCode::Char('y'), KeyModifiers::NONE) => {
            start_send(state, runtime, view_data, internal_tx, GatewayAction::Query);
        }
        _ => {}
    }
}

fn start_send<R: ConsoleRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    action: GatewayAction,
) {
    let Some(request) = view_data.panels.control.begin_send(action) else {
        return;
    };

    emit_status(state, view_data, internal_tx, format!("{}...", action.label()));
    if let Err(error) = runtime.spawn_send(request, internal_tx.clone()) {
        view_data.panels.control.apply_outcome(Err(error.to_string()));
    }
}

fn handle_code_nav_key(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>, key: KeyEvent) {
    // One analysis at a time; a restart mid-delay would let the first timer
    // clear the second run's loading flag early.
    if view_data.panels.code.loading {
        return;
    }

    let instruction = match (key.code, key.modifiers) {
        (KeyCode::Char('v'), KeyModifiers::NONE) => AnalysisInstruction::Vulnerabilities,
        (KeyCode::Char('n'), KeyModifiers::NONE) => AnalysisInstruction::Endpoints,
        (KeyCode::Char('d'), KeyModifiers::NONE) => AnalysisInstruction::Deobfuscate,
        _ => return,
    };

    if view_data.panels.code.begin_analysis(instruction) {
        schedule_analysis_finished(internal_tx);
    }
}

fn handle_knowledge_nav_key(view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Left => view_data.panels.knowledge.rotate(-1),
        KeyCode::Right => view_data.panels.knowledge.rotate(1),
        _ => {}
    }
}

fn handle_filter_nav_key<R: ConsoleRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('s'), KeyModifiers::NONE) => view_data.panels.filters.cycle_tab(),
        (KeyCode::Up, _) => view_data.panels.filters.move_cursor(-1),
        (KeyCode::Down, _) => view_data.panels.filters.move_cursor(1),
        (KeyCode::Char('c'), KeyModifiers::NONE) => {
            copy_selected_identifier(state, runtime, view_data, internal_tx);
        }
        _ => {}
    }
}

fn copy_selected_identifier<R: ConsoleRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(record) = view_data.panels.filters.selected_record() else {
        emit_status(state, view_data, internal_tx, "no filter selected");
        return;
    };

    // Fire-and-forget: a clipboard failure only dents the status line.
    match runtime.copy_identifier(record.id) {
        Ok(()) => emit_status(state, view_data, internal_tx, format!("copied {}", record.id)),
        Err(error) => emit_status(
            state,
            view_data,
            internal_tx,
            format!("clipboard unavailable: {error}"),
        ),
    }
}

fn handle_input_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    let multiline = input_is_multiline(state, view_data);
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::ExitToNav);
        }
        (KeyCode::Enter, _) => {
            if multiline {
                push_input_char(state, view_data, '\n');
            } else {
                state.dispatch(AppCommand::ExitToNav);
            }
        }
        (KeyCode::Tab, _) if state.active_panel == PanelKind::Control => {
            view_data.panels.control.focus_next();
        }
        (KeyCode::Backspace, _) => {
            pop_input_char(state, view_data);
        }
        (KeyCode::Char(ch), modifiers) => {
            if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT {
                push_input_char(state, view_data, ch);
            }
        }
        _ => {}
    }
}

fn input_is_multiline(state: &AppState, view_data: &ViewData) -> bool {
    match state.active_panel {
        PanelKind::Control => view_data.panels.control.focus == ControlField::Prompt,
        PanelKind::Code => true,
        PanelKind::Knowledge | PanelKind::Filters => false,
    }
}

fn push_input_char(state: &AppState, view_data: &mut ViewData, ch: char) {
    match state.active_panel {
        PanelKind::Control => view_data.panels.control.focused_value_mut().push(ch),
        PanelKind::Code => view_data.panels.code.code.push(ch),
        PanelKind::Filters => {
            view_data.panels.filters.search.push(ch);
            view_data.panels.filters.move_cursor(0);
        }
        PanelKind::Knowledge => {}
    }
}

fn pop_input_char(state: &AppState, view_data: &mut ViewData) {
    match state.active_panel {
        PanelKind::Control => {
            view_data.panels.control.focused_value_mut().pop();
        }
        PanelKind::Code => {
            view_data.panels.code.code.pop();
        }
        PanelKind::Filters => {
            view_data.panels.filters.search.pop();
            view_data.panels.filters.move_cursor(0);
        }
        PanelKind::Knowledge => {}
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = PanelKind::ALL
        .iter()
        .position(|panel| *panel == state.active_panel)
        .unwrap_or(0);
    let panel_titles = PanelKind::ALL
        .iter()
        .map(|panel| panel.label().to_owned())
        .collect::<Vec<String>>();

    let tabs = Tabs::new(panel_titles)
        .block(
            Block::default()
                .title("UNA :: CORE INTERFACE")
                .borders(Borders::ALL),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    let body_text = match state.active_panel {
        PanelKind::Control => render_control_text(state, view_data),
        PanelKind::Code => render_code_text(view_data),
        PanelKind::Knowledge => render_knowledge_text(view_data),
        PanelKind::Filters => render_filter_text(view_data),
    };
    let body = Paragraph::new(body_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(state.active_panel.title()),
    );
    frame.render_widget(body, layout[1]);

    let status_widget = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if view_data.help_visible {
        let area = centered_rect(72, 68, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn field_line(panel: &una_app::ControlPanel, field: ControlField) -> String {
    let marker = if panel.focus == field { FOCUS_MARK } else { " " };
    let value = match field {
        ControlField::Endpoint => panel.endpoint.clone(),
        ControlField::SecretKey => "•".repeat(panel.secret_key.chars().count()),
        ControlField::Prompt => panel.prompt.clone(),
    };
    format!("{marker} {}: {value}", field.label())
}

fn render_control_text(state: &AppState, view_data: &ViewData) -> String {
    let panel = &view_data.panels.control;
    let mut lines = vec![
        field_line(panel, ControlField::Endpoint),
        field_line(panel, ControlField::SecretKey),
        field_line(panel, ControlField::Prompt),
        String::new(),
        format!(
            "[g] {}    [y] {}",
            GatewayAction::Command.label(),
            GatewayAction::Query.label()
        ),
        String::new(),
        "Response".to_owned(),
    ];

    if panel.loading {
        lines.push("transmitting...".to_owned());
    } else if let Some(error) = &panel.error {
        lines.push(format!("Error: {error}"));
    } else if !panel.response.is_empty() {
        lines.extend(panel.response.lines().map(str::to_owned));
    } else {
        lines.push(AWAITING_TRANSMISSION.to_owned());
    }

    if state.mode == AppMode::Input {
        lines.push(String::new());
        lines.push(format!("editing {} (Esc to stop)", panel.focus.label()));
    }

    lines.join("\n")
}

fn render_code_text(view_data: &ViewData) -> String {
    let panel = &view_data.panels.code;
    let mut lines = vec![
        format!("[v] {}", AnalysisInstruction::Vulnerabilities.label()),
        format!("[n] {}", AnalysisInstruction::Endpoints.label()),
        format!("[d] {}", AnalysisInstruction::Deobfuscate.label()),
        String::new(),
        "Code Input".to_owned(),
    ];

    if panel.code.is_empty() {
        lines.push(CODE_PLACEHOLDER.to_owned());
    } else {
        lines.extend(panel.code.lines().map(str::to_owned));
    }

    lines.push(String::new());
    lines.push("Analysis Result".to_owned());
    if panel.loading {
        lines.push("Analyzing...".to_owned());
    } else if let Some(error) = &panel.error {
        lines.push(format!("Error: {error}"));
    } else if !panel.result.is_empty() {
        lines.extend(panel.result.lines().map(str::to_owned));
    } else {
        lines.push(AWAITING_ANALYSIS.to_owned());
    }

    lines.join("\n")
}

fn render_knowledge_text(view_data: &ViewData) -> String {
    let panel = &view_data.panels.knowledge;
    let tab_row = KnowledgeDoc::ALL
        .iter()
        .map(|doc| {
            if *doc == panel.active {
                format!("[{}]", doc.file_name())
            } else {
                format!(" {} ", doc.file_name())
            }
        })
        .collect::<Vec<String>>()
        .join(" ");

    format!("{tab_row}\n\n{}", panel.body())
}

fn render_filter_text(view_data: &ViewData) -> String {
    let panel = &view_data.panels.filters;
    let tab_row = StatusTab::ALL
        .iter()
        .map(|tab| {
            if *tab == panel.tab {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect::<Vec<String>>()
        .join(" ");

    let mut lines = vec![format!("Search filters: {}", panel.search), tab_row, String::new()];

    let visible = panel.visible_records();
    if visible.is_empty() {
        lines.push(NO_FILTER_MATCHES.to_owned());
    } else {
        for (index, record) in visible.iter().enumerate() {
            let marker = if index == panel.cursor { CURSOR_MARK } else { " " };
            lines.push(format!(
                "{marker} {} [{}] {}",
                record.name,
                record.status.as_str(),
                record.description
            ));
            lines.push(format!(
                "    {} | {} | strength {}",
                record.id,
                record.category.as_str(),
                record.strength
            ));
        }
    }

    lines.join("\n")
}

fn status_text(state: &AppState) -> String {
    let mode = match state.mode {
        AppMode::Nav => "nav",
        AppMode::Input => "input",
    };
    match &state.status_line {
        Some(message) => format!("{mode} | {message}"),
        None => format!("{mode} | ? help | ^q quit"),
    }
}

fn help_overlay_text() -> String {
    [
        "f/b or 1-4   switch panel",
        "i            edit the active field (Esc to stop)",
        "Tab          next control field",
        "g / y        send command / query (control)",
        "v / n / d    run an analysis instruction (code)",
        "left/right   switch document (knowledge)",
        "s            cycle status tab (filters)",
        "up/down, c   select card, copy its id (filters)",
        "^q           quit",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{
        ConsoleRuntime, InternalEvent, ViewData, handle_key_event, help_overlay_text,
        process_internal_events, render_code_text, render_control_text, render_filter_text,
        render_knowledge_text, status_text,
    };
    use anyhow::{Result, bail};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use una_app::{
        AppCommand, AppMode, AppState, FilterStatus, GatewayAction, KnowledgeDoc, PanelKind,
        PromptRequest, StatusTab,
    };
    use std::collections::VecDeque;
    use std::sync::mpsc::{self, Receiver, Sender};

    #[derive(Debug, Default)]
    struct TestRuntime {
        outcomes: VecDeque<Result<String, String>>,
        sent: Vec<PromptRequest>,
        copied: Vec<String>,
        clipboard_broken: bool,
    }

    impl ConsoleRuntime for TestRuntime {
        fn send_prompt(&mut self, request: &PromptRequest) -> Result<String> {
            self.sent.push(request.clone());
            match self.outcomes.pop_front() {
                Some(Ok(response)) => Ok(response),
                Some(Err(message)) => bail!(message),
                None => bail!("no canned outcome"),
            }
        }

        fn copy_identifier(&mut self, id: &str) -> Result<()> {
            if self.clipboard_broken {
                bail!("display not found");
            }
            self.copied.push(id.to_owned());
            Ok(())
        }
    }

    struct Harness {
        state: AppState,
        runtime: TestRuntime,
        view_data: ViewData,
        tx: Sender<InternalEvent>,
        rx: Receiver<InternalEvent>,
    }

    impl Harness {
        fn new() -> Self {
            let (tx, rx) = mpsc::channel();
            Self {
                state: AppState::default(),
                runtime: TestRuntime::default(),
                view_data: ViewData::default(),
                tx,
                rx,
            }
        }

        fn key(&mut self, code: KeyCode) -> bool {
            self.key_with(code, KeyModifiers::NONE)
        }

        fn key_with(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
            handle_key_event(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                KeyEvent::new(code, modifiers),
            )
        }

        fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.key(KeyCode::Char(ch));
            }
        }

        fn pump(&mut self) {
            process_internal_events(&mut self.state, &mut self.view_data, &self.rx);
        }
    }

    #[test]
    fn ctrl_q_quits() {
        let mut harness = Harness::new();
        assert!(harness.key_with(KeyCode::Char('q'), KeyModifiers::CONTROL));
    }

    #[test]
    fn panel_keys_switch_panels() {
        let mut harness = Harness::new();

        harness.key(KeyCode::Char('f'));
        assert_eq!(harness.state.active_panel, PanelKind::Code);

        harness.key(KeyCode::Char('4'));
        assert_eq!(harness.state.active_panel, PanelKind::Filters);

        harness.key(KeyCode::Char('b'));
        assert_eq!(harness.state.active_panel, PanelKind::Knowledge);
    }

    #[test]
    fn help_overlay_opens_and_closes() {
        let mut harness = Harness::new();

        harness.key(KeyCode::Char('?'));
        assert!(harness.view_data.help_visible);

        // keys other than Esc and ? are swallowed while help is up
        harness.key(KeyCode::Char('f'));
        assert_eq!(harness.state.active_panel, PanelKind::Control);

        harness.key(KeyCode::Esc);
        assert!(!harness.view_data.help_visible);
    }

    #[test]
    fn typing_edits_the_focused_control_field() {
        let mut harness = Harness::new();

        harness.key(KeyCode::Char('i'));
        assert_eq!(harness.state.mode, AppMode::Input);
        harness.type_text("hello");
        assert_eq!(harness.view_data.panels.control.prompt, "hello");

        harness.key(KeyCode::Backspace);
        assert_eq!(harness.view_data.panels.control.prompt, "hell");

        harness.key(KeyCode::Esc);
        assert_eq!(harness.state.mode, AppMode::Nav);
    }

    #[test]
    fn prompt_field_accepts_newlines_while_editing() {
        let mut harness = Harness::new();

        harness.key(KeyCode::Char('i'));
        harness.type_text("line one");
        harness.key(KeyCode::Enter);
        harness.type_text("line two");
        assert_eq!(
            harness.view_data.panels.control.prompt,
            "line one\nline two"
        );
    }

    #[test]
    fn tab_cycles_control_fields_in_both_modes() {
        let mut harness = Harness::new();
        let start = harness.view_data.panels.control.focus;

        harness.key(KeyCode::Tab);
        assert_ne!(harness.view_data.panels.control.focus, start);

        harness.key(KeyCode::Char('i'));
        harness.key(KeyCode::Tab);
        harness.key(KeyCode::Tab);
        assert_eq!(harness.view_data.panels.control.focus, start);
    }

    #[test]
    fn empty_prompt_send_never_reaches_the_runtime() {
        let mut harness = Harness::new();

        harness.key(KeyCode::Char('g'));
        harness.pump();

        assert!(harness.runtime.sent.is_empty());
        assert_eq!(
            harness.view_data.panels.control.error.as_deref(),
            Some(una_app::EMPTY_PROMPT_ERROR)
        );
    }

    #[test]
    fn successful_send_stores_the_response() {
        let mut harness = Harness::new();
        harness
            .runtime
            .outcomes
            .push_back(Ok("{\n  \"ok\": true\n}".to_owned()));
        harness.view_data.panels.control.prompt = "report".to_owned();

        harness.key(KeyCode::Char('y'));
        assert!(harness.view_data.panels.control.loading);

        harness.pump();
        let panel = &harness.view_data.panels.control;
        assert!(!panel.loading);
        assert_eq!(panel.response, "{\n  \"ok\": true\n}");
        assert_eq!(panel.error, None);

        assert_eq!(harness.runtime.sent.len(), 1);
        assert_eq!(harness.runtime.sent[0].action, GatewayAction::Query);
        assert_eq!(harness.runtime.sent[0].prompt, "report");
    }

    #[test]
    fn failed_send_stores_the_error() {
        let mut harness = Harness::new();
        harness.runtime.outcomes.push_back(Err("bad key".to_owned()));
        harness.view_data.panels.control.prompt = "report".to_owned();

        harness.key(KeyCode::Char('g'));
        harness.pump();

        let panel = &harness.view_data.panels.control;
        assert!(!panel.loading);
        assert_eq!(panel.error.as_deref(), Some("bad key"));
        assert!(panel.response.is_empty());
    }

    #[test]
    fn racing_sends_let_the_last_arrival_win() {
        let mut harness = Harness::new();
        harness.runtime.outcomes.push_back(Ok("first".to_owned()));
        harness.runtime.outcomes.push_back(Ok("second".to_owned()));
        harness.view_data.panels.control.prompt = "report".to_owned();

        harness.key(KeyCode::Char('g'));
        harness.key(KeyCode::Char('g'));
        harness.pump();

        assert_eq!(harness.runtime.sent.len(), 2);
        assert_eq!(harness.view_data.panels.control.response, "second");
    }

    #[test]
    fn analysis_requires_code_text() {
        let mut harness = Harness::new();
        harness.key(KeyCode::Char('2'));

        harness.key(KeyCode::Char('v'));
        assert_eq!(
            harness.view_data.panels.code.error.as_deref(),
            Some(una_app::EMPTY_CODE_ERROR)
        );
        assert!(!harness.view_data.panels.code.loading);
    }

    #[test]
    fn analysis_sets_report_and_timer_event_clears_loading() {
        let mut harness = Harness::new();
        harness.key(KeyCode::Char('2'));
        harness.view_data.panels.code.code = "let x = 1;".to_owned();

        harness.key(KeyCode::Char('n'));
        assert!(harness.view_data.panels.code.loading);
        assert!(
            harness
                .view_data
                .panels
                .code
                .result
                .contains("Identify all network endpoints")
        );

        // the sleep thread delivers this after the fixed delay
        harness
            .tx
            .send(InternalEvent::AnalysisFinished)
            .expect("send analysis event");
        harness.pump();
        assert!(!harness.view_data.panels.code.loading);
        assert!(!harness.view_data.panels.code.result.is_empty());
    }

    #[test]
    fn analysis_keys_are_ignored_while_loading() {
        let mut harness = Harness::new();
        harness.key(KeyCode::Char('2'));
        harness.view_data.panels.code.code = "let x = 1;".to_owned();

        harness.key(KeyCode::Char('v'));
        let report = harness.view_data.panels.code.result.clone();
        assert!(harness.view_data.panels.code.loading);

        harness.key(KeyCode::Char('d'));
        assert_eq!(harness.view_data.panels.code.result, report);
        assert!(harness.view_data.panels.code.loading);

        harness
            .tx
            .send(InternalEvent::AnalysisFinished)
            .expect("send analysis event");
        harness.pump();
        assert!(!harness.view_data.panels.code.loading);

        harness.key(KeyCode::Char('d'));
        assert!(harness.view_data.panels.code.loading);
        assert!(
            harness
                .view_data
                .panels
                .code
                .result
                .contains("De-obfuscate this function")
        );
    }

    #[test]
    fn knowledge_panel_rotates_documents() {
        let mut harness = Harness::new();
        harness.key(KeyCode::Char('3'));

        harness.key(KeyCode::Right);
        assert_eq!(
            harness.view_data.panels.knowledge.active,
            KnowledgeDoc::UpgradePlan
        );

        harness.key(KeyCode::Left);
        harness.key(KeyCode::Left);
        assert_eq!(
            harness.view_data.panels.knowledge.active,
            KnowledgeDoc::AgentDirectives
        );
    }

    #[test]
    fn knowledge_panel_rejects_input_mode() {
        let mut harness = Harness::new();
        harness.key(KeyCode::Char('3'));

        harness.key(KeyCode::Char('i'));
        assert_eq!(harness.state.mode, AppMode::Nav);
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("knowledge base is read-only")
        );
    }

    #[test]
    fn search_typing_narrows_the_grid() {
        let mut harness = Harness::new();
        harness.key(KeyCode::Char('4'));

        harness.key(KeyCode::Char('i'));
        harness.type_text("ASIMOV");
        harness.key(KeyCode::Enter);

        let visible = harness.view_data.panels.filters.visible_records();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "COG-001");
        assert_eq!(harness.state.mode, AppMode::Nav);
    }

    #[test]
    fn status_tab_cycles() {
        let mut harness = Harness::new();
        harness.key(KeyCode::Char('4'));

        harness.key(KeyCode::Char('s'));
        assert_eq!(
            harness.view_data.panels.filters.tab,
            StatusTab::Status(FilterStatus::Active)
        );
    }

    #[test]
    fn copy_reports_the_copied_identifier() {
        let mut harness = Harness::new();
        harness.key(KeyCode::Char('4'));
        harness.key(KeyCode::Down);

        harness.key(KeyCode::Char('c'));
        assert_eq!(harness.runtime.copied, vec!["NET-004".to_owned()]);
        assert_eq!(harness.state.status_line.as_deref(), Some("copied NET-004"));
    }

    #[test]
    fn copy_with_no_match_reports_no_selection() {
        let mut harness = Harness::new();
        harness.key(KeyCode::Char('4'));
        harness.view_data.panels.filters.set_search("nothing here");

        harness.key(KeyCode::Char('c'));
        assert!(harness.runtime.copied.is_empty());
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("no filter selected")
        );
    }

    #[test]
    fn clipboard_failure_is_non_fatal() {
        let mut harness = Harness::new();
        harness.runtime.clipboard_broken = true;
        harness.key(KeyCode::Char('4'));

        harness.key(KeyCode::Char('c'));
        let status = harness.state.status_line.expect("status expected");
        assert!(status.starts_with("clipboard unavailable"));
    }

    #[test]
    fn stale_status_clear_tokens_are_ignored() {
        let mut harness = Harness::new();
        harness.key(KeyCode::Char('4'));
        harness.key(KeyCode::Char('c'));
        let token = harness.view_data.status_token;

        harness
            .tx
            .send(InternalEvent::ClearStatus { token: token - 1 })
            .expect("send stale clear");
        harness.pump();
        assert!(harness.state.status_line.is_some());

        harness
            .tx
            .send(InternalEvent::ClearStatus { token })
            .expect("send current clear");
        harness.pump();
        assert_eq!(harness.state.status_line, None);
    }

    #[test]
    fn control_text_shows_placeholder_then_response_or_error() {
        let mut view_data = ViewData::default();
        let state = AppState::default();

        let idle = render_control_text(&state, &view_data);
        assert!(idle.contains(super::AWAITING_TRANSMISSION));
        assert!(idle.contains("API Endpoint: http://127.0.0.1:5000"));

        view_data.panels.control.loading = true;
        assert!(render_control_text(&state, &view_data).contains("transmitting..."));

        view_data.panels.control.loading = false;
        view_data.panels.control.error = Some("bad key".to_owned());
        assert!(render_control_text(&state, &view_data).contains("Error: bad key"));

        view_data.panels.control.error = None;
        view_data.panels.control.response = "{\n  \"ok\": true\n}".to_owned();
        let rendered = render_control_text(&state, &view_data);
        assert!(rendered.contains("\"ok\": true"));
    }

    #[test]
    fn control_text_masks_the_secret_key() {
        let mut view_data = ViewData::default();
        view_data.panels.control.secret_key = "hunter2".to_owned();

        let rendered = render_control_text(&AppState::default(), &view_data);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains(&"•".repeat(7)));
    }

    #[test]
    fn code_text_covers_placeholder_loading_and_result() {
        let mut view_data = ViewData::default();

        let idle = render_code_text(&view_data);
        assert!(idle.contains(super::CODE_PLACEHOLDER));
        assert!(idle.contains(super::AWAITING_ANALYSIS));

        view_data.panels.code.code = "let x;".to_owned();
        view_data.panels.code.loading = true;
        assert!(render_code_text(&view_data).contains("Analyzing..."));
    }

    #[test]
    fn knowledge_text_contains_active_document_body() {
        let mut view_data = ViewData::default();
        view_data.panels.knowledge.select(KnowledgeDoc::UpgradePlan);

        let rendered = render_knowledge_text(&view_data);
        assert!(rendered.contains("[My_Upgrade_Plan.md]"));
        assert!(rendered.contains(KnowledgeDoc::UpgradePlan.body().trim_end()));
    }

    #[test]
    fn filter_text_lists_cards_and_empty_notice() {
        let mut view_data = ViewData::default();

        let rendered = render_filter_text(&view_data);
        assert!(rendered.contains("Asimov Cascade"));
        assert!(rendered.contains("COG-001"));
        assert!(rendered.contains("[All]"));

        view_data.panels.filters.set_search("nope");
        assert!(render_filter_text(&view_data).contains(super::NO_FILTER_MATCHES));
    }

    #[test]
    fn status_text_prefers_the_status_line() {
        let mut state = AppState::default();
        assert!(status_text(&state).contains("? help"));

        state.dispatch(AppCommand::SetStatus("copied COG-001".to_owned()));
        assert!(status_text(&state).contains("copied COG-001"));
    }

    #[test]
    fn help_text_mentions_every_panel_action() {
        let help = help_overlay_text();
        assert!(help.contains("switch panel"));
        assert!(help.contains("send command / query"));
        assert!(help.contains("analysis instruction"));
        assert!(help.contains("copy its id"));
    }
}
