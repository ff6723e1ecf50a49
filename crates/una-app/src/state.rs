// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    AnalysisInstruction, FilterStatus, GatewayAction, KnowledgeDoc, PanelKind, SECURITY_FILTERS,
    SecurityFilter, analysis_report,
};

pub const EMPTY_PROMPT_ERROR: &str = "Prompt cannot be empty.";
pub const EMPTY_CODE_ERROR: &str = "Code block cannot be empty.";
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Input,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_panel: PanelKind,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_panel: PanelKind::Control,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextPanel,
    PrevPanel,
    SelectPanel(PanelKind),
    EnterInput,
    ExitToNav,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    PanelChanged(PanelKind),
    ModeChanged(AppMode),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextPanel => self.rotate_panel(1),
            AppCommand::PrevPanel => self.rotate_panel(-1),
            AppCommand::SelectPanel(panel) => {
                self.active_panel = panel;
                vec![AppEvent::PanelChanged(self.active_panel)]
            }
            AppCommand::EnterInput => {
                self.mode = AppMode::Input;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::SetStatus(message) => {
                self.status_line = Some(message.clone());
                vec![AppEvent::StatusUpdated(message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_panel(&mut self, delta: isize) -> Vec<AppEvent> {
        let panels = PanelKind::ALL;
        let current = panels
            .iter()
            .position(|panel| *panel == self.active_panel)
            .unwrap_or(0) as isize;
        let len = panels.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_panel = panels[next];
        vec![AppEvent::PanelChanged(self.active_panel)]
    }
}

/// Everything the gateway needs to issue one outbound call. Captured from the
/// control panel at send time so later edits to the fields cannot affect an
/// in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub action: GatewayAction,
    pub endpoint: String,
    pub secret_key: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlField {
    Endpoint,
    SecretKey,
    Prompt,
}

impl ControlField {
    pub const ALL: [Self; 3] = [Self::Endpoint, Self::SecretKey, Self::Prompt];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Endpoint => "API Endpoint",
            Self::SecretKey => "Secret Key",
            Self::Prompt => "Prompt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPanel {
    pub endpoint: String,
    pub secret_key: String,
    pub prompt: String,
    pub response: String,
    pub error: Option<String>,
    pub loading: bool,
    pub focus: ControlField,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            secret_key: String::new(),
            prompt: String::new(),
            response: String::new(),
            error: None,
            loading: false,
            focus: ControlField::Prompt,
        }
    }
}

impl ControlPanel {
    /// Validates and starts one send. Returns the captured request, or `None`
    /// after recording the validation error (no network call may be issued).
    pub fn begin_send(&mut self, action: GatewayAction) -> Option<PromptRequest> {
        if self.prompt.is_empty() {
            self.error = Some(EMPTY_PROMPT_ERROR.to_owned());
            return None;
        }

        self.error = None;
        self.response.clear();
        self.loading = true;
        Some(PromptRequest {
            action,
            endpoint: self.endpoint.clone(),
            secret_key: self.secret_key.clone(),
            prompt: self.prompt.clone(),
        })
    }

    /// Applies a completed send. Outcomes are applied in arrival order with
    /// no request guard: concurrent sends race and the last one wins.
    pub fn apply_outcome(&mut self, outcome: Result<String, String>) {
        match outcome {
            Ok(response) => {
                self.response = response;
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message);
                self.response.clear();
            }
        }
        self.loading = false;
    }

    pub fn focus_next(&mut self) {
        let fields = ControlField::ALL;
        let current = fields
            .iter()
            .position(|field| *field == self.focus)
            .unwrap_or(0);
        self.focus = fields[(current + 1) % fields.len()];
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            ControlField::Endpoint => &mut self.endpoint,
            ControlField::SecretKey => &mut self.secret_key,
            ControlField::Prompt => &mut self.prompt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodePanel {
    pub code: String,
    pub result: String,
    pub error: Option<String>,
    pub loading: bool,
}

impl CodePanel {
    /// Starts the simulated analysis. The canned report is stored up front;
    /// only the loading flag waits for the timer. Returns whether a timer
    /// should be scheduled.
    pub fn begin_analysis(&mut self, instruction: AnalysisInstruction) -> bool {
        if self.code.is_empty() {
            self.error = Some(EMPTY_CODE_ERROR.to_owned());
            return false;
        }

        self.error = None;
        self.loading = true;
        self.result = analysis_report(instruction);
        true
    }

    pub fn finish_analysis(&mut self) {
        self.loading = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgePanel {
    pub active: KnowledgeDoc,
}

impl Default for KnowledgePanel {
    fn default() -> Self {
        Self {
            active: KnowledgeDoc::Genesis,
        }
    }
}

impl KnowledgePanel {
    pub fn select(&mut self, doc: KnowledgeDoc) {
        self.active = doc;
    }

    pub fn rotate(&mut self, delta: isize) {
        let docs = KnowledgeDoc::ALL;
        let current = docs
            .iter()
            .position(|doc| *doc == self.active)
            .unwrap_or(0) as isize;
        let len = docs.len() as isize;
        self.active = docs[(current + delta).rem_euclid(len) as usize];
    }

    pub fn body(&self) -> &'static str {
        self.active.body()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusTab {
    #[default]
    All,
    Status(FilterStatus),
}

impl StatusTab {
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Status(FilterStatus::Active),
        Self::Status(FilterStatus::Firewalled),
        Self::Status(FilterStatus::Bypassed),
        Self::Status(FilterStatus::Adaptive),
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Status(status) => status.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterPanel {
    pub search: String,
    pub tab: StatusTab,
    pub cursor: usize,
}

impl FilterPanel {
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.clamp_cursor();
    }

    pub fn set_tab(&mut self, tab: StatusTab) {
        self.tab = tab;
        self.clamp_cursor();
    }

    pub fn cycle_tab(&mut self) {
        let tabs = StatusTab::ALL;
        let current = tabs.iter().position(|tab| *tab == self.tab).unwrap_or(0);
        self.set_tab(tabs[(current + 1) % tabs.len()]);
    }

    /// The displayed subset: a pure function of (search, tab, fixed dataset).
    /// Result order is the dataset order; the filter never re-sorts.
    pub fn visible_records(&self) -> Vec<&'static SecurityFilter> {
        SECURITY_FILTERS
            .iter()
            .filter(|record| self.matches(record))
            .collect()
    }

    pub fn selected_record(&self) -> Option<&'static SecurityFilter> {
        self.visible_records().get(self.cursor).copied()
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let visible = self.visible_records().len();
        if visible == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, visible as isize - 1) as usize;
    }

    fn matches(&self, record: &SecurityFilter) -> bool {
        let tab_hit = match self.tab {
            StatusTab::All => true,
            StatusTab::Status(status) => record.status == status,
        };
        if !tab_hit {
            return false;
        }

        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        record.name.to_lowercase().contains(&needle)
            || record.description.to_lowercase().contains(&needle)
            || record.id.to_lowercase().contains(&needle)
    }

    fn clamp_cursor(&mut self) {
        let visible = self.visible_records().len();
        self.cursor = self.cursor.min(visible.saturating_sub(1));
    }
}

/// The four independent panel states. Panels never read or write each
/// other's fields; this struct only groups them for ownership by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Panels {
    pub control: ControlPanel,
    pub code: CodePanel,
    pub knowledge: KnowledgePanel,
    pub filters: FilterPanel,
}
