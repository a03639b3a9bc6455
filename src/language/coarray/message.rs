use crate::{config::CheckOptions, language::span::Span};
use std::fmt;
use thiserror::Error;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Portability,
    /// Explanation attached to another message.
    Because,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Severity::Error => "error",
            Severity::Portability => "portability",
            Severity::Because => "because",
        };
        f.write_str(text)
    }
}

/// Specifier list named in coindexing diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    SyncStat,
    EventWaitSpec,
    FormTeamSpec,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ListKind::SyncStat => "sync-stat-list",
            ListKind::EventWaitSpec => "event-wait-spec-list",
            ListKind::FormTeamSpec => "form-team-spec-list",
        };
        f.write_str(text)
    }
}

/// Constructs whose bodies are restricted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstructKind {
    Critical,
    ChangeTeam,
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConstructKind::Critical => "CRITICAL",
            ConstructKind::ChangeTeam => "CHANGE TEAM",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Message {
    #[error("RETURN statement is not allowed in a CRITICAL construct")]
    ReturnInCritical,
    #[error("An image control statement is not allowed in a CRITICAL construct")]
    ImageControlInCritical,
    #[error("RETURN statement is not allowed in a CHANGE TEAM construct")]
    ReturnInChangeTeam,
    #[error("Control flow escapes from {construct}")]
    ControlFlowEscapes { construct: ConstructKind },
    #[error("Coarray '{name}' was already used as a selector or coarray in this statement")]
    CoarrayNameReused { name: String },
    #[error("Selector '{name}' was already used as a selector or coarray in this statement")]
    SelectorNameReused { name: String },
    #[error("Team value must be of type TEAM_TYPE from module ISO_FORTRAN_ENV")]
    TeamType,
    #[error("Team must be a variable in this context")]
    TeamMustBeVariable,
    #[error("Image selector STAT variable must not be a coindexed object")]
    ImageSelectorStatCoindexed,
    #[error("The stat-variable or errmsg-variable in a {list} may not be a coindexed object")]
    CoindexedStatOrErrmsg { list: ListKind },
    #[error("The stat-variable in a sync-stat-list may not be repeated")]
    RepeatedSyncStat,
    #[error("The errmsg-variable in a sync-stat-list may not be repeated")]
    RepeatedSyncErrmsg,
    #[error("The deferred length allocatable character scalar variable '{name}' may be reallocated to a different length under the new Fortran 202X standard semantics for {specifier}")]
    DeferredLengthCharacter { name: String, specifier: String },
    #[error("An image-set that is an int-expr must be a scalar or a rank-one array")]
    ImageSetRank,
    #[error("Image number {value} in the image-set is not valid")]
    InvalidImageNumber { value: i64 },
    #[error("The event-variable must be of type EVENT_TYPE from module ISO_FORTRAN_ENV")]
    EventType,
    #[error("A event-variable in a EVENT WAIT statement may not be a coindexed object")]
    EventVariableCoindexed,
    #[error("Until-spec in a event-wait-spec-list may not be repeated")]
    RepeatedUntilSpec,
    #[error("A stat-variable in a event-wait-spec-list may not be repeated")]
    RepeatedEventWaitStat,
    #[error("A errmsg-variable in a event-wait-spec-list may not be repeated")]
    RepeatedEventWaitErrmsg,
    #[error("A notify-variable in a NOTIFY WAIT statement may not be a coindexed object")]
    NotifyVariableCoindexed,
    #[error("The notify-variable must be of type NOTIFY_TYPE from module ISO_FORTRAN_ENV")]
    NotifyType,
    #[error("The notify-variable must be a coarray")]
    NotifyNotCoarray,
    #[error("Lock variable must have type LOCK_TYPE from ISO_FORTRAN_ENV")]
    LockType,
    #[error("Lock variable is not definable")]
    LockNotDefinable,
    #[error("Multiple ACQUIRED_LOCK specifiers")]
    MultipleAcquiredLock,
}

impl Message {
    /// Number of the standard constraint the message enforces. Fortran 2023
    /// numbering is prefixed with the edition.
    pub fn constraint(&self) -> Option<&'static str> {
        let code = match self {
            Message::ReturnInCritical | Message::ImageControlInCritical => "C1118",
            Message::ReturnInChangeTeam => "C1112",
            Message::ControlFlowEscapes {
                construct: ConstructKind::Critical,
            } => "C1119",
            Message::ControlFlowEscapes {
                construct: ConstructKind::ChangeTeam,
            } => "C1111",
            Message::CoarrayNameReused { .. } => "C1113",
            Message::SelectorNameReused { .. } => "C1115",
            Message::TeamType => "C1114",
            Message::TeamMustBeVariable => "C1179",
            Message::ImageSelectorStatCoindexed => "C931",
            Message::CoindexedStatOrErrmsg { .. } => "C1173",
            Message::RepeatedSyncStat | Message::RepeatedSyncErrmsg => "C1172",
            Message::ImageSetRank | Message::InvalidImageNumber { .. } => "C1174",
            Message::EventType => "C1176",
            Message::EventVariableCoindexed => "C1177",
            Message::RepeatedUntilSpec
            | Message::RepeatedEventWaitStat
            | Message::RepeatedEventWaitErrmsg => "C1178",
            Message::NotifyVariableCoindexed => "F2023:C1178",
            Message::NotifyType => "F2023:C1177",
            Message::NotifyNotCoarray => "F2023:C1612",
            Message::LockType | Message::LockNotDefinable => "C1183",
            Message::MultipleAcquiredLock => "C1184",
            Message::DeferredLengthCharacter { .. } => return None,
        };
        Some(code)
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            Message::DeferredLengthCharacter { .. } => Severity::Portability,
            _ => Severity::Error,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Note {
    #[error("Enclosing CRITICAL statement")]
    EnclosingCritical,
    #[error("Enclosing CHANGE TEAM construct")]
    EnclosingChangeTeam,
    #[error("Enclosing {construct} statement")]
    EnclosingConstruct { construct: ConstructKind },
    #[error("Previous use of '{name}'")]
    PreviousUse { name: String },
    #[error("{0}")]
    Because(String),
}

impl Note {
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Note::Because(_) => Some(Severity::Because),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub span: Span,
    pub note: Note,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    pub message: Message,
    pub attachments: Vec<Attachment>,
}

impl Diagnostic {
    pub fn new(span: Span, message: Message) -> Self {
        Self {
            severity: message.default_severity(),
            span,
            message,
            attachments: Vec::new(),
        }
    }

    pub fn attach(&mut self, span: Span, note: Note) -> &mut Self {
        self.attachments.push(Attachment { span, note });
        self
    }

    pub fn set_severity(&mut self, severity: Severity) -> &mut Self {
        self.severity = severity;
        self
    }

    pub fn constraint(&self) -> Option<&'static str> {
        self.message.constraint()
    }

    pub fn display_message(&self) -> String {
        if let Some(code) = self.constraint() {
            format!("[{code}] {}", self.message)
        } else {
            self.message.to_string()
        }
    }
}

/// Append-only collector of the diagnostics of one pass.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(&mut self, span: Span, message: Message) -> &mut Diagnostic {
        trace!(%span, %message, "coarray diagnostic");
        self.diagnostics.push(Diagnostic::new(span, message));
        let last = self.diagnostics.len() - 1;
        &mut self.diagnostics[last]
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Applies the suppression and promotion settings and hands the
    /// diagnostics over in emission order.
    pub fn finish(self, options: &CheckOptions) -> Vec<Diagnostic> {
        self.diagnostics
            .into_iter()
            .filter(|diag| {
                diag.constraint()
                    .map_or(true, |code| !options.is_allowed(code))
            })
            .filter(|diag| options.portability_warnings || diag.severity != Severity::Portability)
            .map(|mut diag| {
                if options.warnings_as_errors && diag.severity == Severity::Portability {
                    diag.severity = Severity::Error;
                }
                diag
            })
            .collect()
    }
}
