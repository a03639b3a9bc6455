use crate::language::span::{Span, Spanned};

/// Statement label (1 to 99999 in fixed or free form source).
pub type Label = u64;

/// Identity of an expression node. Typed forms of expressions are looked up by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug)]
pub struct ProgramUnit {
    pub name: String,
    pub body: Block,
}

pub type Block = Vec<ExecutableConstruct>;

/// A statement together with its optional label and the source of the whole statement.
#[derive(Clone, Debug)]
pub struct Statement<T> {
    pub label: Option<Label>,
    pub source: Span,
    pub statement: T,
}

impl<T> Statement<T> {
    pub fn new(source: Span, statement: T) -> Self {
        Self {
            label: None,
            source,
            statement,
        }
    }

    pub fn labeled(label: Label, source: Span, statement: T) -> Self {
        Self {
            label: Some(label),
            source,
            statement,
        }
    }
}

/// Outcome of name resolution for a name occurrence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Resolution {
    #[default]
    Resolved,
    /// Name resolution already reported an error about this occurrence.
    AlreadyDiagnosed,
}

#[derive(Clone, Debug)]
pub struct Name {
    pub text: String,
    pub span: Span,
    pub resolution: Resolution,
}

impl Name {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
            resolution: Resolution::Resolved,
        }
    }

    pub fn already_diagnosed(mut self) -> Self {
        self.resolution = Resolution::AlreadyDiagnosed;
        self
    }

    pub fn is_already_diagnosed(&self) -> bool {
        self.resolution == Resolution::AlreadyDiagnosed
    }
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Plus,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Concat,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Name(Name),
    IntLiteral(i64),
    LogicalLiteral(bool),
    CharLiteral(String),
    ArrayConstructor(Vec<Expr>),
    Subscript {
        base: Box<Expr>,
        subscripts: Vec<Expr>,
    },
    Component {
        base: Box<Expr>,
        component: Name,
    },
    Coindexed {
        base: Box<Expr>,
        selector: ImageSelector,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    FunctionRef {
        name: Name,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        self.span
    }

    /// The name when the expression is a bare name.
    pub fn as_name(&self) -> Option<&Name> {
        match &self.kind {
            ExprKind::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Finds the coindexed named object of a designator, looking through
    /// subscripts and component references on its way to the base name.
    pub fn coindexed_named_object(&self) -> Option<&Expr> {
        match &self.kind {
            ExprKind::Coindexed { .. } => Some(self),
            ExprKind::Subscript { base, .. } | ExprKind::Component { base, .. } => {
                base.coindexed_named_object()
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImageSelector {
    pub cosubscripts: Vec<Expr>,
    pub specs: Vec<ImageSelectorSpec>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum ImageSelectorSpec {
    Stat(Expr),
    Team(Expr),
    TeamNumber(Expr),
}

impl ImageSelectorSpec {
    pub fn expr(&self) -> &Expr {
        match self {
            ImageSelectorSpec::Stat(expr)
            | ImageSelectorSpec::Team(expr)
            | ImageSelectorSpec::TeamNumber(expr) => expr,
        }
    }
}

#[derive(Clone, Debug)]
pub enum StatOrErrmsg {
    Stat(Expr),
    Errmsg(Expr),
}

impl StatOrErrmsg {
    pub fn expr(&self) -> &Expr {
        match self {
            StatOrErrmsg::Stat(expr) | StatOrErrmsg::Errmsg(expr) => expr,
        }
    }

    pub fn span(&self) -> Span {
        self.expr().span
    }
}

#[derive(Clone, Debug)]
pub enum ExecutableConstruct {
    Action(Statement<ActionStmt>),
    Critical(Box<CriticalConstruct>),
    ChangeTeam(Box<ChangeTeamConstruct>),
    Block(Box<BlockConstruct>),
    If(Box<IfConstruct>),
    Do(Box<DoConstruct>),
}

impl ExecutableConstruct {
    /// Source of the first statement of the construct.
    pub fn header_source(&self) -> Span {
        match self {
            ExecutableConstruct::Action(stmt) => stmt.source,
            ExecutableConstruct::Critical(construct) => construct.critical.source,
            ExecutableConstruct::ChangeTeam(construct) => construct.change_team.source,
            ExecutableConstruct::Block(construct) => construct.begin.source,
            ExecutableConstruct::If(construct) => construct.if_then.source,
            ExecutableConstruct::Do(construct) => construct.do_stmt.source,
        }
    }
}

#[derive(Clone, Debug)]
pub enum ActionStmt {
    Continue,
    Assignment {
        lhs: Expr,
        rhs: Expr,
    },
    Call {
        name: Name,
        args: Vec<Expr>,
    },
    Print(Vec<Expr>),
    Return(Option<Expr>),
    Stop {
        code: Option<Expr>,
        error: bool,
    },
    Goto(Spanned<Label>),
    ComputedGoto {
        labels: Vec<Spanned<Label>>,
        selector: Expr,
    },
    ArithmeticIf {
        expr: Expr,
        labels: [Spanned<Label>; 3],
    },
    Allocate {
        objects: Vec<Expr>,
        stats: Vec<StatOrErrmsg>,
    },
    Deallocate {
        objects: Vec<Expr>,
        stats: Vec<StatOrErrmsg>,
    },
    SyncAll(SyncAllStmt),
    SyncImages(SyncImagesStmt),
    SyncMemory(SyncMemoryStmt),
    SyncTeam(SyncTeamStmt),
    Lock(LockStmt),
    Unlock(UnlockStmt),
    EventPost(EventPostStmt),
    EventWait(EventWaitStmt),
    NotifyWait(NotifyWaitStmt),
    FormTeam(FormTeamStmt),
}

#[derive(Clone, Debug, Default)]
pub struct SyncAllStmt {
    pub stats: Vec<StatOrErrmsg>,
}

#[derive(Clone, Debug, Default)]
pub struct SyncMemoryStmt {
    pub stats: Vec<StatOrErrmsg>,
}

#[derive(Clone, Debug)]
pub enum ImageSet {
    IntExpr(Expr),
    Star(Span),
}

impl ImageSet {
    pub fn span(&self) -> Span {
        match self {
            ImageSet::IntExpr(expr) => expr.span,
            ImageSet::Star(span) => *span,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SyncImagesStmt {
    pub image_set: ImageSet,
    pub stats: Vec<StatOrErrmsg>,
}

#[derive(Clone, Debug)]
pub struct SyncTeamStmt {
    pub team: Expr,
    pub stats: Vec<StatOrErrmsg>,
}

#[derive(Clone, Debug)]
pub enum LockStat {
    /// `ACQUIRED_LOCK=` scalar logical variable.
    Acquired(Expr),
    StatOrErrmsg(StatOrErrmsg),
}

impl LockStat {
    pub fn span(&self) -> Span {
        match self {
            LockStat::Acquired(expr) => expr.span,
            LockStat::StatOrErrmsg(stat) => stat.span(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LockStmt {
    pub lock_variable: Expr,
    pub specs: Vec<LockStat>,
}

#[derive(Clone, Debug)]
pub struct UnlockStmt {
    pub lock_variable: Expr,
    pub stats: Vec<StatOrErrmsg>,
}

#[derive(Clone, Debug)]
pub struct EventPostStmt {
    pub event: Expr,
    pub stats: Vec<StatOrErrmsg>,
}

#[derive(Clone, Debug)]
pub enum EventWaitSpec {
    UntilCount(Expr),
    StatOrErrmsg(StatOrErrmsg),
}

#[derive(Clone, Debug)]
pub struct EventWaitStmt {
    pub event: Expr,
    pub specs: Vec<EventWaitSpec>,
}

#[derive(Clone, Debug)]
pub struct NotifyWaitStmt {
    pub notify: Expr,
    pub specs: Vec<EventWaitSpec>,
}

#[derive(Clone, Debug)]
pub enum FormTeamSpec {
    NewIndex(Expr),
    StatOrErrmsg(StatOrErrmsg),
}

#[derive(Clone, Debug)]
pub struct FormTeamStmt {
    pub team_number: Expr,
    pub team_variable: Expr,
    pub specs: Vec<FormTeamSpec>,
}

#[derive(Clone, Debug)]
pub struct CriticalConstruct {
    pub critical: Statement<CriticalStmt>,
    pub block: Block,
    pub end: Statement<NamedStmt>,
}

#[derive(Clone, Debug, Default)]
pub struct CriticalStmt {
    pub construct_name: Option<Name>,
    pub stats: Vec<StatOrErrmsg>,
}

/// Construct statement that carries nothing but its optional construct name.
#[derive(Clone, Debug, Default)]
pub struct NamedStmt {
    pub construct_name: Option<Name>,
}

#[derive(Clone, Debug)]
pub struct ChangeTeamConstruct {
    pub change_team: Statement<ChangeTeamStmt>,
    pub block: Block,
    pub end: Statement<EndChangeTeamStmt>,
}

#[derive(Clone, Debug)]
pub struct CodimensionDecl {
    pub name: Name,
    pub cobounds: Span,
}

/// Selector of a coarray association; name resolution guarantees a simple name
/// when it resolved cleanly.
#[derive(Clone, Debug)]
pub struct Selector {
    pub expr: Expr,
}

impl Selector {
    pub fn name(&self) -> Option<&Name> {
        self.expr.as_name()
    }
}

#[derive(Clone, Debug)]
pub struct CoarrayAssociation {
    pub decl: CodimensionDecl,
    pub selector: Selector,
}

#[derive(Clone, Debug)]
pub struct ChangeTeamStmt {
    pub construct_name: Option<Name>,
    pub team: Expr,
    pub associations: Vec<CoarrayAssociation>,
    pub stats: Vec<StatOrErrmsg>,
}

#[derive(Clone, Debug, Default)]
pub struct EndChangeTeamStmt {
    pub stats: Vec<StatOrErrmsg>,
    pub construct_name: Option<Name>,
}

#[derive(Clone, Debug)]
pub struct BlockConstruct {
    pub begin: Statement<NamedStmt>,
    pub block: Block,
    pub end: Statement<NamedStmt>,
}

#[derive(Clone, Debug)]
pub struct IfConstruct {
    pub if_then: Statement<Expr>,
    pub then_block: Block,
    pub else_block: Option<(Statement<NamedStmt>, Block)>,
    pub end: Statement<NamedStmt>,
}

#[derive(Clone, Debug)]
pub struct DoConstruct {
    pub do_stmt: Statement<Option<LoopControl>>,
    pub block: Block,
    pub end: Statement<NamedStmt>,
}

#[derive(Clone, Debug)]
pub struct LoopControl {
    pub variable: Name,
    pub lower: Expr,
    pub upper: Expr,
    pub step: Option<Expr>,
}
