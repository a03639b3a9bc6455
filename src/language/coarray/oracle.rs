use crate::language::{
    ast::{ActionStmt, Expr, ExecutableConstruct, NodeId},
    coarray::expr::TypedExpr,
    span::Span,
};
use std::collections::HashMap;

/// Reason why a variable may not appear in a variable definition context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explanation {
    pub span: Span,
    pub text: String,
}

/// Services of name resolution and expression analysis the checker relies on.
pub trait SemanticsOracle {
    /// Typed form of an expression; `None` when analysis failed and already
    /// reported why.
    fn typed_expr(&self, expr: &Expr) -> Option<&TypedExpr>;

    fn why_not_definable(&self, at: Span, expr: &TypedExpr) -> Option<Explanation> {
        why_not_definable(at, expr)
    }

    fn is_image_control(&self, construct: &ExecutableConstruct) -> bool {
        is_image_control_construct(self, construct)
    }
}

/// Definability of a designator in a context that allows the
/// synchronization token types.
pub fn why_not_definable(at: Span, expr: &TypedExpr) -> Option<Explanation> {
    let because = |text: String| Some(Explanation { span: at, text });
    let Some(designator) = &expr.designator else {
        return because("the expression is not a variable".to_string());
    };
    let symbol = &designator.symbol;
    if symbol.named_constant {
        because(format!("'{}' is not a variable", symbol.name))
    } else if symbol.intent_in {
        because(format!("'{}' is an INTENT(IN) dummy argument", symbol.name))
    } else if symbol.protected {
        because(format!("'{}' is protected in this scope", symbol.name))
    } else {
        None
    }
}

pub fn is_image_control_construct<O: SemanticsOracle + ?Sized>(
    oracle: &O,
    construct: &ExecutableConstruct,
) -> bool {
    match construct {
        ExecutableConstruct::Critical(_) | ExecutableConstruct::ChangeTeam(_) => true,
        ExecutableConstruct::Block(_) | ExecutableConstruct::If(_) | ExecutableConstruct::Do(_) => {
            false
        }
        ExecutableConstruct::Action(stmt) => is_image_control_action(oracle, &stmt.statement),
    }
}

fn is_image_control_action<O: SemanticsOracle + ?Sized>(oracle: &O, stmt: &ActionStmt) -> bool {
    let is_coarray = |expr: &Expr| oracle.typed_expr(expr).is_some_and(TypedExpr::is_coarray);
    match stmt {
        ActionStmt::SyncAll(_)
        | ActionStmt::SyncImages(_)
        | ActionStmt::SyncMemory(_)
        | ActionStmt::SyncTeam(_)
        | ActionStmt::Lock(_)
        | ActionStmt::Unlock(_)
        | ActionStmt::EventPost(_)
        | ActionStmt::EventWait(_)
        | ActionStmt::NotifyWait(_)
        | ActionStmt::FormTeam(_) => true,
        ActionStmt::Allocate { objects, .. } | ActionStmt::Deallocate { objects, .. } => {
            objects.iter().any(is_coarray)
        }
        ActionStmt::Call { name, args } => {
            name.text.eq_ignore_ascii_case("move_alloc") && args.iter().any(is_coarray)
        }
        ActionStmt::Continue
        | ActionStmt::Assignment { .. }
        | ActionStmt::Print(_)
        | ActionStmt::Return(_)
        | ActionStmt::Stop { .. }
        | ActionStmt::Goto(_)
        | ActionStmt::ComputedGoto { .. }
        | ActionStmt::ArithmeticIf { .. } => false,
    }
}

/// Expression analysis results keyed by node.
#[derive(Debug, Default)]
pub struct SemanticModel {
    exprs: HashMap<NodeId, TypedExpr>,
}

impl SemanticModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, expr: TypedExpr) {
        self.exprs.insert(id, expr);
    }
}

impl SemanticsOracle for SemanticModel {
    fn typed_expr(&self, expr: &Expr) -> Option<&TypedExpr> {
        self.exprs.get(&expr.id)
    }
}
