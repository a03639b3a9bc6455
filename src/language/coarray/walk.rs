//! Depth-first, left-to-right traversal of an execution part.
//!
//! Every node is entered before its children and left after them. Nested
//! traversals over a sub-tree use the same entry points with another visitor.

use crate::language::{
    ast::*,
    span::Span,
};

#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    Construct(&'a ExecutableConstruct),
    Action(&'a Statement<ActionStmt>),
    CriticalStmt(&'a Statement<CriticalStmt>),
    ChangeTeamStmt(&'a Statement<ChangeTeamStmt>),
    EndChangeTeamStmt(&'a Statement<EndChangeTeamStmt>),
    /// BLOCK, ELSE and the END statements of constructs.
    ConstructStmt(&'a Statement<NamedStmt>),
    IfThenStmt(&'a Statement<Expr>),
    DoStmt(&'a Statement<Option<LoopControl>>),
    ImageSelector(&'a ImageSelector),
}

impl<'a> Node<'a> {
    /// Label and source when the node is a statement.
    pub fn statement_header(&self) -> Option<(Option<Label>, Span)> {
        match self {
            Node::Action(stmt) => Some((stmt.label, stmt.source)),
            Node::CriticalStmt(stmt) => Some((stmt.label, stmt.source)),
            Node::ChangeTeamStmt(stmt) => Some((stmt.label, stmt.source)),
            Node::EndChangeTeamStmt(stmt) => Some((stmt.label, stmt.source)),
            Node::ConstructStmt(stmt) => Some((stmt.label, stmt.source)),
            Node::IfThenStmt(stmt) => Some((stmt.label, stmt.source)),
            Node::DoStmt(stmt) => Some((stmt.label, stmt.source)),
            Node::Construct(_) | Node::ImageSelector(_) => None,
        }
    }
}

pub trait Visitor<'a> {
    fn enter(&mut self, _node: Node<'a>) {}
    fn leave(&mut self, _node: Node<'a>) {}
}

pub fn walk_block<'a, V: Visitor<'a>>(block: &'a Block, visitor: &mut V) {
    for construct in block {
        walk(Node::Construct(construct), visitor);
    }
}

pub fn walk<'a, V: Visitor<'a>>(node: Node<'a>, visitor: &mut V) {
    visitor.enter(node);
    match node {
        Node::Construct(construct) => walk_construct_children(construct, visitor),
        Node::Action(stmt) => walk_action(&stmt.statement, visitor),
        Node::CriticalStmt(stmt) => walk_stats(&stmt.statement.stats, visitor),
        Node::ChangeTeamStmt(stmt) => {
            let change_team = &stmt.statement;
            walk_expr(&change_team.team, visitor);
            for association in &change_team.associations {
                walk_expr(&association.selector.expr, visitor);
            }
            walk_stats(&change_team.stats, visitor);
        }
        Node::EndChangeTeamStmt(stmt) => walk_stats(&stmt.statement.stats, visitor),
        Node::ConstructStmt(_) => {}
        Node::IfThenStmt(stmt) => walk_expr(&stmt.statement, visitor),
        Node::DoStmt(stmt) => {
            if let Some(control) = &stmt.statement {
                walk_expr(&control.lower, visitor);
                walk_expr(&control.upper, visitor);
                if let Some(step) = &control.step {
                    walk_expr(step, visitor);
                }
            }
        }
        Node::ImageSelector(selector) => {
            for cosubscript in &selector.cosubscripts {
                walk_expr(cosubscript, visitor);
            }
            for spec in &selector.specs {
                walk_expr(spec.expr(), visitor);
            }
        }
    }
    visitor.leave(node);
}

fn walk_construct_children<'a, V: Visitor<'a>>(construct: &'a ExecutableConstruct, visitor: &mut V) {
    match construct {
        ExecutableConstruct::Action(stmt) => walk(Node::Action(stmt), visitor),
        ExecutableConstruct::Critical(critical) => {
            walk(Node::CriticalStmt(&critical.critical), visitor);
            walk_block(&critical.block, visitor);
            walk(Node::ConstructStmt(&critical.end), visitor);
        }
        ExecutableConstruct::ChangeTeam(change_team) => {
            walk(Node::ChangeTeamStmt(&change_team.change_team), visitor);
            walk_block(&change_team.block, visitor);
            walk(Node::EndChangeTeamStmt(&change_team.end), visitor);
        }
        ExecutableConstruct::Block(block) => {
            walk(Node::ConstructStmt(&block.begin), visitor);
            walk_block(&block.block, visitor);
            walk(Node::ConstructStmt(&block.end), visitor);
        }
        ExecutableConstruct::If(if_construct) => {
            walk(Node::IfThenStmt(&if_construct.if_then), visitor);
            walk_block(&if_construct.then_block, visitor);
            if let Some((else_stmt, else_block)) = &if_construct.else_block {
                walk(Node::ConstructStmt(else_stmt), visitor);
                walk_block(else_block, visitor);
            }
            walk(Node::ConstructStmt(&if_construct.end), visitor);
        }
        ExecutableConstruct::Do(do_construct) => {
            walk(Node::DoStmt(&do_construct.do_stmt), visitor);
            walk_block(&do_construct.block, visitor);
            walk(Node::ConstructStmt(&do_construct.end), visitor);
        }
    }
}

fn walk_action<'a, V: Visitor<'a>>(stmt: &'a ActionStmt, visitor: &mut V) {
    match stmt {
        ActionStmt::Continue
        | ActionStmt::Goto(_)
        | ActionStmt::Return(None)
        | ActionStmt::Stop { code: None, .. } => {}
        ActionStmt::Return(Some(expr))
        | ActionStmt::Stop {
            code: Some(expr), ..
        }
        | ActionStmt::ComputedGoto { selector: expr, .. }
        | ActionStmt::ArithmeticIf { expr, .. } => walk_expr(expr, visitor),
        ActionStmt::Assignment { lhs, rhs } => {
            walk_expr(lhs, visitor);
            walk_expr(rhs, visitor);
        }
        ActionStmt::Call { args, .. } | ActionStmt::Print(args) => walk_exprs(args, visitor),
        ActionStmt::Allocate { objects, stats } | ActionStmt::Deallocate { objects, stats } => {
            walk_exprs(objects, visitor);
            walk_stats(stats, visitor);
        }
        ActionStmt::SyncAll(sync) => walk_stats(&sync.stats, visitor),
        ActionStmt::SyncMemory(sync) => walk_stats(&sync.stats, visitor),
        ActionStmt::SyncImages(sync) => {
            if let ImageSet::IntExpr(expr) = &sync.image_set {
                walk_expr(expr, visitor);
            }
            walk_stats(&sync.stats, visitor);
        }
        ActionStmt::SyncTeam(sync) => {
            walk_expr(&sync.team, visitor);
            walk_stats(&sync.stats, visitor);
        }
        ActionStmt::Lock(lock) => {
            walk_expr(&lock.lock_variable, visitor);
            for spec in &lock.specs {
                match spec {
                    LockStat::Acquired(expr) => walk_expr(expr, visitor),
                    LockStat::StatOrErrmsg(stat) => walk_expr(stat.expr(), visitor),
                }
            }
        }
        ActionStmt::Unlock(unlock) => {
            walk_expr(&unlock.lock_variable, visitor);
            walk_stats(&unlock.stats, visitor);
        }
        ActionStmt::EventPost(post) => {
            walk_expr(&post.event, visitor);
            walk_stats(&post.stats, visitor);
        }
        ActionStmt::EventWait(wait) => {
            walk_expr(&wait.event, visitor);
            walk_event_wait_specs(&wait.specs, visitor);
        }
        ActionStmt::NotifyWait(wait) => {
            walk_expr(&wait.notify, visitor);
            walk_event_wait_specs(&wait.specs, visitor);
        }
        ActionStmt::FormTeam(form) => {
            walk_expr(&form.team_number, visitor);
            walk_expr(&form.team_variable, visitor);
            for spec in &form.specs {
                match spec {
                    FormTeamSpec::NewIndex(expr) => walk_expr(expr, visitor),
                    FormTeamSpec::StatOrErrmsg(stat) => walk_expr(stat.expr(), visitor),
                }
            }
        }
    }
}

fn walk_event_wait_specs<'a, V: Visitor<'a>>(specs: &'a [EventWaitSpec], visitor: &mut V) {
    for spec in specs {
        match spec {
            EventWaitSpec::UntilCount(expr) => walk_expr(expr, visitor),
            EventWaitSpec::StatOrErrmsg(stat) => walk_expr(stat.expr(), visitor),
        }
    }
}

fn walk_stats<'a, V: Visitor<'a>>(stats: &'a [StatOrErrmsg], visitor: &mut V) {
    for stat in stats {
        walk_expr(stat.expr(), visitor);
    }
}

fn walk_exprs<'a, V: Visitor<'a>>(exprs: &'a [Expr], visitor: &mut V) {
    for expr in exprs {
        walk_expr(expr, visitor);
    }
}

/// Expressions are not nodes of their own; only the image selectors inside them are.
fn walk_expr<'a, V: Visitor<'a>>(expr: &'a Expr, visitor: &mut V) {
    match &expr.kind {
        ExprKind::Name(_)
        | ExprKind::IntLiteral(_)
        | ExprKind::LogicalLiteral(_)
        | ExprKind::CharLiteral(_) => {}
        ExprKind::ArrayConstructor(elements) => walk_exprs(elements, visitor),
        ExprKind::Subscript { base, subscripts } => {
            walk_expr(base, visitor);
            walk_exprs(subscripts, visitor);
        }
        ExprKind::Component { base, .. } => walk_expr(base, visitor),
        ExprKind::Coindexed { base, selector } => {
            walk_expr(base, visitor);
            walk(Node::ImageSelector(selector), visitor);
        }
        ExprKind::Unary { operand, .. } => walk_expr(operand, visitor),
        ExprKind::Binary { lhs, rhs, .. } => {
            walk_expr(lhs, visitor);
            walk_expr(rhs, visitor);
        }
        ExprKind::FunctionRef { args, .. } => walk_exprs(args, visitor),
    }
}
