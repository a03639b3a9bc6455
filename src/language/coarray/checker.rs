use crate::{
    config::CheckOptions,
    language::{
        ast::{ExecutableConstruct, ProgramUnit},
        coarray::{
            body::enforce_body,
            labels::enforce_labels,
            message::{ConstructKind, Diagnostic, DiagnosticSink},
            oracle::SemanticsOracle,
            statements::StatementChecker,
            walk::{walk_block, Node, Visitor},
        },
    },
};
use tracing::{debug, debug_span};

/// Runs the coarray constraint checks over one program unit and returns the
/// diagnostics in traversal order.
pub fn check_program_unit(
    unit: &ProgramUnit,
    oracle: &dyn SemanticsOracle,
    options: &CheckOptions,
) -> Vec<Diagnostic> {
    let span = debug_span!("coarray_check", unit = %unit.name);
    let _guard = span.enter();
    let mut checker = CoarrayChecker {
        oracle,
        sink: DiagnosticSink::new(),
    };
    walk_block(&unit.body, &mut checker);
    debug!(count = checker.sink.len(), "coarray checks finished");
    checker.sink.finish(options)
}

struct CoarrayChecker<'o> {
    oracle: &'o dyn SemanticsOracle,
    sink: DiagnosticSink,
}

impl CoarrayChecker<'_> {
    fn statements(&mut self) -> StatementChecker<'_, '_> {
        StatementChecker::new(self.oracle, &mut self.sink)
    }

    fn enter_construct(&mut self, construct: &ExecutableConstruct) {
        match construct {
            ExecutableConstruct::Critical(critical) => {
                let header = critical.critical.source;
                debug!(%header, "checking CRITICAL construct body");
                let labels = enforce_body(
                    self.oracle,
                    &mut self.sink,
                    ConstructKind::Critical,
                    header,
                    &critical.block,
                    Node::ConstructStmt(&critical.end),
                );
                enforce_labels(
                    &mut self.sink,
                    &labels,
                    header,
                    ConstructKind::Critical,
                    &critical.block,
                );
            }
            ExecutableConstruct::ChangeTeam(change_team) => {
                let header = change_team.change_team.source;
                debug!(%header, "checking CHANGE TEAM construct body");
                let labels = enforce_body(
                    self.oracle,
                    &mut self.sink,
                    ConstructKind::ChangeTeam,
                    header,
                    &change_team.block,
                    Node::EndChangeTeamStmt(&change_team.end),
                );
                enforce_labels(
                    &mut self.sink,
                    &labels,
                    header,
                    ConstructKind::ChangeTeam,
                    &change_team.block,
                );
            }
            ExecutableConstruct::Action(_)
            | ExecutableConstruct::Block(_)
            | ExecutableConstruct::If(_)
            | ExecutableConstruct::Do(_) => {}
        }
    }
}

impl<'a> Visitor<'a> for CoarrayChecker<'_> {
    fn enter(&mut self, node: Node<'a>) {
        if let Node::Construct(construct) = node {
            self.enter_construct(construct);
        }
    }

    fn leave(&mut self, node: Node<'a>) {
        match node {
            Node::Action(stmt) => self.statements().check_action(&stmt.statement),
            Node::CriticalStmt(stmt) => self.statements().check_critical(&stmt.statement),
            Node::ChangeTeamStmt(stmt) => self.statements().check_change_team(&stmt.statement),
            Node::EndChangeTeamStmt(stmt) => {
                self.statements().check_end_change_team(&stmt.statement)
            }
            Node::ImageSelector(selector) => self.statements().check_image_selector(selector),
            Node::Construct(_)
            | Node::ConstructStmt(_)
            | Node::IfThenStmt(_)
            | Node::DoStmt(_) => {}
        }
    }
}
