use crate::language::{
    ast::{ActionStmt, Block, ExecutableConstruct, Label},
    coarray::{
        message::{ConstructKind, DiagnosticSink, Message, Note},
        oracle::SemanticsOracle,
        walk::{walk, walk_block, Node, Visitor},
    },
    span::Span,
};
use std::collections::BTreeSet;

pub type LabelSet = BTreeSet<Label>;

/// Walks the body and terminator of a CRITICAL or CHANGE TEAM construct,
/// reports statements the construct does not allow, and returns the labels
/// defined inside it.
pub fn enforce_body<'a>(
    oracle: &dyn SemanticsOracle,
    sink: &mut DiagnosticSink,
    construct: ConstructKind,
    header: Span,
    block: &'a Block,
    terminator: Node<'a>,
) -> LabelSet {
    let mut enforcer = BodyEnforcer {
        oracle,
        sink,
        construct,
        header,
        current_statement: header,
        labels: LabelSet::new(),
    };
    walk_block(block, &mut enforcer);
    walk(terminator, &mut enforcer);
    enforcer.labels
}

struct BodyEnforcer<'o, 's> {
    oracle: &'o dyn SemanticsOracle,
    sink: &'s mut DiagnosticSink,
    construct: ConstructKind,
    header: Span,
    current_statement: Span,
    labels: LabelSet,
}

impl BodyEnforcer<'_, '_> {
    fn enclosing_note(&self) -> Note {
        match self.construct {
            ConstructKind::Critical => Note::EnclosingCritical,
            ConstructKind::ChangeTeam => Note::EnclosingChangeTeam,
        }
    }

    fn say(&mut self, at: Span, message: Message) {
        let note = self.enclosing_note();
        self.sink.say(at, message).attach(self.header, note);
    }

    fn check_return(&mut self) {
        let message = match self.construct {
            ConstructKind::Critical => Message::ReturnInCritical,
            ConstructKind::ChangeTeam => Message::ReturnInChangeTeam,
        };
        self.say(self.current_statement, message);
    }

    fn check_image_control(&mut self, construct: &ExecutableConstruct) {
        if self.construct == ConstructKind::Critical && self.oracle.is_image_control(construct) {
            let at = match construct {
                ExecutableConstruct::Action(_) => self.current_statement,
                _ => construct.header_source(),
            };
            self.say(at, Message::ImageControlInCritical);
        }
    }
}

impl<'a> Visitor<'a> for BodyEnforcer<'_, '_> {
    fn enter(&mut self, node: Node<'a>) {
        if let Some((label, source)) = node.statement_header() {
            self.current_statement = source;
            if let Some(label) = label {
                self.labels.insert(label);
            }
        }
    }

    fn leave(&mut self, node: Node<'a>) {
        match node {
            Node::Action(stmt) => {
                if matches!(stmt.statement, ActionStmt::Return(_)) {
                    self.check_return();
                }
            }
            Node::Construct(construct) => self.check_image_control(construct),
            Node::CriticalStmt(_)
            | Node::ChangeTeamStmt(_)
            | Node::EndChangeTeamStmt(_)
            | Node::ConstructStmt(_)
            | Node::IfThenStmt(_)
            | Node::DoStmt(_)
            | Node::ImageSelector(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::coarray::test_support::*;

    #[test]
    fn collects_labels_of_body_and_terminator() {
        let mut tree = TreeBuilder::new();
        let body = vec![
            tree.labeled(10, ActionStmt::Continue),
            tree.action(ActionStmt::Continue),
            tree.labeled(20, ActionStmt::Continue),
        ];
        let end = tree.named_stmt_labeled(30);
        let model = tree.model();
        let mut sink = DiagnosticSink::new();
        let labels = enforce_body(
            &model,
            &mut sink,
            ConstructKind::Critical,
            Span::new(0, 8),
            &body,
            Node::ConstructStmt(&end),
        );
        assert!(sink.is_empty());
        assert_eq!(labels.into_iter().collect::<Vec<_>>(), vec![10, 20, 30]);
    }

    #[test]
    fn change_team_allows_image_control() {
        let mut tree = TreeBuilder::new();
        let body = vec![tree.sync_all(vec![])];
        let end = tree.end_team(vec![]);
        let model = tree.model();
        let mut sink = DiagnosticSink::new();
        enforce_body(
            &model,
            &mut sink,
            ConstructKind::ChangeTeam,
            Span::new(0, 8),
            &body,
            Node::EndChangeTeamStmt(&end),
        );
        assert!(sink.is_empty());
    }
}
