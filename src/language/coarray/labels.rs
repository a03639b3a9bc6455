use crate::language::{
    ast::{ActionStmt, Block, Label},
    coarray::{
        body::LabelSet,
        message::{ConstructKind, DiagnosticSink, Message, Note},
        walk::{walk_block, Node, Visitor},
    },
    span::{Span, Spanned},
};

/// Reports branches inside `block` whose target is not one of `labels`.
pub fn enforce_labels(
    sink: &mut DiagnosticSink,
    labels: &LabelSet,
    construct_source: Span,
    construct: ConstructKind,
    block: &Block,
) {
    let mut enforcer = LabelEnforcer {
        sink,
        labels,
        construct_source,
        construct,
        current_statement: construct_source,
    };
    walk_block(block, &mut enforcer);
}

struct LabelEnforcer<'s, 'l> {
    sink: &'s mut DiagnosticSink,
    labels: &'l LabelSet,
    construct_source: Span,
    construct: ConstructKind,
    current_statement: Span,
}

impl LabelEnforcer<'_, '_> {
    fn check_label_use(&mut self, label: &Spanned<Label>) {
        if !self.labels.contains(&label.node) {
            self.sink
                .say(
                    self.current_statement,
                    Message::ControlFlowEscapes {
                        construct: self.construct,
                    },
                )
                .attach(
                    self.construct_source,
                    Note::EnclosingConstruct {
                        construct: self.construct,
                    },
                );
        }
    }
}

impl<'a> Visitor<'a> for LabelEnforcer<'_, '_> {
    fn enter(&mut self, node: Node<'a>) {
        if let Some((_, source)) = node.statement_header() {
            self.current_statement = source;
        }
    }

    fn leave(&mut self, node: Node<'a>) {
        let Node::Action(stmt) = node else {
            return;
        };
        match &stmt.statement {
            ActionStmt::Goto(label) => self.check_label_use(label),
            ActionStmt::ComputedGoto { labels, .. } => {
                for label in labels {
                    self.check_label_use(label);
                }
            }
            ActionStmt::ArithmeticIf { labels, .. } => {
                for label in labels {
                    self.check_label_use(label);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::coarray::test_support::*;

    #[test]
    fn branch_to_label_inside_is_allowed() {
        let mut tree = TreeBuilder::new();
        let block = vec![tree.goto(10), tree.labeled(10, ActionStmt::Continue)];
        let labels = LabelSet::from([10]);
        let mut sink = DiagnosticSink::new();
        enforce_labels(&mut sink, &labels, Span::new(0, 8), ConstructKind::Critical, &block);
        assert!(sink.is_empty());
    }

    #[test]
    fn each_escaping_target_is_reported() {
        let mut tree = TreeBuilder::new();
        let selector = tree.int_var("k");
        let block = vec![tree.action(ActionStmt::ComputedGoto {
            labels: vec![Spanned::new(10, Span::default()), Spanned::new(99, Span::default())],
            selector,
        })];
        let labels = LabelSet::from([10]);
        let mut sink = DiagnosticSink::new();
        enforce_labels(&mut sink, &labels, Span::new(0, 8), ConstructKind::ChangeTeam, &block);
        let diags = sink.finish(&Default::default());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message.to_string(), "Control flow escapes from CHANGE TEAM");
        assert_eq!(
            diags[0].attachments[0].note.to_string(),
            "Enclosing CHANGE TEAM statement"
        );
    }
}
