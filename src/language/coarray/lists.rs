use crate::language::{
    ast::{CoarrayAssociation, EventWaitSpec, Expr, Name, StatOrErrmsg},
    coarray::{
        message::{DiagnosticSink, ListKind, Message, Note},
        oracle::SemanticsOracle,
    },
    span::Span,
};
use std::collections::{hash_map::Entry, HashMap};

/// Roles already seen while scanning a stat/errmsg list.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeenStats {
    pub stat: bool,
    pub errmsg: bool,
}

pub fn check_sync_stat_list(
    oracle: &dyn SemanticsOracle,
    sink: &mut DiagnosticSink,
    list: &[StatOrErrmsg],
) {
    let mut seen = SeenStats::default();
    for stat in list {
        check_sync_stat(oracle, sink, stat, &mut seen);
    }
}

/// Checks one entry of a sync-stat-list against the entries before it.
pub fn check_sync_stat(
    oracle: &dyn SemanticsOracle,
    sink: &mut DiagnosticSink,
    stat: &StatOrErrmsg,
    seen: &mut SeenStats,
) {
    match stat {
        StatOrErrmsg::Stat(expr) => {
            if seen.stat {
                sink.say(expr.span, Message::RepeatedSyncStat);
            }
            seen.stat = true;
        }
        StatOrErrmsg::Errmsg(expr) => {
            warn_on_deferred_length_errmsg(oracle, sink, expr);
            if seen.errmsg {
                sink.say(expr.span, Message::RepeatedSyncErrmsg);
            }
            seen.errmsg = true;
        }
    }
    check_coindexed_stat_or_errmsg(oracle, sink, stat, ListKind::SyncStat);
}

pub fn check_event_wait_spec_list(
    oracle: &dyn SemanticsOracle,
    sink: &mut DiagnosticSink,
    list: &[EventWaitSpec],
) {
    let mut seen = SeenStats::default();
    let mut got_until = false;
    for spec in list {
        match spec {
            EventWaitSpec::UntilCount(expr) => {
                if got_until {
                    sink.say(expr.span, Message::RepeatedUntilSpec);
                }
                got_until = true;
            }
            EventWaitSpec::StatOrErrmsg(stat) => {
                match stat {
                    StatOrErrmsg::Stat(expr) => {
                        if seen.stat {
                            sink.say(expr.span, Message::RepeatedEventWaitStat);
                        }
                        seen.stat = true;
                    }
                    StatOrErrmsg::Errmsg(expr) => {
                        warn_on_deferred_length_errmsg(oracle, sink, expr);
                        if seen.errmsg {
                            sink.say(expr.span, Message::RepeatedEventWaitErrmsg);
                        }
                        seen.errmsg = true;
                    }
                }
                check_coindexed_stat_or_errmsg(oracle, sink, stat, ListKind::EventWaitSpec);
            }
        }
    }
}

pub fn check_coindexed_stat_or_errmsg(
    oracle: &dyn SemanticsOracle,
    sink: &mut DiagnosticSink,
    stat: &StatOrErrmsg,
    list: ListKind,
) {
    if let Some(expr) = oracle.typed_expr(stat.expr()) {
        if expr.coindex().is_some() {
            sink.say(stat.span(), Message::CoindexedStatOrErrmsg { list });
        }
    }
}

/// ERRMSG= variables that are deferred-length allocatable scalars are
/// reallocated under Fortran 202X rules rather than truncated or padded.
fn warn_on_deferred_length_errmsg(
    oracle: &dyn SemanticsOracle,
    sink: &mut DiagnosticSink,
    expr: &Expr,
) {
    let Some(typed) = oracle.typed_expr(expr) else {
        return;
    };
    let Some(symbol) = typed.whole_symbol_or_component() else {
        return;
    };
    if typed.has_deferred_length() && symbol.allocatable && typed.rank == 0 {
        sink.say(
            expr.span,
            Message::DeferredLengthCharacter {
                name: symbol.name.clone(),
                specifier: "ERRMSG=".to_string(),
            },
        );
    }
}

/// Coarray names and selector names of a CHANGE TEAM statement must all be
/// distinct. Names compare without regard to case.
pub fn check_names_are_distinct(sink: &mut DiagnosticSink, list: &[CoarrayAssociation]) {
    let mut names: HashMap<String, Span> = HashMap::new();
    for association in list {
        let decl_name = &association.decl.name;
        if decl_name.is_already_diagnosed() {
            continue;
        }
        if let Some(previous) = previous_use(&mut names, decl_name) {
            say_reused(
                sink,
                decl_name,
                previous,
                Message::CoarrayNameReused {
                    name: decl_name.text.clone(),
                },
            );
        }
        if let Some(selector) = association.selector.name() {
            if let Some(previous) = previous_use(&mut names, selector) {
                say_reused(
                    sink,
                    selector,
                    previous,
                    Message::SelectorNameReused {
                        name: selector.text.clone(),
                    },
                );
            }
        }
    }
}

/// Records the name and returns the location of an earlier use, if any.
/// The earliest occurrence stays recorded.
fn previous_use(names: &mut HashMap<String, Span>, name: &Name) -> Option<Span> {
    match names.entry(name.text.to_ascii_lowercase()) {
        Entry::Occupied(previous) => Some(*previous.get()),
        Entry::Vacant(slot) => {
            slot.insert(name.span);
            None
        }
    }
}

fn say_reused(sink: &mut DiagnosticSink, name: &Name, previous: Span, message: Message) {
    sink.say(name.span, message).attach(
        previous,
        Note::PreviousUse {
            name: name.text.clone(),
        },
    );
}
