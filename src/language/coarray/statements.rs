use crate::language::{
    ast::*,
    coarray::{
        evaluate::{
            constant_values, convert_to_kind, fold, is_actually_constant, SUBSCRIPT_INTEGER_KIND,
        },
        lists::{
            check_coindexed_stat_or_errmsg, check_event_wait_spec_list, check_names_are_distinct,
            check_sync_stat, check_sync_stat_list, SeenStats,
        },
        message::{DiagnosticSink, ListKind, Message, Note},
        oracle::SemanticsOracle,
        types::{is_event_type, is_lock_type, is_notify_type, is_team_type},
    },
};

/// Validates a statement node when the walk leaves it.
pub struct StatementChecker<'o, 's> {
    oracle: &'o dyn SemanticsOracle,
    sink: &'s mut DiagnosticSink,
}

impl<'o, 's> StatementChecker<'o, 's> {
    pub fn new(oracle: &'o dyn SemanticsOracle, sink: &'s mut DiagnosticSink) -> Self {
        Self { oracle, sink }
    }

    pub fn check_action(&mut self, stmt: &ActionStmt) {
        match stmt {
            ActionStmt::SyncAll(sync) => self.sync_stat_list(&sync.stats),
            ActionStmt::SyncMemory(sync) => self.sync_stat_list(&sync.stats),
            ActionStmt::SyncImages(sync) => self.check_sync_images(sync),
            ActionStmt::SyncTeam(sync) => {
                self.check_team_type(&sync.team, false);
                self.sync_stat_list(&sync.stats);
            }
            ActionStmt::Lock(lock) => self.check_lock(lock),
            ActionStmt::Unlock(unlock) => {
                self.check_lock_variable(&unlock.lock_variable);
                self.sync_stat_list(&unlock.stats);
            }
            ActionStmt::EventPost(post) => {
                self.sync_stat_list(&post.stats);
                self.check_event_variable(&post.event);
            }
            ActionStmt::EventWait(wait) => self.check_event_wait(wait),
            ActionStmt::NotifyWait(wait) => self.check_notify_wait(wait),
            ActionStmt::FormTeam(form) => self.check_form_team(form),
            ActionStmt::Continue
            | ActionStmt::Assignment { .. }
            | ActionStmt::Call { .. }
            | ActionStmt::Print(_)
            | ActionStmt::Return(_)
            | ActionStmt::Stop { .. }
            | ActionStmt::Goto(_)
            | ActionStmt::ComputedGoto { .. }
            | ActionStmt::ArithmeticIf { .. }
            | ActionStmt::Allocate { .. }
            | ActionStmt::Deallocate { .. } => {}
        }
    }

    pub fn check_change_team(&mut self, stmt: &ChangeTeamStmt) {
        check_names_are_distinct(self.sink, &stmt.associations);
        self.check_team_type(&stmt.team, false);
        self.sync_stat_list(&stmt.stats);
    }

    pub fn check_end_change_team(&mut self, stmt: &EndChangeTeamStmt) {
        self.sync_stat_list(&stmt.stats);
    }

    pub fn check_critical(&mut self, stmt: &CriticalStmt) {
        self.sync_stat_list(&stmt.stats);
    }

    pub fn check_image_selector(&mut self, selector: &ImageSelector) {
        for spec in &selector.specs {
            if let ImageSelectorSpec::Stat(variable) = spec {
                if variable.coindexed_named_object().is_some() {
                    self.sink
                        .say(variable.span, Message::ImageSelectorStatCoindexed);
                }
            }
        }
    }

    fn sync_stat_list(&mut self, list: &[StatOrErrmsg]) {
        check_sync_stat_list(self.oracle, self.sink, list);
    }

    fn check_team_type(&mut self, team: &Expr, must_be_variable: bool) {
        let Some(expr) = self.oracle.typed_expr(team) else {
            return;
        };
        if !is_team_type(expr.derived_type_spec()) {
            self.sink.say(team.span, Message::TeamType);
        } else if must_be_variable && !expr.is_variable() {
            self.sink.say(team.span, Message::TeamMustBeVariable);
        }
    }

    fn check_event_variable(&mut self, event: &Expr) {
        if let Some(expr) = self.oracle.typed_expr(event) {
            if !is_event_type(expr.derived_type_spec()) {
                self.sink.say(event.span, Message::EventType);
            }
        }
    }

    fn check_lock_variable(&mut self, lock: &Expr) {
        let Some(expr) = self.oracle.typed_expr(lock) else {
            return;
        };
        let Some(ty) = &expr.ty else {
            return;
        };
        let at = lock.span;
        if ty.is_unlimited_polymorphic() || !is_lock_type(ty.derived()) {
            self.sink.say(at, Message::LockType);
        } else if let Some(why_not) = self.oracle.why_not_definable(at, expr) {
            self.sink
                .say(at, Message::LockNotDefinable)
                .attach(why_not.span, Note::Because(why_not.text));
        }
    }

    fn check_sync_images(&mut self, stmt: &SyncImagesStmt) {
        self.sync_stat_list(&stmt.stats);
        let ImageSet::IntExpr(image_set) = &stmt.image_set else {
            return;
        };
        let Some(expr) = self.oracle.typed_expr(image_set) else {
            return;
        };
        let at = stmt.image_set.span();
        if expr.rank > 1 {
            self.sink.say(at, Message::ImageSetRank);
        }
        let Some(int_expr) = &expr.integer else {
            return;
        };
        if !is_actually_constant(int_expr) {
            return;
        }
        let converted = fold(convert_to_kind(int_expr.clone(), SUBSCRIPT_INTEGER_KIND));
        if let Some(constant) = constant_values(&converted) {
            // Only the first invalid image number is reported.
            if let Some(invalid) = constant.values().iter().find(|value| **value < 1) {
                let value = i64::try_from(*invalid).unwrap_or(i64::MIN);
                self.sink.say(at, Message::InvalidImageNumber { value });
            }
        }
    }

    fn check_lock(&mut self, stmt: &LockStmt) {
        self.check_lock_variable(&stmt.lock_variable);
        let mut got_acquired = false;
        let mut seen = SeenStats::default();
        for spec in &stmt.specs {
            match spec {
                LockStat::StatOrErrmsg(stat) => {
                    check_sync_stat(self.oracle, self.sink, stat, &mut seen)
                }
                LockStat::Acquired(_) => {
                    if got_acquired {
                        self.sink.say(spec.span(), Message::MultipleAcquiredLock);
                    } else {
                        got_acquired = true;
                    }
                }
            }
        }
    }

    fn check_event_wait(&mut self, stmt: &EventWaitStmt) {
        if let Some(expr) = self.oracle.typed_expr(&stmt.event) {
            if expr.coindex().is_some() {
                self.sink
                    .say(stmt.event.span, Message::EventVariableCoindexed);
            } else {
                self.check_event_variable(&stmt.event);
            }
        }
        check_event_wait_spec_list(self.oracle, self.sink, &stmt.specs);
    }

    fn check_notify_wait(&mut self, stmt: &NotifyWaitStmt) {
        let notify = &stmt.notify;
        if let Some(expr) = self.oracle.typed_expr(notify) {
            if expr.coindex().is_some() {
                self.sink.say(notify.span, Message::NotifyVariableCoindexed);
            } else if !is_notify_type(expr.derived_type_spec()) {
                self.sink.say(notify.span, Message::NotifyType);
            } else if !expr.is_coarray() {
                self.sink.say(notify.span, Message::NotifyNotCoarray);
            }
        }
        check_event_wait_spec_list(self.oracle, self.sink, &stmt.specs);
    }

    fn check_form_team(&mut self, stmt: &FormTeamStmt) {
        self.check_team_type(&stmt.team_variable, true);
        for spec in &stmt.specs {
            if let FormTeamSpec::StatOrErrmsg(stat) = spec {
                check_coindexed_stat_or_errmsg(self.oracle, self.sink, stat, ListKind::FormTeamSpec);
            }
        }
    }
}

