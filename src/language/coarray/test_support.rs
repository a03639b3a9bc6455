use crate::language::{
    ast::*,
    coarray::{
        evaluate::IntExpr,
        expr::{SymbolInfo, TypedExpr},
        oracle::SemanticModel,
        types::{CharLength, DerivedTypeSpec, DynamicType, TokenType},
    },
    span::{Span, Spanned},
};

/// Builds syntax trees with distinct spans and records the typed form of
/// every expression it creates.
pub struct TreeBuilder {
    next_id: u32,
    offset: usize,
    model: SemanticModel,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            offset: 0,
            model: SemanticModel::new(),
        }
    }

    pub fn model(self) -> SemanticModel {
        self.model
    }

    pub fn span(&mut self, len: usize) -> Span {
        let span = Span::new(self.offset, self.offset + len);
        self.offset += len + 1;
        span
    }

    pub fn name(&mut self, text: &str) -> Name {
        let span = self.span(text.len());
        Name::new(text, span)
    }

    fn node(&mut self, kind: ExprKind, typed: Option<TypedExpr>) -> Expr {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        if let Some(typed) = typed {
            self.model.insert(id, typed);
        }
        let span = self.span(6);
        Expr { id, span, kind }
    }

    /// A name expression with the given typed form.
    pub fn typed(&mut self, text: &str, typed: TypedExpr) -> Expr {
        let name = self.name(text);
        self.node(ExprKind::Name(name), Some(typed))
    }

    /// A name whose analysis failed upstream.
    pub fn unanalyzed(&mut self, text: &str) -> Expr {
        let name = self.name(text);
        self.node(ExprKind::Name(name), None)
    }

    pub fn int_literal(&mut self, value: i64) -> Expr {
        self.node(
            ExprKind::IntLiteral(value),
            Some(TypedExpr::integer(IntExpr::literal(value))),
        )
    }

    pub fn int_var(&mut self, text: &str) -> Expr {
        let typed = TypedExpr {
            integer: Some(IntExpr::reference(text, 0)),
            ..TypedExpr::variable(SymbolInfo::new(text), DynamicType::default_integer())
        };
        self.typed(text, typed)
    }

    pub fn int_array_var(&mut self, text: &str, rank: usize) -> Expr {
        let typed = TypedExpr {
            integer: Some(IntExpr::reference(text, rank)),
            ..TypedExpr::variable(SymbolInfo::new(text), DynamicType::default_integer())
                .with_rank(rank)
        };
        self.typed(text, typed)
    }

    /// An integer expression whose folded form is `value`.
    pub fn int_expr(&mut self, value: IntExpr) -> Expr {
        let typed = TypedExpr::integer(value);
        self.node(ExprKind::IntLiteral(0), Some(typed))
    }

    pub fn int_array(&mut self, values: &[i64]) -> Expr {
        let elements: Vec<Expr> = values.iter().map(|value| self.int_literal(*value)).collect();
        let folded = IntExpr::array(values.iter().copied().map(IntExpr::literal).collect());
        self.node(
            ExprKind::ArrayConstructor(elements),
            Some(TypedExpr::integer(folded)),
        )
    }

    pub fn char_var(&mut self, text: &str) -> Expr {
        let ty = DynamicType::Character {
            kind: 1,
            length: CharLength::Known(80),
        };
        self.typed(text, TypedExpr::variable(SymbolInfo::new(text), ty))
    }

    pub fn deferred_char_var(&mut self, text: &str) -> Expr {
        let ty = DynamicType::Character {
            kind: 1,
            length: CharLength::Deferred,
        };
        let symbol = SymbolInfo {
            allocatable: true,
            ..SymbolInfo::new(text)
        };
        self.typed(text, TypedExpr::variable(symbol, ty))
    }

    fn coindexed(&mut self, text: &str, base_ty: DynamicType, stat: Option<Expr>) -> Expr {
        let base_typed = TypedExpr::variable(SymbolInfo::new(text), base_ty).with_corank(1);
        let typed = base_typed.clone().coindexed(1);
        let base = self.typed(text, base_typed);
        let cosubscript = self.int_literal(2);
        let span = self.span(3);
        let selector = ImageSelector {
            cosubscripts: vec![cosubscript],
            specs: stat.into_iter().map(ImageSelectorSpec::Stat).collect(),
            span,
        };
        self.node(
            ExprKind::Coindexed {
                base: Box::new(base),
                selector,
            },
            Some(typed),
        )
    }

    pub fn coindexed_int_var(&mut self, text: &str) -> Expr {
        self.coindexed(text, DynamicType::default_integer(), None)
    }

    /// `text[2, STAT=stat]`
    pub fn coindexed_with_stat(&mut self, text: &str, stat: Expr) -> Expr {
        self.coindexed(text, DynamicType::Real { kind: 4 }, Some(stat))
    }

    pub fn token_var(&mut self, text: &str, token: TokenType) -> Expr {
        let ty = DynamicType::Derived(DerivedTypeSpec::token(token));
        self.typed(text, TypedExpr::variable(SymbolInfo::new(text), ty))
    }

    pub fn token_coarray(&mut self, text: &str, token: TokenType) -> Expr {
        let ty = DynamicType::Derived(DerivedTypeSpec::token(token));
        self.typed(
            text,
            TypedExpr::variable(SymbolInfo::new(text), ty).with_corank(1),
        )
    }

    pub fn coindexed_token(&mut self, text: &str, token: TokenType) -> Expr {
        let ty = DynamicType::Derived(DerivedTypeSpec::token(token));
        self.coindexed(text, ty, None)
    }

    /// A token-typed function result such as `get_team()`.
    pub fn token_value(&mut self, text: &str, token: TokenType) -> Expr {
        let name = self.name(text);
        let typed = TypedExpr::value(DynamicType::Derived(DerivedTypeSpec::token(token)));
        self.node(
            ExprKind::FunctionRef {
                name,
                args: Vec::new(),
            },
            Some(typed),
        )
    }

    pub fn intent_in_token(&mut self, text: &str, token: TokenType) -> Expr {
        let ty = DynamicType::Derived(DerivedTypeSpec::token(token));
        let symbol = SymbolInfo {
            intent_in: true,
            ..SymbolInfo::new(text)
        };
        self.typed(text, TypedExpr::variable(symbol, ty))
    }

    pub fn coarray_int_var(&mut self, text: &str) -> Expr {
        self.typed(
            text,
            TypedExpr::variable(SymbolInfo::new(text), DynamicType::default_integer())
                .with_corank(1),
        )
    }

    pub fn stmt<T>(&mut self, statement: T) -> Statement<T> {
        let source = self.span(10);
        Statement::new(source, statement)
    }

    pub fn action(&mut self, statement: ActionStmt) -> ExecutableConstruct {
        ExecutableConstruct::Action(self.stmt(statement))
    }

    pub fn labeled(&mut self, label: Label, statement: ActionStmt) -> ExecutableConstruct {
        let source = self.span(10);
        ExecutableConstruct::Action(Statement::labeled(label, source, statement))
    }

    pub fn goto(&mut self, label: Label) -> ExecutableConstruct {
        let span = self.span(2);
        self.action(ActionStmt::Goto(Spanned::new(label, span)))
    }

    pub fn sync_all(&mut self, stats: Vec<StatOrErrmsg>) -> ExecutableConstruct {
        self.action(ActionStmt::SyncAll(SyncAllStmt { stats }))
    }

    pub fn named_stmt(&mut self) -> Statement<NamedStmt> {
        self.stmt(NamedStmt::default())
    }

    pub fn named_stmt_labeled(&mut self, label: Label) -> Statement<NamedStmt> {
        let source = self.span(10);
        Statement::labeled(label, source, NamedStmt::default())
    }

    pub fn end_team(&mut self, stats: Vec<StatOrErrmsg>) -> Statement<EndChangeTeamStmt> {
        self.stmt(EndChangeTeamStmt {
            stats,
            construct_name: None,
        })
    }

    pub fn critical(&mut self, stats: Vec<StatOrErrmsg>, block: Block) -> ExecutableConstruct {
        let critical = self.stmt(CriticalStmt {
            construct_name: None,
            stats,
        });
        let end = self.named_stmt();
        ExecutableConstruct::Critical(Box::new(CriticalConstruct {
            critical,
            block,
            end,
        }))
    }

    pub fn change_team(
        &mut self,
        team: Expr,
        associations: Vec<CoarrayAssociation>,
        block: Block,
    ) -> ExecutableConstruct {
        let change_team = self.stmt(ChangeTeamStmt {
            construct_name: None,
            team,
            associations,
            stats: Vec::new(),
        });
        let end = self.end_team(Vec::new());
        ExecutableConstruct::ChangeTeam(Box::new(ChangeTeamConstruct {
            change_team,
            block,
            end,
        }))
    }

    pub fn if_construct(&mut self, block: Block) -> ExecutableConstruct {
        let condition = self.node(
            ExprKind::LogicalLiteral(true),
            Some(TypedExpr::value(DynamicType::Logical { kind: 4 })),
        );
        let if_then = self.stmt(condition);
        let end = self.named_stmt();
        ExecutableConstruct::If(Box::new(IfConstruct {
            if_then,
            then_block: block,
            else_block: None,
            end,
        }))
    }

    pub fn block_construct(&mut self, block: Block) -> ExecutableConstruct {
        let begin = self.named_stmt();
        let end = self.named_stmt();
        ExecutableConstruct::Block(Box::new(BlockConstruct { begin, block, end }))
    }

    pub fn association(&mut self, coarray: &str, selector: &str) -> CoarrayAssociation {
        let name = self.name(coarray);
        let cobounds = self.span(3);
        let selector = self.coarray_int_var(selector);
        CoarrayAssociation {
            decl: CodimensionDecl { name, cobounds },
            selector: Selector { expr: selector },
        }
    }

    pub fn unit(&mut self, body: Block) -> ProgramUnit {
        ProgramUnit {
            name: "main".to_string(),
            body,
        }
    }
}
