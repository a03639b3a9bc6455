use crate::language::coarray::{
    evaluate::IntExpr,
    types::{CharLength, DerivedTypeSpec, DynamicType},
};

/// Attributes of the symbol a designator is rooted at, as recorded by name resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: String,
    pub allocatable: bool,
    pub named_constant: bool,
    pub intent_in: bool,
    pub protected: bool,
}

impl SymbolInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DesignatorKind {
    WholeSymbol,
    Component,
    Element,
    Substring,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Designator {
    pub symbol: SymbolInfo,
    pub kind: DesignatorKind,
}

/// Image-selection part of a coindexed reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoindexInfo {
    pub coarray: String,
    pub cosubscripts: usize,
}

/// Typed form of an expression as produced by expression analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedExpr {
    pub ty: Option<DynamicType>,
    pub rank: usize,
    pub corank: usize,
    pub designator: Option<Designator>,
    pub coindex: Option<CoindexInfo>,
    /// Integer expressions carry their foldable form.
    pub integer: Option<IntExpr>,
}

impl TypedExpr {
    /// A value that is not a variable, such as a function result.
    pub fn value(ty: DynamicType) -> Self {
        Self {
            ty: Some(ty),
            rank: 0,
            corank: 0,
            designator: None,
            coindex: None,
            integer: None,
        }
    }

    pub fn variable(symbol: SymbolInfo, ty: DynamicType) -> Self {
        Self {
            designator: Some(Designator {
                symbol,
                kind: DesignatorKind::WholeSymbol,
            }),
            ..Self::value(ty)
        }
    }

    pub fn integer(expr: IntExpr) -> Self {
        let rank = expr.rank();
        Self {
            ty: Some(DynamicType::Integer { kind: expr.kind() }),
            rank,
            integer: Some(expr),
            ..Self::value(DynamicType::default_integer())
        }
    }

    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_corank(mut self, corank: usize) -> Self {
        self.corank = corank;
        self
    }

    pub fn with_designator_kind(mut self, kind: DesignatorKind) -> Self {
        if let Some(designator) = &mut self.designator {
            designator.kind = kind;
        }
        self
    }

    /// Marks the reference as naming the coarray on a selected image.
    pub fn coindexed(mut self, cosubscripts: usize) -> Self {
        let coarray = self
            .designator
            .as_ref()
            .map(|designator| designator.symbol.name.clone())
            .unwrap_or_default();
        self.coindex = Some(CoindexInfo {
            coarray,
            cosubscripts,
        });
        self.corank = 0;
        self
    }

    pub fn derived_type_spec(&self) -> Option<&DerivedTypeSpec> {
        self.ty.as_ref().and_then(DynamicType::derived)
    }

    pub fn is_variable(&self) -> bool {
        self.designator
            .as_ref()
            .is_some_and(|designator| !designator.symbol.named_constant)
    }

    /// True for a reference to a coarray on the executing image.
    pub fn is_coarray(&self) -> bool {
        self.corank > 0 && self.coindex.is_none()
    }

    pub fn coindex(&self) -> Option<&CoindexInfo> {
        self.coindex.as_ref()
    }

    /// The symbol of a whole-variable or component reference.
    pub fn whole_symbol_or_component(&self) -> Option<&SymbolInfo> {
        self.designator.as_ref().and_then(|designator| match designator.kind {
            DesignatorKind::WholeSymbol | DesignatorKind::Component => Some(&designator.symbol),
            DesignatorKind::Element | DesignatorKind::Substring => None,
        })
    }

    pub fn has_deferred_length(&self) -> bool {
        matches!(
            self.ty,
            Some(DynamicType::Character {
                length: CharLength::Deferred,
                ..
            })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coindexed_reference_names_its_coarray() {
        let local = TypedExpr::variable(SymbolInfo::new("buf"), DynamicType::default_integer())
            .with_corank(2);
        assert!(local.is_coarray());
        assert!(local.coindex().is_none());

        let remote = local.coindexed(2);
        assert!(!remote.is_coarray());
        assert_eq!(remote.corank, 0);
        let coindex = remote.coindex().expect("coindex");
        assert_eq!(coindex.coarray, "buf");
        assert_eq!(coindex.cosubscripts, 2);
    }

    #[test]
    fn element_of_deferred_length_array_is_not_a_whole_symbol() {
        let ty = DynamicType::Character {
            kind: 1,
            length: CharLength::Deferred,
        };
        let whole = TypedExpr::variable(SymbolInfo::new("names"), ty);
        assert!(whole.has_deferred_length());
        assert!(whole.whole_symbol_or_component().is_some());
        let element = whole.with_designator_kind(DesignatorKind::Element);
        assert!(element.whole_symbol_or_component().is_none());
    }
}
