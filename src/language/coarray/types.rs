pub const ISO_FORTRAN_ENV: &str = "iso_fortran_env";

/// The derived types from ISO_FORTRAN_ENV that serve as opaque
/// synchronization tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    Team,
    Event,
    Lock,
    Notify,
}

impl TokenType {
    pub fn type_name(self) -> &'static str {
        match self {
            TokenType::Team => "team_type",
            TokenType::Event => "event_type",
            TokenType::Lock => "lock_type",
            TokenType::Notify => "notify_type",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedTypeSpec {
    pub name: String,
    /// Module that defines the type, `None` for a type declared in the program unit.
    pub module: Option<String>,
}

impl DerivedTypeSpec {
    pub fn new(name: impl Into<String>, module: Option<&str>) -> Self {
        Self {
            name: name.into(),
            module: module.map(str::to_string),
        }
    }

    pub fn token(token: TokenType) -> Self {
        Self::new(token.type_name(), Some(ISO_FORTRAN_ENV))
    }

    fn is_builtin(&self, token: TokenType) -> bool {
        self.name.eq_ignore_ascii_case(token.type_name())
            && self
                .module
                .as_deref()
                .is_some_and(|module| module.eq_ignore_ascii_case(ISO_FORTRAN_ENV))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharLength {
    Known(u64),
    Assumed,
    Deferred,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DynamicType {
    Integer { kind: u8 },
    Real { kind: u8 },
    Logical { kind: u8 },
    Character { kind: u8, length: CharLength },
    Derived(DerivedTypeSpec),
    /// `CLASS(*)`
    UnlimitedPolymorphic,
}

impl DynamicType {
    pub fn default_integer() -> Self {
        DynamicType::Integer { kind: 4 }
    }

    pub fn derived(&self) -> Option<&DerivedTypeSpec> {
        match self {
            DynamicType::Derived(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn is_unlimited_polymorphic(&self) -> bool {
        matches!(self, DynamicType::UnlimitedPolymorphic)
    }
}

pub fn is_team_type(spec: Option<&DerivedTypeSpec>) -> bool {
    spec.is_some_and(|spec| spec.is_builtin(TokenType::Team))
}

pub fn is_event_type(spec: Option<&DerivedTypeSpec>) -> bool {
    spec.is_some_and(|spec| spec.is_builtin(TokenType::Event))
}

pub fn is_lock_type(spec: Option<&DerivedTypeSpec>) -> bool {
    spec.is_some_and(|spec| spec.is_builtin(TokenType::Lock))
}

pub fn is_notify_type(spec: Option<&DerivedTypeSpec>) -> bool {
    spec.is_some_and(|spec| spec.is_builtin(TokenType::Notify))
}
