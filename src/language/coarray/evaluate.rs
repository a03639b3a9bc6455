//! Folding of integer expressions into constants.
//!
//! Only the subset of integer expressions that can appear in an image set is
//! modelled: literals, named constants, array constructors, the intrinsic
//! arithmetic operators and kind conversion. Anything else is a reference to a
//! value unknown at compile time.

/// Kind of the integer type used for subscripts and image numbers.
pub const SUBSCRIPT_INTEGER_KIND: u8 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntExpr {
    Constant {
        value: i128,
        kind: u8,
    },
    /// A named constant together with its initialization expression.
    Parameter {
        name: String,
        value: Box<IntExpr>,
    },
    ArrayConstructor {
        kind: u8,
        elements: Vec<IntExpr>,
    },
    Negate(Box<IntExpr>),
    Binary {
        op: IntOp,
        lhs: Box<IntExpr>,
        rhs: Box<IntExpr>,
    },
    Convert {
        kind: u8,
        operand: Box<IntExpr>,
    },
    /// A variable, function result or anything else not known until run time.
    Reference {
        name: String,
        kind: u8,
        rank: usize,
    },
}

impl IntExpr {
    pub fn literal(value: i64) -> Self {
        IntExpr::Constant {
            value: i128::from(value),
            kind: 4,
        }
    }

    pub fn array(elements: Vec<IntExpr>) -> Self {
        let kind = elements.first().map(IntExpr::kind).unwrap_or(4);
        IntExpr::ArrayConstructor { kind, elements }
    }

    pub fn parameter(name: impl Into<String>, value: IntExpr) -> Self {
        IntExpr::Parameter {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn binary(op: IntOp, lhs: IntExpr, rhs: IntExpr) -> Self {
        IntExpr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn negate(operand: IntExpr) -> Self {
        IntExpr::Negate(Box::new(operand))
    }

    pub fn reference(name: impl Into<String>, rank: usize) -> Self {
        IntExpr::Reference {
            name: name.into(),
            kind: 4,
            rank,
        }
    }

    pub fn kind(&self) -> u8 {
        match self {
            IntExpr::Constant { kind, .. }
            | IntExpr::ArrayConstructor { kind, .. }
            | IntExpr::Convert { kind, .. }
            | IntExpr::Reference { kind, .. } => *kind,
            IntExpr::Parameter { value, .. } => value.kind(),
            IntExpr::Negate(operand) => operand.kind(),
            IntExpr::Binary { lhs, rhs, .. } => lhs.kind().max(rhs.kind()),
        }
    }

    pub fn rank(&self) -> usize {
        match self {
            IntExpr::Constant { .. } => 0,
            IntExpr::ArrayConstructor { .. } => 1,
            IntExpr::Reference { rank, .. } => *rank,
            IntExpr::Parameter { value, .. } => value.rank(),
            IntExpr::Negate(operand) | IntExpr::Convert { operand, .. } => operand.rank(),
            IntExpr::Binary { lhs, rhs, .. } => lhs.rank().max(rhs.rank()),
        }
    }

    pub fn is_array(&self) -> bool {
        self.rank() > 0
    }
}

/// Folded value of an integer expression, in array element order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constant {
    pub kind: u8,
    pub values: Vec<i128>,
    pub is_array: bool,
}

impl Constant {
    fn scalar(value: i128, kind: u8) -> Self {
        Self {
            kind,
            values: vec![value],
            is_array: false,
        }
    }

    pub fn values(&self) -> &[i128] {
        &self.values
    }

    fn into_expr(self) -> IntExpr {
        if self.is_array {
            IntExpr::ArrayConstructor {
                kind: self.kind,
                elements: self
                    .values
                    .into_iter()
                    .map(|value| IntExpr::Constant {
                        value,
                        kind: self.kind,
                    })
                    .collect(),
            }
        } else {
            IntExpr::Constant {
                value: self.values[0],
                kind: self.kind,
            }
        }
    }
}

/// True when the expression contains no reference to a run-time value.
pub fn is_actually_constant(expr: &IntExpr) -> bool {
    match expr {
        IntExpr::Constant { .. } => true,
        IntExpr::Reference { .. } => false,
        IntExpr::Parameter { value, .. } => is_actually_constant(value),
        IntExpr::ArrayConstructor { elements, .. } => elements.iter().all(is_actually_constant),
        IntExpr::Negate(operand) | IntExpr::Convert { operand, .. } => {
            is_actually_constant(operand)
        }
        IntExpr::Binary { lhs, rhs, .. } => is_actually_constant(lhs) && is_actually_constant(rhs),
    }
}

pub fn convert_to_kind(expr: IntExpr, kind: u8) -> IntExpr {
    IntExpr::Convert {
        kind,
        operand: Box::new(expr),
    }
}

/// Folds the expression. When folding is not possible the expression is
/// returned unchanged.
pub fn fold(expr: IntExpr) -> IntExpr {
    match evaluate(&expr) {
        Some(constant) => constant.into_expr(),
        None => expr,
    }
}

/// The constant value of an already folded expression.
pub fn constant_values(expr: &IntExpr) -> Option<Constant> {
    match expr {
        IntExpr::Constant { value, kind } => Some(Constant::scalar(*value, *kind)),
        IntExpr::ArrayConstructor { kind, elements } => {
            let values = elements
                .iter()
                .map(|element| match element {
                    IntExpr::Constant { value, .. } => Some(*value),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()?;
            Some(Constant {
                kind: *kind,
                values,
                is_array: true,
            })
        }
        _ => None,
    }
}

fn evaluate(expr: &IntExpr) -> Option<Constant> {
    match expr {
        IntExpr::Constant { value, kind } => {
            in_range(*value, *kind).then(|| Constant::scalar(*value, *kind))
        }
        IntExpr::Reference { .. } => None,
        IntExpr::Parameter { value, .. } => evaluate(value),
        IntExpr::ArrayConstructor { kind, elements } => {
            let mut values = Vec::new();
            for element in elements {
                let element = evaluate(element)?;
                for value in element.values {
                    values.push(convert(value, *kind)?);
                }
            }
            Some(Constant {
                kind: *kind,
                values,
                is_array: true,
            })
        }
        IntExpr::Negate(operand) => {
            let operand = evaluate(operand)?;
            let kind = operand.kind;
            map_values(operand, |value| value.checked_neg().and_then(|v| convert(v, kind)))
        }
        IntExpr::Convert { kind, operand } => {
            let operand = evaluate(operand)?;
            let mut converted = map_values(operand, |value| convert(value, *kind))?;
            converted.kind = *kind;
            Some(converted)
        }
        IntExpr::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs)?;
            let rhs = evaluate(rhs)?;
            let kind = lhs.kind.max(rhs.kind);
            elementwise(&lhs, &rhs, kind, |a, b| apply(*op, a, b).and_then(|v| convert(v, kind)))
        }
    }
}

fn map_values(constant: Constant, f: impl Fn(i128) -> Option<i128>) -> Option<Constant> {
    let values = constant
        .values
        .into_iter()
        .map(f)
        .collect::<Option<Vec<_>>>()?;
    Some(Constant { values, ..constant })
}

fn elementwise(
    lhs: &Constant,
    rhs: &Constant,
    kind: u8,
    f: impl Fn(i128, i128) -> Option<i128>,
) -> Option<Constant> {
    let values = match (lhs.is_array, rhs.is_array) {
        (true, true) => {
            if lhs.values.len() != rhs.values.len() {
                return None;
            }
            lhs.values
                .iter()
                .zip(&rhs.values)
                .map(|(a, b)| f(*a, *b))
                .collect::<Option<Vec<_>>>()?
        }
        (true, false) => lhs
            .values
            .iter()
            .map(|a| f(*a, rhs.values[0]))
            .collect::<Option<Vec<_>>>()?,
        (false, true) => rhs
            .values
            .iter()
            .map(|b| f(lhs.values[0], *b))
            .collect::<Option<Vec<_>>>()?,
        (false, false) => vec![f(lhs.values[0], rhs.values[0])?],
    };
    Some(Constant {
        kind,
        values,
        is_array: lhs.is_array || rhs.is_array,
    })
}

fn apply(op: IntOp, a: i128, b: i128) -> Option<i128> {
    match op {
        IntOp::Add => a.checked_add(b),
        IntOp::Subtract => a.checked_sub(b),
        IntOp::Multiply => a.checked_mul(b),
        IntOp::Divide => a.checked_div(b),
        IntOp::Power => power(a, b),
    }
}

fn power(base: i128, exponent: i128) -> Option<i128> {
    if exponent < 0 {
        return match base {
            0 => None,
            1 => Some(1),
            -1 => Some(if exponent % 2 == 0 { 1 } else { -1 }),
            _ => Some(0),
        };
    }
    match base {
        0 | 1 => Some(if exponent == 0 { 1 } else { base }),
        -1 => Some(if exponent % 2 == 0 { 1 } else { -1 }),
        _ => base.checked_pow(u32::try_from(exponent).ok()?),
    }
}

fn convert(value: i128, kind: u8) -> Option<i128> {
    in_range(value, kind).then_some(value)
}

fn in_range(value: i128, kind: u8) -> bool {
    let bits = u32::from(kind) * 8;
    if bits == 0 {
        return false;
    }
    if bits >= 128 {
        return true;
    }
    let max = (1i128 << (bits - 1)) - 1;
    let min = -(1i128 << (bits - 1));
    (min..=max).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_arithmetic_on_named_constants() {
        let n = IntExpr::parameter("n", IntExpr::literal(3));
        let expr = IntExpr::binary(IntOp::Multiply, n, IntExpr::literal(2));
        assert!(is_actually_constant(&expr));
        let folded = fold(convert_to_kind(expr, SUBSCRIPT_INTEGER_KIND));
        let constant = constant_values(&folded).expect("constant");
        assert_eq!(constant.values(), &[6]);
        assert_eq!(constant.kind, SUBSCRIPT_INTEGER_KIND);
    }

    #[test]
    fn broadcasts_scalar_over_array() {
        let expr = IntExpr::binary(
            IntOp::Subtract,
            IntExpr::array(vec![IntExpr::literal(1), IntExpr::literal(2), IntExpr::literal(3)]),
            IntExpr::literal(1),
        );
        let constant = constant_values(&fold(expr)).expect("constant");
        assert!(constant.is_array);
        assert_eq!(constant.values(), &[0, 1, 2]);
    }

    #[test]
    fn references_are_not_constant() {
        let expr = IntExpr::binary(IntOp::Add, IntExpr::reference("i", 0), IntExpr::literal(1));
        assert!(!is_actually_constant(&expr));
        assert_eq!(constant_values(&fold(expr)), None);
    }

    #[test]
    fn negation_folds_each_element() {
        let expr = IntExpr::negate(IntExpr::array(vec![IntExpr::literal(1), IntExpr::literal(-4)]));
        assert_eq!(constant_values(&fold(expr)).map(|c| c.values), Some(vec![-1, 4]));
    }

    #[test]
    fn rank_follows_operands() {
        let matrix = IntExpr::reference("m", 2);
        assert_eq!(matrix.rank(), 2);
        let shifted = IntExpr::binary(IntOp::Add, IntExpr::literal(1), matrix);
        assert_eq!(shifted.rank(), 2);
        assert_eq!(IntExpr::negate(IntExpr::array(vec![IntExpr::literal(1)])).rank(), 1);
        assert!(!IntExpr::parameter("n", IntExpr::literal(3)).is_array());
    }

    #[test]
    fn division_by_zero_does_not_fold() {
        let expr = IntExpr::binary(IntOp::Divide, IntExpr::literal(1), IntExpr::literal(0));
        assert_eq!(constant_values(&fold(expr)), None);
    }

    #[test]
    fn overflow_of_kind_does_not_fold() {
        let big = IntExpr::Constant {
            value: i128::from(i32::MAX),
            kind: 4,
        };
        let expr = IntExpr::binary(IntOp::Add, big, IntExpr::literal(1));
        assert_eq!(constant_values(&fold(expr)), None);
    }

    #[test]
    fn negative_powers_truncate() {
        let expr = IntExpr::binary(IntOp::Power, IntExpr::literal(2), IntExpr::literal(-1));
        assert_eq!(constant_values(&fold(expr)).map(|c| c.values), Some(vec![0]));
        let expr = IntExpr::binary(IntOp::Power, IntExpr::literal(-1), IntExpr::literal(-3));
        assert_eq!(constant_values(&fold(expr)).map(|c| c.values), Some(vec![-1]));
    }
}
