//! Node functions for CGP genotypes.
//!
//! This module provides the fixed catalogue of operations a grid node may
//! compute, grouped into families that a [`CgpConfig`] enables or disables
//! wholesale. The configured sub-catalogue is captured by [`FunctionSet`],
//! which is the single sampling source for both primordial seeding and
//! mutation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::CgpConfig;

/// Maximum function arity; every function gene carries exactly this many
/// connection slots.
pub const MAX_ARITY: usize = 2;

/// Operations computable by a grid node.
///
/// Arithmetic follows IEEE-754 `f32` semantics without protection: division
/// by zero, `sqrt` of a negative, and friends produce infinities or NaN,
/// which flow through to the outputs. Comparisons and boolean logic are
/// 1.0/0.0 valued, with any value `> 0.0` treated as true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    /// Constant 0.0
    ConstZero,
    /// Constant 1.0
    ConstOne,
    /// Constant 2.0
    ConstTwo,
    /// Constant π
    ConstPi,
    /// Constant e
    ConstE,
    /// f(a, b) = a + b
    Add,
    /// f(a, b) = a - b
    Subtract,
    /// f(a, b) = a * b
    Multiply,
    /// f(a, b) = a / b
    Divide,
    /// f(a) = -a
    Negate,
    /// f(a) = |a|
    Abs,
    /// f(a, b) = (a + b) / 2
    Average,
    /// f(a, b) = min(a, b)
    Min,
    /// f(a, b) = max(a, b)
    Max,
    /// f(a) = √a
    Sqrt,
    /// f(a, b) = a^b
    Power,
    /// f(a) = e^a
    Exp,
    /// f(a) = ln(a)
    LogN,
    /// f(a) = sin(a)
    Sin,
    /// f(a) = cos(a)
    Cos,
    /// f(a) = tan(a)
    Tan,
    /// f(a, b) = 1 if a == b else 0
    CmpEq,
    /// f(a, b) = 1 if a > b else 0
    CmpGt,
    /// f(a, b) = 1 if a < b else 0
    CmpLt,
    /// f(a, b) = 1 if both operands are true, else 0
    And,
    /// f(a, b) = 1 if either operand is true, else 0
    Or,
    /// f(a) = 1 if the operand is false, else 0
    Not,
    /// f(a, b) = 1 if exactly one operand is true, else 0
    Xor,
    /// f(a, b) = b if a > 0, else 0
    IfOrZero,
}

impl Function {
    /// Basic constants family.
    pub const BASIC_CONSTANTS: [Self; 3] = [Self::ConstZero, Self::ConstOne, Self::ConstTwo];

    /// Transcendental constants family.
    pub const TRANSCENDENTAL_CONSTANTS: [Self; 2] = [Self::ConstPi, Self::ConstE];

    /// Basic arithmetic family.
    pub const BASIC_ARITHMETIC: [Self; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Negate,
    ];

    /// Common math family.
    pub const COMMON_MATH: [Self; 8] = [
        Self::Abs,
        Self::Average,
        Self::Min,
        Self::Max,
        Self::Sqrt,
        Self::Power,
        Self::Exp,
        Self::LogN,
    ];

    /// Trigonometric family.
    pub const TRIGONOMETRIC: [Self; 3] = [Self::Sin, Self::Cos, Self::Tan];

    /// Comparisons family.
    pub const COMPARISONS: [Self; 3] = [Self::CmpEq, Self::CmpGt, Self::CmpLt];

    /// Boolean logic family.
    pub const BOOLEAN_LOGIC: [Self; 4] = [Self::And, Self::Or, Self::Not, Self::Xor];

    /// Conditional family.
    pub const CONDITIONAL: [Self; 1] = [Self::IfOrZero];

    /// Number of operands this function actually reads.
    ///
    /// Always `<=` [`MAX_ARITY`]; genes still carry `MAX_ARITY` connection
    /// slots so dormant connections survive function swaps.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::ConstZero | Self::ConstOne | Self::ConstTwo | Self::ConstPi | Self::ConstE => 0,
            Self::Negate
            | Self::Abs
            | Self::Sqrt
            | Self::Exp
            | Self::LogN
            | Self::Sin
            | Self::Cos
            | Self::Tan
            | Self::Not => 1,
            _ => 2,
        }
    }

    /// Apply this function to its operands.
    ///
    /// Functions with arity below [`MAX_ARITY`] ignore the trailing
    /// operands. NaN propagates through arithmetic per IEEE-754; boolean
    /// and comparison functions map NaN operands to false.
    #[inline]
    #[must_use]
    pub fn apply(self, a: f32, b: f32) -> f32 {
        match self {
            Self::ConstZero => 0.0,
            Self::ConstOne => 1.0,
            Self::ConstTwo => 2.0,
            Self::ConstPi => std::f32::consts::PI,
            Self::ConstE => std::f32::consts::E,
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => a / b,
            Self::Negate => -a,
            Self::Abs => a.abs(),
            Self::Average => (a + b) / 2.0,
            Self::Min => a.min(b),
            Self::Max => a.max(b),
            Self::Sqrt => a.sqrt(),
            Self::Power => a.powf(b),
            Self::Exp => a.exp(),
            Self::LogN => a.ln(),
            Self::Sin => a.sin(),
            Self::Cos => a.cos(),
            Self::Tan => a.tan(),
            Self::CmpEq => bool_value(a == b),
            Self::CmpGt => bool_value(a > b),
            Self::CmpLt => bool_value(a < b),
            Self::And => bool_value(truthy(a) && truthy(b)),
            Self::Or => bool_value(truthy(a) || truthy(b)),
            Self::Not => bool_value(!truthy(a)),
            Self::Xor => bool_value(truthy(a) != truthy(b)),
            Self::IfOrZero => {
                if a > 0.0 {
                    b
                } else {
                    0.0
                }
            }
        }
    }
}

#[inline]
fn truthy(x: f32) -> bool {
    x > 0.0
}

#[inline]
fn bool_value(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// The configured sub-catalogue of functions available to a run.
///
/// Built once from a [`CgpConfig`]'s family flags; seeding and mutation
/// sample uniformly from it, so the set is the only place the
/// family-enablement policy lives.
#[derive(Debug, Clone)]
pub struct FunctionSet {
    functions: Vec<Function>,
}

impl FunctionSet {
    /// Collect the functions of every family the config enables.
    ///
    /// The returned set is empty iff no family is enabled, which
    /// [`CgpConfig::validate`] rejects before any genotype exists.
    #[must_use]
    pub fn from_config(config: &CgpConfig) -> Self {
        let families: [(bool, &[Function]); 8] = [
            (config.fn_basic_constants, &Function::BASIC_CONSTANTS),
            (
                config.fn_transcendental_constants,
                &Function::TRANSCENDENTAL_CONSTANTS,
            ),
            (config.fn_basic_arithmetic, &Function::BASIC_ARITHMETIC),
            (config.fn_common_math, &Function::COMMON_MATH),
            (config.fn_trigonometric, &Function::TRIGONOMETRIC),
            (config.fn_comparisons, &Function::COMPARISONS),
            (config.fn_boolean_logic, &Function::BOOLEAN_LOGIC),
            (config.fn_conditional, &Function::CONDITIONAL),
        ];

        let mut functions = Vec::new();
        for (enabled, family) in families {
            if enabled {
                functions.extend_from_slice(family);
            }
        }
        Self { functions }
    }

    /// Number of available functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether no family contributed any function.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Whether `function` belongs to the configured set.
    #[must_use]
    pub fn contains(&self, function: Function) -> bool {
        self.functions.contains(&function)
    }

    /// The available functions, in stable catalogue order.
    #[must_use]
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Sample a function uniformly from the set.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Function {
        debug_assert!(!self.functions.is_empty(), "sampled from empty function set");
        self.functions[rng.random_range(0..self.functions.len())]
    }
}
