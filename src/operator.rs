// Copyright 2021-2025 Martin Pool

//! The catalog of mutation operators this core knows how to apply.

use serde::Serialize;
use strum::{Display, EnumString};

/// Broad category a [crate::operator::MutationOperator] belongs to, used for
/// human-readable grouping and for equivalence-filter rules that apply to a
/// whole family of operators at once.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize)]
pub enum Genre {
    /// Replace the body of a function with a fixed value of its return type.
    FnValue,
    /// Replace a binary operator, e.g. `==` with `!=`.
    BinaryOperator,
    /// Remove or replace a unary operator.
    UnaryOperator,
    /// Delete a match arm.
    MatchArm,
    /// Replace the expression of a match arm guard with a fixed value.
    MatchArmGuard,
    /// Delete a field from a struct literal that has a base (default) expression.
    StructField,
    /// Delete a whole statement.
    StatementDeletion,
    /// Swap a loop-control keyword, e.g. `break` for `continue`.
    LoopControl,
    /// Swap a standard-library method for a semantically related one.
    StdlibSemantic,
    /// Substitute an identifier or literal per a user-supplied mapping.
    Tailored,
}

/// One kind of source-level edit the discoverer can produce.
///
/// Each variant names one edit family, not one specific edit (e.g.
/// `ArithmeticOperatorSwap` covers `+` -> `-`, `*` -> `/`, and so on, not
/// just one pair).
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Display, EnumString, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum MutationOperator {
    ArithmeticOperatorSwap,
    ComparisonOperatorSwap,
    LogicalOperatorSwap,
    BitwiseOperatorSwap,
    CompoundAssignmentSwap,
    BooleanLiteralFlip,
    UnaryOperatorRemoval,
    NumericLiteralPerturbation,
    StringLiteralPerturbation,
    EarlyReturnReplacement,
    GuardConditionNegation,
    RangeBoundSwap,
    TryKeywordVariation,
    TernaryBranchSwap,
    NilCoalescingRemoval,
    StatementDeletion,
    VoidCallRemoval,
    CastStrengthSwap,
    OptionalChainingRemoval,
    TypedReturnDefaultSubstitution,
    ConstantBoundaryShift,
    ScopedCleanupRemoval,
    LoopControlSubstitution,
    StdlibSemanticSwap,
    ConcurrencyContextSwap,
    MatchArmDeletion,
    MatchArmGuardReplacement,
    StructFieldDeletion,
    TailoredIdentifierLiteralReplacement,
}

impl MutationOperator {
    /// The [Genre] this operator belongs to.
    pub fn genre(self) -> Genre {
        use MutationOperator::*;
        match self {
            TypedReturnDefaultSubstitution => Genre::FnValue,
            ArithmeticOperatorSwap
            | ComparisonOperatorSwap
            | LogicalOperatorSwap
            | BitwiseOperatorSwap
            | CompoundAssignmentSwap
            | RangeBoundSwap
            | ConstantBoundaryShift => Genre::BinaryOperator,
            UnaryOperatorRemoval | NilCoalescingRemoval | OptionalChainingRemoval => {
                Genre::UnaryOperator
            }
            MatchArmDeletion => Genre::MatchArm,
            MatchArmGuardReplacement | GuardConditionNegation => Genre::MatchArmGuard,
            StructFieldDeletion => Genre::StructField,
            StatementDeletion | VoidCallRemoval | ScopedCleanupRemoval => Genre::StatementDeletion,
            LoopControlSubstitution => Genre::LoopControl,
            StdlibSemanticSwap | CastStrengthSwap | TryKeywordVariation => Genre::StdlibSemantic,
            ConcurrencyContextSwap => Genre::StdlibSemantic,
            TernaryBranchSwap | EarlyReturnReplacement | BooleanLiteralFlip
            | NumericLiteralPerturbation | StringLiteralPerturbation => Genre::BinaryOperator,
            TailoredIdentifierLiteralReplacement => Genre::Tailored,
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn round_trip_strum_names() {
        for op in [
            MutationOperator::ArithmeticOperatorSwap,
            MutationOperator::TypedReturnDefaultSubstitution,
            MutationOperator::TailoredIdentifierLiteralReplacement,
        ] {
            let s = op.to_string();
            assert_eq!(MutationOperator::from_str(&s).unwrap(), op);
        }
    }

    #[test]
    fn fn_value_genre() {
        assert_eq!(
            MutationOperator::TypedReturnDefaultSubstitution.genre(),
            Genre::FnValue
        );
    }
}
