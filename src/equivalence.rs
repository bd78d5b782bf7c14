// Copyright 2021-2025 Martin Pool

//! Conservatively drops mutation sites whose mutant is certainly equivalent
//! to the original code, without attempting any general equivalence proof:
//! the filter is conservative, keeping a site whenever it is unsure.

use crate::site::MutationSite;

/// Remove sites that are trivially no-ops: the mutated text is textually
/// identical to the text it replaces.
///
/// The rest of the minimum no-op rule set (arithmetic swaps that are no-ops
/// against a literal `0`/`1` operand, single-element range bound swaps,
/// boolean flips of a literal guarding dead control flow, unary-sign removal
/// on a literal `0`, deletion of an already-empty block statement, skipping
/// empty function bodies, skipping constructors named `new`, and honoring
/// `#[mutants::skip]`) is applied at discovery time in `discover.rs`, since
/// each of those checks has the AST context it needs available right where
/// the candidate site would otherwise be emitted. This pass catches the one
/// case that can only be checked after the replacement text has been
/// generated: an operator that happens to produce exactly the same text as
/// the original (for example a tailored substitution configured to map an
/// identifier to itself).
pub fn filter_equivalent_sites(sites: Vec<MutationSite>) -> Vec<MutationSite> {
    sites
        .into_iter()
        .filter(|site| site.mutated_text != site.original_text)
        .collect()
}
