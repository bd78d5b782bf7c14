// Copyright 2021-2025 Martin Pool

//! Walks the syntax tree of a single source file, emitting [MutationSite]s.
//!
//! Uses a `syn::visit::Visit` walk with per-node-kind match arms for
//! binary/unary operators and match arms, emitting the full catalog in
//! [crate::operator::MutationOperator] and carrying UTF-8 byte offsets
//! alongside the line/column spans.

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::spanned::Spanned;
use syn::visit::Visit;
use syn::{BinOp, Expr, File, Lit, UnOp};
use tracing::{trace, trace_span};

use crate::ast::{attrs_excluded, block_is_empty};
use crate::error::Error;
use crate::fnvalue::return_type_replacements;
use crate::pretty::tokens_to_pretty_string;
use crate::span::{LineIndex, Span};
use crate::operator::MutationOperator;
use crate::site::MutationSite;
use crate::tailored::TailoredOperatorConfig;
use crate::Result;

/// Built-in method-name pairs swapped by `ConcurrencyContextSwap` when reached
/// via a method call, e.g. `handle.spawn(fut)` -> `handle.spawn_blocking(fut)`.
const CONCURRENCY_METHOD_PAIRS: &[(&str, &str)] = &[("spawn", "spawn_blocking")];

/// Built-in type-name pairs swapped by `ConcurrencyContextSwap` when reached
/// via a path call, e.g. `Mutex::new(v)` -> `RwLock::new(v)`.
const CONCURRENCY_TYPE_PAIRS: &[(&str, &str)] = &[("Mutex", "RwLock")];

/// Look up `name` in `pairs`, checking both directions, so e.g.
/// `spawn_blocking` swaps back to `spawn` just as readily as `spawn` swaps
/// to `spawn_blocking`.
fn symmetric_swap(pairs: &[(&str, &str)], name: &str) -> Option<&'static str> {
    pairs.iter().find_map(|(a, b)| {
        if *a == name {
            Some(*b)
        } else if *b == name {
            Some(*a)
        } else {
            None
        }
    })
}

/// Parse `source` and return every mutation site the discoverer can find in
/// it, in deterministic pre-order (the same order `syn` visits the tree).
///
/// `tailored` supplies the catalog of identifier/literal substitutions for
/// [MutationOperator::TailoredIdentifierLiteralReplacement]; pass
/// `&TailoredOperatorConfig::default()` for none.
pub fn discover_mutation_sites(source: &str, tailored: &TailoredOperatorConfig) -> Result<Vec<MutationSite>> {
    let file: File = syn::parse_str(source).map_err(|err| Error::InvalidSourceFile {
        reason: err.to_string(),
    })?;
    if attrs_excluded(&file.attrs) {
        return Ok(Vec::new());
    }
    let line_index = LineIndex::new(source);
    let mut visitor = DiscoveryVisitor {
        source,
        line_index: &line_index,
        tailored,
        fn_stack: Vec::new(),
        sites: Vec::new(),
        dead_bool_spans: std::collections::HashSet::new(),
    };
    visitor.visit_file(&file);
    Ok(visitor.sites)
}

struct EnclosingFunction {
    name: String,
}

struct DiscoveryVisitor<'s> {
    source: &'s str,
    line_index: &'s LineIndex,
    tailored: &'s TailoredOperatorConfig,
    fn_stack: Vec<EnclosingFunction>,
    sites: Vec<MutationSite>,
    /// Byte spans of boolean literals that only guard an empty block, so
    /// flipping them can never change observable behavior.
    dead_bool_spans: std::collections::HashSet<(usize, usize, usize, usize)>,
}

impl DiscoveryVisitor<'_> {
    fn current_function_name(&self) -> Option<String> {
        self.fn_stack.last().map(|f| f.name.clone())
    }

    fn push_site(
        &mut self,
        operator: MutationOperator,
        span: Span,
        mutated_text: TokenStream,
        short_original: Option<String>,
    ) {
        let function_name = self.current_function_name();
        self.sites.push(MutationSite::new(
            operator,
            function_name,
            span,
            self.source,
            self.line_index,
            tokens_to_pretty_string(mutated_text),
            short_original,
        ));
    }

    fn push_site_text(
        &mut self,
        operator: MutationOperator,
        span: Span,
        mutated_text: String,
        short_original: Option<String>,
    ) {
        let function_name = self.current_function_name();
        self.sites.push(MutationSite::new(
            operator,
            function_name,
            span,
            self.source,
            self.line_index,
            mutated_text,
            short_original,
        ));
    }

    fn collect_fn_value_mutants(&mut self, sig: &syn::Signature, block: &syn::Block) {
        let body_span = match function_body_span(block) {
            Some(s) => s,
            None => return,
        };
        let orig = block.to_token_stream().to_string();
        for rep in return_type_replacements(&sig.output, &[]) {
            let new_block = quote! { { #rep } }.to_string();
            if orig.replace(['{', '}'], "").trim() == new_block.replace(['{', '}'], "").trim() {
                continue;
            }
            self.push_site(MutationOperator::TypedReturnDefaultSubstitution, body_span, rep, None);
        }
    }
}

/// The integer value of `expr` if it is an (optionally negated) integer
/// literal, used by the equivalence filter's arithmetic/range/unary rules.
fn int_literal_value(expr: &Expr) -> Option<i128> {
    match expr {
        Expr::Lit(syn::ExprLit { lit: Lit::Int(n), .. }) => n.base10_parse::<i128>().ok(),
        Expr::Unary(syn::ExprUnary { op: UnOp::Neg(_), expr, .. }) => int_literal_value(expr).map(|v| -v),
        _ => None,
    }
}

fn span_key(span: Span) -> (usize, usize, usize, usize) {
    (span.start.line, span.start.column, span.end.line, span.end.column)
}

/// True if swapping `op` for the operator spelled `replacement` is a
/// provable no-op given that the right-hand operand is the literal
/// `right_literal` (e.g. `x + 0 -> x - 0`, `x * 1 -> x / 1`).
fn is_arithmetic_noop_swap(op: &BinOp, replacement: &str, right_literal: Option<i128>) -> bool {
    match (op, right_literal) {
        (BinOp::Add(_), Some(0)) => replacement == "-",
        (BinOp::Sub(_), Some(0)) => replacement == "+",
        (BinOp::Mul(_), Some(1)) => replacement == "/",
        (BinOp::Div(_), Some(1)) => replacement == "*",
        _ => false,
    }
}

impl<'ast> Visit<'ast> for DiscoveryVisitor<'_> {
    fn visit_file(&mut self, i: &'ast File) {
        if attrs_excluded(&i.attrs) {
            return;
        }
        syn::visit::visit_file(self, i);
    }

    fn visit_item_fn(&mut self, i: &'ast syn::ItemFn) {
        let _span = trace_span!("fn", name = %i.sig.ident).entered();
        if attrs_excluded(&i.attrs) || block_is_empty(&i.block) {
            return;
        }
        self.fn_stack.push(EnclosingFunction {
            name: i.sig.ident.to_string(),
        });
        self.collect_fn_value_mutants(&i.sig, &i.block);
        syn::visit::visit_item_fn(self, i);
        self.fn_stack.pop();
    }

    fn visit_impl_item_fn(&mut self, i: &'ast syn::ImplItemFn) {
        let _span = trace_span!("fn", name = %i.sig.ident).entered();
        if attrs_excluded(&i.attrs) || i.sig.ident == "new" || block_is_empty(&i.block) {
            return;
        }
        self.fn_stack.push(EnclosingFunction {
            name: i.sig.ident.to_string(),
        });
        self.collect_fn_value_mutants(&i.sig, &i.block);
        syn::visit::visit_impl_item_fn(self, i);
        self.fn_stack.pop();
    }

    fn visit_expr_binary(&mut self, i: &'ast syn::ExprBinary) {
        if attrs_excluded(&i.attrs) {
            return;
        }
        let op_span = Span::from(i.op.span());
        let (operator, replacements): (MutationOperator, Vec<TokenStream>) = match i.op {
            BinOp::Eq(_) => (MutationOperator::ComparisonOperatorSwap, vec![quote! { != }]),
            BinOp::Ne(_) => (MutationOperator::ComparisonOperatorSwap, vec![quote! { == }]),
            BinOp::Lt(_) => (
                MutationOperator::ComparisonOperatorSwap,
                vec![quote! { == }, quote! { > }, quote! { <= }],
            ),
            BinOp::Gt(_) => (
                MutationOperator::ComparisonOperatorSwap,
                vec![quote! { == }, quote! { < }, quote! { >= }],
            ),
            BinOp::Le(_) => (MutationOperator::ComparisonOperatorSwap, vec![quote! { > }]),
            BinOp::Ge(_) => (MutationOperator::ComparisonOperatorSwap, vec![quote! { < }]),
            BinOp::And(_) => (MutationOperator::LogicalOperatorSwap, vec![quote! { || }]),
            BinOp::Or(_) => (MutationOperator::LogicalOperatorSwap, vec![quote! { && }]),
            BinOp::Add(_) => (MutationOperator::ArithmeticOperatorSwap, vec![quote! { - }, quote! { * }]),
            BinOp::Sub(_) | BinOp::Mul(_) => {
                (MutationOperator::ArithmeticOperatorSwap, vec![quote! { + }, quote! { / }])
            }
            BinOp::Div(_) => (MutationOperator::ArithmeticOperatorSwap, vec![quote! { % }, quote! { * }]),
            BinOp::Rem(_) => (MutationOperator::ArithmeticOperatorSwap, vec![quote! { / }, quote! { + }]),
            BinOp::AddAssign(_) => (MutationOperator::CompoundAssignmentSwap, vec![quote! { -= }, quote! { *= }]),
            BinOp::SubAssign(_) | BinOp::MulAssign(_) => {
                (MutationOperator::CompoundAssignmentSwap, vec![quote! { += }, quote! { /= }])
            }
            BinOp::DivAssign(_) => (MutationOperator::CompoundAssignmentSwap, vec![quote! { %= }, quote! { *= }]),
            BinOp::RemAssign(_) => (MutationOperator::CompoundAssignmentSwap, vec![quote! { /= }, quote! { += }]),
            BinOp::BitAnd(_) => (MutationOperator::BitwiseOperatorSwap, vec![quote! { | }, quote! { ^ }]),
            BinOp::BitOr(_) => (MutationOperator::BitwiseOperatorSwap, vec![quote! { & }, quote! { ^ }]),
            BinOp::BitXor(_) => (MutationOperator::BitwiseOperatorSwap, vec![quote! { | }, quote! { & }]),
            BinOp::Shl(_) => (MutationOperator::BitwiseOperatorSwap, vec![quote! { >> }]),
            BinOp::Shr(_) => (MutationOperator::BitwiseOperatorSwap, vec![quote! { << }]),
            BinOp::BitAndAssign(_) => (MutationOperator::CompoundAssignmentSwap, vec![quote! { |= }, quote! { ^= }]),
            BinOp::BitOrAssign(_) => (MutationOperator::CompoundAssignmentSwap, vec![quote! { &= }, quote! { ^= }]),
            BinOp::BitXorAssign(_) => (MutationOperator::CompoundAssignmentSwap, vec![quote! { |= }, quote! { &= }]),
            BinOp::ShlAssign(_) => (MutationOperator::CompoundAssignmentSwap, vec![quote! { >>= }]),
            BinOp::ShrAssign(_) => (MutationOperator::CompoundAssignmentSwap, vec![quote! { <<= }]),
            _ => {
                trace!("no mutants for this binary operator");
                (MutationOperator::ArithmeticOperatorSwap, Vec::new())
            }
        };
        // Equivalence filter: an arithmetic swap where the
        // right-hand operand is a literal `0` or `1` is sometimes a provable
        // no-op (`x + 0` -> `x - 0`, `x * 1` -> `x / 1`); don't even emit
        // those sites rather than generate-then-filter them.
        let right_literal = int_literal_value(&i.right);
        for rep in replacements {
            if operator == MutationOperator::ArithmeticOperatorSwap
                && is_arithmetic_noop_swap(&i.op, rep.to_string().trim(), right_literal)
            {
                continue;
            }
            self.push_site(operator, op_span, rep, None);
        }
        // ConstantBoundaryShift: perturb a literal operand of a comparison by one.
        if matches!(i.op, BinOp::Lt(_) | BinOp::Le(_) | BinOp::Gt(_) | BinOp::Ge(_)) {
            if let Expr::Lit(syn::ExprLit { lit: Lit::Int(n), .. }) = &*i.right {
                if let Ok(value) = n.base10_parse::<i128>() {
                    let span = Span::from(n.span());
                    for shifted in [value + 1, value - 1] {
                        self.push_site_text(
                            MutationOperator::ConstantBoundaryShift,
                            span,
                            shifted.to_string(),
                            None,
                        );
                    }
                }
            }
        }
        syn::visit::visit_expr_binary(self, i);
    }

    fn visit_expr_unary(&mut self, i: &'ast syn::ExprUnary) {
        if attrs_excluded(&i.attrs) {
            return;
        }
        // Equivalence filter: removing a unary minus from a
        // literal `0` is a no-op (`-0 == 0`).
        let is_neg_zero = matches!(i.op, UnOp::Neg(_)) && int_literal_value(&i.expr) == Some(0);
        if matches!(i.op, UnOp::Not(_) | UnOp::Neg(_)) && !is_neg_zero {
            self.push_site(MutationOperator::UnaryOperatorRemoval, Span::from(i.op.span()), quote! {}, None);
        }
        syn::visit::visit_expr_unary(self, i);
    }

    fn visit_expr_match(&mut self, i: &'ast syn::ExprMatch) {
        if attrs_excluded(&i.attrs) {
            return;
        }
        let has_catchall = i.arms.iter().any(|arm| matches!(arm.pat, syn::Pat::Wild(_)));
        if has_catchall {
            for arm in i.arms.iter().filter(|arm| !matches!(arm.pat, syn::Pat::Wild(_)) && arm.guard.is_none()) {
                let short = tokens_to_pretty_string(&arm.pat);
                self.push_site(MutationOperator::MatchArmDeletion, Span::from(arm.span()), quote! {}, Some(short));
            }
        }
        for arm in &i.arms {
            if let Some((_if, guard_expr)) = &arm.guard {
                let span = Span::from(guard_expr.span());
                self.push_site(MutationOperator::MatchArmGuardReplacement, span, quote! { true }, None);
                self.push_site(MutationOperator::MatchArmGuardReplacement, span, quote! { false }, None);
            }
        }
        syn::visit::visit_expr_match(self, i);
    }

    fn visit_expr_if(&mut self, i: &'ast syn::ExprIf) {
        if attrs_excluded(&i.attrs) {
            return;
        }
        let cond = &i.cond;
        let cond_span = Span::from(cond.span());
        // Equivalence filter: a boolean literal that guards an
        // otherwise-empty `if` with no `else` is dead control flow — the
        // branch has no observable effect whichever way the literal reads.
        if matches!(&**cond, Expr::Lit(syn::ExprLit { lit: Lit::Bool(_), .. }))
            && block_is_empty(&i.then_branch)
            && i.else_branch.is_none()
        {
            self.dead_bool_spans.insert(span_key(cond_span));
        }
        self.push_site(MutationOperator::GuardConditionNegation, cond_span, quote! { !(#cond) }, None);
        if let Some((_else_token, else_branch)) = &i.else_branch {
            let then_tokens = i.then_branch.to_token_stream();
            let else_tokens = else_branch.to_token_stream();
            let whole_span = Span::from(i.span());
            self.push_site(
                MutationOperator::TernaryBranchSwap,
                whole_span,
                quote! { if #cond #else_tokens else #then_tokens },
                None,
            );
        }
        syn::visit::visit_expr_if(self, i);
    }

    fn visit_expr_range(&mut self, i: &'ast syn::ExprRange) {
        if let (Some(start), Some(end)) = (&i.start, &i.end) {
            let span = Span::from(i.span());
            // Equivalence filter: swapping the bounds of a
            // single-element range (e.g. `3..3`) is a no-op.
            let is_single_element =
                matches!((int_literal_value(start), int_literal_value(end)), (Some(a), Some(b)) if a == b);
            if !is_single_element {
                // Swap bound positions, preserving whether the range is
                // half-open or closed.
                let swapped = match i.limits {
                    syn::RangeLimits::HalfOpen(_) => quote! { #end..#start },
                    syn::RangeLimits::Closed(_) => quote! { #end..=#start },
                };
                self.push_site(MutationOperator::RangeBoundSwap, span, swapped, None);
            }
            // Flip inclusive/exclusive, keeping bound order unchanged.
            let flipped = match i.limits {
                syn::RangeLimits::HalfOpen(_) => quote! { #start..=#end },
                syn::RangeLimits::Closed(_) => quote! { #start..#end },
            };
            self.push_site(MutationOperator::RangeBoundSwap, span, flipped, None);
        }
        syn::visit::visit_expr_range(self, i);
    }

    fn visit_expr_try(&mut self, i: &'ast syn::ExprTry) {
        let span = Span::from(i.span());
        let inner = &i.expr;
        self.push_site(MutationOperator::TryKeywordVariation, span, quote! { #inner.unwrap() }, None);
        syn::visit::visit_expr_try(self, i);
    }

    fn visit_expr_cast(&mut self, i: &'ast syn::ExprCast) {
        let span = Span::from(i.span());
        let expr = &i.expr;
        if let syn::Type::Path(tp) = &*i.ty {
            if let Some(alt) = alternate_numeric_type(tp) {
                self.push_site(MutationOperator::CastStrengthSwap, span, quote! { #expr as #alt }, None);
            }
        }
        syn::visit::visit_expr_cast(self, i);
    }

    fn visit_expr_break(&mut self, i: &'ast syn::ExprBreak) {
        let span = Span::from(i.span());
        self.push_site(MutationOperator::LoopControlSubstitution, span, quote! { continue }, None);
        syn::visit::visit_expr_break(self, i);
    }

    fn visit_expr_continue(&mut self, i: &'ast syn::ExprContinue) {
        let span = Span::from(i.span());
        self.push_site(MutationOperator::LoopControlSubstitution, span, quote! { break }, None);
        syn::visit::visit_expr_continue(self, i);
    }

    fn visit_expr_return(&mut self, i: &'ast syn::ExprReturn) {
        let span = Span::from(i.span());
        if i.expr.is_some() {
            self.push_site(MutationOperator::EarlyReturnReplacement, span, quote! { return }, None);
        }
        syn::visit::visit_expr_return(self, i);
    }

    fn visit_expr_lit(&mut self, i: &'ast syn::ExprLit) {
        let span = Span::from(i.span());
        match &i.lit {
            Lit::Bool(b) => {
                if !self.dead_bool_spans.contains(&span_key(span)) {
                    let flipped = !b.value;
                    self.push_site(MutationOperator::BooleanLiteralFlip, span, quote! { #flipped }, None);
                }
            }
            Lit::Int(n) => {
                if let Ok(value) = n.base10_parse::<i128>() {
                    for perturbed in [value + 1, value - 1] {
                        self.push_site_text(
                            MutationOperator::NumericLiteralPerturbation,
                            span,
                            perturbed.to_string(),
                            None,
                        );
                    }
                }
            }
            Lit::Float(_) => {
                self.push_site(MutationOperator::NumericLiteralPerturbation, span, quote! { 0.0 }, None);
            }
            Lit::Str(s) => {
                let original = s.value();
                if let Some(replacement) = self.tailored.literal_replacement(&original) {
                    self.push_site_text(
                        MutationOperator::TailoredIdentifierLiteralReplacement,
                        span,
                        format!("{replacement:?}"),
                        None,
                    );
                } else if original.is_empty() {
                    self.push_site(MutationOperator::StringLiteralPerturbation, span, quote! { "xyzzy" }, None);
                } else {
                    self.push_site(MutationOperator::StringLiteralPerturbation, span, quote! { "" }, None);
                }
            }
            _ => {}
        }
        syn::visit::visit_expr_lit(self, i);
    }

    fn visit_expr_path(&mut self, i: &'ast syn::ExprPath) {
        if let Some(ident) = i.path.get_ident() {
            let name = ident.to_string();
            if let Some(replacement) = self.tailored.identifier_replacement(&name) {
                let span = Span::from(ident.span());
                let replacement_ident = syn::Ident::new(replacement, ident.span());
                self.push_site(
                    MutationOperator::TailoredIdentifierLiteralReplacement,
                    span,
                    quote! { #replacement_ident },
                    None,
                );
            }
        }
        syn::visit::visit_expr_path(self, i);
    }

    fn visit_expr_method_call(&mut self, i: &'ast syn::ExprMethodCall) {
        if attrs_excluded(&i.attrs) {
            return;
        }
        let method = i.method.to_string();
        let span = Span::from(i.span());
        let receiver = &i.receiver;
        match method.as_str() {
            "unwrap_or" | "unwrap_or_else" | "unwrap_or_default" => {
                self.push_site(MutationOperator::NilCoalescingRemoval, span, quote! { #receiver.unwrap() }, None);
            }
            "as_ref" | "as_deref" => {
                self.push_site(MutationOperator::OptionalChainingRemoval, span, receiver.to_token_stream(), None);
            }
            "min" => self.push_site(MutationOperator::StdlibSemanticSwap, span, swap_method(receiver, &i.args, "max"), None),
            "max" => self.push_site(MutationOperator::StdlibSemanticSwap, span, swap_method(receiver, &i.args, "min"), None),
            "first" => self.push_site(MutationOperator::StdlibSemanticSwap, span, swap_method(receiver, &i.args, "last"), None),
            "last" => self.push_site(MutationOperator::StdlibSemanticSwap, span, swap_method(receiver, &i.args, "first"), None),
            "sorted" => self.push_site(MutationOperator::StdlibSemanticSwap, span, swap_method(receiver, &i.args, "rev"), None),
            m => {
                if let Some(swapped) = symmetric_swap(CONCURRENCY_METHOD_PAIRS, m) {
                    self.push_site(
                        MutationOperator::ConcurrencyContextSwap,
                        span,
                        swap_method(receiver, &i.args, swapped),
                        None,
                    );
                }
            }
        }
        syn::visit::visit_expr_method_call(self, i);
    }

    fn visit_expr_call(&mut self, i: &'ast syn::ExprCall) {
        // Catches `Mutex::new(v)` -> `RwLock::new(v)`: the swapped part is a
        // type name reached through a path call, not a method name, so it
        // can't go through `visit_expr_method_call`.
        if let Expr::Path(p) = &*i.func {
            if p.path.segments.len() >= 2 {
                let type_segment = &p.path.segments[p.path.segments.len() - 2];
                if let Some(swapped) = symmetric_swap(CONCURRENCY_TYPE_PAIRS, &type_segment.ident.to_string()) {
                    let span = Span::from(type_segment.ident.span());
                    let swapped_ident = syn::Ident::new(swapped, type_segment.ident.span());
                    self.push_site(MutationOperator::ConcurrencyContextSwap, span, quote! { #swapped_ident }, None);
                }
            }
        }
        syn::visit::visit_expr_call(self, i);
    }

    fn visit_stmt(&mut self, i: &'ast syn::Stmt) {
        if let syn::Stmt::Expr(expr, semi) = i {
            if semi.is_some() {
                let span = Span::from(expr.span());
                if is_drop_call(expr) {
                    self.push_site(MutationOperator::ScopedCleanupRemoval, span, quote! {}, None);
                } else if matches!(expr, Expr::Call(_) | Expr::MethodCall(_)) {
                    self.push_site(MutationOperator::VoidCallRemoval, span, quote! {}, None);
                } else if matches!(expr, Expr::Return(_)) {
                    // Never delete a `return` statement here: it already has
                    // its own dedicated mutant in `visit_expr_return`
                    // (`EarlyReturnReplacement`), and spec.md's statement
                    // deletion rule explicitly excludes `return`.
                } else if !stmt_body_is_empty(expr) {
                    // Equivalence filter: deleting a statement whose own body
                    // is an empty block is a no-op.
                    self.push_site(MutationOperator::StatementDeletion, span, quote! {}, None);
                }
            }
        }
        syn::visit::visit_stmt(self, i);
    }

    fn visit_expr_struct(&mut self, i: &'ast syn::ExprStruct) {
        if i.rest.is_some() {
            for field in &i.fields {
                let span = Span::from(field.span());
                let field_name = field
                    .member
                    .to_token_stream()
                    .to_string();
                self.push_site(
                    MutationOperator::StructFieldDeletion,
                    span,
                    quote! {},
                    Some(field_name),
                );
            }
        }
        syn::visit::visit_expr_struct(self, i);
    }
}

fn swap_method(receiver: &Expr, args: &syn::punctuated::Punctuated<Expr, syn::Token![,]>, new_method: &str) -> TokenStream {
    let ident = syn::Ident::new(new_method, proc_macro2::Span::call_site());
    quote! { #receiver.#ident(#args) }
}

/// True if `expr` is a bare block statement (`{ }`) with nothing in it, so
/// deleting the whole statement changes nothing. Deliberately narrow: `if`/
/// `while`/`loop` are excluded even with an empty body, since their
/// condition may itself have side effects or (for `while`/`loop`) govern
/// termination — only a body-less bare block has no evaluation to lose.
fn stmt_body_is_empty(expr: &Expr) -> bool {
    matches!(expr, Expr::Block(e) if block_is_empty(&e.block))
}

fn is_drop_call(expr: &Expr) -> bool {
    if let Expr::Call(call) = expr {
        if let Expr::Path(p) = &*call.func {
            return p.path.is_ident("drop");
        }
    }
    false
}

fn alternate_numeric_type(tp: &syn::TypePath) -> Option<syn::Type> {
    let ident = tp.path.get_ident()?.to_string();
    let alt = match ident.as_str() {
        "i8" => "i16",
        "i16" => "i32",
        "i32" => "i64",
        "i64" => "i128",
        "u8" => "u16",
        "u16" => "u32",
        "u32" => "u64",
        "u64" => "u128",
        "f32" => "f64",
        "f64" => "f32",
        _ => return None,
    };
    Some(syn::parse_str(alt).expect("builtin numeric type name parses"))
}

fn function_body_span(block: &syn::Block) -> Option<Span> {
    Some(Span {
        start: block.stmts.first()?.span().start().into(),
        end: block.stmts.last()?.span().end().into(),
    })
}
