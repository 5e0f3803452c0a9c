//! Static lint rules for rule sets.
//!
//! Lint reads rule text only. It never samples or runs handlers, so a clean
//! result does not guarantee expansion succeeds (runtime keys may be popped
//! before use, handlers may reject their input).

use std::collections::BTreeSet;

use crate::interpreter::error::{LintWarning, compute_suggestions};
use crate::interpreter::handlers::HandlerRegistry;
use crate::interpreter::modifiers::ModifierRegistry;
use crate::parser::{Reference, parse_modifier_call, scan_assigned_keys, scan_references};
use crate::types::{RuleContents, RuleSet};

/// Runs every lint rule over `rules`, returning warnings in rule-name order.
pub fn lint_rules<R>(
    rules: &RuleSet,
    modifiers: &ModifierRegistry,
    handlers: &HandlerRegistry<R>,
) -> Vec<LintWarning> {
    let assigned: BTreeSet<&str> = rules
        .iter()
        .flat_map(|(_, contents)| contents.texts())
        .flat_map(scan_assigned_keys)
        .collect();
    let known: Vec<&str> = rules
        .names()
        .chain(assigned.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut warnings = Vec::new();
    for (name, contents) in rules.iter() {
        lint_name(name, &mut warnings);
        lint_handler(name, contents, handlers, &mut warnings);
        for text in contents.texts() {
            for reference in scan_references(text) {
                lint_reference(name, &reference, rules, &assigned, &known, &mut warnings);
                lint_modifiers(name, &reference, modifiers, &mut warnings);
            }
        }
    }
    warnings
}

/// Flags rule names that no `#...#` reference can spell.
fn lint_name(name: &str, warnings: &mut Vec<LintWarning>) {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        warnings.push(LintWarning::UnreachableName {
            rule: name.to_string(),
        });
    }
}

fn lint_handler<R>(
    name: &str,
    contents: &RuleContents,
    handlers: &HandlerRegistry<R>,
    warnings: &mut Vec<LintWarning>,
) {
    let RuleContents::Object(_) = contents else {
        return;
    };
    match contents.handler_name() {
        None => warnings.push(LintWarning::MissingHandler {
            rule: name.to_string(),
        }),
        Some(handler) if !handlers.contains(handler) => {
            warnings.push(LintWarning::UnknownHandler {
                rule: name.to_string(),
                handler: handler.to_string(),
            });
        }
        Some(_) => {}
    }
}

fn lint_reference(
    name: &str,
    reference: &Reference<'_>,
    rules: &RuleSet,
    assigned: &BTreeSet<&str>,
    known: &[&str],
    warnings: &mut Vec<LintWarning>,
) {
    if rules.contains(reference.name) || assigned.contains(reference.name) {
        return;
    }
    warnings.push(LintWarning::UndefinedRule {
        rule: name.to_string(),
        name: reference.name.to_string(),
        suggestions: compute_suggestions(reference.name, known),
    });
}

fn lint_modifiers(
    name: &str,
    reference: &Reference<'_>,
    modifiers: &ModifierRegistry,
    warnings: &mut Vec<LintWarning>,
) {
    for spec in &reference.modifiers {
        let call = parse_modifier_call(spec);
        let Some(modifier) = modifiers.get(call.name) else {
            warnings.push(LintWarning::UnknownModifier {
                rule: name.to_string(),
                modifier: call.name.to_string(),
            });
            continue;
        };
        if modifier.arity != call.params.len() {
            warnings.push(LintWarning::ModifierArity {
                rule: name.to_string(),
                modifier: call.name.to_string(),
                expected: modifier.arity,
                got: call.params.len(),
            });
        }
    }
}
