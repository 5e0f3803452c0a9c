//! Tests for tree expansion, actions and the runtime dictionary.

use ruleweave::{ExpandError, FlattenOptions, Grammar, RuleSet, Tree};

fn rules(pairs: &[(&str, &str)]) -> RuleSet {
    pairs.iter().copied().collect()
}

// =========================================================================
// Substitution
// =========================================================================

#[test]
fn basic_substitution() {
    let mut grammar = Grammar::seeded(rules(&[("rule", "output"), ("origin", "#rule#")]), 0);
    assert_eq!(grammar.flatten("#origin#").unwrap(), "output");
}

#[test]
fn nested_substitution() {
    let mut grammar = Grammar::seeded(
        rules(&[
            ("rule5", "output"),
            ("rule4", "#rule5#"),
            ("rule3", "#rule4#"),
            ("rule2", "#rule3#"),
            ("rule1", "#rule2#"),
            ("origin", "#rule1#"),
        ]),
        0,
    );
    assert_eq!(grammar.flatten("#origin#").unwrap(), "output");
}

#[test]
fn literal_input_needs_no_expansion() {
    let mut grammar = Grammar::seeded(RuleSet::new(), 0);
    let mut tree = grammar.tree("blah");
    assert!(tree.is_expanded());
    assert_eq!(tree.first_unexpanded(), None);
    assert_eq!(tree.last_expandable_child(tree.root()), None);
    assert!(!grammar.expand(&mut tree).unwrap());
    assert_eq!(grammar.flatten("blah # [x").unwrap(), "blah # [x");
}

#[test]
fn mixed_text_keeps_literal_runs() {
    let mut grammar = Grammar::seeded(rules(&[("a", "one"), ("b", "two")]), 0);
    assert_eq!(grammar.flatten("<#a#|#b#|#a#>").unwrap(), "<one|two|one>");
}

// =========================================================================
// Stepping and inspection
// =========================================================================

#[test]
fn tree_steps_from_root() {
    let mut grammar = Grammar::seeded(rules(&[("rule", "output")]), 0);
    let mut tree = grammar.tree("#rule#");
    assert_eq!(tree.leaves(), vec![tree.root()]);
    assert_eq!(tree.first_unexpanded(), Some(tree.root()));

    assert!(!grammar.expand(&mut tree).unwrap());
    assert!(tree.is_expanded());
    assert_eq!(tree.steps(), 1);

    let leaves = tree.leaves();
    assert_eq!(leaves.len(), 1);
    let leaf = tree.node(leaves[0]);
    assert_eq!(leaf.text(), "output");
    assert_eq!(leaf.rule(), Some("rule"));
    assert!(leaf.is_complete());
}

#[test]
fn flatten_is_idempotent() {
    let mut rules = rules(&[
        ("origin", "#[pet:#animal#]story#"),
        ("story", "#pet.a.capitalize# saw #pet.s#.#popPet# #pet#"),
        ("popPet", "[#pet.pop!!#]"),
        ("pet", "nothing"),
    ]);
    rules.insert("animal", vec!["owl", "cat", "fox"]);
    let mut grammar = Grammar::seeded(rules, 11).with_builtins();
    let mut tree = grammar.expanded_tree("#origin#").unwrap();
    let first = grammar.flatten_tree(&mut tree, FlattenOptions::default()).unwrap();
    // Expanding a finished tree is a no-op.
    assert!(!grammar.expand(&mut tree).unwrap());
    let second = grammar.flatten_tree(&mut tree, FlattenOptions::default()).unwrap();
    assert_eq!(first, second);
    assert!(first.ends_with(". nothing"), "{first}");
}

#[test]
fn expansion_is_depth_first_left_to_right() {
    let mut grammar = Grammar::seeded(
        rules(&[("pair", "#left# #right#"), ("left", "#l#"), ("l", "L"), ("right", "R")]),
        0,
    );
    let mut tree = grammar.tree("#pair#");
    let mut order = Vec::new();
    while let Some(id) = tree.first_unexpanded() {
        order.push(tree.node(id).text().to_string());
        grammar.expand(&mut tree).unwrap();
    }
    assert_eq!(
        order,
        vec!["#pair#", "#left# #right#", "#left#", "#l#", "#right#"]
    );
}

#[test]
fn breadth_first_expands_level_by_level() {
    let mut grammar = Grammar::seeded(
        rules(&[("pair", "#left# #right#"), ("left", "#l#"), ("l", "L"), ("right", "R")]),
        0,
    );
    let mut tree = grammar.tree("#pair#");
    assert!(grammar.expand_breadth_first(&mut tree).unwrap());
    assert!(grammar.expand_breadth_first(&mut tree).unwrap());
    // `#left#` and `#right#` in one pass.
    assert!(grammar.expand_breadth_first(&mut tree).unwrap());
    assert_eq!(tree.steps(), 4);
    let next = tree.first_unexpanded().unwrap();
    assert_eq!(tree.node(next).text(), "#l#");

    assert!(!grammar.expand_breadth_first(&mut tree).unwrap());
    assert_eq!(tree.steps(), 5);
    assert!(tree.is_expanded());
    assert!(tree.node(tree.root()).is_finished());
    assert_eq!(
        grammar.flatten_tree(&mut tree, FlattenOptions::default()).unwrap(),
        "L R"
    );
}

#[test]
fn breadth_first_binds_keys() {
    let mut grammar = Grammar::seeded(action_rules(), 0);
    let mut tree = grammar.tree("#ruleGetKeyOrigin#");
    while grammar.expand_breadth_first(&mut tree).unwrap() {}
    assert_eq!(
        grammar.flatten_tree(&mut tree, FlattenOptions::default()).unwrap(),
        "key is seagull"
    );
}

#[test]
fn tree_outline() {
    let mut grammar = Grammar::seeded(
        rules(&[("getKey", "key is #key#"), ("animal", "owl")]),
        0,
    )
    .with_builtins();
    let tree = grammar.expanded_tree("#[key:#animal.s#]getKey#").unwrap();
    insta::assert_snapshot!(tree.to_string().trim_end(), @r##"
    "#[key:#animal.s#]getKey#"
      "[key:#animal.s#]" hidden
        "#animal.s#" hidden key="key"
          "owl" hidden rule=animal mods=s
      "#getKey#"
        "key is #key#" rule=getKey
          "key is "
          "#key#"
            "owls" rule=key
    "##);
}

// =========================================================================
// Actions
// =========================================================================

fn action_rules() -> RuleSet {
    rules(&[
        ("getKey", "key is #key#"),
        ("getKey2", "#key2# is key2"),
        ("animal", "seagull"),
        ("fun", "[key:whale][key2:dolphin]"),
        ("dll", "#animal.s# "),
        ("dlr", "are neat"),
        ("drl", ". just kidding. "),
        ("drr", "#animal.s# are annoying"),
        ("dl", "#dll##dlr#"),
        ("dr", "#drl##drr#"),
        ("deep", "#dl##dr#"),
        ("textGetKeyOrigin", "#[key:blurf]getKey#"),
        ("ruleGetKeyOrigin", "#[key:#animal#]getKey#"),
        ("funOrigin", "#[#fun#]getKey# #getKey2#"),
        ("deepOrigin", "#[key:#deep#]getKey#"),
    ])
}

#[test]
fn actions_bind_keys_before_the_rule() {
    let mut grammar = Grammar::seeded(action_rules(), 0);
    assert_eq!(grammar.flatten("#[key:testkey]getKey#").unwrap(), "key is testkey");
    assert_eq!(grammar.flatten("#textGetKeyOrigin#").unwrap(), "key is blurf");
    assert_eq!(grammar.flatten("#ruleGetKeyOrigin#").unwrap(), "key is seagull");
    assert_eq!(
        grammar.flatten("#funOrigin#").unwrap(),
        "key is whale dolphin is key2"
    );
}

#[test]
fn deep_key_capture_applies_nested_modifiers() {
    let mut grammar = Grammar::seeded(action_rules(), 0).with_builtins();
    assert_eq!(
        grammar.flatten("#deepOrigin#").unwrap(),
        "key is seagulls are neat. just kidding. seagulls are annoying"
    );
}

#[test]
fn hidden_action_text_is_suppressed() {
    let mut grammar = Grammar::seeded(rules(&[("getKey", "got #key#")]), 0);
    assert_eq!(grammar.flatten("#[key:x]getKey#").unwrap(), "got x");
    assert_eq!(grammar.flatten("[key:x][other:#getKey#]").unwrap(), "");
}

#[test]
fn hidden_nodes_show_when_not_ignored() {
    let mut grammar = Grammar::seeded(rules(&[("getKey", "got #key#")]), 0);
    let mut tree = grammar.expanded_tree("#[key:x]getKey#").unwrap();
    let options = FlattenOptions::builder().ignore_hidden(false).build();
    assert_eq!(grammar.flatten_tree(&mut tree, options).unwrap(), "xgot x");
}

#[test]
fn key_with_text_pushes_a_choice_list() {
    let mut grammar = Grammar::seeded(rules(&[("pick", "#them#")]), 3);
    let output = grammar.flatten("#[them:she, her ,they]pick#").unwrap();
    assert!(["she", " her ", "they"].contains(&output.as_str()), "{output}");
}

#[test]
fn inner_keys_resolve_before_outer_keys() {
    let mut grammar = Grammar::seeded(
        rules(&[
            ("name", "Ann"),
            ("greeting", "hi #who#"),
            ("story", "#[who:#name#][line:#greeting#]tell#"),
            ("tell", "#line#!"),
        ]),
        0,
    );
    assert_eq!(grammar.flatten("#story#").unwrap(), "hi Ann!");
}

#[test]
fn inert_actions_expand_to_nothing() {
    let mut grammar = Grammar::seeded(RuleSet::new(), 0);
    assert_eq!(grammar.flatten("[]").unwrap(), "");
    assert_eq!(grammar.flatten("[key:]").unwrap(), "");
    assert_eq!(grammar.flatten("[just words][more]").unwrap(), "");
}

#[test]
fn runtime_overrides_do_not_leak_between_trees() {
    let mut grammar = Grammar::seeded(rules(&[("key", "static"), ("get", "#key#")]), 0);
    assert_eq!(grammar.flatten("#[key:dynamic]get#").unwrap(), "dynamic");
    assert_eq!(grammar.flatten("#get#").unwrap(), "static");
}

#[test]
fn actions_can_be_expanded_incrementally() {
    let mut grammar = Grammar::seeded(rules(&[("name", "Bo")]), 0);
    let mut tree: Tree = grammar.tree("[hero:#name#]");
    assert!(tree.runtime().is_empty());
    while grammar.expand(&mut tree).unwrap() {}
    assert_eq!(tree.runtime().depth("hero"), 1);
    assert_eq!(
        tree.runtime().top("hero"),
        Some(&ruleweave::RuleContents::from("Bo"))
    );
}

// =========================================================================
// Errors and limits
// =========================================================================

#[test]
fn unknown_rule_suggests_close_names() {
    let mut grammar = Grammar::seeded(rules(&[("animal", "owl"), ("origin", "#animl#")]), 0);
    let err = grammar.flatten("#origin#").unwrap_err();
    match &err {
        ExpandError::UnknownRule { name, suggestions } => {
            assert_eq!(name, "animl");
            assert_eq!(suggestions, &vec!["animal".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    insta::assert_snapshot!(err, @"unknown rule 'animl'; did you mean: animal?");
}

#[test]
fn failed_step_can_be_retried() {
    let mut grammar = Grammar::seeded(rules(&[("origin", "#later#")]), 0);
    let mut tree = grammar.tree("#origin#");
    assert!(grammar.expand(&mut tree).unwrap());
    assert!(grammar.expand(&mut tree).is_err());
    assert!(!tree.is_expanded());

    let mut fixed = Grammar::seeded(rules(&[("later", "now")]), 0);
    tree.expand_all(&mut fixed).unwrap();
    assert_eq!(fixed.flatten_tree(&mut tree, FlattenOptions::default()).unwrap(), "now");
}

#[test]
fn failed_capture_stops_the_tree() {
    let mut grammar =
        Grammar::seeded(rules(&[("rule", "cat"), ("origin", "#key#")]), 0).with_builtins();
    let mut tree = grammar.tree("#[key:#rule.replace(a)#]origin#");
    let err = loop {
        match grammar.expand(&mut tree) {
            Ok(true) => {}
            Ok(false) => panic!("expansion should fail"),
            Err(err) => break err,
        }
    };
    assert!(matches!(
        err.root_cause(),
        ExpandError::WrongParameterCount {
            expected: 2,
            got: 1,
            ..
        }
    ));

    // Retrying reports the same error instead of moving on without the key.
    let again = grammar.expand(&mut tree).unwrap_err();
    assert_eq!(again.to_string(), err.to_string());
    assert!(grammar.expand_breadth_first(&mut tree).is_err());
    assert!(tree.failure().is_some());
    assert!(!tree.is_expanded());
    assert_eq!(tree.runtime().depth("key"), 0);
}

#[test]
fn expansion_limit_stops_runaway_grammars() {
    let mut grammar = Grammar::seeded(rules(&[("loop", "again #loop#")]), 0);
    grammar.set_expansion_limit(Some(50));
    let err = grammar.flatten("#loop#").unwrap_err();
    assert!(matches!(err, ExpandError::ExpansionLimitExceeded { limit: 50 }));
}

#[test]
fn expansion_limit_allows_small_trees() {
    let mut grammar = Grammar::seeded(rules(&[("a", "#b#"), ("b", "done")]), 0);
    grammar.set_expansion_limit(Some(2));
    assert_eq!(grammar.flatten("#a#").unwrap(), "done");
}
