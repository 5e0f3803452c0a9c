//! Tests for choice rules, samplers and random sources.

use rand::SeedableRng;
use rand::rngs::StdRng;
use ruleweave::{ExpandError, Grammar, RangeSampler, RuleContents, RuleSet};

fn choice_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    rules.insert("rule", vec!["one", "two"]);
    rules.insert("dll", "one");
    rules.insert("dlr", "two");
    rules.insert("drl", "three");
    rules.insert("drr", "four");
    rules.insert("dl", vec!["#dll#", "#dlr#"]);
    rules.insert("dr", vec!["#drl#", "#drr#"]);
    rules.insert("deep", vec!["#dl#", "#dr#"]);
    rules
}

/// Returns its value for every draw, optionally flipping between 0 and 1.
struct Scripted {
    value: usize,
    alternate: bool,
}

impl Scripted {
    fn constant(value: usize) -> Self {
        Self {
            value,
            alternate: false,
        }
    }

    fn alternating(start: usize) -> Self {
        Self {
            value: start,
            alternate: true,
        }
    }
}

impl<R> RangeSampler<R> for Scripted {
    fn sample(&mut self, _rng: &mut R, _low: usize, _high: usize) -> usize {
        let value = self.value;
        if self.alternate {
            self.value = (self.value + 1) % 2;
        }
        value
    }
}

fn scripted(sampler: Scripted) -> Grammar<StdRng, Scripted> {
    Grammar::with_sampler(choice_rules(), StdRng::seed_from_u64(0), sampler)
}

#[test]
fn left_selection() {
    let mut grammar = scripted(Scripted::constant(0));
    assert_eq!(grammar.flatten("#rule#").unwrap(), "one");
    assert_eq!(grammar.flatten("#deep#").unwrap(), "one");
}

#[test]
fn right_selection() {
    let mut grammar = scripted(Scripted::constant(1));
    assert_eq!(grammar.flatten("#rule#").unwrap(), "two");
    assert_eq!(grammar.flatten("#deep#").unwrap(), "four");
}

#[test]
fn left_alternating_selection() {
    let mut grammar = scripted(Scripted::alternating(0));
    assert_eq!(grammar.flatten("#deep#").unwrap(), "two");
}

#[test]
fn right_alternating_selection() {
    let mut grammar = scripted(Scripted::alternating(1));
    assert_eq!(grammar.flatten("#deep#").unwrap(), "three");
}

#[test]
fn closure_sampler() {
    let mut grammar = Grammar::with_sampler(
        choice_rules(),
        StdRng::seed_from_u64(0),
        |_low: usize, high: usize| high,
    );
    assert_eq!(grammar.flatten("#deep#").unwrap(), "four");
}

#[test]
fn out_of_range_sample_is_an_error() {
    let mut grammar = scripted(Scripted::constant(5));
    let err = grammar.flatten("#rule#").unwrap_err();
    assert!(matches!(
        err,
        ExpandError::SampleOutOfRange {
            index: 5,
            len: 2,
            ..
        }
    ));
}

#[test]
fn empty_choices_are_an_error() {
    let mut rules = RuleSet::new();
    rules.insert("nothing", RuleContents::Choices(Vec::new()));
    let mut grammar = Grammar::seeded(rules, 0);
    let err = grammar.flatten("#nothing#").unwrap_err();
    assert!(matches!(err, ExpandError::EmptyChoices { .. }));
}

#[test]
fn same_seed_same_output() {
    let outputs = |seed| {
        let mut grammar = Grammar::seeded(choice_rules(), seed);
        (0..20)
            .map(|_| grammar.flatten("#deep# #rule#").unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(outputs(42), outputs(42));
}

#[test]
fn uniform_sampler_reaches_every_choice() {
    let mut grammar = Grammar::seeded(choice_rules(), 9);
    let mut seen: Vec<String> = (0..200)
        .map(|_| grammar.flatten("#deep#").unwrap())
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen, vec!["four", "one", "three", "two"]);
}

#[test]
fn recursive_story_terminates() {
    let rules = RuleSet::from_json_str(
        r##"{
        "name": ["Arjun", "Yuuma", "Darcy", "Mia", "Chiaki", "Izzi", "Azra", "Lina"],
        "animal": ["unicorn", "raven", "sparrow", "scorpion", "coyote", "eagle", "owl", "lizard", "zebra", "duck", "kitten"],
        "occupationBase": ["wizard", "witch", "detective", "ballerina", "criminal", "pirate", "lumberjack", "spy", "doctor", "scientist", "captain", "priest"],
        "occupationMod": ["occult ", "space ", "professional ", "gentleman ", "erotic ", "time ", "cyber", "paleo", "techno", "super"],
        "strange": ["mysterious", "portentous", "enchanting", "strange", "eerie"],
        "tale": ["story", "saga", "tale", "legend"],
        "occupation": ["#occupationMod##occupationBase#"],
        "mood": ["vexed", "indignant", "impassioned", "wistful", "astute", "courteous"],
        "setPronouns": [
            "[heroThey:they][heroThem:them][heroTheir:their][heroTheirs:theirs]",
            "[heroThey:she][heroThem:her][heroTheir:her][heroTheirs:hers]",
            "[heroThey:he][heroThem:him][heroTheir:his][heroTheirs:his]"
        ],
        "setSailForAdventure": ["set sail for adventure", "left #heroTheir# home", "set out for adventure", "went to seek #heroTheir# forture"],
        "setCharacter": ["[#setPronouns#][hero:#name#][heroJob:#occupation#]"],
        "openBook": [
            "An old #occupation# told #hero# a story. 'Listen well' she said to #hero#, 'to this #strange# #tale#. ' #origin#'",
            "#hero# went home.",
            "#hero# found an ancient book and opened it.  As #hero# read, the book told #strange.a# #tale#: #origin#"
        ],
        "story": ["#hero# the #heroJob# #setSailForAdventure#. #openBook#"],
        "origin": ["Once upon a time, #[#setCharacter#]story#"]
    }"##,
    )
    .unwrap();
    let mut grammar = Grammar::seeded(rules, 2024).with_builtins();
    for _ in 0..10 {
        let story = grammar.flatten("#origin#").unwrap();
        assert!(story.starts_with("Once upon a time, "), "{story}");
        assert!(!story.contains('#'), "{story}");
    }
}
