//! End-to-end tests: configuration, building, scoring and a learning step
//! over a small part-of-speech tagging graph.

use std::sync::Arc;

use factorforge::prelude::*;
use factorforge::{
    console, AlignedUnroller, BuildError, DiscreteStatistics, FactorForgeError, NeighborhoodConfig,
    TensorSet, WeightsMap,
};
use factorforge_test::{assert_close, TaggedSentence};

const CONFIG: &str = r#"
    [domain]
    max_categories = 8
    freeze_on_build = true

    [weights]
    convergence_threshold = 1e-9

    [scoring]
    neighborhood = "any"
    parallel_threshold = 2
"#;

struct Tagger {
    graph: FactorGraph,
    tags: Arc<CategoricalDomain>,
    sentence: TaggedSentence,
}

impl Tagger {
    fn variables(&self) -> Vec<Variable> {
        let mut vars = self.sentence.tags.clone();
        vars.extend(self.sentence.words.iter().cloned());
        vars
    }
}

/// Tags start at "O"; gold tags are DET NOUN VERB. Domains end up as
/// tag = {O, DET, NOUN, VERB} and word = {the, dog, runs}.
fn tagger(config: &FactorGraphConfig) -> Tagger {
    let mut builder = GraphBuilder::from_config(config).unwrap();
    let words = builder.categorical_domain("word");
    let tags = builder.categorical_domain("tag");
    let sentence = TaggedSentence::new(
        &words,
        &tags,
        "O",
        &[("the", "DET"), ("dog", "NOUN"), ("runs", "VERB")],
    );

    let emission = builder.new_weights("emission", &[4, 3]);
    let transition = builder.new_weights("transition", &[4, 4]);

    let emission = Family::dot("emission", DiscreteStatistics::new([4, 3]), emission).unwrap();
    let transition =
        Family::dot("transition", DiscreteStatistics::new([4, 4]), transition).unwrap();

    builder
        .add_template(FamilyTemplate::new(
            emission,
            AlignedUnroller::new(
                Sequences::single(sentence.tags.clone()),
                Sequences::single(sentence.words.clone()),
            ),
        ))
        .add_template(FamilyTemplate::new(
            transition,
            ChainUnroller::new(Sequences::single(sentence.tags.clone())),
        ));

    Tagger {
        graph: builder.finish(),
        tags,
        sentence,
    }
}

/// Target statistics minus current statistics of every factor.
fn gradient(tagger: &Tagger) -> WeightsMap {
    let factors = tagger.graph.factors(&tagger.variables());
    let mut gradient = tagger.graph.weights().blank_map();
    let mut accumulate = |scale: f64| {
        for factor in &factors {
            let weights = factor.weights().expect("dot factors carry weights");
            let statistics = factor.current_statistics().unwrap().unwrap();
            gradient
                .tensor_mut(weights)
                .add_scaled(&statistics, scale)
                .unwrap();
        }
    };

    accumulate(-1.0);
    let mut diff = DiffList::new();
    for tag in &tagger.sentence.tags {
        tag.set_to_target(Some(&mut diff)).unwrap();
    }
    accumulate(1.0);
    diff.undo_all();
    gradient
}

// ============================================================================
// Building
// ============================================================================

#[test]
fn test_config_drives_builder() {
    let config = FactorGraphConfig::from_toml_str(CONFIG).unwrap();
    let tagger = tagger(&config);

    assert!(tagger.tags.is_frozen());
    assert!(matches!(
        tagger.tags.intern("ADJ"),
        Err(FactorForgeError::DomainFrozen { .. })
    ));
    assert_eq!(tagger.graph.domains().len(), 2);
    assert_eq!(tagger.tags.capacity_limit(), Some(8));
    assert!(tagger.graph.domain("word").is_some());
    assert_eq!(tagger.graph.weights().len(), 2);
    assert_eq!(tagger.graph.weights().parameter_count(), 28);
    assert_eq!(tagger.graph.parallel_threshold(), 2);
}

#[test]
fn test_domains_grow_without_freeze() {
    let config = FactorGraphConfig::from_toml_str(CONFIG)
        .unwrap()
        .with_freeze_on_build(false);
    let tagger = tagger(&config);
    assert!(!tagger.tags.is_frozen());
    assert_eq!(tagger.tags.intern("ADJ").unwrap(), 4);
}

#[test]
fn test_category_limit_applies() {
    let config = FactorGraphConfig::new().with_max_categories(2);
    let mut builder = GraphBuilder::from_config(&config).unwrap();
    let result = builder.categorical_domain_from("letters", ["a", "b", "c"]);
    assert!(matches!(
        result,
        Err(BuildError::Graph(FactorForgeError::DomainCapacity {
            capacity: 2,
            ..
        }))
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let config = FactorGraphConfig::new().with_convergence_threshold(-1.0);
    assert!(matches!(
        GraphBuilder::from_config(&config),
        Err(BuildError::Config(_))
    ));
}

#[test]
fn test_non_finite_initial_value_replaced() {
    let config = FactorGraphConfig::new().with_initial_value(f64::NAN);
    let mut builder = GraphBuilder::from_config(&config).unwrap();
    assert_eq!(builder.config().weights.initial_value, 0.0);
    let weights = builder.new_weights("bias", &[3]);
    assert_eq!(weights.value().sum(), 0.0);
}

#[test]
fn test_explicit_factors_join_templates() {
    let mut builder = GraphBuilder::new();
    let states = builder.discrete_domain("state", 2);
    let a = Variable::new(states.clone(), Value::Discrete(1)).unwrap();
    let prior = Family::from_fn("prior", |v: &[Value; 1]| v[0].index().unwrap_or(0) as f64);

    assert!(builder.add_factor(prior.factor([a.clone()])));
    assert!(!builder.add_factor(prior.factor([a.clone()])));
    builder.add_template(FamilyTemplate::new(
        Family::from_fn("bias", |_: &[Value; 1]| 0.5),
        factorforge::DomainUnroller::new(&states),
    ));

    let graph = builder.finish();
    assert_eq!(graph.factors(&[a.clone()]).len(), 2);
    assert_close(graph.current_score(&[a]).unwrap(), 1.5);
}

// ============================================================================
// Scoring
// ============================================================================

#[test]
fn test_neighborhoods_of_tagging_graph() {
    let config = FactorGraphConfig::from_toml_str(CONFIG).unwrap();
    let tagger = tagger(&config);
    let sentence = &tagger.sentence;

    // Emission plus both transitions.
    assert_eq!(tagger.graph.factors(&[sentence.tags[1].clone()]).len(), 3);
    assert_eq!(tagger.graph.factors(&[sentence.words[0].clone()]).len(), 1);
    assert_eq!(tagger.graph.factors(&tagger.variables()).len(), 5);

    let contained = tagger.graph.factors_with(
        &[sentence.tags[0].clone(), sentence.words[0].clone()],
        NeighborhoodMode::Contained,
    );
    assert_eq!(contained.len(), 1);
    assert_eq!(contained[0].family_name(), "emission");
}

#[test]
fn test_contained_neighborhood_from_config() {
    let config = FactorGraphConfig::from_toml_str(CONFIG)
        .unwrap()
        .with_neighborhood(NeighborhoodConfig::Contained);
    let tagger = tagger(&config);
    assert_eq!(tagger.graph.default_mode(), NeighborhoodMode::Contained);
    assert!(tagger
        .graph
        .factors(&[tagger.sentence.tags[1].clone()])
        .is_empty());
}

#[test]
fn test_diff_score_of_relabeling() {
    let config = FactorGraphConfig::from_toml_str(CONFIG).unwrap();
    let tagger = tagger(&config);
    let emission = tagger
        .graph
        .weights()
        .iter()
        .find(|w| w.name() == "emission")
        .unwrap()
        .clone();
    // Reward (DET, the), (NOUN, dog) and (VERB, runs).
    emission.write(|t| {
        t.set(3, 1.0).unwrap();
        t.set(2 * 3 + 1, 1.0).unwrap();
        t.set(3 * 3 + 2, 1.0).unwrap();
    });

    let vars = tagger.variables();
    assert_close(tagger.graph.current_score(&vars).unwrap(), 0.0);

    let mut diff = DiffList::new();
    for tag in &tagger.sentence.tags {
        tag.set_to_target(Some(&mut diff)).unwrap();
    }
    assert_close(tagger.graph.diff_score(&diff).unwrap(), 3.0);
    assert!(tagger.sentence.tags.iter().all(Variable::is_at_target));
    assert_close(tagger.graph.par_current_score(&vars).unwrap(), 3.0);

    diff.undo_all();
    assert!(!tagger.sentence.tags.iter().any(Variable::is_at_target));
}

// ============================================================================
// Learning
// ============================================================================

#[test]
fn test_perceptron_step_prefers_gold_tags() {
    let config = FactorGraphConfig::from_toml_str(CONFIG).unwrap();
    let mut tagger = tagger(&config);

    let step = gradient(&tagger);
    // Emissions: three removed, three added. Transitions: (O, O) twice
    // removed, (DET, NOUN) and (NOUN, VERB) added.
    assert_close(step.one_norm(), 10.0);

    let before = tagger.graph.weights().snapshot();
    tagger.graph.weights_mut().add_scaled(&step, 1.0).unwrap();
    assert!(!tagger.graph.converged(&before));

    let vars = tagger.variables();
    assert_close(tagger.graph.current_score(&vars).unwrap(), -7.0);

    let mut diff = DiffList::new();
    for tag in &tagger.sentence.tags {
        tag.set_to_target(Some(&mut diff)).unwrap();
    }
    assert_close(tagger.graph.diff_score(&diff).unwrap(), 12.0);

    // At the gold labeling the gradient vanishes.
    let settled = tagger.graph.weights().snapshot();
    let step = gradient(&tagger);
    assert_close(step.one_norm(), 0.0);
    tagger.graph.weights_mut().add_scaled(&step, 1.0).unwrap();
    assert!(tagger.graph.converged(&settled));
}

// ============================================================================
// Console
// ============================================================================

#[test]
fn test_console_init_is_idempotent() {
    console::init();
    console::init();
    let graph = GraphBuilder::new().finish();
    assert!(graph.factors(&[]).is_empty());
}
