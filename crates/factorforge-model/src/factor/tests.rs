//! Tests for factors.

use factorforge_core::{Assignment2, FactorForgeError, MapAssignment, Value, Variable, Weights};
use factorforge_test::{assert_close, identity_transitions, StateChain};

use super::*;
use crate::family::{DiscreteStatistics, Family, FnPotential};

fn agreement() -> Family<2, FnPotential<impl Fn(&[Value; 2]) -> f64 + Send + Sync + 'static>> {
    Family::from_fn("agree", |v: &[Value; 2]| if v[0] == v[1] { 1.0 } else { -1.0 })
}

#[test]
fn test_key_is_family_and_ordered_neighbors() {
    let chain = StateChain::zeros(2, 2);
    let family = agreement();

    let ab = family.factor([chain.at(0).clone(), chain.at(1).clone()]);
    let ab_again = family.factor([chain.at(0).clone(), chain.at(1).clone()]);
    let ba = family.factor([chain.at(1).clone(), chain.at(0).clone()]);

    assert_eq!(ab.key(), ab_again.key());
    assert_ne!(ab.key(), ba.key());
    assert_eq!(ab.key().family(), family.id());
    assert_eq!(ab.key().neighbors(), &[chain.at(0).id(), chain.at(1).id()]);
}

#[test]
fn test_same_neighbors_other_family_is_other_factor() {
    let chain = StateChain::zeros(2, 2);
    let neighbors = [chain.at(0).clone(), chain.at(1).clone()];
    let a = agreement().factor(neighbors.clone());
    let b = agreement().factor(neighbors);
    assert_ne!(a.key(), b.key());
}

#[test]
fn test_current_score_reads_global_values() {
    let chain = StateChain::with_states(2, &[0, 1]);
    let factor = agreement().factor([chain.at(0).clone(), chain.at(1).clone()]);
    assert_close(factor.current_score().unwrap(), -1.0);

    chain.at(1).set_value(Value::Discrete(0), None).unwrap();
    assert_close(factor.current_score().unwrap(), 1.0);
}

#[test]
fn test_score_checks_arity() {
    let chain = StateChain::zeros(2, 2);
    let factor = agreement().factor([chain.at(0).clone(), chain.at(1).clone()]);
    assert_eq!(
        factor.score(&[Value::Discrete(0)]).unwrap_err(),
        FactorForgeError::ArityMismatch {
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn test_assignment_score_follows_assignment_rules() {
    let chain = StateChain::with_states(2, &[0, 0, 1]);
    let factor = agreement().factor([chain.at(1).clone(), chain.at(2).clone()]);

    // Fixed assignment binding only s0 and s1: s2 falls back to its global value.
    let fixed = Assignment2::new([
        (chain.at(0).clone(), Value::Discrete(1)),
        (chain.at(1).clone(), Value::Discrete(1)),
    ])
    .unwrap();
    assert_close(factor.assignment_score(&fixed).unwrap(), 1.0);

    // Map assignment missing s2 fails.
    let mut map = MapAssignment::new();
    map.set(chain.at(1), Value::Discrete(1)).unwrap();
    assert!(matches!(
        factor.assignment_score(&map),
        Err(FactorForgeError::VariableNotBound { .. })
    ));
}

#[test]
fn test_touches_and_arity() {
    let chain = StateChain::zeros(2, 3);
    let factor = agreement().factor([chain.at(0).clone(), chain.at(1).clone()]);
    assert_eq!(factor.num_variables(), 2);
    assert!(factor.touches(chain.at(0)));
    assert!(!factor.touches(chain.at(2)));
    assert_eq!(factor.family_name(), "agree");
}

#[test]
fn test_dot_factor_statistics_compose_with_score() {
    let chain = StateChain::with_states(2, &[1, 1]);
    let weights = Weights::new("transition", identity_transitions(2));
    let family =
        Family::dot("transition", DiscreteStatistics::new([2, 2]), weights.clone()).unwrap();
    let factor: FactorRef = family.factor_ref([chain.at(0).clone(), chain.at(1).clone()]);

    let stats = factor.current_statistics().unwrap().unwrap();
    assert_eq!(stats.get_at(&[1, 1]).unwrap(), 1.0);
    assert_close(factor.current_score().unwrap(), weights.dot(&stats).unwrap());
    assert_eq!(factor.weights(), Some(&weights));
}

#[test]
fn test_fn_factor_has_no_statistics() {
    let chain = StateChain::zeros(2, 2);
    let factor = agreement().factor([chain.at(0).clone(), chain.at(1).clone()]);
    assert!(factor.current_statistics().unwrap().is_none());
    assert!(factor.weights().is_none());
}

#[test]
fn test_unary_factor() {
    let chain = StateChain::zeros(3, 1);
    let x = Variable::new(chain.domain.clone(), Value::Discrete(2)).unwrap();
    let factor = Family::from_fn("unary", |v: &[Value; 1]| v[0].index().unwrap_or(0) as f64)
        .factor([x]);
    assert_close(factor.current_score().unwrap(), 2.0);
}
