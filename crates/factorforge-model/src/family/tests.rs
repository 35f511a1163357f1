//! Tests for families, potentials and statistics.

use std::sync::Arc;

use factorforge_core::{
    DiscreteDomain, DomainRef, FactorForgeError, RealDomain, Tensor, Value, Weights,
};
use factorforge_test::{assert_close, identity_transitions, StateChain};

use super::*;
use crate::factor::Factor;

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_discrete_statistics_one_hot() {
    let stats = DiscreteStatistics::new([2, 3]);
    let t = stats
        .statistics(&[Value::Discrete(1), Value::Discrete(2)])
        .unwrap();
    assert_eq!(t.shape(), &[2, 3]);
    assert_eq!(t.get_at(&[1, 2]).unwrap(), 1.0);
    assert_eq!(t.sum(), 1.0);
    assert_eq!(
        stats.joint_index(&[Value::Discrete(1), Value::Discrete(0)]).unwrap(),
        3
    );
}

#[test]
fn test_discrete_statistics_rejects_bad_values() {
    let stats = DiscreteStatistics::new([2]);
    assert!(matches!(
        stats.statistics(&[Value::Discrete(2)]),
        Err(FactorForgeError::IndexOutOfDomain { .. })
    ));
    assert!(matches!(
        stats.statistics(&[Value::Real(0.5)]),
        Err(FactorForgeError::ValueNotInDomain { .. })
    ));
}

#[test]
fn test_discrete_statistics_from_domains() {
    let a: DomainRef = Arc::new(DiscreteDomain::new("a", 2));
    let b: DomainRef = Arc::new(DiscreteDomain::new("b", 4));
    let stats = DiscreteStatistics::from_domains(&[a.clone(), b]).unwrap();
    assert_eq!(Statistics::<2>::shape(&stats), &[2, 4]);

    let real: DomainRef = Arc::new(RealDomain::new("r"));
    assert!(matches!(
        DiscreteStatistics::from_domains(&[a, real]),
        Err(FactorForgeError::NotEnumerable { .. })
    ));
}

#[test]
fn test_fn_statistics_checks_shape() {
    let good = FnStatistics::new(&[1], |v: &[Value; 1]| {
        Tensor::vector(vec![v[0].as_real().unwrap_or(0.0)])
    });
    let t = Statistics::<1>::statistics(&good, &[Value::Real(2.5)]).unwrap();
    assert_eq!(t.sum(), 2.5);

    let bad = FnStatistics::new(&[2], |_: &[Value; 1]| Tensor::zeros(&[3]));
    assert!(matches!(
        Statistics::<1>::statistics(&bad, &[Value::Real(0.0)]),
        Err(FactorForgeError::ShapeMismatch { .. })
    ));
}

// ============================================================================
// Potentials
// ============================================================================

#[test]
fn test_dot_potential_checks_shape_at_construction() {
    let weights = Weights::new("w", Tensor::zeros(&[3, 3]));
    let result = DotPotential::new(DiscreteStatistics::new([2, 2]), weights);
    assert!(matches!(result, Err(FactorForgeError::ShapeMismatch { .. })));
}

#[test]
fn test_statistics_potential_composes() {
    // Score is the log of the selected transition weight.
    let table = identity_transitions(2);
    let potential = StatisticsPotential::new(DiscreteStatistics::new([2, 2]), move |s: &Tensor| {
        table.dot(s).map_or(f64::NEG_INFINITY, f64::ln)
    });

    let values = [Value::Discrete(0), Value::Discrete(0)];
    let stats = Potential::<2>::statistics(&potential, &values)
        .unwrap()
        .unwrap();
    assert_close(
        Potential::<2>::score(&potential, &values).unwrap(),
        potential.statistics_score(&stats),
    );
    assert_close(potential.statistics_score(&stats), 0.0);
}

#[test]
fn test_fn_potential_has_no_statistics() {
    let potential = FnPotential::new(|_: &[Value; 1]| 3.0);
    let values = [Value::Boolean(true)];
    assert_eq!(Potential::<1>::score(&potential, &values).unwrap(), 3.0);
    assert!(Potential::<1>::statistics(&potential, &values)
        .unwrap()
        .is_none());
}

// ============================================================================
// Families
// ============================================================================

#[test]
fn test_family_clones_share_identity() {
    let family = Family::from_fn("f", |_: &[Value; 1]| 0.0);
    let clone = family.clone();
    assert_eq!(family.id(), clone.id());
    assert_eq!(clone.name(), "f");
    assert_eq!(clone.arity(), 1);
    assert_ne!(family.id(), Family::from_fn("f", |_: &[Value; 1]| 0.0).id());
}

#[test]
fn test_tied_parameters_across_factors() {
    let chain = StateChain::with_states(2, &[1, 1, 1, 1]);
    let weights = Weights::new("transition", identity_transitions(2));
    let family =
        Family::dot("transition", DiscreteStatistics::new([2, 2]), weights.clone()).unwrap();

    let f1 = family.factor([chain.at(0).clone(), chain.at(1).clone()]);
    let f2 = family.factor([chain.at(2).clone(), chain.at(3).clone()]);
    assert_eq!(f1.current_statistics().unwrap(), f2.current_statistics().unwrap());
    assert_eq!(f1.current_score().unwrap(), f2.current_score().unwrap());

    // Updating the shared weights is seen by every factor of the family.
    weights.write(|t| t.set(3, 5.0)).unwrap();
    assert_close(f1.current_score().unwrap(), 5.0);
    assert_close(f2.current_score().unwrap(), 5.0);
    assert_eq!(family.weights(), Some(&weights));
}

#[test]
fn test_with_statistics_family() {
    let chain = StateChain::with_states(3, &[2]);
    let family = Family::with_statistics("bias", DiscreteStatistics::new([3]), |s: &Tensor| {
        2.0 * s.get(2).unwrap_or(0.0)
    });
    let factor = family.factor([chain.at(0).clone()]);
    assert_close(factor.current_score().unwrap(), 2.0);
    assert!(family.weights().is_none());
}
