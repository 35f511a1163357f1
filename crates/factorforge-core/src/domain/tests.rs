//! Tests for domains.

use std::sync::Arc;
use std::thread;

use super::*;

// ============================================================================
// CategoricalDomain Tests
// ============================================================================

mod categorical {
    use super::*;

    #[test]
    fn test_intern_allocates_next_index() {
        let domain = CategoricalDomain::new("words");
        assert_eq!(domain.size(), Some(0));

        let index = domain.intern("the").unwrap();
        assert_eq!(index, 0);
        assert_eq!(domain.size(), Some(1));

        let value = domain.value(index).unwrap();
        assert_eq!(value.category(), Some("the"));
        assert_eq!(domain.index_of(&value).unwrap(), index);
    }

    #[test]
    fn test_intern_is_idempotent() {
        let domain = CategoricalDomain::new("words");
        let first = domain.intern("cat").unwrap();
        let size = domain.size();

        let second = domain.intern("cat").unwrap();
        assert_eq!(first, second);
        assert_eq!(domain.size(), size);
    }

    #[test]
    fn test_frozen_rejects_unknown_category() {
        let domain = CategoricalDomain::from_categories("tags", ["A", "B"]).unwrap();
        domain.freeze();
        assert!(domain.is_frozen());

        assert_eq!(domain.intern("B").unwrap(), 1);
        let err = domain.intern("C").unwrap_err();
        assert_eq!(
            err,
            FactorForgeError::DomainFrozen {
                domain: "tags".to_string(),
                category: "C".to_string(),
            }
        );
        assert_eq!(domain.size(), Some(2));
    }

    #[test]
    fn test_unfreeze_allows_growth() {
        let domain = CategoricalDomain::new("tags");
        domain.freeze();
        assert!(domain.intern("X").is_err());

        domain.unfreeze();
        assert_eq!(domain.intern("X").unwrap(), 0);
    }

    #[test]
    fn test_capacity_limit() {
        let domain = CategoricalDomain::with_capacity_limit("small", 2);
        domain.intern("a").unwrap();
        domain.intern("b").unwrap();

        assert!(matches!(
            domain.intern("c"),
            Err(FactorForgeError::DomainCapacity { capacity: 2, .. })
        ));
        assert_eq!(domain.intern("a").unwrap(), 0);
    }

    #[test]
    fn test_index_does_not_grow() {
        let domain = CategoricalDomain::new("words");
        assert_eq!(domain.index("missing"), None);
        assert_eq!(domain.size(), Some(0));
    }

    #[test]
    fn test_contains_requires_matching_index() {
        let domain = CategoricalDomain::from_categories("tags", ["A", "B"]).unwrap();
        assert!(domain.contains(&Value::categorical(1, "B")));
        assert!(!domain.contains(&Value::categorical(0, "B")));
        assert!(!domain.contains(&Value::Discrete(0)));
        assert!(domain.index_of(&Value::categorical(0, "B")).is_err());
    }

    #[test]
    fn test_categories_snapshot() {
        let domain = CategoricalDomain::from_categories("tags", ["x", "y", "z"]).unwrap();
        let pairs: Vec<(usize, String)> = domain
            .categories()
            .into_iter()
            .map(|(i, c)| (i, c.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (0, "x".to_string()),
                (1, "y".to_string()),
                (2, "z".to_string())
            ]
        );
    }

    #[test]
    fn test_concurrent_interning_allocates_unique_indices() {
        let domain = Arc::new(CategoricalDomain::new("shared"));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let domain = Arc::clone(&domain);
                thread::spawn(move || {
                    for i in 0..50 {
                        domain.intern(&format!("c{}", (i + t * 10) % 60)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let size = domain.size().unwrap();
        assert_eq!(size, 60);
        for i in 0..size {
            let value = domain.value(i).unwrap();
            assert_eq!(domain.index_of(&value).unwrap(), i);
        }
    }
}

// ============================================================================
// Fixed and unbounded domain tests
// ============================================================================

mod fixed {
    use super::*;

    #[test]
    fn test_discrete_roundtrip_and_bounds() {
        let domain = DiscreteDomain::new("state", 2);
        assert_eq!(domain.values().unwrap(), vec![Value::Discrete(0), Value::Discrete(1)]);
        assert!(matches!(
            domain.value(2),
            Err(FactorForgeError::IndexOutOfDomain { index: 2, size: 2, .. })
        ));
        assert!(!domain.contains(&Value::Discrete(5)));
    }

    #[test]
    fn test_boolean_domain() {
        let domain = BooleanDomain::new("flag");
        assert_eq!(domain.size(), Some(2));
        assert_eq!(domain.value(1).unwrap(), Value::Boolean(true));
        assert_eq!(domain.index_of(&Value::Boolean(false)).unwrap(), 0);
    }

    #[test]
    fn test_integer_range_domain() {
        let domain = IntegerRangeDomain::new("age", -2, 3);
        assert_eq!(domain.size(), Some(5));
        assert_eq!(domain.value(0).unwrap(), Value::Integer(-2));
        assert_eq!(domain.index_of(&Value::Integer(2)).unwrap(), 4);
        assert!(domain.index_of(&Value::Integer(3)).is_err());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_integer_range_domain_extreme_bounds() {
        let low = IntegerRangeDomain::new("low", i64::MIN, 0);
        assert_eq!(low.size(), Some(1 << 63));
        assert_eq!(low.value(0).unwrap(), Value::Integer(i64::MIN));
        assert_eq!(low.index_of(&Value::Integer(-1)).unwrap(), (1 << 63) - 1);
        assert_eq!(low.value((1 << 63) - 1).unwrap(), Value::Integer(-1));

        let full = IntegerRangeDomain::new("full", i64::MIN, i64::MAX);
        assert_eq!(full.size(), Some(usize::MAX));
        assert_eq!(full.index_of(&Value::Integer(i64::MAX - 1)).unwrap(), usize::MAX - 1);
        assert_eq!(full.value(usize::MAX - 1).unwrap(), Value::Integer(i64::MAX - 1));
        assert!(full.value(usize::MAX).is_err());
    }

    #[test]
    fn test_unbounded_domains_are_not_enumerable() {
        let real = RealDomain::new("x");
        assert_eq!(real.size(), None);
        assert!(!real.is_enumerable());
        assert!(real.contains(&Value::Real(1.0)));
        assert!(matches!(real.values(), Err(FactorForgeError::NotEnumerable { .. })));

        let text = TextDomain::new("t");
        assert!(text.contains(&Value::text("hello")));
        assert!(text.value(0).is_err());
    }

    #[test]
    fn test_domain_ids_are_distinct() {
        let a = DiscreteDomain::new("a", 1);
        let b = DiscreteDomain::new("a", 1);
        assert_ne!(a.id(), b.id());
    }
}
