use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};

#[test]
fn test_profiles() {
    assert_eq!(RecursionProfile::TypeRelation.max_depth(), 100);
    assert_eq!(
        RecursionProfile::AliasExpansion.max_depth(),
        tsbc_common::limits::MAX_ALIAS_EXPANSION_DEPTH
    );
    let custom = RecursionProfile::Custom {
        max_depth: 3,
        max_iterations: 7,
    };
    assert_eq!((custom.max_depth(), custom.max_iterations()), (3, 7));
}

#[test]
fn test_pair_keys_detect_cycles_per_direction() {
    let mut guard: RecursionGuard<(u32, u32)> = RecursionGuard::with_profile(RecursionProfile::TypeRelation);
    assert_eq!(guard.enter((1, 2)), RecursionResult::Entered);
    assert_eq!(guard.enter((2, 1)), RecursionResult::Entered);
    assert!(guard.enter((1, 2)).is_cycle());
    assert!(!guard.is_exceeded());
    guard.leave((2, 1));
    guard.leave((1, 2));
    assert_eq!(guard.depth(), 0);
    assert_eq!(guard.iterations(), 3);
}

#[test]
fn test_depth_limit_is_sticky() {
    let mut guard = RecursionGuard::new(2, 100);
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    assert_eq!(guard.enter(3), RecursionResult::DepthExceeded);
    guard.leave(2);
    guard.leave(1);
    assert!(guard.is_exceeded());
}

#[test]
fn test_iteration_budget() {
    let mut guard = RecursionGuard::new(10, 2);
    assert_eq!(guard.scope(1, || 10), Ok(10));
    assert_eq!(guard.scope(1, || 20), Ok(20));
    assert_eq!(guard.scope(1, || 30), Err(RecursionResult::IterationExceeded));
}

#[test]
fn test_scope_reports_cycle() {
    let mut outer = RecursionGuard::new(10, 100);
    assert!(outer.enter(5).is_entered());
    assert_eq!(outer.scope(5, || ()), Err(RecursionResult::Cycle));
    assert!(outer.is_visiting(&5));
    outer.leave(5);
}
