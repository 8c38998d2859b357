use uuid::Uuid;

use super::*;

#[test]
fn new_selection_is_empty() {
    let s = Selection::new();
    assert!(s.is_empty());
    assert_eq!(s.primary(), None);
}

#[test]
fn set_single_replaces() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut s = Selection::new();
    s.set_many(&[a, b]);
    s.set_single(b);
    assert_eq!(s.ids(), &[b]);
    assert_eq!(s.primary(), Some(b));
}

#[test]
fn primary_requires_exactly_one() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut s = Selection::new();
    s.set_many(&[a, b]);
    assert_eq!(s.primary(), None);
}

#[test]
fn set_many_drops_duplicates_keeping_order() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut s = Selection::new();
    s.set_many(&[b, a, b]);
    assert_eq!(s.ids(), &[b, a]);
}

#[test]
fn add_and_remove_report_change() {
    let a = Uuid::new_v4();
    let mut s = Selection::new();
    assert!(s.add(a));
    assert!(!s.add(a));
    assert!(s.remove(&a));
    assert!(!s.remove(&a));
}

#[test]
fn toggle_flips_membership() {
    let a = Uuid::new_v4();
    let mut s = Selection::new();
    s.toggle(a);
    assert!(s.contains(&a));
    s.toggle(a);
    assert!(!s.contains(&a));
}

#[test]
fn retain_prunes() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut s = Selection::new();
    s.set_many(&[a, b]);
    s.retain(|id| *id == b);
    assert_eq!(s.ids(), &[b]);
    s.clear();
    assert!(s.is_empty());
}
