use super::*;
use crate::store::model::Project;
use crate::store::project_store::MemoryStore;

fn ready() -> SharedStore {
    Rc::new(RefCell::new(MemoryStore::new(Project::default())))
}

fn pending() -> SharedStore {
    Rc::new(RefCell::new(MemoryStore::uninitialized()))
}

#[test]
fn empty_locator_is_unavailable() {
    assert!(matches!(
        StoreLocator::new().locate(),
        Err(SegueError::Unavailable)
    ));
}

#[test]
fn handle_slot_wins_over_registry() {
    let slot = StoreSlot::new();
    let registry = StoreRegistry::new();
    let from_slot = ready();
    let from_registry = ready();
    slot.set(from_slot.clone());
    registry.register("videoEditor", from_registry);

    let locator = StoreLocator::standard(
        slot.clone(),
        registry,
        None,
        &DiscoveryConfig::default(),
    );
    let found = locator.locate().unwrap();
    assert!(Rc::ptr_eq(&found, &from_slot));

    slot.clear();
    let found = locator.locate().unwrap();
    assert!(!Rc::ptr_eq(&found, &from_slot));
}

#[test]
fn registry_matches_names_case_insensitively_and_skips_invalid() {
    let registry = StoreRegistry::new();
    registry.register("ProjectStoreDraft", pending());
    let valid = ready();
    registry.register("MainEDITOR", valid.clone());
    registry.register("audioMixer", ready());

    let locator = StoreLocator::new().with(Discovery::Registry {
        registry: registry.clone(),
        patterns: vec!["editor".into(), "project".into()],
    });
    assert!(Rc::ptr_eq(&locator.locate().unwrap(), &valid));

    registry.unregister("MainEDITOR");
    assert!(locator.locate().is_err());
}

#[test]
fn accessor_and_conventional_names_are_consulted_in_order() {
    let registry = StoreRegistry::new();
    let conventional = ready();
    registry.register("timeline", conventional.clone());

    let from_accessor = ready();
    let handed_out = from_accessor.clone();
    let accessor: StoreAccessor = Rc::new(move || Some(handed_out.clone()));

    let cfg = DiscoveryConfig {
        registry_patterns: vec!["editor".into()],
        conventional_names: vec!["timeline".into()],
    };
    let with_accessor =
        StoreLocator::standard(StoreSlot::new(), registry.clone(), Some(accessor), &cfg);
    assert!(Rc::ptr_eq(&with_accessor.locate().unwrap(), &from_accessor));

    let without = StoreLocator::standard(StoreSlot::new(), registry, None, &cfg);
    assert!(Rc::ptr_eq(&without.locate().unwrap(), &conventional));
}

#[test]
fn store_appearing_later_is_found() {
    let slot = StoreSlot::new();
    let locator = StoreLocator::new().with(Discovery::Handle(slot.clone()));
    assert!(locator.locate().is_err());
    let store = pending();
    slot.set(store.clone());
    assert!(locator.locate().is_err());
    slot.set(ready());
    assert!(locator.locate().is_ok());
}
