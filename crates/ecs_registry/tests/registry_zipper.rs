//! End-to-end checks: registry-owned columns walked with zippers.

use ecs_registry::{Registry, RegistryError, TickConfig, TickLoop};
use ecs_storage::{IndexedZipper, Zipper, indexed_zip, zip};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Health(u32);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Armor(u32);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Poisoned;

fn spawn_many(registry: &mut Registry, count: usize) {
    for _ in 0..count {
        registry.spawn_entity();
    }
}

#[test]
fn test_even_and_odd_columns_never_meet() {
    let mut registry = Registry::new();
    registry.register_component::<Health>().unwrap();
    registry.register_component::<Armor>().unwrap();
    spawn_many(&mut registry, 20);

    for index in 0..20 {
        let e = ecs_storage::Entity::from_index(index);
        if index % 2 == 0 {
            registry.add_component(e, Health(index as u32)).unwrap();
        } else {
            registry.add_component(e, Armor(index as u32)).unwrap();
        }
    }

    let health = registry.get_component::<Health>().unwrap();
    let armor = registry.get_component::<Armor>().unwrap();
    assert_eq!(zip((&*health, &*armor)).count(), 0);
    assert!(Zipper::new((&*health, &*armor)).is_end());
    assert!(Zipper::new((&*health, &*armor)) == Zipper::end((&*health, &*armor)));
}

#[test]
fn test_odd_columns_match_ten_times() {
    let mut registry = Registry::new();
    registry.register_component::<Health>().unwrap();
    registry.register_component::<Armor>().unwrap();
    spawn_many(&mut registry, 20);

    for index in (1..20).step_by(2) {
        let e = ecs_storage::Entity::from_index(index);
        registry.add_component(e, Health(index as u32)).unwrap();
        registry.add_component(e, Armor(100 + index as u32)).unwrap();
    }

    let health = registry.get_component::<Health>().unwrap();
    let armor = registry.get_component::<Armor>().unwrap();
    let hits: Vec<_> = indexed_zip((&*health, &*armor))
        .map(|(index, (h, a))| (index, h.0, a.0))
        .collect();

    assert_eq!(hits.len(), 10);
    for (index, h, a) in hits {
        assert_eq!(index % 2, 1);
        assert_eq!(h, index as u32);
        assert_eq!(a, 100 + index as u32);
    }
}

#[test]
fn test_killed_entities_drop_out_of_iteration() {
    let mut registry = Registry::new();
    registry.register_component::<Health>().unwrap();
    registry.register_component::<Armor>().unwrap();

    let entities: Vec<_> = (0..5).map(|_| registry.spawn_entity()).collect();
    for &e in &entities {
        registry.add_component(e, Health(10)).unwrap();
        registry.add_component(e, Armor(1)).unwrap();
    }
    registry.kill_entity(entities[1]);
    registry.kill_entity(entities[3]);

    let indices: Vec<usize> = {
        let health = registry.get_component::<Health>().unwrap();
        let armor = registry.get_component::<Armor>().unwrap();
        IndexedZipper::new((&*health, &*armor))
            .map(|(index, _)| index)
            .collect()
    };
    assert_eq!(indices, vec![0, 2, 4]);

    // The most recently killed index comes back first, with no components.
    let reused = registry.spawn_entity();
    assert_eq!(reused, entities[3]);
    assert!(!registry.has_component::<Health>(reused).unwrap());
}

#[test]
fn test_iteration_bounded_by_shortest_column() {
    let mut registry = Registry::new();
    registry.register_component::<Health>().unwrap();
    registry.register_component::<Armor>().unwrap();
    let a = registry.spawn_entity();
    let b = registry.entity_from_index(8).unwrap();

    registry.add_component(a, Health(1)).unwrap();
    registry.add_component(a, Armor(1)).unwrap();
    registry.add_component(b, Health(2)).unwrap();

    let health = registry.get_component::<Health>().unwrap();
    let armor = registry.get_component::<Armor>().unwrap();
    let zipper = zip((&*health, &*armor));
    assert_eq!(zipper.size_hint(), (0, Some(1)));
    assert_eq!(zipper.count(), 1);
}

#[test]
fn test_damage_system_over_tick_loop() {
    let mut registry = Registry::new();
    registry.register_component::<Health>().unwrap();
    registry.register_component::<Poisoned>().unwrap();

    let sick = registry.spawn_entity();
    let well = registry.spawn_entity();
    registry.add_component(sick, Health(10)).unwrap();
    registry.add_component(sick, Poisoned).unwrap();
    registry.add_component(well, Health(10)).unwrap();

    registry.add_named_system::<(Health, Poisoned), _>("poison", |_, _, columns| {
        let (mut health, poisoned) = columns.into_inner();
        for (h, _) in zip((&mut *health, &*poisoned)) {
            h.0 = h.0.saturating_sub(3);
        }
    });

    let config = TickConfig::from_json(r#"{ "tick_rate": 1000.0, "max_ticks": 4 }"#).unwrap();
    let mut tick_loop = TickLoop::with_registry(config, registry).unwrap();
    tick_loop
        .run_with(|registry, _| {
            let dead: Vec<_> = {
                let health = registry.get_component::<Health>()?;
                health
                    .iter_occupied()
                    .filter(|(_, h)| h.0 == 0)
                    .map(|(index, _)| ecs_storage::Entity::from_index(index))
                    .collect()
            };
            for e in dead {
                registry.kill_entity(e);
            }
            Ok(())
        })
        .unwrap();

    let registry = tick_loop.into_registry();
    assert!(!registry.is_alive(sick));
    assert!(registry.is_alive(well));
    assert_eq!(
        registry.get_component::<Health>().unwrap().get(well.index()),
        Some(&Health(10))
    );
    assert!(!registry.has_component::<Poisoned>(sick).unwrap());
}

#[test]
fn test_error_messages_name_registered_types() {
    let mut registry = Registry::new();
    registry.register_component::<Health>().unwrap();
    registry.register_component::<Armor>().unwrap();

    let err = registry.get_component::<Poisoned>().unwrap_err();
    let message = err.to_string();
    let mut lines = message.lines();
    assert!(lines.next().unwrap().ends_with("Poisoned not registered. Registered components:"));
    assert!(lines.next().unwrap().ends_with("::Health"));
    assert!(lines.next().unwrap().ends_with("::Armor"));
    assert_eq!(lines.next(), None);

    assert!(matches!(
        registry.register_component::<Armor>(),
        Err(RegistryError::AlreadyRegistered { .. })
    ));
}
