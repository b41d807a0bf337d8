use eco_core::{ClockConfig, FieldConfig, Gender, Location, SimulationConfig, Species};
use eco_world::{BerryState, HeadlessView, Lifecycle, RabbitState, Simulator, SimulatorView};

fn daylight_config(depth: i32, width: i32, seed: u64) -> SimulationConfig {
    SimulationConfig {
        seed,
        field: FieldConfig { depth, width },
        clock: ClockConfig {
            start_hour: 8,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn assert_occupancy_consistent<V: SimulatorView>(sim: &Simulator<V>) {
    let world = sim.world();

    for (location, id) in world.field.occupants() {
        let entity = world.entities.get(id).expect("occupant is stored");
        assert!(entity.is_alive(), "dead entity {} still holds {}", id, location);
        assert_eq!(entity.location(), Some(location));
    }

    for id in sim.animals().iter().chain(sim.plants()) {
        let entity = sim.entity(*id).expect("population member is stored");
        assert!(entity.is_alive());
        let location = entity.location().expect("live entity has a location");
        assert_eq!(world.field.get(location), Some(*id));
    }

    let population = sim.animals().len() + sim.plants().len();
    assert_eq!(world.field.occupied_count(), population);
    assert_eq!(world.entities.len(), population);
}

#[test]
fn test_occupancy_invariant_holds_every_step() {
    let mut sim = Simulator::new(daylight_config(40, 40, 2024)).unwrap();
    assert_occupancy_consistent(&sim);

    for _ in 0..600 {
        sim.simulate_one_step().unwrap();
        assert_occupancy_consistent(&sim);
    }
}

#[test]
fn test_same_seed_same_history() {
    let run = |seed: u64| {
        let view = HeadlessView::default().with_history(500);
        let mut sim = Simulator::with_view(daylight_config(40, 40, seed), view).unwrap();
        for _ in 0..400 {
            sim.simulate_one_step().unwrap();
        }
        sim.view()
            .history()
            .iter()
            .map(|report| (report.counts.animals(), report.counts.plants(), report.weather))
            .collect::<Vec<_>>()
    };

    let first = run(77);
    assert_eq!(first.len(), 401);
    assert_eq!(first, run(77));
}

#[test]
fn test_lone_rabbit_starves() {
    let mut sim = Simulator::empty(daylight_config(5, 5, 1)).unwrap();
    let food_value = sim.config().herbivore.food_value;
    let id = sim
        .place_rabbit(Location::new(2, 2), Gender::Male, RabbitState::newborn(food_value))
        .unwrap();

    let mut previous = Location::new(2, 2);
    for _ in 1..food_value {
        sim.simulate_one_step().unwrap();
        let rabbit = sim.entity(id).expect("still alive");
        let here = rabbit.location().unwrap();
        assert_ne!(here, previous);
        assert_eq!(here.chebyshev_distance(&previous), 1);
        previous = here;
    }
    assert_eq!(
        sim.entity(id).unwrap().as_rabbit().unwrap().food_level(),
        1
    );

    sim.simulate_one_step().unwrap();
    assert!(sim.entity(id).is_none());
    assert!(sim.animals().is_empty());
    assert_eq!(sim.world().field.occupied_count(), 0);
}

#[test]
fn test_rabbits_rest_at_night() {
    let mut config = daylight_config(5, 5, 1);
    config.clock.start_hour = 0;
    let mut sim = Simulator::empty(config).unwrap();
    let here = Location::new(2, 2);
    let id = sim
        .place_rabbit(here, Gender::Female, RabbitState::newborn(9))
        .unwrap();

    for _ in 0..100 {
        sim.simulate_one_step().unwrap();
    }
    let rabbit = sim.entity(id).unwrap();
    assert_eq!(rabbit.location(), Some(here));
    assert_eq!(rabbit.as_rabbit().unwrap().age(), 0);
    assert_eq!(rabbit.as_rabbit().unwrap().food_level(), 9);
}

#[test]
fn test_surrounded_rabbit_dies_of_overcrowding() {
    let mut sim = Simulator::empty(daylight_config(3, 3, 5)).unwrap();
    let centre = Location::new(1, 1);
    let boxed_in = sim
        .place_rabbit(centre, Gender::Male, RabbitState::newborn(9))
        .unwrap();
    for row in 0..3 {
        for col in 0..3 {
            let location = Location::new(row, col);
            if location != centre {
                sim.place_rabbit(location, Gender::Male, RabbitState::newborn(9))
                    .unwrap();
            }
        }
    }

    sim.simulate_one_step().unwrap();
    assert!(sim.entity(boxed_in).is_none());
    assert!(!sim.animals().contains(&boxed_in));
    assert_occupancy_consistent(&sim);
}

#[test]
fn test_adjacent_pair_breeds() {
    let mut config = daylight_config(10, 10, 8);
    config.herbivore.breeding_probability = 1.0;
    let mut sim = Simulator::empty(config).unwrap();

    let adult = RabbitState {
        age: 10,
        food_level: 9,
        toxin_level: 0,
    };
    let mother = sim.place_rabbit(Location::new(4, 4), Gender::Female, adult).unwrap();
    let father = sim.place_rabbit(Location::new(4, 5), Gender::Male, adult).unwrap();

    sim.simulate_one_step().unwrap();

    let young: Vec<_> = sim
        .animals()
        .iter()
        .copied()
        .filter(|id| *id != mother && *id != father)
        .collect();
    assert!(!young.is_empty());

    for id in young {
        let entity = sim.entity(id).unwrap();
        let rabbit = entity.as_rabbit().unwrap();
        assert_eq!(rabbit.age(), 0);
        assert_eq!(rabbit.food_level(), 9);
        // Born next to a parent that had not moved yet
        let location = entity.location().unwrap();
        assert!(location.chebyshev_distance(&Location::new(4, 4)) <= 2);
        assert_eq!(sim.world().field.get(location), Some(id));
    }
    assert_occupancy_consistent(&sim);
}

#[test]
fn test_toxin_kills_on_the_crossing_meal() {
    let mut config = daylight_config(5, 5, 13);
    config.berry.seeding_probability = 0.0;
    let mut sim = Simulator::empty(config).unwrap();

    let id = sim
        .place_rabbit(Location::new(0, 0), Gender::Female, RabbitState::newborn(9))
        .unwrap();
    for location in [Location::new(0, 1), Location::new(1, 0), Location::new(1, 1)] {
        sim.place_berry(location, BerryState { age: 0, toxin_level: 25 })
            .unwrap();
    }

    sim.simulate_one_step().unwrap();
    assert_eq!(sim.entity(id).unwrap().toxin_level(), 25);
    assert_eq!(sim.report().counts.get(Species::Berry), 2);

    sim.simulate_one_step().unwrap();
    assert_eq!(sim.entity(id).unwrap().toxin_level(), 50);
    assert_eq!(sim.report().counts.get(Species::Berry), 1);

    sim.simulate_one_step().unwrap();
    assert!(sim.entity(id).is_none());
    assert_eq!(sim.report().counts.total(), 0);
    assert_eq!(sim.world().field.occupied_count(), 0);
}

#[test]
fn test_hour_follows_step_count_in_a_run() {
    let mut sim = Simulator::new(SimulationConfig {
        seed: 3,
        field: FieldConfig { depth: 20, width: 20 },
        ..Default::default()
    })
    .unwrap();

    for _ in 0..700 {
        let report = sim.simulate_one_step().unwrap();
        assert_eq!(report.hour as u64, (report.step / 25) % 24);
    }
}
