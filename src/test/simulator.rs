use crate::sim::{Event, SimTime, Simulator, World};
use std::any::Any;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct DummyWorld {
    ticks: usize,
}

impl World for DummyWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Simulator) {
        self.ticks = self.ticks.saturating_add(1);
    }
}

struct Record {
    id: u32,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Event for Record {
    fn execute(self: Box<Self>, _sim: &mut Simulator, _world: &mut dyn World) {
        let Record { id, log } = *self;
        log.lock().expect("log lock").push(id);
    }
}

struct RecordThenRequeue {
    id: u32,
    next_id: u32,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Event for RecordThenRequeue {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        let RecordThenRequeue { id, next_id, log } = *self;
        log.lock().expect("log lock").push(id);
        sim.schedule(sim.now(), Record { id: next_id, log });
    }
}

struct RecordTime {
    log: Arc<Mutex<Vec<SimTime>>>,
}

impl Event for RecordTime {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        let RecordTime { log } = *self;
        log.lock().expect("log lock").push(sim.now());
    }
}

#[test]
fn events_execute_in_time_order_with_fifo_tie_break() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(10),
        Record {
            id: 1,
            log: Arc::clone(&log),
        },
    );
    sim.schedule(
        SimTime(5),
        Record {
            id: 2,
            log: Arc::clone(&log),
        },
    );
    sim.schedule(
        SimTime(10),
        Record {
            id: 3,
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld::default();
    sim.run(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[2, 1, 3]);
    assert_eq!(world.ticks, 3);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn same_instant_event_scheduled_during_execution_runs_after_current() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime::ZERO,
        RecordThenRequeue {
            id: 1,
            next_id: 2,
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld::default();
    sim.run(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[1, 2]);
    assert_eq!(sim.now(), SimTime::ZERO);
}

#[test]
fn schedule_in_is_relative_to_current_time() {
    let log = Arc::new(Mutex::new(Vec::new()));

    struct Chain {
        log: Arc<Mutex<Vec<SimTime>>>,
        remaining: u32,
    }

    impl Event for Chain {
        fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
            let Chain { log, remaining } = *self;
            log.lock().expect("log lock").push(sim.now());
            if remaining > 0 {
                sim.schedule_in(
                    SimTime::from_secs(2),
                    Chain {
                        log,
                        remaining: remaining - 1,
                    },
                );
            }
        }
    }

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime::from_secs(1),
        Chain {
            log: Arc::clone(&log),
            remaining: 2,
        },
    );

    let mut world = DummyWorld::default();
    sim.run(&mut world);

    assert_eq!(
        &*log.lock().expect("log lock"),
        &[
            SimTime::from_secs(1),
            SimTime::from_secs(3),
            SimTime::from_secs(5)
        ]
    );
}

#[test]
fn run_until_stops_before_later_events_and_advances_time() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime::ZERO,
        RecordTime {
            log: Arc::clone(&log),
        },
    );
    sim.schedule(
        SimTime(10),
        RecordTime {
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld::default();
    sim.run_until(SimTime(5), &mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[SimTime::ZERO]);
    assert_eq!(sim.now(), SimTime(5));

    sim.run(&mut world);
    assert_eq!(
        &*log.lock().expect("log lock"),
        &[SimTime::ZERO, SimTime(10)]
    );
}

#[test]
fn run_until_is_inclusive_of_the_horizon() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(5),
        RecordTime {
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld::default();
    sim.run_until(SimTime(5), &mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[SimTime(5)]);
    assert_eq!(sim.now(), SimTime(5));
}

#[test]
fn run_until_advances_time_even_without_events() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld::default();

    sim.run_until(SimTime(7), &mut world);
    assert_eq!(sim.now(), SimTime(7));
    assert_eq!(world.ticks, 0);
}
