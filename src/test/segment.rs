use crate::belt::{BeltWorld, Carrier, Packet, Segment};
use crate::sim::{SimTime, Simulator};

fn pkt(id: &str, now: SimTime) -> Packet {
    Packet::new(id, now).unwrap()
}

#[test]
fn capacity_derives_from_reference_packet_and_gap() {
    // 20 / (0.3 + 0.5) = 25
    let seg = Segment::standalone("MAIN_CONVEYOR", 20.0, 0.5);
    assert_eq!(Carrier::capacity(&seg), 25);

    // 2 / (0.3 + 0.5) = 2.5 向下取整
    let seg = Segment::standalone("SHORT", 2.0, 0.1);
    assert_eq!(Carrier::capacity(&seg), 2);

    let seg = Segment::standalone("MAIN_CONVEYOR", 20.0, 0.5).with_spacing(1.7, 0.3);
    assert_eq!(Carrier::capacity(&seg), 10);
}

#[test]
fn world_position_interpolates_between_endpoints() {
    let seg = Segment::standalone("MAIN_CONVEYOR", 20.0, 0.5)
        .with_world_coords((0.0, 5.0), (20.0, 5.0));
    assert_eq!(seg.world_position(0.0), (0.0, 5.0));
    assert_eq!(seg.world_position(10.0), (10.0, 5.0));
    assert_eq!(seg.world_position(20.0), (20.0, 5.0));
}

#[test]
fn world_position_round_trips_through_the_inverse_ratio() {
    let start = (3.0, 7.0);
    let end = (11.0, 1.0);
    let seg = Segment::standalone("DIAGONAL", 20.0, 0.5).with_world_coords(start, end);

    for local in [0.0, 2.5, 10.0, 13.37, 20.0] {
        let (wx, wy) = seg.world_position(local);
        // 由世界坐标按比例反解段内位置
        let dx = end.0 - start.0;
        let dy = end.1 - start.1;
        let ratio = ((wx - start.0) * dx + (wy - start.1) * dy) / (dx * dx + dy * dy);
        let recovered = ratio * seg.length();
        assert!((recovered - local).abs() < 1e-9, "local={local}");
    }
}

#[test]
fn admission_enforces_min_gap_around_residents() {
    let mut sim = Simulator::default();
    let mut world = BeltWorld::default();
    let belt = world
        .plant
        .add_segment(Segment::standalone("MAIN_CONVEYOR", 20.0, 0.5));

    let carrier = world.plant.carrier_mut(belt);
    assert!(carrier
        .accept(belt, pkt("PKT_001", SimTime::ZERO), 0.0, &mut sim)
        .is_ok());

    // 同一位置：间距为 0，退回原包裹
    let rejected = carrier
        .accept(belt, pkt("PKT_002", SimTime::ZERO), 0.0, &mut sim)
        .unwrap_err();
    assert_eq!(rejected.id, "PKT_002");
    assert_eq!(carrier.in_transit(), 1);

    // 1.0 米外：0.3 + 0.5 = 0.8 的要求满足
    assert!(carrier
        .accept(belt, pkt("PKT_002", SimTime::ZERO), 1.0, &mut sim)
        .is_ok());
    assert_eq!(carrier.in_transit(), 2);
}

#[test]
fn has_space_at_is_a_pure_query() {
    let mut sim = Simulator::default();
    let mut world = BeltWorld::default();
    let belt = world
        .plant
        .add_segment(Segment::standalone("MAIN_CONVEYOR", 20.0, 0.5));

    let carrier = world.plant.carrier_mut(belt);
    carrier
        .accept(belt, pkt("PKT_001", SimTime::ZERO), 0.0, &mut sim)
        .unwrap();

    let first = carrier.has_space_at(0.0, 0.3, SimTime::ZERO);
    let second = carrier.has_space_at(0.0, 0.3, SimTime::ZERO);
    assert!(!first);
    assert_eq!(first, second);
    assert_eq!(carrier.in_transit(), 1);
    assert_eq!(carrier.total_processed(), 0);
}

#[test]
fn has_space_at_interpolates_resident_positions() {
    let mut sim = Simulator::default();
    let mut world = BeltWorld::default();
    let belt = world
        .plant
        .add_segment(Segment::standalone("MAIN_CONVEYOR", 20.0, 0.5));

    world
        .plant
        .carrier_mut(belt)
        .accept(belt, pkt("PKT_001", SimTime::ZERO), 0.0, &mut sim)
        .unwrap();

    // 入口在 t=0 被占住
    assert!(!world
        .plant
        .carrier(belt)
        .has_space_at(0.0, 0.3, SimTime::ZERO));

    // 两秒后包裹已前进 1.0 米，入口按插值位置重新可用
    sim.run_until(SimTime::from_secs(2), &mut world);
    assert!(world
        .plant
        .carrier(belt)
        .has_space_at(0.0, 0.3, sim.now()));
}

#[test]
fn packet_traverses_full_length_at_belt_speed() {
    let mut sim = Simulator::default();
    let mut world = BeltWorld::default();
    let belt = world
        .plant
        .add_segment(Segment::standalone("MAIN_CONVEYOR", 20.0, 0.5));

    world
        .plant
        .carrier_mut(belt)
        .accept(belt, pkt("PKT_001", SimTime::ZERO), 0.0, &mut sim)
        .unwrap();

    sim.run(&mut world);

    // 20 米 @ 0.5 m/s：恰好 40 秒后离带
    assert_eq!(sim.now(), SimTime::from_secs(40));
    assert_eq!(world.plant.carrier(belt).total_processed(), 1);
    assert_eq!(world.plant.carrier(belt).in_transit(), 0);
}

#[test]
fn snapshot_reports_live_positions() {
    let mut sim = Simulator::default();
    let mut world = BeltWorld::default();
    let belt = world
        .plant
        .add_segment(Segment::standalone("MAIN_CONVEYOR", 20.0, 0.5));

    world
        .plant
        .carrier_mut(belt)
        .accept(belt, pkt("PKT_001", SimTime::ZERO), 0.0, &mut sim)
        .unwrap();
    sim.run_until(SimTime::from_secs(10), &mut world);

    let snap = world.plant.carrier(belt).snapshot(sim.now());
    assert_eq!(snap.in_transit, 1);
    assert_eq!(snap.segment_count, 1);
    assert_eq!(snap.packets.len(), 1);
    assert!((snap.packets[0].position - 5.0).abs() < 1e-9);
}

#[test]
fn entry_position_is_clamped_to_the_segment() {
    let mut sim = Simulator::default();
    let mut world = BeltWorld::default();
    let belt = world
        .plant
        .add_segment(Segment::standalone("MAIN_CONVEYOR", 20.0, 0.5));

    world
        .plant
        .carrier_mut(belt)
        .accept(belt, pkt("PKT_001", SimTime::ZERO), -5.0, &mut sim)
        .unwrap();

    let snap = world.plant.carrier(belt).snapshot(SimTime::ZERO);
    assert_eq!(snap.packets[0].position, 0.0);
}

#[test]
fn utilization_is_resident_over_capacity() {
    let mut sim = Simulator::default();
    let mut world = BeltWorld::default();
    let belt = world
        .plant
        .add_segment(Segment::standalone("MAIN_CONVEYOR", 20.0, 0.5));

    assert_eq!(world.plant.carrier(belt).utilization(), 0.0);

    let carrier = world.plant.carrier_mut(belt);
    carrier
        .accept(belt, pkt("PKT_001", SimTime::ZERO), 0.0, &mut sim)
        .unwrap();
    carrier
        .accept(belt, pkt("PKT_002", SimTime::ZERO), 5.0, &mut sim)
        .unwrap();

    // 2 / 25
    assert!((carrier.utilization() - 0.08).abs() < 1e-12);
}
