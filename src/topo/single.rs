//! 单段输送带演示拓扑
//!
//! 最小场景：一条独立输送带加一个从带头接入的 feeder。默认参数即
//! 原型场景（20 m @ 0.5 m/s，每 5 秒生产一个包裹）。

use crate::belt::{
    BeltWorld, CarrierId, Feeder, FeederId, ProducePacket, SampleTick, Segment, TransferTick,
};
use crate::sim::{SimTime, Simulator};

/// 单段场景配置选项
#[derive(Debug, Clone)]
pub struct SingleBeltOpts {
    pub length: f64,
    pub speed: f64,
    pub production_rate: f64,
    pub max_queue_size: usize,
    pub snapshot_interval: SimTime,
}

impl Default for SingleBeltOpts {
    fn default() -> Self {
        SingleBeltOpts {
            length: 20.0,
            speed: 0.5,
            production_rate: 0.2,
            max_queue_size: 100,
            snapshot_interval: SimTime::from_secs(2),
        }
    }
}

/// 构建单段场景并调度事件链。
pub fn build_single_belt(
    world: &mut BeltWorld,
    sim: &mut Simulator,
    opts: &SingleBeltOpts,
) -> (CarrierId, FeederId) {
    let belt = world.plant.add_segment(
        Segment::standalone("MAIN_CONVEYOR", opts.length, opts.speed)
            .with_world_coords((0.0, 5.0), (opts.length, 5.0)),
    );
    let feeder = Feeder::new("FEEDER_001", belt, opts.production_rate, 0.0, opts.max_queue_size);
    let fid = world.plant.add_feeder(feeder);

    sim.schedule_in(
        world.plant.feeder(fid).production_interval(),
        ProducePacket { feeder: fid },
    );
    sim.schedule_in(
        world.plant.feeder(fid).poll_interval(),
        TransferTick { feeder: fid },
    );
    sim.schedule(
        SimTime::ZERO,
        SampleTick {
            interval: opts.snapshot_interval,
        },
    );

    (belt, fid)
}
