//! 生产事件
//!
//! feeder 的生产进程：每 1/production_rate 秒生产一个包裹并重新调度
//! 自身，直到仿真地平线。

use crate::sim::{Event, Simulator, World};

use super::belt_world::BeltWorld;
use super::feeder::FeederId;

/// 事件：feeder 生产一个包裹。
#[derive(Debug)]
pub struct ProducePacket {
    pub feeder: FeederId,
}

impl Event for ProducePacket {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let ProducePacket { feeder } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<BeltWorld>()
            .expect("world must be BeltWorld");

        w.plant.feeder_produce(feeder, sim.now());

        let interval = w.plant.feeder(feeder).production_interval();
        sim.schedule_in(interval, ProducePacket { feeder });
    }
}
