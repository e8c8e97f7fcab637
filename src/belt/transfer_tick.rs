//! 转移轮询事件
//!
//! feeder 的转移进程：按短轮询间隔反复尝试把队首包裹交给目标承载
//! 实体，并记录队列采样。

use crate::sim::{Event, Simulator, World};

use super::belt_world::BeltWorld;
use super::feeder::FeederId;

/// 事件：feeder 的一次转移尝试。
#[derive(Debug)]
pub struct TransferTick {
    pub feeder: FeederId,
}

impl Event for TransferTick {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let TransferTick { feeder } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<BeltWorld>()
            .expect("world must be BeltWorld");

        w.plant.feeder_transfer(feeder, sim);

        let interval = w.plant.feeder(feeder).poll_interval();
        sim.schedule_in(interval, TransferTick { feeder });
    }
}
