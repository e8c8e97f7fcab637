//! 包裹运动事件
//!
//! 每个在途包裹由一条 `MovePacket` 事件链驱动：事件时刻就是解析计算出
//! 的到达时刻（段尾或段边界），事件之间不消耗任何调度步。

use tracing::trace;

use crate::sim::{Event, Simulator, World};

use super::belt_world::BeltWorld;
use super::carrier::CarrierId;

/// 事件：推进某个承载实体上的一个包裹。
#[derive(Debug)]
pub struct MovePacket {
    pub carrier: CarrierId,
    pub packet: String,
}

impl Event for MovePacket {
    #[tracing::instrument(skip(self, sim, world), fields(carrier = self.carrier.0, pkt_id = %self.packet))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let MovePacket { carrier, packet } = *self;
        trace!(now = ?sim.now(), "运动事件触发");

        let w = world
            .as_any_mut()
            .downcast_mut::<BeltWorld>()
            .expect("world must be BeltWorld");
        w.plant.advance(carrier, &packet, sim);
    }
}
