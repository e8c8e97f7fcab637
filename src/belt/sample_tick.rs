//! 采样事件
//!
//! 外部收集器进程：按固定间隔采集全厂只读快照到内存日志。它和其他
//! 进程一样只是一条被调度的事件链，但只读核心容器、绝不修改状态。

use crate::sim::{Event, SimTime, Simulator, World};

use super::belt_world::BeltWorld;

/// 事件：采集一次全厂快照。
#[derive(Debug)]
pub struct SampleTick {
    pub interval: SimTime,
}

impl Event for SampleTick {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let SampleTick { interval } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<BeltWorld>()
            .expect("world must be BeltWorld");

        let snap = w.plant.snapshot(sim.now());
        w.log.push(snap);

        sim.schedule_in(interval, SampleTick { interval });
    }
}
