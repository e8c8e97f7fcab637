//! 输送世界实现
//!
//! 仿真世界（World）实现：持有设备注册表与快照日志。

use std::any::Any;

use crate::sim::World;
use crate::viz::SnapshotLog;

use super::plant::Plant;

/// 默认的输送世界实现：持有 Plant 与采样日志。
#[derive(Default)]
pub struct BeltWorld {
    pub plant: Plant,
    pub log: SnapshotLog,
}

impl World for BeltWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
