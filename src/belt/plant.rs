//! 设备注册表
//!
//! 持有全部承载实体与 feeder，向事件层提供按索引的分发入口，并组装
//! 只读的全厂快照。

use tracing::debug;

use crate::sim::{SimTime, Simulator};
use crate::viz::{FeederStats, PlantSnapshot};

use super::carrier::{Carrier, CarrierId};
use super::feeder::{Feeder, FeederId};
use super::route::Route;
use super::segment::Segment;

#[derive(Default)]
pub struct Plant {
    carriers: Vec<Box<dyn Carrier>>,
    feeders: Vec<Feeder>,
}

impl Plant {
    pub fn add_carrier(&mut self, carrier: Box<dyn Carrier>) -> CarrierId {
        let id = CarrierId(self.carriers.len());
        debug!(carrier = carrier.id(), index = id.0, "登记承载实体");
        self.carriers.push(carrier);
        id
    }

    pub fn add_segment(&mut self, segment: Segment) -> CarrierId {
        self.add_carrier(Box::new(segment))
    }

    pub fn add_route(&mut self, route: Route) -> CarrierId {
        self.add_carrier(Box::new(route))
    }

    pub fn add_feeder(&mut self, feeder: Feeder) -> FeederId {
        let id = FeederId(self.feeders.len());
        debug!(feeder = feeder.feeder_id(), index = id.0, "登记 feeder");
        self.feeders.push(feeder);
        id
    }

    pub fn carrier(&self, id: CarrierId) -> &dyn Carrier {
        self.carriers[id.0].as_ref()
    }

    pub fn carrier_mut(&mut self, id: CarrierId) -> &mut dyn Carrier {
        self.carriers[id.0].as_mut()
    }

    pub fn feeder(&self, id: FeederId) -> &Feeder {
        &self.feeders[id.0]
    }

    pub fn feeders(&self) -> &[Feeder] {
        &self.feeders
    }

    /// `MovePacket` 事件入口。
    pub fn advance(&mut self, carrier: CarrierId, packet_id: &str, sim: &mut Simulator) {
        self.carriers[carrier.0].advance(carrier, packet_id, sim);
    }

    /// `ProducePacket` 事件入口。
    pub fn feeder_produce(&mut self, id: FeederId, now: SimTime) {
        self.feeders[id.0].produce(now);
    }

    /// `TransferTick` 事件入口。feeder 与其目标分属两个容器，可以同时
    /// 可变借用。
    pub fn feeder_transfer(&mut self, id: FeederId, sim: &mut Simulator) {
        let Plant { carriers, feeders } = self;
        let feeder = &mut feeders[id.0];
        let target = carriers[feeder.target().0].as_mut();
        feeder.try_transfer(target, sim);
    }

    /// 全厂只读快照。
    pub fn snapshot(&self, now: SimTime) -> PlantSnapshot {
        let carriers: Vec<_> = self.carriers.iter().map(|c| c.snapshot(now)).collect();
        let processed_total = carriers.iter().map(|c| c.processed).sum();
        PlantSnapshot {
            t_ns: now.0,
            processed_total,
            carriers,
            feeders: self.feeder_stats(now),
        }
    }

    pub fn feeder_stats(&self, now: SimTime) -> Vec<FeederStats> {
        self.feeders.iter().map(|f| f.stats(now)).collect()
    }
}
