//! 输送系统核心模块
//!
//! 此模块包含物料输送网络的核心组件：包裹、输送段、输送线、feeder，
//! 以及驱动它们的事件。

// 子模块声明
mod belt_world;
mod carrier;
mod feeder;
mod move_packet;
mod packet;
mod plant;
mod produce_packet;
mod route;
mod sample_tick;
mod segment;
mod transfer_tick;

// 重新导出公共接口
pub use belt_world::BeltWorld;
pub use carrier::{Carrier, CarrierId};
pub use feeder::{Feeder, FeederId, QueueSample};
pub use move_packet::MovePacket;
pub use packet::{Packet, PacketError, PathEntry, WaitInterval};
pub use plant::Plant;
pub use produce_packet::ProducePacket;
pub use route::Route;
pub use sample_tick::SampleTick;
pub use segment::Segment;
pub use transfer_tick::TransferTick;

/// 包裹默认边长（米），同时是容量推导用的参考包裹长度。
pub const DEFAULT_PACKET_DIM: f64 = 0.3;

/// 两个包裹中心间的最小净距默认值（米）。
pub const DEFAULT_MIN_GAP: f64 = 0.5;

/// 位置比较容差（米）。事件时刻按纳秒向上取整，1 m/s 量级下的
/// 位置误差约在 1e-9 m。
pub(crate) const POS_EPS: f64 = 1e-9;
