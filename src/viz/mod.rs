//! 快照记录模块
//!
//! 面向外部报表/可视化协作方的只读快照类型。采样器只读核心容器，
//! 绝不修改状态；记录先存内存，仿真结束后由调用方写 JSON 文件。

mod types;

pub use types::{
    CarrierSnapshot, FeederStats, PacketSnapshot, PlantSnapshot, SegmentSnapshot, SnapshotLog,
};
