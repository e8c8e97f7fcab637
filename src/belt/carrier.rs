//! 承载能力抽象
//!
//! 单段输送带与多段输送线通过同一个准入能力暴露给 feeder；调用方只
//! 依赖该接口，不关心目标的具体形态。

use std::any::Any;

use crate::sim::{SimTime, Simulator};
use crate::viz::CarrierSnapshot;

use super::packet::Packet;

/// 承载实体标识符（plant 内索引）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CarrierId(pub usize);

/// 承载能力：可以在指定位置准入包裹并推进其运动的实体。
///
/// 间距不变量是 admission-only 契约：只在准入时刻检查。一旦两个包裹
/// 在速度不同的 segment 上运动，上游较快的包裹可以合法地把间距压缩到
/// min_gap 以下，运动过程中不做再次校验。
pub trait Carrier: Send {
    fn id(&self) -> &str;

    fn total_length(&self) -> f64;

    /// 由参考包裹长度推导的容量。只作统计口径，准入由间距决定。
    fn capacity(&self) -> usize;

    fn in_transit(&self) -> usize;

    fn total_processed(&self) -> u64;

    /// 纯查询：`position` 处能否容纳一个长度为 `packet_length` 的包裹。
    /// 无副作用，幂等；在场包裹的位置按 `now` 插值。
    fn has_space_at(&self, position: f64, packet_length: f64, now: SimTime) -> bool;

    /// 尝试准入。失败时原样退回包裹（`Err`），不产生任何状态变化；
    /// 成功时登记包裹、结束其未完的等待区间，并调度运动事件。
    fn accept(
        &mut self,
        me: CarrierId,
        pkt: Packet,
        entry: f64,
        sim: &mut Simulator,
    ) -> Result<(), Packet>;

    /// 推进某个包裹的运动（由 `MovePacket` 事件驱动）。
    fn advance(&mut self, me: CarrierId, packet_id: &str, sim: &mut Simulator);

    /// 当前占用率，0-1（容量为 0 时为 0）。
    fn utilization(&self) -> f64;

    /// 只读快照，供外部采样器使用。
    fn snapshot(&self, now: SimTime) -> CarrierSnapshot;

    fn as_any(&self) -> &dyn Any;
}
