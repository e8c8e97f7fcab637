//! 输送段
//!
//! 固定长度、固定速度的一段输送带。既可以独立使用（偏移从 0 开始，
//! feeder 直接以它为目标），也可以作为输送线的一节（偏移为线上累计
//! 位置）。段上包裹归本段独占；位置按解析运动在事件时刻推进，事件
//! 之间的位置由速度插值得到。

use std::any::Any;

use tracing::{debug, trace, warn};

use crate::sim::{SimTime, Simulator};
use crate::viz::{CarrierSnapshot, PacketSnapshot, SegmentSnapshot};

use super::carrier::{Carrier, CarrierId};
use super::move_packet::MovePacket;
use super::packet::Packet;
use super::{DEFAULT_MIN_GAP, DEFAULT_PACKET_DIM, POS_EPS};

#[derive(Debug)]
pub struct Segment {
    id: String,
    length: f64,
    speed: f64,
    /// 全局偏移：独立段为 0，线内段为线起点到本段起点的累计长度。
    start_offset: f64,
    end_offset: f64,
    min_gap: f64,
    /// 世界坐标（布局用，纯坐标变换，不影响运动）
    start_pos: (f64, f64),
    end_pos: (f64, f64),
    capacity: usize,
    pub(crate) packets: Vec<Packet>,
    pub(crate) total_accepted: u64,
    pub(crate) total_processed: u64,
}

impl Segment {
    /// 独立输送段，偏移从 0 开始，默认间距参数。
    pub fn standalone(id: impl Into<String>, length: f64, speed: f64) -> Segment {
        Segment::with_offset(id, length, speed, 0.0, DEFAULT_MIN_GAP, DEFAULT_PACKET_DIM)
    }

    /// 线内输送段，`start_offset` 为线上累计偏移。
    pub fn with_offset(
        id: impl Into<String>,
        length: f64,
        speed: f64,
        start_offset: f64,
        min_gap: f64,
        reference_packet_length: f64,
    ) -> Segment {
        // 容量只在构造时从参考包裹长度推导一次，不随实际包裹尺寸变化
        let capacity = if length > 0.0 {
            (length / (reference_packet_length + min_gap)).floor() as usize
        } else {
            0
        };
        Segment {
            id: id.into(),
            length,
            speed,
            start_offset,
            end_offset: start_offset + length,
            min_gap,
            start_pos: (start_offset, 0.0),
            end_pos: (start_offset + length, 0.0),
            capacity,
            packets: Vec::new(),
            total_accepted: 0,
            total_processed: 0,
        }
    }

    pub fn with_world_coords(mut self, start: (f64, f64), end: (f64, f64)) -> Segment {
        self.start_pos = start;
        self.end_pos = end;
        self
    }

    pub fn with_spacing(mut self, min_gap: f64, reference_packet_length: f64) -> Segment {
        self.min_gap = min_gap;
        self.capacity = if self.length > 0.0 {
            (self.length / (reference_packet_length + min_gap)).floor() as usize
        } else {
            0
        };
        self
    }

    pub fn segment_id(&self) -> &str {
        &self.id
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    pub fn end_offset(&self) -> f64 {
        self.end_offset
    }

    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }

    pub fn resident_count(&self) -> usize {
        self.packets.len()
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    /// 该全局位置是否落在本段 [start, end) 内。
    pub fn contains(&self, global: f64) -> bool {
        global >= self.start_offset && global < self.end_offset
    }

    pub fn to_local(&self, global: f64) -> f64 {
        global - self.start_offset
    }

    pub fn to_global(&self, local: f64) -> f64 {
        local + self.start_offset
    }

    /// 段内局部位置 → 世界坐标。线性插值，纯坐标变换。
    pub fn world_position(&self, local: f64) -> (f64, f64) {
        if self.length <= 0.0 {
            return self.start_pos;
        }
        let ratio = local / self.length;
        (
            self.start_pos.0 + ratio * (self.end_pos.0 - self.start_pos.0),
            self.start_pos.1 + ratio * (self.end_pos.1 - self.start_pos.1),
        )
    }

    /// 包裹在 `now` 时刻的解析位置（只读，不推进状态）。
    pub fn live_position(&self, pkt: &Packet, now: SimTime) -> f64 {
        let elapsed = now.saturating_sub(pkt.last_advance_at).as_secs_f64();
        (pkt.position + self.speed * elapsed).min(self.end_offset)
    }

    /// 间距查询：段上每个在场包裹到 `position` 的距离都必须不小于
    /// （包裹长度 + min_gap）。位置按 `now` 插值。
    pub fn gap_clear_at(&self, position: f64, packet_length: f64, now: SimTime) -> bool {
        let required = packet_length + self.min_gap;
        self.packets
            .iter()
            .all(|p| (self.live_position(p, now) - position).abs() >= required)
    }

    fn clamp_entry(&self, entry: f64) -> f64 {
        entry.clamp(self.start_offset, self.end_offset)
    }
}

impl Carrier for Segment {
    fn id(&self) -> &str {
        &self.id
    }

    fn total_length(&self) -> f64 {
        self.length
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn in_transit(&self) -> usize {
        self.packets.len()
    }

    fn total_processed(&self) -> u64 {
        self.total_processed
    }

    fn has_space_at(&self, position: f64, packet_length: f64, now: SimTime) -> bool {
        let position = self.clamp_entry(position);
        self.gap_clear_at(position, packet_length, now)
    }

    #[tracing::instrument(skip(self, pkt, sim), fields(segment = %self.id, pkt_id = %pkt.id))]
    fn accept(
        &mut self,
        me: CarrierId,
        mut pkt: Packet,
        entry: f64,
        sim: &mut Simulator,
    ) -> Result<(), Packet> {
        let now = sim.now();
        let entry = self.clamp_entry(entry);
        if !self.gap_clear_at(entry, pkt.length, now) {
            trace!(entry, "间距不足，拒绝准入");
            return Err(pkt);
        }

        // 准入即结束等待（若包裹带着未结束的等待区间）
        pkt.stop_waiting(now);
        pkt.enter_segment(&self.id, now, entry);
        debug!(entry, resident = self.packets.len() + 1, "📦 包裹上带");

        let packet_id = pkt.id.clone();
        self.packets.push(pkt);
        self.total_accepted += 1;
        sim.schedule(
            now,
            MovePacket {
                carrier: me,
                packet: packet_id,
            },
        );
        Ok(())
    }

    fn advance(&mut self, me: CarrierId, packet_id: &str, sim: &mut Simulator) {
        let now = sim.now();
        let Some(idx) = self.packets.iter().position(|p| p.id == packet_id) else {
            // 包裹已不在段上（例如已在地平线前离开）
            return;
        };

        let speed = self.speed;
        let end = self.end_offset;
        {
            let pkt = &mut self.packets[idx];
            let elapsed = now.saturating_sub(pkt.last_advance_at).as_secs_f64();
            pkt.position = (pkt.position + speed * elapsed).min(end);
            pkt.last_advance_at = now;
        }

        let remaining = end - self.packets[idx].position;
        if remaining <= POS_EPS {
            // 段尾：从在场集合移除，计入处理总数，之后不再被修改
            let mut pkt = self.packets.remove(idx);
            pkt.position = end;
            self.total_processed += 1;
            debug!(
                segment = %self.id,
                pkt_id = %pkt.id,
                processed = self.total_processed,
                "✅ 包裹到达段尾"
            );
        } else if speed > 0.0 {
            sim.schedule_in(
                SimTime::from_secs_f64(remaining / speed),
                MovePacket {
                    carrier: me,
                    packet: packet_id.to_string(),
                },
            );
        } else {
            warn!(segment = %self.id, pkt_id = %packet_id, "段速度为 0，包裹停滞");
        }
    }

    fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.packets.len() as f64 / self.capacity as f64
        }
    }

    fn snapshot(&self, now: SimTime) -> CarrierSnapshot {
        CarrierSnapshot {
            id: self.id.clone(),
            total_length: self.length,
            segment_count: 1,
            capacity: self.capacity,
            in_transit: self.packets.len(),
            processed: self.total_processed,
            utilization: Carrier::utilization(self),
            segments: vec![SegmentSnapshot {
                id: self.id.clone(),
                length: self.length,
                speed: self.speed,
                resident: self.packets.len(),
                utilization: Carrier::utilization(self),
            }],
            packets: self
                .packets
                .iter()
                .map(|p| PacketSnapshot {
                    id: p.id.clone(),
                    position: self.live_position(p, now),
                    source_feeder: p.source_feeder.clone(),
                })
                .collect(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
