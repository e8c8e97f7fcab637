//! 输送线
//!
//! 由多个首尾相接的 segment 组成的一条逻辑路径：segment i 的终点偏移
//! 等于 segment i+1 的起点偏移。输送线负责全局位置到 segment 的映射与
//! 跨段转移。每个 segment 独占其上的包裹；跨段转移是显式的取出-插入
//! （move），任一时刻包裹只属于一个 segment 的在场集合。

use std::any::Any;

use tracing::{debug, trace, warn};

use crate::sim::{SimTime, Simulator};
use crate::viz::{CarrierSnapshot, PacketSnapshot, SegmentSnapshot};

use super::carrier::{Carrier, CarrierId};
use super::move_packet::MovePacket;
use super::packet::Packet;
use super::segment::Segment;
use super::{DEFAULT_MIN_GAP, DEFAULT_PACKET_DIM, POS_EPS};

pub struct Route {
    id: String,
    min_gap: f64,
    reference_packet_length: f64,
    segments: Vec<Segment>,
    total_length: f64,
    total_accepted: u64,
    total_processed: u64,
}

impl Route {
    pub fn new(id: impl Into<String>) -> Route {
        Route::with_spacing(id, DEFAULT_MIN_GAP, DEFAULT_PACKET_DIM)
    }

    pub fn with_spacing(
        id: impl Into<String>,
        min_gap: f64,
        reference_packet_length: f64,
    ) -> Route {
        Route {
            id: id.into(),
            min_gap,
            reference_packet_length,
            segments: Vec::new(),
            total_length: 0.0,
            total_accepted: 0,
            total_processed: 0,
        }
    }

    /// 在线尾追加一个 segment（起点偏移 = 当前总长）。
    pub fn add_segment(&mut self, id: impl Into<String>, length: f64, speed: f64) -> &Segment {
        let seg = Segment::with_offset(
            id,
            length,
            speed,
            self.total_length,
            self.min_gap,
            self.reference_packet_length,
        );
        self.total_length += length;
        self.segments.push(seg);
        self.segments.last().expect("segment just pushed")
    }

    pub fn route_id(&self) -> &str {
        &self.id
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// 全局位置所在的 segment；线尾及之后没有。
    pub fn segment_at(&self, global: f64) -> Option<&Segment> {
        self.segments.iter().find(|s| s.contains(global))
    }

    fn segment_index_at(&self, global: f64) -> Option<usize> {
        self.segments.iter().position(|s| s.contains(global))
    }

    /// 全局位置处的段速度；线外为 0。
    pub fn speed_at(&self, global: f64) -> f64 {
        self.segment_at(global).map(|s| s.speed()).unwrap_or(0.0)
    }

    /// segment 序号 + 段内偏移 → 全局位置（feeder 接入点解析用）。
    pub fn entry_position(&self, segment_index: usize, offset: f64) -> Option<f64> {
        self.segments.get(segment_index).map(|s| s.to_global(offset))
    }

    /// 各 segment 的占用率。
    pub fn segment_utilizations(&self) -> Vec<(String, f64)> {
        self.segments
            .iter()
            .map(|s| (s.segment_id().to_string(), Carrier::utilization(s)))
            .collect()
    }

    fn clamp_entry(&self, entry: f64) -> f64 {
        // 入口位置落在 [0, total_length)：正好在线尾的包裹已经离线
        entry.clamp(0.0, (self.total_length - POS_EPS).max(0.0))
    }

    fn locate(&self, packet_id: &str) -> Option<(usize, usize)> {
        for (si, seg) in self.segments.iter().enumerate() {
            if let Some(pi) = seg.packets.iter().position(|p| p.id == packet_id) {
                return Some((si, pi));
            }
        }
        None
    }
}

impl Carrier for Route {
    fn id(&self) -> &str {
        &self.id
    }

    fn total_length(&self) -> f64 {
        self.total_length
    }

    fn capacity(&self) -> usize {
        self.segments.iter().map(|s| Carrier::capacity(s)).sum()
    }

    fn in_transit(&self) -> usize {
        self.segments.iter().map(|s| s.resident_count()).sum()
    }

    fn total_processed(&self) -> u64 {
        self.total_processed
    }

    /// 全线保守检查：对线上任何位置的任何包裹做间距判断，而不只是
    /// 目标 segment。
    fn has_space_at(&self, position: f64, packet_length: f64, now: SimTime) -> bool {
        let position = self.clamp_entry(position);
        self.segments
            .iter()
            .all(|s| s.gap_clear_at(position, packet_length, now))
    }

    #[tracing::instrument(skip(self, pkt, sim), fields(route = %self.id, pkt_id = %pkt.id))]
    fn accept(
        &mut self,
        me: CarrierId,
        mut pkt: Packet,
        entry: f64,
        sim: &mut Simulator,
    ) -> Result<(), Packet> {
        if self.segments.is_empty() {
            return Err(pkt);
        }
        let now = sim.now();
        let entry = self.clamp_entry(entry);
        if !self
            .segments
            .iter()
            .all(|s| s.gap_clear_at(entry, pkt.length, now))
        {
            trace!(entry, "间距不足，拒绝准入");
            return Err(pkt);
        }
        let Some(si) = self.segment_index_at(entry) else {
            // clamp 之后必然落在某个 segment 内；防御分支
            return Err(pkt);
        };

        pkt.stop_waiting(now);
        let packet_id = pkt.id.clone();
        let seg = &mut self.segments[si];
        let seg_id = seg.segment_id().to_string();
        pkt.enter_segment(&seg_id, now, entry);
        seg.packets.push(pkt);
        seg.total_accepted += 1;
        self.total_accepted += 1;
        debug!(
            entry,
            segment = %seg_id,
            in_transit = Carrier::in_transit(self),
            "📦 包裹进入输送线"
        );

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
        let Some((si, pi)) = self.locate(packet_id) else {
            return;
        };

        let speed = self.segments[si].speed();
        let seg_end = self.segments[si].end_offset();
        {
            let pkt = &mut self.segments[si].packets[pi];
            let elapsed = now.saturating_sub(pkt.last_advance_at).as_secs_f64();
            pkt.position = (pkt.position + speed * elapsed).min(seg_end);
            pkt.last_advance_at = now;
        }

        let position = self.segments[si].packets[pi].position;
        if seg_end - position <= POS_EPS {
            // 段边界：先把位置精确贴到边界（绝不越过），再换段继续
            let mut pkt = self.segments[si].packets.remove(pi);
            pkt.position = seg_end;

            if seg_end >= self.total_length - POS_EPS {
                // 线尾：离开所有容器，处理计数恰好 +1
                pkt.position = self.total_length;
                self.total_processed += 1;
                debug!(
                    route = %self.id,
                    pkt_id = %pkt.id,
                    processed = self.total_processed,
                    "✅ 包裹离开输送线"
                );
                return;
            }

            match self.segment_index_at(pkt.position) {
                Some(next) => {
                    let next_seg = &mut self.segments[next];
                    let remaining = next_seg.end_offset() - seg_end;
                    let next_speed = next_seg.speed();
                    pkt.enter_segment(next_seg.segment_id(), now, seg_end);
                    next_seg.packets.push(pkt);
                    trace!(segment = si, next, "包裹跨段转移");
                    if next_speed > 0.0 {
                        sim.schedule_in(
                            SimTime::from_secs_f64(remaining / next_speed),
                            MovePacket {
                                carrier: me,
                                packet: packet_id.to_string(),
                            },
                        );
                    } else {
                        warn!(route = %self.id, pkt_id = %packet_id, "下一段速度为 0，包裹停滞");
                    }
                }
                None => {
                    // 连续性在拓扑构造期保证；出现缺口按离线处理
                    warn!(route = %self.id, pkt_id = %packet_id, "边界之后没有 segment");
                    self.total_processed += 1;
                }
            }
        } else if speed > 0.0 {
            sim.schedule_in(
                SimTime::from_secs_f64((seg_end - position) / speed),
                MovePacket {
                    carrier: me,
                    packet: packet_id.to_string(),
                },
            );
        } else {
            warn!(route = %self.id, pkt_id = %packet_id, "段速度为 0，包裹停滞");
        }
    }

    fn utilization(&self) -> f64 {
        let capacity = Carrier::capacity(self);
        if capacity == 0 {
            0.0
        } else {
            Carrier::in_transit(self) as f64 / capacity as f64
        }
    }

    fn snapshot(&self, now: SimTime) -> CarrierSnapshot {
        let mut packets = Vec::new();
        for seg in &self.segments {
            packets.extend(seg.packets.iter().map(|p| PacketSnapshot {
                id: p.id.clone(),
                position: seg.live_position(p, now),
                source_feeder: p.source_feeder.clone(),
            }));
        }
        CarrierSnapshot {
            id: self.id.clone(),
            total_length: self.total_length,
            segment_count: self.segments.len(),
            capacity: Carrier::capacity(self),
            in_transit: Carrier::in_transit(self),
            processed: self.total_processed,
            utilization: Carrier::utilization(self),
            segments: self
                .segments
                .iter()
                .map(|s| SegmentSnapshot {
                    id: s.segment_id().to_string(),
                    length: s.length(),
                    speed: s.speed(),
                    resident: s.resident_count(),
                    utilization: Carrier::utilization(s),
                })
                .collect(),
            packets,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
