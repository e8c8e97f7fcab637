//! 包裹类型
//!
//! 定义在输送网络中流动的离散单元及其生命周期操作。包裹由 feeder 的
//! 生产步骤创建，任一时刻只被一个运动事件链推进，离开输送线后从所有
//! 容器移除、不再被修改。

use crate::sim::SimTime;
use thiserror::Error;

use super::DEFAULT_PACKET_DIM;

/// 包裹构造错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    /// 包裹 id 为空；构造立即失败，只影响这一次构造调用。
    #[error("packet id must not be empty")]
    InvalidIdentifier,
}

/// 一次等待记录：在某个位置（通常是 feeder）开始等待，准入成功时结束。
#[derive(Debug, Clone)]
pub struct WaitInterval {
    pub location: String,
    pub start_time: SimTime,
    pub end_time: Option<SimTime>,
}

/// 路径记录：每次进入一个 segment 追加一条。
#[derive(Debug, Clone)]
pub struct PathEntry {
    pub conveyor: String,
    pub entered_at: SimTime,
}

/// 包裹：在输送网络中流动的离散单元。
#[derive(Debug, Clone)]
pub struct Packet {
    pub id: String,
    /// 尺寸（米）
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// 在当前承载实体上的位置（米；线上为全局位置）
    pub position: f64,
    pub created_at: SimTime,
    pub entered_conveyor_at: SimTime,
    /// 最近一次位置被推进的时刻；解析运动与只读位置插值都以它为基准。
    pub last_advance_at: SimTime,
    pub current_conveyor: Option<String>,
    pub source_feeder: Option<String>,
    /// 目的地只随包裹携带，不参与导向，供下游报表使用。
    pub destination: Option<String>,
    pub total_wait_time: SimTime,
    pub wait_events: Vec<WaitInterval>,
    pub path_history: Vec<PathEntry>,
}

impl Packet {
    pub fn new(id: impl Into<String>, created_at: SimTime) -> Result<Packet, PacketError> {
        let id = id.into();
        if id.is_empty() {
            return Err(PacketError::InvalidIdentifier);
        }
        Ok(Packet {
            id,
            length: DEFAULT_PACKET_DIM,
            width: DEFAULT_PACKET_DIM,
            height: DEFAULT_PACKET_DIM,
            position: 0.0,
            created_at,
            entered_conveyor_at: created_at,
            last_advance_at: created_at,
            current_conveyor: None,
            source_feeder: None,
            destination: None,
            total_wait_time: SimTime::ZERO,
            wait_events: Vec::new(),
            path_history: Vec::new(),
        })
    }

    pub fn with_source_feeder(mut self, feeder: impl Into<String>) -> Packet {
        self.source_feeder = Some(feeder.into());
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Packet {
        self.destination = Some(destination.into());
        self
    }

    /// 进入一个 segment。
    ///
    /// 这是唯一允许非连续地重置 `position` 的入口；准入与跨段转移都
    /// 经过这里，每次调用追加一条路径记录。
    pub fn enter_segment(&mut self, conveyor_id: &str, now: SimTime, position: f64) {
        self.current_conveyor = Some(conveyor_id.to_string());
        self.entered_conveyor_at = now;
        self.position = position;
        self.last_advance_at = now;
        self.path_history.push(PathEntry {
            conveyor: conveyor_id.to_string(),
            entered_at: now,
        });
    }

    /// 在某个位置开始等待。
    pub fn start_waiting(&mut self, location: &str, now: SimTime) {
        self.wait_events.push(WaitInterval {
            location: location.to_string(),
            start_time: now,
            end_time: None,
        });
    }

    /// 关闭最近一次未结束的等待区间并累计等待时长。
    /// 没有未结束的区间时什么也不做。
    pub fn stop_waiting(&mut self, now: SimTime) {
        if let Some(ev) = self.wait_events.last_mut() {
            if ev.end_time.is_none() {
                ev.end_time = Some(now);
                self.total_wait_time = self
                    .total_wait_time
                    .saturating_add(now.saturating_sub(ev.start_time));
            }
        }
    }

    /// 自创建以来的总时长。
    pub fn travel_time(&self, now: SimTime) -> SimTime {
        now.saturating_sub(self.created_at)
    }

    /// 运动/等待比：1.0 表示全程无等待。
    pub fn utilization_rate(&self, now: SimTime) -> f64 {
        let travel = self.travel_time(now);
        if travel == SimTime::ZERO {
            return 1.0;
        }
        1.0 - self.total_wait_time.as_secs_f64() / travel.as_secs_f64()
    }
}
