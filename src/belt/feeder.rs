//! Feeder
//!
//! 以固定速率生产包裹、排入 FIFO 队列，并在固定接入点反复尝试向目标
//! 承载实体准入。状态机只有 ACTIVE/BLOCKED 两态，初始 ACTIVE，没有
//! 终态：两条事件链一直运行到仿真地平线为止。

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use crate::sim::{SimTime, Simulator};
use crate::viz::FeederStats;

use super::carrier::{Carrier, CarrierId};
use super::packet::Packet;

/// feeder 标识符（plant 内索引）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeederId(pub usize);

/// 队列采样：每次转移轮询记录一条，供外部收集器使用。
#[derive(Debug, Clone)]
pub struct QueueSample {
    pub time: SimTime,
    pub queue_len: usize,
    pub blocked: bool,
}

pub struct Feeder {
    id: String,
    target: CarrierId,
    /// 生产速率（包裹/秒）
    production_rate: f64,
    /// 目标上的固定全局接入位置（米）
    entry_position: f64,
    max_queue_size: usize,
    poll_interval: SimTime,
    destination: Option<String>,

    queue: VecDeque<Packet>,
    next_seq: u64,
    total_produced: u64,
    total_transferred: u64,
    total_dropped: u64,
    blocked: bool,
    last_block_time: SimTime,
    total_blocked_time: SimTime,
    block_events: u64,
    queue_history: Vec<QueueSample>,
}

impl Feeder {
    pub fn new(
        id: impl Into<String>,
        target: CarrierId,
        production_rate: f64,
        entry_position: f64,
        max_queue_size: usize,
    ) -> Feeder {
        Feeder {
            id: id.into(),
            target,
            production_rate,
            entry_position,
            max_queue_size,
            poll_interval: SimTime::from_millis(500),
            destination: None,
            queue: VecDeque::new(),
            next_seq: 0,
            total_produced: 0,
            total_transferred: 0,
            total_dropped: 0,
            blocked: false,
            last_block_time: SimTime::ZERO,
            total_blocked_time: SimTime::ZERO,
            block_events: 0,
            queue_history: Vec::new(),
        }
    }

    pub fn with_poll_interval(mut self, interval: SimTime) -> Feeder {
        self.poll_interval = interval;
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Feeder {
        self.destination = Some(destination.into());
        self
    }

    pub fn feeder_id(&self) -> &str {
        &self.id
    }

    pub fn target(&self) -> CarrierId {
        self.target
    }

    pub fn entry_position(&self) -> f64 {
        self.entry_position
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn total_produced(&self) -> u64 {
        self.total_produced
    }

    pub fn total_transferred(&self) -> u64 {
        self.total_transferred
    }

    pub fn total_dropped(&self) -> u64 {
        self.total_dropped
    }

    pub fn block_events(&self) -> u64 {
        self.block_events
    }

    pub fn queue_history(&self) -> &[QueueSample] {
        &self.queue_history
    }

    /// 生产间隔 = 1 / production_rate。
    pub fn production_interval(&self) -> SimTime {
        SimTime::from_secs_f64(1.0 / self.production_rate)
    }

    pub fn poll_interval(&self) -> SimTime {
        self.poll_interval
    }

    /// 生产一个包裹并尝试入队。队列已满时丢弃：计数，不入队、不报错。
    pub fn produce(&mut self, now: SimTime) {
        self.next_seq += 1;
        let id = format!("{}_PKT_{:03}", self.id, self.next_seq);
        let mut pkt = Packet::new(id, now)
            .expect("generated packet id is non-empty")
            .with_source_feeder(&self.id);
        if let Some(dest) = &self.destination {
            pkt = pkt.with_destination(dest.clone());
        }

        self.total_produced += 1;
        if self.queue.len() < self.max_queue_size {
            debug!(
                feeder = %self.id,
                pkt_id = %pkt.id,
                queue = self.queue.len() + 1,
                "📦 包裹已生产入队"
            );
            self.queue.push_back(pkt);
        } else {
            self.total_dropped += 1;
            warn!(
                feeder = %self.id,
                pkt_id = %pkt.id,
                max_queue = self.max_queue_size,
                dropped = self.total_dropped,
                "队列已满，包裹被丢弃"
            );
        }
    }

    /// 尝试把队首包裹交给目标承载实体，并记录一条队列采样。
    /// 准入失败按常规背压处理，不是错误。
    pub fn try_transfer(&mut self, target: &mut dyn Carrier, sim: &mut Simulator) {
        let now = sim.now();
        if let Some(pkt) = self.queue.pop_front() {
            let pkt_id = pkt.id.clone();
            match target.accept(self.target, pkt, self.entry_position, sim) {
                Ok(()) => {
                    self.total_transferred += 1;
                    if self.blocked {
                        let blocked_for = now.saturating_sub(self.last_block_time);
                        self.total_blocked_time = self.total_blocked_time.saturating_add(blocked_for);
                        self.blocked = false;
                        debug!(
                            feeder = %self.id,
                            pkt_id = %pkt_id,
                            blocked_secs = blocked_for.as_secs_f64(),
                            "✅ 解除阻塞并完成转移"
                        );
                    } else {
                        trace!(feeder = %self.id, pkt_id = %pkt_id, "转移成功");
                    }
                }
                Err(mut pkt) => {
                    // 包裹退回队首。只有 ACTIVE→BLOCKED 这条边记录状态：
                    // 已阻塞期间的重复失败不重开等待区间、不重置时间戳。
                    if !self.blocked {
                        self.blocked = true;
                        self.last_block_time = now;
                        self.block_events += 1;
                        pkt.start_waiting(&self.id, now);
                        debug!(
                            feeder = %self.id,
                            queue = self.queue.len() + 1,
                            "🚫 目标无空位，进入阻塞"
                        );
                    }
                    self.queue.push_front(pkt);
                }
            }
        }
        self.queue_history.push(QueueSample {
            time: now,
            queue_len: self.queue.len(),
            blocked: self.blocked,
        });
    }

    /// 总阻塞时长，含仍在进行中的阻塞（不必等到下一次状态迁移）。
    pub fn current_blocked_time(&self, now: SimTime) -> SimTime {
        let mut total = self.total_blocked_time;
        if self.blocked {
            total = total.saturating_add(now.saturating_sub(self.last_block_time));
        }
        total
    }

    /// 非阻塞时间占比；t=0 时定义为 1.0。
    pub fn utilization_rate(&self, now: SimTime) -> f64 {
        if now == SimTime::ZERO {
            return 1.0;
        }
        let total = now.as_secs_f64();
        (total - self.current_blocked_time(now).as_secs_f64()) / total
    }

    /// 实际转移速率（包裹/秒）；t=0 时为 0。
    pub fn transfer_rate(&self, now: SimTime) -> f64 {
        if now == SimTime::ZERO {
            return 0.0;
        }
        self.total_transferred as f64 / now.as_secs_f64()
    }

    pub fn stats(&self, now: SimTime) -> FeederStats {
        FeederStats {
            id: self.id.clone(),
            produced: self.total_produced,
            transferred: self.total_transferred,
            dropped: self.total_dropped,
            queue_len: self.queue.len(),
            blocked: self.blocked,
            blocked_secs: self.current_blocked_time(now).as_secs_f64(),
            utilization_rate: self.utilization_rate(now),
            transfer_rate: self.transfer_rate(now),
            block_events: self.block_events,
        }
    }
}
