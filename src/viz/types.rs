use serde::{Deserialize, Serialize};

/// 全厂快照（一次采样）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantSnapshot {
    /// 仿真时间（纳秒，和 `SimTime.0` 同口径）
    pub t_ns: u64,
    /// 所有承载实体累计处理的包裹数
    pub processed_total: u64,
    pub carriers: Vec<CarrierSnapshot>,
    pub feeders: Vec<FeederStats>,
}

/// 一个承载实体（单段输送带或整条输送线）的快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierSnapshot {
    pub id: String,
    pub total_length: f64,
    pub segment_count: usize,
    /// 由参考包裹长度推导的容量（统计口径）
    pub capacity: usize,
    pub in_transit: usize,
    pub processed: u64,
    pub utilization: f64,
    pub segments: Vec<SegmentSnapshot>,
    pub packets: Vec<PacketSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSnapshot {
    pub id: String,
    pub length: f64,
    pub speed: f64,
    pub resident: usize,
    pub utilization: f64,
}

/// 在途包裹的位置采样。位置由段速度插值得到，采样本身不推进状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketSnapshot {
    pub id: String,
    pub position: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_feeder: Option<String>,
}

/// feeder 统计记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeederStats {
    pub id: String,
    pub produced: u64,
    pub transferred: u64,
    /// 队列满时被丢弃的生产（可计数的静默损失）
    pub dropped: u64,
    pub queue_len: usize,
    pub blocked: bool,
    /// 总阻塞时长（秒），含仍在进行中的阻塞
    pub blocked_secs: f64,
    pub utilization_rate: f64,
    pub transfer_rate: f64,
    pub block_events: u64,
}

/// 快照日志（存内存，仿真结束写 JSON 文件）
#[derive(Debug, Default)]
pub struct SnapshotLog {
    pub snapshots: Vec<PlantSnapshot>,
}

impl SnapshotLog {
    pub fn push(&mut self, snap: PlantSnapshot) {
        self.snapshots.push(snap);
    }
}
