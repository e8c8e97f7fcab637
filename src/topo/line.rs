//! 多段输送线拓扑
//!
//! JSON 配置（serde）描述 segment 序列与 feeder 接入点；feeder 的接入
//! 点以（segment 序号，段内偏移）给出，构建时解析为线上全局位置。

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::belt::{
    BeltWorld, CarrierId, Feeder, FeederId, ProducePacket, Route, SampleTick, TransferTick,
    DEFAULT_MIN_GAP, DEFAULT_PACKET_DIM,
};
use crate::sim::{SimTime, Simulator};

/// 一条输送线的完整配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSpec {
    #[serde(default = "default_line_id")]
    pub id: String,
    /// 包裹中心间最小净距（米）
    #[serde(default = "default_min_gap")]
    pub min_gap: f64,
    /// 容量推导用的参考包裹长度（米）
    #[serde(default = "default_reference_packet_length")]
    pub reference_packet_length: f64,
    pub segments: Vec<SegmentSpec>,
    #[serde(default)]
    pub feeders: Vec<FeederSpec>,
    #[serde(default)]
    pub simulation: SimulationSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub id: String,
    pub length: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeederSpec {
    pub id: String,
    /// 生产速率（包裹/秒）
    pub production_rate: f64,
    /// 接入的 segment 序号
    #[serde(default)]
    pub connection_segment: usize,
    /// 段内偏移（米）
    #[serde(default)]
    pub connection_offset: f64,
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: f64,
    #[serde(default)]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSpec {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,
    #[serde(default = "default_snapshot_interval_secs")]
    pub snapshot_interval_secs: f64,
}

impl Default for SimulationSpec {
    fn default() -> Self {
        SimulationSpec {
            duration_secs: default_duration_secs(),
            snapshot_interval_secs: default_snapshot_interval_secs(),
        }
    }
}

fn default_line_id() -> String {
    "MAIN_LINE".to_string()
}

fn default_min_gap() -> f64 {
    DEFAULT_MIN_GAP
}

fn default_reference_packet_length() -> f64 {
    DEFAULT_PACKET_DIM
}

fn default_max_queue_size() -> usize {
    100
}

fn default_poll_interval_secs() -> f64 {
    0.5
}

fn default_duration_secs() -> f64 {
    120.0
}

fn default_snapshot_interval_secs() -> f64 {
    2.0
}

/// 拓扑校验错误。全部在构造核心实体之前报出。
#[derive(Debug, Error, PartialEq)]
pub enum TopoError {
    #[error("line `{0}` has no segments")]
    EmptyLine(String),
    #[error("segment `{0}` must have positive length")]
    NonPositiveLength(String),
    #[error("segment `{0}` must have positive speed")]
    NonPositiveSpeed(String),
    #[error("spacing parameters must be positive (min_gap={min_gap}, reference_packet_length={reference_packet_length})")]
    InvalidSpacing {
        min_gap: f64,
        reference_packet_length: f64,
    },
    #[error("feeder `{0}` must have positive production rate")]
    NonPositiveRate(String),
    #[error("feeder `{feeder}` connects to segment index {segment} but the line has {count} segments")]
    UnknownSegment {
        feeder: String,
        segment: usize,
        count: usize,
    },
    #[error("feeder `{feeder}` entry offset {offset} is outside segment `{segment}`")]
    EntryOutOfRange {
        feeder: String,
        segment: String,
        offset: f64,
    },
    #[error("feeder `{0}` must allow at least one queued packet")]
    ZeroQueue(String),
    #[error("feeder `{0}` poll interval must be positive")]
    NonPositivePoll(String),
    #[error("snapshot interval must be positive")]
    NonPositiveSampleInterval,
}

/// 校验一份输送线配置。
pub fn validate(spec: &LineSpec) -> Result<(), TopoError> {
    if spec.segments.is_empty() {
        return Err(TopoError::EmptyLine(spec.id.clone()));
    }
    if spec.min_gap <= 0.0 || spec.reference_packet_length <= 0.0 {
        return Err(TopoError::InvalidSpacing {
            min_gap: spec.min_gap,
            reference_packet_length: spec.reference_packet_length,
        });
    }
    for seg in &spec.segments {
        if seg.length <= 0.0 {
            return Err(TopoError::NonPositiveLength(seg.id.clone()));
        }
        if seg.speed <= 0.0 {
            return Err(TopoError::NonPositiveSpeed(seg.id.clone()));
        }
    }
    for feeder in &spec.feeders {
        if feeder.production_rate <= 0.0 {
            return Err(TopoError::NonPositiveRate(feeder.id.clone()));
        }
        if feeder.max_queue_size == 0 {
            return Err(TopoError::ZeroQueue(feeder.id.clone()));
        }
        if feeder.poll_interval_secs <= 0.0 {
            return Err(TopoError::NonPositivePoll(feeder.id.clone()));
        }
        let Some(seg) = spec.segments.get(feeder.connection_segment) else {
            return Err(TopoError::UnknownSegment {
                feeder: feeder.id.clone(),
                segment: feeder.connection_segment,
                count: spec.segments.len(),
            });
        };
        if feeder.connection_offset < 0.0 || feeder.connection_offset >= seg.length {
            return Err(TopoError::EntryOutOfRange {
                feeder: feeder.id.clone(),
                segment: seg.id.clone(),
                offset: feeder.connection_offset,
            });
        }
    }
    if spec.simulation.snapshot_interval_secs <= 0.0 {
        return Err(TopoError::NonPositiveSampleInterval);
    }
    Ok(())
}

/// 构建结果：承载实体与 feeder 的索引句柄。
#[derive(Debug)]
pub struct LineHandles {
    pub line: CarrierId,
    pub feeders: Vec<FeederId>,
}

/// 校验并构建整条输送线，接入 feeder 并调度生产/转移/采样事件链。
///
/// feeder 首次生产发生在一个生产周期之后；转移轮询同理。采样器从
/// t=0 开始。
pub fn build_line(
    world: &mut BeltWorld,
    sim: &mut Simulator,
    spec: &LineSpec,
) -> Result<LineHandles, TopoError> {
    validate(spec)?;

    let mut route = Route::with_spacing(&spec.id, spec.min_gap, spec.reference_packet_length);
    for seg in &spec.segments {
        route.add_segment(&seg.id, seg.length, seg.speed);
    }
    let entries: Vec<f64> = spec
        .feeders
        .iter()
        .map(|f| {
            route
                .entry_position(f.connection_segment, f.connection_offset)
                .expect("connection point validated above")
        })
        .collect();
    info!(
        line = %spec.id,
        segments = spec.segments.len(),
        total_length = route.segments().last().map(|s| s.end_offset()).unwrap_or(0.0),
        "🏭 输送线已构建"
    );

    let line = world.plant.add_route(route);
    let mut feeders = Vec::with_capacity(spec.feeders.len());
    for (f, entry) in spec.feeders.iter().zip(entries) {
        let mut feeder = Feeder::new(&f.id, line, f.production_rate, entry, f.max_queue_size)
            .with_poll_interval(SimTime::from_secs_f64(f.poll_interval_secs));
        if let Some(dest) = &f.destination {
            feeder = feeder.with_destination(dest.clone());
        }
        let fid = world.plant.add_feeder(feeder);

        sim.schedule_in(
            world.plant.feeder(fid).production_interval(),
            ProducePacket { feeder: fid },
        );
        sim.schedule_in(
            world.plant.feeder(fid).poll_interval(),
            TransferTick { feeder: fid },
        );
        info!(feeder = %f.id, entry, rate = f.production_rate, "feeder 已接入");
        feeders.push(fid);
    }

    let interval = SimTime::from_secs_f64(spec.simulation.snapshot_interval_secs);
    sim.schedule(SimTime::ZERO, SampleTick { interval });

    Ok(LineHandles { line, feeders })
}
