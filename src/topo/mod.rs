//! 拓扑构建模块
//!
//! 外部配置面：从 serde 配置构建输送线/输送带与 feeder，并调度它们的
//! 事件链。所有拓扑校验在构造任何核心实体之前完成；核心本身假设拓扑
//! 合法（例如没有零长 segment）。

pub mod line;
pub mod single;

pub use line::{
    build_line, FeederSpec, LineHandles, LineSpec, SegmentSpec, SimulationSpec, TopoError,
};
pub use single::{build_single_belt, SingleBeltOpts};
