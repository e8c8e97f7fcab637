//! 仿真核心模块
//!
//! 事件驱动仿真的核心组件：虚拟时钟、事件、世界与仿真器。
//! 原系统中的协作式进程在这里表达为自我重调度的事件链。

// 子模块声明
mod event;
mod scheduled_event;
mod simulator;
mod time;
mod world;

// 重新导出公共接口
pub use event::Event;
pub use scheduled_event::ScheduledEvent;
pub use simulator::Simulator;
pub use time::SimTime;
pub use world::World;
