//! 单段输送带仿真
//!
//! 运行单段输送带加单 feeder 的最小示例

use clap::Parser;
use beltsim_rs::belt::{BeltWorld, Carrier};
use beltsim_rs::sim::{SimTime, Simulator};
use beltsim_rs::topo::{build_single_belt, SingleBeltOpts};

#[derive(Debug, Parser)]
#[command(name = "single-belt", about = "单段输送带仿真：一个 feeder 从带头投放")]
struct Args {
    /// 输送带长度（米）
    #[arg(long, default_value_t = 20.0)]
    length: f64,
    /// 带速（米/秒）
    #[arg(long, default_value_t = 0.5)]
    speed: f64,
    /// 生产速率（包裹/秒）
    #[arg(long, default_value_t = 0.2)]
    rate: f64,
    #[arg(long, default_value_t = 100)]
    max_queue: usize,
    /// 仿真运行到多少秒
    #[arg(long, default_value_t = 120.0)]
    until_secs: f64,
}

fn main() {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut sim = Simulator::default();
    let mut world = BeltWorld::default();

    let opts = SingleBeltOpts {
        length: args.length,
        speed: args.speed,
        production_rate: args.rate,
        max_queue_size: args.max_queue,
        ..SingleBeltOpts::default()
    };
    let (belt, feeder) = build_single_belt(&mut world, &mut sim, &opts);

    sim.run_until(SimTime::from_secs_f64(args.until_secs), &mut world);

    let now = sim.now();
    let stats = world.plant.feeder(feeder).stats(now);
    let carrier = world.plant.carrier(belt);
    println!(
        "done @ {:.1}s, produced={}, transferred={}, processed={}, in_transit={}, queue={}",
        now.as_secs_f64(),
        stats.produced,
        stats.transferred,
        carrier.total_processed(),
        carrier.in_transit(),
        stats.queue_len
    );
}
