use clap::Parser;
use beltsim_rs::belt::{BeltWorld, Carrier};
use beltsim_rs::sim::{SimTime, Simulator};
use beltsim_rs::topo::{build_line, LineSpec};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "line-sim", about = "按 line.json 配置运行输送线仿真")]
struct Args {
    /// 输送线配置文件路径
    #[arg(long)]
    line: PathBuf,

    /// 仿真运行到多少秒；默认取配置里的 duration_secs
    #[arg(long)]
    until_secs: Option<f64>,

    /// 快照日志输出文件（JSON）
    #[arg(long)]
    snapshots_json: Option<PathBuf>,

    /// 打印每个 feeder 的统计
    #[arg(long)]
    stats: bool,
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
    let raw = fs::read_to_string(&args.line).expect("read line spec");
    let spec: LineSpec = serde_json::from_str(&raw).expect("parse line spec");

    let mut sim = Simulator::default();
    let mut world = BeltWorld::default();

    let handles = match build_line(&mut world, &mut sim, &spec) {
        Ok(h) => h,
        Err(err) => {
            eprintln!("invalid line spec: {err}");
            std::process::exit(2);
        }
    };

    let until = SimTime::from_secs_f64(args.until_secs.unwrap_or(spec.simulation.duration_secs));
    sim.run_until(until, &mut world);

    let now = sim.now();
    let line = world.plant.carrier(handles.line);
    println!(
        "done @ {:.1}s, processed={}, in_transit={}, utilization={:.3}",
        now.as_secs_f64(),
        line.total_processed(),
        line.in_transit(),
        line.utilization()
    );

    if args.stats {
        for st in world.plant.feeder_stats(now) {
            println!(
                "feeder {} produced={} transferred={} dropped={} queue={} blocked_secs={:.1} utilization={:.3} rate={:.3}/s blocks={}",
                st.id,
                st.produced,
                st.transferred,
                st.dropped,
                st.queue_len,
                st.blocked_secs,
                st.utilization_rate,
                st.transfer_rate,
                st.block_events
            );
        }
    }

    if let Some(path) = args.snapshots_json {
        let json = serde_json::to_string_pretty(&world.log.snapshots).expect("serialize snapshots");
        fs::write(&path, json).expect("write snapshots json");
        eprintln!("wrote {} snapshots to {}", world.log.snapshots.len(), path.display());
    }
}
