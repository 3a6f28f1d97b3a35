//! Tick-driven agents planning over a shared waypoint lattice.
//!
//! Each agent uses a different scheduler; every frame each unfinished agent
//! gets one `do_search` call. When all plans settle, the results are
//! checked against an all-pairs table.
//!
//! Run with: `cargo run -p waygraph-demos --bin agents -- --agents 6`

use clap::Parser;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use waygraph_core::NodeId;
use waygraph_demos::{Agent, Planner, waypoint_lattice};
use waygraph_paths::{AllPairsTable, BudgetConfig, SearchStatus};

#[derive(Parser, Debug)]
#[command(version, about = "Waypoint agents planning with budgeted search")]
struct Cli {
    /// Lattice columns.
    #[arg(long, default_value_t = 24)]
    cols: usize,
    /// Lattice rows.
    #[arg(long, default_value_t = 16)]
    rows: usize,
    /// Probability that a lattice link is blocked.
    #[arg(long, default_value_t = 0.15)]
    blocked: f64,
    /// Number of agents.
    #[arg(long, default_value_t = 6)]
    agents: usize,
    /// Search cycles per frame for budgeted agents.
    #[arg(long, default_value_t = 8)]
    budget: usize,
    /// Give up after this many frames.
    #[arg(long, default_value_t = 10_000)]
    frames: usize,
    /// RNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;
    let cli = Cli::parse();
    if cli.cols == 0 || cli.rows == 0 {
        return Err("lattice must have at least one column and one row".into());
    }

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let graph = waypoint_lattice(&mut rng, cli.cols, cli.rows, cli.blocked.clamp(0.0, 1.0))?;
    log::info!(
        "lattice {}x{}: {} waypoints, {} links",
        cli.cols,
        cli.rows,
        graph.len(),
        graph.edge_count()
    );

    let budget = BudgetConfig {
        cycles_per_call: cli.budget.max(1),
    };
    let mut agents = Vec::with_capacity(cli.agents);
    for i in 0..cli.agents {
        let from = NodeId::new(rng.random_range(0..graph.len() as u32));
        let to = NodeId::new(rng.random_range(0..graph.len() as u32));
        let planner = Planner::new(&graph, from, to, i % 3, budget)?;
        log::info!("agent-{i}: {} planner, {from} -> {to}", planner.label());
        agents.push(Agent {
            name: format!("agent-{i}"),
            from,
            to,
            planner,
            frames: 0,
        });
    }

    let mut frame = 0;
    while frame < cli.frames
        && agents
            .iter()
            .any(|a| a.planner.status() == SearchStatus::Running)
    {
        frame += 1;
        for agent in agents.iter_mut() {
            let before = agent.planner.status();
            let now = agent.update()?;
            if before == SearchStatus::Running && now != SearchStatus::Running {
                log::info!(
                    "frame {frame}: {} finished ({now:?}) after {} cycles",
                    agent.name,
                    agent.planner.cycles()
                );
            }
        }
    }

    let table = AllPairsTable::create(&graph)?;
    for agent in &agents {
        let expected = table.cost(agent.from, agent.to);
        match agent.planner.cost() {
            Some(cost) => {
                let hops = agent.planner.solution().map_or(0, <[_]>::len);
                println!(
                    "{:<9} {:<10} {} -> {}: cost {:.2} in {} hops, {} frames, {} cycles",
                    agent.name,
                    agent.planner.label(),
                    agent.from,
                    agent.to,
                    cost,
                    hops,
                    agent.frames,
                    agent.planner.cycles()
                );
                if (cost - expected).abs() > 1e-9 {
                    log::warn!("{}: table says {expected:.2}", agent.name);
                }
            }
            None => {
                println!(
                    "{:<9} {:<10} {} -> {}: {:?} after {} frames",
                    agent.name,
                    agent.planner.label(),
                    agent.from,
                    agent.to,
                    agent.planner.status(),
                    agent.frames
                );
                if table.path_exists(agent.from, agent.to) {
                    log::warn!("{}: table has a path of cost {expected:.2}", agent.name);
                }
            }
        }
    }
    Ok(())
}
