use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use engine::prelude::*;

mod autopilot;
mod view;

pub const GAME_NAME: &str = "delve";

/// Seconds simulated per tick in autopilot runs.
const TICK: f32 = 0.1;

#[derive(Parser, Debug)]
#[command(name = GAME_NAME, about = "Dungeon crawler simulation", version)]
struct Args {
    /// Run seed, random if not given.
    #[arg(long, global = true)]
    seed: Option<u32>,

    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a generated level with its spawns.
    Map {
        #[arg(long, default_value_t = 1)]
        depth: u32,
    },

    /// Let an autopilot play and print where it ended up.
    Run {
        /// Number of simulation ticks to run.
        #[arg(long, default_value_t = 3000)]
        ticks: u32,

        /// Stop when the autopilot reaches this depth.
        #[arg(long)]
        depth: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed: {seed}");

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match args.command {
        Command::Map { depth } => {
            let data = Data::get();
            let dungeon = Dungeon::generate(seed, depth, &config.dungeon, data)
                .with_context(|| format!("generating depth {depth}"))?;
            print!("{}", view::dungeon_map(&dungeon, data));
        }
        Command::Run { ticks, depth } => run(seed, config, ticks, depth)?,
    }
    Ok(())
}

fn run(
    seed: u32,
    config: Config,
    ticks: u32,
    goal: Option<u32>,
) -> anyhow::Result<()> {
    let scale = config.scale()?;
    let mut rt = Runtime::new(seed, config, Data::get().clone())?;
    let events = rt.subscribe();

    for _ in 0..ticks {
        if rt.status() != ScenarioStatus::Ongoing
            || goal.is_some_and(|d| rt.depth() >= d)
        {
            break;
        }

        let input = autopilot::drive(&rt, &scale);
        rt.step(&input, TICK)?;

        for e in events.try_iter() {
            match e {
                Event::Footstep { turn } => log::debug!("turn {turn}"),
                e => log::info!("{e:?}"),
            }
        }
    }

    print!("{}", view::fog_view(&rt.snapshot(), Data::get()));
    if rt.status() == ScenarioStatus::Lost {
        println!("The autopilot died.");
    }
    Ok(())
}
