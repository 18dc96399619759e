mod app;
mod components;
mod config;
mod enemy;
mod engine;
mod error;
mod fsm;
mod input_actions;
mod scene;
mod systems;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use app::SimApp;
use clap::Parser;
use components::LocalTransform;
use config::SimConfig;
use enemy::Enemy;
use engine::time::FrameTimer;
use error::GameError;
use hecs::World;
use input_actions::InputActionAsset;
use scene::arena::load_arena;

#[derive(Parser)]
#[command(name = "grunt", about = "Headless enemy AI arena")]
struct Args {
    /// Simulation settings (TOML)
    #[arg(long, default_value = "config/arena.toml")]
    config: PathBuf,

    /// Input action asset (TOML). Built-in player controls when omitted.
    #[arg(long)]
    actions: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 1800)]
    frames: u32,

    /// Pace frames with the wall clock instead of a constant step
    #[arg(long)]
    realtime: bool,

    /// Print the built-in input action asset as TOML and exit
    #[arg(long)]
    dump_actions: bool,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = Args::parse();

    if let Err(err) = run(args) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), GameError> {
    if args.dump_actions {
        print!("{}", InputActionAsset::default_player().to_toml_string()?);
        return Ok(());
    }

    let config = SimConfig::load_from_file(&args.config)?;
    log::info!("loaded {}", args.config.display());

    let actions = match &args.actions {
        Some(path) => InputActionAsset::load_from_file(path)?,
        None => InputActionAsset::default_player(),
    };

    let mut world = World::new();
    let player = load_arena(&mut world, &config)?;
    let frame_dt = config.world.frame_dt;
    let mut app = SimApp::new(world, player, config, actions);

    let stats = if args.realtime {
        let mut timer = FrameTimer::realtime();
        let mut frames = 0;
        while frames < args.frames && app.enemies_alive() > 0 {
            app.frame(timer.tick());
            thread::sleep(Duration::from_secs_f32(frame_dt));
            frames += 1;
        }
        app.stats().clone()
    } else {
        let mut timer = FrameTimer::fixed(frame_dt);
        app.run(&mut timer, args.frames)
    };

    log::info!(
        "{} frames, {} fixed steps, {} attacks, {} hits, {} kills, {} enemies left",
        stats.frames,
        stats.fixed_steps,
        stats.attacks,
        stats.hits,
        stats.kills,
        app.enemies_alive()
    );
    report(&app);
    Ok(())
}

fn report(app: &SimApp) {
    let world = app.world();
    if let Ok(local) = world.get::<&LocalTransform>(app.player()) {
        log::info!("player ended at {:?}", local.position);
    }
    for (entity, enemy) in world.query::<&Enemy>().iter() {
        log::info!(
            "enemy {:?}: {:?} for {:.2}s, health {}, facing {:?}",
            entity,
            enemy.current_state(),
            enemy.fsm().elapsed(),
            enemy.health(),
            enemy.data.transform.forward()
        );
    }
}
