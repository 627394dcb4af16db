//! Binary entrypoint for the mudcore CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml` and world seed
//! - `check` - load the world seed and report integrity problems
//! - `console --name <player>` - play a local session on stdin/stdout
//!
//! See the library crate docs for module-level details: `mudcore::`.
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use mudcore::config::Config;
use mudcore::metrics;
use mudcore::mud::{
    load_world_seed, ChannelOutput, Dispatcher, GameContext, MudStore, Output, PlayerSaver, Settings, World,
};

const STARTER_SEED: &str = include_str!("../data/world.json");

#[derive(Parser)]
#[command(name = "mudcore")]
#[command(about = "Command interpreter for a text MUD")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration and starter world seed
    Init,
    /// Load the world seed and report dangling exits and misplaced things
    Check,
    /// Play a local session on this terminal
    Console {
        /// Player name to log in as
        #[arg(short, long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(&None, cli.verbose);
            info!("Initializing new mudcore configuration");
            if Path::new(&cli.config).exists() {
                warn!("{} already exists; leaving it alone", cli.config);
            } else {
                Config::create_default(&cli.config).await?;
                info!("Configuration file created at {}", cli.config);
            }

            let config = Config::load(&cli.config).await?;
            let seed_path = Path::new(&config.world.seed_path);
            if seed_path.exists() {
                warn!("{} already exists; leaving it alone", seed_path.display());
            } else {
                if let Some(parent) = seed_path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(seed_path, STARTER_SEED)
                    .await
                    .with_context(|| format!("writing {}", seed_path.display()))?;
                info!("Starter world written to {}", seed_path.display());
            }
        }
        Commands::Check => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            config.validate()?;
            let seed = load_world_seed(&config.world.seed_path)
                .with_context(|| format!("loading world seed {}", config.world.seed_path))?;
            let mut problems = seed.check();
            if !seed.rooms.iter().any(|r| r.id == config.world.start_room) {
                problems.push(format!("start room {} is not in the seed", config.world.start_room));
            }
            println!(
                "{}: {} rooms, {} item templates, {} npcs",
                config.world.seed_path,
                seed.rooms.len(),
                seed.items.len(),
                seed.npcs.len()
            );
            if problems.is_empty() {
                println!("No problems found.");
            } else {
                for problem in &problems {
                    println!("  - {}", problem);
                }
                bail!("{} problem(s) in {}", problems.len(), config.world.seed_path);
            }
        }
        Commands::Console { name } => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            config.validate()?;
            run_console(config, &name).await?;
        }
    }

    Ok(())
}

async fn run_console(config: Config, name: &str) -> Result<()> {
    info!("Starting mudcore v{}", env!("CARGO_PKG_VERSION"));
    let seed = load_world_seed(&config.world.seed_path)
        .with_context(|| format!("loading world seed {}", config.world.seed_path))?;
    for problem in seed.check() {
        warn!("seed: {}", problem);
    }
    let world = Arc::new(seed.build_world());
    if world.room(&config.world.start_room).is_none() {
        bail!("start room {} is not in the world", config.world.start_room);
    }

    let store = MudStore::open(&config.storage.data_dir)
        .with_context(|| format!("opening player store {}", config.storage.data_dir))?;
    let mut record = store.load_or_create(name, &config.world.start_room)?;
    if world.room(&record.location).is_none() {
        warn!("{} was in missing room {}; moving to start", name, record.location);
        record.location = config.world.start_room.clone();
    }
    let carried = store.carried_items(&record)?;
    world.restore_carried(&mut record, carried);

    let (output, mut rx) = ChannelOutput::channel();
    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(text) = rx.recv().await {
            if stdout.write_all(text.as_bytes()).await.is_err() {
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    let output: Arc<dyn Output> = Arc::new(output);
    world.add_player(record, Arc::clone(&output))?;
    let store = Arc::new(store);
    let ctx = GameContext::new(Arc::clone(&world))
        .with_saver(Arc::clone(&store) as Arc<dyn PlayerSaver>)
        .with_settings(Settings::from(&config));
    let dispatcher = Dispatcher::with_builtin_commands(Arc::new(ctx));

    dispatcher.force_look(name);
    send_prompt(&world, name);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut quit = false;
    while let Some(line) = lines.next_line().await? {
        let result = dispatcher.dispatch(&line, name);
        if !result.keeps_session() {
            quit = true;
            break;
        }
        send_prompt(&world, name);
    }

    if quit {
        // `quit` takes the player offline once its save lands.
        for _ in 0..100 {
            if world.player(name).is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        if world.remove_player(name).is_some() {
            warn!("save for {} did not complete in time", name);
        }
    } else {
        let carried = world.carried_items(name);
        if let Some(record) = world.remove_player(name) {
            info!("{} disconnected; saving", name);
            let store = Arc::clone(&store);
            tokio::task::spawn_blocking(move || store.put_player_with_items(record, &carried)).await??;
        }
    }

    drop(output);
    drop(dispatcher);
    drop(world);
    let _ = printer.await;

    let stats = metrics::snapshot();
    info!(
        "session over: {} commands, {} moves, {} rejected, {} handler failures",
        stats.dispatched,
        stats.moves,
        stats.rejected_total(),
        stats.handler_failures
    );
    Ok(())
}

fn send_prompt(world: &World, name: &str) {
    if let (Some(player), Some(out)) = (world.player(name), world.output(name)) {
        out.prompt(&player.prompt());
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity wins over the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| std::fs::OpenOptions::new().create(true).append(true).open(path).ok());

    match log_file {
        Some(f) => {
            let file = std::sync::Mutex::new(f);
            // Only echo to the console when someone is watching stderr.
            let is_tty = atty::is(atty::Stream::Stderr);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = file.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}
