use clap::{Args, Parser, Subcommand};
use cs_app::{
    AppConfig, AppError, AppResult, ConsistService, ErrorKind, TrainCalculation, TrainSummary,
};
use cs_core::{TrainId, WagonId};
use cs_model::{BrakeType, NewWagon, Train, TrainPatch, Wagon, WagonPatch, WagonSpec, WagonType};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(about = "Consist CLI - Compose trains and compute their brake figures", long_about = None)]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the store data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage trains
    #[command(subcommand)]
    Trains(TrainCommands),
    /// Manage the wagons of a train
    #[command(subcommand)]
    Wagons(WagonCommands),
    /// Show length, weight and braking percentage of a train
    Calc {
        train_id: TrainId,
    },
    /// Write every train and wagon to a snapshot file
    Export {
        /// Output path (.json, .yaml or .yml)
        path: PathBuf,
    },
    /// Replace every train and wagon with a snapshot file
    Import {
        /// Input path (.json, .yaml or .yml)
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum TrainCommands {
    /// List trains, newest first
    List,
    /// Show one train with its wagons and calculation
    Show { train_id: TrainId },
    /// Create a train
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Rename a train or change its description
    Update {
        train_id: TrainId,
        #[arg(long)]
        name: Option<String>,
        /// Empty string clears the description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a train and all of its wagons
    Delete { train_id: TrainId },
}

#[derive(Subcommand)]
enum WagonCommands {
    /// List the wagons of a train in position order
    List { train_id: TrainId },
    /// Add a wagon, appended unless a position is given
    Add {
        train_id: TrainId,
        #[arg(short, long)]
        position: Option<u32>,
        #[command(flatten)]
        spec: WagonSpecArgs,
    },
    /// Change wagon attributes or move it to another position
    Update {
        train_id: TrainId,
        wagon_id: WagonId,
        #[arg(short, long)]
        position: Option<u32>,
        #[command(flatten)]
        patch: WagonPatchArgs,
    },
    /// Delete a wagon
    Delete {
        train_id: TrainId,
        wagon_id: WagonId,
    },
    /// Insert copies of a wagon directly behind it
    Clone {
        train_id: TrainId,
        wagon_id: WagonId,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the full wagon order, front to back
    Reorder {
        train_id: TrainId,
        #[arg(required = true, num_args = 1..)]
        wagon_ids: Vec<WagonId>,
    },
}

#[derive(Args)]
struct WagonSpecArgs {
    #[arg(long)]
    identifier: Option<String>,
    /// Length in metres
    #[arg(long)]
    length: f64,
    /// Tare weight in tonnes
    #[arg(long)]
    tare: f64,
    /// Load weight in tonnes
    #[arg(long, default_value_t = 0.0)]
    load: f64,
    /// Braked weight in tonnes
    #[arg(long)]
    braked: f64,
    #[arg(long, default_value = "P")]
    brake_type: BrakeType,
    #[arg(long)]
    axles: Option<u32>,
    #[arg(long, default_value = "passenger")]
    wagon_type: WagonType,
}

impl WagonSpecArgs {
    fn into_spec(self) -> WagonSpec {
        WagonSpec {
            identifier: self.identifier,
            length_m: self.length,
            tare_weight_t: self.tare,
            load_weight_t: self.load,
            braked_weight_t: self.braked,
            brake_type: self.brake_type,
            axle_count: self.axles,
            wagon_type: self.wagon_type,
        }
    }
}

#[derive(Args)]
struct WagonPatchArgs {
    /// Empty string clears the identifier
    #[arg(long)]
    identifier: Option<String>,
    #[arg(long)]
    length: Option<f64>,
    #[arg(long)]
    tare: Option<f64>,
    #[arg(long)]
    load: Option<f64>,
    #[arg(long)]
    braked: Option<f64>,
    #[arg(long)]
    brake_type: Option<BrakeType>,
    #[arg(long)]
    axles: Option<u32>,
    #[arg(long)]
    wagon_type: Option<WagonType>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => return report(err),
    };
    init_tracing(&config);
    info!(
        backend = ?config.store.backend,
        data_dir = %config.store.data_dir.display(),
        "cs-cli starting"
    );

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

fn load_config(cli: &Cli) -> AppResult<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.store.data_dir = dir.clone();
    }
    Ok(config)
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::InvalidArgument => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::InvalidPosition => 4,
        ErrorKind::InvalidReorder => 5,
        ErrorKind::Storage => 6,
        ErrorKind::Config => 7,
    }
}

fn report(err: AppError) -> ExitCode {
    debug!(kind = ?err.kind(), "command failed");
    eprintln!("Error: {}", err);
    ExitCode::from(exit_code(err.kind()))
}

fn run(cli: Cli, config: &AppConfig) -> AppResult<()> {
    let service = ConsistService::open(config)?;
    let out = Output { json: cli.json };

    match cli.command {
        Commands::Trains(cmd) => match cmd {
            TrainCommands::List => cmd_trains_list(&service, &out),
            TrainCommands::Show { train_id } => cmd_train_show(&service, &out, train_id),
            TrainCommands::Create { name, description } => {
                let train = service.create_train(name, description)?;
                out.train(&train)
            }
            TrainCommands::Update {
                train_id,
                name,
                description,
            } => {
                let train = service.update_train(train_id, TrainPatch { name, description })?;
                out.train(&train)
            }
            TrainCommands::Delete { train_id } => {
                service.delete_train(train_id)?;
                out.done(&format!("Deleted train {}", train_id))
            }
        },
        Commands::Wagons(cmd) => match cmd {
            WagonCommands::List { train_id } => {
                let wagons = service.list_wagons(train_id)?;
                out.wagons(&wagons)
            }
            WagonCommands::Add {
                train_id,
                position,
                spec,
            } => {
                let wagon = service.create_wagon(
                    train_id,
                    NewWagon {
                        position,
                        spec: spec.into_spec(),
                    },
                )?;
                out.wagons(std::slice::from_ref(&wagon))
            }
            WagonCommands::Update {
                train_id,
                wagon_id,
                position,
                patch,
            } => {
                let patch = WagonPatch {
                    position,
                    identifier: patch.identifier,
                    length_m: patch.length,
                    tare_weight_t: patch.tare,
                    load_weight_t: patch.load,
                    braked_weight_t: patch.braked,
                    brake_type: patch.brake_type,
                    axle_count: patch.axles,
                    wagon_type: patch.wagon_type,
                };
                let wagon = service.update_wagon(train_id, wagon_id, patch)?;
                out.wagons(std::slice::from_ref(&wagon))
            }
            WagonCommands::Delete { train_id, wagon_id } => {
                service.delete_wagon(train_id, wagon_id)?;
                out.done(&format!("Deleted wagon {} from train {}", wagon_id, train_id))
            }
            WagonCommands::Clone {
                train_id,
                wagon_id,
                quantity,
            } => {
                let quantity = config.clamp_clone_quantity(quantity);
                let copies = service.clone_wagon(train_id, wagon_id, quantity)?;
                out.wagons(&copies)
            }
            WagonCommands::Reorder {
                train_id,
                wagon_ids,
            } => {
                let wagons = service.reorder_wagons(train_id, &wagon_ids)?;
                out.wagons(&wagons)
            }
        },
        Commands::Calc { train_id } => {
            let calc = service.get_calculation(train_id)?;
            if out.json {
                return out.print_json(&calc);
            }
            println!("Length:     {:>10.2} m", calc.train_length_m);
            println!("Weight:     {:>10.2} t", calc.train_weight_t);
            println!("Braking:    {:>10.2} %", calc.braking_percentage);
            Ok(())
        }
        Commands::Export { path } => cmd_export(&service, &out, &path),
        Commands::Import { path } => cmd_import(&service, &out, &path),
    }
}

fn cmd_trains_list(service: &ConsistService, out: &Output) -> AppResult<()> {
    let summaries = service.list_train_summaries()?;
    if out.json {
        let trains: Vec<&Train> = summaries.iter().map(|s| &s.train).collect();
        return out.print_json(&trains);
    }

    if summaries.is_empty() {
        println!("No trains found");
    } else {
        println!("Trains:");
        for TrainSummary {
            train,
            wagon_count,
            calculation,
        } in &summaries
        {
            println!(
                "  {} - {} ({} wagons, {:.2} m, {:.2} t, {:.2} %)",
                train.id,
                train.name,
                wagon_count,
                calculation.train_length_m,
                calculation.train_weight_t,
                calculation.braking_percentage
            );
        }
    }
    Ok(())
}

fn cmd_train_show(service: &ConsistService, out: &Output, train_id: TrainId) -> AppResult<()> {
    let train = service.get_train(train_id)?;
    let wagons = service.list_wagons(train_id)?;
    let calc = service.get_calculation(train_id)?;

    if out.json {
        #[derive(Serialize)]
        struct TrainView<'a> {
            train: &'a Train,
            wagons: &'a [Wagon],
            calculation: TrainCalculation,
        }
        return out.print_json(&TrainView {
            train: &train,
            wagons: &wagons,
            calculation: calc,
        });
    }

    out.train(&train)?;
    out.wagons(&wagons)?;
    println!(
        "  Total: {:.2} m, {:.2} t, braking {:.2} %",
        calc.train_length_m, calc.train_weight_t, calc.braking_percentage
    );
    Ok(())
}

fn cmd_export(service: &ConsistService, out: &Output, path: &Path) -> AppResult<()> {
    let snapshot = service.export_snapshot(path)?;
    out.done(&format!(
        "✓ Exported {} trains and {} wagons to {}",
        snapshot.trains.len(),
        snapshot.wagons.len(),
        path.display()
    ))
}

fn cmd_import(service: &ConsistService, out: &Output, path: &Path) -> AppResult<()> {
    let snapshot = service.import_snapshot(path)?;
    out.done(&format!(
        "✓ Imported {} trains and {} wagons from {}",
        snapshot.trains.len(),
        snapshot.wagons.len(),
        path.display()
    ))
}

struct Output {
    json: bool,
}

impl Output {
    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> AppResult<()> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| AppError::Storage(format!("Failed to serialize output: {}", e)))?;
        println!("{}", text);
        Ok(())
    }

    fn done(&self, message: &str) -> AppResult<()> {
        if self.json {
            return self.print_json(&serde_json::json!({ "message": message }));
        }
        println!("{}", message);
        Ok(())
    }

    fn train(&self, train: &Train) -> AppResult<()> {
        if self.json {
            return self.print_json(train);
        }
        println!("Train {}: {}", train.id, train.name);
        if let Some(description) = &train.description {
            println!("  {}", description);
        }
        println!(
            "  created {}, updated {}",
            train.created_at.to_rfc3339(),
            train.updated_at.to_rfc3339()
        );
        Ok(())
    }

    fn wagons(&self, wagons: &[Wagon]) -> AppResult<()> {
        if self.json {
            return self.print_json(wagons);
        }
        if wagons.is_empty() {
            println!("  (no wagons)");
            return Ok(());
        }
        println!(
            "  {:>4}  {:>6}  {:<20} {:<12} {:>8} {:>8} {:>8} {:>8}  {}",
            "pos", "id", "identifier", "type", "length", "tare", "load", "braked", "brake"
        );
        for w in wagons {
            println!(
                "  {:>4}  {:>6}  {:<20} {:<12} {:>8.2} {:>8.2} {:>8.2} {:>8.2}  {}",
                w.position,
                w.id.to_string(),
                w.spec.identifier.as_deref().unwrap_or("-"),
                w.spec.wagon_type.as_str(),
                w.spec.length_m,
                w.spec.tare_weight_t,
                w.spec.load_weight_t,
                w.spec.braked_weight_t,
                w.spec.brake_type
            );
        }
        Ok(())
    }
}
