use clap::{Parser, Subcommand};
use pkgmeta::commands::config::{self, ConfigAction};
use pkgmeta::commands::read::{self, ReadCommand};
use pkgmeta::common::{init_tracing, GlobalOpts};
use pkgmeta_logger as logger;

#[derive(Parser)]
#[command(name = "pkgmeta")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Read Python package metadata without running setup.py",
    long_about = "pkgmeta recovers name, version and dependency declarations from setup.py \
                  and setup.cfg by static analysis, optionally falling back to the project's \
                  build backend."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read package metadata from a project directory
    Read(ReadCommand),
    /// Inspect or edit pkgmeta configuration
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.global.verbosity_level(), cli.global.quiet) {
        eprintln!("warning: Failed to initialize logger: {}", e);
    }
    init_tracing(&cli.global);

    let result = match cli.command {
        Commands::Read(cmd) => read::handle_read(cmd, &cli.global),
        Commands::Config { action } => config::handle_config(action, &cli.global),
    };

    if let Err(e) = result {
        logger::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
