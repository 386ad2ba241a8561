//! jujugui-config CLI - Render the Juju GUI configuration script
//!
//! # Commands
//!
//! ```bash
//! jujugui-config render --params deploy.json      # Render config.js to stdout
//! jujugui-config render --uuid $UUID -o config.js # Override one value, write a file
//! jujugui-config inspect config.js                # Show parameters of a rendered file
//! jujugui-config check config.js                  # Validate a rendered file
//! jujugui-config serve --port 8080                # Serve /config.js over HTTP
//! ```
//!
//! Parameters come from `--params`, then `JUJUGUI_*` environment variables
//! (a `.env` file is loaded first), then flags.

use clap::{Args, Parser, Subcommand};
use jujugui_config::api::logs::{log_info_indent, log_warning};
use jujugui_config::{
    check_rendered, lint, parse, ConfigRenderer, DeploymentParameters, ParamsBuilder,
    ValidationError, DEFAULT_GLOBAL,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jujugui-config")]
#[command(about = "Render the juju_config script for the Juju GUI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the configuration script
    Render {
        #[command(flatten)]
        params: ParamArgs,

        /// Global variable to declare
        #[arg(long, default_value = DEFAULT_GLOBAL)]
        global: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the parameters of a rendered script
    Inspect {
        /// Rendered config.js file
        input: PathBuf,
    },

    /// Validate a rendered script against the configuration schema
    Check {
        /// Rendered config.js file
        input: PathBuf,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        #[command(flatten)]
        params: ParamArgs,

        /// Global variable to declare
        #[arg(long, default_value = DEFAULT_GLOBAL)]
        global: String,
    },
}

/// Deployment parameter flags shared by `render` and `serve`.
#[derive(Args)]
struct ParamArgs {
    /// JSON file with deployment parameters
    #[arg(long = "params")]
    params_file: Option<PathBuf>,

    /// Base URL path of the GUI
    #[arg(long)]
    base: Option<String>,

    /// URL of static assets
    #[arg(long)]
    static_url: Option<String>,

    /// Juju core version
    #[arg(long = "juju-version")]
    version: Option<String>,

    /// Environment UUID
    #[arg(long)]
    uuid: Option<String>,

    /// API host as hostname:port
    #[arg(long)]
    host: Option<String>,

    /// Controller socket path template
    #[arg(long)]
    controller_socket: Option<String>,

    /// Model socket path template
    #[arg(long)]
    socket: Option<String>,
}

impl ParamArgs {
    /// Merge file, environment and flags, then warn about odd values.
    fn resolve(self) -> Result<DeploymentParameters, Box<dyn std::error::Error>> {
        let file_layer = match &self.params_file {
            Some(path) => {
                eprintln!("📄 Parameters: {}", path.display());
                ParamsBuilder::from_file(path)?
            }
            None => ParamsBuilder::new(),
        };

        let mut flags = ParamsBuilder::new();
        for (key, value) in [
            ("base", self.base),
            ("staticURL", self.static_url),
            ("version", self.version),
            ("uuid", self.uuid),
            ("host", self.host),
            ("controllerSocket", self.controller_socket),
            ("socket", self.socket),
        ] {
            if let Some(value) = value {
                flags.set(key, value);
            }
        }

        let params = file_layer
            .merge(ParamsBuilder::from_env())
            .merge(flags)
            .build()?;

        for warning in lint(&params) {
            log_warning(warning);
        }

        Ok(params)
    }
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            params,
            global,
            output,
        } => cmd_render(params, &global, output.as_deref()),

        Commands::Inspect { input } => cmd_inspect(&input),

        Commands::Check { input } => cmd_check(&input),

        Commands::Serve {
            port,
            params,
            global,
        } => cmd_serve(port, params, &global).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_render(
    params: ParamArgs,
    global: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let params = params.resolve()?;
    let script = ConfigRenderer::with_global(global)?.render(&params)?;
    write_output(&script, output)?;
    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔍 Inspecting: {}", input.display());

    let content = fs::read_to_string(input)?;
    let config = parse(&content)?;
    let params = config.parameters()?;

    println!("Global: {}", config.global);
    for (key, value) in params.fields() {
        println!("  {:<17} {}", format!("{}:", key), value);
    }
    println!();
    println!("Model socket:      {}", params.model_socket_url());
    println!("Controller socket: {}", params.controller_socket_url());

    let mismatches = config.fixed_field_mismatches();
    if !mismatches.is_empty() {
        eprintln!("\n⚠️  Constant fields changed: {}", mismatches.join(", "));
    }

    Ok(())
}

fn cmd_check(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Checking: {}", input.display());

    let content = fs::read_to_string(input)?;
    match check_rendered(&content) {
        Ok(config) => {
            eprintln!("✅ Valid configuration ({})", config.global);
            Ok(())
        }
        Err(ValidationError::SchemaError { errors }) => {
            eprintln!("\n❌ {} schema error(s):", errors.len());
            for err in &errors {
                log_info_indent(err.as_str(), 1);
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn cmd_serve(
    port: u16,
    params: ParamArgs,
    global: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let renderer = ConfigRenderer::with_global(global)?;
    let params = params.resolve()?;
    let state = jujugui_config::server::AppState::new(params, renderer);
    jujugui_config::server::start_server(port, state).await?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
