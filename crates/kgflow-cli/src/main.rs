//! kgflow CLI: compile, explain, and validate workflow plans.

use clap::{Args, Parser, Subcommand, ValueEnum};
use kgflow_core::config::RunConfig;
use kgflow_planner::{descriptors_to_yaml, explain, parse_yaml_config, workflows, Plan};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kgflow")]
#[command(about = "Compile knowledge-graph workflow configs into engine step plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// Path to the run configuration YAML (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Workflow to plan
    #[arg(short, long, default_value = kgflow_planner::WORKFLOW_NAME)]
    workflow: String,

    /// Skip entity name embedding (overrides config and env)
    #[arg(long)]
    skip_name_embedding: bool,

    /// Skip entity name+description embedding (overrides config and env)
    #[arg(long)]
    skip_description_embedding: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the step descriptors for a workflow
    Plan {
        #[command(flatten)]
        args: ConfigArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Print the compilation manifest instead of the steps
        #[arg(long)]
        manifest: bool,
    },

    /// Show the plan as a readable step table (EXPLAIN)
    Explain {
        #[command(flatten)]
        args: ConfigArgs,
    },

    /// Load the config, build the plan, and check its invariants
    Validate {
        #[command(flatten)]
        args: ConfigArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            args,
            format,
            manifest,
        } => {
            if let Err(e) = print_plan(&args, format, manifest) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Explain { args } => match compile(&args) {
            Ok((_, plan)) => print!("{}", explain::render(&plan)),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Validate { args } => {
            if let Err(e) = validate_plan(&args) {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
            println!("✓ Plan is valid");
        }
    }
}

fn load_config(args: &ConfigArgs) -> Result<RunConfig, Box<dyn std::error::Error>> {
    let base = match &args.config {
        Some(path) => parse_yaml_config(&fs::read_to_string(path)?)?,
        None => RunConfig::default(),
    };
    let mut config = base.with_env_overrides();
    apply_cli_overrides(&mut config, args);
    Ok(config)
}

/// Flags only ever switch skipping *on*; absence leaves file/env values alone.
fn apply_cli_overrides(config: &mut RunConfig, args: &ConfigArgs) {
    if args.skip_name_embedding {
        config.skip_name_embedding = Some(true);
    }
    if args.skip_description_embedding {
        config.skip_description_embedding = Some(true);
    }
}

fn compile(args: &ConfigArgs) -> Result<(RunConfig, Plan), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let workflow = workflows::find(&args.workflow).ok_or_else(|| {
        format!(
            "unknown workflow '{}' (known: {})",
            args.workflow,
            workflows::names().collect::<Vec<_>>().join(", ")
        )
    })?;
    let plan = workflow.build(&config);
    tracing::info!(
        workflow = workflow.name(),
        steps = plan.len(),
        enabled = plan.enabled_steps().count(),
        "compiled plan"
    );
    Ok((config, plan))
}

fn validate_plan(args: &ConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (_, plan) = compile(args)?;
    plan.validate()?;
    Ok(())
}

fn print_plan(
    args: &ConfigArgs,
    format: OutputFormat,
    manifest: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, plan) = compile(args)?;
    if manifest {
        let m = plan.manifest(&config)?;
        println!("{}", serde_json::to_string_pretty(&m)?);
        return Ok(());
    }

    let descriptors = plan.descriptors();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&descriptors)?),
        OutputFormat::Yaml => print!("{}", descriptors_to_yaml(&descriptors)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_cli_overrides, compile, ConfigArgs, RunConfig};

    #[test]
    fn cli_flags_override_config_values() {
        let mut config = RunConfig {
            skip_name_embedding: Some(false),
            ..Default::default()
        };
        let args = ConfigArgs {
            skip_name_embedding: true,
            ..Default::default()
        };
        apply_cli_overrides(&mut config, &args);
        assert_eq!(config.skip_name_embedding, Some(true));
        assert_eq!(config.skip_description_embedding, None);
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let mut config = RunConfig {
            skip_description_embedding: Some(true),
            ..Default::default()
        };
        apply_cli_overrides(&mut config, &ConfigArgs::default());
        assert_eq!(config.skip_description_embedding, Some(true));
    }

    #[test]
    fn unknown_workflow_is_an_error() {
        let args = ConfigArgs {
            workflow: "create_final_nodes".into(),
            ..Default::default()
        };
        let err = compile(&args).unwrap_err();
        assert!(err.to_string().contains("unknown workflow"));
    }
}
