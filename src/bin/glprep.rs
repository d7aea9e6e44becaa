//! glprep CLI - resolve OpenGL registry requirements and emit the prepared IR
//!
//! Options come from an optional YAML config file; flags given on the command
//! line take precedence over the file.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use glprep::{
    pipeline, serialization, Case, FeatureApi, FeatureVersion, GeneratorOptions, OutputFormat,
    Profile, Registry,
};

#[derive(Parser)]
#[command(name = "glprep")]
#[command(about = "Resolve OpenGL registry requirements and emit a binding IR", long_about = None)]
struct Cli {
    /// Path to the registry document (gl.xml)
    #[arg(long)]
    spec_file: PathBuf,

    /// Target API; repeat for several targets (gl, gles1, gles2, glsc2)
    #[arg(long = "api")]
    apis: Vec<FeatureApi>,

    /// Target version for the API in the same position, e.g. 3.3
    #[arg(long = "version")]
    versions: Vec<FeatureVersion>,

    /// Only keep what every target requires
    #[arg(long)]
    intersect_features: bool,

    /// Profile to resolve for (core, compatibility)
    #[arg(long)]
    profile: Option<Profile>,

    /// Case of enum names (initial, snake_case, camelCase, PascalCase, UPPER_CASE)
    #[arg(long)]
    enum_case: Option<Case>,

    /// Case of command names
    #[arg(long)]
    function_case: Option<Case>,

    /// Case of enum value names
    #[arg(long)]
    enum_value_case: Option<Case>,

    /// Strip the gl/GL_ prefix from names
    #[arg(long)]
    omit_prefix: bool,

    #[arg(long)]
    enum_namespace: Option<String>,

    #[arg(long)]
    command_namespace: Option<String>,

    /// YAML file with default options
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Output format (json, ndjson)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    /// Load the config file, if any, and apply the command line on top
    fn options(&self) -> Result<GeneratorOptions, glprep::Error> {
        let mut options = match &self.config_file {
            Some(path) => GeneratorOptions::from_file(path)?,
            None => GeneratorOptions::default(),
        };

        let naming = &mut options.naming;
        if let Some(case) = self.enum_case {
            naming.enum_case = case;
        }
        if let Some(case) = self.function_case {
            naming.function_case = case;
        }
        if let Some(case) = self.enum_value_case {
            naming.enum_value_case = case;
        }
        if self.omit_prefix {
            naming.omit_prefix = true;
        }
        if let Some(namespace) = &self.enum_namespace {
            naming.enum_namespace = namespace.clone();
        }
        if let Some(namespace) = &self.command_namespace {
            naming.command_namespace = namespace.clone();
        }

        let targets = &mut options.targets;
        if !self.apis.is_empty() {
            targets.apis = self.apis.clone();
        }
        if !self.versions.is_empty() {
            targets.versions = self.versions.clone();
        }
        if self.intersect_features {
            targets.intersect_features = true;
        }
        if let Some(profile) = self.profile {
            targets.profile = profile;
        }

        if let Some(format) = self.format {
            options.output.format = format;
        }
        if let Some(path) = &self.output {
            options.output.path = Some(path.clone());
        }

        Ok(options)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), glprep::Error> {
    let options = cli.options()?;
    pipeline::check_preconditions(&options)?;

    let registry = Registry::from_file(&cli.spec_file)?;
    let result = pipeline::parse_spec(&registry, &options)?;

    serialization::write_output(
        &result,
        options.output.format,
        options.output.path.as_deref(),
    )?;
    Ok(())
}
