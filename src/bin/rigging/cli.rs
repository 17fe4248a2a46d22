//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Rigging - composable compiler/linker configuration for C builds
#[derive(Parser)]
#[command(name = "rigging")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the compile/link inputs a config tool contributes
    Flags(FlagsArgs),

    /// Show the resolved variant, paths and file names of a project
    Variant(VariantArgs),
}

/// Config tool backing `rigging flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tool {
    /// sdl2-config
    Sdl,
    /// pkg-config
    PkgConfig,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Config tool to query
    #[arg(long, value_enum, default_value_t = Tool::Sdl)]
    pub tool: Tool,

    /// Package to query (pkg-config only, repeatable)
    #[arg(long = "package", short = 'p')]
    pub packages: Vec<String>,

    /// Request static linking flags
    #[arg(long = "static")]
    pub static_libs: bool,

    /// Override the tool command
    #[arg(long)]
    pub command: Option<String>,

    /// Command types to compose for, in order
    #[arg(long, value_delimiter = ',', default_value = "compile,link")]
    pub types: Vec<String>,

    /// Set a context value for this run (KEY=VALUE, repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Print the composed inputs as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct VariantArgs {
    /// Project name
    #[arg(long, default_value = "project")]
    pub name: String,

    /// Project version
    #[arg(long)]
    pub version: Option<String>,

    /// Explicit variant (overrides context and host detection)
    #[arg(long)]
    pub variant: Option<String>,

    /// Set a context value for this run (KEY=VALUE, repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid KEY=VALUE: `{}`", s)),
    }
}
