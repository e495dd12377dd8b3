use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigFileOpts {
    #[arg(
        long,
        help = "Specify path/filename of the TOML config file (default: ./repodoc.toml).",
        value_name = "CONFIG_FILE",
        help_heading = "Project Setup"
    )]
    pub config_file: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct StoreOpts {
    #[clap(flatten)]
    pub config: ConfigFileOpts,

    #[arg(
        long,
        help = "Artifact directory, overrides the configured one [default: outputs].",
        value_name = "DIR",
        help_heading = "Project Setup"
    )]
    pub output_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate browsable documentation from a repository.",
    long_about = "repodoc walks a repository, filters it through gitignore-style rules, reads every \nsurviving file and assembles a single document (project metadata, directory tree, \nfile contents, statistics) as JSON or Markdown. Saved artifacts live in an output \ndirectory and can be listed, shown and deleted.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  repodoc generate ./my-app --save\n  repodoc generate -f json -o docs.json\n  repodoc list\n  repodoc render docs.json -o docs.md",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        visible_alias = "gen",
        about = "Generate documentation for a repository."
    )]
    Generate(GenerateArgs),

    #[command(
        visible_alias = "r",
        about = "Render a saved JSON document as Markdown."
    )]
    Render(RenderArgs),

    #[command(
        visible_alias = "ls",
        about = "List saved artifacts in the output directory."
    )]
    List(ListArgs),

    #[command(visible_alias = "s", about = "Print the content of a saved artifact.")]
    Show(ShowArgs),

    #[command(
        visible_alias = "rm",
        about = "Delete a saved artifact and its file on disk."
    )]
    Delete(DeleteArgs),

    #[command(about = "Show or initialize the configuration file.")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        value_name = "PATH",
        default_value = ".",
        help = "Repository directory to document."
    )]
    pub path: PathBuf,

    #[clap(flatten)]
    pub store: StoreOpts,

    #[arg(short = 'f', long, help = "Set the output format.", value_name = "FORMAT", value_parser = ["json", "markdown", "md"], help_heading = "Output Formatting")]
    pub format: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the rendered document to FILE instead of stdout.",
        conflicts_with = "save",
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 's',
        long,
        help = "Save JSON and Markdown artifacts to the output directory.",
        help_heading = "Output Control"
    )]
    pub save: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[arg(value_name = "DOCUMENT", help = "Path to a saved JSON document.")]
    pub document: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the Markdown to FILE instead of stdout.",
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[clap(flatten)]
    pub store: StoreOpts,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[arg(value_name = "ID", help = "Artifact id, as printed by 'repodoc list'.")]
    pub id: String,

    #[clap(flatten)]
    pub store: StoreOpts,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    #[arg(value_name = "ID", help = "Artifact id, as printed by 'repodoc list'.")]
    pub id: String,

    #[clap(flatten)]
    pub store: StoreOpts,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[clap(flatten)]
    pub config: ConfigFileOpts,

    #[arg(
        long,
        help = "Write a default configuration file instead of printing the effective one."
    )]
    pub init: bool,
}
