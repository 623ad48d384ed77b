use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lookbook::{BuildOpts, CatalogBuilder};

#[derive(Parser, Debug)]
#[command(name = "lookbook", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose one catalog page per product group found in the input directory.
    Build(BuildArgs),
    /// Print the grouping plan for the input directory as JSON.
    Groups(GroupsArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Input directory containing product images.
    #[arg(long, default_value = "./product_pictures")]
    input: PathBuf,

    /// Output directory for catalog pages.
    #[arg(long, default_value = "./new_catalog")]
    output: PathBuf,

    /// Directory holding the brand mark bitmap and bundled fonts.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Abort on the first failed product group instead of skipping it.
    #[arg(long, default_value_t = false)]
    fail_fast: bool,
}

#[derive(Parser, Debug)]
struct GroupsArgs {
    /// Input directory containing product images.
    #[arg(long, default_value = "./product_pictures")]
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Groups(args) => cmd_groups(args),
    }
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let builder = CatalogBuilder {
        opts: BuildOpts {
            assets_dir: args.assets,
            fail_fast: args.fail_fast,
        },
        ..CatalogBuilder::default()
    };

    let stats = builder.build(&args.input, &args.output)?;
    eprintln!(
        "wrote {} catalog pages to {} ({} groups, {} failed)",
        stats.pages_written,
        args.output.display(),
        stats.groups_total,
        stats.groups_failed,
    );
    Ok(())
}

fn cmd_groups(args: GroupsArgs) -> anyhow::Result<()> {
    let groups = lookbook::scan_directory(&args.input)?;
    let json = serde_json::to_string_pretty(&groups).context("serialize product groups")?;
    println!("{json}");
    Ok(())
}
