use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pbxpatch::manifest::{self, ManifestFile};
use pbxpatch::models::*;
use pbxpatch::patch::{self, Patcher, WriteOptions};

#[derive(Parser)]
#[command(name = "pbxpatch")]
#[command(about = "Register a source file in an Xcode project manifest")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    add: AddArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a source file to the build-file, file-reference, group and build phase sections
    Add(AddArgs),
    /// List the manifest's sections and how many records each holds
    Inspect {
        /// Path to project.pbxproj
        #[arg(short, long, env = "PBXPATCH_PROJECT", default_value = manifest::DEFAULT_PATH)]
        project: PathBuf,
    },
    /// Print fresh object identifiers
    GenId {
        #[arg(default_value = "2")]
        count: usize,
    },
}

#[derive(Args)]
struct AddArgs {
    /// Path to project.pbxproj
    #[arg(short, long, env = "PBXPATCH_PROJECT", default_value = manifest::DEFAULT_PATH)]
    project: PathBuf,

    /// Name of the source file, relative to the group
    #[arg(short, long, default_value = "ComprehensiveMonitoringPlugin.swift")]
    file: String,

    /// lastKnownFileType to record instead of the one detected from the extension
    #[arg(long)]
    file_type: Option<String>,

    /// Group whose children list receives the file reference
    #[arg(long, default_value = DEFAULT_GROUP_ID)]
    group_id: Identifier,

    #[arg(long, default_value = DEFAULT_GROUP_NAME)]
    group_name: String,

    /// Existing group child the new reference is inserted before
    #[arg(long, default_value = DEFAULT_GROUP_ANCHOR_ID)]
    group_anchor_id: Identifier,

    #[arg(long, default_value = DEFAULT_GROUP_ANCHOR_NAME)]
    group_anchor_name: String,

    /// Build phase whose files list receives the build file
    #[arg(long, default_value = DEFAULT_PHASE_ID)]
    phase_id: Identifier,

    #[arg(long, default_value = DEFAULT_PHASE_NAME)]
    phase_name: String,

    /// Existing build file the new entry is inserted before
    #[arg(long, default_value = DEFAULT_PHASE_ANCHOR_ID)]
    phase_anchor_id: Identifier,

    #[arg(long, default_value = DEFAULT_PHASE_ANCHOR_NAME)]
    phase_anchor_name: String,

    /// Patch in memory and print the report without writing
    #[arg(long)]
    dry_run: bool,

    /// Copy the manifest to <PROJECT>.bak before overwriting it
    #[arg(long)]
    backup: bool,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl AddArgs {
    fn target(&self) -> PatchTarget {
        PatchTarget {
            group: RecordRef::new(self.group_id.clone(), &self.group_name),
            group_anchor: RecordRef::new(self.group_anchor_id.clone(), &self.group_anchor_name),
            phase: RecordRef::new(self.phase_id.clone(), &self.phase_name),
            phase_anchor: RecordRef::new(self.phase_anchor_id.clone(), &self.phase_anchor_name),
        }
    }
}

/// Initialize tracing on stderr; stdout carries the report.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "pbxpatch=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_add(args: AddArgs) -> anyhow::Result<()> {
    let file = SourceFile::new(args.file.clone(), args.file_type.clone())?;
    let patcher = Patcher::new(file, args.target());
    let manifest = ManifestFile::new(&args.project);

    tracing::info!(
        path = %manifest.path().display(),
        file = %patcher.file().name,
        "registering source file"
    );

    let options = WriteOptions {
        dry_run: args.dry_run,
        backup: args.backup,
    };
    let report = patcher
        .patch_file(&manifest, options)
        .with_context(|| format!("Failed to patch {}", manifest.path().display()))?;

    match args.format {
        Format::Text => print!("{}", patch::render_text(&report)),
        Format::Json => println!("{}", patch::render_json(&report)?),
    }

    Ok(())
}

fn run_inspect(project: PathBuf) -> anyhow::Result<()> {
    let text = ManifestFile::new(project).read()?;
    for section in manifest::scan_sections(&text) {
        println!("{:<32} {:>5}", section.name, section.records);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Add(args)) => run_add(args)?,
        Some(Commands::Inspect { project }) => run_inspect(project)?,
        Some(Commands::GenId { count }) => {
            for _ in 0..count {
                println!("{}", Identifier::generate());
            }
        }
        // Default: register the file with the flags given at top level
        None => run_add(cli.add)?,
    }

    Ok(())
}
