use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lsldetails_core::{
    DeferredLoadMonitor, HostResult, OutputSink, OutputWindow, ScanOptions, SolutionSummary,
};
use lsldetails_project::{MemoryOutput, SnapshotHost, SnapshotStore};
use lsldetails_settings::PreferencesStore;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lsldetails-cli",
    about = "Inspect deferred projects of a lightweight solution load",
    author,
    version
)]
struct Cli {
    /// 指定工作區根目錄；預設為目前目錄。 / Workspace root holding `.lsldetails/` (defaults to current directory).
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 標記延遲專案並輸出報告。 / Mark deferred projects and print the solution report.
    Scan(ScanArgs),
    /// 僅輸出報告，不修改標題。 / Print the solution report without touching captions.
    Details(DetailsArgs),
    /// 僅標記延遲專案。 / Only mark deferred projects.
    Annotate(AnnotateArgs),
    /// 匯入/匯出偏好設定。 / Import or export preferences.
    #[command(subcommand)]
    Preferences(PreferencesCommand),
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
struct ScanArgs {
    /// 方案快照 JSON。 / Solution snapshot JSON.
    #[arg(value_name = "SNAPSHOT")]
    snapshot: PathBuf,

    /// 報告格式。 / Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// 將標記後的標題寫回快照。 / Persist marked captions back into the snapshot.
    #[arg(long)]
    write: bool,
}

#[derive(Args)]
struct DetailsArgs {
    /// 方案快照 JSON。 / Solution snapshot JSON.
    #[arg(value_name = "SNAPSHOT")]
    snapshot: PathBuf,

    /// 報告格式。 / Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args)]
struct AnnotateArgs {
    /// 方案快照 JSON。 / Solution snapshot JSON.
    #[arg(value_name = "SNAPSHOT")]
    snapshot: PathBuf,

    /// 將標記後的標題寫回快照。 / Persist marked captions back into the snapshot.
    #[arg(long)]
    write: bool,
}

#[derive(Subcommand)]
enum PreferencesCommand {
    /// 匯出目前偏好設定。 / Export current preferences.
    Export(PreferencesExportArgs),
    /// 匯入偏好設定 JSON。 / Import preferences from JSON.
    Import(PreferencesImportArgs),
}

#[derive(Args)]
struct PreferencesExportArgs {
    /// 輸出檔案路徑。 / Destination file path.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

#[derive(Args)]
struct PreferencesImportArgs {
    /// 輸入檔案路徑。 / Source preferences JSON.
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

/// Output window printing every pane line to stdout.
struct StdoutWindow;

struct StdoutPane;

impl OutputSink for StdoutPane {
    fn write_line(&self, text: &str) -> HostResult<()> {
        println!("{text}");
        Ok(())
    }
}

impl OutputWindow for StdoutWindow {
    fn acquire_pane(&self, caption: &str) -> HostResult<Box<dyn OutputSink>> {
        debug!(pane = caption, "writing report to stdout");
        Ok(Box::new(StdoutPane))
    }
}

#[derive(Serialize)]
struct ScanReport<'a> {
    annotated: usize,
    #[serde(flatten)]
    summary: &'a SolutionSummary,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let Cli { workspace, command } = Cli::parse();
    let workspace_root = resolve_workspace(workspace)?;
    match command {
        Commands::Scan(args) => execute_scan(args, &workspace_root),
        Commands::Details(args) => execute_details(args, &workspace_root),
        Commands::Annotate(args) => execute_annotate(args, &workspace_root),
        Commands::Preferences(subcommand) => {
            execute_preferences_command(subcommand, &workspace_root)
        }
    }
}

fn execute_scan(args: ScanArgs, workspace_root: &Path) -> Result<()> {
    let options = load_options(workspace_root)?;
    let (store, host) = open_snapshot(&args.snapshot)?;

    let outcome = match args.format {
        OutputFormat::Text => {
            DeferredLoadMonitor::new(&host, StdoutWindow, options).on_workspace_became_active()
        }
        OutputFormat::Json => {
            let outcome = DeferredLoadMonitor::new(&host, MemoryOutput::new(), options)
                .on_workspace_became_active();
            print_json(&ScanReport {
                annotated: outcome.annotated,
                summary: &outcome.summary,
            })?;
            outcome
        }
    };
    debug!(annotated = outcome.annotated, "scan finished");

    if args.write {
        persist(&store, host)?;
    }
    Ok(())
}

fn execute_details(args: DetailsArgs, workspace_root: &Path) -> Result<()> {
    let options = load_options(workspace_root)?;
    let (_, host) = open_snapshot(&args.snapshot)?;

    let summary = match args.format {
        OutputFormat::Text => {
            DeferredLoadMonitor::new(&host, StdoutWindow, options).details_command()
        }
        OutputFormat::Json => {
            let summary =
                DeferredLoadMonitor::new(&host, MemoryOutput::new(), options).details_command();
            if let Some(summary) = &summary {
                print_json(summary)?;
            }
            summary
        }
    };

    if summary.is_none() {
        bail!("no solution is open in {}", args.snapshot.display());
    }
    Ok(())
}

fn execute_annotate(args: AnnotateArgs, workspace_root: &Path) -> Result<()> {
    let options = load_options(workspace_root)?;
    let (store, host) = open_snapshot(&args.snapshot)?;

    let annotated = DeferredLoadMonitor::new(&host, MemoryOutput::new(), options).annotate();
    println!("Annotated {annotated} deferred project(s).");

    if args.write {
        persist(&store, host)?;
    }
    Ok(())
}

fn execute_preferences_command(command: PreferencesCommand, workspace_root: &Path) -> Result<()> {
    match command {
        PreferencesCommand::Export(args) => export_preferences(args, workspace_root),
        PreferencesCommand::Import(args) => import_preferences(args, workspace_root),
    }
}

fn export_preferences(args: PreferencesExportArgs, workspace_root: &Path) -> Result<()> {
    let prefs_path = preferences_path(workspace_root);
    let store = PreferencesStore::load(&prefs_path)
        .with_context(|| format!("failed to load preferences from {}", prefs_path.display()))?;
    let output = resolve_input_path(&args.output)?;
    store
        .export_to(&output)
        .with_context(|| format!("failed to export preferences to {}", output.display()))?;
    println!("Exported preferences to {}", output.display());
    Ok(())
}

fn import_preferences(args: PreferencesImportArgs, workspace_root: &Path) -> Result<()> {
    let prefs_path = preferences_path(workspace_root);
    let mut store = PreferencesStore::load(&prefs_path)
        .with_context(|| format!("failed to load preferences from {}", prefs_path.display()))?;
    let input = resolve_input_path(&args.input)?;
    if !input.exists() {
        bail!("preferences file '{}' does not exist", input.display());
    }
    store
        .import_from(&input)
        .with_context(|| format!("failed to import preferences from {}", input.display()))?;
    println!("Imported preferences from {}", input.display());
    Ok(())
}

fn load_options(workspace_root: &Path) -> Result<ScanOptions> {
    let prefs_path = preferences_path(workspace_root);
    let store = PreferencesStore::load(&prefs_path)
        .with_context(|| format!("failed to load preferences from {}", prefs_path.display()))?;
    Ok(ScanOptions::from(store.preferences()))
}

fn open_snapshot(path: &Path) -> Result<(SnapshotStore, SnapshotHost)> {
    let path = resolve_input_path(path)?;
    let store = SnapshotStore::new(&path);
    let snapshot = store
        .load()
        .with_context(|| format!("failed to open solution snapshot {}", path.display()))?;
    Ok((store, SnapshotHost::new(snapshot)))
}

fn persist(store: &SnapshotStore, host: SnapshotHost) -> Result<()> {
    store
        .save(&host.into_snapshot())
        .with_context(|| format!("failed to write {}", store.path().display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}

fn preferences_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".lsldetails").join("preferences.json")
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => resolve_input_path(&path),
        None => std::env::current_dir().context("determine current directory"),
    }
}

fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
