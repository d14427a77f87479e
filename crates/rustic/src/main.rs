//! The Rustic command-line tool.
//!
//! Provides the `rustic` command with the following subcommands:
//!
//! - `rustic convert-to-tuple <file>:<line>:<col>` - Convert the struct or
//!   enum variant at a position into its tuple form, rewriting every usage
//!   under the project root
//! - `rustic symbols <file>` - Print the structure of a file
//! - `rustic lsp` - Start the LSP server (communicates via stdin/stdout)
//!
//! Options:
//! - `--root` - Project directory whose `.rs` files are rewritten
//! - `--dry-run` - Print the converted files instead of writing them
//! - `--config` - Configuration file (defaults to `<root>/rustic.toml`)
//! - `-v` - More logging on stderr (`RUST_LOG` takes precedence)

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use rustic_ide::diagnostics::{render_parse_error, render_usage_diagnostic};
use rustic_ide::discovery::load_dir;
use rustic_ide::edit::apply_edits;
use rustic_ide::symbols::{file_structure, StructureKind, StructureNode};
use rustic_ide::{
    convert_to_tuple, CancellationToken, FilePosition, RefactorError, RusticConfig, SourceChange,
    Workspace,
};

#[derive(Parser)]
#[command(name = "rustic", version, about = "Structural refactorings for Rust sources")]
struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a named-field struct or enum variant into a tuple struct
    ConvertToTuple {
        /// Position of the declaration, as `<file>:<line>:<col>` (1-based)
        location: String,

        /// Project directory whose files are searched for usages
        /// (defaults to the file's directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Print the converted files instead of writing them
        #[arg(long = "dry-run")]
        dry_run: bool,

        /// Configuration file (defaults to `rustic.toml` in the root)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the structure of a file
    Symbols {
        /// Path to a Rust source file
        file: PathBuf,
    },
    /// Start the LSP server (communicates via stdin/stdout)
    Lsp,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::ConvertToTuple {
            location,
            root,
            dry_run,
            config,
        } => convert(&location, root.as_deref(), dry_run, config.as_deref()),
        Commands::Symbols { file } => symbols(&file),
        Commands::Lsp => lsp(),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Split `<file>:<line>:<col>`. The file part may itself contain colons.
fn parse_location(location: &str) -> Result<(PathBuf, u32, u32), String> {
    let invalid = || format!("expected <file>:<line>:<col>, got '{}'", location);
    let mut parts = location.rsplitn(3, ':');
    let col = parts.next().ok_or_else(invalid)?;
    let line = parts.next().ok_or_else(invalid)?;
    let file = parts.next().filter(|f| !f.is_empty()).ok_or_else(invalid)?;
    let line: u32 = line.parse().map_err(|_| invalid())?;
    let col: u32 = col.parse().map_err(|_| invalid())?;
    if line == 0 || col == 0 {
        return Err(invalid());
    }
    Ok((PathBuf::from(file), line, col))
}

fn canonical(path: &Path) -> Result<PathBuf, String> {
    path.canonicalize()
        .map_err(|e| format!("Failed to resolve '{}': {}", path.display(), e))
}

/// Execute the conversion: load the project, compute the change under one
/// snapshot, then either print or commit and write it.
fn convert(
    location: &str,
    root: Option<&Path>,
    dry_run: bool,
    config_path: Option<&Path>,
) -> Result<(), String> {
    let (file, line, col) = parse_location(location)?;
    let file = canonical(&file)?;
    let root = match root {
        Some(root) => canonical(root)?,
        None => file
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| format!("'{}' has no parent directory", file.display()))?,
    };

    let config = match config_path {
        Some(path) => RusticConfig::from_file(path),
        None => RusticConfig::discover(&root),
    }
    .map_err(|e| e.to_string())?;
    debug!(?config, "loaded configuration");

    let workspace = Workspace::new();
    load_dir(&workspace, &root)
        .map_err(|e| format!("Failed to read '{}': {}", root.display(), e))?;
    if workspace.snapshot().file_id(&file).is_none() {
        let text = std::fs::read_to_string(&file)
            .map_err(|e| format!("Failed to read '{}': {}", file.display(), e))?;
        workspace.set_file(file.clone(), text);
    }

    let change = {
        let snapshot = workspace.snapshot();
        let id = snapshot
            .file_id(&file)
            .ok_or_else(|| format!("'{}' is not loaded", file.display()))?;
        let source = snapshot
            .file(id)
            .ok_or_else(|| format!("'{}' is not loaded", file.display()))?;
        for error in source.parse().errors() {
            warn!(file = %file.display(), "parse error: {}", error);
        }
        let offset = source
            .line_index()
            .offset(line, col)
            .filter(|&offset| offset <= u32::from(source.len()))
            .ok_or_else(|| format!("{}:{}:{} is outside the file", file.display(), line, col))?;
        let position = FilePosition {
            file: id,
            offset: offset.into(),
        };

        match convert_to_tuple(
            &snapshot,
            position,
            &config.convert_to_tuple,
            &CancellationToken::new(),
        ) {
            Ok(change) => change,
            Err(RefactorError::UnsupportedUsage(diags)) => {
                for diag in &diags {
                    if let Some(source) = snapshot.file(diag.file) {
                        eprintln!("{}", source.path().display());
                        eprint!("{}", render_usage_diagnostic(diag, source.text()));
                    }
                }
                return Err(format!("{} usage(s) cannot be converted", diags.len()));
            }
            Err(e) => return Err(e.to_string()),
        }
    };

    let files = converted_files(&workspace, &change)?;
    if dry_run {
        for (path, text) in &files {
            println!("--- {}", path.display());
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
        }
        return Ok(());
    }

    write_all_or_nothing(&files)?;
    eprintln!(
        "  Converted: {} edit(s) in {} file(s)",
        change.edit_count(),
        change.file_edits.len()
    );
    Ok(())
}

/// The new text of every file the change touches.
fn converted_files(
    workspace: &Workspace,
    change: &SourceChange,
) -> Result<Vec<(PathBuf, String)>, String> {
    let snapshot = workspace.snapshot();
    let mut files = Vec::with_capacity(change.file_edits.len());
    for (&id, edits) in &change.file_edits {
        let source = snapshot
            .file(id)
            .ok_or_else(|| format!("file {} is no longer loaded", id.0))?;
        let text = apply_edits(source.text(), edits).map_err(|e| e.to_string())?;
        files.push((source.path().to_path_buf(), text));
    }
    Ok(files)
}

/// Write `files` so that either all of them change or none does.
///
/// Each text is first staged in a temporary file next to its target. The
/// targets are replaced only once every file is staged; on error the
/// staged files are dropped, which deletes them.
fn write_all_or_nothing(files: &[(PathBuf, String)]) -> Result<(), String> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, text) in files {
        let failed = |e: std::io::Error| format!("Failed to write '{}': {}", path.display(), e);
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(failed)?;
        tmp.write_all(text.as_bytes()).map_err(failed)?;
        if let Ok(metadata) = std::fs::metadata(path) {
            tmp.as_file().set_permissions(metadata.permissions()).map_err(failed)?;
        }
        staged.push((tmp, path));
    }
    for (tmp, path) in staged {
        tmp.persist(path)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e.error))?;
        info!(file = %path.display(), "wrote converted file");
    }
    Ok(())
}

fn symbols(file: &Path) -> Result<(), String> {
    let source = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read '{}': {}", file.display(), e))?;
    let parse = rustic_parser::parse(&source);
    for error in parse.errors() {
        eprint!("{}", render_parse_error(error, &source));
    }
    let mut out = String::new();
    write_outline(&file_structure(&parse.syntax()), 0, &mut out);
    print!("{}", out);
    Ok(())
}

fn write_outline(nodes: &[StructureNode], depth: usize, out: &mut String) {
    for node in nodes {
        out.push_str(&"  ".repeat(depth));
        out.push_str(kind_label(node.kind));
        out.push(' ');
        out.push_str(&node.name);
        match (&node.detail, node.kind) {
            (Some(signature), StructureKind::Function) => out.push_str(signature),
            (Some(detail), _) => {
                out.push_str(": ");
                out.push_str(detail);
            }
            (None, _) => {}
        }
        out.push('\n');
        write_outline(&node.children, depth + 1, out);
    }
}

fn kind_label(kind: StructureKind) -> &'static str {
    match kind {
        StructureKind::Module => "mod",
        StructureKind::Struct => "struct",
        StructureKind::Field => "field",
        StructureKind::Enum => "enum",
        StructureKind::Variant => "variant",
        StructureKind::Trait => "trait",
        StructureKind::Impl => "impl",
        StructureKind::Function => "fn",
        StructureKind::Const => "const",
        StructureKind::Static => "static",
        StructureKind::TypeAlias => "type",
    }
}

fn lsp() -> Result<(), String> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;
    rt.block_on(rustic_lsp::run_server());
    Ok(())
}
