use clap::{Parser, Subcommand};
use qore_parser::{AstNode, ParseOptions, ParseSession, Position};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "qore-ast")]
#[command(about = "Parse Qore source into a position-indexed syntax tree")]
#[command(version)]
struct Cli {
    /// Line number of the first source line
    #[arg(long, global = true, default_value_t = 1)]
    start_line: u32,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse files and report every error
    Check {
        /// Input .q / .qm / .qc files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print the syntax tree of a file
    Tree {
        /// Input file
        path: PathBuf,

        /// Emit JSON instead of an indented outline
        #[arg(long)]
        json: bool,
    },

    /// Print the deepest node at a position and its ancestors
    Find {
        /// Input file
        path: PathBuf,
        /// 1-based line
        line: u32,
        /// 1-based column
        column: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let start_line = cli.start_line;
    match cli.command {
        Command::Check { paths } => cmd_check(&paths, start_line),
        Command::Tree { path, json } => cmd_tree(&path, start_line, json),
        Command::Find { path, line, column } => cmd_find(&path, start_line, line, column),
    }
}

fn parse_path(path: &Path, start_line: u32) -> ParseSession {
    let options = ParseOptions::default()
        .with_start_line(start_line)
        .with_source_name(path.display().to_string());
    let mut session = ParseSession::with_options(options);
    if let Err(e) = session.parse_file(path) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    session
}

fn cmd_check(paths: &[PathBuf], start_line: u32) {
    let mut failed = false;
    for path in paths {
        let options = ParseOptions::default()
            .with_start_line(start_line)
            .with_source_name(path.display().to_string());
        let mut session = ParseSession::with_options(options);
        if let Err(e) = session.parse_file(path) {
            eprintln!("Error: {e}");
            failed = true;
            continue;
        }
        for err in session.errors() {
            println!(
                "{}:{}:{}: error: {}",
                path.display(),
                err.line(),
                err.column(),
                err.message
            );
        }
        if session.error_count() > 0 {
            failed = true;
        } else {
            tracing::info!(path = %path.display(), "no errors");
        }
    }
    if failed {
        std::process::exit(1);
    }
}

fn cmd_tree(path: &Path, start_line: u32, json: bool) {
    let session = parse_path(path, start_line);
    let Some(tree) = session.tree() else {
        return;
    };

    if json {
        match serde_json::to_string_pretty(tree) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error serializing tree: {e}");
                std::process::exit(1);
            }
        }
    } else if let Some(root) = tree.root() {
        let mut out = String::new();
        outline(root, 0, &mut out);
        print!("{out}");
    }

    for err in session.errors() {
        eprintln!("{}: {err}", path.display());
    }
}

fn outline(node: &AstNode, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!("{} [{}]\n", node.label(), node.range));
    for child in &node.children {
        outline(child, depth + 1, out);
    }
}

fn cmd_find(path: &Path, start_line: u32, line: u32, column: u32) {
    let session = parse_path(path, start_line);
    let path_to_node = session
        .tree()
        .map(|tree| tree.ancestors_at(Position::new(line, column)))
        .unwrap_or_default();

    if path_to_node.is_empty() {
        eprintln!("No node at {line}:{column}");
        std::process::exit(1);
    }
    for (depth, node) in path_to_node.iter().enumerate() {
        println!("{}{} [{}]", "  ".repeat(depth), node.label(), node.range);
    }
}
