use clap::{Parser, Subcommand};
use keiro::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// A flow definition and execution engine CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a flow document and print its validation issues
    Check {
        /// Path to the flow document
        document: String,
    },
    /// Print editor coordinates for every node as JSON
    Layout {
        /// Path to the flow document
        document: String,
    },
    /// Walk through a flow interactively in the terminal
    Run {
        /// Path to the flow document
        document: String,

        /// Resume from a previously saved draft file
        #[arg(short, long)]
        draft: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check { document } => run_check(&document),
        Command::Layout { document } => run_layout(&document),
        Command::Run { document, draft } => run_traversal(&document, draft),
    }
}

fn load_flow(path: &str) -> Arc<FlowDefinition> {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read flow document '{}': {}", path, e))
    });
    let flow = parse(&text)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path, e)));
    Arc::new(flow)
}

fn run_check(path: &str) {
    let flow = load_flow(path);
    let issues = validate(&flow);

    if issues.is_empty() {
        println!(
            "'{}' is structurally sound ({} nodes, {} connections)",
            flow.name,
            flow.nodes().len(),
            flow.connections().len()
        );
        return;
    }

    for issue in &issues {
        let severity = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &issue.node_id {
            Some(id) => println!("{}: {} (node '{}')", severity, issue.message, id),
            None => println!("{}: {}", severity, issue.message),
        }
    }
    if has_errors(&issues) {
        std::process::exit(1);
    }
}

fn run_layout(path: &str) {
    let flow = load_flow(path);
    let positions = layout(&flow);
    let json = serde_json::to_string_pretty(&positions)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize layout: {}", e)));
    println!("{}", json);
}

fn run_traversal(path: &str, draft_path: Option<String>) {
    let flow = load_flow(path);
    let issues = validate(&flow);
    if has_errors(&issues) {
        exit_with_error("The flow has validation errors; run `check` for details.");
    }

    let store_dir = std::env::current_dir()
        .unwrap_or_else(|e| exit_with_error(&format!("Cannot resolve working directory: {}", e)));
    let mut store = FileStore::new(store_dir);

    let mut session = match draft_path {
        Some(p) => {
            let record = DraftRecord::from_file(&p)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to load draft '{}': {}", p, e)));
            Session::resume(flow, &record)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to resume draft: {}", e)))
        }
        None => Session::begin(flow)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to start session: {}", e))),
    };

    println!("--- {} ---", session.flow().name);
    if let Some(description) = &session.flow().description {
        println!("{}", description);
    }

    loop {
        let node = match session.current_node() {
            Some(node) => node.clone(),
            None => exit_with_error("The session points at a node that no longer exists"),
        };

        let answer = match &node.kind {
            NodeKind::Start => Answer::None,
            NodeKind::End {
                thank_you_title,
                thank_you_message,
            }
            | NodeKind::Success {
                thank_you_title,
                thank_you_message,
            } => {
                println!();
                println!("{}", thank_you_title.as_deref().unwrap_or("All done"));
                if let Some(message) = thank_you_message {
                    println!("{}", message);
                }
                match session.finalize(&mut store) {
                    Ok(submission) => println!("Submission stored at {}", submission.0),
                    Err(e) => exit_with_error(&format!("Failed to finalize: {}", e)),
                }
                return;
            }
            NodeKind::YesNo {
                yes_label,
                no_label,
            } => {
                println!();
                println!("{}", node.question);
                let prompt = format!("{} (yes) / {} (no), 'back' or 'save'", yes_label, no_label);
                match prompt_for_input(&prompt, session.cached_answer(&node.id)).as_str() {
                    "back" => {
                        handle_back(&mut session);
                        continue;
                    }
                    "save" => {
                        handle_save(&mut session, &mut store);
                        return;
                    }
                    other => Answer::Value(other.to_string()),
                }
            }
            NodeKind::MultipleChoice { options } => {
                println!();
                println!("{}", node.question);
                for (i, option) in options.iter().enumerate() {
                    println!("  {}: {}", i + 1, option.label);
                }
                match prompt_for_input("Enter a number, 'back' or 'save'", None).as_str() {
                    "back" => {
                        handle_back(&mut session);
                        continue;
                    }
                    "save" => {
                        handle_save(&mut session, &mut store);
                        return;
                    }
                    other => match other.parse::<usize>() {
                        Ok(n) if n >= 1 => Answer::OptionIndex(n - 1),
                        _ => Answer::Value(other.to_string()),
                    },
                }
            }
            NodeKind::Info { info_message } => {
                println!();
                if let Some(message) = info_message {
                    println!("{}", message);
                }
                prompt_for_input("Press enter to continue", None);
                Answer::None
            }
            _ => {
                println!();
                println!("{}", node.question);
                match prompt_for_input("Your answer ('back' or 'save')", session.cached_answer(&node.id)).as_str() {
                    "back" => {
                        handle_back(&mut session);
                        continue;
                    }
                    "save" => {
                        handle_save(&mut session, &mut store);
                        return;
                    }
                    other => Answer::Value(other.to_string()),
                }
            }
        };

        if let Err(e) = session.advance(answer) {
            println!("  -> {}", e);
        }
    }
}

fn handle_back(session: &mut Session) {
    match session.back() {
        Ok(Some(previous)) => println!("  (previous answer: {})", previous),
        Ok(None) => {}
        Err(e) => println!("  -> {}", e),
    }
}

fn handle_save(session: &mut Session, store: &mut FileStore) {
    match session.save_draft(store) {
        Ok(handle) => println!("Draft saved to {}", handle.0),
        Err(e) => exit_with_error(&format!("Failed to save draft: {}", e)),
    }
}

/// File-backed persistence for CLI runs: drafts and submissions land as
/// bincode records in the working directory.
struct FileStore {
    dir: PathBuf,
    saved: u32,
}

impl FileStore {
    fn new(dir: PathBuf) -> Self {
        Self { dir, saved: 0 }
    }
}

impl PersistenceAdapter for FileStore {
    fn save_draft(&mut self, record: &DraftRecord) -> Result<DraftHandle, PersistError> {
        self.saved += 1;
        let path = self
            .dir
            .join(format!("{}-draft-{}.bin", record.flow_id, self.saved));
        record.save(&path)?;
        Ok(DraftHandle(path.display().to_string()))
    }

    fn finalize_submission(
        &mut self,
        flow_id: &str,
        responses: &[ResponseEntry],
    ) -> Result<SubmissionId, PersistError> {
        let record = DraftRecord {
            flow_id: flow_id.to_string(),
            responses: responses.to_vec(),
            current_node_id: String::new(),
        };
        let path = self.dir.join(format!("{}-submission.bin", flow_id));
        record.save(&path)?;
        Ok(SubmissionId(path.display().to_string()))
    }

    fn load_draft(&mut self, handle: &DraftHandle) -> Result<DraftRecord, PersistError> {
        DraftRecord::from_file(&handle.0)
    }
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [previous: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    let _ = io::stdout().flush();

    if io::stdin().read_line(&mut line).is_err() {
        exit_with_error("Failed to read input");
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
