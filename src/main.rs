//! `propscope`: drive the hover, completion and insertion engine from the
//! command line against a `typescript-language-server` process.

use std::path::{Path, PathBuf};

use serde_json::json;

use propscope::catalog::Catalogs;
use propscope::completion::{list_completions, TRIGGER_CHARACTERS};
use propscope::config::{Settings, WorkspaceStore};
use propscope::document::{Position, TextDocument, TextEdit};
use propscope::editor::{Editor, MemoryEditor};
use propscope::hover::provide_hover;
use propscope::insert::run_after_completion;
use propscope::lsp::LspClient;
use propscope::util::git_root;
use propscope::{CancellationToken, PropscopeError, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Hover,
    Complete,
    Insert,
}

#[derive(Debug)]
struct CliArgs {
    action: Action,
    file: String,
    position: Position,
    trigger: Option<char>,
    attribute: Option<String>,
    name: Option<String>,
    write: bool,
    settings: Option<PathBuf>,
    store: Option<PathBuf>,
    resources: Option<PathBuf>,
}

/// `12:5` (1-based, as editors display it) to a 0-based position.
fn parse_position(raw: &str) -> Result<Position, String> {
    let (line, col) = raw
        .split_once(':')
        .ok_or_else(|| format!("position '{raw}' must look like LINE:COL"))?;
    let parse = |part: &str, what: &str| -> Result<u32, String> {
        match part.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n - 1),
            _ => Err(format!("invalid {what} '{part}' in '{raw}'")),
        }
    };
    Ok(Position::new(parse(line, "line")?, parse(col, "column")?))
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut positional = Vec::new();
    let mut trigger = None;
    let mut attribute = None;
    let mut name = None;
    let mut write = false;
    let mut settings = None;
    let mut store = None;
    let mut resources = None;
    let mut i = 0;

    let value = |i: usize, flag: &str| -> Result<String, String> {
        args.get(i)
            .cloned()
            .ok_or_else(|| format!("{flag} requires an argument"))
    };

    while i < args.len() {
        match args[i].as_str() {
            "--write" => write = true,
            "--trigger" | "-t" => {
                i += 1;
                let raw = value(i, "--trigger")?;
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if TRIGGER_CHARACTERS.contains(&c) => trigger = Some(c),
                    _ => return Err(format!("--trigger: '{raw}' is not a trigger character")),
                }
            }
            "--attribute" | "-a" => {
                i += 1;
                attribute = Some(value(i, "--attribute")?);
            }
            "--name" | "-n" => {
                i += 1;
                name = Some(value(i, "--name")?);
            }
            "--settings" => {
                i += 1;
                settings = Some(PathBuf::from(value(i, "--settings")?));
            }
            "--store" => {
                i += 1;
                store = Some(PathBuf::from(value(i, "--store")?));
            }
            "--resources" => {
                i += 1;
                resources = Some(PathBuf::from(value(i, "--resources")?));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}"));
            }
            _ => positional.push(args[i].clone()),
        }
        i += 1;
    }

    let [action, file, position] = positional.as_slice() else {
        return Err("expected <hover|complete|insert> <file> <line:col>".to_string());
    };
    let action = match action.as_str() {
        "hover" => Action::Hover,
        "complete" => Action::Complete,
        "insert" => Action::Insert,
        other => return Err(format!("unknown command: {other}")),
    };
    if action == Action::Insert && attribute.is_none() {
        return Err("insert requires --attribute".to_string());
    }
    if action != Action::Insert && (name.is_some() || write) {
        return Err("--name and --write only apply to insert".to_string());
    }

    Ok(CliArgs {
        action,
        file: file.clone(),
        position: parse_position(position)?,
        trigger,
        attribute,
        name,
        write,
        settings,
        store,
        resources,
    })
}

fn main() {
    propscope::logging::init_tracing();
    let raw: Vec<String> = std::env::args().skip(1).collect();

    if raw.is_empty() || raw[0] == "-h" || raw[0] == "--help" {
        print_help();
        std::process::exit(0);
    }

    let args = match parse_args(&raw) {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("propscope: {msg}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("propscope: {e}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), PropscopeError> {
    let path = Path::new(&args.file);
    let doc = TextDocument::from_path(path)?;
    let dir = path
        .canonicalize()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    let root = git_root(&dir).unwrap_or(dir);

    let store = match &args.store {
        Some(p) => WorkspaceStore::load(p)?,
        None => WorkspaceStore::default(),
    };
    let settings = match &args.settings {
        Some(p) => Settings::load(p)?,
        None => Settings::default(),
    }
    .for_workspace(&store, &root.to_string_lossy());
    let catalogs = match &args.resources {
        Some(dir) => Catalogs::from_dir(dir)?,
        None => Catalogs::embedded()?,
    };

    let cancel = CancellationToken::new();
    let mut client = LspClient::start(&root)?;
    let result = {
        let mut session = Session::new(&mut client, &catalogs, &settings, &cancel);
        dispatch(args, &mut session, doc)
    };
    client.shutdown();
    result
}

fn dispatch(
    args: &CliArgs,
    session: &mut Session<'_>,
    doc: TextDocument,
) -> Result<(), PropscopeError> {
    let pos = args.position;
    let trigger = args.trigger.or_else(|| trigger_before(&doc, pos));
    match args.action {
        Action::Hover => {
            let hover = provide_hover(session, &doc, pos);
            print_json(&json!({
                "hover": hover,
                "markdown": hover.as_ref().map(|h| h.to_markdown()),
            }))
        }
        Action::Complete => print_json(&list_completions(session, &doc, pos, trigger)),
        Action::Insert => {
            let attribute = args.attribute.as_deref().unwrap_or_default();
            let entries = list_completions(session, &doc, pos, trigger);
            let entry = entries
                .into_iter()
                .find(|e| e.label == attribute)
                .ok_or_else(|| {
                    PropscopeError::Edit(format!("no completion for `{attribute}` at {}", args.file))
                })?;

            // Accept the entry the way an editor would, then run its command.
            let mut editor = MemoryEditor::new(doc, pos).with_answers(args.name.clone());
            editor.apply(&[TextEdit::insert(pos, entry.insert_text.clone())])?;
            let outcome = run_after_completion(session, &mut editor, &entry.command)?;

            let text = editor.document().text().to_string();
            if args.write {
                std::fs::write(&args.file, &text).map_err(|e| PropscopeError::Io {
                    path: args.file.clone(),
                    source: e,
                })?;
            }
            print_json(&json!({ "outcome": outcome, "text": text }))
        }
    }
}

/// The trigger character just before `pos`, if any.
fn trigger_before(doc: &TextDocument, pos: Position) -> Option<char> {
    let offset = doc.offset_at(pos);
    doc.text()[..offset]
        .chars()
        .next_back()
        .filter(|c| TRIGGER_CHARACTERS.contains(c))
}

fn print_json(value: &impl serde::Serialize) -> Result<(), PropscopeError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| PropscopeError::Resource {
        name: "output".to_string(),
        source,
    })?;
    println!("{text}");
    Ok(())
}

fn print_help() {
    eprintln!("propscope: component docs and handler scaffolding for JSX sources");
    eprintln!("Usage: propscope <hover|complete|insert> <file> <line:col> [options]");
    eprintln!();
    eprintln!("Positions are 1-based. For complete and insert, the cursor sits right");
    eprintln!("after the trigger character (`!` binds directly, `#` asks for a name).");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --trigger C, -t C      Trigger character when none precedes the cursor");
    eprintln!("  --attribute A, -a A    Attribute to accept (insert)");
    eprintln!("  --name N, -n N         Handler name typed at the prompt (insert)");
    eprintln!("  --write                Write the edited file back (insert)");
    eprintln!("  --settings PATH        Settings JSON file");
    eprintln!("  --store PATH           Workspace store JSON file");
    eprintln!("  --resources DIR        Directory holding v3.json and v4.json");
    eprintln!("  -h, --help             Show help");
    eprintln!();
    eprintln!("Set PROPSCOPE_LOG=debug to trace resolution on stderr.");
}
