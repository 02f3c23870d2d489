//! CLI tool for appexcel - lays out a forum snapshot and prints the sheet
//!
//! Usage:
//!   appexcel_cli <snapshot.json>               # Text preview of the grid
//!   appexcel_cli <snapshot.json> --json        # Sheet view as JSON
//!   appexcel_cli <sheet.json> --sheet          # Input is a patch script
//!   appexcel_cli <snapshot.json> --json -o out.json
//!
//! Pass `-` to read from stdin. Set `RUST_LOG=debug` for builder logs.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Read, Write};

use appexcel::forum::{layout, ForumSnapshot};
use appexcel::normalize::display_text;
use appexcel::sheet::{build, SheetInput, SheetModel};

/// Characters per column in the text preview
const PREVIEW_WIDTH: usize = 12;

struct Args {
    input: String,
    raw_sheet: bool,
    json: bool,
    output: Option<String>,
}

fn parse_args() -> Option<Args> {
    let mut args = env::args().skip(1);
    let mut parsed = Args {
        input: String::new(),
        raw_sheet: false,
        json: false,
        output: None,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sheet" => parsed.raw_sheet = true,
            "--json" => parsed.json = true,
            "-o" => parsed.output = Some(args.next()?),
            _ if parsed.input.is_empty() => parsed.input = arg,
            _ => return None,
        }
    }
    (!parsed.input.is_empty()).then_some(parsed)
}

fn read_input(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

fn load(args: &Args, text: &str) -> appexcel::Result<SheetInput> {
    if args.raw_sheet {
        Ok(serde_json::from_str(text)?)
    } else {
        let snapshot: ForumSnapshot = serde_json::from_str(text)?;
        Ok(layout(&snapshot))
    }
}

/// Fixed-width text rendering; merged spans print as one wide cell.
fn preview(model: &SheetModel) -> String {
    let mut out = String::new();
    let rule = format!(
        "+{}+\n",
        "-".repeat(model.col_count() as usize * (PREVIEW_WIDTH + 1) - 1)
    );
    out.push_str(&rule);
    for row in model.rows() {
        out.push('|');
        for cell in row.iter().filter(|c| !c.merge_child) {
            let width = (cell.merge_across as usize + 1) * (PREVIEW_WIDTH + 1) - 1;
            let text: String = display_text(cell).chars().take(width - 1).collect();
            let marker = if cell.has_action() { '*' } else { ' ' };
            out.push_str(&format!("{text:<w$}", w = width - 1));
            out.push(marker);
            out.push('|');
        }
        out.push('\n');
    }
    out.push_str(&rule);
    out
}

fn main() {
    env_logger::init();

    let Some(args) = parse_args() else {
        eprintln!("Usage: appexcel_cli <input.json|-> [--sheet] [--json] [-o output]");
        std::process::exit(1);
    };

    let text = match read_input(&args.input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.input, e);
            std::process::exit(1);
        }
    };

    let input = match load(&args, &text) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Error decoding input: {}", e);
            std::process::exit(1);
        }
    };

    let model = build(&input);
    let problems = model.check_invariants();
    for problem in &problems {
        eprintln!("invariant: {problem}");
    }

    let rendered = if args.json {
        match serde_json::to_string_pretty(&model.view()) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Error serializing JSON: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        preview(&model)
    };

    match args.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &rendered) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(rendered.as_bytes()).unwrap();
            println!();
        }
    }

    if !problems.is_empty() {
        std::process::exit(2);
    }
}
