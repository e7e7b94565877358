// Modus mode engine: CLI entry point.
//
// Builds one mode and prints its degrees, spellings and modal positions.
// The pipeline: pick template (catalog name or explicit steps) → build from
// root → optionally sort by modal position → print (text or JSON).
//
// Usage:
//   cargo run -p modus_modes -- [--mode NAME | --steps 2,2,1,2,2,2,1]
//     [--root NOTE] [--name LABEL] [--catalog PATH] [--sort asc|desc]
//     [--descending] [--json] [--list]
//
// Logging goes through `tracing`; set RUST_LOG=modus_modes=debug to watch
// the builder's stage transitions.

use modus_modes::{
    Direction, Mode, ModeCatalog, ModeTemplate, Note, build_mode, default_catalog,
};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let catalog_path: Option<String> = parse_flag(&args, "--catalog");
    let catalog = match catalog_path {
        Some(path) => load_catalog(Path::new(&path)),
        None => default_catalog(),
    };

    if has_flag(&args, "--list") {
        for entry in catalog.entries() {
            if entry.aliases.is_empty() {
                println!("{:<20} {}", entry.name, entry.steps);
            } else {
                println!(
                    "{:<20} {}  (also: {})",
                    entry.name,
                    entry.steps,
                    entry.aliases.join(", ")
                );
            }
        }
        return;
    }

    let steps_arg: Option<String> = parse_flag(&args, "--steps");
    let mode_name: String = parse_flag(&args, "--mode").unwrap_or_else(|| "ionian".to_string());
    let custom_steps = steps_arg.is_some();
    let template = match steps_arg {
        Some(steps) => parse_steps(&steps),
        None => catalog
            .template(&mode_name)
            .unwrap_or_else(|e| fail(&format!("{e}. Try --list."))),
    };

    let root_arg: String = parse_flag(&args, "--root").unwrap_or_else(|| "C".to_string());
    let root: Note = root_arg
        .parse()
        .unwrap_or_else(|e| fail(&format!("Bad root note '{root_arg}': {e}")));

    let label: String = parse_flag(&args, "--name").unwrap_or_else(|| {
        if custom_steps {
            "custom".to_string()
        } else {
            mode_name.to_lowercase()
        }
    });

    let mut mode = build_mode(&template, root, &label)
        .unwrap_or_else(|e| fail(&format!("Could not build {label} on {root}: {e}")));

    if let Some(order) = parse_flag::<String>(&args, "--sort") {
        let ascending = match order.as_str() {
            "asc" => true,
            "desc" => false,
            other => fail(&format!("--sort takes 'asc' or 'desc', not '{other}'")),
        };
        match mode.sort_by_absolute_modal_positions(ascending) {
            Ok(true) => {}
            Ok(false) => eprintln!("{} has no modal positions; left unsorted.", mode.name()),
            Err(e) => fail(&format!("Sort failed: {e}")),
        }
    }

    if has_flag(&args, "--json") {
        match serde_json::to_string_pretty(&mode) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(&format!("Could not serialize mode: {e}")),
        }
        return;
    }

    print_mode(&mode, has_flag(&args, "--descending"));
}

fn print_mode(mode: &Mode, descending: bool) {
    println!("=== {} on {} ===", mode.name(), root_of(mode));
    println!("Template: {}", mode.template());
    let scale: Vec<String> = mode
        .generate_scale(descending)
        .iter()
        .map(|n| n.to_string())
        .collect();
    println!("Scale: {}", scale.join(" "));
    println!();

    let direction = if descending {
        Direction::Backward
    } else {
        Direction::Forward
    };
    for degree in mode.iter_one_round(direction) {
        println!("  {degree}");
        for c in &degree.modal_characteristics {
            println!(
                "      from {}: {} {} ({:+})",
                c.against, c.name, c.interval, c.relative_weight
            );
        }
    }
}

fn root_of(mode: &Mode) -> String {
    mode.degree(1)
        .map(|d| d.note.to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn load_catalog(path: &Path) -> ModeCatalog {
    let json = std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("Could not read {}: {e}", path.display())));
    ModeCatalog::from_json(&json)
        .unwrap_or_else(|e| fail(&format!("Could not load {}: {e}", path.display())))
}

fn parse_steps(arg: &str) -> ModeTemplate {
    let steps: Vec<u8> = arg
        .split(',')
        .map(|s| {
            s.trim()
                .parse()
                .unwrap_or_else(|_| fail(&format!("Bad step '{s}' in --steps")))
        })
        .collect();
    ModeTemplate::new(steps).unwrap_or_else(|e| fail(&e.to_string()))
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
