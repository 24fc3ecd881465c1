//! Command-line entry point: `deckgen [config.yaml] [-o output.pdf]`.

use std::path::PathBuf;
use std::process;

const USAGE: &str = "\
deckgen — declarative slide decks to PDF

USAGE:
    deckgen [CONFIG] [-o OUTPUT]

ARGS:
    CONFIG        YAML configuration file (default: config.yaml)

OPTIONS:
    -o, --output  Output PDF path (overrides the config's `output` field)
    -h, --help    Show this message
";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print!("{USAGE}");
                return;
            }
            "-o" | "--output" => match iter.next() {
                Some(path) => output = Some(PathBuf::from(path)),
                None => {
                    eprintln!("✗ {arg} requires a path");
                    process::exit(2);
                }
            },
            other if other.starts_with('-') => {
                eprintln!("✗ unknown option '{other}'\n\n{USAGE}");
                process::exit(2);
            }
            other => {
                if config.is_some() {
                    eprintln!("✗ unexpected extra argument '{other}'\n\n{USAGE}");
                    process::exit(2);
                }
                config = Some(PathBuf::from(other));
            }
        }
    }

    let config = config.unwrap_or_else(|| PathBuf::from("config.yaml"));

    match deckgen::generate(&config, output.as_deref()) {
        Ok(path) => eprintln!("✓ wrote {}", path.display()),
        Err(e) => {
            eprintln!("✗ {e}");
            process::exit(1);
        }
    }
}
