// PlusPlus: run a `.ppp` module, printing its parse tree and its output

use std::fs;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::Context;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use plusplus::pipeline::{self, SOURCE_EXTENSION};
use plusplus::Config;

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the program's output
    if let Err(e) = SimpleLogger::new().with_level(LevelFilter::Warn).env().init() {
        eprintln!("Warning: failed to initialise logging: {}", e);
    }

    let args: Vec<String> = std::env::args().collect();
    let Some(module) = args.get(1) else {
        let program_name = args.first().map(|s| s.as_str()).unwrap_or("plusplus");
        eprintln!("Usage: {} <module>", program_name);
        eprintln!();
        eprintln!("Runs <module>.{} from the current directory.", SOURCE_EXTENSION);
        return ExitCode::from(1);
    };

    match run(module) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run(module: &str) -> anyhow::Result<()> {
    let path = pipeline::source_path(module);
    let bytes =
        fs::read(&path).with_context(|| format!("File cannot be opened: {}", path.display()))?;
    let source = String::from_utf8_lossy(&bytes);
    let config = Config::from_env()?;

    tracing::debug!(path = %path.display(), bytes = source.len(), "running module");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = pipeline::run_source(&source, &config, &mut out);
    out.flush()?;
    result?;
    Ok(())
}
