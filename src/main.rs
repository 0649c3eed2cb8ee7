use clap::{App, Arg};
use std::fs;
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vox::printer::print_program;
use vox::{parse_incremental, tokenize, Vox, VoxError};

struct Options {
    tokens: bool,
    ast: bool,
}

fn main() {
    init_tracing();

    let matches = App::new("vox")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Runs a Vox script, or starts a prompt when none is given")
        .arg(
            Arg::with_name("script")
                .help("Script to run")
                .index(1),
        )
        .arg(
            Arg::with_name("tokens")
                .long("tokens")
                .help("Prints the token stream before running"),
        )
        .arg(
            Arg::with_name("ast")
                .long("ast")
                .help("Prints the parsed program instead of running it"),
        )
        .get_matches();

    let options = Options {
        tokens: matches.is_present("tokens"),
        ast: matches.is_present("ast"),
    };

    match matches.value_of("script") {
        Some(path) => run_file(path, &options),
        None => {
            if let Err(e) = run_prompt(&options) {
                eprintln!("{}", e);
                std::process::exit(74);
            }
        }
    }
}

/// Logging is off unless `VOX_LOG` holds a filter such as `vox=debug`.
fn init_tracing() {
    if let Ok(filter) = EnvFilter::try_from_env("VOX_LOG") {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(filter)
            .init();
    }
}

fn run_file(path: &str, options: &Options) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Could not read {}: {}", path, e);
            std::process::exit(66);
        }
    };

    let mut vox = Vox::new();
    match run(&mut vox, &source, options) {
        Ok(()) => (),
        Err(VoxError::Syntax(errors)) | Err(VoxError::Incomplete(errors)) => {
            for error in errors {
                eprintln!(":( Syntax Error: {}", error);
            }
            std::process::exit(65);
        }
        Err(VoxError::Runtime(error)) => {
            eprintln!(":( Runtime Error: {}", error);
            std::process::exit(70);
        }
    }
}

fn run_prompt(options: &Options) -> io::Result<()> {
    let mut vox = Vox::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut source = String::new();

    loop {
        print!("{}", if source.is_empty() { ">> " } else { " | " });
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => {
                println!();
                return Ok(());
            }
        };
        source.push('\n');
        source.push_str(&line);

        match run(&mut vox, &source, options) {
            // Keep what we have and ask for the rest of the statement.
            Err(VoxError::Incomplete(_)) => continue,
            Err(VoxError::Syntax(errors)) => {
                for error in errors {
                    println!(":( Syntax Error: {}", error);
                }
            }
            Err(VoxError::Runtime(error)) => println!(":( Runtime Error: {}", error),
            Ok(()) => (),
        }
        source.clear();
    }
}

fn run(vox: &mut Vox, source: &str, options: &Options) -> Result<(), VoxError> {
    let parsed = parse_incremental(source);
    // The prompt comes back for the rest; dump the statement once it is whole.
    if let Err(VoxError::Incomplete(_)) = parsed {
        return parsed.map(|_| ());
    }
    if options.tokens {
        for token in tokenize(source) {
            println!("{}", token);
        }
    }
    let program = parsed?;
    if options.ast {
        println!("{}", print_program(&program));
        return Ok(());
    }
    vox.execute(&program)
}
