use const_lang::{
    diagnostics::emit_line_error,
    interpreter::{Report, run_reader},
    options::{CliError, Input, Options, USAGE},
    output,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::process;

fn main() {
    const_lang::init_tracing();

    let options = match Options::from_env() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    if options.help {
        println!("{}", USAGE);
        return;
    }

    if let Err(err) = run(&options) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), CliError> {
    let origin = options.input.origin();
    let report = match &options.input {
        Input::Stdin => interpret_input(io::stdin().lock(), &origin)?,
        Input::File(path) => {
            let file = File::open(path).map_err(|source| CliError::Io {
                path: origin.clone(),
                source,
            })?;
            interpret_input(BufReader::new(file), &origin)?
        }
    };

    let document = output::render(&report.output, options.format)?;
    io::stdout()
        .lock()
        .write_all(document.as_bytes())
        .map_err(|source| CliError::Io {
            path: "<stdout>".into(),
            source,
        })
}

fn interpret_input(reader: impl BufRead, origin: &str) -> Result<Report, CliError> {
    run_reader(reader, |err| emit_line_error(origin, err)).map_err(|source| CliError::Io {
        path: origin.to_string(),
        source,
    })
}
