extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate shlex;

use std::env;
use std::fs::File;
use std::io::{IsTerminal, Write};

use autocomplete::prelude::*;
use autocomplete::util::{read_file_lines, read_lines};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

//------------------------------------------------------------------------------
fn main() {
    let opts = parse_args();
    if let Err(err) = init_logger(opts.log_file.as_deref()) {
        eprintln!("ac: {err:#}");
        std::process::exit(2);
    }

    match real_main(opts) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // if downstream pipe is closed, exit silently
            if err
                .downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::BrokenPipe)
            {
                std::process::exit(0)
            }
            eprintln!("ac: {err:#}");
            std::process::exit(2)
        }
    }
}

fn init_logger(log_file: Option<&str>) -> Result<()> {
    let mut builder = env_logger::builder();
    builder.format_timestamp_nanos();
    if let Some(path) = log_file {
        let file = File::create(path).wrap_err_with(|| format!("could not create log file {path}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn parse_args() -> AutoCompleteOptions {
    let mut args = Vec::new();

    args.push(
        env::args()
            .next()
            .expect("there should be at least one arg: the application name"),
    );
    args.extend(
        env::var("AC_DEFAULT_OPTIONS")
            .ok()
            .and_then(|val| shlex::split(&val))
            .unwrap_or_default(),
    );
    for arg in env::args().skip(1) {
        args.push(arg);
    }

    AutoCompleteOptions::parse_from(args).build()
}

#[rustfmt::skip]
fn real_main(opts: AutoCompleteOptions) -> Result<i32> {
    //------------------------------------------------------------------------------
    // candidates come from --source, or from a pipe
    let candidates = match &opts.source {
        Some(path) => read_file_lines(path).wrap_err_with(|| format!("could not read {path}"))?,
        None if !std::io::stdin().is_terminal() => read_lines(std::io::stdin())?,
        None => Vec::new(),
    };
    debug!("{} candidates", candidates.len());

    //------------------------------------------------------------------------------
    // filter mode
    if let Some(query) = &opts.filter {
        return filter(&candidates, query, opts.max_count);
    }

    //------------------------------------------------------------------------------
    let print_index = opts.print_index;
    let output = AutoComplete::run_with(opts, candidates)?;
    if output.is_abort {
        return Ok(130);
    }

    //------------------------------------------------------------------------------
    // output
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", output.text)?;
    if print_index {
        match &output.selection {
            Some((_, index)) => writeln!(stdout, "{index}")?,
            None => writeln!(stdout)?,
        }
    }
    stdout.flush()?;

    Ok(0)
}

/// Prints the suggestions the field would show for `query`
pub fn filter(candidates: &[String], query: &str, max_count: usize) -> Result<i32> {
    let mut stdout = std::io::stdout();
    let filtered = filter_candidates(candidates, query);
    let rows = visible_rows(&filtered, max_count);
    for row in rows {
        writeln!(stdout, "{row}")?;
    }
    stdout.flush()?;

    Ok(if rows.is_empty() { 1 } else { 0 })
}
