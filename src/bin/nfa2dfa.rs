use std::{
    io::Read,
    path::{Path, PathBuf},
};

use determinize::prelude::*;
use owo_colors::OwoColorize;

use tracing::{debug, info, trace, warn};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn cli() -> clap::Command {
    let cmd = Command::new("nfa2dfa")
        .about("Converts an NFA into an equivalent DFA and reports its equivalent states")
        .arg(
            Arg::new("input")
                .help("file with the NFA description, `-` reads from stdin")
                .default_value("-"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .help("directory to write dfa.txt and minimized_dfa.txt to"),
        )
        .arg(
            Arg::new("no-minimize")
                .long("no-minimize")
                .action(ArgAction::SetTrue)
                .help("skip the partition refinement"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        );
    #[cfg(feature = "graphviz")]
    let cmd = cmd.arg(
        Arg::new("dot")
            .long("dot")
            .action(ArgAction::SetTrue)
            .help("draw the NFA and the DFA with graphviz, into the output directory if given"),
    );
    cmd
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn read_input(matches: &ArgMatches) -> Result<NFA, Box<dyn std::error::Error>> {
    let path = matches
        .get_one::<String>("input")
        .map(String::as_str)
        .unwrap_or("-");
    if path == "-" {
        debug!("reading NFA from stdin");
        let mut buf = String::new();
        std::io::stdin().lock().read_to_string(&mut buf)?;
        Ok(buf.parse()?)
    } else {
        debug!("reading NFA from {path}");
        Ok(text::read_nfa_file(path)?)
    }
}

/// Writes `{stem}.dot` into `dir` and renders it to `{stem}.svg`, or prints the DOT source if
/// there is no output directory.
#[cfg(feature = "graphviz")]
fn emit_graph<A: Dottable>(
    automaton: &A,
    stem: &str,
    dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dot = automaton.dot_representation();
    let Some(dir) = dir else {
        println!("{}\n{dot}\n", automaton.dot_name().bold());
        return Ok(());
    };
    let path = dir.join(format!("{stem}.dot"));
    std::fs::write(&path, dot)?;
    info!("wrote {}", path.display());

    let svg = dir.join(format!("{stem}.svg"));
    match automaton.render_to_file_name(&svg) {
        Ok(()) => info!("rendered {}", svg.display()),
        Err(e) => warn!("could not render {}: {e}", svg.display()),
    }
    Ok(())
}

#[cfg(feature = "graphviz")]
fn emit_graphs(
    matches: &ArgMatches,
    nfa: &NFA,
    dfa: &DFA,
) -> Result<(), Box<dyn std::error::Error>> {
    if !matches.get_flag("dot") {
        return Ok(());
    }
    let dir = matches.get_one::<PathBuf>("output").map(PathBuf::as_path);
    emit_graph(nfa, "nfa_graph", dir)?;
    emit_graph(dfa, "dfa_graph", dir)
}

#[cfg(not(feature = "graphviz"))]
fn emit_graphs(_: &ArgMatches, _: &NFA, _: &DFA) -> Result<(), Box<dyn std::error::Error>> {
    Ok(())
}

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    setup_logging(&matches);

    let nfa = read_input(&matches)?;
    println!("{}\n{nfa}\n", "Input".bold());

    let start = std::time::Instant::now();
    let dfa = nfa.determinize()?;
    info!(
        "determinization took {}µs and produced {} states",
        start.elapsed().as_micros(),
        dfa.size()
    );
    println!("{}\n{dfa}\n", "Result".bold());

    let report = if matches.get_flag("no-minimize") {
        None
    } else {
        let equivalences = dfa.equivalence_classes();
        println!("{}\n{equivalences}", "Equivalences".bold());
        Some(equivalences)
    };

    let output: Option<&Path> = matches.get_one::<PathBuf>("output").map(PathBuf::as_path);
    if let Some(dir) = output {
        std::fs::create_dir_all(dir)?;
        let path = dir.join("dfa.txt");
        std::fs::write(&path, text::write_dfa(&dfa))?;
        info!("wrote {}", path.display());
        if let Some(equivalences) = report {
            let path = dir.join("minimized_dfa.txt");
            std::fs::write(&path, equivalences.to_string())?;
            info!("wrote {}", path.display());
        }
    }

    emit_graphs(&matches, &nfa, &dfa)
}
