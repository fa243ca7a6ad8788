use anyhow::Context;
use clap::Parser;
use ls8::{load_file, Machine, MachineConfig};
use std::path::PathBuf;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ls8", about = "Run an LS-8 program.")]
struct Args {
    /// Program file: one binary literal per line, `#` starts a comment.
    #[arg(value_name = "PROGRAM")]
    program: PathBuf,

    /// Abort after this many instructions.
    #[arg(long, value_name = "N", env = "LS8_MAX_CYCLES")]
    max_cycles: Option<u64>,

    /// Log a TRACE line before every instruction (stderr).
    #[arg(long, default_value_t = false)]
    trace: bool,

    /// Write a JSON snapshot of the machine here when the run ends.
    #[arg(long, value_name = "PATH")]
    dump_state: Option<PathBuf>,
}

fn init_logging(trace: bool) {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if trace {
        if let Ok(directive) = "ls8::trace=trace".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let program = load_file(&args.program)
        .with_context(|| format!("loading {}", args.program.display()))?;

    let mut machine = Machine::with_config(MachineConfig {
        max_cycles: args.max_cycles,
        trace: args.trace,
    });
    machine.load(&program)?;

    let result = machine.run_to_stdout();

    if let Some(path) = &args.dump_state {
        machine
            .snapshot()
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let summary = result?;
    tracing::info!(cycles = summary.cycles, "run complete");
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.trace);
    if let Err(err) = run(args) {
        eprintln!("fatal: {err:#}");
        std::process::exit(1);
    }
}
