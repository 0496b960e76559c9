use clap::{Parser, ValueEnum};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use tmsim::{
    analyze, ErrorKind, HaltMatch, InitialState, InstructionTable, JsonTrace, MachineError,
    Outcome, ProgramLoader, ProgramManager, RunConfig, Status, Tape, TextTrace, TraceSink,
    TuringMachine,
};

/// Output target that prints to the terminal instead of a file.
const CONSOLE: &str = "console";

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  tmsim-cli input.txt instructions.txt
  tmsim-cli input.txt instructions.txt -o trace.txt -s q0
  tmsim-cli --builtin binary-increment --step")]
struct Cli {
    /// File whose first line is the initial tape
    #[clap(required_unless_present_any = ["builtin", "list"])]
    input: Option<PathBuf>,

    /// Instruction table file
    #[clap(required_unless_present_any = ["builtin", "list"])]
    instructions: Option<PathBuf>,

    /// Where to write the trace: `console`, or a file that is appended to
    #[clap(short, long, default_value = CONSOLE)]
    output: String,

    /// Initial state; `smallest_key` starts in the first declared state
    #[clap(short = 's', long, default_value = "smallest_key")]
    init_state: InitialState,

    /// Wait for Enter before each step (console output on a terminal only)
    #[clap(long)]
    step: bool,

    /// Trace format
    #[clap(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Only the exact state name `halt` halts, not every name starting with it
    #[clap(long)]
    exact_halt: bool,

    /// Analyze the instruction table and exit without running it
    #[clap(long)]
    check: bool,

    /// Run a built-in program instead of files
    #[clap(short, long, conflicts_with_all = ["input", "instructions"])]
    builtin: Option<String>,

    /// List the built-in programs
    #[clap(long)]
    list: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl Cli {
    fn config(&self) -> RunConfig {
        RunConfig {
            initial_state: self.init_state.clone(),
            step_mode: self.step,
            halt_match: if self.exact_halt {
                HaltMatch::Exact
            } else {
                HaltMatch::Prefix
            },
        }
    }
}

/// Blocks on a line of stdin before forwarding each report.
struct StepGate<S> {
    inner: S,
    input: io::Stdin,
}

impl<S: TraceSink> TraceSink for StepGate<S> {
    fn report(&mut self, state: &str, tape: &Tape) -> io::Result<()> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        self.inner.report(state, tape)
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.list {
        for index in 0..ProgramManager::count() {
            if let Ok(info) = ProgramManager::info(index) {
                println!(
                    "{:<18} tape: {:?}, {} states, {} instructions",
                    info.name, info.initial_tape, info.state_count, info.instruction_count
                );
            }
        }
        return;
    }

    let code = match execute(&cli) {
        Ok(outcome) => {
            if outcome.is_ok() {
                eprintln!("{}", outcome);
            }
            outcome.exit_code()
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(code);
}

/// Loads the inputs, then analyzes or runs the machine.
fn execute(cli: &Cli) -> Result<Outcome, MachineError> {
    let (table, tape) = load(cli)?;
    let config = cli.config();

    let mut machine = match TuringMachine::from_config(&table, tape, &config) {
        Ok(machine) => machine,
        Err(kind) => return Ok(fail(kind, None)),
    };

    if cli.check {
        let findings = analyze(&table, machine.state(), config.halt_match);
        for finding in &findings {
            eprintln!("warning: {}", finding);
        }
        if let Some(first) = findings.into_iter().next() {
            return Err(first.into());
        }
        println!("{}: no findings", machine.state());
        return Ok(Outcome::NoError);
    }

    let mut sink = match open_sink(cli, &config) {
        Ok(sink) => sink,
        Err(kind) => return Ok(fail(kind, None)),
    };

    let outcome = machine.run_traced(&mut sink);
    if let (Outcome::Failed(kind), Status::Failed { last, .. }) = (outcome, machine.status()) {
        return Ok(fail(kind, Some(&last.render())));
    }

    Ok(outcome)
}

/// Loads the instruction table and initial tape, from files or a built-in program.
fn load(cli: &Cli) -> Result<(InstructionTable, Tape), MachineError> {
    if let Some(name) = &cli.builtin {
        let program = ProgramManager::get_by_name(name)?;
        return Ok((program.table.clone(), program.initial_tape()));
    }

    let (Some(input), Some(instructions)) = (&cli.input, &cli.instructions) else {
        return Err(MachineError::FileError(
            "Both an input and an instructions file are required".to_string(),
        ));
    };

    let tape = ProgramLoader::load_tape(input)?;
    let table = ProgramLoader::load_table(instructions)?;

    Ok((table, tape))
}

/// Builds the trace sink for the requested destination and format.
fn open_sink(cli: &Cli, config: &RunConfig) -> Result<Box<dyn TraceSink>, ErrorKind> {
    let console = cli.output == CONSOLE;
    let out: Box<dyn Write> = if console {
        Box::new(io::stdout())
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&cli.output)
            .map_err(|e| {
                eprintln!("Failed to open {}: {}", cli.output, e);
                ErrorKind::OpeningFile
            })?;
        Box::new(file)
    };

    let sink: Box<dyn TraceSink> = match cli.format {
        Format::Text => Box::new(TextTrace::new(out)),
        Format::Json => Box::new(JsonTrace::new(out)),
    };

    if config.step_mode && console && atty::is(atty::Stream::Stdin) {
        return Ok(Box::new(StepGate {
            inner: sink,
            input: io::stdin(),
        }));
    }

    Ok(sink)
}

/// Reports a failed run to the operator and returns its outcome.
fn fail(kind: ErrorKind, last: Option<&str>) -> Outcome {
    eprintln!("Error occurred: {} ({})", kind, kind.name());
    if let Some(configuration) = last {
        eprint!("{}", configuration);
    }

    Outcome::Failed(kind)
}
