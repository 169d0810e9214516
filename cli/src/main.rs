use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use argparse::{ArgumentParser, Store, StoreOption, StoreTrue};
use mtncl_netlist::{Catalog, Circuit, ParseError, PolymorphicCircuit};
use mtncl_synth::{SynthConfig, enumerate_polymorphic, generate, generate_polymorphic};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_tree::HierarchicalLayer;

mod report;

#[derive(Debug)]
enum Error {
    Io(PathBuf, io::Error),
    Load(PathBuf, mtncl_json::Error),
    Parse(String, ParseError),
    Usage(&'static str),
    NoCircuits,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(path, error) => write!(f, "{}: {error}", path.display()),
            Error::Load(path, error) => write!(f, "{}: {error}", path.display()),
            Error::Parse(text, error) => write!(f, "cannot parse {text:?}: {error}"),
            Error::Usage(message) => write!(f, "{message}"),
            Error::NoCircuits => write!(f, "no valid circuits could be generated"),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug)]
struct Options {
    equation: Option<String>,
    hvdd: Option<String>,
    lvdd: Option<String>,
    enumerate: bool,
    num_circuits: usize,
    library: Option<PathBuf>,
    config: Option<PathBuf>,
    output_dir: PathBuf,
    testbench: bool,
    log_level: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            equation: None,
            hvdd: None,
            lvdd: None,
            enumerate: false,
            num_circuits: 1,
            library: None,
            config: None,
            output_dir: PathBuf::from("output"),
            testbench: false,
            log_level: None,
        }
    }
}

fn parse_options() -> Options {
    let mut options = Options::default();
    {
        let mut parser = ArgumentParser::new();
        parser.set_description("Generate MTNCL threshold-gate circuits from boolean equations");
        parser.refer(&mut options.equation).add_option(
            &["-e", "--equation"],
            StoreOption,
            "Boolean equation for a single-function circuit",
        );
        parser.refer(&mut options.hvdd).add_option(&["--hvdd"], StoreOption, "Boolean equation for HVDD operation");
        parser.refer(&mut options.lvdd).add_option(&["--lvdd"], StoreOption, "Boolean equation for LVDD operation");
        parser.refer(&mut options.enumerate).add_option(
            &["--enumerate"],
            StoreTrue,
            "Search single polymorphic gates by truth table instead of merging circuits",
        );
        parser.refer(&mut options.num_circuits).add_option(
            &["-n", "--num-circuits"],
            Store,
            "Number of circuits to generate",
        );
        parser.refer(&mut options.library).add_option(
            &["-l", "--library"],
            StoreOption,
            "JSON gate library (default: built-in catalog)",
        );
        parser.refer(&mut options.config).add_option(&["-c", "--config"], StoreOption, "JSON synthesis options");
        parser.refer(&mut options.output_dir).add_option(&["-o", "--output-dir"], Store, "Output directory");
        parser.refer(&mut options.testbench).add_option(
            &["--testbench"],
            StoreTrue,
            "Write a testbench next to each single-function circuit",
        );
        parser.refer(&mut options.log_level).add_option(
            &["--log-level"],
            StoreOption,
            "Log filter directive (default: RUST_LOG, then info)",
        );
        parser.parse_args_or_exit();
    }
    options
}

fn setup_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(HierarchicalLayer::new(2).with_writer(io::stderr).with_indent_lines(true))
        .init();
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, Error> {
    let Some(path) = path else {
        return Ok(Catalog::standard());
    };
    let mut file = File::open(path).map_err(|error| Error::Io(path.to_owned(), error))?;
    let catalog = mtncl_json::import_library(&mut file).map_err(|error| Error::Load(path.to_owned(), error))?;
    info!(gates = catalog.len(), path = %path.display(), "loaded gate library");
    Ok(catalog)
}

fn load_config(path: Option<&Path>) -> Result<SynthConfig, Error> {
    let Some(path) = path else {
        return Ok(SynthConfig::default());
    };
    let mut file = File::open(path).map_err(|error| Error::Io(path.to_owned(), error))?;
    mtncl_json::import_config(&mut file).map_err(|error| Error::Load(path.to_owned(), error))
}

fn write_file(path: &Path, f: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>) -> Result<(), Error> {
    File::create(path)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            f(&mut writer)?;
            writer.flush()
        })
        .map_err(|error| Error::Io(path.to_owned(), error))?;
    debug!(path = %path.display(), "wrote");
    Ok(())
}

enum Outcome {
    Single { equation: String, circuits: Vec<Circuit> },
    Polymorphic { hvdd: String, lvdd: String, circuits: Vec<PolymorphicCircuit> },
}

fn synthesize(options: &Options, catalog: &Catalog, config: &SynthConfig) -> Result<Outcome, Error> {
    match (&options.equation, &options.hvdd, &options.lvdd) {
        (None, Some(hvdd), Some(lvdd)) => {
            let circuits = if options.enumerate {
                let matches = enumerate_polymorphic(hvdd, lvdd, catalog, options.num_circuits)
                    .map_err(|error| Error::Parse(format!("{hvdd} / {lvdd}"), error))?;
                matches.iter().filter_map(|found| found.to_circuit(catalog, hvdd, lvdd)).collect()
            } else {
                generate_polymorphic(hvdd, lvdd, catalog, config, options.num_circuits)
                    .map_err(|error| Error::Parse(format!("{hvdd} / {lvdd}"), error))?
            };
            Ok(Outcome::Polymorphic { hvdd: hvdd.clone(), lvdd: lvdd.clone(), circuits })
        }
        (Some(equation), None, None) => {
            let expr = equation.parse().map_err(|error| Error::Parse(equation.clone(), error))?;
            let circuits = generate(&expr, catalog, config, options.num_circuits);
            Ok(Outcome::Single { equation: equation.clone(), circuits })
        }
        (None, None, None) => Err(Error::Usage("either --equation or both --hvdd and --lvdd are required")),
        (None, _, _) => Err(Error::Usage("--hvdd and --lvdd must be given together")),
        (Some(_), _, _) => Err(Error::Usage("--equation cannot be combined with --hvdd or --lvdd")),
    }
}

fn run(options: &Options) -> Result<(), Error> {
    let catalog = load_catalog(options.library.as_deref())?;
    let config = load_config(options.config.as_deref())?;
    let outcome = synthesize(options, &catalog, &config)?;

    let directory = options.output_dir.as_path();
    fs::create_dir_all(directory).map_err(|error| Error::Io(directory.to_owned(), error))?;
    match &outcome {
        Outcome::Single { equation, circuits } => {
            if circuits.is_empty() {
                return Err(Error::NoCircuits);
            }
            for (index, circuit) in circuits.iter().enumerate() {
                let name = format!("circuit_{}", index + 1);
                write_file(&directory.join(format!("{name}.v")), |writer| {
                    mtncl_verilog::write_circuit(writer, circuit, &name)
                })?;
                if options.testbench {
                    write_file(&directory.join(format!("{name}_tb.v")), |writer| {
                        mtncl_verilog::write_testbench(writer, circuit, &name)
                    })?;
                }
            }
            write_file(&directory.join("circuits.json"), |writer| {
                mtncl_json::export_circuits(writer, circuits, &catalog)
            })?;
            write_file(&directory.join("README.md"), |writer| {
                report::write_report(writer, equation, circuits, &catalog, &config)
            })?;
            info!(count = circuits.len(), directory = %directory.display(), "wrote circuits");
        }
        Outcome::Polymorphic { hvdd, lvdd, circuits } => {
            if circuits.is_empty() {
                return Err(Error::NoCircuits);
            }
            if options.testbench {
                warn!("testbenches are only written for single-function circuits");
            }
            for (index, circuit) in circuits.iter().enumerate() {
                let name = format!("circuit_{}", index + 1);
                write_file(&directory.join(format!("{name}.v")), |writer| {
                    mtncl_verilog::write_polymorphic_circuit(writer, circuit, &name)
                })?;
            }
            write_file(&directory.join("circuits.json"), |writer| {
                mtncl_json::export_polymorphic(writer, circuits, &catalog)
            })?;
            write_file(&directory.join("README.md"), |writer| {
                report::write_polymorphic_report(writer, circuits, hvdd, lvdd, &catalog, &config)
            })?;
            info!(count = circuits.len(), directory = %directory.display(), "wrote polymorphic circuits");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let options = parse_options();
    setup_tracing(options.log_level.as_deref());
    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
