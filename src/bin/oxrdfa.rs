//! Command line demonstration of `oxrdfa`: parses an RDFa document and writes its default graph
//! as N-Triples, with processor-graph messages logged through `tracing`.

use std::fs::File;
use std::io::{self, stdout, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use oxrdfa::{HostLanguageHint, RdfaParser, RdfaVersionHint};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about, version, name = "oxrdfa")]
/// Extracts RDF triples from RDFa annotations in an XML/XHTML1/HTML document.
struct Args {
    /// The file to parse. Reads from stdin if not given.
    #[arg(value_hint = ValueHint::FilePath)]
    file: Option<PathBuf>,
    /// The document's base IRI, used to resolve relative references.
    #[arg(short, long)]
    base: String,
    /// Force the RDFa version instead of sniffing it from the document.
    #[arg(long, value_enum)]
    rdfa_version: Option<RdfaVersionArg>,
    /// Force the host language instead of sniffing it from the document.
    #[arg(long, value_enum)]
    host_language: Option<HostLanguageArg>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum RdfaVersionArg {
    #[value(name = "1.0")]
    V1_0,
    #[value(name = "1.1")]
    V1_1,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum HostLanguageArg {
    Xml,
    Xhtml1,
    Html,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut parser = RdfaParser::new(args.base).context("the base IRI must be absolute")?;
    if let Some(version) = args.rdfa_version {
        parser = parser.with_rdfa_version_hint(match version {
            RdfaVersionArg::V1_0 => RdfaVersionHint::V1_0,
            RdfaVersionArg::V1_1 => RdfaVersionHint::V1_1,
        });
    }
    if let Some(host_language) = args.host_language {
        parser = parser.with_host_language_hint(match host_language {
            HostLanguageArg::Xml => HostLanguageHint::Xml1,
            HostLanguageArg::Xhtml1 => HostLanguageHint::Xhtml1,
            HostLanguageArg::Html => HostLanguageHint::Html,
        });
    }

    let stdin;
    let input: Box<dyn io::Read> = match &args.file {
        Some(path) => Box::new(File::open(path).with_context(|| format!("failed to open {}", path.display()))?),
        None => {
            stdin = io::stdin();
            Box::new(stdin.lock())
        }
    };

    let mut out = BufWriter::new(stdout().lock());
    let mut reader = parser.parse_read(BufReader::new(input));
    for triple in &mut reader {
        writeln!(out, "{} .", triple?)?;
    }
    for message in reader.drain_processor_messages() {
        tracing::info!(?message, "processor graph message");
    }
    out.flush()?;
    Ok(())
}
