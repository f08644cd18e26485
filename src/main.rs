use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use bodacc::pipeline::is_input_file;
use bodacc::{
    execute_stage1, parse_xml_file, process_files, split_document, Family, ProcessingConfig,
    SchemaKeys,
};

#[derive(Parser)]
#[command(name = "bodacc")]
#[command(author, version, about = "BODACC announcement normalization and flattening", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten every document of a family into a CSV file
    Process {
        /// Directory holding the XML documents (default: BODACC_INPUT_DIR or .)
        #[arg(short, long)]
        input_dir: Option<PathBuf>,

        /// Directory receiving the CSV file (default: BODACC_OUTPUT_DIR or .)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// modification, compte, prevention, or a company-filing act
        /// category (default: BODACC_TYPE_FILE or immatriculation)
        #[arg(short, long)]
        type_file: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Assemble one document without writing anything
    Inspect {
        /// Input XML document
        #[arg(short, long)]
        input: PathBuf,

        /// Family of the document (RCS-A, RCS-B, BILAN, PCL); guessed from
        /// the file name when omitted
        #[arg(short, long)]
        family: Option<Family>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input_dir,
            output_dir,
            type_file,
            verbose,
        } => {
            setup_logging(verbose);
            let mut config = ProcessingConfig::from_env();
            if let Some(input_dir) = input_dir {
                config.input_dir = input_dir;
            }
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            if let Some(type_file) = type_file {
                config.type_file = type_file;
            }
            process(config).await
        }
        Commands::Inspect {
            input,
            family,
            verbose,
        } => {
            setup_logging(verbose);
            inspect(input, family)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn process(config: ProcessingConfig) -> Result<()> {
    let report = process_files(&config).await?;

    println!("Run Summary");
    println!("===========");
    println!("Files: {} ({} unreadable)", report.files, report.failed_documents);
    println!("Announcements: {}", report.announcements);
    println!("Rejected: {}", report.rejected);
    println!("Filtered out: {}", report.filtered);
    println!("Records written: {}", report.records);
    println!("Output: {:?}", config.output_path());

    Ok(())
}

fn inspect(input: PathBuf, family: Option<Family>) -> Result<()> {
    let family = match family {
        Some(family) => family,
        None => {
            let name = input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            Family::ALL
                .into_iter()
                .find(|family| is_input_file(&name, *family))
                .with_context(|| format!("Cannot guess the family of {:?}, use --family", input))?
        }
    };

    info!("Inspecting {:?} as {}", input, family);
    let document = parse_xml_file(&input)?;
    let split = split_document(document, family)
        .with_context(|| format!("Failed to split document: {:?}", input))?;
    let parution = split.parution.clone();
    let stage1 = execute_stage1(split);

    println!("Document Analysis");
    println!("=================");
    println!("Family: {}", family);
    println!("Parution: {}", parution);
    println!("Announcements: {}", stage1.announcements.len());
    println!("Rejected: {}", stage1.rejected.len());
    println!();

    let mut acts: BTreeMap<&str, usize> = BTreeMap::new();
    for announcement in &stage1.announcements {
        let kind = announcement
            .acte
            .as_ref()
            .map(|act| act.kind.as_str())
            .unwrap_or("(none)");
        *acts.entry(kind).or_default() += 1;
    }
    println!("Acts");
    println!("----");
    for (kind, count) in &acts {
        println!("{}: {}", kind, count);
    }
    println!();

    if !stage1.rejected.is_empty() {
        println!("Structural Errors");
        println!("-----------------");
        for rejected in &stage1.rejected {
            println!("{}: {}", rejected.id, rejected.error);
        }
        println!();
    }

    let mut keys = SchemaKeys::default();
    for announcement in &stage1.announcements {
        keys.observe(announcement);
    }
    println!("Observed Keys");
    println!("-------------");
    println!("{}", keys.iter().collect::<Vec<_>>().join(", "));

    Ok(())
}
