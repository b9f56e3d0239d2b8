use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

mod config;
use config::{Config, DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_DIR, DEFAULT_TIMEOUT_SECS};

mod coordinate;
mod error;
mod logging;

mod release;
use release::{MAVEN_CENTRAL, Repository};

mod downloader;
use downloader::{build_client, download};

mod utils;
use utils::multierr::MultiError;

#[derive(Parser)]
#[command(name = "mvnclone")]
#[command(about = "Clone every file of a Maven artifact release into a local directory tree")]
#[command(version)]
struct Cli {
    #[arg(help = "group:artifact:version, or group:artifact for every version")]
    coordinates: Vec<String>,
    #[arg(long, help = "Repository base URL", default_value = MAVEN_CENTRAL)]
    repository: String,
    #[arg(short, long, help = "Output directory", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,
    #[arg(
        short,
        long,
        help = "Maximum downloads in flight",
        default_value_t = DEFAULT_CONCURRENCY as u16,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    concurrency: u16,
    #[arg(long, help = "Connect/read timeout in seconds", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
    #[arg(short, long = "extension", help = "Only download files with this extension (repeatable)")]
    extensions: Vec<String>,
    #[arg(short, long, help = "Verbose logging")]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            repository: Repository::new(&self.repository),
            output_dir: self.output.clone(),
            concurrency: usize::from(self.concurrency),
            timeout: Duration::from_secs(self.timeout),
            extensions: self.extensions.clone(),
        }
    }
}

fn print_usage() {
    println!("Usage: mvnclone com.group:artifact:version");
    println!("Usage: mvnclone com.group:artifact");
    println!("Use --help for available options");
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let [coordinate] = cli.coordinates.as_slice() else {
        print_usage();
        return ExitCode::SUCCESS;
    };

    logging::init_logging(cli.verbose);
    let config = cli.config();

    let client = match build_client(&config) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("mvnclone: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match download(&client, coordinate, &config).await {
        Ok(summary) => {
            let failures = MultiError::new(summary.failures);
            println!("Done");
            if failures.is_empty() {
                ExitCode::SUCCESS
            } else {
                eprintln!("mvnclone: {}", failures);
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("mvnclone: {}", err);
            ExitCode::FAILURE
        }
    }
}
