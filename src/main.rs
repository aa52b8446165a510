use std::process;
use std::time::Duration;

use anyhow::Result;

use tripflow::cli::{Cli, Commands, CreateIndexArgs, ReadIndexArgs, RunArgs};
use tripflow::config::{IndexConfig, RetryPolicy, configure_thread_pool};
use tripflow::index::{IndexClient, StdoutSink};
use tripflow::pipeline::{self, RunConfig};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = dispatch(cli) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::CreateIndex(args) => create_index(args),
        Commands::Run(args) => run(args),
        Commands::ReadIndex(args) => read_index(args),
        #[cfg(feature = "io-parquet")]
        Commands::Convert(args) => {
            let rows = tripflow::io::parquet::convert_parquet_to_csv(&args.input, &args.output)?;
            println!(
                "converted {rows} rows: {} -> {}",
                args.input.display(),
                args.output.display()
            );
            Ok(())
        }
    }
}

fn create_index(args: CreateIndexArgs) -> Result<()> {
    let client = IndexClient::new(&IndexConfig {
        endpoint: args.index.endpoint,
        index: args.index.index,
    });
    let retry = RetryPolicy::new(
        args.max_attempts,
        Duration::from_millis(args.retry_delay_ms),
        Duration::from_millis(args.retry_jitter_ms),
    );
    client.ensure_index(&retry)?;
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    if let Some(threads) = args.threads {
        configure_thread_pool(threads);
    }
    let cfg = RunConfig {
        input: args.input,
        rejects_out: args.rejects_out,
        deterministic_ids: args.deterministic_ids,
    };
    if args.dry_run {
        pipeline::run(&cfg, &StdoutSink)?;
    } else {
        let client = IndexClient::new(&IndexConfig {
            endpoint: args.index.endpoint,
            index: args.index.index,
        });
        pipeline::run(&cfg, &client)?;
    }
    Ok(())
}

fn read_index(args: ReadIndexArgs) -> Result<()> {
    let client = IndexClient::new(&IndexConfig {
        endpoint: args.index.endpoint,
        index: args.index.index,
    });
    match client.search_match_all(args.size)? {
        Some(docs) => {
            for doc in docs {
                println!("{doc}");
            }
        }
        None => println!("no documents found"),
    }
    Ok(())
}
