mod cli;
mod pipeline;

// remote imports
use clap::Parser;
use cli::{Cli, TraceLevel};
use cvm_spider::dfp::{self, Layout};
use tracing::{debug, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// preproccess the trace level
fn preprocess(trace_level: Level) {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber).expect("Set subscriber");
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // set the trace level
    if let Some(trace_level) = cli.trace {
        preprocess(match trace_level {
            TraceLevel::DEBUG => Level::DEBUG,
            TraceLevel::ERROR => Level::ERROR,
            TraceLevel::INFO => Level::INFO,
            TraceLevel::TRACE => Level::TRACE,
            TraceLevel::WARN => Level::WARN,
        });
    }
    trace!("command line input recorded: {cli:?}");

    // if no trace level provided, use tui
    let tui = cli.trace.is_none();
    let layout = Layout::from(cli.dirs);

    // read cli inputs
    use cli::Commands::*;
    match cli.command {
        Fetch { index_url } => pipeline::fetch(&layout, &index_url, tui).await?,
        Unify { overwrite } => pipeline::unify(&layout, overwrite, tui).await?,
        Build { limit } => pipeline::build(&layout, limit, tui).await?,

        // `cvm run`: the whole collection, up to the datasets awaiting review
        Run {
            index_url,
            overwrite,
            limit,
        } => {
            let time = std::time::Instant::now();
            pipeline::fetch(&layout, &index_url, tui).await?;
            pipeline::unify(&layout, overwrite, tui).await?;
            pipeline::build(&layout, limit, tui).await?;
            debug!("pipeline finished, time elapsed: {:?}", time.elapsed());
        }

        // database commands share one pool, closed once done
        Load => {
            let pool = cvm_spider::pg::connect_from_env()?;
            let result = pipeline::load(&pool, &layout, tui).await;
            pool.close();
            result?;
        }
        Pivot { codes, table } => {
            let pool = cvm_spider::pg::connect_from_env()?;
            let tables = dfp::pivot::pivot(&pool, &codes, &table).await;
            pool.close();
            match tables {
                Some(tables) => println!("{}", serde_json::to_string_pretty(&tables)?),
                None => anyhow::bail!("pivot query on {table} failed"),
            }
        }
        Codes => {
            let pool = cvm_spider::pg::connect_from_env()?;
            let codes = dfp::pivot::distinct_entity_codes(&pool).await;
            pool.close();
            match codes {
                Some(codes) => {
                    for code in codes {
                        println!("{code}");
                    }
                }
                None => anyhow::bail!("entity code query failed"),
            }
        }
        Name { code } => {
            let pool = cvm_spider::pg::connect_from_env()?;
            let name = dfp::pivot::company_name(&pool, code).await;
            pool.close();
            match name {
                Some(name) => println!("{name}"),
                None => println!("no company found for entity code {code}"),
            }
        }
    }

    Ok(())
}
