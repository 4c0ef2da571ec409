use clap::Parser;
use std::io::Write;
use std::rc::Rc;
use std::str::FromStr;

use cascade::chain::{compose, middleware_fn, Next};
use cascade::error::Error;
use cascade::runtime::run_local;

////////////////////////////////////////////////////////////////////////////////////////////////////

struct Job {
    name: String,
    fail: bool,
}

#[derive(Parser)]
#[command(name = "Recover")]
#[command(author = "Rusty Rain <y@liu.mx>")]
#[command(version = "0.1.0")]
#[command(about = "An example of catching a downstream fault around next", long_about = None)]
struct Cli {
    #[arg(short, long)]
    debug: bool,
    #[arg(short, long)]
    fail: bool,
    #[arg(long, default_value_t = format!("INFO"))]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let fail = cli.fail;
    let log_level = log::LevelFilter::from_str(&cli.log_level)?;
    if cli.debug {
        env_logger::Builder::new()
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{}:{} [{}] {} - {}",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0),
                    record.level(),
                    chrono::Local::now().format("%H:%M:%S.%6f"),
                    record.args()
                )
            })
            .filter(None, log_level)
            .init();
    }

    let outcome = run_local(async move {
        let guard = middleware_fn(|context: Rc<Job>, next: Next<Job, String>| async move {
            match next.run().await {
                Ok(outcome) => Ok(outcome),
                Err(err) => {
                    log::warn!("{} failed: {}", context.name, err);
                    Ok(format!("{} recovered with a fallback", context.name))
                }
            }
        });
        let worker = middleware_fn(|context: Rc<Job>, _next: Next<Job, String>| async move {
            if context.fail {
                return Err(Error::handler(format!("{} hit a fault", context.name)));
            }
            Ok(format!("{} finished cleanly", context.name))
        });

        let chain = compose(&[guard, worker]);
        chain
            .run(Rc::new(Job {
                name: "job-42".to_string(),
                fail,
            }))
            .await
    })?;

    println!("{}", outcome);

    Ok(())
}
