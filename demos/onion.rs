use clap::Parser;
use std::io::Write;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Instant;

use cascade::chain::{compose, middleware_fn, Middleware, Next};
use cascade::runtime::run_local;

////////////////////////////////////////////////////////////////////////////////////////////////////

struct Request {
    message: String,
}

fn layer(name: &'static str) -> Rc<dyn Middleware<Request, String>> {
    middleware_fn(
        move |_context: Rc<Request>, next: Next<Request, String>| async move {
            let start = Instant::now();
            log::info!("{} enter", name);
            let result = next.run().await;
            log::info!("{} leave after {:?}", name, start.elapsed());
            result
        },
    )
}

#[derive(Parser)]
#[command(name = "Onion")]
#[command(author = "Rusty Rain <y@liu.mx>")]
#[command(version = "0.1.0")]
#[command(about = "An example of a layered middleware chain", long_about = None)]
struct Cli {
    #[arg(short, long)]
    debug: bool,
    #[arg(long, default_value_t = format!("hello cascade"))]
    message: String,
    #[arg(long, default_value_t = format!("INFO"))]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let message = cli.message;
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

    let result = run_local(async move {
        let chain = compose(&[layer("ingress"), layer("session"), layer("codec")]);

        println!("running {} layers...", chain.len());

        let handler = middleware_fn(
            |context: Rc<Request>, _next: Next<Request, String>| async move {
                Ok(context.message.to_uppercase())
            },
        );

        chain.run_with(Rc::new(Request { message }), handler).await
    })?;

    println!("{}", result);

    Ok(())
}
