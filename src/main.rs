// src/main.rs

use taskcenter::{cli, logging, run};

#[tokio::main]
async fn main() {
    let code = match run_main().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("taskcenter error: {err:?}");
            1
        }
    };
    // Exit explicitly: the stdin reader thread may still be parked on a read.
    std::process::exit(code);
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
