use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use env_logger::Env;
use std::io;
use volley::{Arg, Config};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let arg = Arg::parse();
    if let Some(shell) = arg.completions {
        let mut command = Arg::command();
        let name = command.get_name().to_string();
        generate(shell, &mut command, name, &mut io::stdout());
        return Ok(());
    }

    let config = Config::try_from(&arg)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    let report = runtime.block_on(volley::run(&config))?;

    print!("{}", report);
    Ok(())
}
