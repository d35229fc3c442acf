//! fsport - drive the asynchronous filesystem port from the command line

use anyhow::{Context, Result};
use clap::Parser;
use fsport::cli::{Args, Command};
use fsport::filesystem::read_file_content;
use fsport::{FileSystem, InstrumentedFileSystem, LocalFileSystem};
use std::io::{Read, Write};
use tracing::info;

#[compio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    tracing_subscriber::fmt()
        .with_max_level(args.output.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let fs = InstrumentedFileSystem::new(LocalFileSystem::new(args.backend.to_options()?));
    info!(
        "Using {} filesystem rooted at {}",
        fs.name(),
        fs.inner().options().base_dir().display()
    );

    run(&fs, &args.command).await?;

    let counts = fs.counts();
    info!(
        "{} operation(s), {} error(s), {} byte(s) read, {} byte(s) written",
        counts.total_operations(),
        counts.errors,
        counts.bytes_read,
        counts.bytes_written
    );
    Ok(())
}

async fn run<F: FileSystem>(fs: &F, command: &Command) -> Result<()> {
    match command {
        Command::Read { path } => {
            let data = fs.read(path).await?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
        Command::Write { path, input } => {
            let data = match input {
                Some(input) => read_file_content(input)
                    .await
                    .with_context(|| format!("Failed to read input file {}", input.display()))?,
                None => {
                    let mut data = Vec::new();
                    std::io::stdin()
                        .read_to_end(&mut data)
                        .context("Failed to read stdin")?;
                    data
                }
            };
            fs.write(path, &data).await?;
        }
        Command::Move { from, to } => fs.move_file(from, to).await?,
        Command::Remove { path } => fs.remove(path).await?,
        Command::Stat { path } => {
            let stat = fs.stat(path).await?;
            println!(
                "exists={} is_directory={} is_file={} last_modified={} type={}",
                stat.exists,
                stat.is_directory,
                stat.is_file,
                stat.last_modified,
                stat.file_type()
            );
        }
        Command::Resolve { path } => println!("{}", fs.resolve(path)),
    }
    Ok(())
}
