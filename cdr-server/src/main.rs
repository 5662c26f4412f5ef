use clap::Parser;
use log::{info, warn};
use miette::{IntoDiagnostic, Result};
use std::io;
use std::time::Duration;
use tokio_graceful_shutdown::{SubsystemBuilder, Toplevel};

use cdr_server::file::{encode_records, read_content, read_records, write_lines};
use cdr_server::web::Web;
use cdr_server::{Cli, Command, Session, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.verbose.log_level_filter())
        .format_timestamp_millis()
        .init();

    match args.command.clone().unwrap_or(Command::Serve) {
        Command::Parse { file } => {
            let content = read_content(&file).into_diagnostic()?;
            let name = file.file_name().map(|n| n.to_string_lossy().into_owned());
            let report = cdr_core::parse_content(name.as_deref(), &content);
            info!(
                "{}: {} parsed, {} skipped, {} errors",
                report.file_name, report.parsed_lines, report.skipped_lines, report.errors
            );
            serde_json::to_writer_pretty(io::stdout().lock(), &report).into_diagnostic()?;
            println!();
            Ok(())
        }
        Command::Encode { file } => {
            let records = read_records(&file).into_diagnostic()?;
            let (lines, failed) = encode_records(&records);
            let written = write_lines(io::stdout().lock(), &lines).into_diagnostic()?;
            if failed > 0 {
                warn!("{} of {} records could not be encoded", failed, records.len());
            }
            info!("Encoded {} records", written);
            Ok(())
        }
        Command::Serve => serve(args).await,
    }
}

async fn serve(args: Cli) -> Result<()> {
    info!("cdr-server {} starting", VERSION);

    let session = Session::new(args).into_diagnostic()?;
    let web = Web::new(session);

    Toplevel::new(|s| async move {
        s.start(SubsystemBuilder::new("Webserver", |a| web.run(a)));
    })
    .catch_signals()
    .handle_shutdown_requests(Duration::from_secs(5))
    .await?;

    info!("cdr-server stopped");
    Ok(())
}
