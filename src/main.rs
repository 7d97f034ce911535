use commitpaint::cli::Cli;
use commitpaint::logging;
use console::style;
use std::process::ExitCode;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    logging::setup_logger();

    let cli = Cli::parse();
    match cli.execute() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", style("[ERROR]").red().bold());
            ExitCode::FAILURE
        }
    }
}
