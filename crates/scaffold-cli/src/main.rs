use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = scaffold_cli::cli::command().get_matches();

    let log_json = matches.get_flag("log-json");
    if let Err(err) = scaffold_cli::logging::init(log_json) {
        eprintln!("warning: {err}");
    }

    match scaffold_cli::run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
