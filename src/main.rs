use std::process::ExitCode;

fn main() -> ExitCode {
    match fleetbench::entry::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
