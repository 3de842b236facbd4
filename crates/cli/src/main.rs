use std::process::ExitCode;

fn main() -> ExitCode {
    rentgate_cli::run()
}
