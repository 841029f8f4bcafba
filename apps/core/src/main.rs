use std::process::ExitCode;

use settingsfind_core::runtime::{parse_cli_args, run_with_options};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_cli_args(&args).and_then(run_with_options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("settingsfind: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}
