use std::ffi::OsString;

use todoscope_cli::Outcome;

fn main() {
    let args: Vec<OsString> = std::env::args_os().collect();
    match todoscope_cli::run(args) {
        Ok(Outcome::Done) => {}
        Ok(Outcome::ActionFailed) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
