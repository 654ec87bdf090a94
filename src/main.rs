use std::process::ExitCode;

fn main() -> ExitCode {
    gohealthy_lib::run()
}
