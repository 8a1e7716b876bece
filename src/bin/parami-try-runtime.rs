use std::{env, process::ExitCode};

fn main() -> ExitCode {
    parami_try_runtime::logging::init();
    ExitCode::from(parami_try_runtime::command::run(env::args_os()))
}
