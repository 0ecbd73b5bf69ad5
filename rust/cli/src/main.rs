use std::io;

fn main() {
    // Logs go to stderr; a second subscriber (tests, embedding) is not an error
    let _ = trivium_runtime::init_logging();

    let mut out = io::stdout();
    let mut err = io::stderr();
    std::process::exit(trivium_cli::run(std::env::args(), &mut out, &mut err));
}
