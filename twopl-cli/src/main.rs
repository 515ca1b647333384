//! Binary entrypoint for `twopl`.

mod app;
mod ingress;

use clap::Parser;

fn main() {
    let args = app::CliArgs::parse();
    app::bootstrap::init_tracing(args.verbose);
    match app::run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("twopl: {err}");
            std::process::exit(1);
        }
    }
}
