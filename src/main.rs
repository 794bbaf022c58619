use clap::Parser;

use tokenforge::cli::{self, args::TokenforgeArgs};

fn main() {
    let args = TokenforgeArgs::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();
    cli::run(args);
}
