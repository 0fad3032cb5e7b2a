use foundry::{
    cli::{get_log_level_from_verbose, parse_cli, run},
    error::{default_error_handler, Result},
};
use std::fs::File;

fn main() {
    let cli = parse_cli();
    if let Err(err) = init_logger(cli.verbose, cli.log_file.as_deref()).and_then(|_| run(cli.command))
    {
        default_error_handler(err);
    }
}

fn init_logger(verbose: u8, log_file: Option<&std::path::Path>) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(get_log_level_from_verbose(verbose));
    if let Some(path) = log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.init();
    Ok(())
}
