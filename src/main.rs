mod cli;
mod commands;
mod env_loader;
mod error;
mod i18n;
mod plugin;
mod util;
mod warn;

fn main() {
    let _ = env_loader::load_dotenv();
    if let Err(err) = cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
