use std::io::Write;

use tmpl::cli::{self, CliArgs};
use tmpl::template::Template;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("tmpl: {e}");
            eprintln!("{}", cli::USAGE);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli::log_filter(args.verbose)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("tmpl: {e}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), String> {
    let text = cli::read_template(&args.template)?;
    let data = cli::load_data(&args.data)?;

    let tmpl = match args.template_name() {
        Some(name) => Template::named(name),
        None => Template::new(),
    };
    tracing::debug!(name = ?tmpl.name(), bytes = text.len(), "rendering");

    let out = tmpl.execute(&text, data).map_err(|e| match tmpl.name() {
        Some(name) => format!("{name}: {e}"),
        None => e.to_string(),
    })?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(out.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| format!("writing output: {e}"))
}
