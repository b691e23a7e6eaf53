use log::LevelFilter;
use padcalc::repl::Session;
use padcalc::Config;
use rustyline::{error::ReadlineError, Config as EditorConfig, DefaultEditor};
use std::{env, path::PathBuf, process};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "padcalc", about = "Keypad calculator with left-to-right operator chaining")]
struct Opt {
    /// Config file to read instead of the default location
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Show debug output
    #[structopt(short, long)]
    debug: bool,

    /// Disable coloured output
    #[structopt(long)]
    no_colour: bool,

    /// Keys to press, e.g. `5 + 3 =`. Prints the display and exits.
    #[structopt(allow_hyphen_values = true)]
    keys: Vec<String>,
}

fn main() -> rustyline::Result<()> {
    let opt = Opt::from_args();
    init_logging(opt.debug);
    log::debug!("Command line arguments: {:#?}", opt);

    let config = match Config::load(opt.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            process::exit(2);
        }
    };
    if opt.no_colour || !config.colour {
        colored::control::set_override(false);
    }

    if !opt.keys.is_empty() {
        let mut session = Session::new(config.palette);
        let line = opt.keys.join(" ");
        let reply = session.handle_line(&line);
        if reply.is_input_error() {
            println!("{}", line);
            println!("{}", session.render(&reply));
            process::exit(1);
        }
        println!("{}", session.render(&reply));
        return Ok(());
    }

    let mut session = Session::new(config.palette).with_indent(config.prompt.chars().count());
    run_prompt(&mut session, &config)
}

// RUST_LOG wins when set; otherwise warnings, or debug with `--debug`.
// `:debug` raises the level at runtime, so the logger itself lets debug through.
fn init_logging(debug: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
            builder.init();
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Debug);
            builder.init();
            log::set_max_level(if debug {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            });
        }
    }
}

fn run_prompt(session: &mut Session, config: &Config) -> rustyline::Result<()> {
    let editor_config = EditorConfig::builder().auto_add_history(false).build();
    let mut rl = DefaultEditor::with_config(editor_config)?;

    loop {
        match rl.readline(&config.prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    println!("Goodbye!");
                    break;
                }
                rl.add_history_entry(line.as_str())?;

                let reply = session.handle_line(&line);
                println!("{}", session.render(&reply));
            }
            Err(ReadlineError::Interrupted) => {
                println!("Pressing enter with no input will exit as well.");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                log::error!("{:?}", err);
                break;
            }
        }
    }

    Ok(())
}
