//! inspector-bridge binary entry point.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use inspector_bridge::cli::{self, Args};
use inspector_bridge::config::Config;
use inspector_bridge::{
    logging, BridgeError, Callback, Context, InspectorModule, LoopbackEngine, ScriptError,
};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Try 'inspector-bridge --help' for more information.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(args)?;
    logging::init_with_filter(&config.log_filter()).ok();

    info!("inspector-bridge v{}", env!("CARGO_PKG_VERSION"));

    let module = InspectorModule::new(LoopbackEngine::new()).with_options(config.to_options());
    let context = Context::with_name(config.inspector.context_name.as_str());

    let callback = Callback::new(|_, message| {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", message)
            .and_then(|()| stdout.flush())
            .map_err(|e| ScriptError::new(format!("stdout: {}", e)))
    });

    let dispatcher = module
        .start(&context, callback)
        .ok_or(BridgeError::SessionExists(context.id()))?;

    let mut dispatched = 0u64;
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        dispatcher.dispatch(&line)?;
        dispatched += 1;
    }

    module.stop(&context);
    info!(dispatched, "end of input, session closed");
    Ok(())
}
