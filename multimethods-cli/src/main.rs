//! Multimethods demo binary.
//!
//! Registers a small overload set and runs a scripted call sequence
//! against it, printing each resolution. Run with: `multimethods [COMMAND]`

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use multimethods::{tags, DispatchError, Dispatcher, Registry, Value};

#[derive(Parser)]
#[command(name = "multimethods")]
#[command(about = "Demo driver for the multimethods dispatch engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bound (method-style) dispatch demo
    Methods,
    /// Run the free-function dispatch demo
    Functions,
}

/// The receiver type for the bound-dispatch demo.
#[derive(Debug)]
struct Pair {
    i: i64,
    j: i64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let registry = Registry::new();
    register_pair_methods(&registry)?;
    register_double(&registry)?;

    match cli.command {
        Some(Commands::Methods) => run_methods_demo(&registry)?,
        Some(Commands::Functions) => run_functions_demo(&registry)?,
        None => {
            run_methods_demo(&registry)?;
            println!();
            run_functions_demo(&registry)?;
        }
    }

    Ok(())
}

/// Overloads of `set` for `Pair`, keyed by the exact argument types.
fn register_pair_methods(registry: &Registry) -> Result<()> {
    registry.register_method::<Pair, _>("set", tags![i64], |_, receiver, args| {
        info!("set(i64) selected");
        receiver.get_mut::<Pair>()?.i = *args[0].get::<i64>()?;
        Ok(Value::unit())
    })?;
    registry.register_method::<Pair, _>("set", tags![f64], |registry, receiver, args| {
        info!("set(f64) selected, delegating to set(i64)");
        let truncated = *args[0].get::<f64>()? as i64;
        Dispatcher::new(registry).call_method(receiver, "set", &[Value::new(truncated)])
    })?;
    registry.register_method::<Pair, _>("set", tags![String], |registry, receiver, args| {
        info!("set(String) selected, delegating to set(i64)");
        let parsed: i64 = args[0]
            .get::<String>()?
            .parse()
            .map_err(DispatchError::implementation)?;
        Dispatcher::new(registry).call_method(receiver, "set", &[Value::new(parsed)])
    })?;
    registry.register_method::<Pair, _>("set", tags![i64, i64], |_, receiver, args| {
        info!("set(i64, i64) selected");
        let pair = receiver.get_mut::<Pair>()?;
        pair.i = *args[0].get::<i64>()?;
        pair.j = *args[1].get::<i64>()?;
        Ok(Value::unit())
    })?;
    Ok(())
}

/// Overloads of the free function `double`.
fn register_double(registry: &Registry) -> Result<()> {
    registry.register_function("double", tags![i64], |_, args| {
        info!("double(i64) selected");
        Ok(Value::new(2 * args[0].get::<i64>()?))
    })?;
    registry.register_function("double", tags![f64], |_, args| {
        info!("double(f64) selected");
        Ok(Value::new(2.0 * args[0].get::<f64>()?))
    })?;
    registry.register_function("double", tags![String], |_, args| {
        info!("double(String) selected");
        let s = args[0].get::<String>()?;
        Ok(Value::new(format!("{s}{s}")))
    })?;
    Ok(())
}

fn run_methods_demo(registry: &Registry) -> Result<()> {
    println!("-- bound dispatch --");
    let dispatcher = registry.dispatcher();
    let mut pair = Value::new(Pair { i: 2, j: 0 });

    dispatcher.call_method(&mut pair, "set", &[Value::new(1.0f64)])?;
    println!("set(1.0)   -> {:?}", pair.get::<Pair>()?);

    dispatcher.call_method(&mut pair, "set", &[Value::from("10")])?;
    println!("set(\"10\")  -> {:?}", pair.get::<Pair>()?);

    dispatcher.call_method(&mut pair, "set", &[Value::new(4i64)])?;
    println!("set(4)     -> {:?}", pair.get::<Pair>()?);

    dispatcher.call_method(&mut pair, "set", &[Value::new(6i64), Value::new(7i64)])?;
    println!("set(6, 7)  -> {:?}", pair.get::<Pair>()?);

    // No (f64, f64) overload exists; show the diagnostic instead of failing.
    match dispatcher.call_method(&mut pair, "set", &[Value::new(6.6f64), Value::new(6.9f64)]) {
        Ok(_) => println!("set(6.6, 6.9) -> unexpectedly resolved"),
        Err(err) => {
            println!("set(6.6, 6.9) -> error: {err}");
            for key in err.known_overloads() {
                println!("  registered: {key}");
            }
        }
    }

    Ok(())
}

fn run_functions_demo(registry: &Registry) -> Result<()> {
    println!("-- free dispatch --");
    let dispatcher = registry.dispatcher();

    let result = dispatcher.call_function("double", &[Value::new(1.4f64)])?;
    println!("double(1.4)  -> {}", result.get::<f64>()?);

    let result = dispatcher.call_function("double", &[Value::new(3i64)])?;
    println!("double(3)    -> {}", result.get::<i64>()?);

    let result = dispatcher.call_function("double", &[Value::from("ab")])?;
    println!("double(\"ab\") -> {:?}", result.get::<String>()?);

    match dispatcher.call_function("double", &[Value::new(1i64), Value::new(2i64)]) {
        Ok(_) => println!("double(1, 2) -> unexpectedly resolved"),
        Err(err) => println!("double(1, 2) -> error: {err}"),
    }

    Ok(())
}
