//! Basic usage example for the window-gate crate.
//!
//! Run with: `cargo run --example basic`

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use window_gate::{
    CancellationToken, GateError, GatedInvoker, RateLimiter, RateLimiterConfig, TimeUnit,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("window_gate=debug")),
        )
        .init();

    println!("=== Basic Window Limiter Example ===\n");

    blocking_example()?;
    println!("\n{}\n", "=".repeat(50));

    threads_example()?;
    println!("\n{}\n", "=".repeat(50));

    cancellation_example()?;

    Ok(())
}

fn blocking_example() -> Result<(), Box<dyn std::error::Error>> {
    println!("1. Three calls against 2 per second:");

    let limiter = RateLimiter::new(TimeUnit::Second, 2)?;
    let start = Instant::now();

    for i in 1..=3 {
        limiter.acquire();
        println!("   Call {} granted at {:?}", i, start.elapsed());
    }

    Ok(())
}

fn threads_example() -> Result<(), Box<dyn std::error::Error>> {
    println!("2. Six threads sharing 2 permits per 500ms:");

    let invoker = GatedInvoker::new(RateLimiter::with_config(RateLimiterConfig::new(2, 500))?);
    let start = Instant::now();

    let handles: Vec<_> = (0..6)
        .map(|id| {
            let invoker = invoker.clone();
            thread::spawn(move || {
                let result: Result<(), String> = invoker.execute(|| {
                    println!("   Thread {} ran at {:?}", id, start.elapsed());
                    if id % 2 == 0 {
                        Ok(())
                    } else {
                        Err(format!("thread {} failed", id))
                    }
                });
                result
            })
        })
        .collect();

    for handle in handles {
        if let Err(e) = handle.join().expect("worker panicked") {
            println!("   ❌ {} (permit still spent)", e);
        }
    }

    println!("\n{}", invoker.limiter().metrics());
    Ok(())
}

fn cancellation_example() -> Result<(), Box<dyn std::error::Error>> {
    println!("3. Cancelling a blocked caller:");

    let limiter = Arc::new(RateLimiter::new(TimeUnit::Hour, 1)?);
    limiter.acquire();

    let invoker = GatedInvoker::shared(limiter);
    let token = CancellationToken::new();

    let waiter = {
        let invoker = invoker.clone();
        let token = token.clone();
        thread::spawn(move || {
            let result: Result<(), GateError<String>> =
                invoker.execute_cancellable(&token, || Ok(()));
            result
        })
    };

    thread::sleep(Duration::from_millis(100));
    token.cancel();

    match waiter.join().expect("waiter panicked") {
        Err(GateError::Cancelled) => println!("   ⛔ Cancelled before running"),
        other => println!("   Unexpected: {:?}", other),
    }

    Ok(())
}
