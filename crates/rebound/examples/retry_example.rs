//! Example: Retrying operations with rebound
//!
//! This example demonstrates:
//! 1. Async retry with exponential backoff
//! 2. Aborting on errors that will never succeed
//! 3. Polling until a condition holds
//! 4. Process-wide defaults with a logging listener
//!
//! Run with:
//! ```bash
//! RUST_LOG=rebound=debug,rebound_core=debug cargo run -p rebound --example retry_example
//! ```

use rebound::defaults;
use rebound::prelude::*;
use std::error::Error;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: AtomicU32,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: AtomicU32::new(0),
            fail_count,
        }
    }

    async fn call(&self) -> Result<String, io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        if attempt <= self.fail_count {
            println!("  Attempt {attempt}: FAILED (simulating transient error)");
            Err(io::Error::other(format!("transient error on attempt {attempt}")))
        } else {
            println!("  Attempt {attempt}: SUCCESS");
            Ok("API response data".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: Async retry with exponential backoff
async fn example_exponential() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Async Retry with Exponential Backoff ===\n");

    let api = UnreliableApi::new(2);
    let start = Instant::now();

    let result = retry(|| api.call())
        .with_strategy(ExponentialDelay::new(2.0, 3, Duration::from_millis(100)))
        .run_now_async()
        .await?;

    println!("\nResult: {result}");
    println!("Total attempts: {}", api.total_attempts());
    println!("Total time: {:?}", start.elapsed());
    println!("Expected delays: 100ms + 200ms = ~300ms");

    Ok(())
}

/// Example 2: Abort on errors that will never succeed
async fn example_abort() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 2: Abort on Permission Errors ===\n");

    let permission_denied = ErrorKind::matching("permission denied", |err| {
        err.downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied)
    });

    let attempts = Arc::new(AtomicU32::new(0));
    let result = retry(|| {
        let attempts = Arc::clone(&attempts);
        async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(io::Error::new(io::ErrorKind::PermissionDenied, "auth failed"))
        }
    })
    .with_strategy(ConstantDelay::new(5, Duration::from_millis(10)))
    .abort_on(permission_denied)
    .run_now_async()
    .await;

    match result {
        Err(RetryError::Aborted(err)) => println!("Aborted immediately: {err}"),
        other => println!("Unexpected outcome: {other:?}"),
    }
    println!("Total attempts: {}", attempts.load(Ordering::SeqCst));

    Ok(())
}

/// Example 3: Poll a blocking check until it reports ready
fn example_poll_until() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 3: Poll Until Ready ===\n");

    let mut polls = 0;
    let status = retry(|| {
        polls += 1;
        let status = if polls < 4 { "pending" } else { "ready" };
        println!("  Poll {polls}: {status}");
        Ok::<_, io::Error>(status)
    })
    .with_strategy(LinearDelay::new(10.0, 10, Duration::from_millis(10)))
    .run_until(|status| *status == "ready")?;

    println!("Final status: {status}");

    Ok(())
}

/// Example 4: Defaults shared by every session
async fn example_defaults() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 4: Process-wide Defaults ===\n");

    defaults::set_default_strategy(ProgressiveDelay::new(1.0, 2, Duration::from_millis(20)));
    defaults::set_default_listener(rebound::listeners::log_failures());

    let api = Arc::new(UnreliableApi::new(5));
    let result = retry(|| {
        let api = Arc::clone(&api);
        async move { api.call().await }
    })
    .run_now_async()
    .await;

    if let Err(err) = &result {
        println!("Gave up: {err}");
    }
    println!("Total attempts: {}", api.total_attempts());

    defaults::reset_defaults();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("==============================================");
    println!("   rebound: Retry Examples");
    println!("==============================================");

    example_exponential().await?;
    example_abort().await?;
    example_poll_until()?;
    example_defaults().await?;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
