//! Process-wide defaults.
//!
//! Every test here mutates global state, so each one holds `SERIAL` and starts
//! from the built-in defaults.

use rebound::defaults;
use rebound::prelude::*;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    let guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
    defaults::reset_defaults();
    guard
}

fn always_fails() -> impl FnMut() -> Result<(), io::Error> {
    || Err(io::Error::other("down"))
}

fn attempts_of<E>(result: Result<(), RetryError<E>>) -> u64 {
    match result {
        Err(RetryError::Exhausted { attempts, .. }) => attempts,
        Err(RetryError::Aborted(_)) => 1,
        _ => panic!("session did not fail"),
    }
}

#[derive(Debug, Error)]
#[error("timed out")]
struct TimedOut;

#[test]
fn test_sessions_keep_their_snapshot_strategy() {
    let _guard = serial();

    defaults::set_default_strategy(ConstantDelay::new(1, Duration::from_millis(1)));
    let before = retry(always_fails());

    defaults::set_default_strategy(ConstantDelay::new(3, Duration::from_millis(1)));
    let after = retry(always_fails());

    // The earlier session runs after the change and still sees its snapshot.
    assert_eq!(attempts_of(before.run_now()), 2);
    assert_eq!(attempts_of(after.run_now()), 4);
}

#[test]
fn test_builtin_defaults() {
    let _guard = serial();

    let snapshot = defaults::snapshot();
    assert_eq!(
        format!("{:?}", snapshot.strategy()),
        format!("{:?}", ConstantDelay::new(30, Duration::from_secs(1)))
    );
    assert!(snapshot.listeners().is_empty());
    assert!(snapshot.retry_on().is_empty());
    assert!(snapshot.abort_on().is_empty());
    assert_eq!(defaults::tunables(), Tunables::default());
}

#[test]
fn test_reset_defaults_is_idempotent() {
    let _guard = serial();

    defaults::set_default_strategy(InfiniteRetries::new(Duration::from_millis(5)));
    defaults::add_default_listener(|_, _| Ok(()));
    defaults::add_default_retry_kind(ErrorKind::of::<TimedOut>());
    defaults::add_default_abort_kind(ErrorKind::of::<io::Error>());
    defaults::set_default_max_retries(2);

    defaults::reset_defaults();
    let once = format!("{:?}", defaults::snapshot());
    defaults::reset_defaults();
    let twice = format!("{:?}", defaults::snapshot());

    assert_eq!(once, twice);
    assert_eq!(once, format!("{:?}", Defaults::default()));
}

#[test]
fn test_default_listeners_run_before_session_listeners() {
    let _guard = serial();
    let log = Arc::new(Mutex::new(Vec::new()));

    let replaced = Arc::clone(&log);
    defaults::add_default_listener(move |_, _| {
        replaced.lock().unwrap().push("replaced");
        Ok(())
    });

    let first = Arc::clone(&log);
    defaults::set_default_listener(move |_, _| {
        first.lock().unwrap().push("default 1");
        Ok(())
    });
    let second = Arc::clone(&log);
    defaults::add_default_listener(move |_, _| {
        second.lock().unwrap().push("default 2");
        Ok(())
    });

    let session = Arc::clone(&log);
    let result = retry(always_fails())
        .with_strategy(ConstantDelay::new(0, Duration::from_millis(1)))
        .on_failure(move |_, _| {
            session.lock().unwrap().push("session");
            Ok(())
        })
        .run_now();

    assert_eq!(attempts_of(result), 1);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["default 1", "default 2", "session"]
    );
}

#[test]
fn test_default_retry_kinds() {
    let _guard = serial();
    defaults::set_default_strategy(ConstantDelay::new(2, Duration::from_millis(1)));

    assert!(defaults::add_default_retry_kind(ErrorKind::of::<TimedOut>()));
    assert!(!defaults::add_default_retry_kind(ErrorKind::of::<TimedOut>()));

    assert_eq!(attempts_of(retry(|| Err::<(), _>(TimedOut)).run_now()), 3);

    // io::Error is outside the retry set now.
    assert!(matches!(
        retry(always_fails()).run_now(),
        Err(RetryError::Aborted(_))
    ));

    assert!(defaults::remove_default_retry_kind(&ErrorKind::of::<TimedOut>()));
    assert!(!defaults::remove_default_retry_kind(&ErrorKind::of::<TimedOut>()));
    assert_eq!(attempts_of(retry(always_fails()).run_now()), 3);
}

#[test]
fn test_reset_default_retry_kinds_retries_everything() {
    let _guard = serial();
    defaults::set_default_strategy(ConstantDelay::new(1, Duration::from_millis(1)));
    defaults::add_default_retry_kind(ErrorKind::of::<TimedOut>());

    defaults::reset_default_retry_kinds();
    defaults::reset_default_retry_kinds();

    assert!(defaults::snapshot().retry_on().is_empty());
    assert_eq!(attempts_of(retry(always_fails()).run_now()), 2);
}

#[test]
fn test_default_abort_kind() {
    let _guard = serial();
    defaults::add_default_abort_kind(ErrorKind::of::<io::Error>());

    let mut calls = 0;
    let result = retry(|| {
        calls += 1;
        Err::<(), _>(io::Error::other("fatal"))
    })
    .run_now();

    assert!(matches!(result, Err(RetryError::Aborted(_))));
    assert_eq!(calls, 1);
}

#[test]
fn test_tunables_shape_strategy_constructors_only() {
    let _guard = serial();

    defaults::set_default_delay(Duration::from_millis(7));
    defaults::set_default_max_retries(4);

    assert_eq!(
        defaults::tunables(),
        Tunables {
            delay: Duration::from_millis(7),
            max_retries: 4,
        }
    );

    let constant = defaults::constant();
    assert_eq!(constant.next_delay(1), Duration::from_millis(7));
    assert!(constant.should_quit(5));
    assert!(!constant.should_quit(4));

    assert_eq!(defaults::linear(10.0).next_delay(2), Duration::from_millis(17));
    assert_eq!(defaults::exponential(2.0).next_delay(3), Duration::from_millis(28));
    assert_eq!(defaults::progressive(1.0).next_delay(3), Duration::from_millis(21));

    // The installed default strategy is untouched.
    assert_eq!(
        format!("{:?}", defaults::snapshot().strategy()),
        format!("{:?}", ConstantDelay::new(30, Duration::from_secs(1)))
    );
}

#[test]
fn test_strategy_from_config() {
    let _guard = serial();

    let config: StrategyConfig = serde_json::from_str(
        r#"{ "kind": "linear", "scale_factor": 1.0, "delay_ms": 1, "max_retries": 2 }"#,
    )
    .unwrap();
    defaults::set_default_strategy_config(&config).unwrap();
    assert_eq!(attempts_of(retry(always_fails()).run_now()), 3);

    let invalid = StrategyConfig::Exponential {
        scale_factor: f64::NAN,
        delay_ms: 1,
        max_retries: 1,
    };
    assert!(defaults::set_default_strategy_config(&invalid).is_err());
    assert_eq!(attempts_of(retry(always_fails()).run_now()), 3);
}

#[test]
fn test_load_env_installs_constant_strategy() {
    let _guard = serial();

    temp_env::with_vars(
        [
            ("REBOUND_DELAY_MS", Some("2")),
            ("REBOUND_MAX_RETRIES", Some("3")),
        ],
        || {
            let tunables = defaults::load_env().unwrap();
            assert_eq!(tunables.delay, Duration::from_millis(2));
            assert_eq!(tunables.max_retries, 3);
        },
    );

    assert_eq!(defaults::tunables().max_retries, 3);
    assert_eq!(attempts_of(retry(always_fails()).run_now()), 4);
}

#[test]
fn test_load_env_unset_keeps_builtin_values() {
    let _guard = serial();

    temp_env::with_vars_unset(["REBOUND_DELAY_MS", "REBOUND_MAX_RETRIES"], || {
        assert_eq!(defaults::load_env().unwrap(), Tunables::default());
    });
}

#[test]
fn test_load_env_rejects_invalid_values() {
    let _guard = serial();
    defaults::set_default_max_retries(9);

    temp_env::with_var("REBOUND_MAX_RETRIES", Some("many"), || {
        let err = defaults::load_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv { var: "REBOUND_MAX_RETRIES", .. }
        ));
    });

    assert_eq!(defaults::tunables().max_retries, 9);
}

#[test]
fn test_log_failures_listener_never_fails_the_session() {
    let _guard = serial();
    defaults::set_default_listener(rebound::listeners::log_failures());

    let result = retry(always_fails())
        .with_strategy(ConstantDelay::new(1, Duration::from_millis(1)))
        .run_now();

    assert_eq!(attempts_of(result), 2);
}

#[cfg(unix)]
#[test]
fn test_load_env_rejects_non_utf8_values() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let _guard = serial();
    defaults::set_default_max_retries(9);

    temp_env::with_var(
        "REBOUND_MAX_RETRIES",
        Some(OsStr::from_bytes(b"\xff\xfe")),
        || {
            let err = defaults::load_env().unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidEnv { var: "REBOUND_MAX_RETRIES", .. }
            ));
        },
    );

    assert_eq!(defaults::tunables().max_retries, 9);
}
