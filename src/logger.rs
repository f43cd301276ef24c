/* Logger initialization */
use std::{panic, thread};

use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::CargoEnv;

pub struct LoggerGuards {
    pub _tracing_guard: WorkerGuard,
    // option because it can be loaded without this if wanted
    pub _sentry_guard: Option<sentry::ClientInitGuard>,
}

pub struct Logger {}

impl Logger {
    pub fn init(cargo_env: CargoEnv, sentry_dsn: Option<String>) -> LoggerGuards {
        // RUST_LOG wins when set, otherwise the relay is chatty in development and only logs
        // request level information in production (segment requests are a lot of lines)
        let default_filter = match cargo_env {
            CargoEnv::Development => "debug,hyper=info,reqwest=info",
            CargoEnv::Production => "info,tower_http=warn",
        };
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

        // most hosts capture stdout so development logs go there, production writes a daily file
        let (non_blocking, guard) = match cargo_env {
            CargoEnv::Development => tracing_appender::non_blocking(std::io::stdout()),
            CargoEnv::Production => {
                tracing_appender::non_blocking(tracing_appender::rolling::daily("logs", "relay.log"))
            }
        };

        // this will just be a none type if it's not in the config
        let sentry_guard = sentry_dsn.map(|dsn| {
            sentry::init((
                dsn,
                sentry::ClientOptions {
                    release: sentry::release_name!(),
                    environment: Some(match cargo_env {
                        CargoEnv::Development => "development".into(),
                        CargoEnv::Production => "production".into(),
                    }),
                    attach_stacktrace: true,
                    ..Default::default()
                },
            ))
        });

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(matches!(cargo_env, CargoEnv::Development));

        let registry = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer);

        if sentry_guard.is_some() {
            registry.with(sentry_tracing::layer()).init();
        } else {
            registry.init();
        }

        panic::set_hook(Box::new(|info| {
            let thread = thread::current();
            let thread = thread.name().unwrap_or("unknown");
            let msg = panic_message(info.payload());
            let backtrace = backtrace::Backtrace::new();

            match info.location() {
                Some(location) => error!(
                    target: "panic", "thread '{}' panicked at '{}': {}:{}\n{:?}",
                    thread,
                    msg,
                    location.file(),
                    location.line(),
                    backtrace
                ),
                None => error!(
                    target: "panic", "thread '{}' panicked at '{}'\n{:?}",
                    thread,
                    msg,
                    backtrace
                ),
            }
        }));

        // return both guards so they're not dropped
        LoggerGuards {
            _tracing_guard: guard,
            _sentry_guard: sentry_guard,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    match payload.downcast_ref::<&'static str>() {
        Some(s) => s,
        // maybe it's on the heap!
        None => match payload.downcast_ref::<String>() {
            Some(s) => s.as_str(),
            None => "Box<Any>",
        },
    }
}
