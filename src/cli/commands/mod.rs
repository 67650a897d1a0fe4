//! CLI command implementations.

mod bot;
mod config;
mod doctor;
mod fetch;
mod serve;
mod speak;
mod summarize;

pub use bot::run_bot;
pub use config::run_config;
pub use doctor::run_doctor;
pub use fetch::run_fetch;
pub use serve::run_serve;
pub use speak::run_speak;
pub use summarize::run_summarize;

use crate::cli::Output;
use std::future::Future;

/// Await `fut` behind a spinner, reporting failures in user terms.
async fn with_spinner<T, F>(msg: &str, fut: F) -> crate::Result<T>
where
    F: Future<Output = crate::Result<T>>,
{
    let spinner = Output::spinner(msg);
    let result = fut.await;
    spinner.finish_and_clear();

    if let Err(e) = &result {
        Output::error(e.user_message());
    }
    result
}
