//! Open one TCP connection and send `Hello <seq> at <timestamp>` to it once
//! per interval, until stopped or until the connection fails.
//!
//! ```no_run
//! use ticktock::{Config, Sender};
//! use tokio::sync::oneshot;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), ticktock::Error> {
//! let (stop_tx, stop_rx) = oneshot::channel();
//! let sender = Sender::connect(&Config::new("127.0.0.1", 6000)).await?;
//!
//! let task = tokio::spawn(sender.run(stop_rx));
//! tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//! let _ = stop_tx.send(());
//!
//! let report = task.await??;
//! println!("sent {} messages", report.sent);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod message;
mod sender;
mod seq;
mod time;

pub use config::Config;
pub use error::{ConfigError, Error};
pub use message::{Message, ParseError};
pub use sender::{run, Handle, Report, Sender};
pub use seq::{Counter, Seq};
pub use time::{Clock, Timestamp};
