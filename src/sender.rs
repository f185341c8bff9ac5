use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use bytes::BytesMut;
use tokio::{
    io::AsyncWriteExt as _,
    net::TcpStream,
    select, spawn,
    sync::oneshot::{self, error::TryRecvError},
    task::JoinHandle,
    time,
};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Error;
use crate::message::Message;
use crate::seq::Counter;
use crate::time::Clock;

/// An open connection which sends a [`Message`] every interval.
///
/// Holding a `Sender` means the connection has been established; there is no
/// way back to connecting. The stream is closed when the `Sender` is dropped,
/// including when [`run`][Sender::run] returns an error.
#[derive(Debug)]
pub struct Sender {
    stream: TcpStream,
    address: String,
    interval: Duration,
    clock: Clock,
    seq: Counter,
    buf: BytesMut,
}

impl Sender {
    /// Open a TCP connection to the configured receiver.
    ///
    /// Fails with [`Error::Connect`] if the host can't be resolved or the peer
    /// is unreachable or refuses the connection.
    pub async fn connect(config: &Config) -> Result<Self, Error> {
        config.validate()?;

        let address = config.address();
        let stream = match TcpStream::connect(address.as_str()).await {
            Ok(stream) => stream,
            Err(source) => return Err(Error::Connect { address, source }),
        };

        info!("connected to {address}");

        Ok(Self {
            stream,
            address,
            interval: config.interval,
            clock: Clock::new(),
            seq: Counter::new(),
            buf: BytesMut::with_capacity(64),
        })
    }

    /// Send messages until `stop` fires (or its sender is dropped), waiting
    /// one interval after each.
    ///
    /// `stop` is checked before each write and during each wait. A write that
    /// has started always finishes (or fails) before the loop ends, so the
    /// stream never ends with part of a message.
    ///
    /// The first failed write ends the loop with [`Error::Write`].
    pub async fn run(mut self, mut stop: oneshot::Receiver<()>) -> Result<Report, Error> {
        loop {
            // not raced against the write: a dropped `write_all` can tear a message
            match stop.try_recv() {
                Err(TryRecvError::Empty) => {}
                _ => break,
            }

            self.send().await?;

            select! {
                biased;

                _ = &mut stop => break,

                _ = time::sleep(self.interval) => {}
            }
        }

        let report = self.report();
        info!(sent = report.sent, "stopped sending to {}", self.address);

        Ok(report)
    }

    /// Build and write the next [`Message`], without waiting.
    ///
    /// The sequence number only advances once the whole message has been
    /// written.
    pub async fn send(&mut self) -> Result<Message, Error> {
        let seq = self.seq.peek();
        let message = Message::new(seq, self.clock.now());

        let len = message.write(&mut self.buf);
        self.stream
            .write_all(&self.buf[..len])
            .await
            .map_err(|source| Error::Write { seq, source })?;

        self.seq.next();
        debug!(%seq, "sent: {message}");

        Ok(message)
    }

    /// Run the send loop on a new Tokio task.
    pub fn spawn(self) -> Handle {
        let (close_tx, close_rx) = oneshot::channel();
        let task = spawn(async move { self.run(close_rx).await });

        Handle {
            close: Some(close_tx),
            task,
        }
    }

    /// The number of messages sent so far.
    pub fn sent(&self) -> u64 {
        self.seq.peek().value()
    }

    /// The local end of the connection.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.stream.local_addr()
    }

    /// The address of the receiver.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }

    fn report(&self) -> Report {
        Report {
            sent: self.sent(),
            elapsed: self.clock.elapsed(),
        }
    }
}

/// A summary of a [`Sender`] that was stopped.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Report {
    /// How many messages were written.
    pub sent: u64,
    /// How long the connection was open.
    pub elapsed: Duration,
}

/// A [`Sender`] running on a background task.
///
/// Dropping the `Handle` also stops the task.
#[derive(Debug)]
pub struct Handle {
    close: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<Report, Error>>,
}

impl Handle {
    /// Stop sending, and wait for the task to finish.
    ///
    /// If the loop had already ended because a write failed, that error is
    /// returned instead.
    pub async fn stop(mut self) -> Result<Report, Error> {
        self.shutdown();
        let Handle { task, .. } = self;

        task.await?
    }

    /// Signal the task to stop, without waiting for it.
    pub fn shutdown(&mut self) {
        if let Some(sender) = self.close.take() {
            let _ = sender.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// [Connect][Sender::connect] using `config`, then [run][Sender::run] until
/// `stop` fires or the connection fails.
pub async fn run(config: &Config, stop: oneshot::Receiver<()>) -> Result<Report, Error> {
    Sender::connect(config).await?.run(stop).await
}
