//! Background fetch loop. One worker thread performs every fetch, so fetches
//! are serialized: a slow request delays the next one instead of racing it.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::cities::City;
use crate::error::WeatherError;
use crate::metno::{Forecast, ForecastSource};

enum Command {
    Refresh,
    Switch(&'static City),
    Stop,
}

/// Result of one fetch, tagged with the city it was made for.
#[derive(Debug)]
pub struct Outcome {
    pub city: &'static str,
    pub fetched_at: DateTime<Utc>,
    pub result: Result<Forecast, WeatherError>,
}

pub struct Refresher {
    commands: Sender<Command>,
    outcomes: Receiver<Outcome>,
    worker: Option<JoinHandle<()>>,
}

impl Refresher {
    /// Starts the worker. It fetches for `city` at once, then every `interval`.
    pub fn spawn<S: ForecastSource>(source: S, city: &'static City, interval: Duration) -> Self {
        let (commands, command_rx) = mpsc::channel();
        let (outcome_tx, outcomes) = mpsc::channel();

        let worker = thread::spawn(move || run(source, city, interval, command_rx, outcome_tx));

        Self {
            commands,
            outcomes,
            worker: Some(worker),
        }
    }

    pub fn refresh(&self) -> Result<(), WeatherError> {
        self.send(Command::Refresh)
    }

    pub fn switch(&self, city: &'static City) -> Result<(), WeatherError> {
        self.send(Command::Switch(city))
    }

    /// Fails once the worker has exited, e.g. after a panic in a fetch.
    fn send(&self, command: Command) -> Result<(), WeatherError> {
        self.commands.send(command).map_err(|_| {
            log::error!("refresh worker is gone, command dropped");
            WeatherError::WorkerStopped
        })
    }

    /// Next finished fetch, if any.
    pub fn try_next(&self) -> Option<Outcome> {
        match self.outcomes.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    #[cfg(test)]
    pub fn next_timeout(&self, timeout: Duration) -> Option<Outcome> {
        self.outcomes.recv_timeout(timeout).ok()
    }

    /// Stops the worker and waits for an in-flight fetch to finish.
    pub fn stop(&mut self) {
        let _ = self.commands.send(Command::Stop);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("refresh worker panicked");
            }
        }
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        // the worker exits after any in-flight fetch; quitting does not wait for it
        let _ = self.commands.send(Command::Stop);
    }
}

fn run<S: ForecastSource>(
    source: S,
    mut city: &'static City,
    interval: Duration,
    commands: Receiver<Command>,
    outcomes: Sender<Outcome>,
) {
    let mut due = Instant::now();
    loop {
        let wait = due.saturating_duration_since(Instant::now());
        match commands.recv_timeout(wait) {
            Ok(Command::Refresh) | Err(RecvTimeoutError::Timeout) => {}
            Ok(Command::Switch(next)) => {
                log::info!("switching refresh to {}", next.name);
                city = next;
            }
            Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => {
                log::debug!("refresh worker stopping");
                return;
            }
        }

        let result = source.fetch(city);
        if let Err(e) = &result {
            log::error!("failed to load weather data for {}: {}", city.name, e);
        }
        let outcome = Outcome {
            city: city.key,
            fetched_at: Utc::now(),
            result,
        };
        if outcomes.send(outcome).is_err() {
            return;
        }
        due = Instant::now() + interval;
    }
}
