use std::time::Duration;

use bon::Builder;
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    api::{
        fronius::{self, FetchError, RealtimeData},
        influx::{self, PublishError},
    },
    core::{
        point::{Point, Tags},
        sample::Sample,
        summary::Summary,
    },
    prelude::*,
};

/// Source of the raw device documents.
pub trait Fetch {
    fn fetch(&self) -> impl Future<Output = Result<RealtimeData, FetchError>>;
}

impl Fetch for fronius::Client {
    fn fetch(&self) -> impl Future<Output = Result<RealtimeData, FetchError>> {
        self.get_realtime_data()
    }
}

/// Destination of the points.
pub trait Publish {
    fn publish(&self, point: &Point) -> impl Future<Output = Result<(), PublishError>>;
}

impl Publish for influx::Client {
    fn publish(&self, point: &Point) -> impl Future<Output = Result<(), PublishError>> {
        self.write(point)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum State {
    Running,
    Stopped,
}

/// How a single tick ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Published(Sample),
    FetchFailed,
    TransformFailed,
    PublishFailed(Sample),
}

impl Outcome {
    /// The sample that made it past the transform, if any.
    pub const fn sample(&self) -> Option<&Sample> {
        match self {
            Self::Published(sample) | Self::PublishFailed(sample) => Some(sample),
            Self::FetchFailed | Self::TransformFailed => None,
        }
    }
}

#[derive(Builder)]
pub struct Collector<F, P> {
    fetcher: F,
    publisher: P,
    tags: Tags,

    #[builder(into)]
    measurement: String,

    inverter_id: u32,

    #[builder(into)]
    interval: Duration,
}

impl<F: Fetch, P: Publish> Collector<F, P> {
    /// Run ticks until `shutdown` resolves.
    ///
    /// The first tick starts immediately. Shutdown is only observed between ticks.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        let mut interval = interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut state = State::Running;
        while state == State::Running {
            state = tokio::select! {
                biased;
                () = &mut shutdown => State::Stopped,
                _ = interval.tick() => {
                    self.tick().await;
                    State::Running
                }
            };
        }
        info!("shutting down…");
    }

    /// Fetch, transform, and publish one sample.
    #[instrument(skip_all)]
    pub async fn tick(&self) -> Outcome {
        let data = match self.fetcher.fetch().await {
            Ok(data) => data,
            Err(error) => {
                error!(stage = "fetch", "{error}");
                return Outcome::FetchFailed;
            }
        };
        let sample = match Sample::transform(&data, self.inverter_id) {
            Ok(sample) => sample,
            Err(error) => {
                error!(stage = "transform", "{error}");
                return Outcome::TransformFailed;
            }
        };
        let point = Point::from_sample(&self.measurement, &self.tags, &sample);
        let outcome = match self.publisher.publish(&point).await {
            Ok(()) => {
                debug!(n_fields = point.fields.len(), "published");
                Outcome::Published(sample)
            }
            Err(error) => {
                error!(stage = "publish", "{error}");
                Outcome::PublishFailed(sample)
            }
        };
        if let Some(sample) = outcome.sample() {
            info!("{}", Summary(sample));
        }
        outcome
    }
}
