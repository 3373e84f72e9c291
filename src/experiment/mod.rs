//! Adaptive experiment controller.
//!
//! A pattern invocation sequences `START_LOAD`, `START_MEASURE` and
//! `REPORT_REQ` across agent groups, waits for samples to accrue, and for the
//! fixed pattern retries with adjusted sampling parameters until the
//! acceptance checks pass or the try budget runs out.
mod acceptance;
mod asymmetric;
mod fixed;
mod pattern;
mod port;
mod report;
mod runner;
mod state;
mod symmetric;

#[cfg(test)]
mod tests;

pub use acceptance::{
    MAX_IID_CORRELATION, judge_latency, latency_sampling_rate, measurement_window,
    throughput_in_band,
};
pub use pattern::ExperimentPattern;
pub use port::{FleetPort, Pacer, TokioPacer};
pub use report::{ExperimentOutcome, PointReport, TrailerSummary, render_json, render_text};
pub use runner::{CORRELATION_SWEEP_RATES, Controller, ControllerSettings};
pub use state::{
    DEFAULT_MAX_TRIES, ExperimentState, GrowReason, INITIAL_SAMPLE_COUNT, INITIAL_SAMPLING_RATE,
    LatencyVerdict, Phase, SAMPLE_STEP,
};
