use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::link::AgentGroup;

/// Load pattern descriptor, e.g. `fixed:50000` or `step:10000:100000:50000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperimentPattern {
    /// Adaptive symmetric run at one rate until every acceptance check passes.
    Fixed { rate: u32 },
    /// Asymmetric runs for `start, start + step, ...` while below `end`.
    Step { start: u32, end: u32, step: u32 },
    /// One measurement with a fixed sample count, no retries.
    Test { rate: u32, samples: u32 },
    /// One symmetric measurement per sampling rate of the correlation sweep.
    Corr { rate: u32, samples: u32 },
}

impl ExperimentPattern {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            ExperimentPattern::Fixed { .. } => "fixed",
            ExperimentPattern::Step { .. } => "step",
            ExperimentPattern::Test { .. } => "test",
            ExperimentPattern::Corr { .. } => "corr",
        }
    }

    /// Offered loads a step sweep visits, in order.
    #[must_use]
    pub fn step_loads(start: u32, end: u32, step: u32) -> Vec<u32> {
        let mut loads = Vec::new();
        let mut load = start;
        while load < end && step > 0 {
            loads.push(load);
            let Some(next) = load.checked_add(step) else {
                break;
            };
            load = next;
        }
        loads
    }

    /// Checks that the fleet has the agents this pattern drives.
    ///
    /// # Errors
    ///
    /// Returns the matching `ConfigError` when a required agent group is empty.
    pub fn ensure_agents<C>(&self, count: C) -> Result<(), ConfigError>
    where
        C: Fn(AgentGroup) -> usize,
    {
        let symmetric = count(AgentGroup::Symmetric);
        let latency = count(AgentGroup::Latency);
        match self {
            ExperimentPattern::Fixed { .. } if symmetric == 0 => {
                Err(ConfigError::FixedRequiresSymmetricAgents)
            }
            ExperimentPattern::Corr { .. } if symmetric == 0 => {
                Err(ConfigError::CorrRequiresSymmetricAgents)
            }
            ExperimentPattern::Step { .. } if latency == 0 => {
                Err(ConfigError::AsymmetricRequiresLatencyAgents)
            }
            ExperimentPattern::Test { .. } if symmetric == 0 && latency == 0 => {
                Err(ConfigError::AsymmetricRequiresLatencyAgents)
            }
            ExperimentPattern::Fixed { .. }
            | ExperimentPattern::Corr { .. }
            | ExperimentPattern::Step { .. }
            | ExperimentPattern::Test { .. } => Ok(()),
        }
    }
}

impl fmt::Display for ExperimentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentPattern::Fixed { rate } => write!(f, "fixed:{}", rate),
            ExperimentPattern::Step { start, end, step } => {
                write!(f, "step:{}:{}:{}", start, end, step)
            }
            ExperimentPattern::Test { rate, samples } => write!(f, "test:{}:{}", rate, samples),
            ExperimentPattern::Corr { rate, samples } => write!(f, "corr:{}:{}", rate, samples),
        }
    }
}

impl FromStr for ExperimentPattern {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let mut parts = trimmed.split(':');
        let kind = parts.next().unwrap_or_default().to_ascii_lowercase();
        let numbers: Vec<&str> = parts.collect();
        let invalid = |reason: &'static str| ConfigError::InvalidPattern {
            pattern: trimmed.to_owned(),
            reason,
        };
        let parse_all = |expected: usize, usage: &'static str| -> Result<Vec<u32>, ConfigError> {
            if numbers.len() != expected {
                return Err(invalid(usage));
            }
            numbers
                .iter()
                .map(|part| match part.trim().parse::<u32>() {
                    Ok(0) => Err(invalid("values must be >= 1")),
                    Ok(number) => Ok(number),
                    Err(_) => Err(invalid("values must be positive integers")),
                })
                .collect()
        };

        match kind.as_str() {
            "fixed" => match parse_all(1, "expected fixed:<rate>")?.as_slice() {
                [rate] => Ok(ExperimentPattern::Fixed { rate: *rate }),
                _ => Err(invalid("expected fixed:<rate>")),
            },
            "step" => match parse_all(3, "expected step:<start>:<end>:<step>")?.as_slice() {
                [start, end, _] if start >= end => Err(invalid("end must exceed start")),
                [start, end, step] => Ok(ExperimentPattern::Step {
                    start: *start,
                    end: *end,
                    step: *step,
                }),
                _ => Err(invalid("expected step:<start>:<end>:<step>")),
            },
            "test" => match parse_all(2, "expected test:<rate>:<samples>")?.as_slice() {
                [rate, samples] => Ok(ExperimentPattern::Test {
                    rate: *rate,
                    samples: *samples,
                }),
                _ => Err(invalid("expected test:<rate>:<samples>")),
            },
            "corr" => match parse_all(2, "expected corr:<rate>:<samples>")?.as_slice() {
                [rate, samples] => Ok(ExperimentPattern::Corr {
                    rate: *rate,
                    samples: *samples,
                }),
                _ => Err(invalid("expected corr:<rate>:<samples>")),
            },
            _ => Err(ConfigError::UnknownPattern {
                pattern: trimmed.to_owned(),
            }),
        }
    }
}
