// Copyright 2025 The kmesh Authors
//
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
//

use serde::{Deserialize, Serialize};
use std::{env::var, fmt::Display, num::ParseFloatError, str::FromStr};

pub const ENV_SAMPLING_RATE: &str = "TRACELINK_SAMPLING_RATE";
pub const ENV_CORRELATION_HEADER: &str = "TRACELINK_CORRELATION_HEADER";

/// Tracing section of the configuration.
///
/// The sampling rate is kept as the raw string found in the document so that an
/// unparsable value never fails the load. It is interpreted lazily by
/// [`TracingSpec::sampling_rate`], which falls back to [`SamplingRate::DEFAULT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TracingSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sampling_rate: String,
    /// Also write the legacy `x-correlation-id` header on every injection.
    pub correlation_header: bool,
}

impl TracingSpec {
    pub fn new(sampling_rate: impl Into<String>) -> Self {
        Self { sampling_rate: sampling_rate.into(), ..Default::default() }
    }

    pub fn with_correlation_header(self, correlation_header: bool) -> Self {
        Self { correlation_header, ..self }
    }

    pub fn sampling_rate(&self) -> SamplingRate {
        if self.sampling_rate.trim().is_empty() {
            return SamplingRate::DEFAULT;
        }
        match self.sampling_rate.parse::<SamplingRate>() {
            Ok(rate) => rate,
            Err(e) => {
                ::tracing::warn!(
                    "invalid sampling rate {:?} ({e}), falling back to {}",
                    self.sampling_rate,
                    SamplingRate::DEFAULT
                );
                SamplingRate::DEFAULT
            },
        }
    }

    #[must_use]
    pub fn update_from_env(self) -> Self {
        self.update_from(|key| var(key).ok())
    }

    /// Applies overrides looked up by `lookup`. Values that cannot be understood are
    /// ignored and the document value is kept.
    #[must_use]
    pub fn update_from<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        TracingSpec {
            sampling_rate: lookup(ENV_SAMPLING_RATE).unwrap_or(self.sampling_rate),
            correlation_header: lookup(ENV_CORRELATION_HEADER)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(self.correlation_header),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            ::tracing::warn!("ignoring {ENV_CORRELATION_HEADER}={other:?}, expected a boolean");
            None
        },
    }
}

/// Fraction of traces to sample, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SamplingRate(f64);

impl SamplingRate {
    pub const DEFAULT: SamplingRate = SamplingRate(0.0001);
    pub const ALWAYS: SamplingRate = SamplingRate(1.0);
    pub const NEVER: SamplingRate = SamplingRate(0.0);

    /// Out-of-range values are clamped, `NaN` becomes the default.
    pub fn new(rate: f64) -> Self {
        if rate.is_nan() {
            Self::DEFAULT
        } else {
            SamplingRate(rate.clamp(0.0, 1.0))
        }
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for SamplingRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for SamplingRate {
    type Err = ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<f64>().map(SamplingRate::new)
    }
}

impl Display for SamplingRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}
