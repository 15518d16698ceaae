// Copyright 2025 The kmesh Authors
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

use tracelink_configuration::config::SamplingRate;

use crate::span_context::{SpanContext, TraceId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sampler {
    AlwaysOn,
    AlwaysOff,
    /// Samples the given fraction of traces, deciding on the trace id so that every
    /// service makes the same decision. A sampled parent is always followed.
    TraceIdRatio(SamplingRate),
}

impl Default for Sampler {
    fn default() -> Self {
        Sampler::TraceIdRatio(SamplingRate::DEFAULT)
    }
}

impl From<SamplingRate> for Sampler {
    fn from(rate: SamplingRate) -> Self {
        Sampler::TraceIdRatio(rate)
    }
}

impl Sampler {
    pub fn should_sample(&self, parent: Option<&SpanContext>, trace_id: TraceId) -> bool {
        match self {
            Sampler::AlwaysOn => true,
            Sampler::AlwaysOff => false,
            Sampler::TraceIdRatio(rate) => {
                parent.is_some_and(SpanContext::is_sampled) || trace_id_below(trace_id, rate.get())
            },
        }
    }
}

// Compares the upper 63 bits of the first 8 trace id bytes against `rate * 2^63`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn trace_id_below(trace_id: TraceId, rate: f64) -> bool {
    if rate >= 1.0 {
        return true;
    }
    if rate <= 0.0 {
        return false;
    }
    let upper_bound = (rate * (1u64 << 63) as f64) as u64;
    let high = (trace_id.as_u128() >> 64) as u64;
    (high >> 1) < upper_bound
}
