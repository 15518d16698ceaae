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

use crate::{
    context::Context,
    sampler::Sampler,
    span_context::{SpanContext, SpanId, TraceFlags, TraceId},
};

/// A started span, as far as propagation is concerned.
pub trait Span {
    fn span_context(&self) -> SpanContext;
}

/// Seam to the tracer owning span lifecycle and export.
pub trait Tracer {
    type Span: Span;

    /// Starts a span named `name` as a child of `parent`, or as a new root when `parent`
    /// is `None`.
    fn start_span(&self, parent: Option<&SpanContext>, name: &str, sampler: &Sampler) -> Self::Span;
}

impl<T: Tracer + ?Sized> Tracer for &T {
    type Span = T::Span;

    fn start_span(&self, parent: Option<&SpanContext>, name: &str, sampler: &Sampler) -> Self::Span {
        (**self).start_span(parent, name, sampler)
    }
}

/// Tracer that only allocates identities: a v4 uuid for new traces, a random non-zero
/// span id for every span. Parent flag bits other than `sampled` are inherited.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdTracer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSpan {
    name: String,
    span_context: SpanContext,
    parent_id: Option<SpanId>, // the span id of the parent, if any.
}

impl ClientSpan {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_id(&self) -> Option<SpanId> {
        self.parent_id
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Context for work done on behalf of this span.
    pub fn context(&self) -> Context {
        Context::new().with_span_context(self.span_context)
    }
}

impl Span for ClientSpan {
    fn span_context(&self) -> SpanContext {
        self.span_context
    }
}

impl Tracer for IdTracer {
    type Span = ClientSpan;

    fn start_span(&self, parent: Option<&SpanContext>, name: &str, sampler: &Sampler) -> ClientSpan {
        // Generate a new trace ID if this is the root of the trace...
        let trace_id = parent.map_or_else(TraceId::random, SpanContext::trace_id);
        let sampled = sampler.should_sample(parent, trace_id);
        let trace_flags = parent.map_or(TraceFlags::default(), SpanContext::trace_flags).with_sampled(sampled);

        ClientSpan {
            name: name.to_owned(),
            span_context: SpanContext::new(trace_id, SpanId::random(), trace_flags),
            parent_id: parent.map(SpanContext::span_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracelink_configuration::config::SamplingRate;

    fn parent(flags: u8) -> SpanContext {
        SpanContext::new(
            TraceId::from_u128(0x4bf9_2f35_77b3_4da6_a3ce_929d_0e0e_4736),
            SpanId::from_u64(0x00f0_67aa_0ba9_02b7),
            TraceFlags::new(flags),
        )
    }

    #[test]
    fn root_span() {
        let span = IdTracer.start_span(None, "root", &Sampler::AlwaysOn);
        let sc = span.span_context();
        assert!(sc.is_valid());
        assert!(sc.is_sampled());
        assert!(span.is_root());
        assert_eq!(span.name(), "root");
    }

    #[test]
    fn root_spans_start_new_traces() {
        let first = IdTracer.start_span(None, "a", &Sampler::AlwaysOff);
        let second = IdTracer.start_span(None, "b", &Sampler::AlwaysOff);
        assert_ne!(first.span_context().trace_id(), second.span_context().trace_id());
        assert!(!first.span_context().is_sampled());
    }

    #[test]
    fn child_span() {
        let parent = parent(0x01);
        let child = IdTracer.start_span(Some(&parent), "child", &Sampler::from(SamplingRate::NEVER));
        let sc = child.span_context();

        // Child should have the same trace ID and a new span ID...
        assert_eq!(sc.trace_id(), parent.trace_id());
        assert_ne!(sc.span_id(), parent.span_id());
        assert_eq!(child.parent_id(), Some(parent.span_id()));
        assert!(sc.is_sampled());
    }

    #[test]
    fn child_span_keeps_other_flag_bits() {
        let parent = parent(0x80);
        let child = IdTracer.start_span(Some(&parent), "child", &Sampler::AlwaysOn);
        assert_eq!(child.span_context().trace_flags().bits(), 0x81);
    }

    #[test]
    fn span_context_into_context() {
        let span = IdTracer.start_span(Some(&parent(0x01)), "child", &Sampler::AlwaysOn);
        let cx = span.context();
        assert!(!cx.is_remote());
        assert_eq!(cx.span_context(), Some(&span.span_context()));
    }

    #[test]
    fn tracer_by_reference() {
        fn start<T: Tracer>(tracer: T) -> T::Span {
            tracer.start_span(None, "by-ref", &Sampler::AlwaysOn)
        }
        let tracer = IdTracer;
        assert!(start(&tracer).span_context().is_valid());
    }
}
