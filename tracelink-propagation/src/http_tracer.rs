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

use tracelink_configuration::config::TracingSpec;
use tracing::debug;

use crate::{
    context::Context,
    header_bag::HeaderBag,
    propagation::{inject_into_headers, InjectOptions},
    sampler::Sampler,
    span_context::SpanContext,
    tracer::{IdTracer, Span, Tracer},
};

/// Glue between the header codecs, the tracing configuration and a [`Tracer`].
#[derive(Debug, Clone, Default)]
pub struct HttpTracer<T = IdTracer> {
    tracer: T,
    sampler: Sampler,
    inject: InjectOptions,
}

impl HttpTracer {
    /// Creates a new `HttpTracer` with the default sampling rate and `traceparent` only.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Tracer> HttpTracer<T> {
    pub fn with_tracer<U: Tracer>(self, tracer: U) -> HttpTracer<U> {
        HttpTracer { tracer, sampler: self.sampler, inject: self.inject }
    }

    pub fn with_config(self, spec: &TracingSpec) -> Self {
        Self { sampler: Sampler::from(spec.sampling_rate()), inject: InjectOptions::from(spec), ..self }
    }

    pub fn with_sampler(self, sampler: Sampler) -> Self {
        Self { sampler, ..self }
    }

    #[inline]
    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Analyzes inbound request headers and returns the context the request runs in.
    pub fn server_context<H: HeaderBag + ?Sized>(&self, headers: &H) -> Context {
        Context::from_headers(headers)
    }

    /// Starts a client span parented on `cx` and propagates it on the outbound `headers`.
    pub fn start_client_span<H: HeaderBag + ?Sized>(
        &self,
        cx: &Context,
        headers: &mut H,
        operation_name: &str,
    ) -> T::Span {
        let span = self.tracer.start_span(cx.span_context(), operation_name, &self.sampler);
        let span_context = span.span_context();
        debug!(
            "client span {operation_name}: trace {} span {} sampled {}",
            span_context.trace_id(),
            span_context.span_id(),
            span_context.is_sampled()
        );
        self.update_tracing_headers(&span_context, headers);
        span
    }

    /// Writes `span_context` into the headers of an outbound request or a response.
    pub fn update_tracing_headers<H: HeaderBag + ?Sized>(&self, span_context: &SpanContext, headers: &mut H) {
        inject_into_headers(span_context, headers, self.inject);
    }
}

/// One-shot form of [`HttpTracer::start_client_span`], for callers holding only the
/// configuration and a tracer.
pub fn start_client_span_from_context<T, H>(
    cx: &Context,
    headers: &mut H,
    operation_name: &str,
    spec: &TracingSpec,
    tracer: &T,
) -> T::Span
where
    T: Tracer,
    H: HeaderBag + ?Sized,
{
    HttpTracer::new().with_tracer(tracer).with_config(spec).start_client_span(cx, headers, operation_name)
}
