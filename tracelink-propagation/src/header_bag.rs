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

use http::{HeaderMap, HeaderName, HeaderValue, Request, Response};
use tracing::warn;

/// The narrow view of a request or response that propagation needs. Header names are
/// case-insensitive, as `HeaderName` is always normalized.
pub trait HeaderBag {
    /// Returns the first value of `name`, if present and valid UTF-8.
    fn get(&self, name: &HeaderName) -> Option<&str>;

    /// Replaces every value of `name` with `value`.
    fn set(&mut self, name: HeaderName, value: &str);

    /// Appends `value` to `name`, keeping the existing values.
    fn add(&mut self, name: HeaderName, value: &str);

    fn contains(&self, name: &HeaderName) -> bool {
        self.get(name).is_some()
    }
}

impl HeaderBag for HeaderMap {
    fn get(&self, name: &HeaderName) -> Option<&str> {
        HeaderMap::get(self, name).and_then(|v| v.to_str().ok())
    }

    fn set(&mut self, name: HeaderName, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.insert(name, value);
            },
            Err(e) => warn!("not setting header {name}: {e}"),
        }
    }

    fn add(&mut self, name: HeaderName, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.append(name, value);
            },
            Err(e) => warn!("not adding header {name}: {e}"),
        }
    }

    fn contains(&self, name: &HeaderName) -> bool {
        self.contains_key(name)
    }
}

impl<B> HeaderBag for Request<B> {
    fn get(&self, name: &HeaderName) -> Option<&str> {
        HeaderBag::get(self.headers(), name)
    }

    fn set(&mut self, name: HeaderName, value: &str) {
        self.headers_mut().set(name, value);
    }

    fn add(&mut self, name: HeaderName, value: &str) {
        self.headers_mut().add(name, value);
    }

    fn contains(&self, name: &HeaderName) -> bool {
        self.headers().contains_key(name)
    }
}

impl<B> HeaderBag for Response<B> {
    fn get(&self, name: &HeaderName) -> Option<&str> {
        HeaderBag::get(self.headers(), name)
    }

    fn set(&mut self, name: HeaderName, value: &str) {
        self.headers_mut().set(name, value);
    }

    fn add(&mut self, name: HeaderName, value: &str) {
        self.headers_mut().add(name, value);
    }

    fn contains(&self, name: &HeaderName) -> bool {
        self.headers().contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    const NAME: HeaderName = HeaderName::from_static("x-testheaderkey");

    #[test]
    fn set_overwrites() {
        let mut headers = HeaderMap::new();
        headers.add(NAME, "one");
        headers.add(NAME, "two");
        assert_eq!(headers.get_all(&NAME).iter().count(), 2);

        headers.set(NAME, "three");
        assert_eq!(headers.get_all(&NAME).iter().count(), 1);
        assert_eq!(HeaderBag::get(&headers, &NAME), Some("three"));
    }

    #[test]
    fn get_is_case_insensitive() {
        let req = Request::builder().header("X-TestHeaderKey", "value").body(()).unwrap();
        assert_eq!(req.get(&NAME), Some("value"));
        assert!(req.contains(&NAME));
    }

    #[test]
    fn get_skips_non_utf8() {
        let mut headers = HeaderMap::new();
        headers.insert(NAME, HeaderValue::from_bytes(b"\xfa\xfb").unwrap());
        assert_eq!(HeaderBag::get(&headers, &NAME), None);
        assert!(HeaderBag::contains(&headers, &NAME));
    }

    #[traced_test]
    #[test]
    fn set_rejects_invalid_value() {
        let mut resp = Response::new(());
        resp.set(NAME, "line\nbreak");
        assert!(!resp.contains(&NAME));
        assert!(logs_contain("not setting header x-testheaderkey"));
    }
}
