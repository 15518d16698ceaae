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

pub mod tracing;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;

pub use self::tracing::{SamplingRate, TracingSpec};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to deserialize yaml: {0}")]
    Yaml(#[from] serde_path_to_error::Error<serde_yaml::Error>),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub tracing: TracingSpec,
}

impl Config {
    /// Loads the configuration document at `path` and applies the `TRACELINK_*`
    /// environment overrides on top of it.
    pub fn new(path: &Path) -> Result<Self, ConfigError> {
        let config: Config = deserialize_yaml(path)?;
        ::tracing::info!("loaded tracing configuration from {}", path.display());
        Ok(Config { tracing: config.tracing.update_from_env() })
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, ConfigError> {
        let deserializer = serde_yaml::Deserializer::from_reader(rdr);
        Ok(serde_path_to_error::deserialize(deserializer)?)
    }
}

pub fn deserialize_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let deserializer = serde_yaml::Deserializer::from_reader(file);
    Ok(serde_path_to_error::deserialize(deserializer)?)
}
