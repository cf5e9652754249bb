//! Client configuration: service directory and supervisor flavor.
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::codec::{StatusCodec, SupervisorFlavor};
use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_SERVICE_DIR, LEGACY_SERVICE_DIR_ENV, SERVICE_DIR_ENV,
    SUPERVISE_DIR,
};
use crate::error::SvcError;
use crate::service::ServiceHandle;

/// On-disk YAML shape of the optional configuration file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    /// Directory holding service definitions.
    service_dir: Option<PathBuf>,
    /// Supervisor flavor ("runit" or "daemontools").
    flavor: Option<SupervisorFlavor>,
}

/// Resolved client configuration.
///
/// Precedence, lowest to highest: built-in defaults, the `SVCCTL_SERVICE_DIR`
/// (or historical `SERVICE_DIR`) environment variable, then the YAML file.
/// CLI flags override all of these at the call site.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Directory scanned for service definitions.
    pub service_dir: PathBuf,
    /// Supervisor flavor used when decoding status records.
    pub flavor: SupervisorFlavor,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let service_dir = env::var_os(SERVICE_DIR_ENV)
            .or_else(|| env::var_os(LEGACY_SERVICE_DIR_ENV))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SERVICE_DIR));
        Self {
            service_dir,
            flavor: SupervisorFlavor::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration, layering the optional YAML file over defaults.
    ///
    /// An explicit `config_path` must exist; the default `svcctl.yaml`
    /// lookup is best-effort.
    pub fn load(config_path: Option<&str>) -> Result<Self, SvcError> {
        let mut config = Self::default();

        let file = match config_path {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Some(read_config_file(default_path)?)
                } else {
                    None
                }
            }
        };

        if let Some(file) = file {
            if let Some(service_dir) = file.service_dir {
                config.service_dir = service_dir;
            }
            if let Some(flavor) = file.flavor {
                config.flavor = flavor;
            }
        }

        Ok(config)
    }

    /// Codec for the configured flavor.
    pub fn codec(&self) -> StatusCodec {
        StatusCodec::new(self.flavor)
    }

    /// Resolves a service name or path to a service directory.
    ///
    /// Absolute paths pass through unchanged; bare names join the configured
    /// service directory.
    pub fn resolve(&self, service: &str) -> PathBuf {
        let path = Path::new(service);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.service_dir.join(service)
        }
    }

    /// Builds a handle for a service name or path.
    pub fn handle(&self, service: &str) -> ServiceHandle {
        ServiceHandle::new(self.resolve(service), self.codec())
    }

    /// Lists handles for every entry of the service directory that a
    /// supervisor has claimed (i.e. that contains a `supervise/` directory),
    /// sorted by name.
    pub fn discover(&self) -> Result<Vec<ServiceHandle>, SvcError> {
        let mut handles = Vec::new();
        for entry in fs::read_dir(&self.service_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.join(SUPERVISE_DIR).is_dir() {
                handles.push(ServiceHandle::new(path, self.codec()));
            }
        }
        handles.sort_by_key(|handle| handle.name());
        Ok(handles)
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, SvcError> {
    let content = fs::read_to_string(path).map_err(|e| {
        SvcError::ConfigRead(std::io::Error::new(
            e.kind(),
            format!("{} ({})", e, path.display()),
        ))
    })?;
    Ok(serde_yaml::from_str(&content)?)
}
