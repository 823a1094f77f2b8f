use crate::integrate::IntegrationMethod;
use crate::vector::Vector3;
use thiserror::Error;

/// The one place this crate returns a real error: validating a bundle of
/// initial `World` settings before the world exists. Runtime setters on
/// `World`/`RigidBody` keep their silent-clamp contract unchanged.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("timestep must be positive, got {0}")]
    NonPositiveTimestep(f32),
    #[error("linear damping must be in [0, 1], got {0}")]
    LinearDampingOutOfRange(f32),
    #[error("angular damping must be in [0, 1], got {0}")]
    AngularDampingOutOfRange(f32),
    #[error("time scale must be non-negative, got {0}")]
    NegativeTimeScale(f32),
    #[error("sub-iteration count must be at least 1, got {0}")]
    ZeroSubIterations(u32),
}

/// A validated, in-memory bundle of a `World`'s initial tunables. Built
/// once via [`WorldConfigBuilder`]; never touches a file, socket, or
/// environment variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    pub gravity: Vector3,
    pub timestep: f32,
    pub integration_method: IntegrationMethod,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub time_scale: f32,
    pub sub_iterations: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
            integration_method: IntegrationMethod::Verlet,
            linear_damping: 0.01,
            angular_damping: 0.05,
            time_scale: 1.0,
            sub_iterations: 1,
        }
    }
}

impl WorldConfig {
    pub fn builder() -> WorldConfigBuilder {
        WorldConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WorldConfigBuilder {
    config: WorldConfig,
}

impl Default for WorldConfigBuilder {
    fn default() -> Self {
        Self { config: WorldConfig::default() }
    }
}

impl WorldConfigBuilder {
    pub fn gravity(mut self, gravity: Vector3) -> Self {
        self.config.gravity = gravity;
        self
    }

    pub fn timestep(mut self, timestep: f32) -> Self {
        self.config.timestep = timestep;
        self
    }

    pub fn integration_method(mut self, method: IntegrationMethod) -> Self {
        self.config.integration_method = method;
        self
    }

    pub fn damping(mut self, linear: f32, angular: f32) -> Self {
        self.config.linear_damping = linear;
        self.config.angular_damping = angular;
        self
    }

    pub fn time_scale(mut self, scale: f32) -> Self {
        self.config.time_scale = scale;
        self
    }

    pub fn sub_iterations(mut self, count: u32) -> Self {
        self.config.sub_iterations = count;
        self
    }

    pub fn build(self) -> Result<WorldConfig, ConfigError> {
        let c = self.config;
        if c.timestep <= 0.0 {
            return Err(ConfigError::NonPositiveTimestep(c.timestep));
        }
        if !(0.0..=1.0).contains(&c.linear_damping) {
            return Err(ConfigError::LinearDampingOutOfRange(c.linear_damping));
        }
        if !(0.0..=1.0).contains(&c.angular_damping) {
            return Err(ConfigError::AngularDampingOutOfRange(c.angular_damping));
        }
        if c.time_scale < 0.0 {
            return Err(ConfigError::NegativeTimeScale(c.time_scale));
        }
        if c.sub_iterations == 0 {
            return Err(ConfigError::ZeroSubIterations(c.sub_iterations));
        }
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(WorldConfig::builder().build().is_ok());
    }

    #[test]
    fn non_positive_timestep_rejected() {
        let err = WorldConfig::builder().timestep(0.0).build().unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveTimestep(0.0));
    }

    #[test]
    fn out_of_range_damping_rejected() {
        let err = WorldConfig::builder().damping(1.5, 0.0).build().unwrap_err();
        assert_eq!(err, ConfigError::LinearDampingOutOfRange(1.5));
    }

    #[test]
    fn zero_sub_iterations_rejected() {
        let err = WorldConfig::builder().sub_iterations(0).build().unwrap_err();
        assert_eq!(err, ConfigError::ZeroSubIterations(0));
    }
}
